//! The token record produced by the tokenizer.
//!
//! Tokens form a flat sequence in which block structure is expressed only
//! through the `nesting` field: `+1` opens a container, `-1` closes it and
//! `0` is self-contained. The [`tree`](crate::tree) module turns such a
//! sequence back into a hierarchy.

use serde::{Deserialize, Serialize};

/// Nesting delta of an opening token.
pub const OPENING: i8 = 1;
/// Nesting delta of a self-contained token.
pub const SELF_CONTAINED: i8 = 0;
/// Nesting delta of a closing token.
pub const CLOSING: i8 = -1;

/// An HTML attribute value: either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(i64),
    String(String),
}

impl AttrValue {
    /// Borrow the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }

    /// The value as a number, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::String(_) => None,
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value)
    }
}

/// A single unit of markup structure or content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Type of the token, e.g. "paragraph_open"
    #[serde(rename = "type")]
    pub ty: String,
    /// HTML tag name, e.g. "p"
    pub tag: String,
    /// +1 opens, 0 is self-contained, -1 closes
    pub nesting: i8,
    /// HTML attributes in source order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Vec<(String, AttrValue)>>,
    /// Source line range `[start, end)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<(usize, usize)>,
    /// Nesting level as assigned by the tokenizer
    #[serde(default)]
    pub level: u32,
    /// Payload of self-contained tokens (text, code, html)
    #[serde(default)]
    pub content: String,
    /// Literal syntax marker, e.g. "*" or "```"
    #[serde(default)]
    pub markup: String,
    /// Auxiliary info string, e.g. the fence language
    #[serde(default)]
    pub info: String,
    /// Opaque data for plugins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// True for block-level tokens, false for inline tokens
    #[serde(default)]
    pub block: bool,
    /// Skip when rendering (tight list paragraphs)
    #[serde(default)]
    pub hidden: bool,
    /// Nested inline tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Token>>,
}

impl Token {
    /// Create a token with the given type, tag and nesting.
    pub fn new(ty: impl Into<String>, tag: impl Into<String>, nesting: i8) -> Self {
        Self {
            ty: ty.into(),
            tag: tag.into(),
            nesting,
            ..Self::default()
        }
    }

    /// Create an opening token, e.g. `Token::open("paragraph", "p")` gives
    /// a `paragraph_open` token.
    pub fn open(name: &str, tag: impl Into<String>) -> Self {
        Self::new(format!("{}_open", name), tag, OPENING)
    }

    /// Create the closing counterpart of [`Token::open`].
    pub fn close(name: &str, tag: impl Into<String>) -> Self {
        Self::new(format!("{}_close", name), tag, CLOSING)
    }

    /// Create a self-contained token.
    pub fn leaf(ty: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(ty, tag, SELF_CONTAINED)
    }

    /// Create a self-contained `text` token.
    pub fn text(content: impl Into<String>) -> Self {
        Self::leaf("text", "").with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_map(mut self, start: usize, end: usize) -> Self {
        self.map = Some((start, end));
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = Some(children);
        self
    }

    /// Append an attribute, keeping source order.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attr_push(name, value);
        self
    }

    /// Append an attribute in place.
    pub fn attr_push(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
    }

    /// Look up an attribute by name. The first occurrence wins.
    pub fn attr_get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .as_ref()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_opening(&self) -> bool {
        self.nesting == OPENING
    }

    pub fn is_closing(&self) -> bool {
        self.nesting == CLOSING
    }
}
