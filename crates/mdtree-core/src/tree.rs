//! Syntax tree built from a flat token stream.
//!
//! Each node in the tree represents either:
//! - the root of the document
//! - a single self-contained [`Token`]
//! - an opening/closing token pair and the tokens nested in between
//!
//! Nodes are stored in an arena owned by [`SyntaxTree`]. A node owns its
//! children through an ordered id list and points back at its parent by id;
//! the parent link is never used for ownership. The tree is read-only once
//! built, so [`SyntaxTreeNode`] handles can be copied freely and walked from
//! any number of threads at once.

use std::collections::BTreeMap;

use log::trace;

use crate::error::TreeError;
use crate::token::{AttrValue, Token, CLOSING, OPENING, SELF_CONTAINED};
use crate::walk::Walk;

/// Type reported by the root node.
pub const ROOT_TYPE: &str = "root";

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The three shapes a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top of the document, no representative token
    Root,
    /// One self-contained token
    Leaf,
    /// An opening/closing pair
    Branch,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeData {
    Root,
    Leaf(Token),
    Branch { opening: Token, closing: Token },
}

/// One token sequence being placed into the arena.
struct Frame {
    parent: NodeId,
    tokens: std::vec::IntoIter<Token>,
    open: Vec<NodeId>,
}

impl Frame {
    fn new(parent: NodeId, tokens: Vec<Token>) -> Self {
        Self {
            parent,
            tokens: tokens.into_iter(),
            open: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable syntax tree.
///
/// The first node in the arena is the top node: the document root for
/// [`SyntaxTree::build`], or the single leaf/branch for
/// [`SyntaxTree::build_nested`]. Nodes are allocated in document order, so
/// arena order equals pre-order traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<NodeEntry>,
}

impl SyntaxTree {
    /// Build a rooted tree from a token stream.
    ///
    /// An empty stream yields a root with no children.
    ///
    /// # Example
    ///
    /// ```
    /// use mdtree_core::{SyntaxTree, Token};
    ///
    /// let tree = SyntaxTree::build(vec![
    ///     Token::open("strong", "strong"),
    ///     Token::text("hi"),
    ///     Token::close("strong", "strong"),
    /// ])
    /// .unwrap();
    ///
    /// let strong = tree.root().child(0).unwrap();
    /// assert_eq!(strong.node_type(), "strong");
    /// assert_eq!(strong.child(0).unwrap().content().unwrap(), "hi");
    /// ```
    pub fn build(tokens: Vec<Token>) -> Result<Self, TreeError> {
        let mut tree = Self::with_capacity(tokens.len() + 1);
        let root = tree.alloc(NodeData::Root, None);
        tree.fill(root, tokens)?;
        trace!("built syntax tree with {} nodes", tree.nodes.len());
        Ok(tree)
    }

    /// Build a tree whose top node is a single leaf or branch rather than a
    /// root.
    ///
    /// The stream must be either one self-contained token, or an opening
    /// token, a balanced body and the matching closing token.
    pub fn build_nested(tokens: Vec<Token>) -> Result<Self, TreeError> {
        let mut tree = Self::with_capacity(tokens.len());
        let mut tokens = tokens.into_iter();
        let first = tokens.next().ok_or(TreeError::EmptyNonRootInput)?;

        match tokens.next_back() {
            None => {
                if first.nesting != SELF_CONTAINED {
                    return Err(TreeError::UnbalancedNesting {
                        token_type: first.ty,
                    });
                }
                let mut first = first;
                let nested = take_children(&mut first);
                let id = tree.alloc(NodeData::Leaf(first), None);
                if let Some(children) = nested {
                    tree.fill(id, children)?;
                }
            }
            Some(closing) => {
                if first.nesting != OPENING || closing.nesting != CLOSING {
                    return Err(TreeError::UnbalancedNesting {
                        token_type: first.ty,
                    });
                }
                let id = tree.alloc(
                    NodeData::Branch {
                        opening: first,
                        closing,
                    },
                    None,
                );
                tree.fill(id, tokens.collect())?;
            }
        }

        Ok(tree)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    fn alloc(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    /// Add `tokens` below `parent` in a single pass.
    ///
    /// Each frame is one token sequence: the top-level stream, or the
    /// children of an inline token. `open` holds the branches of that
    /// sequence still waiting for their closing token.
    fn fill(&mut self, parent: NodeId, tokens: Vec<Token>) -> Result<(), TreeError> {
        let mut frames = vec![Frame::new(parent, tokens)];

        while let Some(frame) = frames.last_mut() {
            let Some(token) = frame.tokens.next() else {
                if let Some(&outermost) = frame.open.first() {
                    return Err(self.unclosed(outermost));
                }
                frames.pop();
                continue;
            };
            let current = frame.open.last().copied().unwrap_or(frame.parent);

            match token.nesting {
                SELF_CONTAINED => {
                    let mut token = token;
                    let nested = take_children(&mut token);
                    let id = self.alloc(NodeData::Leaf(token), Some(current));
                    if let Some(children) = nested {
                        frames.push(Frame::new(id, children));
                    }
                }
                OPENING => {
                    let id = self.alloc(
                        NodeData::Branch {
                            opening: token,
                            closing: Token::default(),
                        },
                        Some(current),
                    );
                    frame.open.push(id);
                }
                CLOSING => match frame.open.pop() {
                    Some(id) => self.set_closing(id, token),
                    None => {
                        return Err(TreeError::InvalidNesting {
                            token_type: token.ty,
                            nesting: CLOSING,
                        })
                    }
                },
                nesting => {
                    return Err(TreeError::InvalidNesting {
                        token_type: token.ty,
                        nesting,
                    });
                }
            }
        }

        Ok(())
    }

    fn set_closing(&mut self, id: NodeId, token: Token) {
        if let NodeData::Branch { closing, .. } = &mut self.nodes[id.index()].data {
            *closing = token;
        }
    }

    fn unclosed(&self, id: NodeId) -> TreeError {
        match &self.entry(id).data {
            NodeData::Branch { opening, .. } | NodeData::Leaf(opening) => {
                TreeError::UnclosedToken {
                    token_type: opening.ty.clone(),
                    map: opening.map,
                }
            }
            NodeData::Root => TreeError::UnclosedToken {
                token_type: ROOT_TYPE.to_string(),
                map: None,
            },
        }
    }

    /// The top node of the tree.
    pub fn root(&self) -> SyntaxTreeNode<'_> {
        SyntaxTreeNode {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<SyntaxTreeNode<'_>> {
        (id.index() < self.nodes.len()).then_some(SyntaxTreeNode { tree: self, id })
    }

    /// Total number of nodes, including the top node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its top node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk every node from the top, in document order.
    pub fn walk(&self) -> Walk<'_> {
        self.root().walk(true)
    }

    /// Flatten the tree back into the token stream it was built from.
    pub fn to_tokens(&self) -> Vec<Token> {
        self.root().to_tokens()
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.index()]
    }
}

/// Move an inline token's nested stream out of it. The token keeps an empty
/// list so the stream can be put back when flattening.
fn take_children(token: &mut Token) -> Option<Vec<Token>> {
    let children = token.children.take()?;
    token.children = Some(Vec::new());
    Some(children)
}

/// A borrowed handle to one node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxTreeNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl PartialEq for SyntaxTreeNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxTreeNode<'_> {}

impl std::fmt::Debug for SyntaxTreeNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTreeNode")
            .field("id", &self.id)
            .field("type", &self.node_type())
            .field("children", &self.child_count())
            .finish()
    }
}

impl<'a> SyntaxTreeNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        match self.data() {
            NodeData::Root => NodeKind::Root,
            NodeData::Leaf(_) => NodeKind::Leaf,
            NodeData::Branch { .. } => NodeKind::Branch,
        }
    }

    pub fn is_root(&self) -> bool {
        self.kind() == NodeKind::Root
    }

    /// Whether the node wraps an opening/closing pair.
    pub fn is_nested(&self) -> bool {
        self.kind() == NodeKind::Branch
    }

    fn data(&self) -> &'a NodeData {
        &self.tree.entry(self.id).data
    }

    fn handle(&self, id: NodeId) -> SyntaxTreeNode<'a> {
        SyntaxTreeNode {
            tree: self.tree,
            id,
        }
    }

    pub fn parent(&self) -> Option<SyntaxTreeNode<'a>> {
        self.tree.entry(self.id).parent.map(|id| self.handle(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = SyntaxTreeNode<'a>> + ExactSizeIterator + 'a {
        let tree = self.tree;
        tree.children_of(self.id)
            .iter()
            .map(move |&id| SyntaxTreeNode { tree, id })
    }

    pub fn child(&self, index: usize) -> Option<SyntaxTreeNode<'a>> {
        self.tree
            .children_of(self.id)
            .get(index)
            .map(|&id| self.handle(id))
    }

    pub fn child_count(&self) -> usize {
        self.tree.children_of(self.id).len()
    }

    /// All children of the parent, including this node. A node without a
    /// parent is its own only sibling.
    pub fn siblings(&self) -> Vec<SyntaxTreeNode<'a>> {
        match self.parent() {
            Some(parent) => parent.children().collect(),
            None => vec![*self],
        }
    }

    fn sibling_ids(&self) -> &'a [NodeId] {
        match self.tree.entry(self.id).parent {
            Some(parent) => self.tree.children_of(parent),
            None => &[],
        }
    }

    pub fn next_sibling(&self) -> Option<SyntaxTreeNode<'a>> {
        let siblings = self.sibling_ids();
        let position = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(position + 1).map(|&id| self.handle(id))
    }

    pub fn previous_sibling(&self) -> Option<SyntaxTreeNode<'a>> {
        let siblings = self.sibling_ids();
        let position = siblings.iter().position(|&id| id == self.id)?;
        position
            .checked_sub(1)
            .and_then(|previous| siblings.get(previous))
            .map(|&id| self.handle(id))
    }

    /// Walk this node's subtree in document order (pre-order, depth first).
    ///
    /// The walk is lazy and can be restarted by calling `walk` again.
    pub fn walk(&self, include_self: bool) -> Walk<'a> {
        Walk::new(self.tree, self.id, include_self)
    }

    /// The self-contained token of a leaf node.
    ///
    /// An inline token's nested stream lives in the child nodes, so its
    /// `children` list is empty here.
    pub fn token(&self) -> Option<&'a Token> {
        match self.data() {
            NodeData::Leaf(token) => Some(token),
            _ => None,
        }
    }

    /// The opening token of a branch node.
    pub fn opening_token(&self) -> Option<&'a Token> {
        match self.data() {
            NodeData::Branch { opening, .. } => Some(opening),
            _ => None,
        }
    }

    /// The closing token of a branch node.
    pub fn closing_token(&self) -> Option<&'a Token> {
        match self.data() {
            NodeData::Branch { closing, .. } => Some(closing),
            _ => None,
        }
    }

    /// The token the attribute accessors read from.
    fn attribute_token(&self, attribute: &'static str) -> Result<&'a Token, TreeError> {
        match self.data() {
            NodeData::Leaf(token) => Ok(token),
            NodeData::Branch { opening, .. } => Ok(opening),
            NodeData::Root => Err(TreeError::MissingAttributeData { attribute }),
        }
    }

    /// A string type of the represented syntax.
    ///
    /// - `"root"` for root nodes
    /// - the token type for self-contained tokens
    /// - the opening token type with the `_open` suffix stripped for pairs
    pub fn node_type(&self) -> &'a str {
        match self.data() {
            NodeData::Root => ROOT_TYPE,
            NodeData::Leaf(token) => &token.ty,
            NodeData::Branch { opening, .. } => {
                opening.ty.strip_suffix("_open").unwrap_or(&opening.ty)
            }
        }
    }

    /// HTML tag name, e.g. "p".
    pub fn tag(&self) -> Result<&'a str, TreeError> {
        Ok(&self.attribute_token("tag")?.tag)
    }

    /// HTML attributes. Empty when the token carries none.
    pub fn attrs(&self) -> Result<BTreeMap<&'a str, &'a AttrValue>, TreeError> {
        let token = self.attribute_token("attrs")?;
        Ok(token
            .attrs
            .iter()
            .flatten()
            .map(|(key, value)| (key.as_str(), value))
            .collect())
    }

    /// A single HTML attribute.
    pub fn attr(&self, name: &str) -> Result<Option<&'a AttrValue>, TreeError> {
        Ok(self.attribute_token("attrs")?.attr_get(name))
    }

    /// Source map info: `[line_begin, line_end)`.
    pub fn map(&self) -> Result<Option<(usize, usize)>, TreeError> {
        Ok(self.attribute_token("map")?.map)
    }

    /// Nesting level as assigned by the tokenizer.
    pub fn level(&self) -> Result<u32, TreeError> {
        Ok(self.attribute_token("level")?.level)
    }

    /// Contents of self-contained tokens (code, html, fence, text, ...).
    pub fn content(&self) -> Result<&'a str, TreeError> {
        Ok(&self.attribute_token("content")?.content)
    }

    /// '*' or '_' for emphasis, fence string for fence, etc.
    pub fn markup(&self) -> Result<&'a str, TreeError> {
        Ok(&self.attribute_token("markup")?.markup)
    }

    /// Fence info string.
    pub fn info(&self) -> Result<&'a str, TreeError> {
        Ok(&self.attribute_token("info")?.info)
    }

    /// Plugin data.
    pub fn meta(&self) -> Result<Option<&'a serde_json::Value>, TreeError> {
        Ok(self.attribute_token("meta")?.meta.as_ref())
    }

    /// True for block-level tokens, false for inline tokens.
    pub fn block(&self) -> Result<bool, TreeError> {
        Ok(self.attribute_token("block")?.block)
    }

    /// If true, ignore this element when rendering (tight list paragraphs).
    pub fn hidden(&self) -> Result<bool, TreeError> {
        Ok(self.attribute_token("hidden")?.hidden)
    }

    /// Flatten this node back into a linear token stream.
    ///
    /// Nodes below an inline leaf go back into that token's `children`.
    pub fn to_tokens(&self) -> Vec<Token> {
        enum Step {
            Enter(NodeId),
            Close(NodeId),
            Collapse(NodeId),
        }

        // The innermost stream being written is last.
        let mut streams: Vec<Vec<Token>> = vec![Vec::new()];
        let mut steps = vec![Step::Enter(self.id)];

        while let Some(step) = steps.pop() {
            let node = match step {
                Step::Enter(id) => self.handle(id),
                Step::Close(id) => {
                    if let (Some(closing), Some(stream)) =
                        (self.handle(id).closing_token(), streams.last_mut())
                    {
                        stream.push(closing.clone());
                    }
                    continue;
                }
                Step::Collapse(id) => {
                    let children = streams.pop().unwrap_or_default();
                    if let (Some(token), Some(stream)) =
                        (self.handle(id).token(), streams.last_mut())
                    {
                        let mut token = token.clone();
                        token.children = Some(children);
                        stream.push(token);
                    }
                    continue;
                }
            };
            match node.data() {
                NodeData::Root => {}
                NodeData::Leaf(token) if token.children.is_some() => {
                    streams.push(Vec::new());
                    steps.push(Step::Collapse(node.id));
                }
                NodeData::Leaf(token) => {
                    if let Some(stream) = streams.last_mut() {
                        stream.push(token.clone());
                    }
                    continue;
                }
                NodeData::Branch { opening, .. } => {
                    if let Some(stream) = streams.last_mut() {
                        stream.push(opening.clone());
                    }
                    steps.push(Step::Close(node.id));
                }
            }
            steps.extend(node.children().rev().map(|child| Step::Enter(child.id)));
        }

        streams.pop().unwrap_or_default()
    }

    /// Render an indented outline of the subtree, one node per line.
    ///
    /// Attributes are shown inline; with `show_text` the content of `text`
    /// nodes is printed on the lines below them.
    pub fn pretty(&self, indent: usize, show_text: bool) -> String {
        let mut out = String::new();
        let mut pending = vec![(self.id, 0)];

        while let Some((id, current)) = pending.pop() {
            if !out.is_empty() {
                out.push('\n');
            }
            let node = self.handle(id);
            node.write_pretty_line(&mut out, indent, show_text, current);
            pending.extend(node.children().rev().map(|child| (child.id, current + indent)));
        }

        out
    }

    fn write_pretty_line(&self, out: &mut String, indent: usize, show_text: bool, current: usize) {
        let prefix = " ".repeat(current);
        out.push_str(&prefix);
        out.push('<');
        out.push_str(self.node_type());

        if let Ok(attrs) = self.attrs() {
            for (key, value) in attrs {
                match value {
                    AttrValue::String(s) => out.push_str(&format!(" {}='{}'", key, s)),
                    AttrValue::Number(n) => out.push_str(&format!(" {}={}", key, n)),
                }
            }
        }
        out.push('>');

        if show_text && self.node_type() == "text" {
            if let Ok(content) = self.content() {
                let text_prefix = " ".repeat(current + indent);
                for line in content.lines() {
                    out.push('\n');
                    out.push_str(&text_prefix);
                    out.push_str(line);
                }
            }
        }
    }
}
