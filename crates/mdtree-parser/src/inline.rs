//! Inline token builder.
//!
//! Collects the inline events of one block (a paragraph, heading, table
//! cell or tight list item) into the `children` of a single `inline` token.

use log::trace;
use mdtree_core::Token;
use std::ops::Range;

/// Inline tokens at one nesting context. Image alt text gets its own frame
/// because it ends up in the image's `children`, with levels restarting
/// at 0.
#[derive(Debug, Default)]
struct Frame {
    tokens: Vec<Token>,
    level: u32,
    openers: Vec<Token>,
}

/// An inline run being assembled.
#[derive(Debug)]
pub struct InlineRun {
    frames: Vec<Frame>,
    images: Vec<Token>,
    range: Option<Range<usize>>,
    html: bool,
}

impl InlineRun {
    pub fn new(html: bool) -> Self {
        Self {
            frames: vec![Frame::default()],
            images: Vec::new(),
            range: None,
            html,
        }
    }

    /// Extend the covered source range.
    pub fn touch(&mut self, range: &Range<usize>) {
        self.range = Some(match self.range.take() {
            Some(r) => r.start.min(range.start)..r.end.max(range.end),
            None => range.clone(),
        });
    }

    /// Source byte range covered by the run so far.
    pub fn range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    fn frame(&mut self) -> &mut Frame {
        // The base frame is never popped.
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn push(&mut self, token: Token) {
        trace!("inline token {}", token.ty);
        self.frame().tokens.push(token);
    }

    /// Append text, merging with a preceding text token.
    pub fn text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        let frame = self.frame();
        if let Some(last) = frame.tokens.last_mut() {
            if last.ty == "text" {
                last.content.push_str(content);
                return;
            }
        }
        let level = frame.level;
        frame
            .tokens
            .push(inline_token(Token::text(content), level));
    }

    pub fn code(&mut self, content: &str, markup: &str) {
        let level = self.frame().level;
        self.push(inline_token(
            Token::leaf("code_inline", "code")
                .with_content(content)
                .with_markup(markup),
            level,
        ));
    }

    /// Raw inline HTML. Escaped as text unless HTML is enabled.
    pub fn html(&mut self, content: &str) {
        if !self.html {
            self.text(content);
            return;
        }
        let level = self.frame().level;
        self.push(inline_token(
            Token::leaf("html_inline", "").with_content(content),
            level,
        ));
    }

    pub fn softbreak(&mut self) {
        let level = self.frame().level;
        self.push(inline_token(Token::leaf("softbreak", "br"), level));
    }

    pub fn hardbreak(&mut self) {
        let level = self.frame().level;
        self.push(inline_token(Token::leaf("hardbreak", "br"), level));
    }

    /// Open a paired inline element such as `em` or `link`.
    pub fn open(&mut self, opener: Token) {
        let frame = self.frame();
        let opener = inline_token(opener, frame.level);
        frame.level += 1;
        frame.openers.push(opener.clone());
        trace!("inline token {}", opener.ty);
        frame.tokens.push(opener);
    }

    /// Close the innermost open element.
    pub fn close(&mut self) {
        let frame = self.frame();
        let Some(opener) = frame.openers.pop() else {
            return;
        };
        frame.level = frame.level.saturating_sub(1);

        let name = opener.ty.strip_suffix("_open").unwrap_or(&opener.ty);
        let closer = Token::close(name, opener.tag.clone())
            .with_markup(opener.markup.clone())
            .with_info(opener.info.clone());
        frame.tokens.push(inline_token(closer, frame.level));
    }

    /// Start an image. Events until [`end_image`](Self::end_image) become
    /// its alt text.
    pub fn start_image(&mut self, src: &str, title: &str) {
        let mut image = Token::leaf("image", "img")
            .with_attr("src", src)
            .with_attr("alt", "");
        if !title.is_empty() {
            image.attr_push("title", title);
        }
        self.images.push(image);
        self.frames.push(Frame::default());
    }

    pub fn end_image(&mut self) {
        let Some(image) = self.images.pop() else {
            return;
        };
        if self.frames.len() < 2 {
            return;
        }
        let alt = self.frames.pop().map(|f| f.tokens).unwrap_or_default();
        let level = self.frame().level;
        let content = plain_text(&alt);
        self.push(inline_token(
            image.with_content(content).with_children(alt),
            level,
        ));
    }

    /// Whether nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(|f| f.tokens.is_empty())
    }

    /// Close anything left open and return the children.
    pub fn finish(mut self) -> Vec<Token> {
        while !self.images.is_empty() {
            self.end_image();
        }
        while !self.frame().openers.is_empty() {
            self.close();
        }
        self.frames.pop().map(|f| f.tokens).unwrap_or_default()
    }
}

fn inline_token(token: Token, level: u32) -> Token {
    token.with_level(level).with_block(false)
}

/// Concatenated text of a token list, as used for image alt text.
pub fn plain_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut pending = vec![tokens.iter()];
    while let Some(stream) = pending.last_mut() {
        let Some(token) = stream.next() else {
            pending.pop();
            continue;
        };
        match token.ty.as_str() {
            "text" | "code_inline" => out.push_str(&token.content),
            "softbreak" | "hardbreak" => out.push('\n'),
            "image" => pending.push(token.children.as_deref().unwrap_or(&[]).iter()),
            _ => {}
        }
    }
    out
}

/// Build the `_open` token for a paired inline element.
pub fn opener(name: &str, tag: &str, markup: &str) -> Token {
    Token::open(name, tag).with_markup(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.ty.as_str()).collect()
    }

    #[test]
    fn test_text_merges() {
        let mut run = InlineRun::new(false);
        run.text("a");
        run.text("b");
        run.text("");
        let children = run.finish();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content, "ab");
        assert!(!children[0].block);
    }

    #[test]
    fn test_levels() {
        let mut run = InlineRun::new(false);
        run.open(opener("strong", "strong", "**"));
        run.open(opener("em", "em", "*"));
        run.text("x");
        run.close();
        run.close();
        let children = run.finish();
        assert_eq!(
            types(&children),
            ["strong_open", "em_open", "text", "em_close", "strong_close"]
        );
        let levels: Vec<_> = children.iter().map(|t| t.level).collect();
        assert_eq!(levels, [0, 1, 2, 1, 0]);
        assert_eq!(children[4].markup, "**");
        assert_eq!(children[4].tag, "strong");
    }

    #[test]
    fn test_image_alt_children() {
        let mut run = InlineRun::new(false);
        run.open(opener("link", "a", ""));
        run.start_image("cat.png", "A cat");
        run.text("a ");
        run.open(opener("em", "em", "_"));
        run.text("cat");
        run.close();
        run.end_image();
        run.close();
        let children = run.finish();

        assert_eq!(types(&children), ["link_open", "image", "link_close"]);
        let image = &children[1];
        assert_eq!(image.level, 1);
        assert_eq!(image.content, "a cat");
        assert_eq!(image.attr_get("src").and_then(|v| v.as_str()), Some("cat.png"));
        assert_eq!(image.attr_get("title").and_then(|v| v.as_str()), Some("A cat"));

        let alt = image.children.as_ref().unwrap();
        assert_eq!(types(alt), ["text", "em_open", "text", "em_close"]);
        assert_eq!(alt[0].level, 0);
        assert_eq!(alt[2].level, 1);
    }

    #[test]
    fn test_html_disabled_becomes_text() {
        let mut run = InlineRun::new(false);
        run.text("a ");
        run.html("<b>");
        let children = run.finish();
        assert_eq!(types(&children), ["text"]);
        assert_eq!(children[0].content, "a <b>");

        let mut run = InlineRun::new(true);
        run.html("<b>");
        assert_eq!(types(&run.finish()), ["html_inline"]);
    }

    #[test]
    fn test_finish_closes_dangling() {
        let mut run = InlineRun::new(false);
        run.open(opener("em", "em", "*"));
        run.text("x");
        let children = run.finish();
        assert_eq!(types(&children), ["em_open", "text", "em_close"]);
    }

    #[test]
    fn test_range() {
        let mut run = InlineRun::new(false);
        assert!(run.range().is_none());
        run.touch(&(4..8));
        run.touch(&(2..5));
        assert_eq!(run.range(), Some(2..8));
    }
}
