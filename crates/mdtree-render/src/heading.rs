//! Heading rendering.
//!
//! Headings render as `<h1>` through `<h6>` depending on the node's tag.
//! Any other tag is reported and the heading is dropped.

use crate::{Diagnostic, RenderContext, RenderError, Renderer};
use log::error;
use mdtree_core::SyntaxTreeNode;

/// Tags a heading may carry.
pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("heading", heading);
}

pub fn heading(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    let tag = node.tag()?;
    if !HEADING_TAGS.contains(&tag) {
        error!("unexpected heading tag: {}", tag);
        ctx.diagnose(Diagnostic::UnexpectedHeadingTag {
            tag: tag.to_string(),
        });
        return Ok(());
    }

    ctx.wrap_children(tag, node)?;
    ctx.push("\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtree_config::ResolvedOptions;
    use mdtree_core::{SyntaxTree, Token};

    fn heading_tokens(tag: &str) -> Vec<Token> {
        vec![
            Token::open("heading", tag).with_markup("#"),
            Token::leaf("inline", "").with_children(vec![Token::text("Title")]),
            Token::close("heading", tag),
        ]
    }

    #[test]
    fn test_all_levels() {
        let renderer = Renderer::new(ResolvedOptions::default());
        for tag in HEADING_TAGS {
            let tree = SyntaxTree::build(heading_tokens(tag)).unwrap();
            let html = renderer.render(&tree).unwrap().html;
            assert_eq!(html, format!("<{0}>Title</{0}>\n", tag));
        }
    }

    #[test]
    fn test_unexpected_tag_renders_nothing() {
        let renderer = Renderer::new(ResolvedOptions::default());
        let tree = SyntaxTree::build(heading_tokens("h7")).unwrap();
        let rendered = renderer.render(&tree).unwrap();
        assert_eq!(rendered.html, "");
        assert_eq!(
            rendered.diagnostics,
            [Diagnostic::UnexpectedHeadingTag {
                tag: "h7".to_string()
            }]
        );
    }
}
