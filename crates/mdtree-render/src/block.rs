//! Paragraph, blockquote, rule and raw HTML blocks.

use crate::{RenderContext, RenderError, Renderer};
use mdtree_core::SyntaxTreeNode;

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("paragraph", paragraph);
    renderer.insert_rule("inline", inline);
    renderer.insert_rule("blockquote", blockquote);
    renderer.insert_rule("hr", hr);
    renderer.insert_rule("html_block", html_block);
}

/// `<p>…</p>`. Hidden paragraphs (tight list items) write only their
/// children.
pub fn paragraph(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    if node.hidden()? {
        return ctx.render_children(node);
    }
    ctx.wrap_children("p", node)?;
    ctx.push("\n");
    Ok(())
}

pub fn inline(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.render_children(node)
}

pub fn blockquote(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<blockquote>\n");
    ctx.render_children(node)?;
    ctx.push("</blockquote>\n");
    Ok(())
}

pub fn hr(ctx: &mut RenderContext<'_>, _node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    let end = ctx.void_end();
    ctx.push("<hr");
    ctx.push(end);
    ctx.push("\n");
    Ok(())
}

/// Raw HTML, written as is. Only produced when the `html` option is on.
pub fn html_block(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push(node.content()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Renderer;
    use mdtree_config::{ParseOptions, ResolvedOptions};
    use mdtree_core::{Preset, SyntaxTree, Token};

    fn render_with(tokens: Vec<Token>, options: ResolvedOptions) -> String {
        let tree = SyntaxTree::build(tokens).unwrap();
        Renderer::new(options).render(&tree).unwrap().html
    }

    fn inline(text: &str) -> Token {
        Token::leaf("inline", "").with_children(vec![Token::text(text)])
    }

    #[test]
    fn test_paragraph() {
        let html = render_with(
            vec![
                Token::open("paragraph", "p"),
                inline("a < b"),
                Token::close("paragraph", "p"),
            ],
            ResolvedOptions::default(),
        );
        assert_eq!(html, "<p>a &lt; b</p>\n");
    }

    #[test]
    fn test_hidden_paragraph() {
        let html = render_with(
            vec![
                Token::open("paragraph", "p").with_hidden(true),
                inline("tight"),
                Token::close("paragraph", "p").with_hidden(true),
            ],
            ResolvedOptions::default(),
        );
        assert_eq!(html, "tight");
    }

    #[test]
    fn test_hr_xhtml() {
        let tokens = vec![Token::leaf("hr", "hr")];
        assert_eq!(render_with(tokens.clone(), ResolvedOptions::default()), "<hr>\n");

        let xhtml = ParseOptions::default().resolve(Preset::Commonmark);
        assert_eq!(render_with(tokens, xhtml), "<hr />\n");
    }

    #[test]
    fn test_blockquote() {
        let html = render_with(
            vec![
                Token::open("blockquote", "blockquote"),
                Token::open("paragraph", "p"),
                inline("q"),
                Token::close("paragraph", "p"),
                Token::close("blockquote", "blockquote"),
            ],
            ResolvedOptions::default(),
        );
        assert_eq!(html, "<blockquote>\n<p>q</p>\n</blockquote>\n");
    }

    #[test]
    fn test_html_block_raw() {
        let html = render_with(
            vec![Token::leaf("html_block", "").with_content("<div>x</div>\n")],
            ResolvedOptions::default(),
        );
        assert_eq!(html, "<div>x</div>\n");
    }
}
