//! List rendering.

use crate::{RenderContext, RenderError, Renderer};
use mdtree_core::SyntaxTreeNode;

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("bullet_list", bullet_list);
    renderer.insert_rule("ordered_list", ordered_list);
    renderer.insert_rule("list_item", list_item);
}

pub fn bullet_list(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<ul>\n");
    ctx.render_children(node)?;
    ctx.push("</ul>\n");
    Ok(())
}

/// `<ol>`, with a `start` attribute when the list does not start at 1.
pub fn ordered_list(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<ol");
    if let Some(start) = node.attr("start")? {
        ctx.push_attr("start", start);
    }
    ctx.push(">\n");
    ctx.render_children(node)?;
    ctx.push("</ol>\n");
    Ok(())
}

/// `<li>`. Content of a tight item stays on the `<li>` line; every
/// visible block child starts on a line of its own.
pub fn list_item(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<li>");
    for child in node.children() {
        let tight = child.node_type() == "paragraph" && child.hidden()?;
        if !tight && child.block()? {
            ctx.ensure_newline();
        }
        ctx.render_node(child)?;
    }
    ctx.push("</li>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Renderer;
    use mdtree_config::ResolvedOptions;
    use mdtree_core::{Preset, SyntaxTree};
    use mdtree_parser::Tokenizer;

    fn render(source: &str) -> String {
        let tokens = Tokenizer::new(Preset::Default, ResolvedOptions::default()).parse(source);
        let tree = SyntaxTree::build(tokens).unwrap();
        Renderer::new(ResolvedOptions::default())
            .render(&tree)
            .unwrap()
            .html
    }

    #[test]
    fn test_tight_list() {
        assert_eq!(render("- a\n- b\n"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_list() {
        assert_eq!(
            render("- a\n\n- b\n"),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        assert_eq!(
            render("- a\n  - b\n"),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_ordered_start() {
        assert_eq!(render("1. a\n"), "<ol>\n<li>a</li>\n</ol>\n");
        assert_eq!(
            render("7. a\n8. b\n"),
            "<ol start=\"7\">\n<li>a</li>\n<li>b</li>\n</ol>\n"
        );
    }
}
