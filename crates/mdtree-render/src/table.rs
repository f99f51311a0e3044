//! Table rendering.

use crate::{RenderContext, RenderError, Renderer};
use mdtree_core::SyntaxTreeNode;

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("table", |ctx, node| section(ctx, node, "table"));
    renderer.insert_rule("thead", |ctx, node| section(ctx, node, "thead"));
    renderer.insert_rule("tbody", |ctx, node| section(ctx, node, "tbody"));
    renderer.insert_rule("tr", |ctx, node| section(ctx, node, "tr"));
    renderer.insert_rule("th", |ctx, node| cell(ctx, node, "th"));
    renderer.insert_rule("td", |ctx, node| cell(ctx, node, "td"));
}

/// Table structure element: the tag on its own line, then the children.
fn section(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>, tag: &str) -> Result<(), RenderError> {
    ctx.push("<");
    ctx.push(tag);
    ctx.push(">\n");
    ctx.render_children(node)?;
    ctx.push("</");
    ctx.push(tag);
    ctx.push(">\n");
    Ok(())
}

/// A cell, keeping the column alignment from its `style` attribute.
fn cell(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>, tag: &str) -> Result<(), RenderError> {
    ctx.push("<");
    ctx.push(tag);
    if let Some(style) = node.attr("style")? {
        ctx.push_attr("style", style);
    }
    ctx.push(">");
    ctx.render_children(node)?;
    ctx.push("</");
    ctx.push(tag);
    ctx.push(">\n");
    Ok(())
}
