//! Inline rendering: text, emphasis, breaks, links, images and raw HTML.

use crate::{RenderContext, RenderError, Renderer};
use mdtree_core::SyntaxTreeNode;

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("text", text);
    renderer.insert_rule("em", |ctx, node| ctx.wrap_children("em", node));
    renderer.insert_rule("strong", |ctx, node| ctx.wrap_children("strong", node));
    renderer.insert_rule("s", |ctx, node| ctx.wrap_children("s", node));
    renderer.insert_rule("softbreak", softbreak);
    renderer.insert_rule("hardbreak", hardbreak);
    renderer.insert_rule("link", link);
    renderer.insert_rule("autolink", link);
    renderer.insert_rule("html_inline", html_inline);
    renderer.insert_rule("image", image);
}

pub fn text(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push_escaped(node.content()?);
    Ok(())
}

/// A newline, or `<br>` when the `breaks` option is on.
pub fn softbreak(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    if ctx.options().breaks {
        hardbreak(ctx, node)
    } else {
        ctx.push("\n");
        Ok(())
    }
}

pub fn hardbreak(ctx: &mut RenderContext<'_>, _node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    let end = ctx.void_end();
    ctx.push("<br");
    ctx.push(end);
    ctx.push("\n");
    Ok(())
}

/// `<a href title>`. Also used for autolinks.
pub fn link(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<a");
    for name in ["href", "title"] {
        if let Some(value) = node.attr(name)? {
            ctx.push_attr(name, value);
        }
    }
    ctx.push(">");
    ctx.render_children(node)?;
    ctx.push("</a>");
    Ok(())
}

/// `<img>` with the plain alt text from the node content.
pub fn image(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<img");
    if let Some(src) = node.attr("src")? {
        ctx.push_attr("src", src);
    }
    ctx.push_attr("alt", &node.content()?.into());
    if let Some(title) = node.attr("title")? {
        ctx.push_attr("title", title);
    }
    let end = ctx.void_end();
    ctx.push(end);
    Ok(())
}

/// Raw inline HTML, written as is.
pub fn html_inline(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push(node.content()?);
    Ok(())
}
