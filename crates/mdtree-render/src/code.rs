//! Code rendering: inline code, indented blocks and fences.

use crate::{RenderContext, RenderError, Renderer};
use log::{trace, warn};
use mdtree_core::SyntaxTreeNode;
use mdtree_syntax::fence_language;

pub(crate) fn register(renderer: &mut Renderer) {
    renderer.insert_rule("code_inline", code_inline);
    renderer.insert_rule("code_block", code_block);
    renderer.insert_rule("fence", fence);
}

pub fn code_inline(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<code>");
    ctx.push_escaped(node.content()?);
    ctx.push("</code>");
    Ok(())
}

pub fn code_block(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    ctx.push("<pre><code>");
    ctx.push_escaped(node.content()?);
    ctx.push("</code></pre>\n");
    Ok(())
}

/// Fenced code.
///
/// With highlighting on and a language in the info string, the content is
/// highlighted and the `<pre>` takes the theme background. A highlighting
/// failure falls back to escaped text.
pub fn fence(ctx: &mut RenderContext<'_>, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
    let content = node.content()?;
    let language = fence_language(node.info()?);

    let highlighted = match (language, ctx.highlighter()) {
        (Some(lang), Some(highlighter)) => match highlighter.highlight_html(content, lang) {
            Ok(html) => {
                trace!("highlighted {} bytes of {}", content.len(), lang);
                Some((html, highlighter.background_style()))
            }
            Err(e) => {
                warn!("highlighting `{}` failed: {}", lang, e);
                None
            }
        },
        _ => None,
    };

    match &highlighted {
        Some((_, Some(background))) => {
            ctx.push("<pre style=\"");
            ctx.push(background);
            ctx.push("\">");
        }
        _ => ctx.push("<pre>"),
    }

    ctx.push("<code");
    if let Some(lang) = language {
        let class = format!("{}{}", ctx.options().lang_prefix, lang);
        ctx.push_attr("class", &class.into());
    }
    ctx.push(">");

    match highlighted {
        Some((html, _)) => ctx.push(&html),
        None => ctx.push_escaped(content),
    }
    ctx.push("</code></pre>\n");
    Ok(())
}
