//! Render errors and diagnostics.

use mdtree_core::{MdtreeError, TreeError};
use thiserror::Error;

/// Errors that stop a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A rule was registered under a name that is not `[a-z][a-z0-9_]*`.
    #[error("invalid render rule name `{0}` (expected [a-z][a-z0-9_]*)")]
    InvalidRuleName(String),

    /// A rule read token data the node does not have.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<RenderError> for MdtreeError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Tree(e) => MdtreeError::Tree(e),
            other => MdtreeError::Render(other.to_string()),
        }
    }
}

/// Problems found while rendering that do not stop it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No rule is registered for the node's type; the node was skipped.
    #[error("no render rule for type `{node_type}`{}", format_lines(.map))]
    UnknownNodeType {
        node_type: String,
        map: Option<(usize, usize)>,
    },

    /// A heading carried a tag other than `h1`..`h6`; nothing was written.
    #[error("unexpected heading tag `{tag}`")]
    UnexpectedHeadingTag { tag: String },

    /// The node sits below the render depth limit; it and its subtree were
    /// skipped.
    #[error("`{node_type}` nested too deeply{}", format_lines(.map))]
    NestingTooDeep {
        node_type: String,
        map: Option<(usize, usize)>,
    },
}

fn format_lines(map: &Option<(usize, usize)>) -> String {
    match map {
        Some((start, end)) => format!(" at lines {}-{}", start, end),
        None => String::new(),
    }
}
