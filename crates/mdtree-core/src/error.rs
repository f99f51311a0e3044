//! Error types for mdtree

use thiserror::Error;

/// Errors raised while building or querying a syntax tree.
///
/// All of these indicate malformed input or a programming error; none of
/// them are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A non-root node was built from a span whose nesting does not balance.
    #[error("unequal nesting level at the start and end of token stream (starting at `{token_type}`)")]
    UnbalancedNesting { token_type: String },

    /// An opening token was never closed before the input ran out.
    #[error("unclosed tokens starting `{token_type}`{}", format_map(.map))]
    UnclosedToken {
        token_type: String,
        map: Option<(usize, usize)>,
    },

    /// A token with a nesting other than 0 or +1 appeared where an opening
    /// or self-contained token was expected.
    #[error("invalid token nesting {nesting} for `{token_type}`")]
    InvalidNesting { token_type: String, nesting: i8 },

    /// A non-root node was built from zero tokens.
    #[error("can only create root from empty token sequence")]
    EmptyNonRootInput,

    /// A token attribute was read from the root node.
    #[error("root node has no attribute data (accessed `{attribute}`)")]
    MissingAttributeData { attribute: &'static str },
}

fn format_map(map: &Option<(usize, usize)>) -> String {
    match map {
        Some((start, end)) => format!(" at lines {}-{}", start, end),
        None => String::new(),
    }
}

/// Main error type for mdtree operations
#[derive(Error, Debug)]
pub enum MdtreeError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed token stream
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Tokenizer error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Render error during output generation
    #[error("Render error: {0}")]
    Render(String),

    /// Syntax highlighting error
    #[error("Highlight error: {0}")]
    Highlight(String),
}

/// Result type alias for mdtree operations
pub type Result<T> = std::result::Result<T, MdtreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_message_names_token() {
        let err = TreeError::UnclosedToken {
            token_type: "paragraph_open".to_string(),
            map: Some((0, 1)),
        };
        assert_eq!(
            err.to_string(),
            "unclosed tokens starting `paragraph_open` at lines 0-1"
        );

        let err = TreeError::UnclosedToken {
            token_type: "em_open".to_string(),
            map: None,
        };
        assert_eq!(err.to_string(), "unclosed tokens starting `em_open`");
    }

    #[test]
    fn test_tree_error_converts() {
        let err: MdtreeError = TreeError::EmptyNonRootInput.into();
        assert!(matches!(err, MdtreeError::Tree(TreeError::EmptyNonRootInput)));
        assert!(err.to_string().starts_with("Tree error:"));
    }

    #[test]
    fn test_missing_attribute_message() {
        let err = TreeError::MissingAttributeData { attribute: "tag" };
        assert!(err.to_string().contains("no attribute data"));
        assert!(err.to_string().contains("tag"));
    }
}
