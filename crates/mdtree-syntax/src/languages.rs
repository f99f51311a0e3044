//! Fence info aliases.
//!
//! Maps the language names people write after a fence (`py`, `js`, `sh`)
//! to syntect syntax names.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Syntax name followed by the lowercase aliases that select it.
const ALIAS_GROUPS: &[(&str, &[&str])] = &[
    ("Python", &["python", "py", "py3", "python3", "gyp"]),
    ("JavaScript", &["javascript", "js", "jsx", "mjs", "cjs", "node"]),
    ("TypeScript", &["typescript", "ts", "tsx"]),
    ("Rust", &["rust", "rs"]),
    (
        "Bourne Again Shell (bash)",
        &["bash", "sh", "shell", "zsh", "console", "shellsession"],
    ),
    ("C", &["c", "h"]),
    ("C++", &["cpp", "c++", "cc", "cxx", "hpp", "hxx"]),
    ("C#", &["csharp", "cs", "c#"]),
    ("Go", &["go", "golang"]),
    ("Java", &["java"]),
    ("Ruby", &["ruby", "rb", "gemfile", "rake"]),
    ("PHP", &["php"]),
    ("Perl", &["perl", "pl", "pm"]),
    ("Lua", &["lua"]),
    ("Haskell", &["haskell", "hs"]),
    ("Scala", &["scala", "sbt"]),
    ("Clojure", &["clojure", "clj", "edn"]),
    ("Erlang", &["erlang", "erl"]),
    ("OCaml", &["ocaml", "ml"]),
    ("Lisp", &["lisp", "elisp", "emacs-lisp"]),
    ("Objective-C", &["objective-c", "objc", "m"]),
    ("R", &["r"]),
    ("D", &["d"]),
    ("Groovy", &["groovy", "gradle"]),
    ("HTML", &["html", "htm", "xhtml"]),
    ("CSS", &["css"]),
    ("XML", &["xml", "svg", "xsd", "plist"]),
    ("JSON", &["json", "jsonc"]),
    ("YAML", &["yaml", "yml"]),
    ("SQL", &["sql"]),
    ("Markdown", &["markdown", "md", "mkd"]),
    ("Makefile", &["makefile", "make", "mk"]),
    ("Diff", &["diff", "patch"]),
    ("Batch File", &["batch", "bat", "cmd"]),
    ("LaTeX", &["latex", "tex"]),
    ("Graphviz (DOT)", &["dot", "graphviz"]),
    ("Regular Expression", &["regex", "regexp"]),
    ("Plain Text", &["text", "txt", "plain", "plaintext"]),
];

/// Lowercase alias to canonical syntect syntax name.
pub static LANGUAGE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        ALIAS_GROUPS
            .iter()
            .flat_map(|(name, aliases)| aliases.iter().map(move |alias| (*alias, *name)))
            .collect()
    });

/// Resolve an alias to its syntax name. Unknown names are returned as
/// given.
pub fn language_alias(name: &str) -> &str {
    LANGUAGE_ALIASES
        .get(name.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(name)
}

/// Aliases registered for a syntax name, sorted.
pub fn aliases_for(syntax_name: &str) -> Vec<&'static str> {
    let mut aliases: Vec<_> = ALIAS_GROUPS
        .iter()
        .filter(|(name, _)| *name == syntax_name)
        .flat_map(|(_, aliases)| aliases.iter().copied())
        .collect();
    aliases.sort_unstable();
    aliases
}

/// The language named by a fence info string: its first word.
pub fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(language_alias("py"), "Python");
        assert_eq!(language_alias("JS"), "JavaScript");
        assert_eq!(language_alias("zsh"), "Bourne Again Shell (bash)");
        assert_eq!(language_alias("c++"), "C++");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(language_alias("brainfuck"), "brainfuck");
    }

    #[test]
    fn test_aliases_for() {
        assert_eq!(aliases_for("Rust"), ["rs", "rust"]);
        assert!(aliases_for("Nothing").is_empty());
    }

    #[test]
    fn test_no_alias_registered_twice() {
        let total: usize = ALIAS_GROUPS.iter().map(|(_, a)| a.len()).sum();
        assert_eq!(LANGUAGE_ALIASES.len(), total);
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust ignore"), Some("rust"));
        assert_eq!(fence_language("  python"), Some("python"));
        assert_eq!(fence_language("   "), None);
    }
}
