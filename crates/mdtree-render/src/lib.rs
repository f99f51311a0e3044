//! mdtree Render
//!
//! This crate renders an mdtree [`SyntaxTree`] to HTML through a table of
//! per-node-type rules.
//!
//! # Features
//!
//! - **Rule table** - One handler per node type, replaceable at runtime
//! - **Non-fatal unknown types** - Missing rules become [`Diagnostic`]s
//! - **Syntax highlighting** - Fenced code through `mdtree-syntax`
//! - **markdown-it options** - `breaks`, `xhtmlOut` and `langPrefix`
//!
//! # Example
//!
//! ```
//! use mdtree_config::ParseOptions;
//! use mdtree_core::Preset;
//! use mdtree_render::render_markdown;
//!
//! let rendered = render_markdown(
//!     "Hello *world*",
//!     Preset::Default,
//!     &ParseOptions::default(),
//!     "InspiredGitHub",
//! )
//! .unwrap();
//! assert_eq!(rendered.html, "<p>Hello <em>world</em></p>\n");
//! assert!(rendered.diagnostics.is_empty());
//! ```

pub mod block;
pub mod code;
pub mod error;
pub mod heading;
pub mod list;
pub mod table;
pub mod text;

pub use error::{Diagnostic, RenderError};

use log::{debug, error};
use mdtree_config::{ParseOptions, ResolvedOptions, DEFAULT_THEME};
use mdtree_core::{AttrValue, Preset, SyntaxTree, SyntaxTreeNode};
use mdtree_parser::Tokenizer;
use mdtree_syntax::Highlighter;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Valid rule names: lowercase, starting with a letter.
static RULE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// A render rule: writes one node (and usually its children) into the
/// context.
pub type Rule =
    Box<dyn Fn(&mut RenderContext<'_>, SyntaxTreeNode<'_>) -> Result<(), RenderError> + Send + Sync>;

/// Deepest node the renderer descends into. Subtrees below it are skipped
/// and reported as [`Diagnostic::NestingTooDeep`].
pub const MAX_RENDER_DEPTH: usize = 100;

/// Names of the rules every renderer starts with.
pub const BASE_RULES: [&str; 28] = [
    "paragraph",
    "inline",
    "text",
    "bullet_list",
    "ordered_list",
    "list_item",
    "em",
    "softbreak",
    "hardbreak",
    "strong",
    "blockquote",
    "hr",
    "code_inline",
    "code_block",
    "fence",
    "heading",
    "link",
    "autolink",
    "html_inline",
    "html_block",
    "image",
    "s",
    "table",
    "thead",
    "tbody",
    "tr",
    "td",
    "th",
];

/// Output of a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// HTML renderer.
pub struct Renderer {
    rules: HashMap<String, Rule>,
    options: ResolvedOptions,
    highlighter: Option<Highlighter>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rules: Vec<_> = self.rules.keys().collect();
        rules.sort();
        f.debug_struct("Renderer")
            .field("rules", &rules)
            .field("options", &self.options)
            .field("highlighter", &self.highlighter)
            .finish()
    }
}

impl Renderer {
    /// Create a renderer with the base rules and the default theme.
    pub fn new(options: ResolvedOptions) -> Self {
        Self::with_theme(options, DEFAULT_THEME)
    }

    /// Create a renderer with the base rules, highlighting fences with
    /// `theme` when `options.highlighting` is set.
    pub fn with_theme(options: ResolvedOptions, theme: &str) -> Self {
        let highlighter = options.highlighting.then(|| Highlighter::with_theme(theme));
        let mut renderer = Self {
            rules: HashMap::new(),
            options,
            highlighter,
        };

        block::register(&mut renderer);
        heading::register(&mut renderer);
        list::register(&mut renderer);
        table::register(&mut renderer);
        code::register(&mut renderer);
        text::register(&mut renderer);

        debug!("Renderer ready with {} rules", renderer.rules.len());
        renderer
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn highlighter(&self) -> Option<&Highlighter> {
        self.highlighter.as_ref()
    }

    /// Register a rule for a node type, replacing any existing one.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidRuleName`] unless `name` matches
    /// `[a-z][a-z0-9_]*`.
    pub fn register<F>(&mut self, name: &str, rule: F) -> Result<(), RenderError>
    where
        F: Fn(&mut RenderContext<'_>, SyntaxTreeNode<'_>) -> Result<(), RenderError>
            + Send
            + Sync
            + 'static,
    {
        if !RULE_NAME_RE.is_match(name) {
            return Err(RenderError::InvalidRuleName(name.to_string()));
        }
        self.insert_rule(name, rule);
        Ok(())
    }

    /// Install a rule whose name is known to be valid.
    pub(crate) fn insert_rule<F>(&mut self, name: &str, rule: F)
    where
        F: Fn(&mut RenderContext<'_>, SyntaxTreeNode<'_>) -> Result<(), RenderError>
            + Send
            + Sync
            + 'static,
    {
        if self.rules.insert(name.to_string(), Box::new(rule)).is_some() {
            debug!("replaced render rule `{}`", name);
        }
    }

    /// Remove a rule. Returns whether one was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.rules.remove(name).is_some()
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The rule a node dispatches to. Autolinks use the `autolink` rule
    /// when one is registered.
    pub fn rule_name<'t>(&self, node: SyntaxTreeNode<'t>) -> &'t str {
        let node_type = node.node_type();
        if node_type == "link"
            && node.markup().is_ok_and(|m| m == "autolink")
            && self.has_rule("autolink")
        {
            return "autolink";
        }
        node_type
    }

    /// Render a whole tree.
    pub fn render(&self, tree: &SyntaxTree) -> Result<Rendered, RenderError> {
        let mut ctx = RenderContext::new(self);
        ctx.render_children(tree.root())?;
        Ok(ctx.finish())
    }

    /// Render a single node. Rendering the root renders its children.
    pub fn render_node(&self, node: SyntaxTreeNode<'_>) -> Result<Rendered, RenderError> {
        let mut ctx = RenderContext::new(self);
        if node.is_root() {
            ctx.render_children(node)?;
        } else {
            ctx.render_node(node)?;
        }
        Ok(ctx.finish())
    }
}

/// State threaded through the rules during one render.
pub struct RenderContext<'r> {
    renderer: &'r Renderer,
    out: String,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'r> RenderContext<'r> {
    fn new(renderer: &'r Renderer) -> Self {
        Self {
            renderer,
            out: String::new(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> &'r ResolvedOptions {
        &self.renderer.options
    }

    pub fn highlighter(&self) -> Option<&'r Highlighter> {
        self.renderer.highlighter.as_ref()
    }

    /// HTML written so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn push(&mut self, html: &str) {
        self.out.push_str(html);
    }

    /// Append text with `&`, `<` and `>` escaped.
    pub fn push_escaped(&mut self, text: &str) {
        self.out.push_str(&html_escape::encode_text(text));
    }

    /// Append ` name="value"` with the value escaped.
    pub fn push_attr(&mut self, name: &str, value: &AttrValue) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out
            .push_str(&html_escape::encode_double_quoted_attribute(&value.to_string()));
        self.out.push('"');
    }

    /// End of a void element: `>` or ` />` with `xhtmlOut`.
    pub fn void_end(&self) -> &'static str {
        if self.options().xhtml_out {
            " />"
        } else {
            ">"
        }
    }

    /// Start a new line unless the output is empty or already ends in one.
    pub fn ensure_newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Dispatch one node to its rule.
    ///
    /// A node without a rule is skipped and recorded as
    /// [`Diagnostic::UnknownNodeType`]. Nodes nested deeper than
    /// [`MAX_RENDER_DEPTH`] are skipped with their subtree.
    pub fn render_node(&mut self, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
        let renderer = self.renderer;
        let name = renderer.rule_name(node);

        if self.depth >= MAX_RENDER_DEPTH {
            error!("skipping `{}` nested deeper than {} levels", name, MAX_RENDER_DEPTH);
            self.diagnose(Diagnostic::NestingTooDeep {
                node_type: name.to_string(),
                map: node.map().ok().flatten(),
            });
            return Ok(());
        }

        match renderer.rules.get(name) {
            Some(rule) => {
                self.depth += 1;
                let result = rule(self, node);
                self.depth -= 1;
                result
            }
            None => {
                error!("no render rule for type {}", name);
                self.diagnose(Diagnostic::UnknownNodeType {
                    node_type: name.to_string(),
                    map: node.map().ok().flatten(),
                });
                Ok(())
            }
        }
    }

    /// Render every child of `node` in order.
    pub fn render_children(&mut self, node: SyntaxTreeNode<'_>) -> Result<(), RenderError> {
        for child in node.children() {
            self.render_node(child)?;
        }
        Ok(())
    }

    /// Write `<tag>`, the children, then `</tag>`.
    pub fn wrap_children(
        &mut self,
        tag: &str,
        node: SyntaxTreeNode<'_>,
    ) -> Result<(), RenderError> {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.render_children(node)?;
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        Ok(())
    }

    fn finish(self) -> Rendered {
        Rendered {
            html: self.out,
            diagnostics: self.diagnostics,
        }
    }
}

/// Tokenize, build and render `source` in one call.
///
/// `options` are resolved against `preset`; `theme` picks the highlighting
/// theme when highlighting is enabled.
pub fn render_markdown(
    source: &str,
    preset: Preset,
    options: &ParseOptions,
    theme: &str,
) -> mdtree_core::Result<Rendered> {
    let resolved = options.resolve(preset);
    let tokens = Tokenizer::new(preset, resolved.clone()).parse(source);
    let tree = SyntaxTree::build(tokens)?;
    debug!("Built tree with {} nodes", tree.len());

    let renderer = Renderer::with_theme(resolved, theme);
    let rendered = renderer.render(&tree)?;
    for diagnostic in &rendered.diagnostics {
        debug!("render diagnostic: {}", diagnostic);
    }
    Ok(rendered)
}
