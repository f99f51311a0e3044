//! Block tokenizer.
//!
//! Walks `pulldown-cmark`'s offset event stream and emits markdown-it
//! style block tokens. Inline events between block boundaries are gathered
//! by an [`InlineRun`] and flushed as one `inline` token.

use crate::inline::{opener, InlineRun};
use crate::lines::LineIndex;
use crate::validate::validate_link;
use log::{debug, trace};
use mdtree_core::Token;
use pulldown_cmark::{
    Alignment, CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag,
    TagEnd,
};
use std::ops::Range;

/// Tokenize `source` with the given `pulldown-cmark` options.
pub fn tokenize(source: &str, options: Options, html: bool) -> Vec<Token> {
    let mut builder = BlockBuilder::new(source, html);
    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

/// A raw HTML block being collected.
struct HtmlState {
    content: String,
    range: Range<usize>,
}

/// Table layout state.
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    body_open: bool,
    column: usize,
}

struct BlockBuilder<'s> {
    source: &'s str,
    lines: LineIndex,
    html: bool,
    tokens: Vec<Token>,
    /// Open block tokens, innermost last
    stack: Vec<Token>,
    level: u32,
    run: Option<InlineRun>,
    /// Fenced or indented code block being collected
    code: Option<Token>,
    html_block: Option<HtmlState>,
    tables: Vec<TableState>,
    /// Whether each open list is ordered
    lists: Vec<bool>,
    /// Tag depth inside a rejected link or image; its events are dropped
    skipped: usize,
}

impl<'s> BlockBuilder<'s> {
    fn new(source: &'s str, html: bool) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            html,
            tokens: Vec::new(),
            stack: Vec::new(),
            level: 0,
            run: None,
            code: None,
            html_block: None,
            tables: Vec::new(),
            lists: Vec::new(),
            skipped: 0,
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        trace!("event {:?} at {:?}", event, range);

        if self.code.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some(code) = self.code.as_mut() {
                        code.content.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => self.end_code(),
                other => debug!("ignoring {:?} inside code block", other),
            }
            return;
        }

        if self.html_block.is_some() {
            match event {
                Event::Html(text) | Event::Text(text) => {
                    if let Some(state) = self.html_block.as_mut() {
                        state.content.push_str(&text);
                    }
                }
                Event::End(TagEnd::HtmlBlock) => self.end_html_block(),
                other => debug!("ignoring {:?} inside HTML block", other),
            }
            return;
        }

        if self.skipped > 0 {
            match event {
                Event::Start(_) => self.skipped += 1,
                Event::End(_) => self.skipped -= 1,
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag, range),
            Event::Text(text) => self.run(&range).text(&text),
            Event::Code(code) => {
                let markup = backtick_run(&self.source[range.clone()]);
                self.run(&range).code(&code, &markup);
            }
            Event::InlineHtml(text) => self.run(&range).html(&text),
            Event::Html(text) => {
                // Block HTML outside an HtmlBlock tag, e.g. in a tight list item
                self.html_outside_block(text, range);
            }
            Event::SoftBreak => self.run(&range).softbreak(),
            Event::HardBreak => self.run(&range).hardbreak(),
            Event::Rule => {
                self.flush();
                let markup: String = self.source[range.clone()]
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let token = Token::leaf("hr", "hr").with_markup(markup);
                self.push_leaf(token, &range);
            }
            other => debug!("unsupported event {:?}", other),
        }
    }

    fn run(&mut self, range: &Range<usize>) -> &mut InlineRun {
        let html = self.html;
        let run = self.run.get_or_insert_with(|| InlineRun::new(html));
        run.touch(range);
        run
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Emphasis => {
                let markup = marker_run(&self.source[range.clone()], 1);
                self.run(&range).open(opener("em", "em", &markup));
            }
            Tag::Strong => {
                let markup = marker_run(&self.source[range.clone()], 2);
                self.run(&range).open(opener("strong", "strong", &markup));
            }
            Tag::Strikethrough => {
                let markup = marker_run(&self.source[range.clone()], 2);
                self.run(&range).open(opener("s", "s", &markup));
            }
            Tag::Link { dest_url, .. } if !validate_link(&dest_url) => {
                self.reject_link(&dest_url, range)
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let token = link_opener(link_type, &dest_url, &title);
                self.run(&range).open(token);
            }
            Tag::Image { dest_url, .. } if !validate_link(&dest_url) => {
                self.reject_link(&dest_url, range)
            }
            Tag::Image {
                dest_url, title, ..
            } => self.run(&range).start_image(&dest_url, &title),

            Tag::Paragraph => self.open_block(Token::open("paragraph", "p"), &range),
            Tag::Heading { level, .. } => {
                let markup = heading_markup(&self.source[range.clone()], level);
                let tag = format!("h{}", level as usize);
                self.open_block(Token::open("heading", tag).with_markup(markup), &range);
            }
            Tag::BlockQuote(_) => {
                self.open_block(Token::open("blockquote", "blockquote").with_markup(">"), &range)
            }
            Tag::List(start) => {
                let marker = list_marker(&self.source[range.clone()], start.is_some());
                let token = match start {
                    Some(n) => {
                        let mut token = Token::open("ordered_list", "ol").with_markup(marker);
                        if n != 1 {
                            token.attr_push("start", n as i64);
                        }
                        token
                    }
                    None => Token::open("bullet_list", "ul").with_markup(marker),
                };
                self.lists.push(start.is_some());
                self.open_block(token, &range);
            }
            Tag::Item => {
                let item = &self.source[range.clone()];
                let ordered = self.lists.last().copied().unwrap_or(false);
                let mut token =
                    Token::open("list_item", "li").with_markup(list_marker(item, ordered));
                if ordered {
                    token = token.with_info(item_number(item));
                }
                self.open_block(token, &range);
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let token = match kind {
                    CodeBlockKind::Fenced(info) => Token::leaf("fence", "code")
                        .with_info(info.trim())
                        .with_markup(fence_markup(&self.source[range.clone()])),
                    CodeBlockKind::Indented => Token::leaf("code_block", "code"),
                };
                let (start, end) = self.lines.map(&range);
                let token = token
                    .with_map(start, end)
                    .with_level(self.level)
                    .with_block(true);
                self.code = Some(token);
            }
            Tag::HtmlBlock => {
                self.flush();
                self.html_block = Some(HtmlState {
                    content: String::new(),
                    range,
                });
            }
            Tag::Table(alignments) => {
                self.tables.push(TableState {
                    alignments,
                    in_head: false,
                    body_open: false,
                    column: 0,
                });
                self.open_block(Token::open("table", "table"), &range);
            }
            Tag::TableHead => {
                self.open_block(Token::open("thead", "thead"), &range);
                if let Some(table) = self.tables.last_mut() {
                    table.in_head = true;
                    table.column = 0;
                }
                self.open_block(Token::open("tr", "tr"), &range);
            }
            Tag::TableRow => {
                let needs_body = self.tables.last().is_some_and(|t| !t.body_open);
                if needs_body {
                    let (start, _) = self.lines.map(&range);
                    let table_end = self
                        .stack
                        .iter()
                        .rev()
                        .find(|t| t.ty == "table_open")
                        .and_then(|t| t.map)
                        .map(|(_, end)| end);
                    self.flush();
                    let body = Token::open("tbody", "tbody")
                        .with_map(start, table_end.unwrap_or(start + 1))
                        .with_level(self.level)
                        .with_block(true);
                    self.push_open(body);
                    if let Some(table) = self.tables.last_mut() {
                        table.body_open = true;
                    }
                }
                if let Some(table) = self.tables.last_mut() {
                    table.column = 0;
                }
                self.open_block(Token::open("tr", "tr"), &range);
            }
            Tag::TableCell => {
                let (name, column, alignment) = match self.tables.last_mut() {
                    Some(table) => {
                        let column = table.column;
                        table.column += 1;
                        let name = if table.in_head { "th" } else { "td" };
                        (name, column, table.alignments.get(column).copied())
                    }
                    None => ("td", 0, None),
                };
                trace!("table cell {} in column {}", name, column);
                let mut token = Token::open(name, name);
                if let Some(style) = alignment.and_then(alignment_style) {
                    token.attr_push("style", style);
                }
                self.open_block(token, &range);
            }
            other => debug!("unsupported block {:?}", other),
        }
    }

    fn end(&mut self, tag: TagEnd, range: Range<usize>) {
        match tag {
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.run(&range).close()
            }
            TagEnd::Image => self.run(&range).end_image(),

            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::TableCell => {
                self.flush();
                self.ensure_inline(&range);
                self.close_block();
            }
            TagEnd::BlockQuote(_) | TagEnd::Item => self.close_block(),
            TagEnd::List(_) => {
                self.close_block();
                self.lists.pop();
            }
            TagEnd::TableHead => {
                self.close_block();
                self.close_block();
                if let Some(table) = self.tables.last_mut() {
                    table.in_head = false;
                }
            }
            TagEnd::TableRow => self.close_block(),
            TagEnd::Table => {
                if self.tables.pop().is_some_and(|t| t.body_open) {
                    self.close_block();
                }
                self.close_block();
            }
            other => debug!("unsupported block end {:?}", other),
        }
    }

    /// Keep a link or image with a rejected destination as its source text.
    fn reject_link(&mut self, dest: &str, range: Range<usize>) {
        debug!("rejected link destination {:?}", dest);
        let source = self.source;
        self.run(&range).text(&source[range.clone()]);
        self.skipped = 1;
    }

    /// Emit an empty `inline` token for a block that has no inline content,
    /// so every paragraph, heading and cell carries exactly one.
    fn ensure_inline(&mut self, range: &Range<usize>) {
        let is_empty = self
            .tokens
            .last()
            .zip(self.stack.last())
            .is_some_and(|(last, open)| last.ty == open.ty && last.nesting == open.nesting);
        if is_empty {
            let (start, end) = self.lines.map(range);
            let inline = Token::leaf("inline", "")
                .with_map(start, end)
                .with_level(self.level)
                .with_block(true)
                .with_children(Vec::new());
            self.tokens.push(inline);
        }
    }

    /// Push an opening block token and enter it.
    fn open_block(&mut self, token: Token, range: &Range<usize>) {
        self.flush();
        let (start, end) = self.lines.map(range);
        let token = token
            .with_map(start, end)
            .with_level(self.level)
            .with_block(true);
        self.push_open(token);
    }

    fn push_open(&mut self, token: Token) {
        trace!("open {} at level {}", token.ty, token.level);
        self.level += 1;
        self.stack.push(token.clone());
        self.tokens.push(token);
    }

    /// Leave the innermost block, emitting its closing token.
    fn close_block(&mut self) {
        self.flush();
        let Some(open) = self.stack.pop() else {
            return;
        };
        self.level = self.level.saturating_sub(1);
        let name = open.ty.strip_suffix("_open").unwrap_or(&open.ty);
        let close = Token::close(name, open.tag.clone())
            .with_markup(open.markup.clone())
            .with_level(self.level)
            .with_block(true)
            .with_hidden(open.hidden);
        trace!("close {} at level {}", close.ty, close.level);
        self.tokens.push(close);
    }

    fn push_leaf(&mut self, token: Token, range: &Range<usize>) {
        let (start, end) = self.lines.map(range);
        let token = token
            .with_map(start, end)
            .with_level(self.level)
            .with_block(true);
        self.tokens.push(token);
    }

    /// Turn the pending inline run into an `inline` token.
    fn flush(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        if run.is_empty() {
            return;
        }
        let range = run.range().unwrap_or(0..0);
        let (start, end) = self.lines.map(&range);
        let content = self
            .source
            .get(range.clone())
            .unwrap_or_default()
            .trim()
            .to_string();

        // Inline content directly inside a list item belongs to a tight
        // list, which markdown-it wraps in a hidden paragraph.
        let tight = self.stack.last().is_some_and(|t| t.ty == "list_item_open");
        let mut level = self.level;
        if tight {
            let open = Token::open("paragraph", "p")
                .with_map(start, end)
                .with_level(level)
                .with_block(true)
                .with_hidden(true);
            self.tokens.push(open);
            level += 1;
        }

        let inline = Token::leaf("inline", "")
            .with_content(content)
            .with_map(start, end)
            .with_level(level)
            .with_block(true)
            .with_children(run.finish());
        self.tokens.push(inline);

        if tight {
            let close = Token::close("paragraph", "p")
                .with_level(self.level)
                .with_block(true)
                .with_hidden(true);
            self.tokens.push(close);
        }
    }

    fn end_code(&mut self) {
        if let Some(token) = self.code.take() {
            self.tokens.push(token);
        }
    }

    fn end_html_block(&mut self) {
        let Some(state) = self.html_block.take() else {
            return;
        };
        if self.html {
            let token = Token::leaf("html_block", "").with_content(state.content);
            self.push_leaf(token, &state.range);
        } else {
            self.escaped_html_paragraph(&state.content, &state.range);
        }
    }

    fn html_outside_block(&mut self, text: CowStr<'_>, range: Range<usize>) {
        if self.html {
            self.flush();
            let token = Token::leaf("html_block", "").with_content(text.to_string());
            self.push_leaf(token, &range);
        } else {
            self.run(&range).text(&text);
        }
    }

    /// With HTML disabled a raw HTML block is plain paragraph text.
    fn escaped_html_paragraph(&mut self, content: &str, range: &Range<usize>) {
        let mut run = InlineRun::new(false);
        run.touch(range);
        let lines: Vec<&str> = content.trim_end_matches('\n').split('\n').collect();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                run.softbreak();
            }
            run.text(line.trim());
        }

        let tight = self.stack.last().is_some_and(|t| t.ty == "list_item_open");
        let paragraph = Token::open("paragraph", "p").with_hidden(tight);
        let (start, end) = self.lines.map(range);
        let paragraph = paragraph
            .with_map(start, end)
            .with_level(self.level)
            .with_block(true);
        self.push_open(paragraph);
        let inline = Token::leaf("inline", "")
            .with_content(content.trim())
            .with_map(start, end)
            .with_level(self.level)
            .with_block(true)
            .with_children(run.finish());
        self.tokens.push(inline);
        self.close_block();
    }

    fn finish(mut self) -> Vec<Token> {
        self.end_code();
        self.end_html_block();
        self.flush();
        while !self.stack.is_empty() {
            self.close_block();
        }
        self.tokens
    }
}

fn link_opener(link_type: LinkType, dest: &str, title: &str) -> Token {
    let mut token = opener("link", "a", "");
    match link_type {
        LinkType::Autolink => {
            token = token.with_markup("autolink").with_info("auto");
            token.attr_push("href", dest);
        }
        LinkType::Email => {
            token = token.with_markup("autolink").with_info("auto");
            token.attr_push("href", format!("mailto:{}", dest));
        }
        _ => token.attr_push("href", dest),
    }
    if !title.is_empty() {
        token.attr_push("title", title);
    }
    token
}

/// Skip indentation and blockquote markers in front of a block.
fn block_start(source: &str) -> &str {
    source.trim_start_matches(|c: char| c.is_whitespace() || c == '>')
}

/// Markup of a heading: `#` repeated for ATX, `=` or `-` for setext.
fn heading_markup(source: &str, level: HeadingLevel) -> String {
    if block_start(source).starts_with('#') {
        return "#".repeat(level as usize);
    }
    match level {
        HeadingLevel::H1 => "=".to_string(),
        _ => "-".to_string(),
    }
}

/// Bullet character, or the delimiter of an ordered marker.
fn list_marker(source: &str, ordered: bool) -> String {
    let trimmed = block_start(source);
    if ordered {
        trimmed
            .chars()
            .find(|c| !c.is_ascii_digit())
            .map(String::from)
            .unwrap_or_else(|| ".".to_string())
    } else {
        trimmed
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Number written before an ordered item's delimiter.
fn item_number(source: &str) -> String {
    block_start(source)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}

/// Opening fence run, e.g. "```" or "~~~~".
fn fence_markup(source: &str) -> String {
    let trimmed = block_start(source);
    match trimmed.chars().next() {
        Some(c @ ('`' | '~')) => trimmed.chars().take_while(|&x| x == c).collect(),
        _ => "```".to_string(),
    }
}

fn backtick_run(source: &str) -> String {
    let run: String = source.chars().take_while(|&c| c == '`').collect();
    if run.is_empty() {
        "`".to_string()
    } else {
        run
    }
}

/// Delimiter markup for emphasis-like spans, read from the source.
fn marker_run(source: &str, width: usize) -> String {
    let marker = source.chars().next().unwrap_or('*');
    let run = source.chars().take_while(|&c| c == marker).count();
    marker.to_string().repeat(run.clamp(1, width))
}

fn alignment_style(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("text-align:left"),
        Alignment::Center => Some("text-align:center"),
        Alignment::Right => Some("text-align:right"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(source: &str) -> Vec<Token> {
        tokenize(
            source,
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
            false,
        )
    }

    fn types(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.ty.as_str()).collect()
    }

    fn children(token: &Token) -> &[Token] {
        token.children.as_deref().unwrap_or(&[])
    }

    #[test]
    fn test_paragraph() {
        let tokens = blocks("Hello *world*\n");
        assert_eq!(types(&tokens), ["paragraph_open", "inline", "paragraph_close"]);
        assert_eq!(tokens[0].map, Some((0, 1)));
        assert_eq!(tokens[1].content, "Hello *world*");
        assert_eq!(tokens[1].level, 1);
        assert_eq!(
            types(children(&tokens[1])),
            ["text", "em_open", "text", "em_close"]
        );
        assert_eq!(children(&tokens[1])[1].markup, "*");
    }

    #[test]
    fn test_atx_and_setext_headings() {
        let tokens = blocks("## Two\n\nOne\n===\n");
        assert_eq!(tokens[0].tag, "h2");
        assert_eq!(tokens[0].markup, "##");
        assert_eq!(tokens[2].markup, "##");
        assert_eq!(tokens[3].tag, "h1");
        assert_eq!(tokens[3].markup, "=");
        assert_eq!(tokens[3].map, Some((2, 4)));
    }

    #[test]
    fn test_blockquote_levels() {
        let tokens = blocks("> quote\n");
        assert_eq!(
            types(&tokens),
            [
                "blockquote_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "blockquote_close"
            ]
        );
        let levels: Vec<_> = tokens.iter().map(|t| t.level).collect();
        assert_eq!(levels, [0, 1, 2, 1, 0]);
        assert_eq!(tokens[4].markup, ">");
    }

    #[test]
    fn test_tight_list_hidden_paragraphs() {
        let tokens = blocks("- a\n- b\n");
        assert_eq!(
            types(&tokens),
            [
                "bullet_list_open",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "bullet_list_close"
            ]
        );
        assert!(tokens[2].hidden);
        assert!(tokens[4].hidden);
        assert_eq!(tokens[0].markup, "-");
        assert_eq!(tokens[3].level, 3);
    }

    #[test]
    fn test_loose_list_visible_paragraphs() {
        let tokens = blocks("- a\n\n- b\n");
        let paragraphs: Vec<_> = tokens
            .iter()
            .filter(|t| t.ty == "paragraph_open")
            .collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs.iter().all(|t| !t.hidden));
    }

    #[test]
    fn test_ordered_list_start_and_info() {
        let tokens = blocks("3) three\n4) four\n");
        assert_eq!(tokens[0].ty, "ordered_list_open");
        assert_eq!(tokens[0].markup, ")");
        assert_eq!(tokens[0].attr_get("start").and_then(|v| v.as_number()), Some(3));
        assert_eq!(tokens[1].info, "3");

        let tokens = blocks("1. one\n");
        assert!(tokens[0].attr_get("start").is_none());
    }

    #[test]
    fn test_fence() {
        let tokens = blocks("~~~rust\nfn main() {}\n~~~\n");
        assert_eq!(types(&tokens), ["fence"]);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].markup, "~~~");
        assert_eq!(tokens[0].content, "fn main() {}\n");
        assert_eq!(tokens[0].map, Some((0, 3)));
        assert!(tokens[0].block);
    }

    #[test]
    fn test_indented_code() {
        let tokens = blocks("    let x = 1;\n");
        assert_eq!(types(&tokens), ["code_block"]);
        assert_eq!(tokens[0].content, "let x = 1;\n");
    }

    #[test]
    fn test_hr_markup() {
        let tokens = blocks("***\n");
        assert_eq!(types(&tokens), ["hr"]);
        assert_eq!(tokens[0].markup, "***");
        assert_eq!(tokens[0].tag, "hr");
    }

    #[test]
    fn test_table() {
        let tokens = blocks("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        assert_eq!(
            types(&tokens)[..8],
            [
                "table_open",
                "thead_open",
                "tr_open",
                "th_open",
                "inline",
                "th_close",
                "th_open",
                "inline"
            ]
        );
        assert!(types(&tokens).contains(&"tbody_open"));
        assert_eq!(tokens.last().map(|t| t.ty.as_str()), Some("table_close"));
        assert_eq!(
            tokens[3].attr_get("style").and_then(|v| v.as_str()),
            Some("text-align:left")
        );
        assert_eq!(
            tokens[6].attr_get("style").and_then(|v| v.as_str()),
            Some("text-align:right")
        );

        let td: Vec<_> = tokens.iter().filter(|t| t.ty == "td_open").collect();
        assert_eq!(td.len(), 2);
        let balance: i32 = tokens.iter().map(|t| t.nesting as i32).sum();
        assert_eq!(balance, 0);
    }

    #[test]
    fn test_html_block_disabled() {
        let tokens = blocks("<div>\nhi\n</div>\n");
        assert_eq!(types(&tokens), ["paragraph_open", "inline", "paragraph_close"]);
        assert_eq!(
            types(children(&tokens[1])),
            ["text", "softbreak", "text", "softbreak", "text"]
        );
        assert_eq!(children(&tokens[1])[0].content, "<div>");
    }

    #[test]
    fn test_html_block_enabled() {
        let tokens = tokenize("<div>\nhi\n</div>\n", Options::empty(), true);
        assert_eq!(types(&tokens), ["html_block"]);
        assert_eq!(tokens[0].content, "<div>\nhi\n</div>\n");
    }

    #[test]
    fn test_links_and_autolinks() {
        let tokens = blocks("[x](/a \"T\") <https://b.io> <me@c.io>\n");
        let kids = children(&tokens[1]);
        let links: Vec<_> = kids.iter().filter(|t| t.ty == "link_open").collect();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].attr_get("href").and_then(|v| v.as_str()), Some("/a"));
        assert_eq!(links[0].attr_get("title").and_then(|v| v.as_str()), Some("T"));
        assert_eq!(links[1].markup, "autolink");
        assert_eq!(links[1].info, "auto");
        assert_eq!(
            links[2].attr_get("href").and_then(|v| v.as_str()),
            Some("mailto:me@c.io")
        );
        let closes: Vec<_> = kids.iter().filter(|t| t.ty == "link_close").collect();
        assert_eq!(closes[1].markup, "autolink");
    }

    #[test]
    fn test_image() {
        let tokens = blocks("![a *b*](x.png)\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["image"]);
        assert_eq!(kids[0].content, "a b");
        assert_eq!(kids[0].attr_get("src").and_then(|v| v.as_str()), Some("x.png"));
        assert_eq!(
            types(children(&kids[0])),
            ["text", "em_open", "text", "em_close"]
        );
    }

    #[test]
    fn test_script_link_kept_as_text() {
        let tokens = blocks("go [x](javascript:alert(1)) now\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["text"]);
        assert_eq!(kids[0].content, "go [x](javascript:alert(1)) now");
    }

    #[test]
    fn test_script_image_kept_as_text() {
        let tokens = blocks("![y](JAVASCRIPT:alert(2))\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["text"]);
        assert_eq!(kids[0].content, "![y](JAVASCRIPT:alert(2))");
    }

    #[test]
    fn test_script_autolink_kept_as_text() {
        let tokens = blocks("<javascript:alert(3)>\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["text"]);
        assert_eq!(kids[0].content, "<javascript:alert(3)>");
    }

    #[test]
    fn test_rejected_link_drops_nested_image() {
        let tokens = blocks("[![i](a.png) *b*](vbscript:x) [ok](/ok)\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["text", "link_open", "text", "link_close"]);
        assert_eq!(kids[0].content, "[![i](a.png) *b*](vbscript:x) ");
        assert_eq!(kids[1].attr_get("href").and_then(|v| v.as_str()), Some("/ok"));
    }

    #[test]
    fn test_data_image_allowed() {
        let tokens = blocks("![p](data:image/png;base64,AAAA)\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["image"]);
    }

    #[test]
    fn test_code_inline_and_breaks() {
        let tokens = blocks("``a`b``  \nnext\nlast\n");
        let kids = children(&tokens[1]);
        assert_eq!(
            types(kids),
            ["code_inline", "hardbreak", "text", "softbreak", "text"]
        );
        assert_eq!(kids[0].markup, "``");
        assert_eq!(kids[0].content, "a`b");
    }

    #[test]
    fn test_strikethrough() {
        let tokens = blocks("~~gone~~\n");
        let kids = children(&tokens[1]);
        assert_eq!(types(kids), ["s_open", "text", "s_close"]);
        assert_eq!(kids[0].markup, "~~");
        assert_eq!(kids[0].tag, "s");
    }

    #[test]
    fn test_empty_heading_gets_inline() {
        let tokens = blocks("#\n");
        assert_eq!(types(&tokens), ["heading_open", "inline", "heading_close"]);
        assert_eq!(tokens[1].content, "");
        assert_eq!(tokens[1].children.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn test_stream_is_balanced() {
        let source = "# T\n\n> - a\n>   1. b\n\n| x |\n|---|\n| y |\n\n```\nc\n```\n";
        let tokens = blocks(source);
        let mut depth = 0i32;
        for token in &tokens {
            depth += token.nesting as i32;
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }
}
