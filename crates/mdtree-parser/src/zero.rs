//! Tokenizer for the `zero` preset.
//!
//! Only paragraphs, text and line breaks are recognised. Every other
//! markdown construct stays literal text.

use crate::inline::InlineRun;
use mdtree_core::Token;

/// Split `source` into blank-line separated paragraphs.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_start = 0;

    for (number, line) in source.split('\n').enumerate() {
        if line.trim().is_empty() {
            push_paragraph(&mut tokens, &block, block_start);
            block.clear();
            block_start = number + 1;
        } else {
            block.push(line);
        }
    }
    push_paragraph(&mut tokens, &block, block_start);

    tokens
}

fn push_paragraph(tokens: &mut Vec<Token>, lines: &[&str], start: usize) {
    if lines.is_empty() {
        return;
    }
    let end = start + lines.len();

    let mut run = InlineRun::new(false);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            if lines[i - 1].ends_with("  ") {
                run.hardbreak();
            } else {
                run.softbreak();
            }
        }
        run.text(line.trim());
    }

    let content = lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");

    tokens.push(
        Token::open("paragraph", "p")
            .with_map(start, end)
            .with_block(true),
    );
    tokens.push(
        Token::leaf("inline", "")
            .with_content(content)
            .with_map(start, end)
            .with_level(1)
            .with_block(true)
            .with_children(run.finish()),
    );
    tokens.push(Token::close("paragraph", "p").with_block(true));
}
