//! Markdown-subset renderer for assistant turns.
//!
//! A two-stage pipeline: escape the HTML-significant characters first, then
//! tokenize the escaped text against a small grammar (bold, inline code,
//! bullet list, paragraph, blank line) and wrap the tokens. Escaping before
//! tokenizing means injected markup can never survive, and the generated
//! tags are never themselves escaped.

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Code(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    List(Vec<Vec<Inline>>),
}

/// Stage one. Ampersand must go first or the other escapes double up.
pub fn escape(text: &str) -> String {
    return text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
}

fn find_from(chars: &[char], pattern: &[char], start: usize) -> Option<usize> {
    if pattern.is_empty() || chars.len() < pattern.len() {
        return None;
    }

    let mut idx = start;
    while idx + pattern.len() <= chars.len() {
        if &chars[idx..idx + pattern.len()] == pattern {
            return Some(idx);
        }
        idx += 1;
    }

    return None;
}

/// Inline tokenizer for a single line of escaped text. Delimiters only take
/// effect as complete pairs; an unterminated `**` or backtick stays literal.
/// Whichever delimiter opens first wins, so bold markers inside a code span
/// are left alone.
fn parse_inlines(line: &str) -> Vec<Inline> {
    let chars = line.chars().collect::<Vec<char>>();
    let mut inlines: Vec<Inline> = vec![];
    let mut text = String::new();
    let mut idx = 0;

    let flush = |text: &mut String, inlines: &mut Vec<Inline>| {
        if !text.is_empty() {
            inlines.push(Inline::Text(text.clone()));
            text.clear();
        }
    };

    while idx < chars.len() {
        if chars[idx] == '`' {
            if let Some(close) = find_from(&chars, &['`'], idx + 1) {
                // Empty code spans stay literal.
                if close > idx + 1 {
                    flush(&mut text, &mut inlines);
                    inlines.push(Inline::Code(chars[idx + 1..close].iter().collect()));
                    idx = close + 1;
                    continue;
                }
            }
            text.push('`');
            idx += 1;
            continue;
        }

        if chars[idx] == '*' && idx + 1 < chars.len() && chars[idx + 1] == '*' {
            if let Some(close) = find_from(&chars, &['*', '*'], idx + 2) {
                flush(&mut text, &mut inlines);
                inlines.push(Inline::Bold(chars[idx + 2..close].iter().collect()));
                idx = close + 2;
                continue;
            }
            text.push_str("**");
            idx += 2;
            continue;
        }

        text.push(chars[idx]);
        idx += 1;
    }

    flush(&mut text, &mut inlines);
    return inlines;
}

/// Stage two. Consecutive `* ` lines collapse into a single list block;
/// blank lines separate blocks and produce no output of their own. The
/// caller decides whether the input was escaped: markup generation runs
/// stage one first, terminal display tokenizes the raw text.
pub fn tokenize(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = vec![];
    let mut items: Vec<Vec<Inline>> = vec![];

    for line in text.split('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("* ") {
            items.push(parse_inlines(&trimmed[2..]));
            continue;
        }

        if !items.is_empty() {
            blocks.push(Block::List(std::mem::take(&mut items)));
        }

        if line.trim().is_empty() {
            continue;
        }

        blocks.push(Block::Paragraph(parse_inlines(line)));
    }

    if !items.is_empty() {
        blocks.push(Block::List(items));
    }

    return blocks;
}

/// Both stages: escape, then tokenize.
pub fn parse(text: &str) -> Vec<Block> {
    return tokenize(&escape(text));
}

fn inlines_to_markup(inlines: &[Inline]) -> String {
    return inlines
        .iter()
        .map(|inline| {
            match inline {
                Inline::Text(text) => return text.to_string(),
                Inline::Bold(text) => return format!("<strong>{text}</strong>"),
                Inline::Code(text) => return format!("<code>{text}</code>"),
            }
        })
        .collect::<Vec<String>>()
        .join("");
}

/// Sanitized display markup for a turn's text.
pub fn to_markup(text: &str) -> String {
    return parse(text)
        .iter()
        .map(|block| {
            match block {
                Block::Paragraph(inlines) => {
                    return format!("<p>{}</p>", inlines_to_markup(inlines));
                }
                Block::List(items) => {
                    let list_items = items
                        .iter()
                        .map(|item| return format!("<li>{}</li>", inlines_to_markup(item)))
                        .collect::<Vec<String>>()
                        .join("");
                    return format!("<ul>{list_items}</ul>");
                }
            }
        })
        .collect::<Vec<String>>()
        .join("");
}
