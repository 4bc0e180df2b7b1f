//! Markdown <-> HTML for the converter pair page.
//!
//! Markdown is read line by line into blocks (headings, paragraphs, lists,
//! quotes, fenced code, rules); inline spans are rewritten with regexes.
//! HTML goes the other way through an ordered chain of tag rewrites with
//! ATX headings and fenced code blocks.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{Result, ToolError};

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            cached(&RE, $re)
        }
    };
}

pattern!(list_marker, r"^(?:([-*+])|(\d{1,9})[.)])\s+(.*)$");
pattern!(code_span, r"`([^`]+)`");
pattern!(image_span, r"!\[([^\]]*)\]\(([^)\s]+)\)");
pattern!(link_span, r"\[([^\]]+)\]\(([^)\s]+)\)");
pattern!(strong_span, r"\*\*([^*]+)\*\*|__([^_]+)__");
pattern!(em_span, r"\*([^*\s](?:[^*]*[^*\s])?)\*|\b_([^_]+)_\b");

pattern!(open_tag_at_end, r"<[A-Za-z/!][^>]*$");
pattern!(script_tag, r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)>");
pattern!(
    pre_block,
    r"(?is)<pre\b[^>]*>\s*<code\b([^>]*)>(.*?)</code>\s*</pre>"
);
pattern!(language_class, r#"language-([A-Za-z0-9_+-]+)"#);
pattern!(heading_tag, r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]>");
pattern!(quote_tag, r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>");
pattern!(list_tag, r"(?is)<(ul|ol)\b[^>]*>(.*?)</(?:ul|ol)>");
pattern!(item_tag, r"(?is)<li\b[^>]*>(.*?)</li>");
pattern!(rule_tag, r"(?i)<hr\b[^>]*>");
pattern!(break_tag, r"(?i)<br\b[^>]*>");
pattern!(block_tag, r"(?is)<(?:p|div)\b[^>]*>(.*?)</(?:p|div)>");
pattern!(strong_tag, r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)>");
pattern!(em_tag, r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)>");
pattern!(code_tag, r"(?is)<code\b[^>]*>(.*?)</code>");
pattern!(
    link_tag,
    r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#
);
pattern!(image_tag, r"(?i)<img\b[^>]*>");
pattern!(src_attr, r#"(?i)\bsrc\s*=\s*["']([^"']*)["']"#);
pattern!(alt_attr, r#"(?i)\balt\s*=\s*["']([^"']*)["']"#);
pattern!(any_tag, r"(?s)<[^>]+>");

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn unescape_html(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn group<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map_or("", |m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Fence(&'a str),
    Heading(usize, &'a str),
    Rule,
    Quote(&'a str),
    Item(ListKind, u64, &'a str),
    Text(&'a str),
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    let spaced = matches!(line.as_bytes().get(hashes), None | Some(b' ' | b'\t'));
    ((1..=6).contains(&hashes) && spaced).then_some(hashes)
}

fn is_rule(line: &str) -> bool {
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_')
        && marks.iter().all(|c| *c == marks[0])
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if let Some(info) = line.strip_prefix("```") {
        return Line::Fence(info.trim());
    }
    if let Some(level) = heading_level(line) {
        return Line::Heading(level, line[level..].trim());
    }
    if is_rule(line) {
        return Line::Rule;
    }
    if let Some(rest) = line.strip_prefix('>') {
        return Line::Quote(rest.strip_prefix(' ').unwrap_or(rest));
    }
    if let Some(caps) = list_marker().captures(line) {
        let text = caps.get(3).map_or("", |m| m.as_str());
        return match caps.get(2) {
            Some(num) => Line::Item(
                ListKind::Ordered,
                num.as_str().parse().unwrap_or(1),
                text,
            ),
            None => Line::Item(ListKind::Bullet, 1, text),
        };
    }
    Line::Text(raw.trim_start())
}

/// Escapes text and rewrites images, links, strong and emphasis. Code
/// spans are cut out first so their contents stay literal.
fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for caps in code_span().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&render_spans(&text[last..whole.start()]));
        out.push_str("<code>");
        out.push_str(&escape_html(group(&caps, 1).trim()));
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&render_spans(&text[last..]));
    out
}

fn render_spans(text: &str) -> String {
    let escaped = escape_html(text);
    let with_images = image_span().replace_all(&escaped, r#"<img src="${2}" alt="${1}">"#);
    let with_links = link_span().replace_all(&with_images, r#"<a href="${2}">${1}</a>"#);
    let with_strong = strong_span().replace_all(&with_links, "<strong>${1}${2}</strong>");
    em_span()
        .replace_all(&with_strong, "<em>${1}${2}</em>")
        .into_owned()
}

#[derive(Debug, Default)]
struct HtmlWriter {
    out: String,
    paragraph: Vec<String>,
    list: Option<(ListKind, u64, Vec<String>)>,
    quote: Vec<String>,
    fence: Option<(String, Vec<String>)>,
}

impl HtmlWriter {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.paragraph);
        let last = lines.len() - 1;
        let body: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let hard_break = idx < last && line.ends_with("  ");
                let rendered = render_inline(line.trim_end());
                if hard_break {
                    format!("{rendered}<br>")
                } else {
                    rendered
                }
            })
            .collect();
        self.out.push_str(&format!("<p>{}</p>\n", body.join("\n")));
    }

    fn flush_list(&mut self) {
        let Some((kind, start, items)) = self.list.take() else {
            return;
        };
        let (open, close) = match kind {
            ListKind::Bullet => ("<ul>".to_string(), "</ul>"),
            ListKind::Ordered if start != 1 => (format!("<ol start=\"{start}\">"), "</ol>"),
            ListKind::Ordered => ("<ol>".to_string(), "</ol>"),
        };
        self.out.push_str(&open);
        self.out.push('\n');
        for item in items {
            self.out.push_str(&format!("<li>{}</li>\n", render_inline(&item)));
        }
        self.out.push_str(close);
        self.out.push('\n');
    }

    fn flush_quote(&mut self) {
        if self.quote.is_empty() {
            return;
        }
        let inner = std::mem::take(&mut self.quote).join("\n");
        self.out.push_str("<blockquote>\n");
        self.out.push_str(&markdown_to_html(&inner));
        self.out.push_str("</blockquote>\n");
    }

    fn flush_blocks(&mut self) {
        self.flush_paragraph();
        self.flush_list();
        self.flush_quote();
    }

    fn close_fence(&mut self) {
        let Some((info, lines)) = self.fence.take() else {
            return;
        };
        match info.split_whitespace().next() {
            Some(lang) => self.out.push_str(&format!(
                "<pre><code class=\"language-{}\">",
                escape_html(lang)
            )),
            None => self.out.push_str("<pre><code>"),
        }
        for line in lines {
            self.out.push_str(&escape_html(&line));
            self.out.push('\n');
        }
        self.out.push_str("</code></pre>\n");
    }

    fn feed(&mut self, raw: &str) {
        if self.fence.is_some() {
            if raw.trim_start().starts_with("```") {
                self.close_fence();
            } else if let Some((_, body)) = &mut self.fence {
                body.push(raw.to_string());
            }
            return;
        }
        match classify(raw) {
            Line::Blank => self.flush_blocks(),
            Line::Fence(info) => {
                self.flush_blocks();
                self.fence = Some((info.to_string(), Vec::new()));
            }
            Line::Heading(level, text) => {
                self.flush_blocks();
                self.out.push_str(&format!(
                    "<h{level}>{}</h{level}>\n",
                    render_inline(text)
                ));
            }
            Line::Rule => {
                self.flush_blocks();
                self.out.push_str("<hr>\n");
            }
            Line::Quote(text) => {
                self.flush_paragraph();
                self.flush_list();
                self.quote.push(text.to_string());
            }
            Line::Item(kind, start, text) => {
                self.flush_paragraph();
                self.flush_quote();
                if self.list.as_ref().is_some_and(|(open, _, _)| *open != kind) {
                    self.flush_list();
                }
                self.list
                    .get_or_insert_with(|| (kind, start, Vec::new()))
                    .2
                    .push(text.to_string());
            }
            Line::Text(text) => {
                self.flush_list();
                self.flush_quote();
                self.paragraph.push(text.to_string());
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush_blocks();
        self.close_fence();
        self.out
    }
}

/// Renders Markdown as HTML. An unclosed code fence runs to the end of
/// the input.
pub fn markdown_to_html(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n");
    let mut writer = HtmlWriter::default();
    for line in normalized.split('\n') {
        writer.feed(line);
    }
    writer.finish()
}

fn fenced_block(caps: &Captures<'_>) -> String {
    let lang = language_class()
        .captures(group(caps, 1))
        .map_or("", |c| group(&c, 1));
    let body = group(caps, 2).trim_end_matches('\n');
    format!("\n\n```{lang}\n{body}\n```\n\n")
}

fn list_block(caps: &Captures<'_>) -> String {
    let ordered = group(caps, 1).eq_ignore_ascii_case("ol");
    let items: Vec<String> = item_tag()
        .captures_iter(group(caps, 2))
        .enumerate()
        .map(|(idx, item)| {
            let text = group(&item, 1).trim();
            if ordered {
                format!("{}. {text}", idx + 1)
            } else {
                format!("- {text}")
            }
        })
        .collect();
    format!("\n\n{}\n\n", items.join("\n"))
}

fn image_markdown(caps: &Captures<'_>) -> String {
    let tag = group(caps, 0);
    let src = src_attr().captures(tag).map_or("", |c| group(&c, 1));
    let alt = alt_attr().captures(tag).map_or("", |c| group(&c, 1));
    format!("![{alt}]({src})")
}

fn quote_block(caps: &Captures<'_>) -> String {
    let inner = rewrite_html(group(caps, 1));
    let quoted: Vec<String> = inner
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    format!("\n\n{}\n\n", quoted.join("\n"))
}

/// Keeps single blank lines between blocks and drops trailing spaces.
fn compact_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

fn rewrite_html(input: &str) -> String {
    let text = input.replace("\r\n", "\n");
    let text = script_tag().replace_all(&text, "");
    let text = pre_block().replace_all(&text, fenced_block);
    let text = quote_tag().replace_all(&text, quote_block);
    let text = heading_tag().replace_all(&text, |caps: &Captures<'_>| {
        let level: usize = group(caps, 1).parse().unwrap_or(1);
        format!("\n\n{} {}\n\n", "#".repeat(level), group(caps, 2).trim())
    });
    let text = list_tag().replace_all(&text, list_block);
    let text = rule_tag().replace_all(&text, "\n\n---\n\n");
    let text = break_tag().replace_all(&text, "\n");
    let text = block_tag().replace_all(&text, "\n\n${1}\n\n");
    let text = strong_tag().replace_all(&text, "**${1}**");
    let text = em_tag().replace_all(&text, "_${1}_");
    let text = code_tag().replace_all(&text, "`${1}`");
    let text = image_tag().replace_all(&text, image_markdown);
    let text = link_tag().replace_all(&text, "[${2}](${1})");
    let text = any_tag().replace_all(&text, "");
    compact_lines(&unescape_html(&text))
}

/// Converts HTML to Markdown. A tag left open at the end of the input is
/// rejected rather than guessed at.
pub fn html_to_markdown(input: &str) -> Result<String> {
    if let Some(tag) = open_tag_at_end().find(input) {
        return Err(ToolError::format(format!(
            "unterminated tag {:?}",
            tag.as_str()
        )));
    }
    Ok(rewrite_html(input))
}
