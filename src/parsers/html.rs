use crate::parsers::text;
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose content is never rendered as text
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements separated from their neighbours by a blank line
const PARAGRAPHS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that start on a new line
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hr", "li", "main", "nav",
    "ol", "pre", "section", "summary", "table", "tbody", "thead", "tfoot", "tr", "ul",
];

/// Parses a CSS selector, logging and returning `None` when it is invalid
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            ::log::warn!("Ignoring invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Concatenated text of every descendant text node, like `textContent`
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// The document title with whitespace collapsed, or empty
pub fn document_title(doc: &Html) -> String {
    selector("title")
        .and_then(|sel| doc.select(&sel).next())
        .map(|title| collapse_whitespace(&text_content(title)))
        .unwrap_or_default()
}

/// Serialized markup of the root element
pub fn serialize(doc: &Html) -> String {
    doc.root_element().html()
}

/// Base URL links resolve against: `<base href>` when present, else the page URL
pub fn base_url(doc: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();
    let base_href = selector("base[href]")
        .and_then(|sel| doc.select(&sel).next())
        .and_then(|base| base.value().attr("href"));

    let Some(href) = base_href else {
        return page;
    };
    match page {
        Some(page) => page.join(href.trim()).ok().or(Some(page)),
        None => Url::parse(href.trim()).ok(),
    }
}

/// Visible text of `<body>`, approximating what a browser renders.
///
/// Flowing text is normalized; `<pre>` blocks keep their whitespace.
/// Returns an empty string when the document has no body.
pub fn visible_text(doc: &Html) -> String {
    let Some(body) = selector("body").and_then(|sel| doc.select(&sel).next()) else {
        return String::new();
    };

    let mut walker = TextWalker::default();
    walker.walk(body, false);
    walker.finish()
}

/// Accumulates rendered text as blocks: normalized flow text and verbatim `<pre>` text
#[derive(Default)]
struct TextWalker {
    blocks: Vec<String>,
    flow: String,
}

impl TextWalker {
    fn walk(&mut self, element: ElementRef<'_>, in_pre: bool) {
        for child in element.children() {
            match child.value() {
                Node::Text(t) => {
                    if in_pre {
                        self.flow.push_str(t);
                    } else {
                        push_inline(&mut self.flow, t);
                    }
                }
                Node::Element(el) => {
                    let Some(child_ref) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = el.name();
                    if SKIPPED.contains(&name) || is_hidden(child_ref) {
                        continue;
                    }
                    if name == "br" {
                        self.flow.push('\n');
                        continue;
                    }
                    if name == "pre" && !in_pre {
                        self.flush();
                        self.walk(child_ref, true);
                        self.flush_pre();
                        continue;
                    }

                    let breaks = if PARAGRAPHS.contains(&name) {
                        2
                    } else if BLOCKS.contains(&name) {
                        1
                    } else {
                        0
                    };
                    ensure_breaks(&mut self.flow, breaks);
                    self.walk(child_ref, in_pre);
                    ensure_breaks(&mut self.flow, breaks);

                    if name == "td" || name == "th" {
                        self.flow.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    fn flush(&mut self) {
        let text = text::normalize(&std::mem::take(&mut self.flow));
        if !text.is_empty() {
            self.blocks.push(text);
        }
    }

    fn flush_pre(&mut self) {
        let raw = std::mem::take(&mut self.flow);
        let text = raw.trim_matches('\n').trim_end();
        if !text.trim().is_empty() {
            self.blocks.push(text.to_string());
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.blocks.join("\n")
    }
}

/// Make `out` end with at least `count` newlines, ignoring trailing spaces
fn ensure_breaks(out: &mut String, count: usize) {
    if out.is_empty() {
        return;
    }
    let trailing = out
        .trim_end_matches(' ')
        .chars()
        .rev()
        .take_while(|c| *c == '\n')
        .count();
    for _ in trailing..count {
        out.push('\n');
    }
}

/// Append a text node with its whitespace runs collapsed to single spaces
fn push_inline(out: &mut String, text: &str) {
    let mut last_space = out.ends_with(char::is_whitespace);
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(c);
            last_space = false;
        }
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value
        .attr("style")
        .map(|style| {
            let style: String = style.chars().filter(|c| !c.is_whitespace()).collect();
            style.to_ascii_lowercase().contains("display:none")
        })
        .unwrap_or(false)
}
