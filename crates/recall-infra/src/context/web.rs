//! Web page text extraction.
//!
//! Fetches a page with reqwest and reduces it to readable plain text with
//! scraper: the first of `<article>`, `<main>` or `<body>` is walked, page
//! chrome and non-content elements are skipped, and each block element
//! becomes one whitespace-collapsed line.

use std::time::Duration;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use recall_core::chat::context::{ContextFuture, WebExtractor};
use recall_types::error::ContextError;

/// Containers tried in order for the main content.
const CONTENT_ROOTS: [&str; 3] = ["article", "main", "body"];

/// Elements whose text is never part of the main content.
const SKIPPED: [&str; 10] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg", "template",
];

/// Elements that start a new line of output.
const BLOCKS: [&str; 24] = [
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul",
    "ol", "pre", "blockquote", "table", "tr", "br", "hr", "dt", "dd", "figcaption", "summary",
];

/// Fetches pages over HTTP and extracts their main text.
pub struct HttpWebExtractor {
    client: reqwest::Client,
}

impl HttpWebExtractor {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("recall/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create reqwest client");
        Self { client }
    }
}

impl Default for HttpWebExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WebExtractor for HttpWebExtractor {
    fn fetch_text<'a>(&'a self, url: &'a str) -> ContextFuture<'a, String> {
        Box::pin(async move {
            let fetch_error = |reason: String| ContextError::Fetch {
                url: url.to_string(),
                reason,
            };

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| fetch_error(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(fetch_error(format!("HTTP {status}")));
            }

            let html = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
            tracing::debug!(url, bytes = html.len(), "page fetched");

            extract_main_text(&html).ok_or_else(|| ContextError::EmptyExtraction(url.to_string()))
        })
    }
}

/// Extract readable text from an HTML document, one block per line.
///
/// Returns `None` when nothing readable remains.
pub fn extract_main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let root = CONTENT_ROOTS.iter().find_map(|tag| {
        Selector::parse(tag)
            .ok()
            .and_then(|selector| document.select(&selector).next())
    })?;

    let mut lines = Vec::new();
    let mut current = String::new();
    collect_text(root, &mut lines, &mut current);
    flush_line(&mut lines, &mut current);

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                current.push(' ');
                current.push_str(text);
            }
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let is_block = BLOCKS.contains(&name);
                if is_block {
                    flush_line(lines, current);
                }
                collect_text(child_element, lines, current);
                if is_block {
                    flush_line(lines, current);
                }
            }
            _ => {}
        }
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    let collapsed = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        lines.push(collapsed);
    }
    current.clear();
}
