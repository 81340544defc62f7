//! Parsed product-page markup and text helpers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static IMAGE_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:jpe?g|png|webp)(?:\?.*)?$").unwrap());

/// Elements whose text never reaches the shopper.
const HIDDEN: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

/// Elements that end a line of visible text.
const BLOCKS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "tr", "table", "dt", "dd", "dl", "h1", "h2", "h3", "h4", "h5",
    "h6", "section", "article", "header", "footer", "main", "aside", "nav", "form", "blockquote",
    "pre", "figure", "figcaption", "address",
];

/// A parsed page. Entities are decoded by the parser, so every string that
/// comes out of here is plain text.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw: &str) -> Self {
        Self { html: Html::parse_document(raw) }
    }

    fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Collapsed text of the first non-empty match.
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.select(css).into_iter().map(element_text).find(|t| !t.is_empty())
    }

    /// `content` of the first `<meta>` whose name, property or itemprop is `key`.
    pub fn meta(&self, key: &str) -> Option<String> {
        self.select("meta").into_iter().find_map(|el| {
            let el = el.value();
            let named = ["name", "property", "itemprop"]
                .iter()
                .filter_map(|attr| el.attr(attr))
                .any(|k| k.eq_ignore_ascii_case(key));
            if !named {
                return None;
            }
            el.attr("content").map(str::trim).filter(|c| !c.is_empty()).map(String::from)
        })
    }

    /// Image sources in page order, lazy-load attributes first.
    pub fn images(&self) -> Vec<String> {
        self.select("img")
            .into_iter()
            .filter_map(|el| {
                let el = el.value();
                ["data-src", "src"]
                    .iter()
                    .filter_map(|attr| el.attr(attr))
                    .map(str::trim)
                    .find(|src| IMAGE_SRC_RE.is_match(src))
                    .map(String::from)
            })
            .collect()
    }

    /// Raw bodies of the `application/ld+json` script blocks.
    pub fn jsonld_blocks(&self) -> Vec<String> {
        self.select(r#"script[type="application/ld+json"]"#)
            .into_iter()
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    /// First two cells of every table row.
    pub fn table_pairs(&self) -> Vec<(String, String)> {
        self.select("tr")
            .into_iter()
            .filter_map(|row| {
                let mut cells = row
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|c| matches!(c.value().name(), "th" | "td"));
                let key = cells.next()?;
                let value = cells.next()?;
                (value.value().name() == "td").then(|| (element_text(key), element_text(value)))
            })
            .collect()
    }

    /// Each `<dt>` paired with the `<dd>` right after it.
    pub fn definition_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for list in self.select("dl") {
            let mut term = None;
            for child in list.children().filter_map(ElementRef::wrap) {
                match child.value().name() {
                    "dt" => term = Some(element_text(child)),
                    "dd" => {
                        if let Some(t) = term.take() {
                            pairs.push((t, element_text(child)));
                        }
                    }
                    _ => {}
                }
            }
        }
        pairs
    }

    /// Visible text, one line per block element.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        collect_text(self.html.root_element(), &mut out);
        out.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if HIDDEN.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }
        collect_text(child, out);
        if BLOCKS.contains(&name) {
            out.push('\n');
        } else if matches!(name, "td" | "th") {
            out.push(' ');
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse(&el.text().collect::<Vec<_>>().join(" "))
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of a raw page.
pub fn visible_text(html: &str) -> String {
    Document::parse(html).visible_text()
}

/// Text of an HTML fragment with whitespace collapsed to single spaces.
pub fn strip_tags(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    element_text(parsed.root_element())
}

/// Case-insensitive term lookup that respects word starts.
///
/// The term must begin at a word boundary and may be followed by a plural
/// `s`/`es`, so "tile" matches "tiles" but "float" does not match "floating".
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    count_term(haystack_lower, term) > 0
}

/// Number of whole-word occurrences of `term`, with the same rules as
/// [`contains_term`].
pub fn count_term(haystack_lower: &str, term: &str) -> usize {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return 0;
    }
    let bytes = haystack_lower.as_bytes();
    let mut hits = 0;
    let mut from = 0;
    while let Some(pos) = haystack_lower[from..].find(&term) {
        let start = from + pos;
        let end = start + term.len();
        let starts_word = start == 0 || !is_word_byte(bytes[start - 1]);
        let rest = &haystack_lower[end..];
        let suffix = if rest.starts_with("es") && !rest[2..].starts_with(|c: char| c.is_alphanumeric()) {
            2
        } else if rest.starts_with('s') && !rest[1..].starts_with(|c: char| c.is_alphanumeric()) {
            1
        } else {
            0
        };
        let ends_word = rest[suffix..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if starts_word && ends_word {
            hits += 1;
        }
        from = end;
    }
    hits
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
