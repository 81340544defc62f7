//! Generic specification auto-detection.
//!
//! Sources in trust order: `"PDPInfo_<Name>","Value":"<v>"` fragments,
//! `Label: value` lines, then `<th>/<td>` rows and `<dt>/<dd>` pairs. Every
//! candidate passes the same allow/deny gate; earlier sources win a key.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::html::{contains_term, Document};

static PDPINFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""PDPInfo_([A-Za-z0-9_]+)"\s*,\s*"Value"\s*:\s*"([^"]*)""#).unwrap()
});
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*([A-Za-z][A-Za-z0-9 ()/&.\-]{2,49}?)\s*:\s*(\S[^\n]{0,199}?)\s*$").unwrap()
});
static CAMEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static ACRONYM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A key must name something specification-like.
const KEY_ALLOW: &[&str] = &[
    "thickness", "weight", "edge", "finish", "color", "colour", "size", "dimension", "length",
    "width", "height", "material", "shade", "variation", "coverage", "rating", "resistance",
    "absorption", "install", "application", "joint", "texture", "pattern", "shape", "look",
    "style", "warranty", "sq", "square", "pieces", "pei", "cof", "slip", "frost", "rectified", "wear",
    "core", "origin", "type", "notch", "blade", "profile", "grade", "cure", "mil",
];

/// Allow terms this short only count as whole words.
const SHORT_TERM: usize = 4;

/// Markup, script and URL debris.
const VALUE_DENY: &[&str] = &[
    "<", ">", "http", "www.", "javascript", "function(", "{", "}", "script", ".js", ".css",
    "var ", "=>", "window.", "document.",
];

/// Storefront chrome that leaks into scraped pages.
const BOILERPLATE_DENY: &[&str] = &[
    "cookie", "privacy policy", "sign in", "log in", "add to cart", "analytics", "gtag",
    "googletag", "newsletter", "free shipping", "customer service", "store locator",
    "my account", "skip to", "copyright", "all rights reserved", "track order", "©",
    "subscribe", "wishlist",
];

pub fn normalize_key(raw: &str) -> String {
    let spaced = CAMEL_RE.replace_all(raw.trim(), "${1}_${2}");
    let lower = spaced.to_lowercase();
    NON_ALNUM_RE.replace_all(&lower, "_").trim_matches('_').to_string()
}

/// The two-sided precision gate every candidate pair must pass.
pub fn accept(key: &str, value: &str) -> bool {
    let key_len = key.chars().count();
    let value_len = value.chars().count();
    if !(3..=50).contains(&key_len) || !(1..=200).contains(&value_len) {
        return false;
    }
    let k = key.to_lowercase();
    let v = value.to_lowercase();
    if !key_allowed(key) {
        return false;
    }
    if VALUE_DENY.iter().any(|bad| v.contains(bad)) {
        return false;
    }
    !BOILERPLATE_DENY.iter().any(|bad| k.contains(bad) || v.contains(bad))
}

/// Matches allow terms against the key split into words, so `PEIRating`
/// reads as "pei rating".
fn key_allowed(key: &str) -> bool {
    let split = CAMEL_RE.replace_all(key, "${1} ${2}");
    let words = ACRONYM_RE.replace_all(&split, "${1} ${2}").to_lowercase();
    KEY_ALLOW.iter().any(|term| {
        if term.len() <= SHORT_TERM {
            contains_term(&words, term)
        } else {
            words.contains(term)
        }
    })
}

/// Auto-detected specification pairs, keyed by normalized name.
///
/// PDPInfo fragments live in inline script JSON, so they are read from the
/// `raw` markup; labels come from the visible `text`.
pub fn detect(doc: &Document, raw: &str, text: &str) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    let mut offer = |raw_key: &str, raw_value: &str, source: &str| {
        let value = raw_value.trim();
        let key = normalize_key(raw_key);
        if !accept(raw_key.trim(), value) {
            debug!("Rejected {} candidate {:?}", source, raw_key);
            return;
        }
        specs.entry(key).or_insert_with(|| value.to_string());
    };

    for caps in PDPINFO_RE.captures_iter(raw) {
        offer(&caps[1], &caps[2], "PDPInfo");
    }
    for caps in LABEL_RE.captures_iter(text) {
        offer(&caps[1], &caps[2], "label");
    }
    for (key, value) in doc.table_pairs() {
        offer(&key, &value, "table");
    }
    for (key, value) in doc.definition_pairs() {
        offer(&key, &value, "definition list");
    }

    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_html(html: &str) -> BTreeMap<String, String> {
        let doc = Document::parse(html);
        detect(&doc, html, &doc.visible_text())
    }

    #[test]
    fn pdpinfo_wins_over_later_shapes() {
        let html = r#"<script>{"PDPInfo_EdgeType","Value":"Rectified"}</script>
            <table><tr><th>Edge Type</th><td>Pressed</td></tr></table>"#;
        let specs = detect_html(html);
        assert_eq!(specs["edge_type"], "Rectified");
    }

    #[test]
    fn labels_tables_and_definition_lists() {
        let html = "<div>Shade Variation: V3 - Moderate</div>\
                    <table><tr><td>Water Absorption</td><td>&lt; 0.5%</td></tr></table>\
                    <dl><dt>Country of Origin</dt><dd>Italy</dd></dl>";
        let specs = detect_html(html);
        assert_eq!(specs["shade_variation"], "V3 - Moderate");
        assert_eq!(specs["country_of_origin"], "Italy");
        // "<" survives entity decoding and trips the markup deny-list.
        assert!(!specs.contains_key("water_absorption"));
    }

    #[test]
    fn gate_rejects_noise() {
        assert!(!accept("Accept Cookie Type", "Yes"));
        assert!(!accept("Color", "<span>White</span>"));
        assert!(!accept("Color", "see https://cdn.test/x"));
        assert!(!accept("Store Hours", "9-5"));
        assert!(!accept("ab", "x"));
        assert!(!accept("Finish", ""));
        assert!(accept("Finish", "Matte"));
    }

    #[test]
    fn short_allow_terms_need_whole_words() {
        assert!(!accept("Similar Products", "Hex Mosaic"));
        assert!(!accept("Lookup Code", "Save"));
        assert!(!accept("Subtype Code", "A1"));
        assert!(accept("Wear Layer (mil)", "20"));
        assert!(accept("PEIRating", "4"));
        assert!(accept("SqFtPerBox", "15.5"));
        assert!(accept("Coverage (sq ft)", "100"));
        assert!(accept("Installation Method", "Thinset"));
    }

    #[test]
    fn keys_are_snake_case() {
        assert_eq!(normalize_key("PEIRating"), "peirating");
        assert_eq!(normalize_key("EdgeType"), "edge_type");
        assert_eq!(normalize_key("Country of Origin"), "country_of_origin");
        assert_eq!(normalize_key("Wear Layer (mil)"), "wear_layer_mil");
    }
}
