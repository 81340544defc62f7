//! Price extraction and the box/sqft/each unit tie-break.
//!
//! The same "$X" figure means different units on different product types:
//! box-sold tile quotes box and square-foot prices, while trim, setting
//! materials and accessories quote a single per-piece price that many pages
//! still render in the "box" slot.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::structured::PriceUnit;
use crate::html::contains_term;

static BOX_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*([\d,]+(?:\.\d{1,2})?)\s*/\s*(?:box|bx|ctn|carton|case)\b").unwrap()
});
static SQFT_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*([\d,]+(?:\.\d{1,2})?)\s*/\s*(?:sq\.?\s*ft\.?|sqft|square\s*f(?:oo|ee)t)").unwrap()
});
static EACH_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*([\d,]+(?:\.\d{1,2})?)\s*/\s*(?:each|ea\b|piece|pc\b)").unwrap()
});
static EACH_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/\s*(?:each|ea\b|piece|pc\b)|\bper\s+(?:each|piece|pc)\b").unwrap()
});

/// Title words of products sold one unit at a time.
pub const PER_PIECE_TITLE_KEYWORDS: &[&str] = &[
    "trim",
    "molding",
    "moulding",
    "corner shelf",
    "shelf",
    "niche",
    "mortar",
    "grout",
    "sealer",
    "adhesive",
    "caulk",
    "bag",
    "bottle",
    "tube",
    "container",
    "pail",
    "bucket",
    "kit",
];

/// Raw price figures found on a page, before the unit tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSignals {
    pub per_box: Option<f64>,
    pub per_sqft: Option<f64>,
    pub per_each: Option<f64>,
    pub each_marker: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    pub per_box: Option<f64>,
    pub per_sqft: Option<f64>,
    pub per_piece: Option<f64>,
}

fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn first_amount(re: &Regex, text: &str) -> Option<f64> {
    re.captures_iter(text).find_map(|c| parse_amount(&c[1]))
}

/// Collect price figures from the visible page text plus an optional
/// structured offer.
///
/// Structured prices fill the slot their unit names; an offer without a unit
/// lands in the box slot, as the storefront renders it.
pub fn scan(text: &str, structured: Option<(f64, PriceUnit)>) -> PriceSignals {
    let mut signals = PriceSignals {
        per_box: None,
        per_sqft: None,
        per_each: None,
        each_marker: EACH_MARKER_RE.is_match(text),
    };
    if let Some((price, unit)) = structured {
        match unit {
            PriceUnit::SqFt => signals.per_sqft = Some(price),
            PriceUnit::Each => signals.per_each = Some(price),
            PriceUnit::Box | PriceUnit::Unspecified => signals.per_box = Some(price),
        }
    }
    signals.per_box = signals.per_box.or_else(|| first_amount(&BOX_PRICE_RE, text));
    signals.per_sqft = signals.per_sqft.or_else(|| first_amount(&SQFT_PRICE_RE, text));
    signals.per_each = signals.per_each.or_else(|| first_amount(&EACH_PRICE_RE, text));
    signals
}

pub fn title_is_per_piece(title: &str) -> bool {
    let lower = title.to_lowercase();
    PER_PIECE_TITLE_KEYWORDS.iter().any(|kw| contains_term(&lower, kw))
}

/// Apply the unit tie-break.
///
/// A product is per-piece when the page carries an `/each` marker or the title
/// names a per-piece product. A per-piece product with a box figure and no
/// square-foot figure has its box figure moved to `per_piece` (an explicit
/// `$X/each` figure takes precedence) and the box slot cleared. Whenever a
/// square-foot figure exists nothing is reclassified.
pub fn resolve(signals: PriceSignals, title: Option<&str>) -> Pricing {
    let per_piece_product = signals.each_marker || title.is_some_and(title_is_per_piece);
    // The displayed figure: the box slot, or the lone `/each` figure.
    let displayed = signals.per_box.or(signals.per_each);

    if per_piece_product && displayed.is_some() && signals.per_sqft.is_none() {
        debug!("Reclassifying displayed price as per-piece");
        return Pricing {
            per_box: None,
            per_sqft: None,
            per_piece: signals.per_each.or(displayed),
        };
    }

    Pricing {
        per_box: signals.per_box,
        per_sqft: signals.per_sqft,
        per_piece: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_shelf_each_price_becomes_per_piece() {
        let p = resolve(scan("$12.99/each", None), Some("Marble Corner Shelf"));
        assert_eq!(p.per_piece, Some(12.99));
        assert_eq!(p.per_box, None);
    }

    #[test]
    fn box_price_moves_for_per_piece_titles() {
        let p = resolve(scan("$24.98/box", None), Some("Polyblend Sanded Grout 25 lb Bag"));
        assert_eq!(p.per_piece, Some(24.98));
        assert_eq!(p.per_box, None);
        assert_eq!(p.per_sqft, None);
    }

    #[test]
    fn standard_tile_keeps_box_and_sqft() {
        let text = "$5.99/box\n$3.25/Sq. Ft.\nMatching trim $8.99/each";
        let p = resolve(scan(text, None), Some("Marble Floor Tile"));
        assert_eq!(p.per_box, Some(5.99));
        assert_eq!(p.per_sqft, Some(3.25));
        assert_eq!(p.per_piece, None);
    }

    #[test]
    fn plain_tile_without_markers_is_untouched() {
        let p = resolve(scan("$49.50/box", None), Some("Wood Look Porcelain Tile"));
        assert_eq!(p.per_box, Some(49.5));
        assert_eq!(p.per_piece, None);
    }

    #[test]
    fn structured_sqft_price_blocks_reclassification() {
        let s = scan("$1,299.00/box\n/each", Some((2.49, PriceUnit::SqFt)));
        assert_eq!(s.per_box, Some(1299.0));
        let p = resolve(s, Some("Slate Tile"));
        assert_eq!(p.per_sqft, Some(2.49));
        assert_eq!(p.per_piece, None);
    }

    #[test]
    fn piece_unit_marks_a_per_piece_product() {
        for text in ["$4.99/piece", "$4.99 / pc", "$4.99 per piece"] {
            let s = scan(text, None);
            assert!(s.each_marker, "{}", text);
        }
        let p = resolve(scan("$4.99/piece", None), Some("Tile Spacers 1/8 in. 250 Pack"));
        assert_eq!(p.per_piece, Some(4.99));
        assert_eq!(p.per_box, None);
        assert_eq!(p.per_sqft, None);
    }

    #[test]
    fn no_prices_means_no_prices() {
        let p = resolve(scan("Call for price", None), Some("Grout Sealer"));
        assert_eq!(p, Pricing::default());
    }
}
