//! Indicator scoring of research text.

use crate::categorize::table::CATEGORIES;
use crate::html::{contains_term, count_term};

pub const MATERIAL_INDICATORS: &[(&str, &[&str])] = &[
    ("polyisocyanurate", &["polyisocyanurate", "polyiso", "foam core", "goboard", "rigid foam"]),
    ("polystyrene", &["polystyrene", "xps", "extruded", "foam board"]),
    ("cement", &["cement", "cementitious", "portland", "mortar", "concrete"]),
    ("chemical", &["chemical", "formula", "water-based", "solvent", "penetrating"]),
    ("silicone", &["silicone", "rubber", "flexible"]),
    ("metal", &["metal", "aluminum", "stainless steel", "steel", "brass", "zinc"]),
    ("porcelain", &["porcelain", "vitreous", "kiln-fired", "dense"]),
    ("ceramic", &["ceramic", "glazed", "clay", "red body"]),
    ("natural stone", &["natural stone", "quarried", "marble", "granite", "travertine", "limestone"]),
    ("vinyl", &["vinyl", "pvc", "rigid core", "wear layer"]),
    ("glass", &["glass", "recycled glass", "translucent"]),
];

pub const KNOWN_BRANDS: &[&str] = &[
    "Daltile",
    "MSI",
    "Mapei",
    "Laticrete",
    "Schluter",
    "Custom Building Products",
    "Merola Tile",
    "Jeffrey Court",
    "Aqua Mix",
    "Johns Manville",
    "wedi",
    "TrafficMaster",
    "LifeProof",
    "QEP",
    "RIDGID",
];

/// Highest-scoring candidate with at least `min_score` hits; ties go to the
/// earlier candidate.
fn best<'c>(scored: impl Iterator<Item = (&'c str, usize)>, min_score: usize) -> Option<(&'c str, usize)> {
    let mut top: Option<(&str, usize)> = None;
    for (name, score) in scored {
        if score >= min_score && score > top.map_or(0, |(_, s)| s) {
            top = Some((name, score));
        }
    }
    top
}

fn hits(text_lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| contains_term(text_lower, t)).count()
}

pub fn material(text: &str, min_score: usize) -> Option<(String, usize)> {
    let lower = text.to_lowercase();
    best(MATERIAL_INDICATORS.iter().map(|(m, terms)| (*m, hits(&lower, terms))), min_score)
        .map(|(m, s)| (m.to_string(), s))
}

pub fn category(text: &str, min_score: usize) -> Option<(String, usize)> {
    let lower = text.to_lowercase();
    let scored = CATEGORIES.iter().map(|c| {
        let mut terms: Vec<&str> = c.priority_keywords.to_vec();
        for sub in c.subcategories {
            for k in sub.keywords {
                if !terms.contains(k) {
                    terms.push(*k);
                }
            }
        }
        (c.name, hits(&lower, &terms))
    });
    best(scored, min_score).map(|(c, s)| (c.to_string(), s))
}

/// Brands scored by how often the text names them as whole words; the
/// current brand competes alongside the known ones. A blank current brand
/// is not a candidate.
pub fn brand(text: &str, current: Option<&str>, min_score: usize) -> Option<(String, usize)> {
    let lower = text.to_lowercase();
    let current = current.map(str::trim).filter(|b| !b.is_empty());
    let candidates = current.into_iter().chain(KNOWN_BRANDS.iter().copied());
    let scored = candidates.map(|b| (b, count_term(&lower, b)));
    best(scored, min_score).map(|(b, s)| (b.to_string(), s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_needs_two_indicators() {
        let text = "GoBoard is a backer board with a polyisocyanurate (polyiso) foam core.";
        assert_eq!(material(text, 2), Some(("polyisocyanurate".into(), 4)));
        assert_eq!(material("Made of steel.", 2), None);
    }

    #[test]
    fn category_from_table_terms() {
        let text = "A cement backer board and tile substrate for showers.";
        assert_eq!(category(text, 2).map(|(c, _)| c).as_deref(), Some("installation_materials"));
    }

    #[test]
    fn brand_counts_mentions() {
        let text = "Mapei Ultraflex. Mapei mortars are polymer modified.";
        assert_eq!(brand(text, Some("Acme"), 2), Some(("Mapei".into(), 2)));
        assert_eq!(brand("Acme acme", Some("Acme"), 2), Some(("Acme".into(), 2)));
        assert_eq!(brand("nothing here", None, 2), None);
    }

    #[test]
    fn brand_mentions_are_whole_words() {
        assert_eq!(brand("Order from qepsupply.com or mapeistore.com", None, 1), None);
        assert_eq!(brand("MSI tile. MSI grout.", Some(" "), 2), Some(("MSI".into(), 2)));
        assert_eq!(brand("plain text about grout", Some(""), 1), None);
    }
}
