//! Product categorization over the record's text blob.

pub mod material;
pub mod table;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::CategorizationConfig;
use crate::html::contains_term;
use crate::record::{CategoryInfo, InstallationComplexity, ProductRecord};
use table::{keyword_weight, CategoryDef, SubcategoryDef, APPLICATION_AREAS, CATEGORIES};

pub const UNCATEGORIZED: &str = "uncategorized";
pub const OTHER_SUBCATEGORY: &str = "other";

static DIMENSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Score of one category for one blob.
#[derive(Debug, Clone)]
pub struct CategoryScore {
    pub category: &'static CategoryDef,
    pub total: f64,
    /// Keyword-only score per subcategory, in table order.
    pub subcategories: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    config: CategorizationConfig,
}

impl Categorizer {
    pub fn new(config: CategorizationConfig) -> Self {
        Self { config }
    }

    /// Totals for every category, in table order.
    pub fn score_categories(&self, blob: &str) -> Vec<CategoryScore> {
        CATEGORIES
            .iter()
            .map(|category| {
                let mut total = 0.0;
                if category.priority_keywords.iter().any(|kw| contains_term(blob, kw)) {
                    total += self.config.priority_bonus;
                }
                let subcategories: Vec<f64> = category
                    .subcategories
                    .iter()
                    .map(|sub| {
                        let keyword_score: f64 = sub
                            .keywords
                            .iter()
                            .filter(|kw| contains_term(blob, kw))
                            .map(|kw| keyword_weight(kw, self.config.default_keyword_weight))
                            .sum();
                        let rag_hits = sub.rag_keywords.iter().filter(|kw| contains_term(blob, kw)).count();
                        total += keyword_score + rag_hits as f64 * self.config.rag_keyword_bonus;
                        keyword_score
                    })
                    .collect();
                CategoryScore {
                    category,
                    total,
                    subcategories,
                }
            })
            .collect()
    }

    pub fn categorize(&self, record: &ProductRecord) -> CategoryInfo {
        let blob = record.text_blob();
        let scores = self.score_categories(&blob);
        let areas = application_areas(&blob);

        let Some(best) = argmax(scores.iter().map(|s| s.total)).map(|i| &scores[i]) else {
            debug!("No category keywords for {}", record.url);
            return CategoryInfo {
                primary_category: UNCATEGORIZED.to_string(),
                subcategory: OTHER_SUBCATEGORY.to_string(),
                product_type: "general".to_string(),
                application_areas: areas,
                related_products: Vec::new(),
                rag_keywords: Vec::new(),
                installation_complexity: InstallationComplexity::Intermediate,
                typical_use_cases: Vec::new(),
            };
        };

        let category = best.category;
        let Some(sub) = argmax(best.subcategories.iter().copied()).map(|i| &category.subcategories[i]) else {
            return CategoryInfo {
                primary_category: category.name.to_string(),
                subcategory: OTHER_SUBCATEGORY.to_string(),
                product_type: "general".to_string(),
                application_areas: areas,
                related_products: Vec::new(),
                rag_keywords: Vec::new(),
                installation_complexity: complexity(category, None, record, &blob),
                typical_use_cases: Vec::new(),
            };
        };

        CategoryInfo {
            primary_category: category.name.to_string(),
            subcategory: sub.name.to_string(),
            product_type: sub.product_type.to_string(),
            application_areas: if areas.is_empty() { to_strings(sub.application_areas) } else { areas },
            related_products: to_strings(sub.related_products),
            rag_keywords: rag_keywords(sub, &blob),
            installation_complexity: complexity(category, Some(sub), record, &blob),
            typical_use_cases: to_strings(sub.typical_use_cases),
        }
    }

    /// Share of the winning total against the runner-up.
    pub fn confidence(&self, record: &ProductRecord) -> f64 {
        let mut totals: Vec<f64> = self.score_categories(&record.text_blob()).iter().map(|s| s.total).collect();
        totals.sort_by(|a, b| b.total_cmp(a));
        let top = totals.first().copied().unwrap_or(0.0);
        let runner_up = totals.get(1).copied().unwrap_or(0.0);
        if top <= 0.0 {
            0.0
        } else {
            top / (top + runner_up)
        }
    }
}

/// Categorize with the default weights.
pub fn categorize(record: &ProductRecord) -> CategoryInfo {
    Categorizer::default().categorize(record)
}

/// Index of the first strictly greatest positive value.
fn argmax(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        if v > best.map_or(0.0, |(_, b)| b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

pub fn application_areas(blob: &str) -> Vec<String> {
    APPLICATION_AREAS
        .iter()
        .filter(|(_, terms)| terms.iter().any(|t| contains_term(blob, t)))
        .map(|(area, _)| area.to_string())
        .collect()
}

fn is_large_format(record: &ProductRecord, blob: &str) -> bool {
    let from_size = record.size.as_deref().is_some_and(|size| {
        DIMENSION_RE
            .find_iter(size)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .any(|d| d >= 24.0)
    });
    from_size || blob.contains("large format") || blob.contains("large-format")
}

fn complexity(
    category: &CategoryDef,
    sub: Option<&SubcategoryDef>,
    record: &ProductRecord,
    blob: &str,
) -> InstallationComplexity {
    let base = sub.map_or(InstallationComplexity::Intermediate, |s| s.complexity);
    match category.name {
        "natural_stone" => InstallationComplexity::Advanced,
        "tiles" if is_large_format(record, blob) => InstallationComplexity::Advanced,
        _ => base,
    }
}

/// The subcategory's retrieval keywords followed by the keywords that hit.
fn rag_keywords(sub: &SubcategoryDef, blob: &str) -> Vec<String> {
    let mut out = to_strings(sub.rag_keywords);
    for kw in sub.keywords.iter().filter(|kw| contains_term(blob, kw)) {
        if !out.iter().any(|k| k == kw) {
            out.push(kw.to_string());
        }
    }
    out
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ProductRecord {
        ProductRecord {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn sponge_outranks_ceramic() {
        let info = categorize(&titled("Ceramic Tile Grout Sponge"));
        assert_eq!(info.primary_category, "tools");
        assert_eq!(info.subcategory, "installation_tools");
    }

    #[test]
    fn porcelain_floor_tile() {
        let mut r = titled("Wood Look Porcelain Floor Tile");
        r.size = Some("12 x 24 in".into());
        let info = categorize(&r);
        assert_eq!(info.primary_category, "tiles");
        assert_eq!(info.subcategory, "porcelain_tile");
        assert_eq!(info.application_areas, vec!["floor"]);
        assert_eq!(info.installation_complexity, InstallationComplexity::Advanced);
        assert!(info.rag_keywords.contains(&"porcelain".to_string()));
    }

    #[test]
    fn default_areas_when_none_are_named() {
        let info = categorize(&titled("Glazed Ceramic Subway"));
        assert_eq!(info.subcategory, "ceramic_tile");
        assert_eq!(info.application_areas, vec!["wall", "backsplash"]);
        assert_eq!(info.installation_complexity, InstallationComplexity::Basic);
    }

    #[test]
    fn natural_stone_is_advanced() {
        let info = categorize(&titled("Tumbled Travertine Paver for Pool and Patio"));
        assert_eq!(info.primary_category, "natural_stone");
        assert_eq!(info.subcategory, "travertine");
        assert_eq!(info.application_areas, vec!["outdoor", "pool"]);
        assert_eq!(info.installation_complexity, InstallationComplexity::Advanced);
    }

    #[test]
    fn ties_resolve_to_table_order() {
        // trim (0.7) and vinyl (0.7) score equally.
        let info = categorize(&titled("Vinyl Trim"));
        assert_eq!(info.primary_category, "trim_molding");
    }

    #[test]
    fn nothing_recognizable_is_uncategorized() {
        let info = categorize(&ProductRecord::default());
        assert_eq!(info.primary_category, UNCATEGORIZED);
        assert_eq!(info.subcategory, OTHER_SUBCATEGORY);
        assert!(info.related_products.is_empty());
    }

    #[test]
    fn sealer_takes_the_installation_priority() {
        let info = categorize(&titled("Stone Sealer"));
        assert_eq!(info.primary_category, "installation_materials");
    }

    #[test]
    fn polished_tile_is_not_care_product() {
        let info = categorize(&titled("Polished Marble Tile"));
        assert_eq!(info.primary_category, "natural_stone");
        assert_eq!(info.subcategory, "marble");
    }

    #[test]
    fn confidence_is_share_of_top_two() {
        let c = Categorizer::default();
        assert_eq!(c.confidence(&ProductRecord::default()), 0.0);
        // Only flooring scores.
        assert_eq!(c.confidence(&titled("Laminate")), 1.0);
        let split = c.confidence(&titled("Vinyl Trim"));
        assert!((split - 0.5).abs() < 1e-9);
    }
}
