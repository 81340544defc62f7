//! Per-page pipeline: classify, extract, detect material, categorize, and
//! optionally validate.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::categorize::material::{MaterialDetection, MaterialDetector};
use crate::categorize::Categorizer;
use crate::config::CatalogConfig;
use crate::parser::detect::PageTypeClassifier;
use crate::parser::parse_page;
use crate::parser::patterns::PatternTable;
use crate::record::{DetectionResult, ProductRecord, ValidationResult};
use crate::services::{LlmClient, WebSearch};
use crate::validate::Validator;

#[derive(Debug, Clone, Serialize)]
pub struct PageOutcome {
    pub detection: DetectionResult,
    pub record: ProductRecord,
    pub material: MaterialDetection,
    /// Empty unless validation is enabled.
    pub validations: Vec<ValidationResult>,
}

pub struct Pipeline<'a> {
    classifier: PageTypeClassifier<'a>,
    categorizer: Categorizer,
    material: MaterialDetector<'a>,
    validator: Option<Validator<'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &CatalogConfig,
        table: &'a PatternTable,
        web: Option<&'a dyn WebSearch>,
        llm: Option<&'a dyn LlmClient>,
        validate: bool,
    ) -> Self {
        let categorizer = Categorizer::new(config.categorization.clone());
        Self {
            classifier: PageTypeClassifier::new(table, config.detection.clone()),
            validator: validate
                .then(|| Validator::new(config.validation.clone(), categorizer.clone(), web)),
            categorizer,
            material: MaterialDetector::new(llm),
        }
    }

    pub fn process(&self, html: &str, url: &str, structured: Option<&Value>) -> PageOutcome {
        let (detection, mut record) = parse_page(&self.classifier, html, url, structured);

        let material = self.material.detect(&record);
        record.material = material.material.clone();
        record.apply_category(self.categorizer.categorize(&record));

        let validations = match &self.validator {
            Some(validator) => {
                let results = validator.validate(&record);
                for r in &results {
                    r.apply(&mut record);
                }
                results
            }
            None => Vec::new(),
        };

        info!(
            "{} -> {} ({:.2}), {}/{}",
            if url.is_empty() { "<page>" } else { url },
            detection.page_type,
            detection.confidence,
            record.category.as_deref().unwrap_or("-"),
            record.subcategory.as_deref().unwrap_or("-"),
        );

        PageOutcome {
            detection,
            record,
            material,
            validations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::material::MaterialSource;
    use crate::record::{InstallationComplexity, PageType, ValidationMethod};
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
    }

    impl WebSearch for CountingSearch {
        fn search(&self, _query: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("Backer board research notes.".to_string()))
        }
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn run(name: &str, url: &str) -> PageOutcome {
        let config = CatalogConfig::default();
        Pipeline::new(&config, PatternTable::builtin(), None, None, false).process(&fixture(name), url, None)
    }

    #[test]
    fn porcelain_tile_page() {
        let out = run("porcelain_tile", "https://shop.test/p/wood-look-porcelain-tile-100653211");
        assert_eq!(out.detection.page_type, PageType::Tile);
        assert!(out.detection.confidence >= 0.3);
        assert_eq!(out.detection.recommended_extractor, "TileExtractor");

        let r = &out.record;
        assert_eq!(r.sku.as_deref(), Some("100653211"));
        assert_eq!(r.title.as_deref(), Some("Oakridge Wood Look Porcelain Floor and Wall Tile"));
        assert_eq!(r.brand.as_deref(), Some("Daltile"));
        assert_eq!(r.price_per_box, Some(38.92));
        assert_eq!(r.price_per_sqft, Some(2.49));
        assert_eq!(r.price_per_piece, None);
        assert_eq!(r.size.as_deref(), Some("8 x 36 in"));
        assert_eq!(r.finish.as_deref(), Some("Matte"));
        assert_eq!(r.specifications.get("pei_rating").map(String::as_str), Some("4"));
        assert_eq!(r.material.as_deref(), Some("porcelain"));
        assert_eq!(r.category.as_deref(), Some("tiles"));
        assert_eq!(r.subcategory.as_deref(), Some("porcelain_tile"));
        assert_eq!(r.application_areas, vec!["floor", "wall"]);
        assert_eq!(r.installation_complexity, Some(InstallationComplexity::Advanced));
    }

    #[test]
    fn corner_shelf_page() {
        let out = run("corner_shelf", "https://shop.test/p/marble-corner-shelf-100900900");
        let r = &out.record;
        assert_eq!(r.price_per_piece, Some(12.99));
        assert_eq!(r.price_per_box, None);
        assert_eq!(r.size.as_deref(), Some("9 x 9 in"));
        assert_eq!(r.material.as_deref(), Some("marble"));
    }

    #[test]
    fn grout_page_reclassifies_box_price() {
        let out = run("sanded_grout", "https://shop.test/p/polyblend-sanded-grout-100000123");
        assert_eq!(out.detection.page_type, PageType::Grout);
        let r = &out.record;
        assert_eq!(r.price_per_piece, Some(24.98));
        assert_eq!(r.price_per_box, None);
        assert_eq!(r.specifications.get("grout_type").map(String::as_str), Some("sanded"));
        assert_eq!(r.specifications.get("package_weight").map(String::as_str), Some("25 lb"));
        assert_eq!(r.material.as_deref(), Some("cement"));
        assert_eq!(r.category.as_deref(), Some("grout"));
        assert_eq!(r.subcategory.as_deref(), Some("sanded_grout"));
    }

    #[test]
    fn goboard_page_needs_no_research() {
        let config = CatalogConfig::default();
        let out = Pipeline::new(&config, PatternTable::builtin(), None, None, true)
            .process(&fixture("goboard"), "https://shop.test/p/goboard-backer-board-202085929", None);
        assert_eq!(out.record.material.as_deref(), Some("polyisocyanurate"));
        assert_eq!(out.record.category.as_deref(), Some("installation_materials"));
        assert_eq!(out.record.subcategory.as_deref(), Some("backer_board"));
        let material = &out.validations[0];
        assert_eq!(material.field, "material_type");
        assert_eq!(material.method, ValidationMethod::NotRequired);
    }

    #[test]
    fn goboard_title_resolves_without_any_search() {
        let html = r#"<html><head>
            <meta name="description" content="Panel with a built-in waterproof membrane.">
            <meta property="product:brand" content="GoBoard">
            </head><body><h1>GoBoard Backer Board 4ft x 8ft x ½ in</h1></body></html>"#;
        let web = CountingSearch::default();
        let config = CatalogConfig::default();
        let out = Pipeline::new(&config, PatternTable::builtin(), Some(&web), None, true)
            .process(html, "https://shop.test/p/goboard-4x8-202085930", None);

        assert_eq!(out.record.material.as_deref(), Some("polyisocyanurate"));
        assert_eq!(out.material.source, MaterialSource::TitleKeyword);
        assert!(out.record.specifications.get("material").is_none());
        assert_eq!(out.record.category.as_deref(), Some("installation_materials"));
        assert_eq!(web.calls.load(Ordering::SeqCst), 0);
        assert_eq!(out.validations.len(), 3);
        assert!(out.validations.iter().all(|v| v.method == ValidationMethod::NotRequired));
        assert!(out.validations[0].confidence >= 0.7);
    }

    #[test]
    fn blank_page_is_unknown_and_uncategorized() {
        let config = CatalogConfig::default();
        let out = Pipeline::new(&config, PatternTable::builtin(), None, None, false)
            .process("<html><body></body></html>", "", None);
        assert_eq!(out.detection.page_type, PageType::Unknown);
        assert_eq!(out.detection.confidence, 0.0);
        assert_eq!(out.record.category.as_deref(), Some("uncategorized"));
        assert_eq!(out.record.material, None);
        assert!(out.validations.is_empty());
    }
}
