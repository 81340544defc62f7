//! Page-type classification over the keyword/pattern table.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::extract::extractor_for;
use super::patterns::{CompiledEntry, PatternTable};
use crate::config::DetectionConfig;
use crate::html::contains_term;
use crate::record::{DetectionResult, PageType};

pub struct PageTypeClassifier<'t> {
    table: &'t PatternTable,
    config: DetectionConfig,
}

struct Inputs<'a> {
    html: &'a str,
    html_lower: String,
    url_lower: String,
    structured_lower: Option<String>,
}

impl PageTypeClassifier<'static> {
    pub fn builtin() -> Self {
        Self::new(PatternTable::builtin(), DetectionConfig::default())
    }
}

impl<'t> PageTypeClassifier<'t> {
    pub fn new(table: &'t PatternTable, config: DetectionConfig) -> Self {
        Self { table, config }
    }

    pub fn classify(&self, html: &str, url: &str, structured: Option<&Value>) -> DetectionResult {
        let inputs = Inputs {
            html,
            html_lower: html.to_lowercase(),
            url_lower: url.to_lowercase(),
            structured_lower: structured.map(|v| v.to_string().to_lowercase()),
        };

        let mut best: Option<(PageType, f64, BTreeMap<String, Vec<String>>)> = None;
        for entry in self.table.entries() {
            let (score, features) = self.score(entry, &inputs);
            debug!("{} scored {:.3}", entry.entry.page_type, score);
            // Strict comparison: earlier table entries win ties.
            if best.as_ref().map_or(true, |(_, s, _)| score > *s) {
                best = Some((entry.entry.page_type, score, features));
            }
        }

        let (page_type, score, features) = best.unwrap_or_default();
        let (page_type, confidence) = if score <= 0.0 || score < self.config.confidence_floor {
            (PageType::Unknown, 0.0)
        } else {
            (page_type, score.clamp(0.0, 1.0))
        };

        DetectionResult {
            page_type,
            confidence,
            detected_features: features,
            recommended_extractor: extractor_for(page_type).name,
        }
    }

    fn score(&self, compiled: &CompiledEntry, inputs: &Inputs) -> (f64, BTreeMap<String, Vec<String>>) {
        let entry = &compiled.entry;
        let w = &self.config.weights;
        let mut features = BTreeMap::new();

        let in_page = |kw: &String| {
            contains_term(&inputs.html_lower, kw) || contains_term(&inputs.url_lower, kw)
        };
        let in_page_raw = |kw: &String| {
            let kw = kw.to_lowercase();
            inputs.html_lower.contains(&kw) || inputs.url_lower.contains(&kw)
        };

        let high = matched(&entry.high_confidence, in_page);
        let medium = matched(&entry.medium_confidence, in_page);
        let pricing = matched(&entry.pricing_indicators, in_page_raw);
        let specs = matched(&entry.specification_keywords, in_page);

        let cap = self.config.measurement_cap.max(1);
        let measurements: Vec<String> = compiled
            .measurement
            .iter()
            .flatten()
            .flat_map(|re| re.find_iter(inputs.html))
            .take(cap)
            .map(|m| m.as_str().trim().to_string())
            .collect();

        let resources: Vec<String> = compiled
            .resource
            .iter()
            .flatten()
            .filter_map(|re| {
                re.find(&inputs.html_lower)
                    .or_else(|| re.find(&inputs.url_lower))
                    .map(|m| m.as_str().to_string())
            })
            .collect();

        let clues = match &inputs.structured_lower {
            Some(blob) => matched(&entry.structured_data_clues, |c| blob.contains(&c.to_lowercase())),
            None => Vec::new(),
        };

        let score = ratio(high.len(), entry.high_confidence.len()) * w.high_confidence
            + ratio(medium.len(), entry.medium_confidence.len()) * w.medium_confidence
            + ratio(measurements.len(), cap) * w.measurement
            + ratio(pricing.len(), entry.pricing_indicators.len()) * w.pricing
            + ratio(specs.len(), entry.specification_keywords.len()) * w.specification
            + ratio(resources.len(), compiled.resource.len()) * w.resource
            + ratio(clues.len(), entry.structured_data_clues.len()) * w.structured_data;

        for (name, values) in [
            ("high_confidence", high),
            ("medium_confidence", medium),
            ("measurements", measurements),
            ("pricing", pricing),
            ("specifications", specs),
            ("resources", resources),
            ("structured_data", clues),
        ] {
            if !values.is_empty() {
                features.insert(name.to_string(), values);
            }
        }

        (score, features)
    }
}

/// Classify with the built-in table and default weights.
pub fn classify(html: &str, url: &str, structured: Option<&Value>) -> DetectionResult {
    PageTypeClassifier::builtin().classify(html, url, structured)
}

fn matched(keywords: &[String], pred: impl Fn(&String) -> bool) -> Vec<String> {
    keywords.iter().filter(|k| pred(k)).cloned().collect()
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (hits as f64 / total as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::patterns::PatternEntry;

    const TILE_PAGE: &str = r#"
        <h1>Calacatta Marble Porcelain Tile</h1>
        <p>Polished porcelain tile for floor tile and wall tile installs. Rectified edge.</p>
        <p>12 x 24 in | 15.5 sq ft per box | 9 mm thick</p>
        <p>$5.99/box $3.25/Sq. Ft.</p>
        <p>Finish: Polished</p><p>Thickness: 9mm</p>
    "#;

    #[test]
    fn classifies_tile_page() {
        let r = classify(TILE_PAGE, "https://example.com/porcelain-tile/calacatta-100506313.html", None);
        assert_eq!(r.page_type, PageType::Tile);
        assert!(r.confidence >= 0.3 && r.confidence <= 1.0);
        assert_eq!(r.recommended_extractor, "TileExtractor");
        assert!(r.detected_features["high_confidence"].contains(&"porcelain tile".to_string()));
        assert_eq!(r.detected_features["measurements"].len(), 3);
    }

    #[test]
    fn classifies_grout_page() {
        let html = "<h1>Polyblend Sanded Grout 25 lb</h1><p>Covers up to 100 sq ft. \
                    For grout joint width 1/8 in to 1/2 in. Mix with water.</p><p>$22.98/each</p>";
        let r = classify(html, "https://example.com/grout/polyblend-100100100.html", None);
        assert_eq!(r.page_type, PageType::Grout);
        assert!(r.confidence > 0.0);
    }

    #[test]
    fn empty_page_is_unknown_with_zero_confidence() {
        let r = classify("<html><body>Hello</body></html>", "https://example.com/", None);
        assert_eq!(r.page_type, PageType::Unknown);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.recommended_extractor, "DefaultExtractor");
    }

    #[test]
    fn fixture_confidence_is_zero_exactly_when_unknown() {
        for name in ["empty_page", "marker_only", "porcelain_tile", "sanded_grout", "corner_shelf", "goboard"] {
            let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
            let r = classify(&html, "", None);
            assert!((0.0..=1.0).contains(&r.confidence), "{}: {}", name, r.confidence);
            assert_eq!(r.confidence == 0.0, r.page_type == PageType::Unknown, "{}", name);
        }
    }

    #[test]
    fn zero_floor_still_reports_unknown_for_nothing() {
        let config = DetectionConfig {
            confidence_floor: 0.0,
            ..Default::default()
        };
        let r = PageTypeClassifier::new(PatternTable::builtin(), config).classify("", "", None);
        assert_eq!(r.page_type, PageType::Unknown);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn below_floor_keeps_best_features() {
        let r = classify("<p>a nice tile</p>", "https://example.com/x", None);
        assert_eq!(r.page_type, PageType::Unknown);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.detected_features["medium_confidence"], vec!["tile".to_string()]);
    }

    #[test]
    fn exact_weighted_score_on_small_table() {
        let table = PatternTable::from_entries(vec![PatternEntry {
            page_type: PageType::Grout,
            high_confidence: vec!["grout".into(), "sanded".into()],
            medium_confidence: vec![],
            measurement_patterns: vec![r"\d+ lb".into(), "(broken".into()],
            pricing_indicators: vec!["/each".into()],
            specification_keywords: vec![],
            resource_patterns: vec![],
            structured_data_clues: vec!["grout".into()],
        }]);
        let classifier = PageTypeClassifier::new(&table, DetectionConfig::default());
        let structured = serde_json::json!({"name": "Grout"});
        let r = classifier.classify("grout 25 lb $9/each", "https://x.test/", Some(&structured));
        // 1/2 * 0.40 + 1/3 * 0.15 + 1/1 * 0.10 + 1/1 * 0.02
        let expected = 0.20 + 0.05 + 0.10 + 0.02;
        assert_eq!(r.page_type, PageType::Grout);
        assert!((r.confidence - expected).abs() < 1e-9, "{}", r.confidence);
    }

    #[test]
    fn keywords_in_url_count() {
        let table = PatternTable::from_entries(vec![PatternEntry {
            page_type: PageType::LuxuryVinyl,
            high_confidence: vec!["vinyl".into()],
            medium_confidence: vec![],
            measurement_patterns: vec![],
            pricing_indicators: vec![],
            specification_keywords: vec![],
            resource_patterns: vec![],
            structured_data_clues: vec![],
        }]);
        let classifier = PageTypeClassifier::new(&table, DetectionConfig::default());
        let r = classifier.classify("<p>plank</p>", "https://x.test/vinyl/oak", None);
        assert_eq!(r.page_type, PageType::LuxuryVinyl);
        assert!((r.confidence - 0.40).abs() < 1e-9);
    }
}
