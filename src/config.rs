//! Tunable constants for detection, categorization and validation.
//!
//! Defaults are the empirically tuned values the catalog was built with; a
//! JSON file with any subset of the fields can override them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub detection: DetectionConfig,
    pub categorization: CategorizationConfig,
    pub validation: ValidationConfig,
}

impl CatalogConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: CatalogConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}

/// Feature weights of the page-type score. They sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub high_confidence: f64,
    pub medium_confidence: f64,
    pub measurement: f64,
    pub pricing: f64,
    pub specification: f64,
    pub resource: f64,
    pub structured_data: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            high_confidence: 0.40,
            medium_confidence: 0.20,
            measurement: 0.15,
            pricing: 0.10,
            specification: 0.08,
            resource: 0.05,
            structured_data: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub weights: ScoreWeights,
    /// Best score below this yields `PageType::Unknown`.
    pub confidence_floor: f64,
    pub measurement_cap: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            confidence_floor: 0.3,
            measurement_cap: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizationConfig {
    pub priority_bonus: f64,
    pub rag_keyword_bonus: f64,
    pub default_keyword_weight: f64,
}

impl Default for CategorizationConfig {
    fn default() -> Self {
        Self {
            priority_bonus: 10.0,
            rag_keyword_bonus: 0.7,
            default_keyword_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub general_threshold: f64,
    pub material_threshold: f64,
    pub category_threshold: f64,
    pub brand_threshold: f64,
    /// Minimum indicator hits for research text to name a value.
    pub min_indicator_score: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            general_threshold: 0.8,
            material_threshold: 0.7,
            category_threshold: 0.9,
            brand_threshold: 0.95,
            min_indicator_score: 2,
        }
    }
}

impl ValidationConfig {
    pub fn threshold_for(&self, field: &str) -> f64 {
        match field {
            "material_type" | "material" => self.material_threshold,
            "product_category" | "category" => self.category_threshold,
            "brand" => self.brand_threshold,
            _ => self.general_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let sum = w.high_confidence
            + w.medium_confidence
            + w.measurement
            + w.pricing
            + w.specification
            + w.resource
            + w.structured_data;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_keep_their_ordering() {
        let v = ValidationConfig::default();
        assert!(v.threshold_for("material_type") < v.threshold_for("anything"));
        assert!(v.threshold_for("anything") < v.threshold_for("product_category"));
        assert!(v.threshold_for("product_category") < v.threshold_for("brand"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CatalogConfig =
            serde_json::from_str(r#"{"validation": {"material_threshold": 0.6}}"#).unwrap();
        assert_eq!(cfg.validation.material_threshold, 0.6);
        assert_eq!(cfg.validation.brand_threshold, 0.95);
        assert_eq!(cfg.detection.confidence_floor, 0.3);
    }
}
