//! Confidence-gated validation of material, category and brand.
//!
//! A field whose confidence clears its threshold is returned as-is without any
//! research. Below the threshold exactly one research query is issued and its
//! text reconciled against the indicator tables in [`research`]. Research
//! failures never surface: the original value is kept.

pub mod research;

use tracing::{debug, info};

use crate::categorize::material::confidence_for;
use crate::categorize::Categorizer;
use crate::config::ValidationConfig;
use crate::html::contains_term;
use crate::record::{ProductRecord, ValidationMethod, ValidationResult};
use crate::services::{Research, WebSearch};

pub const VALIDATED_FIELDS: &[&str] = &["material_type", "product_category", "brand"];

pub struct Validator<'a> {
    config: ValidationConfig,
    categorizer: Categorizer,
    research: Research<'a>,
}

impl<'a> Validator<'a> {
    pub fn new(config: ValidationConfig, categorizer: Categorizer, web: Option<&'a dyn WebSearch>) -> Self {
        Self {
            config,
            categorizer,
            research: Research::new(web),
        }
    }

    /// One result per validated field. The record is left untouched.
    pub fn validate(&self, record: &ProductRecord) -> Vec<ValidationResult> {
        VALIDATED_FIELDS
            .iter()
            .map(|field| {
                let value = field_value(field, record);
                let confidence = self.field_confidence(field, record);
                self.validate_with_internet_research(field, value, confidence, record)
            })
            .collect()
    }

    pub fn field_confidence(&self, field: &str, record: &ProductRecord) -> f64 {
        match field {
            "material_type" => record
                .material
                .as_deref()
                .map_or(0.0, |m| confidence_for(m, &record.text_blob())),
            "product_category" => self.categorizer.confidence(record),
            "brand" => brand_confidence(record),
            _ => 0.0,
        }
    }

    pub fn validate_with_internet_research(
        &self,
        field: &str,
        value: Option<&str>,
        confidence: f64,
        context: &ProductRecord,
    ) -> ValidationResult {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let original = value.map(str::to_string);
        let threshold = self.config.threshold_for(field);
        if confidence >= threshold {
            return ValidationResult {
                field: field.to_string(),
                original_value: original.clone(),
                validated_value: original,
                confidence,
                research_source: "none".to_string(),
                method: ValidationMethod::NotRequired,
            };
        }

        let query = research_query(field, context);
        debug!("Researching {} ({:.2} < {:.2}): {:?}", field, confidence, threshold, query);
        let (text, source) = self.research.lookup(&query);
        let unchanged = |source: &str| ValidationResult {
            field: field.to_string(),
            original_value: original.clone(),
            validated_value: original.clone(),
            confidence,
            research_source: source.to_string(),
            method: ValidationMethod::ResearchedUnchanged,
        };
        let Some(text) = text else {
            return unchanged(source.as_str());
        };

        let min = self.config.min_indicator_score;
        let winner = match field {
            "material_type" => research::material(&text, min),
            "product_category" => research::category(&text, min),
            "brand" => research::brand(&text, value, min),
            _ => None,
        };
        let Some((winner, score)) = winner else {
            return unchanged(source.as_str());
        };

        let researched_confidence = (0.5 + 0.15 * score as f64).min(0.95);
        let agrees = value.is_some_and(|v| v.eq_ignore_ascii_case(&winner));
        if agrees {
            ValidationResult {
                field: field.to_string(),
                original_value: original.clone(),
                validated_value: original,
                confidence: confidence.max(researched_confidence),
                research_source: source.as_str().to_string(),
                method: ValidationMethod::InternetConfirmation,
            }
        } else {
            info!("Research replaced {} {:?} with {:?}", field, value, winner);
            ValidationResult {
                field: field.to_string(),
                original_value: original,
                validated_value: Some(winner),
                confidence: researched_confidence,
                research_source: source.as_str().to_string(),
                method: ValidationMethod::InternetResearch,
            }
        }
    }
}

fn field_value<'r>(field: &str, record: &'r ProductRecord) -> Option<&'r str> {
    match field {
        "material_type" => record.material.as_deref(),
        "product_category" => record.category.as_deref(),
        "brand" => record.brand.as_deref(),
        _ => None,
    }
}

/// Named in the title or description: 0.96; present otherwise: 0.8.
fn brand_confidence(record: &ProductRecord) -> f64 {
    let Some(brand) = record.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
        return 0.0;
    };
    let named = [record.title.as_deref(), record.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| contains_term(&text.to_lowercase(), brand));
    if named {
        0.96
    } else {
        0.8
    }
}

fn research_query(field: &str, record: &ProductRecord) -> String {
    let title = record.title.as_deref().unwrap_or_default();
    match field {
        "material_type" => format!("{} {} material", title, record.brand.as_deref().unwrap_or_default()),
        "product_category" => format!("{} product category", title),
        "brand" => format!("{} manufacturer brand", title),
        _ => title.to_string(),
    }
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}
