use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse product page type, selects the extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Tile,
    Grout,
    TrimMolding,
    LuxuryVinyl,
    InstallationTool,
    #[default]
    Unknown,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Tile => "tile",
            PageType::Grout => "grout",
            PageType::TrimMolding => "trim_molding",
            PageType::LuxuryVinyl => "luxury_vinyl",
            PageType::InstallationTool => "installation_tool",
            PageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationComplexity {
    Basic,
    Intermediate,
    Advanced,
}

/// Outcome of page-type classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub page_type: PageType,
    pub confidence: f64,
    pub detected_features: BTreeMap<String, Vec<String>>,
    pub recommended_extractor: &'static str,
}

/// Flat product record accumulated over one page.
///
/// The extractor fills the base and physical fields, the categorizer the
/// category block; validation results may be applied afterwards by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,

    pub price_per_box: Option<f64>,
    pub price_per_sqft: Option<f64>,
    pub price_per_piece: Option<f64>,

    pub size: Option<String>,
    pub thickness: Option<String>,
    pub coverage: Option<String>,
    pub finish: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,

    pub specifications: BTreeMap<String, String>,
    pub images: Vec<String>,

    pub page_type: PageType,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub product_type: Option<String>,
    pub application_areas: Vec<String>,
    pub installation_complexity: Option<InstallationComplexity>,
    pub rag_keywords: Vec<String>,
    pub related_products: Vec<String>,
    pub typical_use_cases: Vec<String>,
}

impl ProductRecord {
    /// Lowercased text blob used by category and material scoring.
    pub fn text_blob(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.title.as_deref());
        parts.extend(self.description.as_deref());
        for (k, v) in &self.specifications {
            parts.push(k);
            parts.push(v);
        }
        parts.extend(self.brand.as_deref());
        parts.extend(self.color.as_deref());
        parts.extend(self.finish.as_deref());
        parts.extend(self.size.as_deref());
        parts.join(" ").to_lowercase()
    }

    pub fn apply_category(&mut self, info: CategoryInfo) {
        self.category = Some(info.primary_category);
        self.subcategory = Some(info.subcategory);
        self.product_type = Some(info.product_type);
        self.application_areas = info.application_areas;
        self.related_products = info.related_products;
        self.rag_keywords = info.rag_keywords;
        self.installation_complexity = Some(info.installation_complexity);
        self.typical_use_cases = info.typical_use_cases;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub primary_category: String,
    pub subcategory: String,
    pub product_type: String,
    pub application_areas: Vec<String>,
    pub related_products: Vec<String>,
    pub rag_keywords: Vec<String>,
    pub installation_complexity: InstallationComplexity,
    pub typical_use_cases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMethod {
    /// Research pointed at a different value.
    InternetResearch,
    /// Research agreed with the original value.
    InternetConfirmation,
    /// Research ran but gave no usable signal.
    ResearchedUnchanged,
    /// Confidence cleared the threshold; nothing was queried.
    NotRequired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub field: String,
    pub original_value: Option<String>,
    pub validated_value: Option<String>,
    pub confidence: f64,
    pub research_source: String,
    pub method: ValidationMethod,
}

impl ValidationResult {
    pub fn changed(&self) -> bool {
        self.method == ValidationMethod::InternetResearch
            && self.validated_value != self.original_value
    }

    /// Write the validated value back into `record` when research replaced it.
    pub fn apply(&self, record: &mut ProductRecord) -> bool {
        if !self.changed() {
            return false;
        }
        let value = self.validated_value.clone();
        match self.field.as_str() {
            "material_type" => record.material = value,
            "product_category" => record.category = value,
            "brand" => record.brand = value,
            _ => return false,
        }
        true
    }
}
