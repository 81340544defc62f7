//! Page-type keyword and pattern table.
//!
//! The table is plain data: it serializes to JSON, can be replaced wholesale,
//! and is compiled once into a [`PatternTable`].

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::record::PageType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    pub page_type: PageType,
    #[serde(default)]
    pub high_confidence: Vec<String>,
    #[serde(default)]
    pub medium_confidence: Vec<String>,
    #[serde(default)]
    pub measurement_patterns: Vec<String>,
    #[serde(default)]
    pub pricing_indicators: Vec<String>,
    #[serde(default)]
    pub specification_keywords: Vec<String>,
    #[serde(default)]
    pub resource_patterns: Vec<String>,
    #[serde(default)]
    pub structured_data_clues: Vec<String>,
}

/// A [`PatternEntry`] with its regex sources compiled.
///
/// A source that fails to compile is kept as `None` and simply never matches.
#[derive(Debug)]
pub struct CompiledEntry {
    pub entry: PatternEntry,
    pub measurement: Vec<Option<Regex>>,
    pub resource: Vec<Option<Regex>>,
}

#[derive(Debug)]
pub struct PatternTable {
    entries: Vec<CompiledEntry>,
}

static BUILTIN: LazyLock<PatternTable> =
    LazyLock::new(|| PatternTable::from_entries(builtin_entries()));

impl PatternTable {
    pub fn builtin() -> &'static PatternTable {
        &BUILTIN
    }

    pub fn from_entries(entries: Vec<PatternEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| CompiledEntry {
                measurement: compile_all(entry.page_type, &entry.measurement_patterns),
                resource: compile_all(entry.page_type, &entry.resource_patterns),
                entry,
            })
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern table {}", path.display()))?;
        let entries: Vec<PatternEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid pattern table {}", path.display()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }

    pub fn get(&self, page_type: PageType) -> Option<&CompiledEntry> {
        self.entries.iter().find(|e| e.entry.page_type == page_type)
    }

    pub fn to_entries(&self) -> Vec<PatternEntry> {
        self.entries.iter().map(|e| e.entry.clone()).collect()
    }
}

fn compile_all(page_type: PageType, sources: &[String]) -> Vec<Option<Regex>> {
    sources
        .iter()
        .map(|src| match Regex::new(src) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Skipping malformed {} pattern {:?}: {}", page_type, src, e);
                None
            }
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_entries() -> Vec<PatternEntry> {
    vec![
        PatternEntry {
            page_type: PageType::Tile,
            high_confidence: strings(&[
                "porcelain tile",
                "ceramic tile",
                "marble tile",
                "mosaic tile",
                "floor tile",
                "wall tile",
                "stone tile",
                "glass tile",
            ]),
            medium_confidence: strings(&[
                "porcelain",
                "ceramic",
                "mosaic",
                "rectified",
                "glazed",
                "pei rating",
                "tile",
                "backsplash",
            ]),
            measurement_patterns: strings(&[
                r#"(?i)\d+(?:\.\d+)?\s*(?:in\.?|")?\s*[x×]\s*\d+(?:\.\d+)?\s*(?:in\b|inch|")"#,
                r"(?i)\d+(?:\.\d+)?\s*sq\.?\s*ft\.?\s*(?:per|/)\s*(?:box|carton|case)",
                r"(?i)\d+(?:\.\d+)?\s*mm\s*thick",
            ]),
            pricing_indicators: strings(&["/sq. ft.", "/box", "per sq. ft.", "sq ft per box"]),
            specification_keywords: strings(&[
                "finish",
                "thickness",
                "edge",
                "shade variation",
                "water absorption",
                "frost resistance",
                "coefficient of friction",
            ]),
            resource_patterns: strings(&[
                r"(?i)/(?:porcelain|ceramic|marble|mosaic|stone|glass)-tile",
                r"(?i)installation[-_ ]guide",
                r"(?i)spec(?:ification)?[-_ ]sheet",
            ]),
            structured_data_clues: strings(&["tile", "porcelain", "ceramic", "sqft"]),
        },
        PatternEntry {
            page_type: PageType::Grout,
            high_confidence: strings(&[
                "sanded grout",
                "unsanded grout",
                "epoxy grout",
                "urethane grout",
                "grout",
            ]),
            medium_confidence: strings(&[
                "joint width",
                "grout joint",
                "stain resistant",
                "cure time",
                "mix",
                "lb bag",
            ]),
            measurement_patterns: strings(&[
                r"(?i)\d+(?:\.\d+)?\s*(?:lb|lbs|pound)s?\b",
                r"(?i)\d+/\d+\s*(?:in\.?|inch|'')?\s*(?:to|-)\s*\d+/\d+",
                r"(?i)covers?\s*(?:up\s*to\s*)?\d+",
            ]),
            pricing_indicators: strings(&["/each", "per bag", "/bag", "per container"]),
            specification_keywords: strings(&["color", "coverage", "joint width", "cure time", "sanded"]),
            resource_patterns: strings(&[r"(?i)/grout", r"(?i)coverage[-_ ]calculator"]),
            structured_data_clues: strings(&["grout"]),
        },
        PatternEntry {
            page_type: PageType::TrimMolding,
            high_confidence: strings(&[
                "bullnose",
                "quarter round",
                "pencil liner",
                "chair rail",
                "tile edge",
                "edge trim",
                "stair nose",
                "t-molding",
                "reducer",
            ]),
            medium_confidence: strings(&["trim", "molding", "moulding", "profile", "schluter", "threshold"]),
            measurement_patterns: strings(&[
                r#"(?i)\d+(?:\.\d+)?\s*(?:in\.?|ft\.?|")\s*(?:long|length|l\b)"#,
                r"(?i)\d+/\d+\s*in\.?\s*(?:height|profile)",
            ]),
            pricing_indicators: strings(&["/each", "per piece", "per stick"]),
            specification_keywords: strings(&["length", "profile", "material", "finish"]),
            resource_patterns: strings(&[r"(?i)/(?:trim|molding|moulding)", r"(?i)/decoratives"]),
            structured_data_clues: strings(&["trim", "molding"]),
        },
        PatternEntry {
            page_type: PageType::LuxuryVinyl,
            high_confidence: strings(&[
                "luxury vinyl",
                "vinyl plank",
                "lvp",
                "spc",
                "wpc",
                "rigid core",
                "wear layer",
            ]),
            medium_confidence: strings(&[
                "waterproof",
                "click lock",
                "floating",
                "attached pad",
                "underlayment",
                "plank",
            ]),
            measurement_patterns: strings(&[
                r"(?i)\d+(?:\.\d+)?\s*mil\b",
                r"(?i)\d+(?:\.\d+)?\s*mm\b",
                r#"(?i)\d+(?:\.\d+)?\s*(?:in\.?|")?\s*[x×]\s*\d+(?:\.\d+)?\s*(?:in\b|inch|")"#,
            ]),
            pricing_indicators: strings(&["/sq. ft.", "/box", "per sq. ft."]),
            specification_keywords: strings(&["wear layer", "core", "thickness", "installation method"]),
            resource_patterns: strings(&[r"(?i)/(?:vinyl|luxury-vinyl|lvp)", r"(?i)warranty"]),
            structured_data_clues: strings(&["vinyl", "plank"]),
        },
        PatternEntry {
            page_type: PageType::InstallationTool,
            high_confidence: strings(&[
                "trowel",
                "tile cutter",
                "wet saw",
                "grout float",
                "tile spacers",
                "leveling system",
                "mixing paddle",
                "tile nippers",
            ]),
            medium_confidence: strings(&["tool", "blade", "notch", "handle", "cordless", "kit"]),
            measurement_patterns: strings(&[
                r"(?i)\d+/\d+\s*(?:in\.?|'')?\s*x\s*\d+/\d+",
                r#"(?i)\d+(?:\.\d+)?\s*(?:in\.?|")\s*(?:diamond\s*)?blade"#,
            ]),
            pricing_indicators: strings(&["/each", "per piece"]),
            specification_keywords: strings(&["notch", "blade", "power source", "handle"]),
            resource_patterns: strings(&[r"(?i)/(?:tools|installation-tools|tile-tools)"]),
            structured_data_clues: strings(&["tool", "trowel"]),
        },
    ]
}
