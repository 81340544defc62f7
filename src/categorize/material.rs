//! Material detection cascade and material confidence.

use serde::Serialize;
use tracing::{debug, warn};

use crate::html::contains_term;
use crate::record::ProductRecord;
use crate::services::LlmClient;

/// Which step of the cascade produced the material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSource {
    MaterialTypeField,
    MaterialField,
    TitleRule,
    TitleKeyword,
    TextKeyword,
    Llm,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialDetection {
    pub material: Option<String>,
    pub confidence: f64,
    pub source: MaterialSource,
}

/// Scan order matters: the first material whose keywords hit wins.
pub const MATERIALS: &[(&str, &[&str])] = &[
    ("porcelain", &["porcelain"]),
    ("resin", &["resin", "epoxy"]),
    ("polyisocyanurate", &["polyisocyanurate", "polyiso", "goboard", "go board"]),
    ("polystyrene", &["polystyrene", "xps", "eps foam", "foam board"]),
    ("composite", &["composite", "spc", "wpc"]),
    ("silicone", &["silicone"]),
    ("plastic", &["plastic", "pvc", "polypropylene", "abs"]),
    ("metal", &["metal", "aluminum", "aluminium", "stainless steel", "steel", "brass", "zinc"]),
    ("cement", &["cement", "cementitious", "portland", "concrete"]),
    ("ceramic", &["ceramic"]),
    ("marble", &["marble"]),
    ("granite", &["granite"]),
    ("travertine", &["travertine"]),
    ("limestone", &["limestone"]),
    ("slate", &["slate"]),
    ("glass", &["glass"]),
    ("natural stone", &["natural stone", "stone"]),
    ("vinyl", &["vinyl", "lvp", "lvt"]),
    ("wood", &["wood", "hardwood", "oak", "maple"]),
];

/// Richer indicator sets for the materials that are easy to confuse.
pub const HIGH_CONFIDENCE: &[(&str, &[&str])] = &[
    ("chemical", &["chemical", "formula", "water-based", "solvent", "penetrating", "sealer", "cleaner"]),
    ("metal", &["metal", "aluminum", "stainless steel", "steel", "brass", "zinc", "screw"]),
    ("silicone", &["silicone", "100% silicone", "rubber", "flexible"]),
    (
        "polyisocyanurate",
        &["polyisocyanurate", "polyiso", "goboard", "go board", "backer board", "waterproof", "lightweight"],
    ),
    ("polystyrene", &["polystyrene", "xps", "extruded", "foam board", "wedi", "kerdi-board"]),
    ("cement", &["cement", "cementitious", "portland", "mortar", "thinset", "concrete"]),
];

/// Specification values that say nothing about the material.
const PLACEHOLDERS: &[&str] = &["", "n/a", "na", "none", "unknown", "other", "various", "see description", "-"];

/// A hit on one of these materials is unreliable when the text also names a
/// chemical or hardware product.
const GUARDED: &[&str] = &["natural stone", "marble", "ceramic", "metal", "polystyrene"];
const DISAMBIGUATORS: &[&str] = &[
    "sealer", "sealant", "cleaner", "polish", "sponge", "screw", "fastener", "enhancer", "impregnator",
];

const HARDWARE_TITLE_WORDS: &[&str] = &["screw", "fastener", "hardware", "washer", "bolt", "anchor", "bracket"];

/// Materials an LLM answer may name, beyond the keyword table.
const LLM_EXTRA: &[&str] = &["chemical"];

enum Scan {
    Found(&'static str),
    Defer,
    NoMatch,
}

fn scan(text: &str, context: &str) -> Scan {
    for (material, keywords) in MATERIALS {
        if !keywords.iter().any(|kw| contains_term(text, kw)) {
            continue;
        }
        if *material == "marble" && context.contains("marmoreal") {
            continue;
        }
        if GUARDED.contains(material) && DISAMBIGUATORS.iter().any(|d| contains_term(context, d)) {
            debug!("Material hit {:?} is ambiguous, deferring", material);
            return Scan::Defer;
        }
        return Scan::Found(*material);
    }
    Scan::NoMatch
}

fn lookup<'t>(table: &'t [(&'static str, &'static [&'static str])], material: &str) -> Option<&'t [&'static str]> {
    table.iter().find(|(m, _)| m.eq_ignore_ascii_case(material)).map(|(_, kws)| *kws)
}

/// 0.5 plus 0.15 per indicator hit, capped at 0.95.
pub fn confidence_for(material: &str, blob: &str) -> f64 {
    let keywords = lookup(HIGH_CONFIDENCE, material).or_else(|| lookup(MATERIALS, material));
    let hits = keywords.map_or(0, |kws| kws.iter().filter(|kw| contains_term(blob, kw)).count());
    (0.5 + 0.15 * hits as f64).min(0.95)
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDERS.contains(&value.trim().to_lowercase().as_str())
}

fn spec<'r>(record: &'r ProductRecord, keys: &[&str]) -> Option<&'r str> {
    keys.iter().find_map(|k| record.specifications.get(*k)).map(String::as_str)
}

#[derive(Clone, Copy, Default)]
pub struct MaterialDetector<'a> {
    llm: Option<&'a dyn LlmClient>,
}

impl<'a> MaterialDetector<'a> {
    pub fn new(llm: Option<&'a dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn detect(&self, record: &ProductRecord) -> MaterialDetection {
        let blob = record.text_blob();
        let found = |material: &str, source| MaterialDetection {
            material: Some(material.to_string()),
            confidence: confidence_for(material, &blob),
            source,
        };

        if let Some(value) = spec(record, &["material_type", "materialtype"]).filter(|v| !is_placeholder(v)) {
            return found(value.trim(), MaterialSource::MaterialTypeField);
        }

        if let Some(value) = spec(record, &["material"]).filter(|v| !is_placeholder(v)) {
            if let Scan::Found(material) = scan(&value.to_lowercase(), &value.to_lowercase()) {
                return found(material, MaterialSource::MaterialField);
            }
        }

        let title = record.title.as_deref().unwrap_or_default().to_lowercase();
        if contains_term(&title, "trowel") && contains_term(&title, "plastic") {
            return found("plastic", MaterialSource::TitleRule);
        }
        if HARDWARE_TITLE_WORDS.iter().any(|w| contains_term(&title, w)) {
            return self.ask_llm(record, &blob);
        }

        match scan(&title, &blob) {
            Scan::Found(material) => return found(material, MaterialSource::TitleKeyword),
            Scan::Defer => return self.ask_llm(record, &blob),
            Scan::NoMatch => {}
        }
        match scan(&blob, &blob) {
            Scan::Found(material) => found(material, MaterialSource::TextKeyword),
            Scan::Defer | Scan::NoMatch => self.ask_llm(record, &blob),
        }
    }

    fn ask_llm(&self, record: &ProductRecord, blob: &str) -> MaterialDetection {
        let not_found = MaterialDetection {
            material: None,
            confidence: 0.0,
            source: MaterialSource::NotFound,
        };
        let Some(llm) = self.llm else {
            debug!("No material for {} and no LLM configured", record.url);
            return not_found;
        };
        let answer = match llm.complete(&material_prompt(record)) {
            Ok(Some(answer)) => answer.to_lowercase(),
            Ok(None) => return not_found,
            Err(e) => {
                warn!("Material LLM call failed for {}: {:#}", record.url, e);
                return not_found;
            }
        };
        let named = LLM_EXTRA
            .iter()
            .copied()
            .chain(MATERIALS.iter().map(|(m, _)| *m))
            .find(|m| contains_term(&answer, m));
        match named {
            Some(material) => MaterialDetection {
                material: Some(material.to_string()),
                confidence: confidence_for(material, blob),
                source: MaterialSource::Llm,
            },
            None => not_found,
        }
    }
}

fn material_prompt(record: &ProductRecord) -> String {
    let choices: Vec<&str> = MATERIALS.iter().map(|(m, _)| *m).chain(LLM_EXTRA.iter().copied()).collect();
    format!(
        "What is the primary material of this tile or flooring product?\n\
         Title: {}\nDescription: {}\nAnswer with one of: {}.",
        record.title.as_deref().unwrap_or_default(),
        record.description.as_deref().unwrap_or_default(),
        choices.join(", ")
    )
}

/// Detect with no LLM fallback.
pub fn detect_material(record: &ProductRecord) -> MaterialDetection {
    MaterialDetector::default().detect(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLlm {
        calls: AtomicUsize,
        answer: &'static str,
    }

    impl LlmClient for CountingLlm {
        fn complete(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.answer.to_string()))
        }
    }

    fn titled(title: &str) -> ProductRecord {
        ProductRecord {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn goboard_is_polyisocyanurate() {
        let d = detect_material(&titled("GoBoard Backer Board 4ft x 8ft x 1/2 in. Waterproof"));
        assert_eq!(d.material.as_deref(), Some("polyisocyanurate"));
        assert_eq!(d.source, MaterialSource::TitleKeyword);
        assert!(d.confidence >= 0.7);
    }

    #[test]
    fn stone_sealer_defers_to_llm() {
        let r = titled("Stone Sealer");
        let d = detect_material(&r);
        assert_eq!(d.material, None);
        assert_eq!(d.source, MaterialSource::NotFound);

        let llm = CountingLlm {
            calls: AtomicUsize::new(0),
            answer: "Chemical (water-based sealer)",
        };
        let d = MaterialDetector::new(Some(&llm)).detect(&r);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(d.material.as_deref(), Some("chemical"));
        assert_eq!(d.source, MaterialSource::Llm);
    }

    #[test]
    fn explicit_material_type_wins_unless_placeholder() {
        let mut r = titled("Carrara Marble Tile");
        r.specifications.insert("material_type".into(), "Porcelain".into());
        assert_eq!(detect_material(&r).material.as_deref(), Some("Porcelain"));
        assert_eq!(detect_material(&r).source, MaterialSource::MaterialTypeField);

        r.specifications.insert("material_type".into(), "N/A".into());
        let d = detect_material(&r);
        assert_eq!(d.material.as_deref(), Some("marble"));
        assert_eq!(d.source, MaterialSource::TitleKeyword);
    }

    #[test]
    fn material_field_goes_through_the_table() {
        let mut r = titled("Edge Profile");
        r.specifications.insert("material".into(), "Anodized Aluminum".into());
        let d = detect_material(&r);
        assert_eq!(d.material.as_deref(), Some("metal"));
        assert_eq!(d.source, MaterialSource::MaterialField);
    }

    #[test]
    fn title_rules() {
        let d = detect_material(&titled("1/4 in. Square Notch Plastic Trowel"));
        assert_eq!(d.material.as_deref(), Some("plastic"));
        assert_eq!(d.source, MaterialSource::TitleRule);

        let llm = CountingLlm {
            calls: AtomicUsize::new(0),
            answer: "metal",
        };
        let d = MaterialDetector::new(Some(&llm)).detect(&titled("Backer Board Screws 1-1/4 in."));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(d.material.as_deref(), Some("metal"));
    }

    #[test]
    fn marmoreal_skips_marble() {
        let d = detect_material(&titled("Marmoreal Marble Look Porcelain"));
        assert_eq!(d.material.as_deref(), Some("porcelain"));
        let d = detect_material(&titled("Marmoreal Marble Look Glass Mosaic"));
        assert_eq!(d.material.as_deref(), Some("glass"));
    }

    #[test]
    fn description_is_scanned_after_title() {
        let mut r = titled("Arctic White 3x6 Subway");
        r.description = Some("Glazed ceramic wall tile".into());
        let d = detect_material(&r);
        assert_eq!(d.material.as_deref(), Some("ceramic"));
        assert_eq!(d.source, MaterialSource::TextKeyword);
    }

    #[test]
    fn confidence_formula() {
        assert_eq!(confidence_for("unobtainium", "anything"), 0.5);
        assert!((confidence_for("cement", "portland cement mortar") - 0.95).abs() < 1e-9);
        assert!((confidence_for("ceramic", "glazed ceramic") - 0.65).abs() < 1e-9);
    }
}
