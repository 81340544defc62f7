//! Data-driven field rules shared by the per-type extractors.
//!
//! A rule is an ordered list of regex alternatives for one field; the first
//! alternative that matches wins and later rules never overwrite a field.

use std::collections::BTreeMap;

use regex::Regex;

use crate::html::contains_term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Size,
    Thickness,
    Coverage,
    Finish,
    Color,
    Spec(&'static str),
}

/// Regex alternatives for one field. `template` expands capture groups
/// (`$1 x $2 in`); without it the first group, or the whole match, is used.
pub struct FieldRule {
    pub field: Field,
    pub patterns: &'static [&'static str],
    pub template: Option<&'static str>,
}

/// Fixed vocabulary for one field: the first term present wins.
pub struct VocabRule {
    pub field: Field,
    pub terms: &'static [(&'static str, &'static str)],
}

pub struct CompiledRule {
    field: Field,
    patterns: Vec<Regex>,
    template: Option<&'static str>,
}

pub fn compile(rules: &[FieldRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .map(|r| CompiledRule {
            field: r.field,
            patterns: r.patterns.iter().filter_map(|p| Regex::new(p).ok()).collect(),
            template: r.template,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeFields {
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub coverage: Option<String>,
    pub finish: Option<String>,
    pub color: Option<String>,
    pub specifications: BTreeMap<String, String>,
}

impl TypeFields {
    fn slot(&mut self, field: Field) -> Slot<'_> {
        match field {
            Field::Size => Slot::Core(&mut self.size),
            Field::Thickness => Slot::Core(&mut self.thickness),
            Field::Coverage => Slot::Core(&mut self.coverage),
            Field::Finish => Slot::Core(&mut self.finish),
            Field::Color => Slot::Core(&mut self.color),
            Field::Spec(key) => Slot::Spec(&mut self.specifications, key),
        }
    }

    /// Set `field` unless an earlier rule already did.
    pub fn offer(&mut self, field: Field, value: String) -> bool {
        let value = value.trim().to_string();
        if value.is_empty() {
            return false;
        }
        match self.slot(field) {
            Slot::Core(slot) if slot.is_none() => {
                *slot = Some(value);
                true
            }
            Slot::Spec(map, key) if !map.contains_key(key) => {
                map.insert(key.to_string(), value);
                true
            }
            _ => false,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Size => self.size.is_some(),
            Field::Thickness => self.thickness.is_some(),
            Field::Coverage => self.coverage.is_some(),
            Field::Finish => self.finish.is_some(),
            Field::Color => self.color.is_some(),
            Field::Spec(key) => self.specifications.contains_key(key),
        }
    }
}

enum Slot<'a> {
    Core(&'a mut Option<String>),
    Spec(&'a mut BTreeMap<String, String>, &'static str),
}

pub fn apply(rules: &[CompiledRule], text: &str, out: &mut TypeFields) {
    for rule in rules {
        if out.has(rule.field) {
            continue;
        }
        let value = rule.patterns.iter().find_map(|re| {
            let caps = re.captures(text)?;
            match rule.template {
                Some(t) => {
                    let mut s = String::new();
                    caps.expand(t, &mut s);
                    Some(s)
                }
                None => caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str().to_string()),
            }
        });
        if let Some(v) = value {
            out.offer(rule.field, v);
        }
    }
}

pub fn apply_vocab(rules: &[VocabRule], text_lower: &str, out: &mut TypeFields) {
    for rule in rules {
        if out.has(rule.field) {
            continue;
        }
        if let Some((_, value)) = rule.terms.iter().find(|(term, _)| contains_term(text_lower, term)) {
            out.offer(rule.field, value.to_string());
        }
    }
}

/// Rules every extractor runs after its own.
pub const SHARED: &[FieldRule] = &[
    FieldRule {
        field: Field::Size,
        patterns: &[
            r#"(?i)(\d+(?:\.\d+)?)\s*(?:in\.?|"|'')?\s*[x×]\s*(\d+(?:\.\d+)?)\s*(?:in\b|inch|"|'')"#,
        ],
        template: Some("$1 x $2 in"),
    },
    FieldRule {
        field: Field::Coverage,
        patterns: &[r"(?i)(\d+(?:\.\d+)?)\s*sq\.?\s*ft\.?\s*(?:per|/)\s*(?:box|carton|case)"],
        template: Some("$1 sq ft per box"),
    },
    FieldRule {
        field: Field::Finish,
        patterns: &[r"(?im)^\s*finish\s*:\s*(\p{L}[\p{L} -]{1,30}?)\s*$"],
        template: None,
    },
    FieldRule {
        field: Field::Color,
        patterns: &[r"(?im)^\s*colou?r\s*:\s*(\p{L}[\p{L} /-]{1,30}?)\s*$"],
        template: None,
    },
    FieldRule {
        field: Field::Thickness,
        patterns: &[
            r"(?im)^\s*thickness\s*:\s*([^\n]{1,20}?)\s*$",
            r#"(?i)(\d+(?:\.\d+)?\s*mm|\d+/\d+\s*(?:in\.?|"))\s*thick"#,
        ],
        template: None,
    },
];

pub const FINISH_VOCAB: &[VocabRule] = &[VocabRule {
    field: Field::Finish,
    terms: &[
        ("polished", "polished"),
        ("honed", "honed"),
        ("matte", "matte"),
        ("glossy", "glossy"),
        ("textured", "textured"),
        ("brushed", "brushed"),
        ("natural", "natural"),
    ],
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_rules_pick_first_alternative() {
        let rules = compile(SHARED);
        let mut out = TypeFields::default();
        let text = "Size 12 in. x 24 in.\n15.5 Sq. Ft. per box\nFinish: Matte\nColor: Warm White\n9mm thick";
        apply(&rules, text, &mut out);
        assert_eq!(out.size.as_deref(), Some("12 x 24 in"));
        assert_eq!(out.coverage.as_deref(), Some("15.5 sq ft per box"));
        assert_eq!(out.finish.as_deref(), Some("Matte"));
        assert_eq!(out.color.as_deref(), Some("Warm White"));
        assert_eq!(out.thickness.as_deref(), Some("9mm"));
    }

    #[test]
    fn vocab_does_not_override_label() {
        let mut out = TypeFields::default();
        out.offer(Field::Finish, "Honed".into());
        apply_vocab(FINISH_VOCAB, "a polished look", &mut out);
        assert_eq!(out.finish.as_deref(), Some("Honed"));

        let mut fresh = TypeFields::default();
        apply_vocab(FINISH_VOCAB, "textured and brushed", &mut fresh);
        assert_eq!(fresh.finish.as_deref(), Some("textured"));
    }

    #[test]
    fn spec_fields_are_first_write_wins() {
        let mut out = TypeFields::default();
        assert!(out.offer(Field::Spec("edge"), "Rectified".into()));
        assert!(!out.offer(Field::Spec("edge"), "Pressed".into()));
        assert!(!out.offer(Field::Spec("pei_rating"), "   ".into()));
        assert_eq!(out.specifications["edge"], "Rectified");
    }
}
