use std::sync::LazyLock;

use super::rules::{self, CompiledRule, Field, FieldRule, TypeFields, VocabRule};
use super::PageText;

static RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    rules::compile(&[
        FieldRule {
            field: Field::Spec("package_weight"),
            patterns: &[r"(?i)(\d+(?:\.\d+)?)\s*(?:-\s*)?(?:lb|lbs|pound)s?\b"],
            template: Some("$1 lb"),
        },
        FieldRule {
            field: Field::Coverage,
            patterns: &[r"(?i)covers?\s*(?:up\s*to\s*)?(?:approximately\s*)?(\d+(?:\.\d+)?)\s*sq\.?\s*ft"],
            template: Some("up to $1 sq ft"),
        },
        FieldRule {
            field: Field::Spec("joint_width"),
            patterns: &[
                r#"(?i)(\d+/\d+)\s*(?:in\.?|inch|")?\s*(?:to|-|–)\s*(\d+/\d+)\s*(?:in\.?|inch|")?"#,
            ],
            template: Some("$1 in to $2 in"),
        },
    ])
});

const VOCAB: &[VocabRule] = &[VocabRule {
    field: Field::Spec("grout_type"),
    terms: &[
        ("unsanded", "unsanded"),
        ("non-sanded", "unsanded"),
        ("sanded", "sanded"),
        ("epoxy", "epoxy"),
        ("urethane", "urethane"),
        ("premixed", "premixed"),
        ("pre-mixed", "premixed"),
    ],
}];

pub fn extract(page: &PageText) -> TypeFields {
    let mut out = TypeFields::default();
    rules::apply(&RULES, &page.text, &mut out);
    rules::apply_vocab(VOCAB, &page.lower, &mut out);
    out
}
