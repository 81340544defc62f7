use std::sync::LazyLock;

use super::rules::{self, CompiledRule, Field, FieldRule, TypeFields, VocabRule};
use super::PageText;

static RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    rules::compile(&[
        FieldRule {
            field: Field::Spec("wear_layer"),
            patterns: &[
                r"(?i)(\d+(?:\.\d+)?)\s*mil\s*wear\s*layer",
                r"(?i)wear\s*layer\s*(?:\(mil\))?\s*:?\s*(\d+(?:\.\d+)?)\s*(?:mil)?",
            ],
            template: Some("$1 mil"),
        },
        FieldRule {
            field: Field::Thickness,
            patterns: &[r"(?i)(\d+(?:\.\d+)?)\s*mm\b"],
            template: Some("$1 mm"),
        },
    ])
});

const VOCAB: &[VocabRule] = &[
    VocabRule {
        field: Field::Spec("installation_method"),
        terms: &[
            ("click lock", "click lock"),
            ("click-lock", "click lock"),
            ("glue down", "glue down"),
            ("glue-down", "glue down"),
            ("peel and stick", "peel and stick"),
            ("floating", "floating"),
        ],
    },
    VocabRule {
        field: Field::Spec("core_type"),
        terms: &[("spc", "SPC"), ("stone plastic composite", "SPC"), ("wpc", "WPC"), ("rigid core", "rigid core")],
    },
    VocabRule {
        field: Field::Spec("waterproof"),
        terms: &[("waterproof", "yes")],
    },
];

pub fn extract(page: &PageText) -> TypeFields {
    let mut out = TypeFields::default();
    rules::apply(&RULES, &page.text, &mut out);
    rules::apply_vocab(VOCAB, &page.lower, &mut out);
    out
}
