use std::sync::LazyLock;

use super::rules::{self, CompiledRule, Field, FieldRule, TypeFields, VocabRule};
use super::PageText;

static RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    rules::compile(&[
        FieldRule {
            field: Field::Spec("notch_size"),
            patterns: &[
                r#"(?i)(\d+/\d+\s*(?:in\.?|")?\s*x\s*\d+/\d+(?:\s*(?:in\.?|"))?(?:\s*x\s*\d+/\d+(?:\s*(?:in\.?|"))?)?)\s*(?:square|u|v|slant)?[- ]?notch"#,
            ],
            template: None,
        },
        FieldRule {
            field: Field::Spec("blade_diameter"),
            patterns: &[r#"(?i)(\d+(?:\.\d+)?)\s*(?:in\.?|"|-in\.?)\s*(?:diamond\s*|continuous\s*rim\s*|turbo\s*)?blade"#],
            template: Some("$1 in"),
        },
    ])
});

const VOCAB: &[VocabRule] = &[
    VocabRule {
        field: Field::Spec("tool_type"),
        terms: &[
            ("trowel", "trowel"),
            ("grout float", "grout float"),
            ("float", "float"),
            ("sponge", "sponge"),
            ("tile cutter", "tile cutter"),
            ("wet saw", "wet saw"),
            ("nippers", "nippers"),
            ("spacers", "spacers"),
            ("leveling system", "leveling system"),
            ("mixing paddle", "mixing paddle"),
            ("bucket", "bucket"),
            ("knee pads", "knee pads"),
            ("grout bag", "grout bag"),
        ],
    },
    VocabRule {
        field: Field::Spec("power_source"),
        terms: &[("cordless", "cordless"), ("battery", "cordless"), ("corded", "corded"), ("electric", "corded")],
    },
];

pub fn extract(page: &PageText) -> TypeFields {
    let mut out = TypeFields::default();
    rules::apply(&RULES, &page.text, &mut out);
    rules::apply_vocab(VOCAB, &page.title_lower, &mut out);
    rules::apply_vocab(VOCAB, &page.lower, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trowel_notch_and_type() {
        let page = PageText::from_html(
            "<h1>QEP 1/4 in. x 3/8 in. Square Notch Trowel</h1><p>Comfort grip handle</p>",
            Some("QEP 1/4 in. x 3/8 in. Square Notch Trowel"),
        );
        let out = extract(&page);
        assert_eq!(out.specifications["tool_type"], "trowel");
        assert_eq!(out.specifications["notch_size"], "1/4 in. x 3/8 in.");
        assert!(!out.specifications.contains_key("power_source"));
    }

    #[test]
    fn wet_saw_blade_and_power() {
        let page = PageText::from_html(
            "<h1>7 in. Tile Wet Saw</h1><p>Includes 7 in. diamond blade. Corded electric motor.</p>",
            Some("7 in. Tile Wet Saw"),
        );
        let out = extract(&page);
        assert_eq!(out.specifications["tool_type"], "wet saw");
        assert_eq!(out.specifications["blade_diameter"], "7 in");
        assert_eq!(out.specifications["power_source"], "corded");
    }
}
