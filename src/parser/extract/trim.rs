use std::sync::LazyLock;

use super::rules::{self, CompiledRule, Field, FieldRule, TypeFields, VocabRule};
use super::PageText;

static RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    rules::compile(&[
        FieldRule {
            field: Field::Spec("length"),
            patterns: &[
                r"(?im)^\s*length\s*:\s*([^\n]{1,20}?)\s*$",
                r#"(?i)(\d+(?:\.\d+)?\s*(?:in\.?|ft\.?|"|'))\s*(?:long|length|l\b)"#,
            ],
            template: None,
        },
        FieldRule {
            field: Field::Spec("profile_height"),
            patterns: &[r#"(?i)(\d+/\d+\s*(?:in\.?|"))\s*(?:height|profile|tall)"#],
            template: None,
        },
    ])
});

const VOCAB: &[VocabRule] = &[
    VocabRule {
        field: Field::Spec("trim_type"),
        terms: &[
            ("bullnose", "bullnose"),
            ("quarter round", "quarter round"),
            ("pencil liner", "pencil liner"),
            ("chair rail", "chair rail"),
            ("stair nose", "stair nose"),
            ("t-molding", "t-molding"),
            ("reducer", "reducer"),
            ("threshold", "threshold"),
            ("baseboard", "baseboard"),
            ("end cap", "end cap"),
            ("edge trim", "edge trim"),
            ("jolly", "edge trim"),
        ],
    },
    VocabRule {
        field: Field::Spec("material"),
        terms: &[
            ("stainless steel", "stainless steel"),
            ("aluminum", "aluminum"),
            ("aluminium", "aluminum"),
            ("brass", "brass"),
            ("pvc", "pvc"),
            ("porcelain", "porcelain"),
            ("ceramic", "ceramic"),
            ("marble", "marble"),
            ("wood", "wood"),
        ],
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
    fn trim_type_and_material_prefer_title() {
        let page = PageText::from_html(
            "<h1>Schluter Jolly Brushed Stainless Steel Edge Trim</h1>\
             <p>Length: 8 ft. 2-1/2 in.</p><p>Also available in aluminum and PVC.</p>\
             <p>3/8 in. profile height</p>",
            Some("Schluter Jolly Brushed Stainless Steel Edge Trim"),
        );
        let out = extract(&page);
        assert_eq!(out.specifications["trim_type"], "edge trim");
        assert_eq!(out.specifications["material"], "stainless steel");
        assert_eq!(out.specifications["length"], "8 ft. 2-1/2 in.");
        assert_eq!(out.specifications["profile_height"], "3/8 in.");
    }
}
