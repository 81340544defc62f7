use std::sync::LazyLock;

use super::rules::{self, CompiledRule, Field, FieldRule, TypeFields, VocabRule};
use super::PageText;

static RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    rules::compile(&[
        FieldRule {
            field: Field::Spec("pieces_per_box"),
            patterns: &[r"(?i)(\d+)\s*(?:pieces|pcs|tiles)\s*(?:per|/)\s*(?:box|carton|case)"],
            template: None,
        },
        FieldRule {
            field: Field::Spec("pei_rating"),
            patterns: &[r"(?i)\bpei\s*(?:rating|class)?\s*:?\s*(\d|[IV]{1,3})\b"],
            template: None,
        },
        FieldRule {
            field: Field::Spec("shade_variation"),
            patterns: &[r"(?i)\b(V[1-4])\b\s*(?:-|–)?\s*(?:shade|variation|low|slight|moderate|high|substantial)"],
            template: None,
        },
    ])
});

const VOCAB: &[VocabRule] = &[VocabRule {
    field: Field::Spec("edge"),
    terms: &[("rectified", "rectified"), ("pressed edge", "pressed"), ("cushion edge", "cushion")],
}];

pub fn extract(page: &PageText) -> TypeFields {
    let mut out = TypeFields::default();
    rules::apply(&RULES, &page.text, &mut out);
    rules::apply_vocab(VOCAB, &page.lower, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_specific_fields() {
        let page = PageText::from_html(
            "<p>Carrara Porcelain Tile</p><p>8 pieces per box</p><p>PEI Rating: 4</p>\
             <p>V2 - Slight variation</p><p>Rectified edges</p>",
            Some("Carrara Porcelain Tile"),
        );
        let out = extract(&page);
        assert_eq!(out.specifications["pieces_per_box"], "8");
        assert_eq!(out.specifications["pei_rating"], "4");
        assert_eq!(out.specifications["shade_variation"], "V2");
        assert_eq!(out.specifications["edge"], "rectified");
    }
}
