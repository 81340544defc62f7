pub mod generic;
pub mod grout;
pub mod pricing;
pub mod rules;
pub mod structured;
pub mod tile;
pub mod tools;
pub mod trim;
pub mod vinyl;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::html::{strip_tags, Document};
use crate::record::{PageType, ProductRecord};
use rules::TypeFields;

static BRAND_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""brand"\s*:\s*(?:\{[^}]*?"name"\s*:\s*)?"([^"]{1,60})""#).unwrap()
});
static SKU_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{6,})\D*$").unwrap());

const MAX_IMAGES: usize = 10;
const IMAGE_NOISE: &[&str] = &["logo", "icon", "sprite", "placeholder", "badge"];

/// One page's text views, computed once and shared by every extractor.
pub struct PageText {
    pub text: String,
    pub lower: String,
    pub title_lower: String,
}

impl PageText {
    pub fn new(text: String, title: Option<&str>) -> Self {
        let lower = text.to_lowercase();
        Self {
            text,
            lower,
            title_lower: title.unwrap_or_default().to_lowercase(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_html(html: &str, title: Option<&str>) -> Self {
        Self::new(crate::html::visible_text(html), title)
    }
}

/// A page-type extraction strategy.
pub struct Extractor {
    pub name: &'static str,
    pub page_type: PageType,
    type_specific: fn(&PageText) -> TypeFields,
}

fn no_type_specific(_: &PageText) -> TypeFields {
    TypeFields::default()
}

const EXTRACTORS: &[Extractor] = &[
    Extractor { name: "TileExtractor", page_type: PageType::Tile, type_specific: tile::extract },
    Extractor { name: "GroutExtractor", page_type: PageType::Grout, type_specific: grout::extract },
    Extractor {
        name: "TrimMoldingExtractor",
        page_type: PageType::TrimMolding,
        type_specific: trim::extract,
    },
    Extractor {
        name: "LuxuryVinylExtractor",
        page_type: PageType::LuxuryVinyl,
        type_specific: vinyl::extract,
    },
    Extractor {
        name: "InstallationToolExtractor",
        page_type: PageType::InstallationTool,
        type_specific: tools::extract,
    },
    Extractor { name: "DefaultExtractor", page_type: PageType::Unknown, type_specific: no_type_specific },
];

pub fn extractor_for(page_type: PageType) -> &'static Extractor {
    EXTRACTORS
        .iter()
        .find(|e| e.page_type == page_type)
        .unwrap_or(&EXTRACTORS[EXTRACTORS.len() - 1])
}

static SHARED_RULES: LazyLock<Vec<rules::CompiledRule>> = LazyLock::new(|| rules::compile(rules::SHARED));

impl Extractor {
    pub fn extract_type_specific(&self, page: &PageText) -> TypeFields {
        let mut fields = (self.type_specific)(page);
        rules::apply(&SHARED_RULES, &page.text, &mut fields);
        rules::apply_vocab(rules::FINISH_VOCAB, &page.lower, &mut fields);
        fields
    }
}

/// Fields every extractor shares.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BaseFields {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub pricing: pricing::Pricing,
}

/// Base fields, structured data first and page markup second.
///
/// `raw` is only searched for inline script JSON; everything else reads the
/// parsed document or its visible `text`.
pub fn extract_base(
    doc: &Document,
    raw: &str,
    text: &str,
    url: &str,
    structured: Option<&Value>,
) -> BaseFields {
    let product = structured
        .and_then(structured::product_node)
        .cloned()
        .or_else(|| structured::find_jsonld_product(doc));
    let product = product.as_ref();

    let title = product
        .and_then(|p| structured::text(p, "name"))
        .or_else(|| doc.first_text("h1"))
        .or_else(|| doc.meta("og:title"))
        .or_else(|| {
            doc.first_text("title")
                .and_then(|t| t.split(" | ").next().map(|s| s.trim().to_string()))
        })
        .filter(|t| !t.is_empty());

    let brand = product
        .and_then(|p| structured::text(p, "brand"))
        .or_else(|| doc.meta("product:brand"))
        .or_else(|| doc.meta("brand"))
        .or_else(|| {
            BRAND_JSON_RE
                .captures_iter(raw)
                .map(|c| c[1].trim().to_string())
                .find(|b| !b.is_empty())
        });

    let description = product
        .and_then(|p| structured::text(p, "description"))
        .or_else(|| doc.meta("description"))
        .or_else(|| doc.meta("og:description"))
        .map(|d| strip_tags(&d))
        .filter(|d| !d.is_empty());

    let mut images = product.map(structured::images).unwrap_or_default();
    images.extend(doc.meta("og:image"));
    images.extend(
        doc.images()
            .into_iter()
            .filter(|src| !IMAGE_NOISE.iter().any(|n| src.to_lowercase().contains(n))),
    );
    let mut seen = std::collections::HashSet::new();
    images.retain(|i| seen.insert(i.clone()));
    images.truncate(MAX_IMAGES);

    let sku = product.and_then(structured::sku).or_else(|| sku_from_url(url));

    let signals = pricing::scan(text, product.and_then(structured::offer_price));
    let pricing = pricing::resolve(signals, title.as_deref());

    BaseFields { sku, title, brand, description, images, pricing }
}

/// Trailing run of at least six digits in the URL path.
pub fn sku_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    SKU_URL_RE.captures(path).map(|c| c[1].to_string())
}

/// Run the extractor for `page_type` and assemble a flat record.
///
/// Named extraction owns its specification keys; the generic pass only fills
/// keys nobody claimed. Nothing here fails: misses stay `None`.
pub fn extract(page_type: PageType, html: &str, url: &str, structured: Option<&Value>) -> ProductRecord {
    let extractor = extractor_for(page_type);
    let doc = Document::parse(html);
    let text = doc.visible_text();
    let base = extract_base(&doc, html, &text, url, structured);
    let page = PageText::new(text, base.title.as_deref());
    let fields = extractor.extract_type_specific(&page);

    let mut specifications = fields.specifications;
    for (key, value) in generic::detect(&doc, html, &page.text) {
        specifications.entry(key).or_insert(value);
    }

    for (name, missing) in [
        ("title", base.title.is_none()),
        ("brand", base.brand.is_none()),
        ("size", fields.size.is_none()),
        ("price", base.pricing == pricing::Pricing::default()),
    ] {
        if missing {
            debug!("{}: no {} found for {}", extractor.name, name, url);
        }
    }

    ProductRecord {
        url: url.to_string(),
        sku: base.sku,
        title: base.title,
        brand: base.brand,
        description: base.description,
        price_per_box: base.pricing.per_box,
        price_per_sqft: base.pricing.per_sqft,
        price_per_piece: base.pricing.per_piece,
        size: fields.size,
        thickness: fields.thickness,
        coverage: fields.coverage,
        finish: fields.finish,
        color: fields.color,
        material: None,
        specifications,
        images: base.images,
        page_type,
        ..Default::default()
    }
}
