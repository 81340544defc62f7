pub mod detect;
pub mod extract;
pub mod patterns;

use serde_json::Value;

use crate::record::{DetectionResult, ProductRecord};
use detect::PageTypeClassifier;

/// Two passes: page type, then the matching extractor.
pub fn parse_page(
    classifier: &PageTypeClassifier,
    html: &str,
    url: &str,
    structured: Option<&Value>,
) -> (DetectionResult, ProductRecord) {
    let detection = classifier.classify(html, url, structured);
    let record = extract::extract(detection.page_type, html, url, structured);
    (detection, record)
}
