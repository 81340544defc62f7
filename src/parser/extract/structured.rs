//! Structured product data (JSON-LD `Product` nodes).

use serde_json::Value;
use tracing::debug;

use crate::html::Document;

/// First JSON-LD block on the page that carries a `Product` node.
pub fn find_jsonld_product(doc: &Document) -> Option<Value> {
    for block in doc.jsonld_blocks() {
        let raw = block.trim();
        if raw.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => {
                if let Some(node) = product_node(&v) {
                    return Some(node.clone());
                }
            }
            Err(e) => debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }
    None
}

/// Locate the product node inside whatever shape the caller handed over:
/// a bare product, a `@graph`, an array of nodes, or a map keyed by `@type`.
pub fn product_node(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(product_node),
        Value::Object(obj) => {
            if is_product(value) {
                return Some(value);
            }
            if let Some(graph) = obj.get("@graph") {
                return product_node(graph);
            }
            if let Some(p) = obj.get("Product") {
                return match p {
                    Value::Array(items) => items.first(),
                    other => Some(other),
                };
            }
            // Untyped payloads that look like a product still count.
            if !obj.contains_key("@type") && obj.contains_key("name") {
                return Some(value);
            }
            None
        }
        _ => None,
    }
}

fn is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("product"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str().is_some_and(|s| s.eq_ignore_ascii_case("product"))),
        _ => false,
    }
}

/// String-ish field, accepting numbers and `{ "name": .. }` objects.
pub fn text(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(value_text)
}

fn value_text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(o) => o.get("name")?.as_str()?.trim().to_string(),
        Value::Array(items) => return items.first().and_then(value_text),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

pub fn sku(node: &Value) -> Option<String> {
    text(node, "sku").or_else(|| text(node, "productID")).or_else(|| text(node, "mpn"))
}

pub fn images(node: &Value) -> Vec<String> {
    let mut out = Vec::new();
    match node.get("image") {
        Some(Value::String(s)) => out.push(s.clone()),
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    Value::Object(o) => out.extend(o.get("url").and_then(Value::as_str).map(String::from)),
                    _ => {}
                }
            }
        }
        Some(Value::Object(o)) => out.extend(o.get("url").and_then(Value::as_str).map(String::from)),
        _ => {}
    }
    out
}

/// Unit attached to a structured offer price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceUnit {
    Box,
    SqFt,
    Each,
    Unspecified,
}

pub fn offer_price(node: &Value) -> Option<(f64, PriceUnit)> {
    let offers = node.get("offers")?;
    let offer = match offers {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let price = match offer.get("price").or_else(|| offer.get("lowPrice"))? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.replace([',', '$'], "").trim().parse().ok()?,
        _ => return None,
    };
    let unit_text = offer
        .get("priceSpecification")
        .and_then(|spec| text(spec, "unitCode").or_else(|| text(spec, "unitText")))
        .or_else(|| text(offer, "unitCode"))
        .unwrap_or_default()
        .to_lowercase();
    let unit = match unit_text.as_str() {
        "" => PriceUnit::Unspecified,
        u if u.contains("sq") || u == "ftk" || u == "sqf" => PriceUnit::SqFt,
        u if u.contains("box") || u == "bx" || u == "ct" => PriceUnit::Box,
        u if u.contains("each") || u == "ea" || u == "c62" || u.contains("piece") => PriceUnit::Each,
        _ => PriceUnit::Unspecified,
    };
    Some((price, unit))
}
