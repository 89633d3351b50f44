use crate::config::DerivedField;
use crate::parsers::html::selector;
use scraper::Html;
use std::collections::BTreeMap;

/// Collects `<meta>` tags into a key/value map.
///
/// The key is `name`, or `property` when `name` is missing or empty. Tags
/// without a key or without content are ignored. A later tag overwrites an
/// earlier one with the same key.
pub fn collect(doc: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let Some(meta_selector) = selector("meta") else {
        return metadata;
    };

    for meta in doc.select(&meta_selector) {
        let element = meta.value();
        let key = non_empty(element.attr("name")).or_else(|| non_empty(element.attr("property")));
        let content = non_empty(element.attr("content"));
        if let (Some(key), Some(content)) = (key, content) {
            metadata.insert(key.to_string(), content.to_string());
        }
    }

    ::log::debug!("Collected {} metadata entries", metadata.len());
    metadata
}

/// Fills each derived key from the first of its sources that has a value
pub fn apply_derived(metadata: &mut BTreeMap<String, String>, fields: &[DerivedField]) {
    for field in fields {
        if let Some(value) = first_non_empty(metadata, &field.sources) {
            let value = value.to_string();
            metadata.insert(field.key.clone(), value);
        }
    }
}

/// First non-empty value among `keys`, in order
pub fn first_non_empty<'a>(metadata: &'a BTreeMap<String, String>, keys: &[String]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| metadata.get(key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
