// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selector matching and update application for JSON documents.
//!
//! Selectors match on top-level field equality. Updates are either a full
//! replacement document or a set of `$set` / `$unset` operators.

use serde_json::{Map, Value};

pub(crate) const ID_FIELD: &str = "_id";

pub(crate) type Document = Map<String, Value>;

/// Reasons a single operation is rejected. Reported back as write errors.
pub(crate) type Rejection = String;

/// Accept `value` as a document (a JSON object).
pub(crate) fn as_document(value: Value, what: &str) -> Result<Document, Rejection> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("{what} must be a JSON object, got {}", kind_of(&other))),
    }
}

/// Accept `value` as a selector: an object with no `$` operators.
pub(crate) fn as_selector(value: Value) -> Result<Document, Rejection> {
    let selector = as_document(value, "selector")?;
    if let Some(key) = selector.keys().find(|k| k.starts_with('$')) {
        return Err(format!("query operator `{key}` is not supported"));
    }
    Ok(selector)
}

/// `true` when every selector field is present in `doc` with an equal value.
pub(crate) fn matches(selector: &Document, doc: &Document) -> bool {
    selector.iter().all(|(k, v)| doc.get(k) == Some(v))
}

/// Give `doc` a fresh UUID `_id` unless it already has one.
pub(crate) fn ensure_id(doc: &mut Document) {
    if !doc.contains_key(ID_FIELD) {
        doc.insert(
            ID_FIELD.to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }
}

/// Canonical key used for the uniqueness constraint on `_id`.
pub(crate) fn id_key(doc: &Document) -> String {
    doc.get(ID_FIELD).map(Value::to_string).unwrap_or_default()
}

/// Return `current` with `update` applied.
pub(crate) fn apply_update(current: &Document, update: &Document) -> Result<Document, Rejection> {
    let operators = update.keys().filter(|k| k.starts_with('$')).count();

    if operators == 0 {
        return replace(current, update);
    }
    if operators != update.len() {
        return Err("update document mixes operators and plain fields".to_string());
    }

    let mut next = current.clone();
    for (op, arg) in update {
        let Value::Object(fields) = arg else {
            return Err(format!("argument to `{op}` must be a JSON object"));
        };
        match op.as_str() {
            "$set" => {
                for (k, v) in fields {
                    if k == ID_FIELD && current.get(ID_FIELD).is_some_and(|id| id != v) {
                        return Err("the `_id` field cannot be modified".to_string());
                    }
                    next.insert(k.clone(), v.clone());
                }
            }
            "$unset" => {
                for k in fields.keys() {
                    if k == ID_FIELD {
                        return Err("the `_id` field cannot be removed".to_string());
                    }
                    next.remove(k);
                }
            }
            unknown => return Err(format!("unknown update operator `{unknown}`")),
        }
    }
    Ok(next)
}

fn replace(current: &Document, replacement: &Document) -> Result<Document, Rejection> {
    let mut next = replacement.clone();
    match (current.get(ID_FIELD), replacement.get(ID_FIELD)) {
        (Some(old), Some(new)) if old != new => {
            Err("the `_id` field cannot be modified".to_string())
        }
        (Some(old), _) => {
            next.insert(ID_FIELD.to_string(), old.clone());
            Ok(next)
        }
        (None, _) => Ok(next),
    }
}

/// Document inserted by an upsert that matched nothing.
///
/// Starts from the selector's fields, then applies `update` to it.
pub(crate) fn upsert_seed(selector: &Document, update: &Document) -> Result<Document, Rejection> {
    let mut doc = apply_update(selector, update)?;
    ensure_id(&mut doc);
    Ok(doc)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(v: Value) -> Document {
        as_document(v, "document").unwrap()
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = as_document(json!([1, 2]), "document").unwrap_err();
        assert_eq!(err, "document must be a JSON object, got an array");
    }

    #[test]
    fn selector_operators_are_rejected() {
        let err = as_selector(json!({"age": {"$gt": 3}, "$or": []})).unwrap_err();
        assert!(err.contains("$or"), "got: {err}");
    }

    #[test]
    fn empty_selector_matches_everything() {
        assert!(matches(&Document::new(), &doc(json!({"a": 1}))));
    }

    #[test]
    fn selector_matches_on_field_equality() {
        let d = doc(json!({"name": "ada", "age": 36, "tags": ["x"]}));
        assert!(matches(&doc(json!({"name": "ada"})), &d));
        assert!(matches(&doc(json!({"name": "ada", "tags": ["x"]})), &d));
        assert!(!matches(&doc(json!({"name": "bob"})), &d));
        assert!(!matches(&doc(json!({"missing": null})), &d));
    }

    #[test]
    fn ensure_id_keeps_existing_id() {
        let mut d = doc(json!({"_id": 7}));
        ensure_id(&mut d);
        assert_eq!(d["_id"], json!(7));
        assert_eq!(id_key(&d), "7");
    }

    #[test]
    fn ensure_id_generates_uuid() {
        let mut d = doc(json!({"a": 1}));
        ensure_id(&mut d);
        let id = d["_id"].as_str().unwrap();
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn replacement_keeps_id() {
        let current = doc(json!({"_id": 1, "a": 1, "b": 2}));
        let next = apply_update(&current, &doc(json!({"c": 3}))).unwrap();
        assert_eq!(Value::Object(next), json!({"_id": 1, "c": 3}));
    }

    #[test]
    fn replacement_cannot_change_id() {
        let current = doc(json!({"_id": 1}));
        assert!(apply_update(&current, &doc(json!({"_id": 2}))).is_err());
    }

    #[test]
    fn set_and_unset_operators() {
        let current = doc(json!({"_id": 1, "a": 1, "b": 2}));
        let update = doc(json!({"$set": {"a": 10, "c": 3}, "$unset": {"b": ""}}));
        let next = apply_update(&current, &update).unwrap();
        assert_eq!(Value::Object(next), json!({"_id": 1, "a": 10, "c": 3}));
    }

    #[test]
    fn mixed_update_is_rejected() {
        let current = doc(json!({"_id": 1}));
        let err = apply_update(&current, &doc(json!({"$set": {"a": 1}, "b": 2}))).unwrap_err();
        assert!(err.contains("mixes"));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let current = doc(json!({"_id": 1}));
        let err = apply_update(&current, &doc(json!({"$inc": {"a": 1}}))).unwrap_err();
        assert_eq!(err, "unknown update operator `$inc`");
    }

    #[test]
    fn unset_id_is_rejected() {
        let current = doc(json!({"_id": 1}));
        assert!(apply_update(&current, &doc(json!({"$unset": {"_id": ""}}))).is_err());
    }

    #[test]
    fn upsert_seed_with_operators_extends_selector() {
        let seed = upsert_seed(
            &doc(json!({"sku": "A-1"})),
            &doc(json!({"$set": {"qty": 5}})),
        )
        .unwrap();
        assert_eq!(seed["sku"], json!("A-1"));
        assert_eq!(seed["qty"], json!(5));
        assert!(seed.contains_key("_id"));
    }

    #[test]
    fn upsert_seed_with_replacement_uses_selector_id() {
        let seed = upsert_seed(&doc(json!({"_id": "k"})), &doc(json!({"v": 1}))).unwrap();
        assert_eq!(Value::Object(seed), json!({"_id": "k", "v": 1}));
    }
}
