//! The shared answer store — one flat mapping from field name to answer.
//!
//! Every step merges its fields into this store on advance; the
//! verification view and the submission payload read from it. Field names
//! form a single flat namespace, so a field written by any step is visible
//! to every later step.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque reference to a previously uploaded file.
///
/// The upload widget owns the actual bytes; the core only stores and
/// forwards this reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRef {
    /// Storage key returned by the upload widget.
    pub key: String,
    /// Original filename, if the widget reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl UploadRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// One entered answer.
///
/// Untagged so the draft record and the submission payload keep the flat
/// `field → value` JSON layout: numbers stay numbers, dates are ISO
/// strings, uploads are small objects, everything else is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Date(NaiveDate),
    Upload(UploadRef),
    Text(String),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_upload(&self) -> Option<&UploadRef> {
        match self {
            Self::Upload(r) => Some(r),
            _ => None,
        }
    }

    /// Raw display form of the value, with no field-specific formatting.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Upload(r) => r
                .filename
                .clone()
                .unwrap_or_else(|| r.key.clone()),
        }
    }

    /// Whether the value counts as "not provided" for display purposes.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The single shared answer store.
///
/// A `BTreeMap` keeps the payload field order stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.answers.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.answers.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: AnswerValue) {
        self.answers.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<AnswerValue> {
        self.answers.remove(field)
    }

    /// Additive merge: each entry replaces the whole field it names;
    /// fields owned by other steps are untouched.
    pub fn merge(&mut self, fields: impl IntoIterator<Item = (String, AnswerValue)>) {
        for (name, value) in fields {
            self.answers.insert(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.answers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_additive() {
        let mut store = AnswerStore::new();
        store.merge([
            ("firstname".to_string(), AnswerValue::text("Somchai")),
            ("age".to_string(), AnswerValue::Number(16)),
        ]);
        store.merge([("school".to_string(), AnswerValue::text("Triam Udom"))]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("firstname").unwrap().as_text(), Some("Somchai"));
        assert_eq!(store.get("age"), Some(&AnswerValue::Number(16)));
    }

    #[test]
    fn merge_replaces_whole_fields() {
        let mut store = AnswerStore::new();
        store.merge([("firstname".to_string(), AnswerValue::text("Somchai"))]);
        store.merge([("firstname".to_string(), AnswerValue::text("Somsak"))]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("firstname").unwrap().as_text(), Some("Somsak"));
    }

    #[test]
    fn absent_field_is_none() {
        let store = AnswerStore::new();
        assert!(store.get("disease").is_none());
        assert!(!store.contains("disease"));
    }

    #[test]
    fn serde_keeps_flat_layout() {
        let mut store = AnswerStore::new();
        store.insert("firstname", AnswerValue::text("Somchai"));
        store.insert("age", AnswerValue::Number(16));
        store.insert(
            "birthdate",
            AnswerValue::Date(NaiveDate::from_ymd_opt(2009, 5, 4).unwrap()),
        );
        store.insert(
            "photo",
            AnswerValue::Upload(UploadRef::new("u/abc123").with_filename("me.jpg")),
        );

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["firstname"], "Somchai");
        assert_eq!(json["age"], 16);
        assert_eq!(json["birthdate"], "2009-05-04");
        assert_eq!(json["photo"]["key"], "u/abc123");

        let parsed: AnswerStore = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn untagged_deserialization_picks_expected_variants() {
        let parsed: AnswerStore = serde_json::from_str(
            r#"{"age": 17, "birthdate": "2008-01-30", "school": "Suankularb", "photo": {"key": "u/x"}}"#,
        )
        .unwrap();

        assert_eq!(parsed.get("age"), Some(&AnswerValue::Number(17)));
        assert!(matches!(parsed.get("birthdate"), Some(AnswerValue::Date(_))));
        assert_eq!(parsed.get("school").unwrap().as_text(), Some("Suankularb"));
        assert_eq!(parsed.get("photo").unwrap().as_upload().unwrap().key, "u/x");
    }

    #[test]
    fn display_forms() {
        assert_eq!(AnswerValue::text("hi").display(), "hi");
        assert_eq!(AnswerValue::Number(42).display(), "42");
        assert_eq!(
            AnswerValue::Date(NaiveDate::from_ymd_opt(2008, 1, 30).unwrap()).display(),
            "2008-01-30"
        );
        assert_eq!(
            AnswerValue::Upload(UploadRef::new("u/1").with_filename("cv.pdf")).display(),
            "cv.pdf"
        );
        assert_eq!(AnswerValue::Upload(UploadRef::new("u/1")).display(), "u/1");
    }

    #[test]
    fn blank_detection() {
        assert!(AnswerValue::text("").is_blank());
        assert!(AnswerValue::text("   ").is_blank());
        assert!(!AnswerValue::text("x").is_blank());
        assert!(!AnswerValue::Number(0).is_blank());
    }
}
