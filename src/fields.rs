//! Field registry — labels and display formatting for every declared field.
//!
//! The registry is total over the declared field set: asking it about a
//! field no step binds is a programmer error and comes back as a
//! [`LookupError`], never a silent default.

use crate::error::LookupError;
use crate::wizard::store::AnswerStore;

/// Sentinel shown for a field the applicant never filled in.
pub const NOT_PROVIDED: &str = "-";

/// Field holding the applicant photo upload.
pub const PHOTO_FIELD: &str = "photo";

/// Personal-section fields in display order.
pub const PERSONAL_FIELDS: [&str; 16] = [
    "firstname",
    "lastname",
    "age",
    "birthdate",
    "religion",
    "class",
    "school",
    "address",
    "phone",
    "email",
    "socialMedia",
    "disease",
    "foodAllergy",
    "drugAllergy",
    "shirtSize",
    "activity",
];

/// Parent-section fields in display order.
pub const PARENT_FIELDS: [&str; 4] = [
    "parentFirstName",
    "parentLastName",
    "parentRelation",
    "parentPhone",
];

/// Display transform applied to a field's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Formatter {
    /// Show the value as entered.
    Identity,
    /// Map a religion code to its display label.
    Religion,
    /// Map a class-level code to its display label.
    Grade,
}

struct FieldEntry {
    name: &'static str,
    label: &'static str,
    formatter: Formatter,
}

const FIELDS: &[FieldEntry] = &[
    FieldEntry { name: "photo", label: "Photo", formatter: Formatter::Identity },
    FieldEntry { name: "firstname", label: "First name", formatter: Formatter::Identity },
    FieldEntry { name: "lastname", label: "Last name", formatter: Formatter::Identity },
    FieldEntry { name: "age", label: "Age", formatter: Formatter::Identity },
    FieldEntry { name: "birthdate", label: "Date of birth", formatter: Formatter::Identity },
    FieldEntry { name: "religion", label: "Religion", formatter: Formatter::Religion },
    FieldEntry { name: "class", label: "Class level", formatter: Formatter::Grade },
    FieldEntry { name: "school", label: "School", formatter: Formatter::Identity },
    FieldEntry { name: "address", label: "Address", formatter: Formatter::Identity },
    FieldEntry { name: "phone", label: "Phone number", formatter: Formatter::Identity },
    FieldEntry { name: "email", label: "Email", formatter: Formatter::Identity },
    FieldEntry { name: "socialMedia", label: "Social media", formatter: Formatter::Identity },
    FieldEntry { name: "disease", label: "Chronic conditions", formatter: Formatter::Identity },
    FieldEntry { name: "foodAllergy", label: "Food allergies", formatter: Formatter::Identity },
    FieldEntry { name: "drugAllergy", label: "Drug allergies", formatter: Formatter::Identity },
    FieldEntry { name: "shirtSize", label: "Shirt size", formatter: Formatter::Identity },
    FieldEntry { name: "activity", label: "Activities and past work", formatter: Formatter::Identity },
    FieldEntry { name: "parentFirstName", label: "Guardian first name", formatter: Formatter::Identity },
    FieldEntry { name: "parentLastName", label: "Guardian last name", formatter: Formatter::Identity },
    FieldEntry { name: "parentRelation", label: "Relationship", formatter: Formatter::Identity },
    FieldEntry { name: "parentPhone", label: "Guardian phone number", formatter: Formatter::Identity },
    FieldEntry { name: "generalAnswer1", label: "General question 1", formatter: Formatter::Identity },
    FieldEntry { name: "generalAnswer2", label: "General question 2", formatter: Formatter::Identity },
    FieldEntry { name: "generalAnswer3", label: "General question 3", formatter: Formatter::Identity },
    FieldEntry { name: "majorAnswer1", label: "Major question 1", formatter: Formatter::Identity },
    FieldEntry { name: "majorAnswer2", label: "Major question 2", formatter: Formatter::Identity },
    FieldEntry { name: "majorAnswer3", label: "Major question 3", formatter: Formatter::Identity },
];

/// Religion code → display label.
pub fn religion_label(code: &str) -> Option<&'static str> {
    match code {
        "atheist" => Some("No religion"),
        "buddhist" => Some("Buddhist"),
        "christianity" => Some("Christian"),
        "islam" => Some("Muslim"),
        "other" => Some("Other"),
        _ => None,
    }
}

/// Class-level code → display label.
pub fn grade_label(code: &str) -> Option<&'static str> {
    match code {
        "m3" => Some("Mathayom 3"),
        "m4" => Some("Mathayom 4"),
        "m5" => Some("Mathayom 5"),
        "m6" => Some("Mathayom 6"),
        "other" => Some("Other"),
        _ => None,
    }
}

fn entry(name: &str) -> Result<&'static FieldEntry, LookupError> {
    FIELDS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| LookupError::UnknownField {
            name: name.to_string(),
        })
}

/// Display label for a declared field.
pub fn label(name: &str) -> Result<&'static str, LookupError> {
    entry(name).map(|f| f.label)
}

/// Display string for a field's answer: raw value lookup plus the
/// field-specific transform, `"-"` when absent or blank.
///
/// Pure function of its inputs; calling it twice with the same store
/// yields the same string.
pub fn format(name: &str, store: &AnswerStore) -> Result<String, LookupError> {
    let field = entry(name)?;

    let Some(value) = store.get(name) else {
        return Ok(NOT_PROVIDED.to_string());
    };
    if value.is_blank() {
        return Ok(NOT_PROVIDED.to_string());
    }

    let raw = value.display();
    let formatted = match field.formatter {
        Formatter::Identity => raw,
        // Unknown codes fall through as entered; the select widgets only
        // offer known codes, so a miss here means hand-edited draft data.
        Formatter::Religion => religion_label(&raw).map(str::to_string).unwrap_or(raw),
        Formatter::Grade => grade_label(&raw).map(str::to_string).unwrap_or(raw),
    };
    Ok(formatted)
}
