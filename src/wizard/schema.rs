//! Step forms — the field descriptors each step binds, and their
//! validation.
//!
//! Each data-entry step declares a fixed ordered set of
//! (field, widget kind, constraints) tuples. Constraints are simple
//! presence/shape checks evaluated before an advance is accepted; a
//! failing constraint blocks advancement with field-level errors and never
//! aborts the session.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::error::{FieldErrors, LookupError};
use crate::fields;
use crate::questions::Major;
use crate::wizard::state::WizardStep;
use crate::wizard::store::{AnswerStore, AnswerValue};

/// Widget the UI collaborator should render for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Text,
    Email,
    Number,
    Date,
    Select,
    TextArea,
    Upload,
}

/// A single validation constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The field must be present and non-blank.
    Required,
    /// The value must be a positive whole number.
    Numeric,
    /// The value must be an ISO `YYYY-MM-DD` date.
    Date,
    /// The value must look like an email address.
    Email,
    /// The value must be one of the listed codes.
    OneOf(&'static [&'static str]),
}

/// One field of a step form.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub widget: WidgetKind,
    pub constraints: &'static [Constraint],
}

/// A single page's input surface.
#[derive(Debug, Clone, Copy)]
pub struct StepSchema {
    pub step: WizardStep,
    pub fields: &'static [FieldDescriptor],
}

pub const RELIGION_CODES: &[&str] = &["atheist", "buddhist", "christianity", "islam", "other"];
pub const GRADE_CODES: &[&str] = &["m3", "m4", "m5", "m6", "other"];
pub const SHIRT_SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

const PERSONAL_SCHEMA: StepSchema = StepSchema {
    step: WizardStep::Personal,
    fields: &[
        FieldDescriptor { name: "photo", widget: WidgetKind::Upload, constraints: &[] },
        FieldDescriptor { name: "firstname", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "lastname", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "age", widget: WidgetKind::Number, constraints: &[Constraint::Required, Constraint::Numeric] },
        FieldDescriptor { name: "birthdate", widget: WidgetKind::Date, constraints: &[Constraint::Required, Constraint::Date] },
        FieldDescriptor { name: "religion", widget: WidgetKind::Select, constraints: &[Constraint::Required, Constraint::OneOf(RELIGION_CODES)] },
        FieldDescriptor { name: "class", widget: WidgetKind::Select, constraints: &[Constraint::Required, Constraint::OneOf(GRADE_CODES)] },
        FieldDescriptor { name: "school", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "address", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "phone", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "email", widget: WidgetKind::Email, constraints: &[Constraint::Required, Constraint::Email] },
        FieldDescriptor { name: "socialMedia", widget: WidgetKind::Text, constraints: &[] },
        FieldDescriptor { name: "disease", widget: WidgetKind::Text, constraints: &[] },
        FieldDescriptor { name: "foodAllergy", widget: WidgetKind::Text, constraints: &[] },
        FieldDescriptor { name: "drugAllergy", widget: WidgetKind::Text, constraints: &[] },
        FieldDescriptor { name: "shirtSize", widget: WidgetKind::Select, constraints: &[Constraint::Required, Constraint::OneOf(SHIRT_SIZES)] },
        FieldDescriptor { name: "activity", widget: WidgetKind::TextArea, constraints: &[] },
    ],
};

const PARENT_SCHEMA: StepSchema = StepSchema {
    step: WizardStep::Parent,
    fields: &[
        FieldDescriptor { name: "parentFirstName", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "parentLastName", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "parentRelation", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "parentPhone", widget: WidgetKind::Text, constraints: &[Constraint::Required] },
    ],
};

const GENERAL_SCHEMA: StepSchema = StepSchema {
    step: WizardStep::General,
    fields: &[
        FieldDescriptor { name: "generalAnswer1", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "generalAnswer2", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "generalAnswer3", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
    ],
};

const MAJOR_TEXT_SCHEMA: StepSchema = StepSchema {
    step: WizardStep::MajorQuestions,
    fields: &[
        FieldDescriptor { name: "majorAnswer1", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "majorAnswer2", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "majorAnswer3", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
    ],
};

// The design track collects its third answer as a portfolio upload.
const MAJOR_UPLOAD_SCHEMA: StepSchema = StepSchema {
    step: WizardStep::MajorQuestions,
    fields: &[
        FieldDescriptor { name: "majorAnswer1", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "majorAnswer2", widget: WidgetKind::TextArea, constraints: &[Constraint::Required] },
        FieldDescriptor { name: "majorAnswer3", widget: WidgetKind::Upload, constraints: &[Constraint::Required] },
    ],
};

/// The schema for a step, or `None` for steps without a form
/// (verify, submitted).
pub fn schema_for(step: WizardStep, major: Option<Major>) -> Option<&'static StepSchema> {
    match step {
        WizardStep::Personal => Some(&PERSONAL_SCHEMA),
        WizardStep::Parent => Some(&PARENT_SCHEMA),
        WizardStep::General => Some(&GENERAL_SCHEMA),
        WizardStep::MajorQuestions => match major {
            Some(Major::Design) => Some(&MAJOR_UPLOAD_SCHEMA),
            _ => Some(&MAJOR_TEXT_SCHEMA),
        },
        WizardStep::Verify | WizardStep::Submitted => None,
    }
}

/// What the widget layer needs to draw one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: WidgetKind,
    /// Current value from the store, prefilled on back-navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Render a step form: its fields in declared order with current values.
pub fn render(schema: &StepSchema, store: &AnswerStore) -> Result<Vec<FieldView>, LookupError> {
    schema
        .fields
        .iter()
        .map(|field| {
            Ok(FieldView {
                name: field.name,
                label: fields::label(field.name)?,
                widget: field.widget,
                value: store.get(field.name).map(AnswerValue::display),
            })
        })
        .collect()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

fn check(constraint: Constraint, value: &AnswerValue) -> Result<(), &'static str> {
    match constraint {
        // Presence is handled before per-value checks.
        Constraint::Required => Ok(()),
        Constraint::Numeric => match value {
            AnswerValue::Number(n) if *n > 0 => Ok(()),
            AnswerValue::Text(s) if s.trim().parse::<i64>().is_ok_and(|n| n > 0) => Ok(()),
            _ => Err("must be a positive whole number"),
        },
        Constraint::Date => match value {
            AnswerValue::Date(_) => Ok(()),
            AnswerValue::Text(s)
                if NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok() =>
            {
                Ok(())
            }
            _ => Err("must be a date in YYYY-MM-DD form"),
        },
        Constraint::Email => match value.as_text() {
            Some(s) if email_regex().is_match(s.trim()) => Ok(()),
            _ => Err("must be a valid email address"),
        },
        Constraint::OneOf(allowed) => match value.as_text() {
            Some(s) if allowed.iter().any(|choice| *choice == s) => Ok(()),
            _ => Err("is not one of the allowed choices"),
        },
    }
}

/// Validate a step's submitted answers against its schema.
///
/// The form is bound to the store, so a field the user left untouched on a
/// revisit falls back to its stored value for the presence check.
pub fn validate(
    schema: &StepSchema,
    submitted: &[(String, AnswerValue)],
    store: &AnswerStore,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    for field in schema.fields {
        let value = submitted
            .iter()
            .find(|(name, _)| name == field.name)
            .map(|(_, value)| value)
            .or_else(|| store.get(field.name));

        let required = field.constraints.contains(&Constraint::Required);
        let Some(value) = value else {
            if required {
                errors.push(field.name, "is required");
            }
            continue;
        };
        if value.is_blank() {
            if required {
                errors.push(field.name, "is required");
            }
            continue;
        }

        for constraint in field.constraints {
            if let Err(message) = check(*constraint, value) {
                errors.push(field.name, message);
                break;
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
