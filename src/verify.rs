//! Verification view — the read-only consolidated record shown before the
//! final submit.
//!
//! A pure function of the answer store and the resolved major. It performs
//! no mutation; the widget layer draws whatever comes back.

use serde::Serialize;

use crate::error::LookupError;
use crate::fields;
use crate::questions::{self, GENERAL_ANSWER_FIELDS, MAJOR_ANSWER_FIELDS, Major, QuestionKind};
use crate::wizard::store::{AnswerStore, AnswerValue, UploadRef};

/// One reviewable answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedAnswer {
    /// Verbatim text, whitespace preserved. Missing fields arrive here as
    /// the `"-"` sentinel, never blank.
    Text { text: String },
    /// Review rendering of a previously uploaded file.
    Upload { upload: Option<UploadRef> },
}

/// A labelled item within a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub label: String,
    pub value: RenderedAnswer,
}

/// One titled group of the consolidated view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<Item>,
}

fn text_item(field: &str, store: &AnswerStore) -> Result<Item, LookupError> {
    Ok(Item {
        label: fields::label(field)?.to_string(),
        value: RenderedAnswer::Text {
            text: fields::format(field, store)?,
        },
    })
}

fn upload_item(label: impl Into<String>, field: &str, store: &AnswerStore) -> Item {
    Item {
        label: label.into(),
        value: RenderedAnswer::Upload {
            upload: store.get(field).and_then(AnswerValue::as_upload).cloned(),
        },
    }
}

/// Render the full record, grouped by section.
///
/// The first three sections are unconditional; the major section is
/// included only when a major is resolved — omitted entirely, never
/// rendered empty.
pub fn render(store: &AnswerStore, major: Option<Major>) -> Result<Vec<Section>, LookupError> {
    let mut sections = Vec::with_capacity(4);

    let mut personal = vec![upload_item(
        fields::label(fields::PHOTO_FIELD)?,
        fields::PHOTO_FIELD,
        store,
    )];
    for field in fields::PERSONAL_FIELDS {
        personal.push(text_item(field, store)?);
    }
    sections.push(Section {
        title: "Personal information",
        items: personal,
    });

    let mut parent = Vec::with_capacity(fields::PARENT_FIELDS.len());
    for field in fields::PARENT_FIELDS {
        parent.push(text_item(field, store)?);
    }
    sections.push(Section {
        title: "Parent / guardian information",
        items: parent,
    });

    let prompts = [questions::general::Q1, questions::general::Q2, questions::general::Q3];
    let mut general = Vec::with_capacity(3);
    for (prompt, field) in prompts.iter().zip(GENERAL_ANSWER_FIELDS) {
        general.push(Item {
            label: (*prompt).to_string(),
            value: RenderedAnswer::Text {
                text: fields::format(field, store)?,
            },
        });
    }
    sections.push(Section {
        title: "General questions",
        items: general,
    });

    if let Some(major) = major {
        let q = questions::questions_for(major);
        let mut items = vec![
            Item {
                label: q.q1.to_string(),
                value: RenderedAnswer::Text {
                    text: fields::format(MAJOR_ANSWER_FIELDS[0], store)?,
                },
            },
            Item {
                label: q.q2.to_string(),
                value: RenderedAnswer::Text {
                    text: fields::format(MAJOR_ANSWER_FIELDS[1], store)?,
                },
            },
        ];
        items.push(match q.q3_kind {
            QuestionKind::FileUpload => upload_item(q.q3, MAJOR_ANSWER_FIELDS[2], store),
            QuestionKind::FreeText => Item {
                label: q.q3.to_string(),
                value: RenderedAnswer::Text {
                    text: fields::format(MAJOR_ANSWER_FIELDS[2], store)?,
                },
            },
        });
        sections.push(Section {
            title: "Major questions",
            items,
        });
    }

    Ok(sections)
}
