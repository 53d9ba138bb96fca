//! Wizard engine — step sequencing over the shared answer store.
//!
//! The wizard partitions one logical submission into ordered steps. Each
//! data-entry step binds a fixed subset of fields; advancing validates the
//! step, merges its answers into the store, and moves on. The verification
//! and submission stages read the accumulated store, never the forms.

pub mod controller;
pub mod schema;
pub mod state;
pub mod store;

pub use controller::WizardController;
pub use schema::{FieldView, StepSchema, WidgetKind};
pub use state::{WizardState, WizardStep};
pub use store::{AnswerStore, AnswerValue, UploadRef};
