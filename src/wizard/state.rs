//! Wizard state machine — which step the session is on.

use serde::{Deserialize, Serialize};

use crate::questions::Major;
use crate::wizard::store::AnswerStore;

/// The steps of a registration session.
///
/// Progresses linearly: Personal → Parent → General → MajorQuestions →
/// Verify → Submitted. Plain advancement stops at Verify; Submitted is
/// reached only through a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Parent,
    General,
    MajorQuestions,
    Verify,
    Submitted,
}

impl WizardStep {
    /// The next step for plain advancement, if any.
    ///
    /// Verify has no `next`: the terminal transition belongs to the
    /// submission coordinator.
    pub fn next(&self) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            Personal => Some(Parent),
            Parent => Some(General),
            General => Some(MajorQuestions),
            MajorQuestions => Some(Verify),
            Verify | Submitted => None,
        }
    }

    /// The previous step for retreat, if any.
    pub fn prev(&self) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            Personal | Submitted => None,
            Parent => Some(Personal),
            General => Some(Parent),
            MajorQuestions => Some(General),
            Verify => Some(MajorQuestions),
        }
    }

    /// Whether this step is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Whether the step collects answers (has a step form).
    pub fn is_data_entry(&self) -> bool {
        matches!(
            self,
            Self::Personal | Self::Parent | Self::General | Self::MajorQuestions
        )
    }

    /// Path segment the navigation collaborator uses for this step.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Personal => "step1",
            Self::Parent => "step2",
            Self::General => "step3",
            Self::MajorQuestions => "step4",
            Self::Verify => "verify",
            Self::Submitted => "thanks",
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Personal
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personal => "personal",
            Self::Parent => "parent",
            Self::General => "general",
            Self::MajorQuestions => "major_questions",
            Self::Verify => "verify",
            Self::Submitted => "submitted",
        };
        write!(f, "{s}")
    }
}

/// The full session state: current step, resolved major, and the shared
/// answer store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub major: Option<Major>,
    pub store: AnswerStore,
}

impl WizardState {
    /// Move to the next step. The caller has already validated and merged
    /// the current step's answers.
    pub fn advance_step(&mut self) -> Option<WizardStep> {
        let next = self.step.next()?;
        self.step = next;
        Some(next)
    }

    /// Move to the previous step. The store is untouched.
    pub fn retreat_step(&mut self) -> Option<WizardStep> {
        let prev = self.step.prev()?;
        self.step = prev;
        Some(prev)
    }

    /// Terminal transition, taken only by the submission success path.
    /// Returns false when the session is not sitting at Verify.
    pub fn complete_submission(&mut self) -> bool {
        if self.step != WizardStep::Verify {
            return false;
        }
        self.step = WizardStep::Submitted;
        true
    }
}
