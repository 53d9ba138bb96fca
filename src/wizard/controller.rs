//! Wizard controller — step sequencing, the shared answer store, and
//! forward/back navigation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::draft::{DraftRecord, DraftStore};
use crate::error::{DraftError, LookupError, WizardError};
use crate::nav::{self, Navigator};
use crate::questions::{MAJOR_ANSWER_FIELDS, Major};
use crate::wizard::schema::{self, FieldView};
use crate::wizard::state::{WizardState, WizardStep};
use crate::wizard::store::{AnswerStore, AnswerValue};

/// Owns the session state and mediates every navigation.
///
/// The answer store lives behind one write lock: a step's merge is applied
/// in full before navigation proceeds, so a later step never observes a
/// partial merge. The epoch counter moves on every navigation and lets the
/// submission coordinator detect that an async result has gone stale.
pub struct WizardController {
    session: String,
    state: RwLock<WizardState>,
    drafts: Arc<dyn DraftStore>,
    nav: Arc<dyn Navigator>,
    epoch: AtomicU64,
}

impl WizardController {
    /// Start a session: rehydrate from a persisted draft when one exists,
    /// otherwise begin empty at the first step.
    pub async fn start(
        session: impl Into<String>,
        drafts: Arc<dyn DraftStore>,
        nav: Arc<dyn Navigator>,
    ) -> Result<Self, DraftError> {
        let session = session.into();
        let state = match drafts.load_draft(&session).await? {
            Some(draft) => {
                tracing::info!(
                    session = %session,
                    step = %draft.step,
                    "Rehydrated session from draft"
                );
                WizardState {
                    step: draft.step,
                    major: draft.major,
                    store: draft.answers,
                }
            }
            None => WizardState::default(),
        };

        Ok(Self {
            session,
            state: RwLock::new(state),
            drafts,
            nav,
            epoch: AtomicU64::new(0),
        })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// Navigation epoch — bumped on every advance/retreat.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub async fn current_step(&self) -> WizardStep {
        self.state.read().await.step
    }

    pub async fn major(&self) -> Option<Major> {
        self.state.read().await.major
    }

    /// Immutable snapshot of the answer store.
    pub async fn store_snapshot(&self) -> AnswerStore {
        self.state.read().await.store.clone()
    }

    /// The current step's form, rendered for the widget layer.
    /// `None` for steps without a form (verify, submitted).
    pub async fn step_view(&self) -> Result<Option<Vec<FieldView>>, LookupError> {
        let state = self.state.read().await;
        match schema::schema_for(state.step, state.major) {
            Some(step_schema) => schema::render(step_schema, &state.store).map(Some),
            None => Ok(None),
        }
    }

    /// Validate the submitted answers, merge them into the store, and move
    /// to the next step.
    ///
    /// Entering the major-questions step resolves the major from the
    /// navigation path. Re-entering it under a different major clears the
    /// previously entered major answers before adopting the new one.
    pub async fn advance(
        &self,
        submitted: Vec<(String, AnswerValue)>,
    ) -> Result<WizardStep, WizardError> {
        let (next, path) = {
            let mut state = self.state.write().await;

            match state.step {
                WizardStep::Submitted => return Err(WizardError::AlreadySubmitted),
                WizardStep::Verify => return Err(WizardError::AtFinalStep),
                _ => {}
            }

            let step_schema = schema::schema_for(state.step, state.major)
                .expect("data-entry steps always have a schema");
            schema::validate(step_schema, &submitted, &state.store)
                .map_err(WizardError::Validation)?;

            state.store.merge(submitted);

            let next = state.step.next().expect("data-entry steps have a next step");
            if next == WizardStep::MajorQuestions {
                self.resolve_major(&mut state)?;
            }
            state.advance_step();

            let path = match state.major.or_else(|| nav::category_from_path(&self.nav.current_path())) {
                Some(major) => nav::step_path(major, next),
                None => format!("/{}", next.path_segment()),
            };
            (next, path)
        };

        self.persist_draft().await;
        self.nav.push(&path);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        Ok(next)
    }

    /// Move to the previous step. Ungated; the store is untouched.
    ///
    /// From the verification page this routes to the last data-entry step
    /// of the resolved major, not a fixed index.
    pub async fn retreat(&self) -> Result<WizardStep, WizardError> {
        let (prev, path) = {
            let mut state = self.state.write().await;

            if state.step == WizardStep::Submitted {
                return Err(WizardError::AlreadySubmitted);
            }
            let prev = state.retreat_step().ok_or(WizardError::AtFirstStep)?;

            let path = match state.major.or_else(|| nav::category_from_path(&self.nav.current_path())) {
                Some(major) => nav::step_path(major, prev),
                None => format!("/{}", prev.path_segment()),
            };
            (prev, path)
        };

        self.persist_draft().await;
        self.nav.push(&path);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        Ok(prev)
    }

    /// Resolve the active major from the navigation context, applying the
    /// mid-session change policy: a different major clears the stale major
    /// answers.
    fn resolve_major(&self, state: &mut WizardState) -> Result<(), WizardError> {
        let resolved = nav::category_from_path(&self.nav.current_path())
            .ok_or(WizardError::MajorUnresolved)?;

        match state.major {
            Some(previous) if previous != resolved => {
                tracing::info!(
                    session = %self.session,
                    %previous,
                    %resolved,
                    "Major changed mid-session, clearing stale major answers"
                );
                for field in MAJOR_ANSWER_FIELDS {
                    state.store.remove(field);
                }
                state.major = Some(resolved);
            }
            Some(_) => {}
            None => state.major = Some(resolved),
        }
        Ok(())
    }

    /// Terminal transition, called by the submission coordinator on
    /// success. Refused when the session navigated away since the epoch
    /// snapshot was taken, or is no longer at the verification step.
    pub(crate) async fn mark_submitted(&self, epoch_snapshot: u64) -> bool {
        if self.epoch() != epoch_snapshot {
            return false;
        }
        let mut state = self.state.write().await;
        if !state.complete_submission() {
            return false;
        }
        drop(state);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Persist the current state as a draft. Failures are logged, not
    /// fatal: the in-memory session continues.
    async fn persist_draft(&self) {
        let draft = {
            let state = self.state.read().await;
            DraftRecord::new(state.store.clone(), state.major, state.step)
        };
        if let Err(e) = self.drafts.save_draft(&self.session, &draft).await {
            tracing::warn!(session = %self.session, "Failed to persist draft: {e}");
        }
    }

    /// Drop the persisted draft (after the record was accepted upstream).
    pub(crate) async fn discard_draft(&self) {
        if let Err(e) = self.drafts.delete_draft(&self.session).await {
            tracing::warn!(session = %self.session, "Failed to delete draft: {e}");
        }
    }
}
