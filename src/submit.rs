//! Submission coordinator — the terminal consumer of the answer store.
//!
//! Serializes the finalized record, hands it to the transport, and applies
//! the result to the wizard only when the session is still looking at the
//! verification page.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SubmitError;
use crate::nav::{CONFIRMATION_PATH, Navigator};
use crate::transport::{SubmissionPayload, Transport};
use crate::wizard::controller::WizardController;
use crate::wizard::state::WizardStep;

/// What became of one submit invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The record was accepted; the wizard is now `submitted`.
    Completed,
    /// A prior submission is still in flight; this invocation was
    /// suppressed, not queued.
    Suppressed,
    /// The session was not sitting at the verification step.
    NotAtVerify,
    /// The result arrived after the user navigated away and was discarded
    /// without touching any state.
    Discarded,
    /// The transport failed; the wizard stays at verification so the user
    /// can retry.
    Failed(SubmitError),
}

/// Coordinates the one submit action of a session.
pub struct SubmissionCoordinator {
    transport: Arc<dyn Transport>,
    nav: Arc<dyn Navigator>,
    in_flight: AtomicBool,
    last_failure: Mutex<Option<SubmitError>>,
}

impl SubmissionCoordinator {
    pub fn new(transport: Arc<dyn Transport>, nav: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            nav,
            in_flight: AtomicBool::new(false),
            last_failure: Mutex::new(None),
        }
    }

    /// Whether a submission is currently in flight. The surface disables
    /// the submit control while this is true.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The most recent failure reason, for the retry affordance.
    pub fn last_failure(&self) -> Option<SubmitError> {
        self.last_failure
            .lock()
            .expect("failure lock poisoned")
            .clone()
    }

    /// Submit the session's record.
    ///
    /// Exactly one transport call is made per accepted invocation; a
    /// second call while one is pending is suppressed. The result is
    /// applied only when the session still sits at verification under the
    /// same navigation epoch — anything else is discarded silently.
    pub async fn submit(&self, controller: &WizardController) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Suppressed;
        }

        let outcome = self.run(controller).await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run(&self, controller: &WizardController) -> SubmitOutcome {
        let epoch = controller.epoch();
        if controller.current_step().await != WizardStep::Verify {
            return SubmitOutcome::NotAtVerify;
        }
        // A resolved major is a precondition of reaching verification.
        let Some(major) = controller.major().await else {
            tracing::error!(session = controller.session(), "At verify without a resolved major");
            return SubmitOutcome::NotAtVerify;
        };

        let payload = SubmissionPayload {
            session: controller.session().to_string(),
            major,
            answers: controller.store_snapshot().await,
        };

        match self.transport.submit_record(&payload).await {
            Ok(()) => {
                if controller.mark_submitted(epoch).await {
                    controller.discard_draft().await;
                    self.nav.push(CONFIRMATION_PATH);
                    *self.last_failure.lock().expect("failure lock poisoned") = None;
                    tracing::info!(session = controller.session(), "Registration submitted");
                    SubmitOutcome::Completed
                } else {
                    tracing::debug!(
                        session = controller.session(),
                        "Submission result arrived after navigation, discarding"
                    );
                    SubmitOutcome::Discarded
                }
            }
            Err(e) => {
                let stale = controller.epoch() != epoch
                    || controller.current_step().await != WizardStep::Verify;
                if stale {
                    tracing::debug!(
                        session = controller.session(),
                        "Stale submission failure, discarding"
                    );
                    return SubmitOutcome::Discarded;
                }
                tracing::warn!(session = controller.session(), "Submission failed: {e}");
                *self.last_failure.lock().expect("failure lock poisoned") = Some(e.clone());
                SubmitOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::draft::{DraftStore, LibSqlDraftStore};
    use crate::nav::MemoryNavigator;
    use crate::wizard::store::AnswerValue;

    /// Stub transport: counts calls, optionally delays, optionally fails.
    struct StubTransport {
        calls: AtomicUsize,
        delay: Duration,
        failure: Option<SubmitError>,
    }

    impl StubTransport {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                failure: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::ok()
            }
        }

        fn failing(failure: SubmitError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::ok()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn submit_record(&self, _payload: &SubmissionPayload) -> Result<(), SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.failure {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    fn entry(name: &str, value: &str) -> (String, AnswerValue) {
        (name.to_string(), AnswerValue::text(value))
    }

    /// Drive a fresh session all the way to the verification step.
    async fn session_at_verify() -> (
        Arc<WizardController>,
        Arc<MemoryNavigator>,
        Arc<dyn DraftStore>,
    ) {
        let drafts: Arc<dyn DraftStore> = Arc::new(LibSqlDraftStore::new_memory().await.unwrap());
        let nav = Arc::new(MemoryNavigator::new("/programming/step1"));
        let controller = Arc::new(
            WizardController::start(
                "submit-test",
                Arc::clone(&drafts),
                nav.clone() as Arc<dyn Navigator>,
            )
            .await
            .unwrap(),
        );

        controller
            .advance(vec![
                entry("firstname", "Somchai"),
                entry("lastname", "Jaidee"),
                entry("age", "16"),
                entry("birthdate", "2009-05-04"),
                entry("religion", "buddhist"),
                entry("class", "m4"),
                entry("school", "Triam Udom"),
                entry("address", "123 Rama IV Rd, Bangkok"),
                entry("phone", "0812345678"),
                entry("email", "somchai@example.com"),
                entry("shirtSize", "M"),
            ])
            .await
            .unwrap();
        controller
            .advance(vec![
                entry("parentFirstName", "Somsri"),
                entry("parentLastName", "Jaidee"),
                entry("parentRelation", "Mother"),
                entry("parentPhone", "0898765432"),
            ])
            .await
            .unwrap();
        controller
            .advance(vec![
                entry("generalAnswer1", "a"),
                entry("generalAnswer2", "b"),
                entry("generalAnswer3", "c"),
            ])
            .await
            .unwrap();
        controller
            .advance(vec![
                entry("majorAnswer1", "a"),
                entry("majorAnswer2", "b"),
                entry("majorAnswer3", "c"),
            ])
            .await
            .unwrap();
        assert_eq!(controller.current_step().await, WizardStep::Verify);

        (controller, nav, drafts)
    }

    #[tokio::test]
    async fn successful_submit_completes_the_session() {
        let (controller, nav, drafts) = session_at_verify().await;
        let transport = Arc::new(StubTransport::ok());
        let coordinator =
            SubmissionCoordinator::new(transport.clone(), nav.clone() as Arc<dyn Navigator>);

        let outcome = coordinator.submit(&controller).await;
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert_eq!(controller.current_step().await, WizardStep::Submitted);
        assert_eq!(nav.current_path(), CONFIRMATION_PATH);
        assert_eq!(transport.call_count(), 1);
        // The draft is gone once the record is accepted upstream.
        assert!(drafts.load_draft("submit-test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_submits_make_one_transport_call() {
        let (controller, nav, _drafts) = session_at_verify().await;
        let transport = Arc::new(StubTransport::slow(Duration::from_millis(100)));
        let coordinator = Arc::new(SubmissionCoordinator::new(
            transport.clone(),
            nav as Arc<dyn Navigator>,
        ));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { coordinator.submit(&controller).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(coordinator.is_in_flight());
        assert_eq!(coordinator.submit(&controller).await, SubmitOutcome::Suppressed);
        assert_eq!(coordinator.submit(&controller).await, SubmitOutcome::Suppressed);

        assert_eq!(first.await.unwrap(), SubmitOutcome::Completed);
        assert_eq!(transport.call_count(), 1);
        assert!(!coordinator.is_in_flight());
    }

    #[tokio::test]
    async fn network_failure_keeps_the_session_at_verify() {
        let (controller, nav, _drafts) = session_at_verify().await;
        let failure = SubmitError::Network("connection refused".to_string());
        let transport = Arc::new(StubTransport::failing(failure.clone()));
        let coordinator = SubmissionCoordinator::new(transport, nav as Arc<dyn Navigator>);

        let outcome = coordinator.submit(&controller).await;
        assert_eq!(outcome, SubmitOutcome::Failed(failure.clone()));
        assert_eq!(controller.current_step().await, WizardStep::Verify);
        assert_eq!(coordinator.last_failure(), Some(failure));
    }

    #[tokio::test]
    async fn rejection_is_a_distinct_failure_kind() {
        let (controller, nav, _drafts) = session_at_verify().await;
        let failure = SubmitError::Rejected {
            reason: "duplicate email".to_string(),
        };
        let transport = Arc::new(StubTransport::failing(failure.clone()));
        let coordinator = SubmissionCoordinator::new(transport, nav as Arc<dyn Navigator>);

        assert_eq!(
            coordinator.submit(&controller).await,
            SubmitOutcome::Failed(failure)
        );
        assert_eq!(controller.current_step().await, WizardStep::Verify);
    }

    #[tokio::test]
    async fn result_after_navigation_is_discarded() {
        let (controller, nav, _drafts) = session_at_verify().await;
        let transport = Arc::new(StubTransport::slow(Duration::from_millis(100)));
        let coordinator = Arc::new(SubmissionCoordinator::new(
            transport.clone(),
            nav as Arc<dyn Navigator>,
        ));

        let pending = {
            let coordinator = Arc::clone(&coordinator);
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { coordinator.submit(&controller).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Navigating away does not cancel the call; its result must not
        // be applied to the now-stale view.
        controller.retreat().await.unwrap();
        assert_eq!(controller.current_step().await, WizardStep::MajorQuestions);

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(controller.current_step().await, WizardStep::MajorQuestions);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn submit_away_from_verify_is_refused() {
        let drafts: Arc<dyn DraftStore> = Arc::new(LibSqlDraftStore::new_memory().await.unwrap());
        let nav = Arc::new(MemoryNavigator::new("/design/step1"));
        let controller = WizardController::start(
            "early",
            drafts,
            nav.clone() as Arc<dyn Navigator>,
        )
        .await
        .unwrap();
        let transport = Arc::new(StubTransport::ok());
        let coordinator =
            SubmissionCoordinator::new(transport.clone(), nav as Arc<dyn Navigator>);

        assert_eq!(
            coordinator.submit(&controller).await,
            SubmitOutcome::NotAtVerify
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn retry_after_failure_succeeds() {
        let (controller, nav, _drafts) = session_at_verify().await;
        let failing = Arc::new(StubTransport::failing(SubmitError::Network(
            "timed out".to_string(),
        )));
        let coordinator =
            SubmissionCoordinator::new(failing, nav.clone() as Arc<dyn Navigator>);
        assert!(matches!(
            coordinator.submit(&controller).await,
            SubmitOutcome::Failed(_)
        ));

        // The user presses submit again; this time the backend is up.
        let coordinator =
            SubmissionCoordinator::new(Arc::new(StubTransport::ok()), nav as Arc<dyn Navigator>);
        assert_eq!(coordinator.submit(&controller).await, SubmitOutcome::Completed);
        assert_eq!(controller.current_step().await, WizardStep::Submitted);
    }
}
