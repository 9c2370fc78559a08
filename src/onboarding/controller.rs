//! OnboardingController: owns the session's selection, validates ids
//! against the catalogs, exposes the per-step gates, and writes the
//! completion flag through to the preference store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::OnboardingError;
use crate::preferences::PreferenceManager;

use super::catalog::{self, GoalDuration, Skill, Topic};
use super::model::OnboardingSelection;
use super::state::Screen;

/// Handle to a background completion write.
///
/// Dropping the handle does not cancel the write.
#[derive(Debug)]
pub struct CompletionHandle {
    task: JoinHandle<Result<(), OnboardingError>>,
}

impl CompletionHandle {
    /// Wait for the write to commit or fail.
    pub async fn wait(self) -> Result<(), OnboardingError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(OnboardingError::TaskAborted(e.to_string())),
        }
    }
}

/// Coordinates one pass through the onboarding flow.
///
/// All mutations happen on the owning task. Subscribers see each change as
/// soon as the mutating call returns.
pub struct OnboardingController {
    prefs: Arc<PreferenceManager>,
    selection: watch::Sender<OnboardingSelection>,
    write_in_flight: Arc<AtomicBool>,
    session_id: Uuid,
}

impl OnboardingController {
    pub fn new(prefs: Arc<PreferenceManager>) -> Self {
        let (tx, _rx) = watch::channel(OnboardingSelection::default());
        Self {
            prefs,
            selection: tx,
            write_in_flight: Arc::new(AtomicBool::new(false)),
            session_id: Uuid::new_v4(),
        }
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> OnboardingSelection {
        self.selection.borrow().clone()
    }

    /// Receive every selection change.
    pub fn subscribe(&self) -> watch::Receiver<OnboardingSelection> {
        self.selection.subscribe()
    }

    pub fn skills(&self) -> &'static [Skill] {
        catalog::SKILLS
    }

    pub fn goals(&self) -> &'static [GoalDuration] {
        catalog::GOALS
    }

    pub fn topics(&self) -> &'static [Topic] {
        catalog::TOPICS
    }

    pub fn reviews(&self) -> &'static [catalog::Review] {
        catalog::REVIEWS
    }

    /// Select the skill step's single choice, replacing any prior one.
    pub fn select_skill(&self, id: &str) -> Result<(), OnboardingError> {
        let skill = catalog::find_skill(id).ok_or_else(|| self.reject("skill", id))?;
        self.selection.send_modify(|s| s.set_skill(skill.id));
        debug!(session = %self.session_id, skill = skill.id, "Skill selected");
        Ok(())
    }

    /// Select the goal step's single choice, replacing any prior one.
    pub fn select_goal(&self, id: &str) -> Result<(), OnboardingError> {
        let goal = catalog::find_goal(id).ok_or_else(|| self.reject("goal", id))?;
        self.selection.send_modify(|s| s.set_goal(goal.id));
        debug!(session = %self.session_id, goal = goal.id, "Goal selected");
        Ok(())
    }

    /// Add or remove a topic. Returns whether it is selected afterwards.
    pub fn toggle_topic(&self, id: &str) -> Result<bool, OnboardingError> {
        let topic = catalog::find_topic(id).ok_or_else(|| self.reject("topic", id))?;
        let mut selected = false;
        self.selection
            .send_modify(|s| selected = s.toggle_topic(topic.id));
        debug!(session = %self.session_id, topic = topic.id, selected, "Topic toggled");
        Ok(selected)
    }

    /// Discard the selection, as when the flow starts over or is abandoned.
    pub fn reset(&self) {
        self.selection.send_replace(OnboardingSelection::default());
        debug!(session = %self.session_id, "Selection cleared");
    }

    pub fn can_continue_from_skill_step(&self) -> bool {
        self.selection.borrow().selected_skill_id().is_some()
    }

    pub fn can_continue_from_goal_step(&self) -> bool {
        self.selection.borrow().selected_goal_id().is_some()
    }

    /// The review step is read-only and never blocks.
    pub fn can_continue_from_review_step(&self) -> bool {
        true
    }

    pub fn can_continue_from_topics_step(&self) -> bool {
        !self.selection.borrow().selected_topic_ids().is_empty()
    }

    /// Gate for the continue control on `screen`. Home has no continue.
    pub fn can_continue_from(&self, screen: Screen) -> bool {
        match screen {
            Screen::Home => false,
            Screen::SkillStep => self.can_continue_from_skill_step(),
            Screen::GoalStep => self.can_continue_from_goal_step(),
            Screen::ReviewStep => self.can_continue_from_review_step(),
            Screen::TopicsStep => self.can_continue_from_topics_step(),
        }
    }

    pub fn selected_skill(&self) -> Option<&'static Skill> {
        self.selection
            .borrow()
            .selected_skill_id()
            .and_then(catalog::find_skill)
    }

    pub fn selected_goal(&self) -> Option<&'static GoalDuration> {
        self.selection
            .borrow()
            .selected_goal_id()
            .and_then(catalog::find_goal)
    }

    pub fn selected_topics(&self) -> Vec<&'static Topic> {
        self.selection
            .borrow()
            .selected_topic_ids()
            .iter()
            .filter_map(|id| catalog::find_topic(id))
            .collect()
    }

    /// Whether a completion write is currently pending.
    pub fn is_completion_in_flight(&self) -> bool {
        self.write_in_flight.load(Ordering::Acquire)
    }

    /// Durably mark onboarding as completed.
    ///
    /// The write runs on a detached task so it finishes even if the caller
    /// goes away. Only one write may be pending; a failed write is not
    /// retried and leaves the selection untouched, so calling this again
    /// re-issues it.
    pub fn complete_onboarding(&self) -> Result<CompletionHandle, OnboardingError> {
        if self.write_in_flight.swap(true, Ordering::AcqRel) {
            debug!(session = %self.session_id, "Completion already in flight");
            return Err(OnboardingError::CompletionInFlight);
        }

        let prefs = Arc::clone(&self.prefs);
        let in_flight = Arc::clone(&self.write_in_flight);
        let session_id = self.session_id;

        let task = tokio::spawn(async move {
            let result = prefs.set_onboarding_completed(true).await;
            in_flight.store(false, Ordering::Release);
            match result {
                Ok(()) => {
                    info!(session = %session_id, "Onboarding completed");
                    Ok(())
                }
                Err(e) => {
                    warn!(session = %session_id, error = %e, "Failed to persist onboarding completion");
                    Err(OnboardingError::PersistenceWriteFailure(e))
                }
            }
        });

        Ok(CompletionHandle { task })
    }

    fn reject(&self, catalog: &'static str, id: &str) -> OnboardingError {
        debug!(session = %self.session_id, catalog, id, "Rejected unknown selection id");
        OnboardingError::InvalidSelectionId {
            catalog,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::error::DatabaseError;
    use crate::store::{Database, LibSqlBackend};

    async fn test_controller() -> (OnboardingController, Arc<PreferenceManager>) {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let prefs = Arc::new(PreferenceManager::load(db, "default").await.unwrap());
        (OnboardingController::new(Arc::clone(&prefs)), prefs)
    }

    /// Settings store whose writes always fail.
    struct ReadOnlyDb;

    #[async_trait]
    impl Database for ReadOnlyDb {
        async fn run_migrations(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
        async fn get_setting(
            &self,
            _user_id: &str,
            _key: &str,
        ) -> Result<Option<serde_json::Value>, DatabaseError> {
            Ok(None)
        }
        async fn set_setting(
            &self,
            _user_id: &str,
            _key: &str,
            _value: &serde_json::Value,
        ) -> Result<(), DatabaseError> {
            Err(DatabaseError::Query("attempt to write a readonly database".into()))
        }
        async fn delete_setting(&self, _user_id: &str, _key: &str) -> Result<bool, DatabaseError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn every_catalog_skill_opens_the_gate() {
        let (controller, _) = test_controller().await;
        for skill in catalog::SKILLS {
            controller.reset();
            assert!(!controller.can_continue_from_skill_step());
            controller.select_skill(skill.id).unwrap();
            assert!(controller.can_continue_from_skill_step());
            assert_eq!(controller.selected_skill(), Some(skill));
        }
    }

    #[tokio::test]
    async fn unknown_skill_leaves_selection_unchanged() {
        let (controller, _) = test_controller().await;
        controller.select_skill("grammar").unwrap();

        let err = controller.select_skill("cooking").unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::InvalidSelectionId { catalog: "skill", ref id } if id == "cooking"
        ));
        assert_eq!(controller.selection().selected_skill_id(), Some("grammar"));
    }

    #[tokio::test]
    async fn selecting_replaces_and_is_idempotent() {
        let (controller, _) = test_controller().await;
        controller.select_goal("5_min").unwrap();
        controller.select_goal("30_min").unwrap();
        controller.select_goal("30_min").unwrap();
        assert_eq!(controller.selection().selected_goal_id(), Some("30_min"));
    }

    #[tokio::test]
    async fn invalid_goal_keeps_gate_closed() {
        let (controller, _) = test_controller().await;
        assert!(controller.select_goal("invalid_id").is_err());
        assert!(controller.selection().selected_goal_id().is_none());
        assert!(!controller.can_continue_from_goal_step());
    }

    #[tokio::test]
    async fn toggle_twice_is_identity() {
        let (controller, _) = test_controller().await;
        controller.toggle_topic("travel").unwrap();
        let before = controller.selection();

        for topic in catalog::TOPICS {
            assert_eq!(
                controller.toggle_topic(topic.id).unwrap(),
                !before.is_topic_selected(topic.id)
            );
            controller.toggle_topic(topic.id).unwrap();
            assert_eq!(controller.selection(), before);
        }
    }

    #[tokio::test]
    async fn airport_toggled_twice_is_empty() {
        let (controller, _) = test_controller().await;
        controller.toggle_topic("airport").unwrap();
        controller.toggle_topic("airport").unwrap();
        assert!(controller.selection().selected_topic_ids().is_empty());
        assert!(!controller.can_continue_from_topics_step());
    }

    #[tokio::test]
    async fn topics_never_contain_duplicates() {
        let (controller, _) = test_controller().await;
        // Deterministic pseudo-random walk over the topic catalog
        let mut x: usize = 7;
        for _ in 0..200 {
            x = (x * 31 + 11) % 97;
            let topic = &catalog::TOPICS[x % catalog::TOPICS.len()];
            controller.toggle_topic(topic.id).unwrap();

            let selection = controller.selection();
            let ids = selection.selected_topic_ids();
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
        }
        assert!(controller.toggle_topic("skydiving").is_err());
    }

    #[tokio::test]
    async fn review_gate_is_always_open() {
        let (controller, _) = test_controller().await;
        assert!(controller.can_continue_from_review_step());
        assert!(controller.can_continue_from(Screen::ReviewStep));
        assert!(!controller.can_continue_from(Screen::Home));
    }

    #[tokio::test]
    async fn subscribers_see_changes_immediately() {
        let (controller, _) = test_controller().await;
        let mut rx = controller.subscribe();

        controller.select_skill("listening").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().selected_skill_id(), Some("listening"));

        controller.toggle_topic("doctor").unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_topic_selected("doctor"));
    }

    #[tokio::test]
    async fn complete_onboarding_commits_flag() {
        let (controller, prefs) = test_controller().await;
        assert!(!prefs.is_onboarding_completed());

        let handle = controller.complete_onboarding().unwrap();
        handle.wait().await.unwrap();

        assert!(prefs.is_onboarding_completed());
        assert!(!controller.is_completion_in_flight());
    }

    #[tokio::test]
    async fn second_completion_while_pending_is_rejected() {
        let (controller, _) = test_controller().await;
        let first = controller.complete_onboarding().unwrap();
        // The spawned write cannot have run yet on the current-thread runtime
        assert!(matches!(
            controller.complete_onboarding(),
            Err(OnboardingError::CompletionInFlight)
        ));
        first.wait().await.unwrap();

        // Once settled, another write may be issued
        controller.complete_onboarding().unwrap().wait().await.unwrap();
    }

    #[tokio::test]
    async fn failed_write_is_reported_and_retryable() {
        let db: Arc<dyn Database> = Arc::new(ReadOnlyDb);
        let prefs = Arc::new(PreferenceManager::load(db, "default").await.unwrap());
        let controller = OnboardingController::new(Arc::clone(&prefs));
        controller.select_skill("reading").unwrap();

        let err = controller
            .complete_onboarding()
            .unwrap()
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::PersistenceWriteFailure(_)));
        assert!(!prefs.is_onboarding_completed());
        assert_eq!(controller.selection().selected_skill_id(), Some("reading"));

        // Retry re-issues the write
        assert!(controller.complete_onboarding().unwrap().wait().await.is_err());
    }

    #[tokio::test]
    async fn write_finishes_after_controller_is_dropped() {
        let (controller, prefs) = test_controller().await;
        let handle = controller.complete_onboarding().unwrap();
        drop(controller);
        handle.wait().await.unwrap();
        assert!(prefs.is_onboarding_completed());
    }
}
