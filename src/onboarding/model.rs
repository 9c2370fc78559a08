//! Onboarding selection data model.

use serde::Serialize;

/// In-memory choices made during one pass through the onboarding flow.
///
/// Session-scoped: created empty when the flow starts and discarded when it
/// completes or is abandoned. Only the controller mutates it, and only with
/// ids it has already checked against the catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnboardingSelection {
    selected_skill_id: Option<String>,
    selected_goal_id: Option<String>,
    /// Insertion-ordered, no duplicates.
    selected_topic_ids: Vec<String>,
}

impl OnboardingSelection {
    pub fn selected_skill_id(&self) -> Option<&str> {
        self.selected_skill_id.as_deref()
    }

    pub fn selected_goal_id(&self) -> Option<&str> {
        self.selected_goal_id.as_deref()
    }

    pub fn selected_topic_ids(&self) -> &[String] {
        &self.selected_topic_ids
    }

    pub fn is_topic_selected(&self, id: &str) -> bool {
        self.selected_topic_ids.iter().any(|t| t == id)
    }

    pub(crate) fn set_skill(&mut self, id: &str) {
        self.selected_skill_id = Some(id.to_string());
    }

    pub(crate) fn set_goal(&mut self, id: &str) {
        self.selected_goal_id = Some(id.to_string());
    }

    /// Remove `id` if present, append it otherwise. Returns whether it is
    /// selected afterwards.
    pub(crate) fn toggle_topic(&mut self, id: &str) -> bool {
        if let Some(pos) = self.selected_topic_ids.iter().position(|t| t == id) {
            self.selected_topic_ids.remove(pos);
            false
        } else {
            self.selected_topic_ids.push(id.to_string());
            true
        }
    }
}

/// Settings keys used for onboarding persistence.
pub mod settings_keys {
    /// Key for the durable "onboarding completed" flag.
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
    /// Key for the UI language preference.
    pub const SELECTED_LANGUAGE: &str = "selected_language";
    /// Default user ID (single-user device).
    pub const DEFAULT_USER: &str = "default";
}
