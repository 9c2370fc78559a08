//! Onboarding screens and the transitions allowed between them.

use serde::{Deserialize, Serialize};

/// The screens the sequencer moves between.
///
/// Without back navigation they are visited in order: Home → SkillStep →
/// GoalStep → ReviewStep → TopicsStep → Home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "onboarding")]
    SkillStep,
    #[serde(rename = "onboarding_goal")]
    GoalStep,
    #[serde(rename = "onboarding_summary")]
    ReviewStep,
    #[serde(rename = "onboarding_topics")]
    TopicsStep,
}

/// A user intent that may move the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEvent {
    Start,
    Continue,
    Back,
}

impl Screen {
    /// Stable route name.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::SkillStep => "onboarding",
            Self::GoalStep => "onboarding_goal",
            Self::ReviewStep => "onboarding_summary",
            Self::TopicsStep => "onboarding_topics",
        }
    }

    pub fn is_onboarding(&self) -> bool {
        !matches!(self, Self::Home)
    }

    /// Fraction shown in the step progress bar. Home has none.
    ///
    /// The topics step stops short of 1.0; the bar only fills on Home.
    pub fn progress(&self) -> Option<f32> {
        match self {
            Self::Home => None,
            Self::SkillStep => Some(0.25),
            Self::GoalStep => Some(0.5),
            Self::ReviewStep => Some(0.75),
            Self::TopicsStep => Some(0.9),
        }
    }

    /// Display key for the screen's heading.
    pub fn title_key(&self) -> &'static str {
        match self {
            Self::Home => "home_title",
            Self::SkillStep => "onboarding_skill_title",
            Self::GoalStep => "onboarding_goal_title",
            Self::ReviewStep => "onboarding_review_title",
            Self::TopicsStep => "onboarding_topics_title",
        }
    }

    /// Forward target, ignoring guards.
    pub fn next(&self) -> Screen {
        match self {
            Self::Home => Self::SkillStep,
            Self::SkillStep => Self::GoalStep,
            Self::GoalStep => Self::ReviewStep,
            Self::ReviewStep => Self::TopicsStep,
            Self::TopicsStep => Self::Home,
        }
    }

    /// Back target. The skill step is the flow's entry and has none.
    pub fn previous(&self) -> Option<Screen> {
        match self {
            Self::GoalStep => Some(Self::SkillStep),
            Self::ReviewStep => Some(Self::GoalStep),
            Self::TopicsStep => Some(Self::ReviewStep),
            Self::Home | Self::SkillStep => None,
        }
    }

    /// Whether `event` on this screen leaves the flow for Home.
    pub fn is_terminal_event(&self, event: NavEvent) -> bool {
        matches!((self, event), (Self::TopicsStep, NavEvent::Continue))
    }

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Screen) -> bool {
        use Screen::*;
        matches!(
            (self, target),
            (Home, SkillStep)
                | (SkillStep, GoalStep)
                | (GoalStep, SkillStep)
                | (GoalStep, ReviewStep)
                | (ReviewStep, GoalStep)
                | (ReviewStep, TopicsStep)
                | (TopicsStep, ReviewStep)
                | (TopicsStep, Home)
        )
    }

    /// Target of `event` on this screen, ignoring guards.
    ///
    /// `None` means the event has no meaning here.
    pub fn target(&self, event: NavEvent) -> Option<Screen> {
        match (self, event) {
            (Self::Home, NavEvent::Start) => Some(Self::SkillStep),
            (Self::Home, _) => None,
            (_, NavEvent::Start) => None,
            (step, NavEvent::Continue) => Some(step.next()),
            (step, NavEvent::Back) => step.previous(),
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.route())
    }
}

impl std::fmt::Display for NavEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Continue => "continue",
            Self::Back => "back",
        };
        write!(f, "{s}")
    }
}

/// Screen to show at process start, given the committed flag.
pub fn initial_screen(onboarding_completed: bool) -> Screen {
    if onboarding_completed {
        Screen::Home
    } else {
        Screen::SkillStep
    }
}
