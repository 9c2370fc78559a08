//! Static catalogs offered by the onboarding steps.
//!
//! Loaded once for the process lifetime and never mutated. Every id the
//! controller accepts must come from one of these slices.

use serde::Serialize;

/// A skill the learner can focus on first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: &'static str,
    pub display_key: &'static str,
    pub icon: &'static str,
}

/// A daily practice goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalDuration {
    pub id: &'static str,
    pub display_key: &'static str,
}

/// A conversation topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub display_key: &'static str,
}

/// A testimonial shown on the review step. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: &'static str,
    pub user_name: &'static str,
    pub comment_key: &'static str,
    /// Star rating, 0..=5.
    pub rating: u8,
    /// The highlighted card is rendered in front of the carousel.
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<&'static str>,
}

pub const MAX_RATING: u8 = 5;

pub static SKILLS: &[Skill] = &[
    Skill {
        id: "pronunciation",
        display_key: "onboarding_skill_pronunciation",
        icon: "\u{1F444}",
    },
    Skill {
        id: "confident_speaking",
        display_key: "onboarding_skill_confident_speaking",
        icon: "\u{1F5E3}",
    },
    Skill {
        id: "vocabulary",
        display_key: "onboarding_skill_vocabulary",
        icon: "\u{1F4D6}",
    },
    Skill {
        id: "listening",
        display_key: "onboarding_skill_listening",
        icon: "\u{1F442}",
    },
    Skill {
        id: "grammar",
        display_key: "onboarding_skill_grammar",
        icon: "\u{270F}\u{FE0F}",
    },
    Skill {
        id: "writing",
        display_key: "onboarding_skill_writing",
        icon: "\u{1F58A}\u{FE0F}",
    },
    Skill {
        id: "reading",
        display_key: "onboarding_skill_reading",
        icon: "\u{1F440}",
    },
];

pub static GOALS: &[GoalDuration] = &[
    GoalDuration {
        id: "5_min",
        display_key: "onboarding_goal_option_5_min",
    },
    GoalDuration {
        id: "10_min",
        display_key: "onboarding_goal_option_10_min",
    },
    GoalDuration {
        id: "15_min",
        display_key: "onboarding_goal_option_15_min",
    },
    GoalDuration {
        id: "30_min",
        display_key: "onboarding_goal_option_30_min",
    },
];

pub static TOPICS: &[Topic] = &[
    Topic {
        id: "restaurant",
        display_key: "onboarding_topic_restaurant",
    },
    Topic {
        id: "airport",
        display_key: "onboarding_topic_airport",
    },
    Topic {
        id: "business",
        display_key: "onboarding_topic_business",
    },
    Topic {
        id: "job_interview",
        display_key: "onboarding_topic_job_interview",
    },
    Topic {
        id: "doctor",
        display_key: "onboarding_topic_doctor",
    },
    Topic {
        id: "relationship",
        display_key: "onboarding_topic_relationship",
    },
    Topic {
        id: "travel",
        display_key: "onboarding_topic_travel",
    },
    Topic {
        id: "school",
        display_key: "onboarding_topic_school",
    },
];

pub static REVIEWS: &[Review] = &[
    Review {
        id: "anna",
        user_name: "@anna.w1991",
        comment_key: "onboarding_review_anna_comment",
        rating: 5,
        highlighted: false,
        avatar_ref: Some("avatar1"),
    },
    Review {
        id: "safi",
        user_name: "@safi.hana",
        comment_key: "onboarding_review_safi_comment",
        rating: 5,
        highlighted: true,
        avatar_ref: Some("avatar2"),
    },
    Review {
        id: "marek",
        user_name: "@marek.f1",
        comment_key: "onboarding_review_marek_comment",
        rating: 5,
        highlighted: false,
        avatar_ref: Some("avatar3"),
    },
];

pub fn find_skill(id: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}

pub fn find_goal(id: &str) -> Option<&'static GoalDuration> {
    GOALS.iter().find(|g| g.id == id)
}

pub fn find_topic(id: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_sizes() {
        assert_eq!(SKILLS.len(), 7);
        assert_eq!(GOALS.len(), 4);
        assert_eq!(TOPICS.len(), 8);
        assert_eq!(REVIEWS.len(), 3);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let skills: HashSet<_> = SKILLS.iter().map(|s| s.id).collect();
        let goals: HashSet<_> = GOALS.iter().map(|g| g.id).collect();
        let topics: HashSet<_> = TOPICS.iter().map(|t| t.id).collect();
        let reviews: HashSet<_> = REVIEWS.iter().map(|r| r.id).collect();
        assert_eq!(skills.len(), SKILLS.len());
        assert_eq!(goals.len(), GOALS.len());
        assert_eq!(topics.len(), TOPICS.len());
        assert_eq!(reviews.len(), REVIEWS.len());
    }

    #[test]
    fn reviews_have_valid_ratings_and_one_highlight() {
        assert!(REVIEWS.iter().all(|r| r.rating <= MAX_RATING));
        assert_eq!(REVIEWS.iter().filter(|r| r.highlighted).count(), 1);
    }

    #[test]
    fn lookups() {
        assert_eq!(find_skill("vocabulary").unwrap().icon, "\u{1F4D6}");
        assert!(find_skill("cooking").is_none());
        assert_eq!(
            find_goal("10_min").unwrap().display_key,
            "onboarding_goal_option_10_min"
        );
        assert!(find_goal("invalid_id").is_none());
        assert!(find_topic("airport").is_some());
        // Ids are case-sensitive
        assert!(find_topic("Airport").is_none());
    }
}
