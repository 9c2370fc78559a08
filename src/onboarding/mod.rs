//! Onboarding system: first-launch flow.
//!
//! The learner picks a skill, a daily goal, reads a few reviews and
//! chooses conversation topics. The selection lives only for the session;
//! finishing the flow durably records that onboarding is complete so later
//! launches open straight on Home.

pub mod catalog;
pub mod controller;
pub mod model;
pub mod sequencer;
pub mod state;

pub use controller::{CompletionHandle, OnboardingController};
pub use model::OnboardingSelection;
pub use sequencer::{Navigation, ScreenSequencer};
pub use state::{NavEvent, Screen, initial_screen};
