//! TaskOne: onboarding core for a language-practice app.

pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod onboarding;
pub mod preferences;
pub mod store;
