//! Durable user preferences: the onboarding flag and the UI language.

pub mod locale;
pub mod manager;

pub use locale::LocaleStore;
pub use manager::PreferenceManager;
