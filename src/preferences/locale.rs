//! Durable UI language preference.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::DatabaseError;
use crate::i18n::Language;
use crate::onboarding::model::settings_keys;
use crate::store::Database;

/// Language preference backed by the settings table.
///
/// Independent of the onboarding flow; a change only asks subscribers to
/// re-render their text.
pub struct LocaleStore {
    db: Arc<dyn Database>,
    user_id: String,
    language: watch::Sender<Language>,
}

impl LocaleStore {
    /// Read the stored language, or use `default` if none is stored.
    pub async fn load(
        db: Arc<dyn Database>,
        user_id: impl Into<String>,
        default: Language,
    ) -> Result<Self, DatabaseError> {
        let user_id = user_id.into();
        let stored = db
            .get_setting(&user_id, settings_keys::SELECTED_LANGUAGE)
            .await?;

        let language = match stored.as_ref().and_then(|v| v.as_str()) {
            Some(code) => code.parse::<Language>().unwrap_or_else(|e| {
                warn!(error = %e, "Stored language not supported, using default");
                default
            }),
            None => default,
        };

        let (tx, _rx) = watch::channel(language);
        Ok(Self {
            db,
            user_id,
            language: tx,
        })
    }

    pub fn language(&self) -> Language {
        *self.language.borrow()
    }

    /// Receives the new language on every explicit change.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.language.subscribe()
    }

    /// Persist `language` and notify subscribers.
    pub async fn set_language(&self, language: Language) -> Result<(), DatabaseError> {
        self.db
            .set_setting(
                &self.user_id,
                settings_keys::SELECTED_LANGUAGE,
                &serde_json::Value::String(language.code().to_string()),
            )
            .await?;
        self.language.send_replace(language);
        info!(language = %language, "Language changed");
        Ok(())
    }
}
