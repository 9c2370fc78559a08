//! PreferenceManager: the durable "onboarding completed" flag.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::error::DatabaseError;
use crate::onboarding::model::settings_keys;
use crate::store::Database;

/// Durable flag store backed by the settings table.
///
/// Subscribers observe a value only after it has been committed, so a
/// `true` seen on the stream is also what the next process launch reads.
/// Writes are serialized: each one commits and publishes before the next
/// starts, so the published value is always the last one committed.
pub struct PreferenceManager {
    db: Arc<dyn Database>,
    user_id: String,
    completed: watch::Sender<bool>,
    write_lock: Mutex<()>,
}

impl PreferenceManager {
    /// Read the committed flag and build a manager around it.
    ///
    /// A missing or malformed value reads as `false`.
    pub async fn load(
        db: Arc<dyn Database>,
        user_id: impl Into<String>,
    ) -> Result<Self, DatabaseError> {
        let user_id = user_id.into();
        let stored = db
            .get_setting(&user_id, settings_keys::ONBOARDING_COMPLETED)
            .await?;

        let completed = match stored {
            Some(serde_json::Value::Bool(b)) => b,
            Some(other) => {
                warn!(value = %other, "Ignoring malformed onboarding_completed setting");
                false
            }
            None => false,
        };

        let (tx, _rx) = watch::channel(completed);
        Ok(Self {
            db,
            user_id,
            completed: tx,
            write_lock: Mutex::new(()),
        })
    }

    /// Stream of the flag, starting with the current committed value.
    pub fn onboarding_completed(&self) -> WatchStream<bool> {
        WatchStream::new(self.completed.subscribe())
    }

    /// Raw watch receiver, for callers that want `changed()` semantics.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.completed.subscribe()
    }

    /// Current committed value.
    pub fn is_onboarding_completed(&self) -> bool {
        *self.completed.borrow()
    }

    /// Durably write the flag, then publish it.
    ///
    /// On failure the published value is left unchanged.
    pub async fn set_onboarding_completed(&self, completed: bool) -> Result<(), DatabaseError> {
        let _guard = self.write_lock.lock().await;
        self.db
            .set_setting(
                &self.user_id,
                settings_keys::ONBOARDING_COMPLETED,
                &serde_json::Value::Bool(completed),
            )
            .await?;
        self.publish(completed);
        Ok(())
    }

    /// Remove the stored flag so it reads as never written, then publish
    /// `false`.
    pub async fn clear_onboarding_completed(&self) -> Result<(), DatabaseError> {
        let _guard = self.write_lock.lock().await;
        let removed = self
            .db
            .delete_setting(&self.user_id, settings_keys::ONBOARDING_COMPLETED)
            .await?;
        debug!(removed, user_id = %self.user_id, "Onboarding flag cleared");
        self.publish(false);
        Ok(())
    }

    fn publish(&self, completed: bool) {
        let previous = self.completed.send_replace(completed);
        if previous != completed {
            info!(completed, user_id = %self.user_id, "Onboarding flag updated");
        }
    }
}
