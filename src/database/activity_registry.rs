use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Activity, Catalog};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Activity not found")]
    NotFound,

    #[error("Student is already signed up")]
    AlreadyRegistered,

    #[error("Student is not registered for this activity")]
    NotRegistered,

    #[error("Activity is full")]
    ActivityFull,
}

/// In-memory activity catalog shared between request handlers.
///
/// Cloning is cheap and every clone sees the same catalog, the same way a
/// connection pool handle is passed around as router state. A single lock
/// guards the whole catalog: listing takes a read guard, signup and
/// unregister check and mutate under one write guard.
#[derive(Debug, Clone)]
pub struct ActivityRegistry {
    catalog: Arc<RwLock<Catalog>>,
    enforce_capacity: bool,
}

impl ActivityRegistry {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            enforce_capacity: false,
        }
    }

    /// Reject signups once an activity has `max_participants` entries.
    /// Off unless configured.
    pub fn enforce_capacity(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    pub fn enforces_capacity(&self) -> bool {
        self.enforce_capacity
    }

    /// Snapshot of every activity with its current participants.
    pub async fn list_activities(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    pub async fn get_activity(&self, activity_name: &str) -> Result<Activity, RegistryError> {
        self.catalog
            .read()
            .await
            .get(activity_name)
            .cloned()
            .ok_or(RegistryError::NotFound)
    }

    pub async fn activity_count(&self) -> usize {
        self.catalog.read().await.len()
    }

    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<(), RegistryError> {
        let mut catalog = self.catalog.write().await;
        let activity = catalog
            .get_mut(activity_name)
            .ok_or(RegistryError::NotFound)?;

        if activity.is_participant(email) {
            return Err(RegistryError::AlreadyRegistered);
        }
        if self.enforce_capacity && activity.is_full() {
            return Err(RegistryError::ActivityFull);
        }

        activity.participants.push(email.to_string());
        debug!(
            activity = %activity_name,
            participants = activity.participants.len(),
            "participant added"
        );
        Ok(())
    }

    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<(), RegistryError> {
        let mut catalog = self.catalog.write().await;
        let activity = catalog
            .get_mut(activity_name)
            .ok_or(RegistryError::NotFound)?;

        let Some(position) = activity.participants.iter().position(|p| p == email) else {
            return Err(RegistryError::NotRegistered);
        };

        // `remove` keeps the order of the remaining participants.
        activity.participants.remove(position);
        debug!(
            activity = %activity_name,
            participants = activity.participants.len(),
            "participant removed"
        );
        Ok(())
    }
}
