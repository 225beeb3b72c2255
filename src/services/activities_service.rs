use serde::Serialize;
use tracing::{info, warn};

use crate::database::{ActivityRegistry, RegistryError};
use crate::models::Catalog;

/// Confirmation returned by the membership commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub message: String,
}

pub async fn list_activities(registry: &ActivityRegistry) -> Catalog {
    registry.list_activities().await
}

pub async fn signup(
    registry: &ActivityRegistry,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, RegistryError> {
    match registry.signup(activity_name, email).await {
        Ok(()) => {
            info!(activity = %activity_name, email = %email, "signup accepted");
            Ok(MessageView {
                message: format!("Signed up {} for {}", email, activity_name),
            })
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %email, "signup rejected: {}", e);
            Err(e)
        }
    }
}

pub async fn unregister(
    registry: &ActivityRegistry,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, RegistryError> {
    match registry.unregister(activity_name, email).await {
        Ok(()) => {
            info!(activity = %activity_name, email = %email, "unregister accepted");
            Ok(MessageView {
                message: format!("Unregistered {} from {}", email, activity_name),
            })
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %email, "unregister rejected: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::seed_catalog::default_catalog;

    #[tokio::test]
    async fn signup_message_mentions_email_and_activity() {
        let registry = ActivityRegistry::new(default_catalog());
        let view = signup(&registry, "Basketball Team", "student@mergington.edu")
            .await
            .expect("signup");
        assert_eq!(
            view.message,
            "Signed up student@mergington.edu for Basketball Team"
        );
    }

    #[tokio::test]
    async fn unregister_message_mentions_email_and_activity() {
        let registry = ActivityRegistry::new(default_catalog());
        let view = unregister(&registry, "Chess Club", "michael@mergington.edu")
            .await
            .expect("unregister");
        assert_eq!(
            view.message,
            "Unregistered michael@mergington.edu from Chess Club"
        );
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let registry = ActivityRegistry::new(default_catalog());
        let err = signup(&registry, "Nonexistent Club", "a@mergington.edu")
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::NotFound);
    }
}
