use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::database::ActivityRegistry;
use crate::models::Catalog;
use crate::services::activities_service::{self, MessageView};
use crate::web::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MembershipQuery {
    pub email: Option<String>,
}

pub async fn list_activities_handler(State(registry): State<ActivityRegistry>) -> Json<Catalog> {
    Json(activities_service::list_activities(&registry).await)
}

pub async fn signup_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<MembershipQuery>, QueryRejection>,
    State(registry): State<ActivityRegistry>,
) -> Result<Json<MessageView>, ApiError> {
    // Extractor rejections go through ApiError so they keep the JSON body.
    let Path(activity_name) = path?;
    let Query(query) = query?;
    let email = require_email(&query)?;
    let view = activities_service::signup(&registry, &activity_name, email).await?;
    Ok(Json(view))
}

pub async fn unregister_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<MembershipQuery>, QueryRejection>,
    State(registry): State<ActivityRegistry>,
) -> Result<Json<MessageView>, ApiError> {
    let Path(activity_name) = path?;
    let Query(query) = query?;
    let email = require_email(&query)?;
    let view = activities_service::unregister(&registry, &activity_name, email).await?;
    Ok(Json(view))
}

// Emails are stored verbatim; only a missing or blank value is refused.
fn require_email(query: &MembershipQuery) -> Result<&str, ApiError> {
    match query.email.as_deref() {
        Some(email) if !email.trim().is_empty() => Ok(email),
        _ => Err(ApiError::MissingEmail),
    }
}
