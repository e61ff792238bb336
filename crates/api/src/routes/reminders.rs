//! Read-only browse surface for reminders.
//!
//! A reminder row stores either a provider URL or a media-relative
//! path; both are resolved into a loadable `video_preview_url` on the
//! way out so an operator can watch what was (or would have been)
//! sent.

use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use emivid_core::error::CoreError;
use emivid_core::media::resolve_public_url;
use emivid_core::script::validate_event_type;
use emivid_core::types::DbId;
use emivid_db::models::reminder::{Reminder, ReminderListQuery};
use emivid_db::repositories::ReminderRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A reminder with its stored video reference resolved for playback.
#[derive(Debug, Serialize)]
pub struct ReminderView {
    #[serde(flatten)]
    pub reminder: Reminder,
    /// Loadable URL of the stored video, when one exists.
    pub video_preview_url: Option<String>,
}

fn into_view(reminder: Reminder, media_url_prefix: &str) -> ReminderView {
    let video_preview_url = reminder
        .video_url
        .as_deref()
        .map(|stored| resolve_public_url(media_url_prefix, stored));
    ReminderView {
        reminder,
        video_preview_url,
    }
}

/// GET /api/v1/reminders
///
/// List reminders, newest first, with optional status and event-type
/// filtering. An unknown event type is a 400, not an empty list.
async fn list_reminders(
    State(state): State<AppState>,
    Query(params): Query<ReminderListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(event_type) = &params.event_type {
        validate_event_type(event_type)?;
    }
    let reminders = ReminderRepo::list(&state.pool, &params).await?;
    let views: Vec<ReminderView> = reminders
        .into_iter()
        .map(|r| into_view(r, &state.media_url_prefix))
        .collect();
    Ok(Json(serde_json::json!({ "data": views })))
}

/// GET /api/v1/reminders/{id}
///
/// Fetch a single reminder with its video preview URL.
async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReminderView>> {
    let reminder = ReminderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reminder",
            id,
        }))?;
    Ok(Json(into_view(reminder, &state.media_url_prefix)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/reminders", get(list_reminders))
        .route("/api/v1/reminders/{id}", get(get_reminder))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use emivid_db::models::status::ReminderStatus;

    use super::*;

    fn reminder(video_url: Option<&str>) -> Reminder {
        Reminder {
            id: 1,
            customer_id: 1,
            loan_id: 1,
            event_type: "EMI_DUE".to_string(),
            status_id: ReminderStatus::Sent.id(),
            video_url: video_url.map(str::to_string),
            cycle_date: NaiveDate::from_ymd_opt(2025, 10, 23).unwrap(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn relative_video_path_resolves_under_prefix() {
        let view = into_view(
            reminder(Some("reminders/vid-1.mp4")),
            "https://media.example.com",
        );
        assert_eq!(
            view.video_preview_url.as_deref(),
            Some("https://media.example.com/reminders/vid-1.mp4")
        );
    }

    #[test]
    fn absolute_video_url_passes_through() {
        let view = into_view(
            reminder(Some("https://cdn.heygen.com/v/abc.mp4")),
            "https://media.example.com",
        );
        assert_eq!(
            view.video_preview_url.as_deref(),
            Some("https://cdn.heygen.com/v/abc.mp4")
        );
    }

    #[test]
    fn missing_video_has_no_preview() {
        let view = into_view(reminder(None), "https://media.example.com");
        assert_eq!(view.video_preview_url, None);
    }
}
