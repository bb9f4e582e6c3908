use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::plan_data::SessionData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::DurationMinutes;
use crate::domain::plan::models::SessionId;
use crate::domain::plan::models::SessionStatus;
use crate::domain::plan::models::Title;
use crate::domain::plan::models::UpdateStudySessionCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a study session (raw JSON)
///
/// Absent and `null` fields are both left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl UpdateSessionRequest {
    fn try_into_command(self) -> Result<UpdateStudySessionCommand, PlanError> {
        // Each field is validated on its own; the first failure wins
        Ok(UpdateStudySessionCommand {
            title: self.title.map(Title::new).transpose()?,
            subject: self.subject,
            scheduled_at: self.scheduled_at,
            duration_mins: self.duration_mins.map(DurationMinutes::new).transpose()?,
            notes: self.notes,
            status: self
                .status
                .as_deref()
                .map(str::parse::<SessionStatus>)
                .transpose()?,
        })
    }
}

pub async fn update_session(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    let session_id = SessionId::from_string(&session_id)?;
    let command = req.try_into_command()?;

    state
        .plan_service
        .update_session(&current.user.id, &session_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}
