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
use crate::domain::plan::models::CreateStudySessionCommand;
use crate::domain::plan::models::DurationMinutes;
use crate::domain::plan::models::PlanId;
use crate::domain::plan::models::SessionStatus;
use crate::domain::plan::models::Title;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn add_session(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(plan_id): Path<String>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    let plan_id = PlanId::from_string(&plan_id)?;
    let command = body.try_into_command()?;

    state
        .plan_service
        .add_session(&current.user.id, &plan_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for adding a study session (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateSessionRequest {
    title: String,
    subject: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    duration_mins: Option<i64>,
    notes: Option<String>,
    status: Option<String>,
}

impl CreateSessionRequest {
    fn try_into_command(self) -> Result<CreateStudySessionCommand, PlanError> {
        Ok(CreateStudySessionCommand {
            title: Title::new(self.title)?,
            subject: self.subject,
            scheduled_at: self.scheduled_at,
            duration_mins: self.duration_mins.map(DurationMinutes::new).transpose()?,
            notes: self.notes,
            status: self
                .status
                .as_deref()
                .map(str::parse::<SessionStatus>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}
