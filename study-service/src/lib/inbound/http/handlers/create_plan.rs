use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::plan_data::PlanData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::CreatePlanCommand;
use crate::domain::plan::models::Title;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_plan(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePlanRequest>,
) -> Result<ApiSuccess<PlanData>, ApiError> {
    state
        .plan_service
        .create_plan(&current.user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref plan| ApiSuccess::new(StatusCode::CREATED, plan.into()))
}

/// HTTP request body for creating a study plan (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePlanRequest {
    title: String,
    subject_tags: Option<Vec<String>>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl CreatePlanRequest {
    fn try_into_command(self) -> Result<CreatePlanCommand, PlanError> {
        CreatePlanCommand::new(
            Title::new(self.title)?,
            self.subject_tags.unwrap_or_default(),
            self.start_date,
            self.end_date,
        )
    }
}
