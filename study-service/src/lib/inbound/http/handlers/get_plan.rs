use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::plan_data::PlanDetailData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::plan::models::PlanId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_plan(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(plan_id): Path<String>,
) -> Result<ApiSuccess<PlanDetailData>, ApiError> {
    let plan_id = PlanId::from_string(&plan_id)?;

    state
        .plan_service
        .get_plan(&current.user.id, &plan_id)
        .await
        .map_err(ApiError::from)
        .map(|ref found| ApiSuccess::new(StatusCode::OK, found.into()))
}
