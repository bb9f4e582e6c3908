use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::plan_data::PlanDetailData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_plans(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<PlanDetailData>>, ApiError> {
    state
        .plan_service
        .list_plans(&current.user.id)
        .await
        .map_err(ApiError::from)
        .map(|plans| {
            ApiSuccess::new(
                StatusCode::OK,
                plans.iter().map(PlanDetailData::from).collect(),
            )
        })
}
