use async_trait::async_trait;

use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::CreatePlanCommand;
use crate::domain::plan::models::CreateStudySessionCommand;
use crate::domain::plan::models::PlanId;
use crate::domain::plan::models::PlanWithSessions;
use crate::domain::plan::models::SessionId;
use crate::domain::plan::models::StudyPlan;
use crate::domain::plan::models::StudySession;
use crate::domain::plan::models::UpdateStudySessionCommand;
use crate::domain::user::models::UserId;

/// Port for study plan operations.
///
/// Every operation is scoped to `owner`; plans and sessions belonging to
/// another user are reported as not found.
#[async_trait]
pub trait PlanServicePort: Send + Sync + 'static {
    /// Create a plan owned by `owner`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_plan(
        &self,
        owner: &UserId,
        command: CreatePlanCommand,
    ) -> Result<StudyPlan, PlanError>;

    /// List the owner's plans, newest first, each with its sessions.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_plans(&self, owner: &UserId) -> Result<Vec<PlanWithSessions>, PlanError>;

    /// # Errors
    /// * `PlanNotFound` - Plan does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn get_plan(
        &self,
        owner: &UserId,
        plan_id: &PlanId,
    ) -> Result<PlanWithSessions, PlanError>;

    /// # Errors
    /// * `PlanNotFound` - Plan does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn add_session(
        &self,
        owner: &UserId,
        plan_id: &PlanId,
        command: CreateStudySessionCommand,
    ) -> Result<StudySession, PlanError>;

    /// Apply a partial update to a session.
    ///
    /// # Errors
    /// * `SessionNotFound` - Session does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_session(
        &self,
        owner: &UserId,
        session_id: &SessionId,
        command: UpdateStudySessionCommand,
    ) -> Result<StudySession, PlanError>;

    /// # Errors
    /// * `SessionNotFound` - Session does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn delete_session(&self, owner: &UserId, session_id: &SessionId)
        -> Result<(), PlanError>;
}

/// Persistence operations for plans and their sessions.
#[async_trait]
pub trait PlanRepository: Send + Sync + 'static {
    async fn create_plan(&self, plan: StudyPlan) -> Result<StudyPlan, PlanError>;

    async fn find_plan(&self, id: &PlanId) -> Result<Option<StudyPlan>, PlanError>;

    /// Plans created by `owner`, newest first.
    async fn list_plans_by_owner(&self, owner: &UserId) -> Result<Vec<StudyPlan>, PlanError>;

    async fn create_session(&self, session: StudySession) -> Result<StudySession, PlanError>;

    async fn find_session(&self, id: &SessionId) -> Result<Option<StudySession>, PlanError>;

    /// Sessions of all given plans, in no particular order.
    async fn list_sessions_by_plans(
        &self,
        plan_ids: &[PlanId],
    ) -> Result<Vec<StudySession>, PlanError>;

    /// Overwrite a stored session.
    ///
    /// # Errors
    /// * `SessionNotFound` - Session does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_session(&self, session: StudySession) -> Result<StudySession, PlanError>;

    /// # Errors
    /// * `SessionNotFound` - Session does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_session(&self, id: &SessionId) -> Result<(), PlanError>;
}
