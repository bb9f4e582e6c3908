use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::CreatePlanCommand;
use crate::domain::plan::models::CreateStudySessionCommand;
use crate::domain::plan::models::PlanId;
use crate::domain::plan::models::PlanWithSessions;
use crate::domain::plan::models::SessionId;
use crate::domain::plan::models::StudyPlan;
use crate::domain::plan::models::StudySession;
use crate::domain::plan::models::UpdateStudySessionCommand;
use crate::domain::plan::ports::PlanRepository;
use crate::domain::plan::ports::PlanServicePort;
use crate::domain::user::models::UserId;

/// Domain service for study plans and their sessions.
pub struct PlanService<PR>
where
    PR: PlanRepository,
{
    repository: Arc<PR>,
}

impl<PR> PlanService<PR>
where
    PR: PlanRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    /// Load a plan, treating plans of other users as missing.
    async fn owned_plan(&self, owner: &UserId, plan_id: &PlanId) -> Result<StudyPlan, PlanError> {
        match self.repository.find_plan(plan_id).await? {
            Some(plan) if plan.created_by == *owner => Ok(plan),
            Some(_) => {
                tracing::debug!(plan_id = %plan_id, user_id = %owner, "Plan owned by another user");
                Err(PlanError::PlanNotFound(plan_id.to_string()))
            }
            None => Err(PlanError::PlanNotFound(plan_id.to_string())),
        }
    }

    /// Load a session whose plan belongs to `owner`.
    async fn owned_session(
        &self,
        owner: &UserId,
        session_id: &SessionId,
    ) -> Result<StudySession, PlanError> {
        let not_found = || PlanError::SessionNotFound(session_id.to_string());

        let session = self
            .repository
            .find_session(session_id)
            .await?
            .ok_or_else(not_found)?;

        match self.owned_plan(owner, &session.plan_id).await {
            Ok(_) => Ok(session),
            Err(PlanError::PlanNotFound(_)) => Err(not_found()),
            Err(e) => Err(e),
        }
    }
}

/// Scheduled sessions first in time order, unscheduled ones after, ties by creation.
fn schedule_order(a: &StudySession, b: &StudySession) -> Ordering {
    match (a.scheduled_at, b.scheduled_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.created_at.cmp(&b.created_at))
}

#[async_trait]
impl<PR> PlanServicePort for PlanService<PR>
where
    PR: PlanRepository,
{
    async fn create_plan(
        &self,
        owner: &UserId,
        command: CreatePlanCommand,
    ) -> Result<StudyPlan, PlanError> {
        let plan = StudyPlan {
            id: PlanId::new(),
            title: command.title,
            subject_tags: command.subject_tags,
            start_date: command.start_date,
            end_date: command.end_date,
            created_by: *owner,
            created_at: Utc::now(),
        };

        let created = self.repository.create_plan(plan).await?;
        tracing::info!(plan_id = %created.id, user_id = %owner, "Study plan created");

        Ok(created)
    }

    async fn list_plans(&self, owner: &UserId) -> Result<Vec<PlanWithSessions>, PlanError> {
        let plans = self.repository.list_plans_by_owner(owner).await?;
        if plans.is_empty() {
            return Ok(Vec::new());
        }

        let plan_ids: Vec<PlanId> = plans.iter().map(|plan| plan.id).collect();
        let mut sessions_by_plan: HashMap<PlanId, Vec<StudySession>> = HashMap::new();
        for session in self.repository.list_sessions_by_plans(&plan_ids).await? {
            sessions_by_plan
                .entry(session.plan_id)
                .or_default()
                .push(session);
        }

        Ok(plans
            .into_iter()
            .map(|plan| {
                let mut sessions = sessions_by_plan.remove(&plan.id).unwrap_or_default();
                sessions.sort_by(schedule_order);
                PlanWithSessions { plan, sessions }
            })
            .collect())
    }

    async fn get_plan(
        &self,
        owner: &UserId,
        plan_id: &PlanId,
    ) -> Result<PlanWithSessions, PlanError> {
        let plan = self.owned_plan(owner, plan_id).await?;

        let mut sessions = self
            .repository
            .list_sessions_by_plans(std::slice::from_ref(plan_id))
            .await?;
        sessions.sort_by(schedule_order);

        Ok(PlanWithSessions { plan, sessions })
    }

    async fn add_session(
        &self,
        owner: &UserId,
        plan_id: &PlanId,
        command: CreateStudySessionCommand,
    ) -> Result<StudySession, PlanError> {
        let plan = self.owned_plan(owner, plan_id).await?;

        let session = StudySession {
            id: SessionId::new(),
            plan_id: plan.id,
            title: command.title,
            subject: command.subject,
            scheduled_at: command.scheduled_at,
            duration_mins: command.duration_mins,
            notes: command.notes,
            status: command.status,
            created_at: Utc::now(),
        };

        let created = self.repository.create_session(session).await?;
        tracing::info!(session_id = %created.id, plan_id = %plan.id, "Study session added");

        Ok(created)
    }

    async fn update_session(
        &self,
        owner: &UserId,
        session_id: &SessionId,
        command: UpdateStudySessionCommand,
    ) -> Result<StudySession, PlanError> {
        let mut session = self.owned_session(owner, session_id).await?;
        if command.is_empty() {
            return Ok(session);
        }

        command.apply_to(&mut session);
        let updated = self.repository.update_session(session).await?;
        tracing::info!(session_id = %updated.id, status = %updated.status, "Study session updated");

        Ok(updated)
    }

    async fn delete_session(
        &self,
        owner: &UserId,
        session_id: &SessionId,
    ) -> Result<(), PlanError> {
        let session = self.owned_session(owner, session_id).await?;
        self.repository.delete_session(&session.id).await?;
        tracing::info!(session_id = %session.id, plan_id = %session.plan_id, "Study session deleted");

        Ok(())
    }
}
