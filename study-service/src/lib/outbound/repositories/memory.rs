use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::PlanId;
use crate::domain::plan::models::SessionId;
use crate::domain::plan::models::StudyPlan;
use crate::domain::plan::models::StudySession;
use crate::domain::plan::ports::PlanRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store with the same uniqueness rules as the database.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        // Uniqueness checks and the insert share one write guard
        let mut users = self.users.write().await;

        for existing in users.values() {
            if existing.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if existing.email == user.email {
                return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
            }
        }
        if users.contains_key(&user.id) {
            return Err(UserError::DatabaseError(format!(
                "duplicate user id {}",
                user.id
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == *username)
            .cloned())
    }
}

/// Process-local plan and session store.
#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<PlanId, StudyPlan>>,
    sessions: RwLock<HashMap<SessionId, StudySession>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn create_plan(&self, plan: StudyPlan) -> Result<StudyPlan, PlanError> {
        self.plans.write().await.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn find_plan(&self, id: &PlanId) -> Result<Option<StudyPlan>, PlanError> {
        Ok(self.plans.read().await.get(id).cloned())
    }

    async fn list_plans_by_owner(&self, owner: &UserId) -> Result<Vec<StudyPlan>, PlanError> {
        let mut plans: Vec<StudyPlan> = self
            .plans
            .read()
            .await
            .values()
            .filter(|plan| plan.created_by == *owner)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn create_session(&self, session: StudySession) -> Result<StudySession, PlanError> {
        if !self.plans.read().await.contains_key(&session.plan_id) {
            return Err(PlanError::PlanNotFound(session.plan_id.to_string()));
        }

        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: &SessionId) -> Result<Option<StudySession>, PlanError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn list_sessions_by_plans(
        &self,
        plan_ids: &[PlanId],
    ) -> Result<Vec<StudySession>, PlanError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|session| plan_ids.contains(&session.plan_id))
            .cloned()
            .collect())
    }

    async fn update_session(&self, session: StudySession) -> Result<StudySession, PlanError> {
        match self.sessions.write().await.get_mut(&session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(session)
            }
            None => Err(PlanError::SessionNotFound(session.id.to_string())),
        }
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), PlanError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlanError::SessionNotFound(id.to_string()))
    }
}
