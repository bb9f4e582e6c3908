use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::plan::models::PlanWithSessions;
use crate::domain::plan::models::StudyPlan;
use crate::domain::plan::models::StudySession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanData {
    pub id: String,
    pub title: String,
    pub subject_tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&StudyPlan> for PlanData {
    fn from(plan: &StudyPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            title: plan.title.as_str().to_string(),
            subject_tags: plan.subject_tags.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            created_by: plan.created_by.to_string(),
            created_at: plan.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub id: String,
    pub plan_id: String,
    pub title: String,
    pub subject: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<u32>,
    pub notes: Option<String>,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<&StudySession> for SessionData {
    fn from(session: &StudySession) -> Self {
        Self {
            id: session.id.to_string(),
            plan_id: session.plan_id.to_string(),
            title: session.title.as_str().to_string(),
            subject: session.subject.clone(),
            scheduled_at: session.scheduled_at,
            duration_mins: session.duration_mins.map(|d| d.get()),
            notes: session.notes.clone(),
            status: session.status.as_str(),
            created_at: session.created_at,
        }
    }
}

/// A plan with its sessions nested under `sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDetailData {
    #[serde(flatten)]
    pub plan: PlanData,
    pub sessions: Vec<SessionData>,
}

impl From<&PlanWithSessions> for PlanDetailData {
    fn from(found: &PlanWithSessions) -> Self {
        Self {
            plan: (&found.plan).into(),
            sessions: found.sessions.iter().map(SessionData::from).collect(),
        }
    }
}
