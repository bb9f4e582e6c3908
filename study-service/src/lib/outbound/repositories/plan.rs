use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::plan::errors::PlanError;
use crate::domain::plan::models::DurationMinutes;
use crate::domain::plan::models::PlanId;
use crate::domain::plan::models::SessionId;
use crate::domain::plan::models::SessionStatus;
use crate::domain::plan::models::StudyPlan;
use crate::domain::plan::models::StudySession;
use crate::domain::plan::models::Title;
use crate::domain::plan::ports::PlanRepository;
use crate::domain::user::models::UserId;

pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> PlanError {
    PlanError::DatabaseError(e.to_string())
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    title: String,
    subject_tags: Vec<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for StudyPlan {
    type Error = PlanError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let title = Title::new(row.title).map_err(|e| {
            PlanError::DatabaseError(format!("stored plan {} is invalid: {}", row.id, e))
        })?;

        Ok(StudyPlan {
            id: PlanId(row.id),
            title,
            subject_tags: row.subject_tags,
            start_date: row.start_date,
            end_date: row.end_date,
            created_by: UserId(row.created_by),
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    plan_id: Uuid,
    title: String,
    subject: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    duration_mins: Option<i32>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for StudySession {
    type Error = PlanError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let invalid =
            |e: String| PlanError::DatabaseError(format!("stored session {} is invalid: {}", row.id, e));

        Ok(StudySession {
            id: SessionId(row.id),
            plan_id: PlanId(row.plan_id),
            title: Title::new(row.title).map_err(|e| invalid(e.to_string()))?,
            subject: row.subject,
            scheduled_at: row.scheduled_at,
            duration_mins: row
                .duration_mins
                .map(|d| DurationMinutes::new(i64::from(d)))
                .transpose()
                .map_err(|e| invalid(e.to_string()))?,
            notes: row.notes,
            status: row
                .status
                .parse::<SessionStatus>()
                .map_err(|e| invalid(e.to_string()))?,
            created_at: row.created_at,
        })
    }
}

fn duration_column(session: &StudySession) -> Option<i32> {
    session
        .duration_mins
        .map(|d| i32::try_from(d.get()).unwrap_or(i32::MAX))
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create_plan(&self, plan: StudyPlan) -> Result<StudyPlan, PlanError> {
        sqlx::query(
            r#"
            INSERT INTO study_plans (id, title, subject_tags, start_date, end_date, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(plan.id.0)
        .bind(plan.title.as_str())
        .bind(&plan.subject_tags)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.created_by.0)
        .bind(plan.created_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(plan)
    }

    async fn find_plan(&self, id: &PlanId) -> Result<Option<StudyPlan>, PlanError> {
        sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, title, subject_tags, start_date, end_date, created_by, created_at
            FROM study_plans
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(StudyPlan::try_from)
        .transpose()
    }

    async fn list_plans_by_owner(&self, owner: &UserId) -> Result<Vec<StudyPlan>, PlanError> {
        sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, title, subject_tags, start_date, end_date, created_by, created_at
            FROM study_plans
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(StudyPlan::try_from)
        .collect()
    }

    async fn create_session(&self, session: StudySession) -> Result<StudySession, PlanError> {
        sqlx::query(
            r#"
            INSERT INTO study_sessions
                (id, plan_id, title, subject, scheduled_at, duration_mins, notes, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(session.id.0)
        .bind(session.plan_id.0)
        .bind(session.title.as_str())
        .bind(session.subject.as_deref())
        .bind(session.scheduled_at)
        .bind(duration_column(&session))
        .bind(session.notes.as_deref())
        .bind(session.status.as_str())
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return PlanError::PlanNotFound(session.plan_id.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(session)
    }

    async fn find_session(&self, id: &SessionId) -> Result<Option<StudySession>, PlanError> {
        sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, plan_id, title, subject, scheduled_at, duration_mins, notes, status, created_at
            FROM study_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(StudySession::try_from)
        .transpose()
    }

    async fn list_sessions_by_plans(
        &self,
        plan_ids: &[PlanId],
    ) -> Result<Vec<StudySession>, PlanError> {
        let uuids: Vec<Uuid> = plan_ids.iter().map(|id| id.0).collect();

        sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, plan_id, title, subject, scheduled_at, duration_mins, notes, status, created_at
            FROM study_sessions
            WHERE plan_id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(StudySession::try_from)
        .collect()
    }

    async fn update_session(&self, session: StudySession) -> Result<StudySession, PlanError> {
        let result = sqlx::query(
            r#"
            UPDATE study_sessions
            SET title = $2, subject = $3, scheduled_at = $4, duration_mins = $5, notes = $6, status = $7
            WHERE id = $1
            "#,
        )
        .bind(session.id.0)
        .bind(session.title.as_str())
        .bind(session.subject.as_deref())
        .bind(session.scheduled_at)
        .bind(duration_column(&session))
        .bind(session.notes.as_deref())
        .bind(session.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(PlanError::SessionNotFound(session.id.to_string()));
        }

        Ok(session)
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), PlanError> {
        let result = sqlx::query(
            r#"
            DELETE FROM study_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(PlanError::SessionNotFound(id.to_string()));
        }

        Ok(())
    }
}
