use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::plan::errors::PlanError;
use crate::domain::plan::errors::TitleError;
use crate::domain::user::models::UserId;

/// A study plan owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPlan {
    pub id: PlanId,
    pub title: Title,
    pub subject_tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// A scheduled study session inside a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    pub id: SessionId,
    pub plan_id: PlanId,
    pub title: Title,
    pub subject: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<DurationMinutes>,
    pub notes: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

/// A plan together with its sessions, ordered by schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanWithSessions {
    pub plan: StudyPlan,
    pub sessions: Vec<StudySession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanId(pub Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidPlanId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PlanError> {
        Uuid::parse_str(s)
            .map(PlanId)
            .map_err(|e| PlanError::InvalidPlanId(e.to_string()))
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidSessionId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PlanError> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|e| PlanError::InvalidSessionId(e.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Title of a plan or session: trimmed, 1-200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    const MAX_LENGTH: usize = 200;

    pub fn new(title: String) -> Result<Self, TitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();

        if length == 0 {
            Err(TitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Planned length of a session, always at least one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    // Fits a Postgres INTEGER column
    const MAX: i64 = i32::MAX as i64;

    /// # Errors
    /// * `InvalidDuration` - Zero, negative, or too large
    pub fn new(minutes: i64) -> Result<Self, PlanError> {
        if !(1..=Self::MAX).contains(&minutes) {
            return Err(PlanError::InvalidDuration(minutes));
        }
        u32::try_from(minutes)
            .map(Self)
            .map_err(|_| PlanError::InvalidDuration(minutes))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Progress of a study session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Todo => "todo",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Done => "done",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(SessionStatus::Todo),
            "in_progress" => Ok(SessionStatus::InProgress),
            "done" => Ok(SessionStatus::Done),
            other => Err(PlanError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim tags and drop empty and repeated ones, keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

/// Command to create a study plan.
#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub title: Title,
    pub subject_tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CreatePlanCommand {
    /// # Errors
    /// * `InvalidDateRange` - `end_date` is before `start_date`
    pub fn new(
        title: Title,
        subject_tags: Vec<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Self, PlanError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(PlanError::InvalidDateRange);
            }
        }

        Ok(Self {
            title,
            subject_tags: normalize_tags(subject_tags),
            start_date,
            end_date,
        })
    }
}

/// Command to add a session to a plan.
#[derive(Debug, Clone)]
pub struct CreateStudySessionCommand {
    pub title: Title,
    pub subject: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<DurationMinutes>,
    pub notes: Option<String>,
    pub status: SessionStatus,
}

/// Partial update of a session. Only fields that are `Some` change.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudySessionCommand {
    pub title: Option<Title>,
    pub subject: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<DurationMinutes>,
    pub notes: Option<String>,
    pub status: Option<SessionStatus>,
}

impl UpdateStudySessionCommand {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subject.is_none()
            && self.scheduled_at.is_none()
            && self.duration_mins.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(self, session: &mut StudySession) {
        let UpdateStudySessionCommand {
            title,
            subject,
            scheduled_at,
            duration_mins,
            notes,
            status,
        } = self;

        if let Some(title) = title {
            session.title = title;
        }
        if let Some(subject) = subject {
            session.subject = Some(subject);
        }
        if let Some(scheduled_at) = scheduled_at {
            session.scheduled_at = Some(scheduled_at);
        }
        if let Some(duration_mins) = duration_mins {
            session.duration_mins = Some(duration_mins);
        }
        if let Some(notes) = notes {
            session.notes = Some(notes);
        }
        if let Some(status) = status {
            session.status = status;
        }
    }
}
