//! Serialization views backing the portal screens.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::classifier::LessonStanding;
use super::domain::{ChangeRequest, Lesson, MakeupOption, RequestId, RequestStatus};

/// Read-only evaluation of a single lesson: its standing and the makeup
/// options the policy permits. Rendered next to each lesson on the leave
/// form so the UI only offers legal actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonEvaluation {
    pub standing: LessonStanding,
    pub allowed_options: Vec<MakeupOption>,
}

/// Coarser display tier used by the course-list screen. Unlike
/// [`LessonStanding`] this is presentation only and feeds no policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonOutlook {
    Completed,
    Past,
    StartingSoon,
    ThisWeek,
    Scheduled,
}

impl LessonOutlook {
    pub fn of(lesson: &Lesson, today: NaiveDate) -> Self {
        if lesson.completed {
            return LessonOutlook::Completed;
        }
        let Some(date) = lesson.normalized_date() else {
            return LessonOutlook::Past;
        };
        if date < today {
            return LessonOutlook::Past;
        }
        let days_until = (date - today).num_days();
        if days_until <= 3 {
            LessonOutlook::StartingSoon
        } else if days_until <= 7 {
            LessonOutlook::ThisWeek
        } else {
            LessonOutlook::Scheduled
        }
    }
}

/// One lesson row on the schedule screen, annotated with everything the UI
/// needs to decide what to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonScheduleEntry {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub standing: LessonStanding,
    pub outlook: LessonOutlook,
    pub allowed_options: Vec<MakeupOption>,
    pub actionable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_status: Option<RequestStatus>,
}

/// Completed / remaining / total counters for the course overview card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub completed: usize,
    pub remaining: usize,
    pub total: usize,
}

impl CourseProgress {
    pub fn of(lessons: &[Lesson]) -> Self {
        let completed = lessons.iter().filter(|lesson| lesson.completed).count();
        Self {
            completed,
            remaining: lessons.len() - completed,
            total: lessons.len(),
        }
    }
}

/// Full schedule screen payload for one student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverview {
    pub student_id: String,
    pub today: NaiveDate,
    pub progress: CourseProgress,
    /// Lessons inside the lookahead window that a leave request can still be
    /// opened for.
    pub upcoming: Vec<LessonScheduleEntry>,
    pub lessons: Vec<LessonScheduleEntry>,
}

/// One row in the "my leave requests" history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHistoryEntry {
    pub id: RequestId,
    pub lesson_id: u32,
    pub course_id: String,
    pub lesson_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_date: Option<NaiveDate>,
    pub status: RequestStatus,
    pub makeup_summary: String,
    pub submitted_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
}

impl RequestHistoryEntry {
    pub fn of(request: &ChangeRequest) -> Self {
        Self {
            id: request.id.clone(),
            lesson_id: request.lesson.lesson_id,
            course_id: request.lesson.course_id.clone(),
            lesson_name: request.lesson.name.clone(),
            lesson_date: request.lesson.date,
            status: request.status,
            makeup_summary: request.makeup_summary(),
            submitted_at: request.submitted_at,
            review_note: request.review_note.clone(),
        }
    }
}
