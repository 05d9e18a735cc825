use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::normalizer;

/// Identifier wrapper for submitted leave requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// One scheduled session within a course, as stored in the document database.
///
/// Depending on which tool seeded the record, the date lives in `dateStr`,
/// `date`, or `dateTime` (an ISO-style composite with a `T` separator).
/// [`Lesson::normalized_date`] collapses them into one canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub name: String,
    pub course_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Lesson {
    /// Canonical calendar date of this lesson, or `None` when every date
    /// field is absent or malformed.
    pub fn normalized_date(&self) -> Option<NaiveDate> {
        normalizer::normalized_date(self)
    }
}

/// Catalog entry: the ordered lessons of one course offering plus the
/// course-level default time label used when a lesson lacks its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub lessons: Vec<Lesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
}

/// How a requested absence should be made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeupOption {
    SpecificTime,
    NextQuarter,
    Skip,
}

impl MakeupOption {
    pub const fn label(self) -> &'static str {
        match self {
            MakeupOption::SpecificTime => "specific_time",
            MakeupOption::NextQuarter => "next_quarter",
            MakeupOption::Skip => "skip",
        }
    }
}

impl fmt::Display for MakeupOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review lifecycle of a leave request. Transitions out of `Pending` are
/// performed by the reviewer process, never by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }
}

/// Reason codes offered on the leave form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveReason {
    Illness,
    Family,
    Travel,
    Exam,
    Other,
}

/// Immutable snapshot of the lesson a request targets.
///
/// Stored by value rather than by reference: the source lesson may later be
/// marked completed, and the request must keep describing the session as it
/// was at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSnapshot {
    pub lesson_id: u32,
    pub course_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl LessonSnapshot {
    pub fn of(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id,
            course_id: lesson.course_id.clone(),
            name: lesson.name.clone(),
            date: lesson.normalized_date(),
        }
    }
}

/// Candidate alternate session in a sibling course. Always derived by the
/// resolver, never hand-authored or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupSlot {
    pub id: String,
    pub course_id: String,
    pub lesson_id: u32,
    pub lesson_name: String,
    pub date: NaiveDate,
    pub date_display: String,
    pub day: String,
    pub time: String,
    pub available: bool,
}

/// Payload a parent submits from the leave form. Validated against the
/// change-option policy before it becomes a [`ChangeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSubmission {
    pub student_id: String,
    pub lesson: Lesson,
    pub reason: LeaveReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub makeup_option: MakeupOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_time_slot: Option<MakeupSlot>,
}

/// Persisted leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: RequestId,
    pub student_id: String,
    pub lesson: LessonSnapshot,
    pub reason: LeaveReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub makeup_option: MakeupOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_time_slot: Option<MakeupSlot>,
    pub submitted_at: NaiveDateTime,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
}

impl ChangeRequest {
    /// Whether this request targets the given lesson. Keyed by the composite
    /// (course id, lesson id) pair; lesson ordinals repeat across courses.
    pub fn references(&self, lesson: &Lesson) -> bool {
        self.lesson.lesson_id == lesson.id && self.lesson.course_id == lesson.course_id
    }

    /// Human-readable summary of the chosen makeup arrangement.
    pub fn makeup_summary(&self) -> String {
        match (self.makeup_option, &self.selected_time_slot) {
            (MakeupOption::SpecificTime, Some(slot)) => {
                format!("makeup at {} {} {}", slot.date_display, slot.day, slot.time)
            }
            (MakeupOption::SpecificTime, None) => "makeup slot not selected".to_string(),
            (MakeupOption::NextQuarter, _) => "deferred to next quarter".to_string(),
            (MakeupOption::Skip, _) => "skipped without makeup".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: u32, course_id: &str) -> Lesson {
        Lesson {
            id,
            name: format!("lesson {id}"),
            course_id: course_id.to_string(),
            date_str: Some("2026-01-10".to_string()),
            date: None,
            date_time: None,
            time_slot: Some("SAT 12:00 - 14:00".to_string()),
            completed: false,
        }
    }

    #[test]
    fn snapshot_captures_identity_and_date() {
        let source = lesson(3, "SPEC_C001_round001");
        let snapshot = LessonSnapshot::of(&source);
        assert_eq!(snapshot.lesson_id, 3);
        assert_eq!(snapshot.course_id, "SPEC_C001_round001");
        assert_eq!(
            snapshot.date,
            NaiveDate::from_ymd_opt(2026, 1, 10),
        );
    }

    #[test]
    fn request_matching_requires_both_course_and_lesson_id() {
        let target = lesson(3, "SPEC_C001_round001");
        let request = ChangeRequest {
            id: RequestId("req-000001".to_string()),
            student_id: "STUDENT_001".to_string(),
            lesson: LessonSnapshot::of(&target),
            reason: LeaveReason::Illness,
            description: None,
            makeup_option: MakeupOption::Skip,
            selected_time_slot: None,
            submitted_at: NaiveDate::from_ymd_opt(2026, 1, 2)
                .expect("valid date")
                .and_hms_opt(9, 30, 0)
                .expect("valid time"),
            status: RequestStatus::Pending,
            review_time: None,
            review_note: None,
        };

        assert!(request.references(&target));
        assert!(!request.references(&lesson(3, "SPEC_C002_round001")));
        assert!(!request.references(&lesson(4, "SPEC_C001_round001")));
    }

    #[test]
    fn lesson_round_trips_document_field_names() {
        let raw = serde_json::json!({
            "id": 5,
            "name": "Show and Tell",
            "courseId": "SPEC_C001_round001",
            "dateTime": "2026-01-03T12:00-14:00",
            "timeSlot": "SAT 12:00 - 14:00",
            "completed": false
        });
        let parsed: Lesson = serde_json::from_value(raw).expect("camelCase fields deserialize");
        assert_eq!(parsed.date_time.as_deref(), Some("2026-01-03T12:00-14:00"));
        assert!(parsed.date_str.is_none());
    }
}
