use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use super::aggregator;
use super::classifier::{classify, EligibilityConfig};
use super::domain::{
    ChangeRequest, Lesson, LessonSnapshot, MakeupSlot, RequestId, RequestStatus, RequestSubmission,
};
use super::policy::{allowed_options, validate_submission, SubmissionError};
use super::repository::{CapacityProbe, PortalRepository, RepositoryError};
use super::resolver::find_makeup_slots;
use super::views::{
    CourseProgress, LessonEvaluation, LessonOutlook, LessonScheduleEntry, RequestHistoryEntry,
    ScheduleOverview,
};
use crate::workflows::scheduling::course_id::CourseIdError;

/// Facade composing the classifier, policy, resolver, and aggregator over a
/// repository. Stateless apart from the request id sequence; every call
/// recomputes from freshly fetched data.
pub struct LeaveRequestService<R, C> {
    repository: Arc<R>,
    capacity: Arc<C>,
    config: EligibilityConfig,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

impl<R, C> LeaveRequestService<R, C>
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    pub fn new(repository: Arc<R>, capacity: Arc<C>, config: EligibilityConfig) -> Self {
        Self {
            repository,
            capacity,
            config,
        }
    }

    /// Read-only evaluation used to render available actions for a lesson.
    pub fn evaluate_lesson(&self, lesson: &Lesson, today: NaiveDate) -> LessonEvaluation {
        let standing = classify(lesson, today, &self.config);
        LessonEvaluation {
            standing,
            allowed_options: allowed_options(standing).to_vec(),
        }
    }

    /// Resolve makeup candidates for a lesson against the current catalog.
    /// The catalog is fetched per call; there is no shared cache.
    pub fn resolve_makeup_slots(
        &self,
        lesson: &Lesson,
        now: NaiveDateTime,
    ) -> Result<Vec<MakeupSlot>, LeaveServiceError> {
        let catalog = self.repository.course_catalog()?;
        Ok(find_makeup_slots(
            lesson,
            &catalog,
            now,
            self.capacity.as_ref(),
        )?)
    }

    /// Validate and persist a new leave request. The stored record snapshots
    /// the lesson's identity and date; review transitions happen elsewhere.
    pub fn submit(
        &self,
        submission: RequestSubmission,
        now: NaiveDateTime,
    ) -> Result<ChangeRequest, LeaveServiceError> {
        let standing = validate_submission(&submission, now.date(), &self.config)?;
        tracing::info!(
            student_id = %submission.student_id,
            lesson_id = submission.lesson.id,
            course_id = %submission.lesson.course_id,
            %standing,
            option = %submission.makeup_option,
            "accepting leave request"
        );

        let request = ChangeRequest {
            id: next_request_id(),
            student_id: submission.student_id,
            lesson: LessonSnapshot::of(&submission.lesson),
            reason: submission.reason,
            description: submission.description,
            makeup_option: submission.makeup_option,
            selected_time_slot: submission.selected_time_slot,
            submitted_at: now,
            status: RequestStatus::Pending,
            review_time: None,
            review_note: None,
        };

        Ok(self.repository.insert_request(request)?)
    }

    /// Request history for the student, newest first.
    pub fn request_history(
        &self,
        student_id: &str,
    ) -> Result<Vec<RequestHistoryEntry>, LeaveServiceError> {
        let mut requests = self.repository.requests_for(student_id)?;
        requests.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(requests.iter().map(RequestHistoryEntry::of).collect())
    }

    /// The full schedule screen for one student: every lesson annotated with
    /// standing, outlook, permitted options, and request badges, plus the
    /// within-window upcoming list and course progress counters.
    pub fn schedule_overview(
        &self,
        student_id: &str,
        now: NaiveDateTime,
    ) -> Result<ScheduleOverview, LeaveServiceError> {
        let today = now.date();
        let lessons = self.repository.enrollment(student_id)?;
        let requests = self.repository.requests_for(student_id)?;

        let entries: Vec<LessonScheduleEntry> = lessons
            .iter()
            .map(|lesson| {
                let standing = classify(lesson, today, &self.config);
                LessonScheduleEntry {
                    lesson: lesson.clone(),
                    standing,
                    outlook: LessonOutlook::of(lesson, today),
                    allowed_options: allowed_options(standing).to_vec(),
                    actionable: !lesson.completed
                        && !aggregator::has_any_request(lesson, &requests),
                    request_status: aggregator::request_status_for(lesson, &requests),
                }
            })
            .collect();

        let upcoming = entries
            .iter()
            .filter(|entry| {
                entry.standing == super::classifier::LessonStanding::WithinWindow
                    && aggregator::approved_request_for(&entry.lesson, &requests).is_none()
            })
            .cloned()
            .collect();

        Ok(ScheduleOverview {
            student_id: student_id.to_string(),
            today,
            progress: CourseProgress::of(&lessons),
            upcoming,
            lessons: entries,
        })
    }
}

/// Error raised by the leave-request facade.
#[derive(Debug, thiserror::Error)]
pub enum LeaveServiceError {
    #[error(transparent)]
    Policy(#[from] SubmissionError),
    #[error(transparent)]
    CourseId(#[from] CourseIdError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
