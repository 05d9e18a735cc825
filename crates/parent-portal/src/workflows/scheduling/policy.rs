use chrono::NaiveDate;

use super::classifier::{classify, EligibilityConfig, LessonStanding};
use super::domain::{MakeupOption, RequestSubmission};

/// Makeup options legally selectable for a lesson in the given standing.
///
/// Short-notice changes are operationally disruptive, so inside the
/// lookahead window only a like-for-like reschedule is permitted; deferral
/// and skipping would forfeit capacity on short notice. Completed and
/// past-due lessons admit no change at all.
pub const fn allowed_options(standing: LessonStanding) -> &'static [MakeupOption] {
    match standing {
        LessonStanding::Completed | LessonStanding::PastDue => &[],
        LessonStanding::WithinWindow => &[MakeupOption::SpecificTime],
        LessonStanding::Normal => &[
            MakeupOption::SpecificTime,
            MakeupOption::NextQuarter,
            MakeupOption::Skip,
        ],
    }
}

/// Rejection raised when a submission breaks the change-option policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("option '{option}' is not permitted for a lesson in '{standing}' standing")]
    PolicyViolation {
        standing: LessonStanding,
        option: MakeupOption,
    },
    #[error("a makeup time slot must be selected for a specific-time request")]
    MissingSlot,
}

/// Validate a leave submission against the policy table at submission time.
///
/// Returns the lesson's standing on success so callers can log or display
/// it without re-classifying.
pub fn validate_submission(
    submission: &RequestSubmission,
    today: NaiveDate,
    config: &EligibilityConfig,
) -> Result<LessonStanding, SubmissionError> {
    let standing = classify(&submission.lesson, today, config);

    if !allowed_options(standing).contains(&submission.makeup_option) {
        return Err(SubmissionError::PolicyViolation {
            standing,
            option: submission.makeup_option,
        });
    }

    if submission.makeup_option == MakeupOption::SpecificTime
        && submission.selected_time_slot.is_none()
    {
        return Err(SubmissionError::MissingSlot);
    }

    Ok(standing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scheduling::domain::{LeaveReason, Lesson};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).expect("valid date")
    }

    fn lesson_days_out(days: i64, completed: bool) -> Lesson {
        Lesson {
            id: 4,
            name: "lesson".to_string(),
            course_id: "SPEC_C001_round001".to_string(),
            date_str: Some((today() + Duration::days(days)).format("%Y-%m-%d").to_string()),
            date: None,
            date_time: None,
            time_slot: Some("SAT 12:00 - 14:00".to_string()),
            completed,
        }
    }

    fn submission(lesson: Lesson, option: MakeupOption) -> RequestSubmission {
        RequestSubmission {
            student_id: "STUDENT_001".to_string(),
            lesson,
            reason: LeaveReason::Illness,
            description: None,
            makeup_option: option,
            selected_time_slot: None,
        }
    }

    #[test]
    fn completed_and_past_due_lessons_have_no_options() {
        assert!(allowed_options(LessonStanding::Completed).is_empty());
        assert!(allowed_options(LessonStanding::PastDue).is_empty());
    }

    #[test]
    fn within_window_only_allows_reschedule() {
        assert_eq!(
            allowed_options(LessonStanding::WithinWindow),
            &[MakeupOption::SpecificTime]
        );
    }

    #[test]
    fn normal_lessons_allow_all_three_options() {
        let options = allowed_options(LessonStanding::Normal);
        assert_eq!(options.len(), 3);
        assert!(options.contains(&MakeupOption::NextQuarter));
        assert!(options.contains(&MakeupOption::Skip));
    }

    #[test]
    fn skip_within_window_is_a_policy_violation() {
        let result = validate_submission(
            &submission(lesson_days_out(3, false), MakeupOption::Skip),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(
            result,
            Err(SubmissionError::PolicyViolation {
                standing: LessonStanding::WithinWindow,
                option: MakeupOption::Skip,
            })
        );
    }

    #[test]
    fn specific_time_without_slot_is_missing_slot() {
        let result = validate_submission(
            &submission(lesson_days_out(3, false), MakeupOption::SpecificTime),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(result, Err(SubmissionError::MissingSlot));
    }

    #[test]
    fn deferral_ten_days_out_passes() {
        let result = validate_submission(
            &submission(lesson_days_out(10, false), MakeupOption::NextQuarter),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(result, Ok(LessonStanding::Normal));
    }

    #[test]
    fn completed_lesson_rejects_every_option() {
        for option in [
            MakeupOption::SpecificTime,
            MakeupOption::NextQuarter,
            MakeupOption::Skip,
        ] {
            let result = validate_submission(
                &submission(lesson_days_out(10, true), option),
                today(),
                &EligibilityConfig::default(),
            );
            assert!(matches!(
                result,
                Err(SubmissionError::PolicyViolation {
                    standing: LessonStanding::Completed,
                    ..
                })
            ));
        }
    }
}
