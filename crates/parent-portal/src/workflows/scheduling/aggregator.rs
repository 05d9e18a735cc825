use super::domain::{ChangeRequest, Lesson, RequestStatus};

/// Lessons a parent can still open a request for: not completed and not
/// already referenced by any submitted request, whatever its status.
pub fn actionable_lessons(lessons: &[Lesson], requests: &[ChangeRequest]) -> Vec<Lesson> {
    lessons
        .iter()
        .filter(|lesson| !lesson.completed && !has_any_request(lesson, requests))
        .cloned()
        .collect()
}

/// Whether any submitted request references the lesson.
pub fn has_any_request(lesson: &Lesson, requests: &[ChangeRequest]) -> bool {
    requests.iter().any(|request| request.references(lesson))
}

/// Status badge for a lesson's request, for display only; never a policy
/// input. An approved request outranks a pending one when both exist.
pub fn request_status_for(lesson: &Lesson, requests: &[ChangeRequest]) -> Option<RequestStatus> {
    let mut badge = None;
    for request in requests.iter().filter(|request| request.references(lesson)) {
        match request.status {
            RequestStatus::Approved => return Some(RequestStatus::Approved),
            RequestStatus::Pending => badge = Some(RequestStatus::Pending),
            other if badge.is_none() => badge = Some(other),
            _ => {}
        }
    }
    badge
}

/// The approved leave request for a lesson, if one exists. The portal uses
/// this to render the replacement time on the schedule.
pub fn approved_request_for<'a>(
    lesson: &Lesson,
    requests: &'a [ChangeRequest],
) -> Option<&'a ChangeRequest> {
    requests
        .iter()
        .find(|request| request.references(lesson) && request.status == RequestStatus::Approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scheduling::domain::{
        LeaveReason, LessonSnapshot, MakeupOption, RequestId,
    };
    use chrono::NaiveDate;

    fn lesson(id: u32, course_id: &str, completed: bool) -> Lesson {
        Lesson {
            id,
            name: format!("lesson {id}"),
            course_id: course_id.to_string(),
            date_str: Some("2026-01-10".to_string()),
            date: None,
            date_time: None,
            time_slot: None,
            completed,
        }
    }

    fn request(id: &str, lesson: &Lesson, status: RequestStatus) -> ChangeRequest {
        ChangeRequest {
            id: RequestId(id.to_string()),
            student_id: "STUDENT_001".to_string(),
            lesson: LessonSnapshot::of(lesson),
            reason: LeaveReason::Family,
            description: None,
            makeup_option: MakeupOption::NextQuarter,
            selected_time_slot: None,
            submitted_at: NaiveDate::from_ymd_opt(2025, 12, 20)
                .expect("valid date")
                .and_hms_opt(18, 0, 0)
                .expect("valid time"),
            status,
            review_time: None,
            review_note: None,
        }
    }

    #[test]
    fn completed_and_requested_lessons_are_not_actionable() {
        let lessons = vec![
            lesson(1, "SPEC_C001_round001", true),
            lesson(2, "SPEC_C001_round001", false),
            lesson(3, "SPEC_C001_round001", false),
        ];
        let requests = vec![request("req-000001", &lessons[1], RequestStatus::Rejected)];

        let actionable = actionable_lessons(&lessons, &requests);
        assert_eq!(actionable.len(), 1);
        assert_eq!(actionable[0].id, 3);
    }

    #[test]
    fn colliding_lesson_ids_across_courses_do_not_cross_match() {
        let enrolled = lesson(3, "SPEC_C001_round001", false);
        let other_course_same_id = lesson(3, "SPEC_C002_round001", false);
        let requests = vec![request("req-000001", &other_course_same_id, RequestStatus::Pending)];

        assert!(!has_any_request(&enrolled, &requests));
        assert_eq!(actionable_lessons(&[enrolled], &requests).len(), 1);
    }

    #[test]
    fn approved_badge_outranks_pending() {
        let target = lesson(5, "SPEC_C001_round001", false);
        let requests = vec![
            request("req-000001", &target, RequestStatus::Pending),
            request("req-000002", &target, RequestStatus::Approved),
        ];

        assert_eq!(
            request_status_for(&target, &requests),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            approved_request_for(&target, &requests).map(|r| r.id.0.as_str()),
            Some("req-000002")
        );
    }

    #[test]
    fn no_request_means_no_badge() {
        let target = lesson(5, "SPEC_C001_round001", false);
        assert_eq!(request_status_for(&target, &[]), None);
        assert!(approved_request_for(&target, &[]).is_none());
    }
}
