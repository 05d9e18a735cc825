use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::Lesson;

/// Policy knobs for the leave-request flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Inclusive horizon, in days from today, inside which only a
    /// like-for-like reschedule is permitted.
    pub lookahead_days: u32,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self { lookahead_days: 7 }
    }
}

/// A lesson's standing relative to today and the lookahead window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStanding {
    Completed,
    PastDue,
    WithinWindow,
    Normal,
}

impl LessonStanding {
    pub const fn label(self) -> &'static str {
        match self {
            LessonStanding::Completed => "completed",
            LessonStanding::PastDue => "past_due",
            LessonStanding::WithinWindow => "within_window",
            LessonStanding::Normal => "normal",
        }
    }
}

impl fmt::Display for LessonStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a lesson for the leave-request flow.
///
/// Comparisons are date-only; the same-day end-of-lesson cutoff is the
/// resolver's concern. Both window boundaries are inclusive: a lesson
/// exactly `lookahead_days` out is still `WithinWindow`. A lesson whose
/// date cannot be normalized classifies as `PastDue` so that no change
/// option is ever offered for it.
pub fn classify(lesson: &Lesson, today: NaiveDate, config: &EligibilityConfig) -> LessonStanding {
    if lesson.completed {
        return LessonStanding::Completed;
    }

    let Some(lesson_date) = lesson.normalized_date() else {
        return LessonStanding::PastDue;
    };

    if lesson_date < today {
        LessonStanding::PastDue
    } else if lesson_date <= today + Duration::days(i64::from(config.lookahead_days)) {
        LessonStanding::WithinWindow
    } else {
        LessonStanding::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson_on(date: &str, completed: bool) -> Lesson {
        Lesson {
            id: 1,
            name: "lesson".to_string(),
            course_id: "SPEC_C001_round001".to_string(),
            date_str: Some(date.to_string()),
            date: None,
            date_time: None,
            time_slot: None,
            completed,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).expect("valid date")
    }

    #[test]
    fn completed_wins_over_every_date() {
        let config = EligibilityConfig::default();
        for date in ["2025-01-01", "2025-12-15", "2026-06-01"] {
            assert_eq!(
                classify(&lesson_on(date, true), today(), &config),
                LessonStanding::Completed
            );
        }
    }

    #[test]
    fn yesterday_is_past_due() {
        let standing = classify(
            &lesson_on("2025-12-14", false),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(standing, LessonStanding::PastDue);
    }

    #[test]
    fn today_is_within_window() {
        let standing = classify(
            &lesson_on("2025-12-15", false),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(standing, LessonStanding::WithinWindow);
    }

    #[test]
    fn window_boundary_is_inclusive_at_seven_days() {
        let standing = classify(
            &lesson_on("2025-12-22", false),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(standing, LessonStanding::WithinWindow);
    }

    #[test]
    fn eighth_day_is_normal() {
        let standing = classify(
            &lesson_on("2025-12-23", false),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(standing, LessonStanding::Normal);
    }

    #[test]
    fn unparseable_date_fails_closed_as_past_due() {
        let standing = classify(
            &lesson_on("someday", false),
            today(),
            &EligibilityConfig::default(),
        );
        assert_eq!(standing, LessonStanding::PastDue);
    }
}
