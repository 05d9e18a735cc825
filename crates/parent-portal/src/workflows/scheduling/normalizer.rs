use chrono::NaiveDate;

use super::domain::Lesson;

/// Canonicalize a lesson's date. The document store carries three shapes
/// (`dateStr`, `date`, `dateTime`); the first non-empty field wins, matching
/// the precedence the portal screens have always used. Malformed values
/// yield `None` so callers can filter rather than fail.
pub fn normalized_date(lesson: &Lesson) -> Option<NaiveDate> {
    raw_date(lesson).and_then(parse_flexible_date)
}

fn raw_date(lesson: &Lesson) -> Option<&str> {
    [
        lesson.date_str.as_deref(),
        lesson.date.as_deref(),
        lesson.date_time.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
}

/// Parse a plain `YYYY-MM-DD` string, or the date half of an ISO-style
/// composite: anything after a `T` separator is dropped first.
pub(crate) fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = match trimmed.split_once('T') {
        Some((prefix, _)) => prefix,
        None => trimmed,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson_with(
        date_str: Option<&str>,
        date: Option<&str>,
        date_time: Option<&str>,
    ) -> Lesson {
        Lesson {
            id: 1,
            name: "lesson".to_string(),
            course_id: "SPEC_C001_round001".to_string(),
            date_str: date_str.map(str::to_string),
            date: date.map(str::to_string),
            date_time: date_time.map(str::to_string),
            time_slot: None,
            completed: false,
        }
    }

    #[test]
    fn composite_datetime_is_truncated_at_separator() {
        let lesson = lesson_with(None, None, Some("2025-12-20T12:00-14:00"));
        assert_eq!(
            normalized_date(&lesson),
            NaiveDate::from_ymd_opt(2025, 12, 20)
        );
    }

    #[test]
    fn plain_date_string_parses_as_is() {
        let lesson = lesson_with(Some("2026-01-03"), None, None);
        assert_eq!(normalized_date(&lesson), NaiveDate::from_ymd_opt(2026, 1, 3));
    }

    #[test]
    fn date_str_takes_precedence_over_date_time() {
        let lesson = lesson_with(
            Some("2026-01-03"),
            Some("2026-02-01"),
            Some("2026-03-01T10:00-12:00"),
        );
        assert_eq!(normalized_date(&lesson), NaiveDate::from_ymd_opt(2026, 1, 3));
    }

    #[test]
    fn empty_fields_fall_through_to_the_next_shape() {
        let lesson = lesson_with(Some("  "), None, Some("2026-01-10T12:00-14:00"));
        assert_eq!(
            normalized_date(&lesson),
            NaiveDate::from_ymd_opt(2026, 1, 10)
        );
    }

    #[test]
    fn malformed_date_yields_none_instead_of_error() {
        let lesson = lesson_with(Some("next saturday"), None, None);
        assert_eq!(normalized_date(&lesson), None);
    }

    #[test]
    fn absent_dates_yield_none() {
        let lesson = lesson_with(None, None, None);
        assert_eq!(normalized_date(&lesson), None);
    }
}
