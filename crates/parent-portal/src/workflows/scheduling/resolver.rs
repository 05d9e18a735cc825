use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use regex::Regex;

use super::course_id::{CourseIdError, CourseIdParts};
use super::domain::{Course, Lesson, MakeupSlot};
use super::repository::CapacityProbe;

/// Scan the catalog for makeup candidates for `target`: not-yet-completed
/// future lessons of sibling courses (same category and round, different
/// course number), sorted ascending by date.
///
/// A malformed target course id is an error, distinct from the valid empty
/// result; the two need different user-facing messages. Catalog entries
/// with malformed ids are skipped, not errored.
pub fn find_makeup_slots(
    target: &Lesson,
    catalog: &[(String, Course)],
    now: NaiveDateTime,
    capacity: &dyn CapacityProbe,
) -> Result<Vec<MakeupSlot>, CourseIdError> {
    let target_parts = CourseIdParts::decompose(&target.course_id)?;
    let today = now.date();
    let minute_of_day = now.hour() * 60 + now.minute();

    let mut slots = Vec::new();
    for (course_id, course) in catalog {
        let parts = match CourseIdParts::decompose(course_id) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!(%course_id, %err, "skipping catalog entry with malformed id");
                continue;
            }
        };
        if !parts.is_sibling_of(&target_parts) {
            continue;
        }

        for lesson in &course.lessons {
            if lesson.completed {
                continue;
            }
            let Some(date) = lesson.normalized_date() else {
                continue;
            };
            if date < today {
                continue;
            }

            let time_label = lesson
                .time_slot
                .as_deref()
                .or(course.time_slot.as_deref());

            if date == today {
                // Same-day substitution is only useful while the session is
                // still running; this is the one place clock time matters.
                let Some(end) = time_label.and_then(slot_end_minutes) else {
                    continue;
                };
                if end <= minute_of_day {
                    continue;
                }
            }

            let mut slot = MakeupSlot {
                id: format!("{course_id}_lesson_{}", lesson.id),
                course_id: course_id.clone(),
                lesson_id: lesson.id,
                lesson_name: lesson.name.clone(),
                date,
                date_display: localized_date(date),
                day: weekday_label(date).to_string(),
                time: time_label.unwrap_or_default().to_string(),
                available: true,
            };
            slot.available = capacity.is_available(&slot);
            slots.push(slot);
        }
    }

    // Stable sort: equal dates keep catalog encounter order.
    slots.sort_by_key(|slot| slot.date);
    Ok(slots)
}

/// End of a `HH:MM - HH:MM` range, in minutes since midnight. The label may
/// carry a weekday prefix ("SAT 12:00 - 14:00").
fn slot_end_minutes(label: &str) -> Option<u32> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})").expect("valid time range pattern")
    });

    let captures = pattern.captures(label)?;
    let hours: u32 = captures[3].parse().ok()?;
    let minutes: u32 = captures[4].parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

fn localized_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "周一",
        Weekday::Tue => "周二",
        Weekday::Wed => "周三",
        Weekday::Thu => "周四",
        Weekday::Fri => "周五",
        Weekday::Sat => "周六",
        Weekday::Sun => "周日",
    }
}
