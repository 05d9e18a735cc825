use chrono::{Duration, NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;
use parent_portal::workflows::scheduling::{
    ChangeRequest, Course, Lesson, PortalRepository, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) const DEMO_STUDENT_ID: &str = "STUDENT_001";
pub(crate) const DEMO_COURSE_ID: &str = "SPEC_C001_round001";

#[derive(Default, Clone)]
pub(crate) struct InMemoryPortalRepository {
    enrollment: Arc<Mutex<HashMap<String, Vec<Lesson>>>>,
    catalog: Arc<Mutex<Vec<(String, Course)>>>,
    requests: Arc<Mutex<Vec<ChangeRequest>>>,
}

impl InMemoryPortalRepository {
    /// Repository pre-loaded with one enrolled student and a small course
    /// catalog. Lesson dates are laid out weekly around `base` so the
    /// schedule always shows attended, imminent, and future sessions no
    /// matter when the process starts.
    pub(crate) fn seeded(base: NaiveDate) -> Self {
        let lessons = demo_enrollment(base);
        let mut enrollment = HashMap::new();
        enrollment.insert(DEMO_STUDENT_ID.to_string(), lessons.clone());

        let catalog = vec![
            (
                DEMO_COURSE_ID.to_string(),
                Course {
                    lessons,
                    time_slot: Some("SAT 12:00 - 14:00".to_string()),
                },
            ),
            (
                "SPEC_C002_round001".to_string(),
                Course {
                    lessons: sibling_lessons(base),
                    time_slot: Some("SUN 10:00 - 12:00".to_string()),
                },
            ),
            // Same course number, later round; never a makeup candidate.
            (
                "SPEC_C001_round002".to_string(),
                Course {
                    lessons: vec![lesson_on(
                        1,
                        "SPEC_C001_round002",
                        "下一轮第1课",
                        base + Duration::days(90),
                        false,
                    )],
                    time_slot: Some("MON 16:00 - 18:00".to_string()),
                },
            ),
        ];

        Self {
            enrollment: Arc::new(Mutex::new(enrollment)),
            catalog: Arc::new(Mutex::new(catalog)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl PortalRepository for InMemoryPortalRepository {
    fn enrollment(&self, student_id: &str) -> Result<Vec<Lesson>, RepositoryError> {
        let guard = self.enrollment.lock().expect("enrollment mutex poisoned");
        guard
            .get(student_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn course_catalog(&self) -> Result<Vec<(String, Course)>, RepositoryError> {
        let guard = self.catalog.lock().expect("catalog mutex poisoned");
        Ok(guard.clone())
    }

    fn requests_for(&self, student_id: &str) -> Result<Vec<ChangeRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("request mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| request.student_id == student_id)
            .cloned()
            .collect())
    }

    fn insert_request(&self, request: ChangeRequest) -> Result<ChangeRequest, RepositoryError> {
        let mut guard = self.requests.lock().expect("request mutex poisoned");
        if guard.iter().any(|existing| existing.id == request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(request.clone());
        Ok(request)
    }
}

const LESSON_TOPICS: [&str; 12] = [
    "自然拼读入门",
    "绘本共读",
    "字母与发音",
    "日常对话",
    "数字与颜色",
    "家庭成员",
    "动物朋友",
    "四季与天气",
    "食物与餐桌",
    "我的一天",
    "节日故事",
    "学期汇报",
];

/// Twelve weekly lessons for the demo student. The first two land before
/// `base` and are marked attended, the third falls inside the reschedule
/// window, and the rest stretch into the future.
fn demo_enrollment(base: NaiveDate) -> Vec<Lesson> {
    LESSON_TOPICS
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let offset_weeks = index as i64 - 2;
            let date = base + Duration::weeks(offset_weeks);
            lesson_on(
                index as u32 + 1,
                DEMO_COURSE_ID,
                &format!("第{}课 {topic}", index + 1),
                date,
                offset_weeks < 0,
            )
        })
        .collect()
}

/// The parallel class running one day after each target session. Mirrors
/// the target course's cadence so makeup resolution always finds slots.
fn sibling_lessons(base: NaiveDate) -> Vec<Lesson> {
    LESSON_TOPICS
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let offset_weeks = index as i64 - 2;
            let date = base + Duration::weeks(offset_weeks) + Duration::days(1);
            lesson_on(
                index as u32 + 1,
                "SPEC_C002_round001",
                &format!("第{}课 {topic}", index + 1),
                date,
                offset_weeks < 0,
            )
        })
        .collect()
}

fn lesson_on(id: u32, course_id: &str, name: &str, date: NaiveDate, completed: bool) -> Lesson {
    Lesson {
        id,
        name: name.to_string(),
        course_id: course_id.to_string(),
        date_str: None,
        date: None,
        date_time: Some(format!("{}T12:00-14:00", date.format("%Y-%m-%d"))),
        time_slot: None,
        completed,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).expect("valid date")
    }

    #[test]
    fn seeded_enrollment_has_attended_and_future_lessons() {
        let repository = InMemoryPortalRepository::seeded(base());
        let lessons = repository
            .enrollment(DEMO_STUDENT_ID)
            .expect("demo student enrolled");

        assert_eq!(lessons.len(), 12);
        assert_eq!(lessons.iter().filter(|lesson| lesson.completed).count(), 2);
        assert!(lessons
            .iter()
            .any(|lesson| lesson.normalized_date() == Some(base())));
    }

    #[test]
    fn unknown_student_is_not_found() {
        let repository = InMemoryPortalRepository::seeded(base());
        assert!(matches!(
            repository.enrollment("STUDENT_999"),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn catalog_contains_target_sibling_and_other_round() {
        let repository = InMemoryPortalRepository::seeded(base());
        let catalog = repository.course_catalog().expect("catalog loads");
        let ids: Vec<_> = catalog.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "SPEC_C001_round001",
                "SPEC_C002_round001",
                "SPEC_C001_round002",
            ]
        );
    }

    #[test]
    fn datetime_parser_accepts_both_precisions() {
        assert!(parse_datetime("2025-12-15T12:00:00").is_ok());
        assert!(parse_datetime("2025-12-15T12:00").is_ok());
        assert!(parse_datetime("2025-12-15").is_err());
    }
}
