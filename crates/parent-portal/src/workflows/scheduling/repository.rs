use super::domain::{ChangeRequest, Course, Lesson, MakeupSlot};

/// Persistence abstraction over the document store so the engine can be
/// exercised in isolation. All network fetches happen behind this trait
/// before the pure computation runs.
pub trait PortalRepository: Send + Sync {
    /// The student's enrolled lessons.
    fn enrollment(&self, student_id: &str) -> Result<Vec<Lesson>, RepositoryError>;

    /// The full course catalog, in a deterministic order; resolver output
    /// ties on equal dates keep this encounter order.
    fn course_catalog(&self) -> Result<Vec<(String, Course)>, RepositoryError>;

    /// Leave requests previously submitted for the student.
    fn requests_for(&self, student_id: &str) -> Result<Vec<ChangeRequest>, RepositoryError>;

    /// Persist a validated request, returning the stored record.
    fn insert_request(&self, request: ChangeRequest) -> Result<ChangeRequest, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Seam for a future capacity/double-booking check on makeup slots.
pub trait CapacityProbe: Send + Sync {
    fn is_available(&self, slot: &MakeupSlot) -> bool;
}

/// Current product behavior: every discovered slot is offered. Capacity
/// accounting against other enrollments is a known simplification.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedCapacity;

impl CapacityProbe for UnlimitedCapacity {
    fn is_available(&self, _slot: &MakeupSlot) -> bool {
        true
    }
}
