//! Lesson leave-request scheduling.
//!
//! The modules here form the decision core of the portal: canonicalizing the
//! document store's assorted date shapes, classifying a lesson's standing
//! relative to the 7-day lookahead window, deciding which makeup options are
//! legal, and scanning the course catalog for sibling-course slots a skipped
//! lesson can be made up in. The engine is pure given its inputs; all I/O
//! lives behind [`PortalRepository`].

pub mod aggregator;
pub mod classifier;
pub mod course_id;
pub mod domain;
pub mod normalizer;
pub mod policy;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod views;

pub use classifier::{classify, EligibilityConfig, LessonStanding};
pub use course_id::{CourseIdError, CourseIdParts};
pub use domain::{
    ChangeRequest, Course, LeaveReason, Lesson, LessonSnapshot, MakeupOption, MakeupSlot,
    RequestId, RequestStatus, RequestSubmission,
};
pub use normalizer::normalized_date;
pub use policy::{allowed_options, validate_submission, SubmissionError};
pub use repository::{CapacityProbe, PortalRepository, RepositoryError, UnlimitedCapacity};
pub use resolver::find_makeup_slots;
pub use router::scheduling_router;
pub use service::{LeaveRequestService, LeaveServiceError};
pub use views::{
    CourseProgress, LessonEvaluation, LessonOutlook, LessonScheduleEntry, RequestHistoryEntry,
    ScheduleOverview,
};
