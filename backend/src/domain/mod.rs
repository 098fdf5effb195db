//! Domain services for the mood journal.
//!
//! Services hold no mutable state of their own (the calendar focus date
//! aside) and are cheap to clone; persistent state lives behind the
//! storage [`Connection`](crate::storage::Connection) they are built
//! over.

pub mod advice;
pub mod calendar;
pub mod classifier;
pub mod commands;
pub mod insights;
pub mod models;
pub mod mood_service;
pub mod recognition;

pub use advice::AdviceService;
pub use calendar::CalendarService;
pub use classifier::{Classification, ClassifierService, ClassifyError};
pub use insights::InsightsService;
pub use models::mood_record::MoodRecord;
pub use mood_service::MoodService;
pub use recognition::{RecognitionController, RecognitionError, RecognitionSession};
