pub mod admin;
pub mod booking_service;
pub mod scheduler;
pub mod timetable_service;
pub mod weekend;

pub use admin::require_admin;
pub use booking_service::BookingService;
pub use scheduler::CleanupScheduler;
pub use timetable_service::TimetableService;
pub use weekend::{BlockReason, LabRules, Resolution};
