//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step workflow
//! operations (create with number reservation, complete, reinspection)
//! run inside a single transaction so an inspection and its children are
//! never partially committed.

pub mod activity_repo;
pub mod appointment_repo;
pub mod corrective_action_repo;
pub mod inspection_item_repo;
pub mod inspection_repo;
pub mod notification_repo;
pub mod signoff_repo;
pub mod template_repo;

pub use activity_repo::ActivityRepo;
pub use appointment_repo::AppointmentRepo;
pub use corrective_action_repo::CorrectiveActionRepo;
pub use inspection_item_repo::InspectionItemRepo;
pub use inspection_repo::InspectionRepo;
pub use notification_repo::NotificationRepo;
pub use signoff_repo::SignoffRepo;
pub use template_repo::TemplateRepo;
