//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity;
pub mod appointment;
pub mod corrective_action;
pub mod inspection;
pub mod inspection_item;
pub mod notification;
pub mod signoff;
pub mod template;
