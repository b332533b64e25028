//! Activity-trail action constants.
//!
//! Every workflow mutation appends one row to the inspection's activity
//! trail. These constants are the canonical `action` values; the details
//! payload is free-form JSON chosen at the call site.

pub mod actions {
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const STARTED: &str = "started";
    pub const COMPLETED: &str = "completed";
    pub const CANCELED: &str = "canceled";
    pub const ITEM_ADDED: &str = "item_added";
    pub const ITEM_UPDATED: &str = "item_updated";
    pub const ITEM_DELETED: &str = "item_deleted";
    pub const ACTION_CREATED: &str = "corrective_action_created";
    pub const ACTION_UPDATED: &str = "corrective_action_updated";
    pub const ACTION_VERIFIED: &str = "corrective_action_verified";
    pub const SIGNOFF_RECORDED: &str = "signoff_recorded";
    pub const REINSPECTION_CREATED: &str = "reinspection_created";
    pub const REINSPECTION_OF: &str = "reinspection_of";
}
