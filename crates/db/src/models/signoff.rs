//! Inspection signoff models.
//!
//! Signoffs are append-only attestations: there is deliberately no update
//! or delete DTO. A correction is a new signoff.

use cleanops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `inspection_signoffs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionSignoff {
    pub id: DbId,
    pub inspection_id: DbId,
    pub signer_type: String,
    pub signer_name: String,
    pub signer_title: Option<String>,
    pub comments: Option<String>,
    pub signer_user_id: Option<DbId>,
    pub signed_at: Timestamp,
}

/// DTO for recording a signoff on a completed inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSignoff {
    pub signer_type: String,
    #[validate(length(min = 1, message = "signer_name must not be empty"))]
    pub signer_name: String,
    pub signer_title: Option<String>,
    pub comments: Option<String>,
    pub signer_user_id: Option<DbId>,
}
