pub mod corrective_action;
pub mod inspection;
pub mod inspection_item;
pub mod signoff;
