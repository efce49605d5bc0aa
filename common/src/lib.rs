mod domain;

// Workflow field names used when no explicit column configuration is given

pub const ID_FIELD_NAME: &'static str = "id";
pub const STATUS_FIELD_NAME: &'static str = "status";
pub const PUBLISHED_AT_FIELD_NAME: &'static str = "published_at";
pub const PUBLISHED_BY_FIELD_NAME: &'static str = "published_by";

// expose domain module

pub use domain::*;

// expose database module

pub mod database;

pub mod test_utils;
