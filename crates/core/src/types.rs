//! Primitive aliases shared by every crate in the workspace.

/// Primary keys are PostgreSQL BIGSERIAL values.
pub type DbId = i64;

/// Timestamps are always UTC; conversion to local time is a display concern.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
