/// All primary keys are opaque text identifiers.
///
/// Task and edge ids are minted by the canvas editor; the server mints
/// UUID v4 strings when it creates rows itself.
pub type DbId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
