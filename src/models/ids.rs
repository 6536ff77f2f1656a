//! Store-assigned integer identifiers.

/// Player identifier
pub type PlayerId = i64;

/// Match record identifier
pub type MatchRecordId = i64;
