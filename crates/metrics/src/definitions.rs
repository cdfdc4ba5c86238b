//! Metric name and label definitions.
//!
//! Every metric emitted by tempvoice is named here so the full set is
//! documented in one place.

/// Temporary room lifecycle metrics
pub mod rooms {
    /// Rooms created after a member entered the lobby
    pub const CREATED_TOTAL: &str = "tempvoice_rooms_created_total";
    /// Room creation failures
    pub const CREATE_ERRORS_TOTAL: &str = "tempvoice_rooms_create_errors_total";
    /// Rooms deleted after emptying
    pub const DELETED_TOTAL: &str = "tempvoice_rooms_deleted_total";
    /// Room deletions the platform rejected (record dropped anyway)
    pub const DELETE_ERRORS_TOTAL: &str = "tempvoice_rooms_delete_errors_total";
    /// Rooms currently tracked in the registry
    pub const TRACKED: &str = "tempvoice_rooms_tracked";
}

/// Access control metrics
pub mod access {
    /// Joins refused, labelled by `reason` (locked, rejected)
    pub const DENIALS_TOTAL: &str = "tempvoice_access_denials_total";
}

/// Chat command metrics
pub mod commands {
    /// Commands executed, labelled by `command`
    pub const EXECUTED_TOTAL: &str = "tempvoice_commands_executed_total";
    /// Commands refused by a precondition (not in voice, not a room, not the owner)
    pub const REFUSED_TOTAL: &str = "tempvoice_commands_refused_total";
    /// Command handlers that failed on a platform call
    pub const FAILED_TOTAL: &str = "tempvoice_commands_failed_total";
}

/// Common label keys
pub mod labels {
    pub const REASON: &str = "reason";
    pub const COMMAND: &str = "command";
}
