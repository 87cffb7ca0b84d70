//! User-facing message catalogue.
//!
//! Every line the CLI prints goes through a [`Message`] variant so the wording
//! lives in one place ([`display`](super::display)) and commands only pick the
//! variant and its parameters.

#[derive(Debug, Clone)]
pub enum Message {
    // === TRACKING MESSAGES ===
    LoggingStarted(String),           // area
    LoggingAlreadyActive(String),     // area
    AreaSwitched { from: String, to: String },
    AlreadyInArea(String),            // area
    NotLogging,
    LoggingStopped(String),           // area
    IntervalRecorded { area: String, duration: String },
    IntervalDropped(String),          // area
    StatusActive { area: String, since: String, elapsed: String },
    StatusInactive(String),           // last area
    SessionResumeFailed(String),      // reason
    SessionChanged(String),           // owner

    // === AREA MESSAGES ===
    AreasHeader,
    IdleAreaLabel(String),

    // === REPORT MESSAGES ===
    TodayHeader(String),              // date
    TotalsHeader { from: String, to: String, group_by: String },
    DailyHeader { from: String, to: String, group_by: String },
    TimelineHeader { from: String, to: String },
    NoEntriesFound { from: String, to: String },
    MalformedRowsSkipped(usize),
    InvalidDate(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError(String),
    ConfigInvalidAreas(String),
    ConfigAreasKept(usize),
    PromptOwner,
    PromptIdleLabel,
    PromptStorageBackend,
    PromptStoragePath,
    PromptKeepDefaultAreas,

    // === STORAGE MESSAGES ===
    StorageOpened { backend: String, path: String },
    DbMigrationApplied { version: u32, name: String },
    DbMigrationFailed { version: u32, error: String },
    DbUpToDate(u32),

    // === EXPORT MESSAGES ===
    ExportCompleted(String),          // path
    ExportingAllData,

    // === CLEAR MESSAGES ===
    ConfirmClearOwner(String),        // owner
    ConfirmClearAll,
    EntriesDeleted(usize),
    ClearAllRequiresRetestTools,
    OperationCancelled,
}
