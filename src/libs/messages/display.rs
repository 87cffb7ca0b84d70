//! Text for every [`Message`] variant.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TRACKING MESSAGES ===
            Message::LoggingStarted(area) => format!("Logging started in '{}'", area),
            Message::LoggingAlreadyActive(area) => format!("Logging is already active in '{}'", area),
            Message::AreaSwitched { from, to } => format!("Switched from '{}' to '{}'", from, to),
            Message::AlreadyInArea(area) => format!("Already in '{}'", area),
            Message::NotLogging => "Logging is not active. Run `arealog start` first.".to_string(),
            Message::LoggingStopped(area) => format!("Logging stopped (last area: '{}')", area),
            Message::IntervalRecorded { area, duration } => format!("Recorded {} in '{}'", duration, area),
            Message::IntervalDropped(area) => format!("Interval in '{}' had no duration and was not recorded", area),
            Message::StatusActive { area, since, elapsed } => {
                format!("Active in '{}' since {} ({})", area, since, elapsed)
            }
            Message::StatusInactive(area) => format!("Not logging. Last area: '{}'", area),
            Message::SessionResumeFailed(reason) => format!("Could not resume the saved session: {}", reason),
            Message::SessionChanged(owner) => format!("The session of '{}' was changed by another arealog process. Nothing was recorded; try again.", owner),

            // === AREA MESSAGES ===
            Message::AreasHeader => "Work areas:".to_string(),
            Message::IdleAreaLabel(label) => format!("Idle label: '{}' (use `idle` to select it)", label),

            // === REPORT MESSAGES ===
            Message::TodayHeader(date) => format!("Log entries for {}", date),
            Message::TotalsHeader { from, to, group_by } => format!("Hours by {} from {} to {}", group_by, from, to),
            Message::DailyHeader { from, to, group_by } => format!("Daily hours by {} from {} to {}", group_by, from, to),
            Message::TimelineHeader { from, to } => format!("Timeline from {} to {}", from, to),
            Message::NoEntriesFound { from, to } => format!("No log entries found from {} to {}", from, to),
            Message::MalformedRowsSkipped(count) => format!("Skipped {} malformed log row(s)", count),
            Message::InvalidDate(input) => format!("Invalid date '{}'. Use today, yesterday or YYYY-MM-DD.", input),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigParseError(err) => format!("Failed to parse configuration: {}", err),
            Message::ConfigInvalidAreas(err) => format!("Invalid area table in configuration: {}", err),
            Message::ConfigAreasKept(count) => format!("Keeping {} configured area(s)", count),
            Message::PromptOwner => "Owner id".to_string(),
            Message::PromptIdleLabel => "Idle area label".to_string(),
            Message::PromptStorageBackend => "Storage backend".to_string(),
            Message::PromptStoragePath => "Storage file path (empty for default)".to_string(),
            Message::PromptKeepDefaultAreas => "Use the default area table?".to_string(),

            // === STORAGE MESSAGES ===
            Message::StorageOpened { backend, path } => format!("Opened {} storage at {}", backend, path),
            Message::DbMigrationApplied { version, name } => format!("Applied migration v{}: {}", version, name),
            Message::DbMigrationFailed { version, error } => format!("Migration v{} failed: {}", version, error),
            Message::DbUpToDate(version) => format!("Database schema is up to date (v{})", version),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export completed: {}", path),
            Message::ExportingAllData => "Exporting entries, totals and daily series...".to_string(),

            // === CLEAR MESSAGES ===
            Message::ConfirmClearOwner(owner) => format!("Delete ALL log entries of '{}'?", owner),
            Message::ConfirmClearAll => "Delete ALL log entries of EVERY owner?".to_string(),
            Message::EntriesDeleted(count) => format!("Deleted {} log entries", count),
            Message::ClearAllRequiresRetestTools => {
                "Deleting every owner's entries requires ENABLE_RETEST_TOOLS=1".to_string()
            }
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
