use ic_canister_log::{declare_log_buffer, export, LogEntry};

// High-priority messages.
declare_log_buffer!(name = INFO, capacity = 1000);

// Low-priority info messages.
declare_log_buffer!(name = DEBUG, capacity = 1000);

/// Messages of both buffers, oldest first, formatted as `[file:line] message`.
pub fn collect_logs() -> Vec<String> {
    let mut entries: Vec<LogEntry> = export(&INFO);
    entries.extend(export(&DEBUG));
    entries.sort_by_key(|entry| entry.timestamp);
    entries
        .into_iter()
        .map(|entry| format!("[{}:{}] {}", entry.file, entry.line, entry.message))
        .collect()
}
