pub mod delete;
pub mod history;
pub mod show;
pub mod submit;

use colored::Colorize;
use quill_core::entry::{EntryId, EntryStatus, HistoryEntry};

pub(crate) fn parse_id(value: i64) -> anyhow::Result<EntryId> {
    Ok(EntryId::new(value)?)
}

pub(crate) fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No entries yet.".dimmed());
        return;
    }

    for entry in entries {
        let status = match entry.status {
            EntryStatus::Completed => entry.status.to_string().green(),
            EntryStatus::Error => entry.status.to_string().red(),
            EntryStatus::Pending => entry.status.to_string().yellow(),
        };
        println!(
            "{:>5}  {:<8} {:<10} {}  {}",
            format!("#{}", entry.id).bold(),
            entry.kind.to_string(),
            status,
            entry.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            entry.preview
        );
    }
}
