use std::fmt::Display;

use chrono::TimeZone;

use crate::board::Board;
use crate::models::{Entry, SearchHit};

/// One line per entry in display order. Waiting entries are numbered by
/// their slot (the index `move` expects); completed ones are marked instead.
pub fn board_lines<Tz>(board: &Board, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![format!(
        "{} waiting list: {} waiting, {} completed",
        board.date(),
        board.active().len(),
        board.completed().len()
    )];
    for (slot, entry) in board.active().iter().enumerate() {
        lines.push(entry_line(&format!("{:>3}", slot), entry, tz));
    }
    for entry in board.completed() {
        lines.push(entry_line("  ✓", entry, tz));
    }
    lines
}

pub fn hit_line<Tz>(hit: &SearchHit, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entry_line(&hit.date.to_string(), &hit.entry, tz)
}

fn entry_line<Tz>(marker: &str, entry: &Entry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}  {:<12} {:<16} {:<16} arrived {}  [{}]",
        marker,
        entry.puppy_name,
        entry.owner_name,
        entry.service,
        entry.arrival_time.with_timezone(tz).format("%H:%M"),
        entry.id
    )
}
