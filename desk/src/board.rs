use chrono::NaiveDate;

use crate::error::{DeskError, OrderingError};
use crate::models::{Entry, EntryId, Position, WaitingList};
use crate::ordering::{self, Placement};

/// Caller-owned snapshot of one day's list, kept in display order:
/// waiting entries by position, then completed entries by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    list_id: String,
    date: NaiveDate,
    entries: Vec<Entry>,
    waiting: usize,
}

/// What a move needs written to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan {
    /// The entry stays where it is; nothing to persist.
    Unchanged,
    /// One position write for the moved entry.
    Write {
        entry_id: EntryId,
        position: Position,
        degraded: bool,
    },
    /// Headroom ran out; every listed entry gets a fresh position.
    Renumber(Vec<(EntryId, Position)>),
}

impl Board {
    pub fn new(list: WaitingList) -> Self {
        let mut entries = list.entries;
        entries.sort_by_key(Entry::display_key);
        let waiting = entries.iter().take_while(|e| e.is_waiting()).count();
        Board {
            list_id: list.id,
            date: list.date,
            entries,
            waiting,
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Waiting entries sorted by position.
    pub fn active(&self) -> &[Entry] {
        &self.entries[..self.waiting]
    }

    pub fn completed(&self) -> &[Entry] {
        &self.entries[self.waiting..]
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Work out the writes for moving `id` to `target_index` among the
    /// waiting entries. Rejects unknown and completed entries before any
    /// position is computed.
    pub fn plan_move(&self, id: &EntryId, target_index: usize) -> Result<MovePlan, DeskError> {
        let entry = self
            .get(id)
            .ok_or_else(|| DeskError::EntryNotFound(id.clone()))?;
        if entry.status.is_terminal() {
            return Err(DeskError::EntryCompleted(id.clone()));
        }

        match ordering::compute_new_position(self.active(), id, target_index) {
            Ok(Placement::Unchanged) => Ok(MovePlan::Unchanged),
            Ok(Placement::Exact(position)) => Ok(MovePlan::Write {
                entry_id: id.clone(),
                position,
                degraded: false,
            }),
            Ok(Placement::Degraded(position)) => Ok(MovePlan::Write {
                entry_id: id.clone(),
                position,
                degraded: true,
            }),
            Err(OrderingError::Exhausted { prev, next }) => {
                tracing::warn!(
                    "No room between {:?} and {:?} on {}, renumbering waiting entries",
                    prev,
                    next,
                    self.date
                );
                let order = ordering::reordered(self.active(), id, target_index)?;
                Ok(MovePlan::Renumber(ordering::renumber(order)?))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fresh evenly spaced positions for the waiting entries in their
    /// current order, in write order. Empty when they are already spaced.
    pub fn renumber_plan(&self) -> Result<Vec<(EntryId, Position)>, DeskError> {
        if ordering::is_spaced(self.active()) {
            return Ok(Vec::new());
        }
        Ok(ordering::renumber(self.active())?)
    }
}
