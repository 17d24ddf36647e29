use chrono::NaiveDate;

use crate::board::{Board, MovePlan};
use crate::error::DeskError;
use crate::models::{
    Entry, EntryId, EntryStatus, NewEntry, Position, SearchHit, SearchQuery,
};
use crate::service::WaitingListService;

/// What a move ended up writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// New position of the moved entry, when a single write was enough.
    pub position: Option<Position>,
    /// Stored positions were out of order; a renumber is advisable.
    pub degraded: bool,
    /// Headroom ran out and the waiting entries were renumbered.
    pub renumbered: bool,
    /// Position writes sent to the service.
    pub writes: usize,
}

/// Operations front-desk staff perform on the open day's list.
///
/// The board is only replaced after the service confirms a change and the
/// list has been fetched again, so a failed request leaves it untouched.
pub struct FrontDesk<S> {
    service: S,
    board: Option<Board>,
}

impl<S: WaitingListService> FrontDesk<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            board: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Load the list for `date`, creating it first when it does not exist
    /// and `create_if_missing` is set.
    pub async fn open_day(
        &mut self,
        date: NaiveDate,
        create_if_missing: bool,
    ) -> Result<&Board, DeskError> {
        let list = match self.service.get_list(date).await? {
            Some(list) => list,
            None if create_if_missing => {
                tracing::info!("Creating waiting list for {}", date);
                self.service.create_list(date).await?
            }
            None => return Err(DeskError::NoListForDay(date)),
        };
        tracing::debug!("Opened {} with {} entries", date, list.entries.len());
        Ok(&*self.board.insert(Board::new(list)))
    }

    /// Fetch the open day again and rebuild the board.
    pub async fn refresh(&mut self) -> Result<&Board, DeskError> {
        let date = self.board.as_ref().ok_or(DeskError::NoListOpen)?.date();
        let list = self
            .service
            .get_list(date)
            .await?
            .ok_or(DeskError::NoListForDay(date))?;
        Ok(&*self.board.insert(Board::new(list)))
    }

    pub async fn add_entry(&mut self, entry: NewEntry) -> Result<Entry, DeskError> {
        let list_id = self
            .board
            .as_ref()
            .ok_or(DeskError::NoListOpen)?
            .list_id()
            .to_string();
        let entry = entry.normalized().map_err(DeskError::InvalidEntry)?;

        let created = self.service.add_entry(&list_id, &entry).await?;
        tracing::info!(
            "Added {} ({}) at position {}",
            created.puppy_name,
            created.id,
            created.position
        );
        self.refresh().await?;
        Ok(created)
    }

    /// Mark an entry completed. Returns `false` when it already was.
    pub async fn complete(&mut self, id: &EntryId) -> Result<bool, DeskError> {
        let board = self.board.as_ref().ok_or(DeskError::NoListOpen)?;
        let entry = board
            .get(id)
            .ok_or_else(|| DeskError::EntryNotFound(id.clone()))?;
        if entry.status.is_terminal() {
            return Ok(false);
        }

        self.service
            .update_status(id, EntryStatus::Completed)
            .await?;
        tracing::info!("Completed entry {}", id);
        self.refresh().await?;
        Ok(true)
    }

    /// Move a waiting entry to `target_index` among the waiting entries.
    pub async fn move_entry(
        &mut self,
        id: &EntryId,
        target_index: usize,
    ) -> Result<MoveOutcome, DeskError> {
        let plan = self
            .board
            .as_ref()
            .ok_or(DeskError::NoListOpen)?
            .plan_move(id, target_index)?;

        let outcome = match plan {
            MovePlan::Unchanged => {
                tracing::debug!("Entry {} already at slot {}", id, target_index);
                return Ok(MoveOutcome::default());
            }
            MovePlan::Write {
                entry_id,
                position,
                degraded,
            } => {
                self.service.update_position(&entry_id, position).await?;
                tracing::info!(
                    "Moved {} to slot {} (position {})",
                    entry_id,
                    target_index,
                    position
                );
                MoveOutcome {
                    position: Some(position),
                    degraded,
                    renumbered: false,
                    writes: 1,
                }
            }
            MovePlan::Renumber(changes) => {
                let writes = self.persist_positions(&changes).await?;
                tracing::info!("Moved {} to slot {} by renumbering", id, target_index);
                MoveOutcome {
                    position: changes
                        .iter()
                        .find(|(entry_id, _)| entry_id == id)
                        .map(|(_, p)| *p),
                    degraded: false,
                    renumbered: true,
                    writes,
                }
            }
        };

        self.refresh().await?;
        Ok(outcome)
    }

    /// Respace every waiting entry in its current order. Returns the number
    /// of positions written.
    pub async fn renumber(&mut self) -> Result<usize, DeskError> {
        let changes = self
            .board
            .as_ref()
            .ok_or(DeskError::NoListOpen)?
            .renumber_plan()?;
        if changes.is_empty() {
            return Ok(0);
        }
        let writes = self.persist_positions(&changes).await?;
        tracing::info!("Renumbered {} waiting entries", writes);
        self.refresh().await?;
        Ok(writes)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, DeskError> {
        if query.is_empty() {
            return Err(DeskError::EmptyQuery);
        }
        Ok(self.service.search(query).await?)
    }

    /// Write `changes` in the order given. Renumber plans list them in an
    /// order where every prefix keeps the list sorted.
    async fn persist_positions(
        &self,
        changes: &[(EntryId, Position)],
    ) -> Result<usize, DeskError> {
        for (written, (entry_id, position)) in changes.iter().enumerate() {
            if let Err(e) = self.service.update_position(entry_id, *position).await {
                tracing::warn!(
                    "Renumber stopped after {} of {} writes: {}",
                    written,
                    changes.len(),
                    e
                );
                return Err(e.into());
            }
        }
        Ok(changes.len())
    }
}
