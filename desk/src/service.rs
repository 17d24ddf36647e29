use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::models::{
    Entry, EntryId, EntryStatus, NewEntry, Position, SearchHit, SearchQuery, WaitingList,
};

/// The remote service that owns waiting lists and entries.
///
/// Implementations must make `update_position` idempotent: sending the same
/// `(entry_id, position)` twice leaves the same state as sending it once.
#[allow(async_fn_in_trait)]
pub trait WaitingListService {
    async fn create_list(&self, date: NaiveDate) -> Result<WaitingList, ServiceError>;

    /// `None` when no list was created for that day.
    async fn get_list(&self, date: NaiveDate) -> Result<Option<WaitingList>, ServiceError>;

    async fn add_entry(&self, list_id: &str, entry: &NewEntry) -> Result<Entry, ServiceError>;

    async fn update_status(
        &self,
        entry_id: &EntryId,
        status: EntryStatus,
    ) -> Result<Entry, ServiceError>;

    async fn update_position(
        &self,
        entry_id: &EntryId,
        position: Position,
    ) -> Result<(), ServiceError>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, ServiceError>;
}
