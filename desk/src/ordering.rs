//! Position allocation for reordering waiting entries.
//!
//! A move writes a single new position for the moved entry, chosen between
//! its new neighbours, so no other entry has to be renumbered. Integer
//! headroom between two neighbours runs out eventually; that case is reported
//! as [`OrderingError::Exhausted`] and resolved with [`renumber`].

use crate::error::OrderingError;
use crate::models::{Entry, EntryId, Position};

/// Gap between position values assigned by a full renumber.
/// Leaves room for many midpoint insertions before the next renumber.
pub const POSITION_GAP: i64 = 1000;

/// Result of allocating a position for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Nothing moves; no write should be issued.
    Unchanged,
    /// Strictly between the new neighbours.
    Exact(Position),
    /// The neighbours were not strictly increasing. The value keeps the list
    /// totally ordered but the stored ordering needs a renumber.
    Degraded(Position),
}

impl Placement {
    pub fn position(self) -> Option<Position> {
        match self {
            Placement::Unchanged => None,
            Placement::Exact(p) | Placement::Degraded(p) => Some(p),
        }
    }
}

/// Compute the new position of `moved_id` when it is dropped at
/// `target_index`.
///
/// `active` holds the waiting entries sorted by position ascending.
/// `target_index` counts slots in that sequence with the moved entry taken
/// out, so it ranges over `0..=active.len() - 1`.
pub fn compute_new_position(
    active: &[Entry],
    moved_id: &EntryId,
    target_index: usize,
) -> Result<Placement, OrderingError> {
    let current = active
        .iter()
        .position(|e| &e.id == moved_id)
        .ok_or_else(|| OrderingError::NotFound(moved_id.clone()))?;

    let others: Vec<Position> = active
        .iter()
        .filter(|e| &e.id != moved_id)
        .map(|e| e.position)
        .collect();
    let n = others.len();

    if target_index > n {
        return Err(OrderingError::TargetOutOfRange {
            index: target_index,
            max: n,
        });
    }
    if n == 0 || target_index == current {
        return Ok(Placement::Unchanged);
    }

    if target_index == 0 {
        let first = others[0];
        if first > 0 {
            return Ok(Placement::Exact(first / 2));
        }
        return first
            .checked_sub(1)
            .map(Placement::Exact)
            .ok_or(OrderingError::Exhausted {
                prev: None,
                next: Some(first),
            });
    }

    if target_index == n {
        let last = others[n - 1];
        return last
            .checked_add(1)
            .map(Placement::Exact)
            .ok_or(OrderingError::Exhausted {
                prev: Some(last),
                next: None,
            });
    }

    let prev = others[target_index - 1];
    let next = others[target_index];

    if prev < next {
        // i128 keeps the gap from overflowing when neighbours straddle zero.
        let gap = next as i128 - prev as i128;
        let mid = (prev as i128 + gap / 2) as Position;
        if mid == prev {
            return Err(OrderingError::Exhausted {
                prev: Some(prev),
                next: Some(next),
            });
        }
        return Ok(Placement::Exact(mid));
    }

    tracing::warn!(
        "Positions out of order around slot {} ({} >= {}), stored ordering needs a renumber",
        target_index,
        prev,
        next
    );
    prev.min(next)
        .checked_add(1)
        .map(Placement::Degraded)
        .ok_or(OrderingError::Exhausted {
            prev: Some(prev),
            next: Some(next),
        })
}

/// The active sequence as it should read after the move, without touching
/// any stored position.
pub fn reordered<'a>(
    active: &'a [Entry],
    moved_id: &EntryId,
    target_index: usize,
) -> Result<Vec<&'a Entry>, OrderingError> {
    let moved = active
        .iter()
        .find(|e| &e.id == moved_id)
        .ok_or_else(|| OrderingError::NotFound(moved_id.clone()))?;
    let mut order: Vec<&Entry> = active.iter().filter(|e| &e.id != moved_id).collect();
    if target_index > order.len() {
        return Err(OrderingError::TargetOutOfRange {
            index: target_index,
            max: order.len(),
        });
    }
    order.insert(target_index, moved);
    Ok(order)
}

/// Whether neighbouring positions already sit at least [`POSITION_GAP`] apart.
pub fn is_spaced(active: &[Entry]) -> bool {
    active.windows(2).all(|pair| {
        i128::from(pair[1].position) - i128::from(pair[0].position) >= i128::from(POSITION_GAP)
    })
}

/// Assign evenly spaced positions to `order`, returned in the order they
/// must be written.
///
/// Fresh values start above the highest current position and are written
/// from the last entry back to the first. After any prefix of those writes
/// the written entries sort after every unwritten one, so a write that fails
/// partway leaves entries outside the move in their relative order. When
/// there is no room above, values go below the lowest position instead and
/// are written first to last.
pub fn renumber<'a, I>(order: I) -> Result<Vec<(EntryId, Position)>, OrderingError>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let order: Vec<&Entry> = order.into_iter().collect();
    let positions = order.iter().map(|e| i128::from(e.position));
    let (Some(low), Some(high)) = (positions.clone().min(), positions.max()) else {
        return Ok(Vec::new());
    };
    let count = order.len() as i128;
    let gap = i128::from(POSITION_GAP);

    let above: Option<Vec<Position>> = (1..=count)
        .map(|slot| i64::try_from(high + gap * slot).ok())
        .collect();
    if let Some(fresh) = above {
        return Ok(order
            .iter()
            .zip(fresh)
            .rev()
            .map(|(entry, position)| (entry.id.clone(), position))
            .collect());
    }

    let below: Option<Vec<Position>> = (0..count)
        .map(|slot| i64::try_from(low - gap * (count - slot)).ok())
        .collect();
    match below {
        Some(fresh) => Ok(order
            .iter()
            .zip(fresh)
            .map(|(entry, position)| (entry.id.clone(), position))
            .collect()),
        None => Err(OrderingError::Exhausted {
            prev: None,
            next: None,
        }),
    }
}
