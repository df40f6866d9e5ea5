//! Tier markers: labeled breaks anchored below a specific player.
//!
//! A marker belongs to the player, not to a slot, so it follows the player
//! through every reorder.

use serde::Serialize;

use crate::column_store::{Change, ColumnStore, IgnoreReason};
use crate::error::BoardError;
use crate::model::{Board, Column, PlayerId};
use crate::store::BackingStore;
use crate::sync::Mutation;

/// A run of consecutive players between two markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    /// 1-based tier number within the column.
    pub number: usize,
    pub players: Vec<PlayerId>,
    /// Label of the marker that closes this tier. `Some("")` is an
    /// unlabeled break, `None` means the column ends without one.
    pub closing_label: Option<String>,
}

/// Split a column into tiers at each marker.
///
/// A marker on the last player still closes the final tier; no empty tier
/// follows it.
#[must_use]
pub fn tiers(board: &Board, column: Column) -> Vec<Tier> {
    let mut out = Vec::new();
    let mut current = Vec::new();

    for player in board.column(column) {
        current.push(player.id);
        if let Some(label) = player.marker() {
            out.push(Tier {
                number: out.len() + 1,
                players: std::mem::take(&mut current),
                closing_label: Some(label.to_string()),
            });
        }
    }

    if !current.is_empty() {
        out.push(Tier {
            number: out.len() + 1,
            players: current,
            closing_label: None,
        });
    }
    out
}

impl<S: BackingStore> ColumnStore<S> {
    /// Put a marker below `id`. An empty label is an unlabeled break; any
    /// text is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the change.
    pub fn add_separator(&mut self, id: PlayerId, label: &str) -> Result<Change, BoardError> {
        let Some(player) = self.board_mut().player_mut(id) else {
            return Ok(Self::ignore(IgnoreReason::UnknownPlayer(id)));
        };
        player.separator_below = true;
        player.separator_label = Some(label.to_string());
        self.submit(&Mutation::SetSeparator {
            id,
            label: Some(label.to_string()),
        })
    }

    /// Clear the marker below `id`, label included.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the change.
    pub fn remove_separator(&mut self, id: PlayerId) -> Result<Change, BoardError> {
        let Some(player) = self.board_mut().player_mut(id) else {
            return Ok(Self::ignore(IgnoreReason::UnknownPlayer(id)));
        };
        player.separator_below = false;
        player.separator_label = None;
        self.submit(&Mutation::SetSeparator { id, label: None })
    }
}
