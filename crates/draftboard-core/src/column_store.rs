//! Column store: owns the board snapshot and applies user intents to it.
//!
//! Intents are applied optimistically to the local board, submitted through
//! the [`OrderSynchronizer`], and the board is then replaced by a fresh
//! snapshot from the store.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::BoardError;
use crate::model::{Board, Column, PlayerId};
use crate::store::{BackingStore, StoreError};
use crate::sync::{LoadOutcome, LoadTicket, Mutation, OrderSynchronizer, StaleReloadPolicy};

/// Why an intent was dropped without contacting the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownPlayer(PlayerId),
    NotInColumn { id: PlayerId, column: Column },
    AtTop,
    AtBottom,
    AlreadyInColumn(Column),
    CrossColumnDrop { from: Column, to: Column },
    DragCancelled,
    NoActiveDrag,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlayer(id) => write!(f, "player {id} is not on the board"),
            Self::NotInColumn { id, column } => write!(f, "player {id} is not in column {column}"),
            Self::AtTop => f.write_str("already at the top of the column"),
            Self::AtBottom => f.write_str("already at the bottom of the column"),
            Self::AlreadyInColumn(column) => write!(f, "already displayed in column {column}"),
            Self::CrossColumnDrop { from, to } => {
                write!(f, "cannot drop a {from} player into column {to}")
            }
            Self::DragCancelled => f.write_str("drag cancelled"),
            Self::NoActiveDrag => f.write_str("no drag in progress"),
        }
    }
}

/// Result of applying an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Submitted to the store and followed by a reload.
    Synced(LoadOutcome),
    /// Expected gesture outcome; nothing was sent.
    Ignored(IgnoreReason),
}

impl Change {
    #[must_use]
    pub const fn is_synced(self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Owns the in-memory board and the synchronizer that keeps it honest.
#[derive(Debug)]
pub struct ColumnStore<S> {
    board: Board,
    sync: OrderSynchronizer<S>,
}

impl<S: BackingStore> ColumnStore<S> {
    /// Empty store; call [`Self::load`] before use.
    #[must_use]
    pub fn new(store: S, policy: StaleReloadPolicy) -> Self {
        Self {
            board: Board::default(),
            sync: OrderSynchronizer::new(store, policy),
        }
    }

    /// Create and load in one step.
    ///
    /// # Errors
    ///
    /// Returns the load error if the first fetch fails.
    pub fn open(store: S, policy: StaleReloadPolicy) -> Result<Self, BoardError> {
        let mut column_store = Self::new(store, policy);
        column_store.load()?;
        Ok(column_store)
    }

    /// Read-only view of the current snapshot.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &OrderSynchronizer<S> {
        &self.sync
    }

    pub const fn store_mut(&mut self) -> &mut S {
        self.sync.store_mut()
    }

    /// Replace the board with a fresh snapshot. On failure the previous
    /// board stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Load`] or [`BoardError::Inconsistent`].
    pub fn load(&mut self) -> Result<LoadOutcome, BoardError> {
        self.sync.reload(&mut self.board)
    }

    /// Start a load whose fetch is driven by the caller.
    pub const fn begin_load(&mut self) -> LoadTicket {
        self.sync.begin_load()
    }

    /// Apply the result of a caller-driven fetch.
    ///
    /// # Errors
    ///
    /// See [`OrderSynchronizer::complete_load`].
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Board, StoreError>,
    ) -> Result<LoadOutcome, BoardError> {
        self.sync.complete_load(ticket, fetched, &mut self.board)
    }

    pub(crate) fn submit(&mut self, mutation: &Mutation) -> Result<Change, BoardError> {
        self.sync
            .submit(mutation, &mut self.board)
            .map(Change::Synced)
    }

    pub(crate) fn ignore(reason: IgnoreReason) -> Change {
        debug!(%reason, "intent ignored");
        Change::Ignored(reason)
    }

    /// Mark a player drafted or undrafted.
    ///
    /// The local flag is set before submission; if the store rejects the
    /// change the reload that follows puts the stored value back.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the change.
    pub fn set_drafted(&mut self, id: PlayerId, drafted: bool) -> Result<Change, BoardError> {
        let Some(player) = self.board.player_mut(id) else {
            return Ok(Self::ignore(IgnoreReason::UnknownPlayer(id)));
        };
        player.drafted = drafted;
        self.submit(&Mutation::SetDrafted { id, drafted })
    }

    /// Swap a player with the one above it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the new order.
    pub fn move_up(&mut self, id: PlayerId, column: Column) -> Result<Change, BoardError> {
        let Some(index) = self.board.index_of(column, id) else {
            return Ok(Self::ignore(IgnoreReason::NotInColumn { id, column }));
        };
        if index == 0 {
            return Ok(Self::ignore(IgnoreReason::AtTop));
        }
        self.swap_and_submit(column, index - 1, index)
    }

    /// Swap a player with the one below it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the new order.
    pub fn move_down(&mut self, id: PlayerId, column: Column) -> Result<Change, BoardError> {
        let Some(index) = self.board.index_of(column, id) else {
            return Ok(Self::ignore(IgnoreReason::NotInColumn { id, column }));
        };
        if index + 1 >= self.board.column(column).len() {
            return Ok(Self::ignore(IgnoreReason::AtBottom));
        }
        self.swap_and_submit(column, index, index + 1)
    }

    fn swap_and_submit(
        &mut self,
        column: Column,
        upper: usize,
        lower: usize,
    ) -> Result<Change, BoardError> {
        let players = self.board.column_mut(column);
        players.swap(upper, lower);
        let ids = players.iter().map(|p| p.id).collect();
        self.submit(&Mutation::Reorder { column, ids })
    }

    /// Replace a column's order.
    ///
    /// `new_order` must list every current member exactly once. Dropping a
    /// member would orphan its tier marker, so anything else is refused
    /// before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidOperation`] for a non-permutation and
    /// [`BoardError::Sync`] if the store rejects the order.
    pub fn reorder(
        &mut self,
        column: Column,
        new_order: Vec<PlayerId>,
    ) -> Result<Change, BoardError> {
        check_permutation(&self.board, column, &new_order)?;

        let players = self.board.column_mut(column);
        players.sort_by_key(|p| new_order.iter().position(|id| *id == p.id));
        self.submit(&Mutation::Reorder {
            column,
            ids: new_order,
        })
    }

    /// Move a player to the end of another column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the move.
    pub fn assign_column(&mut self, id: PlayerId, column: Column) -> Result<Change, BoardError> {
        let Some((current, index)) = self.board.locate(id) else {
            return Ok(Self::ignore(IgnoreReason::UnknownPlayer(id)));
        };
        if current == column {
            return Ok(Self::ignore(IgnoreReason::AlreadyInColumn(column)));
        }
        let mut player = self.board.column_mut(current).remove(index);
        player.display_column = column;
        player.positions.insert(column);
        self.board.column_mut(column).push(player);
        self.submit(&Mutation::AssignColumn { id, column })
    }
}

fn check_permutation(board: &Board, column: Column, order: &[PlayerId]) -> Result<(), BoardError> {
    let current: HashSet<PlayerId> = board.column(column).iter().map(|p| p.id).collect();
    let mut seen = HashSet::with_capacity(order.len());

    for id in order {
        if !current.contains(id) {
            return Err(BoardError::InvalidOperation {
                column,
                reason: format!("player {id} is not in the column"),
            });
        }
        if !seen.insert(*id) {
            return Err(BoardError::InvalidOperation {
                column,
                reason: format!("player {id} is listed twice"),
            });
        }
    }

    if let Some(missing) = board
        .column(column)
        .iter()
        .find(|p| !seen.contains(&p.id))
    {
        return Err(BoardError::InvalidOperation {
            column,
            reason: format!("player {} would be removed from the column", missing.id),
        });
    }
    Ok(())
}
