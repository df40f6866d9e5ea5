//! Authoritative backing stores.
//!
//! The board never trusts its own copy for longer than one round trip: every
//! mutation goes through a [`BackingStore`] and is followed by a full
//! [`BackingStore::fetch_board`].

pub mod http;
pub mod sqlite;

use std::path::PathBuf;

use crate::model::{Board, Column, PlayerId};

pub use http::HttpStore;
pub use sqlite::SqliteStore;

/// Failures reported by a backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The board database has not been created yet.
    #[error("board database not found at {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("http request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("could not decode store response: {0}")]
    Decode(String),

    #[error("player {0} does not exist")]
    UnknownPlayer(PlayerId),

    /// A reorder list did not match the column's current membership.
    #[error("order for column {column} is not a permutation of its {expected} players")]
    NotAPermutation { column: Column, expected: usize },

    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),
}

/// Contract consumed by the board. Transport-agnostic.
pub trait BackingStore {
    /// Full snapshot, each column ordered by stored rank.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    fn fetch_board(&mut self) -> Result<Board, StoreError>;

    /// Set the drafted flag. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown or the write fails.
    fn set_drafted(&mut self, id: PlayerId, drafted: bool) -> Result<(), StoreError>;

    /// Set or clear the tier marker below a player. `label` is ignored and the
    /// stored label cleared when `has_separator` is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown or the write fails.
    fn set_separator(
        &mut self,
        id: PlayerId,
        has_separator: bool,
        label: &str,
    ) -> Result<(), StoreError>;

    /// Persist a new order for a column. The store validates membership.
    ///
    /// # Errors
    ///
    /// Returns an error if `ids` is not a permutation of the column or the
    /// write fails.
    fn reorder_column(&mut self, column: Column, ids: &[PlayerId]) -> Result<(), StoreError>;

    /// Move a player to the end of another column.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown, the store cannot reassign
    /// columns, or the write fails.
    fn assign_column(&mut self, id: PlayerId, column: Column) -> Result<(), StoreError>;
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn fetch_board(&mut self) -> Result<Board, StoreError> {
        (**self).fetch_board()
    }

    fn set_drafted(&mut self, id: PlayerId, drafted: bool) -> Result<(), StoreError> {
        (**self).set_drafted(id, drafted)
    }

    fn set_separator(
        &mut self,
        id: PlayerId,
        has_separator: bool,
        label: &str,
    ) -> Result<(), StoreError> {
        (**self).set_separator(id, has_separator, label)
    }

    fn reorder_column(&mut self, column: Column, ids: &[PlayerId]) -> Result<(), StoreError> {
        (**self).reorder_column(column, ids)
    }

    fn assign_column(&mut self, id: PlayerId, column: Column) -> Result<(), StoreError> {
        (**self).assign_column(id, column)
    }
}
