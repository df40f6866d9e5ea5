//! `SQLite`-backed authoritative store.

use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;

use super::{BackingStore, StoreError};
use crate::db::{self, query};
use crate::model::{Board, Column, PlayerId};

/// Board store over a local `SQLite` database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap an already-migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an existing board database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInitialized`] if the file does not exist or is
    /// not a board database.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        match db::try_open_board_db(path) {
            Ok(Some(conn)) => Ok(Self::new(conn)),
            Ok(None) | Err(_) => Err(StoreError::NotInitialized(path.to_path_buf())),
        }
    }

    /// Fresh in-memory store, mostly for tests and dry runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(db::open_in_memory()?))
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    pub const fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    fn require_player(&self, id: PlayerId) -> Result<Column, StoreError> {
        query::player_column(&self.conn, id)?.ok_or(StoreError::UnknownPlayer(id))
    }
}

impl BackingStore for SqliteStore {
    fn fetch_board(&mut self) -> Result<Board, StoreError> {
        Ok(query::fetch_board(&self.conn)?)
    }

    fn set_drafted(&mut self, id: PlayerId, drafted: bool) -> Result<(), StoreError> {
        if query::update_drafted(&self.conn, id, drafted)? == 0 {
            return Err(StoreError::UnknownPlayer(id));
        }
        Ok(())
    }

    fn set_separator(
        &mut self,
        id: PlayerId,
        has_separator: bool,
        label: &str,
    ) -> Result<(), StoreError> {
        if query::update_separator(&self.conn, id, has_separator, label)? == 0 {
            return Err(StoreError::UnknownPlayer(id));
        }
        Ok(())
    }

    fn reorder_column(&mut self, column: Column, ids: &[PlayerId]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let current = query::column_ids(&tx, column)?;

        let members: HashSet<PlayerId> = current.iter().copied().collect();
        let requested: HashSet<PlayerId> = ids.iter().copied().collect();
        if ids.len() != current.len() || requested.len() != ids.len() || requested != members {
            if let Some(stranger) = ids.iter().find(|id| !members.contains(id)) {
                if query::player_column(&tx, *stranger)?.is_none() {
                    return Err(StoreError::UnknownPlayer(*stranger));
                }
            }
            return Err(StoreError::NotAPermutation {
                column,
                expected: current.len(),
            });
        }

        query::write_ranks(&tx, ids)?;
        tx.commit()?;
        Ok(())
    }

    fn assign_column(&mut self, id: PlayerId, column: Column) -> Result<(), StoreError> {
        let from = self.require_player(id)?;
        if from == column {
            return Ok(());
        }
        query::move_to_column(&self.conn, id, column)?;
        tracing::info!(player = %id, %from, to = %column, "reassigned display column");
        Ok(())
    }
}
