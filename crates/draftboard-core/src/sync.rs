//! Order synchronizer: submit one mutation, then converge with a full reload.
//!
//! Every mutation ends with a reload of the whole board, whether or not the
//! store accepted it. Each load is stamped with a monotonic [`LoadTicket`] so
//! a slow reload that completes after a newer one can be recognised; what
//! happens to it is decided by [`StaleReloadPolicy`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BoardError;
use crate::model::{Board, Column, PlayerId};
use crate::store::{BackingStore, StoreError};

/// A single change sent to the authoritative store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetDrafted { id: PlayerId, drafted: bool },
    /// `label: None` removes the marker.
    SetSeparator { id: PlayerId, label: Option<String> },
    Reorder { column: Column, ids: Vec<PlayerId> },
    AssignColumn { id: PlayerId, column: Column },
}

impl Mutation {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::SetDrafted { .. } => "set drafted",
            Self::SetSeparator { label: Some(_), .. } => "add separator",
            Self::SetSeparator { label: None, .. } => "remove separator",
            Self::Reorder { .. } => "reorder",
            Self::AssignColumn { .. } => "assign column",
        }
    }

    fn send<S: BackingStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        match self {
            Self::SetDrafted { id, drafted } => store.set_drafted(*id, *drafted),
            Self::SetSeparator { id, label } => {
                store.set_separator(*id, label.is_some(), label.as_deref().unwrap_or(""))
            }
            Self::Reorder { column, ids } => store.reorder_column(*column, ids),
            Self::AssignColumn { id, column } => store.assign_column(*id, *column),
        }
    }
}

/// What to do with a reload that finishes after a newer one was applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleReloadPolicy {
    /// Drop the stale snapshot and keep the newer one.
    #[default]
    Discard,
    /// Apply whatever completes last.
    LastWriteWins,
}

/// Sequence number handed out when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// Result of completing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot replaced the board; `version` is its ticket.
    Applied { version: u64 },
    /// The snapshot was older than the board and was dropped.
    Discarded { ticket: u64, current: u64 },
}

impl LoadOutcome {
    #[must_use]
    pub const fn version(self) -> Option<u64> {
        match self {
            Self::Applied { version } => Some(version),
            Self::Discarded { .. } => None,
        }
    }
}

/// Issues load tickets and decides whether a completed load may be applied.
#[derive(Debug, Clone, Default)]
pub struct ReloadSequencer {
    issued: u64,
    applied: u64,
    policy: StaleReloadPolicy,
}

impl ReloadSequencer {
    #[must_use]
    pub const fn new(policy: StaleReloadPolicy) -> Self {
        Self {
            issued: 0,
            applied: 0,
            policy,
        }
    }

    pub const fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Ticket of the snapshot currently on the board (0 before any load).
    #[must_use]
    pub const fn applied(&self) -> u64 {
        self.applied
    }

    #[must_use]
    pub const fn policy(&self) -> StaleReloadPolicy {
        self.policy
    }

    /// Whether a snapshot carrying `ticket` should replace the board.
    #[must_use]
    pub const fn admits(&self, ticket: LoadTicket) -> bool {
        match self.policy {
            StaleReloadPolicy::Discard => ticket.0 > self.applied,
            StaleReloadPolicy::LastWriteWins => true,
        }
    }

    const fn record(&mut self, ticket: LoadTicket) {
        self.applied = ticket.0;
    }
}

/// Sends mutations to a [`BackingStore`] and reloads the board after each.
#[derive(Debug)]
pub struct OrderSynchronizer<S> {
    store: S,
    sequencer: ReloadSequencer,
}

impl<S: BackingStore> OrderSynchronizer<S> {
    #[must_use]
    pub const fn new(store: S, policy: StaleReloadPolicy) -> Self {
        Self {
            store,
            sequencer: ReloadSequencer::new(policy),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub const fn sequencer(&self) -> &ReloadSequencer {
        &self.sequencer
    }

    /// Start a load. The ticket must be handed back to [`Self::complete_load`].
    pub const fn begin_load(&mut self) -> LoadTicket {
        self.sequencer.issue()
    }

    /// Fetch a snapshot without touching any board.
    ///
    /// # Errors
    ///
    /// Returns the store's error on transport or decode failure.
    pub fn fetch(&mut self) -> Result<Board, StoreError> {
        self.store.fetch_board()
    }

    /// Finish a load started with [`Self::begin_load`].
    ///
    /// A stale ticket under the configured policy is discarded before the
    /// snapshot is looked at. Otherwise an inconsistent snapshot, like a
    /// failed fetch, leaves `board` exactly as it was, and a good one
    /// replaces it wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Load`] if the fetch failed and
    /// [`BoardError::Inconsistent`] if the snapshot breaks board invariants.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Board, StoreError>,
        board: &mut Board,
    ) -> Result<LoadOutcome, BoardError> {
        let mut snapshot = fetched.map_err(BoardError::Load)?;

        if !self.sequencer.admits(ticket) {
            warn!(
                ticket = ticket.0,
                current = self.sequencer.applied(),
                "discarding stale board reload"
            );
            return Ok(LoadOutcome::Discarded {
                ticket: ticket.0,
                current: self.sequencer.applied(),
            });
        }

        snapshot.validate().map_err(BoardError::Inconsistent)?;
        snapshot.version = ticket.0;
        *board = snapshot;
        self.sequencer.record(ticket);
        debug!(version = ticket.0, players = board.len(), "board reloaded");
        Ok(LoadOutcome::Applied { version: ticket.0 })
    }

    /// Fetch and apply a fresh snapshot.
    ///
    /// # Errors
    ///
    /// See [`Self::complete_load`].
    pub fn reload(&mut self, board: &mut Board) -> Result<LoadOutcome, BoardError> {
        let ticket = self.begin_load();
        let fetched = self.store.fetch_board();
        self.complete_load(ticket, fetched, board)
    }

    /// Submit `mutation`, then reload whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejected the mutation (the
    /// reload is still attempted), or the reload's error if only the reload
    /// failed.
    pub fn submit(
        &mut self,
        mutation: &Mutation,
        board: &mut Board,
    ) -> Result<LoadOutcome, BoardError> {
        let action = mutation.action();
        let sent = mutation.send(&mut self.store);
        let reloaded = self.reload(board);

        match sent {
            Ok(()) => {
                if let Ok(outcome) = &reloaded {
                    info!(action, ?outcome, "mutation synced");
                }
                reloaded
            }
            Err(source) => {
                if let Err(reload_err) = &reloaded {
                    warn!(action, error = %reload_err, "reload after failed mutation also failed");
                }
                warn!(action, error = %source, "mutation rejected by store");
                Err(BoardError::Sync { action, source })
            }
        }
    }
}
