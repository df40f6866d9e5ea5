use std::fmt;

use crate::model::board::Column;
use crate::store::StoreError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    BoardLoadFailed,
    InconsistentBoard,
    SyncFailed,
    PlayerNotFound,
    NotAPermutation,
    UnsupportedByStore,
    StoreUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::BoardLoadFailed => "E2001",
            Self::InconsistentBoard => "E2002",
            Self::SyncFailed => "E3001",
            Self::PlayerNotFound => "E4001",
            Self::NotAPermutation => "E4002",
            Self::UnsupportedByStore => "E5001",
            Self::StoreUnavailable => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Board not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::BoardLoadFailed => "Board load failed",
            Self::InconsistentBoard => "Board snapshot violates ordering invariants",
            Self::SyncFailed => "Mutation was not accepted by the store",
            Self::PlayerNotFound => "Player not found",
            Self::NotAPermutation => "Order is not a permutation of the column",
            Self::UnsupportedByStore => "Operation not supported by this store",
            Self::StoreUnavailable => "Store unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `dboard init` to create the board."),
            Self::ConfigParseError => Some("Fix syntax in .draftboard/config.toml and retry."),
            Self::BoardLoadFailed | Self::StoreUnavailable => {
                Some("Check that the configured store is reachable and retry.")
            }
            Self::InconsistentBoard => {
                Some("Each player id must appear once, in the column it is displayed in.")
            }
            Self::SyncFailed => Some("The board was reloaded; retry the action if it is missing."),
            Self::PlayerNotFound => Some("Run `dboard show` to list player ids."),
            Self::NotAPermutation => {
                Some("List every player of the column exactly once, in the new order.")
            }
            Self::UnsupportedByStore => Some("Switch to the sqlite backend for this operation."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by board operations.
///
/// Expected gesture outcomes (boundary moves, cross-column drops) are not
/// errors; they come back as [`crate::column_store::Change::Ignored`].
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Fetching the board failed; the previous snapshot is still in place.
    #[error("board load failed: {0}")]
    Load(#[source] StoreError),

    /// A fetched snapshot broke an ordering invariant and was rejected.
    #[error("board snapshot rejected: {0}")]
    Inconsistent(String),

    /// The store refused or failed a mutation. The board has been reloaded
    /// if the store was still reachable.
    #[error("sync failed for {action}: {source}")]
    Sync {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    /// The request would break a board invariant and was not submitted.
    #[error("invalid operation on column {column}: {reason}")]
    InvalidOperation { column: Column, reason: String },
}

impl BoardError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Load(StoreError::NotInitialized(_)) => ErrorCode::NotInitialized,
            Self::Load(_) => ErrorCode::BoardLoadFailed,
            Self::Inconsistent(_) => ErrorCode::InconsistentBoard,
            Self::Sync { source, .. } => match source.code() {
                ErrorCode::StoreUnavailable | ErrorCode::BoardLoadFailed => ErrorCode::SyncFailed,
                code => code,
            },
            Self::InvalidOperation { .. } => ErrorCode::NotAPermutation,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

impl StoreError {
    /// Machine-readable code for a store failure seen outside a mutation.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized(_) => ErrorCode::NotInitialized,
            Self::UnknownPlayer(_) => ErrorCode::PlayerNotFound,
            Self::NotAPermutation { .. } => ErrorCode::NotAPermutation,
            Self::Unsupported(_) => ErrorCode::UnsupportedByStore,
            Self::Decode(_) => ErrorCode::BoardLoadFailed,
            Self::Sqlite(_) | Self::Http { .. } => ErrorCode::StoreUnavailable,
        }
    }
}
