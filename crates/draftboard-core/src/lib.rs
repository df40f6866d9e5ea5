//! draftboard-core library.
//!
//! A three-column fantasy draft board (guards, forwards, centers) whose order
//! is owned by an authoritative [`store::BackingStore`]. The local
//! [`ColumnStore`] applies each intent optimistically, submits it, and then
//! replaces its snapshot with a full reload.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the library ([`BoardError`],
//!   [`store::StoreError`]); `anyhow::Result` for config and file plumbing.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod column_store;
pub mod config;
pub mod db;
pub mod drag;
pub mod error;
pub mod model;
pub mod store;
pub mod sync;
pub mod tiers;

pub use column_store::{Change, ColumnStore, IgnoreReason};
pub use error::{BoardError, ErrorCode};
pub use model::{Board, Column, Player, PlayerId, PositionSet, StatLine};
pub use sync::{LoadOutcome, Mutation, StaleReloadPolicy};
