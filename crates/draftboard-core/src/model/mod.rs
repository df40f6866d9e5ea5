//! Board data model: players, columns and full snapshots.

pub mod board;
pub mod player;

pub use board::{Board, Column};
pub use player::{Player, PlayerId, PositionSet, StatLine};
