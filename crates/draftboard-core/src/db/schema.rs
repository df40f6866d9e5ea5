//! Canonical SQLite schema for the authoritative board store.
//!
//! - `players` holds one row per player with its stat line, draft flag, tier
//!   marker and its place on the board (`display_column`, `custom_rank`)
//! - `idx_players_column_rank` serves the ordered column fetch

/// Version 1: players table and its column index.
pub const PLAYERS_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    team TEXT,
    games_played REAL,
    points REAL,
    three_pointers_made REAL,
    rebounds REAL,
    assists REAL,
    steals REAL,
    blocks REAL,
    turnovers REAL,
    free_throws_missed REAL,
    fantasy_points_per_game REAL,
    is_guard INTEGER NOT NULL DEFAULT 0 CHECK (is_guard IN (0, 1)),
    is_forward INTEGER NOT NULL DEFAULT 0 CHECK (is_forward IN (0, 1)),
    is_center INTEGER NOT NULL DEFAULT 0 CHECK (is_center IN (0, 1)),
    adp REAL,
    summary TEXT,
    drafted INTEGER NOT NULL DEFAULT 0 CHECK (drafted IN (0, 1)),
    custom_rank INTEGER NOT NULL DEFAULT 0,
    display_column TEXT NOT NULL CHECK (display_column IN ('G', 'F', 'C')),
    separator_below INTEGER NOT NULL DEFAULT 0 CHECK (separator_below IN (0, 1)),
    separator_label TEXT
);

CREATE INDEX IF NOT EXISTS idx_players_column_rank
    ON players(display_column, custom_rank, id);
";

/// Indexes expected by the column fetch path.
pub const REQUIRED_INDEXES: &[&str] = &["idx_players_column_rank"];
