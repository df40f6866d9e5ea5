//! Typed `SQLite` queries for the board database.
//!
//! All functions take a shared `&Connection` and return typed rows, never raw
//! tuples. Ordering within a column is `custom_rank ASC, id ASC`, so equal
//! ranks still come back in a stable order.

use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};

use crate::model::{Board, Column, Player, PlayerId, PositionSet, StatLine};

const PLAYER_COLUMNS: &str = "id, name, team, games_played, fantasy_points_per_game, adp, \
     drafted, custom_rank, display_column, is_guard, is_forward, is_center, \
     points, three_pointers_made, rebounds, assists, steals, blocks, turnovers, \
     free_throws_missed, summary, separator_below, separator_label";

fn row_to_player(row: &Row<'_>) -> rusqlite::Result<Player> {
    let column_tag: String = row.get(8)?;
    let display_column = column_tag.parse::<Column>().map_err(|reason| {
        rusqlite::Error::FromSqlConversionFailure(8, Type::Text, reason.into())
    })?;

    let mut player = Player {
        id: PlayerId(row.get(0)?),
        name: row.get(1)?,
        team: row.get(2)?,
        positions: PositionSet {
            guard: row.get::<_, i64>(9)? != 0,
            forward: row.get::<_, i64>(10)? != 0,
            center: row.get::<_, i64>(11)? != 0,
        },
        display_column,
        stats: StatLine {
            games_played: row.get(3)?,
            points: row.get(12)?,
            rebounds: row.get(14)?,
            assists: row.get(15)?,
            steals: row.get(16)?,
            blocks: row.get(17)?,
            three_pointers_made: row.get(13)?,
            turnovers: row.get(18)?,
            free_throws_missed: row.get(19)?,
            fantasy_points: None,
            fantasy_points_per_game: row.get(4)?,
            adp: row.get(5)?,
        },
        drafted: row.get::<_, i64>(6)? != 0,
        custom_rank: row.get(7)?,
        summary: row.get(20)?,
        separator_below: row.get::<_, i64>(21)? != 0,
        separator_label: row.get(22)?,
    };
    player.stats.normalize();
    Ok(player)
}

/// Players displayed in `column`, in rank order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn fetch_column(conn: &Connection, column: Column) -> rusqlite::Result<Vec<Player>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players \
         WHERE display_column = ?1 \
         ORDER BY custom_rank ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![column.as_str()], row_to_player)?;
    rows.collect()
}

/// Full board snapshot. `version` is left at zero for the caller to stamp.
///
/// # Errors
///
/// Returns an error if any column query fails.
pub fn fetch_board(conn: &Connection) -> rusqlite::Result<Board> {
    Ok(Board {
        guards: fetch_column(conn, Column::G)?,
        forwards: fetch_column(conn, Column::F)?,
        centers: fetch_column(conn, Column::C)?,
        version: 0,
    })
}

/// Ids displayed in `column`, in rank order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn column_ids(conn: &Connection, column: Column) -> rusqlite::Result<Vec<PlayerId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id FROM players WHERE display_column = ?1 ORDER BY custom_rank ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![column.as_str()], |row| row.get(0).map(PlayerId))?;
    rows.collect()
}

/// Column a player is displayed in, or `None` if the id is unknown.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn player_column(conn: &Connection, id: PlayerId) -> rusqlite::Result<Option<Column>> {
    let tag: Option<String> = conn
        .query_row(
            "SELECT display_column FROM players WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )
        .optional()?;
    tag.map(|t| {
        t.parse::<Column>()
            .map_err(|reason| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, reason.into()))
    })
    .transpose()
}

/// Number of players stored.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_players(conn: &Connection) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

/// Update the drafted flag. Returns the number of rows touched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_drafted(conn: &Connection, id: PlayerId, drafted: bool) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE players SET drafted = ?1 WHERE id = ?2",
        params![i64::from(drafted), id.0],
    )
}

/// Set or clear a tier marker. Clearing also clears the label.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_separator(
    conn: &Connection,
    id: PlayerId,
    has_separator: bool,
    label: &str,
) -> rusqlite::Result<usize> {
    let stored_label = has_separator.then_some(label);
    conn.execute(
        "UPDATE players SET separator_below = ?1, separator_label = ?2 WHERE id = ?3",
        params![i64::from(has_separator), stored_label, id.0],
    )
}

/// Write `custom_rank = index` for each id in order.
///
/// # Errors
///
/// Returns an error if any update fails.
pub fn write_ranks(conn: &Connection, ids: &[PlayerId]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached("UPDATE players SET custom_rank = ?1 WHERE id = ?2")?;
    for (rank, id) in ids.iter().enumerate() {
        let rank = i64::try_from(rank).unwrap_or(i64::MAX);
        stmt.execute(params![rank, id.0])?;
    }
    Ok(())
}

/// Move a player to the end of `column`, granting eligibility for it.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn move_to_column(conn: &Connection, id: PlayerId, column: Column) -> rusqlite::Result<usize> {
    let eligibility = match column {
        Column::G => "is_guard",
        Column::F => "is_forward",
        Column::C => "is_center",
    };
    let sql = format!(
        "UPDATE players SET
            display_column = ?1,
            {eligibility} = 1,
            custom_rank = (
                SELECT COALESCE(MAX(custom_rank) + 1, 0)
                FROM players
                WHERE display_column = ?1 AND id <> ?2
            )
         WHERE id = ?2"
    );
    conn.execute(&sql, params![column.as_str(), id.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn insert(conn: &Connection, name: &str, column: Column, rank: i64) -> PlayerId {
        conn.execute(
            "INSERT INTO players (name, custom_rank, display_column, is_guard, is_forward, is_center)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                name,
                rank,
                column.as_str(),
                i64::from(column == Column::G),
                i64::from(column == Column::F),
                i64::from(column == Column::C)
            ],
        )
        .expect("insert player");
        PlayerId(conn.last_insert_rowid())
    }

    #[test]
    fn fetch_column_orders_by_rank() {
        let conn = open_in_memory().expect("db");
        let a = insert(&conn, "A", Column::G, 2);
        let b = insert(&conn, "B", Column::G, 0);
        let c = insert(&conn, "C", Column::G, 1);
        insert(&conn, "D", Column::F, 0);

        assert_eq!(column_ids(&conn, Column::G).expect("ids"), vec![b, c, a]);
        let players = fetch_column(&conn, Column::G).expect("players");
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].name, "B");
    }

    #[test]
    fn missing_stats_stay_unknown() {
        let conn = open_in_memory().expect("db");
        let id = insert(&conn, "A", Column::C, 0);
        let board = fetch_board(&conn).expect("board");
        let player = board.player(id).expect("player present");
        assert_eq!(player.stats.fantasy_points, None);
        assert_eq!(player.stats.points, None);
    }

    #[test]
    fn fantasy_points_total_needs_both_inputs() {
        let conn = open_in_memory().expect("db");
        let id = insert(&conn, "A", Column::C, 0);
        conn.execute(
            "UPDATE players SET games_played = 10, fantasy_points_per_game = 40.5 WHERE id = ?1",
            params![id.0],
        )
        .expect("update stats");
        let board = fetch_board(&conn).expect("board");
        assert_eq!(board.player(id).and_then(|p| p.stats.fantasy_points), Some(405.0));
    }

    #[test]
    fn clearing_separator_clears_label() {
        let conn = open_in_memory().expect("db");
        let id = insert(&conn, "A", Column::F, 0);
        update_separator(&conn, id, true, "Tier 2").expect("set");
        let board = fetch_board(&conn).expect("board");
        assert_eq!(board.player(id).and_then(Player::marker), Some("Tier 2"));

        update_separator(&conn, id, false, "ignored").expect("clear");
        let board = fetch_board(&conn).expect("board");
        let player = board.player(id).expect("player");
        assert!(!player.separator_below);
        assert_eq!(player.separator_label, None);
    }

    #[test]
    fn move_to_column_appends_and_grants_eligibility() {
        let conn = open_in_memory().expect("db");
        let g = insert(&conn, "G1", Column::G, 0);
        insert(&conn, "F1", Column::F, 0);
        insert(&conn, "F2", Column::F, 1);

        assert_eq!(move_to_column(&conn, g, Column::F).expect("move"), 1);
        let ids = column_ids(&conn, Column::F).expect("ids");
        assert_eq!(ids.last(), Some(&g));
        assert_eq!(player_column(&conn, g).expect("lookup"), Some(Column::F));

        let board = fetch_board(&conn).expect("board");
        let player = board.player(g).expect("player");
        assert!(player.positions.guard && player.positions.forward);
    }

    #[test]
    fn unknown_player_updates_touch_nothing() {
        let conn = open_in_memory().expect("db");
        assert_eq!(update_drafted(&conn, PlayerId(99), true).expect("update"), 0);
        assert_eq!(player_column(&conn, PlayerId(99)).expect("lookup"), None);
    }
}
