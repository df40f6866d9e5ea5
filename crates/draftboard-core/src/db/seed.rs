//! Seeding the board database from a projection sheet.
//!
//! Rows are ranked by projected fantasy points per game, best first, and each
//! player lands in one display column chosen by priority C > G > F.

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{Column, PositionSet};

/// One input row of a player projection sheet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPlayer {
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub games_played: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub three_pointers_made: Option<f64>,
    #[serde(default)]
    pub rebounds: Option<f64>,
    #[serde(default)]
    pub assists: Option<f64>,
    #[serde(default)]
    pub steals: Option<f64>,
    #[serde(default)]
    pub blocks: Option<f64>,
    #[serde(default)]
    pub turnovers: Option<f64>,
    #[serde(default)]
    pub free_throws_missed: Option<f64>,
    #[serde(default)]
    pub fantasy_points_per_game: Option<f64>,
    #[serde(default)]
    pub guard: bool,
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub center: bool,
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl SeedPlayer {
    #[must_use]
    pub const fn positions(&self) -> PositionSet {
        PositionSet {
            guard: self.guard,
            forward: self.forward,
            center: self.center,
        }
    }

    /// Column the player is displayed in on a fresh board.
    #[must_use]
    pub const fn initial_column(&self) -> Column {
        if self.center {
            Column::C
        } else if self.guard {
            Column::G
        } else {
            Column::F
        }
    }
}

/// Summary of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub replaced: usize,
    pub by_column: BTreeMap<String, usize>,
}

fn by_projection_desc(a: &SeedPlayer, b: &SeedPlayer) -> Ordering {
    match (a.fantasy_points_per_game, b.fantasy_points_per_game) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Insert `rows` into the board database.
///
/// When `replace` is set, existing players are deleted first in the same
/// transaction. Initial `custom_rank` is the row's position in the sorted
/// import, so relative order inside each column follows the projection.
///
/// # Errors
///
/// Returns an error if any insert fails; nothing is written in that case.
pub fn import_players(
    conn: &mut Connection,
    mut rows: Vec<SeedPlayer>,
    replace: bool,
) -> rusqlite::Result<ImportReport> {
    rows.sort_by(by_projection_desc);

    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    if replace {
        report.replaced = tx.execute("DELETE FROM players", [])?;
    }

    let rank_offset: i64 = tx.query_row(
        "SELECT COALESCE(MAX(custom_rank) + 1, 0) FROM players",
        [],
        |row| row.get(0),
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO players (
                name, team, games_played, points, three_pointers_made, rebounds,
                assists, steals, blocks, turnovers, free_throws_missed,
                fantasy_points_per_game, is_guard, is_forward, is_center, adp,
                summary, custom_rank, display_column
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        )?;

        for (index, row) in rows.iter().enumerate() {
            let column = row.initial_column();
            let rank = rank_offset + i64::try_from(index).unwrap_or(i64::MAX - rank_offset);
            stmt.execute(params![
                row.name,
                row.team,
                row.games_played,
                row.points,
                row.three_pointers_made,
                row.rebounds,
                row.assists,
                row.steals,
                row.blocks,
                row.turnovers,
                row.free_throws_missed,
                row.fantasy_points_per_game,
                i64::from(row.guard),
                i64::from(row.forward),
                i64::from(row.center),
                row.adp,
                row.summary,
                rank,
                column.as_str(),
            ])?;
            *report
                .by_column
                .entry(column.as_str().to_string())
                .or_default() += 1;
            report.imported += 1;
        }
    }

    tx.commit()?;
    tracing::info!(
        imported = report.imported,
        replaced = report.replaced,
        "imported players into board"
    );
    Ok(report)
}
