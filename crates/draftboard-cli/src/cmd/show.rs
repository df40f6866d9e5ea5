//! `dboard show`: print the board, column by column, with tier breaks.

use super::open_board;
use crate::output::{OutputMode, pretty_section, render_mode};
use clap::Args;
use draftboard_core::model::player::display_stat;
use draftboard_core::{Board, Column, Player};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show one column (G, F or C).
    #[arg(long)]
    pub column: Option<Column>,
}

#[derive(Debug, Serialize)]
struct ColumnView<'a> {
    column: Column,
    players: &'a [Player],
}

#[derive(Debug, Serialize)]
struct BoardView<'a> {
    version: u64,
    columns: Vec<ColumnView<'a>>,
}

impl<'a> BoardView<'a> {
    fn new(board: &'a Board, only: Option<Column>) -> Self {
        let columns = Column::ALL
            .into_iter()
            .filter(|c| only.is_none_or(|o| o == *c))
            .map(|column| ColumnView {
                column,
                players: board.column(column),
            })
            .collect();
        Self {
            version: board.version,
            columns,
        }
    }
}

fn write_text(view: &BoardView<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "column\trank\tid\tname\tteam\tpos\tfpg\tadp\tdrafted\tmarker")?;
    for col in &view.columns {
        for (rank, p) in col.players.iter().enumerate() {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                col.column,
                rank + 1,
                p.id,
                p.name,
                p.team.as_deref().unwrap_or("N/A"),
                p.positions,
                display_stat(p.stats.fantasy_points_per_game),
                display_stat(p.stats.adp),
                u8::from(p.drafted),
                p.marker().unwrap_or("-"),
            )?;
        }
    }
    Ok(())
}

fn write_pretty(view: &BoardView<'_>, w: &mut dyn Write) -> io::Result<()> {
    for (i, col) in view.columns.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        pretty_section(
            w,
            &format!("{} ({}) · {} players", col.column.title(), col.column, col.players.len()),
        )?;
        for (rank, p) in col.players.iter().enumerate() {
            let drafted = if p.drafted { "  drafted" } else { "" };
            writeln!(
                w,
                "{:>3}. #{:<5} {:<26} {:<4} {:<6} FPG {:>5}  ADP {:>5}{drafted}",
                rank + 1,
                p.id,
                p.name,
                p.team.as_deref().unwrap_or("N/A"),
                p.positions,
                display_stat(p.stats.fantasy_points_per_game),
                display_stat(p.stats.adp),
            )?;
            match p.marker() {
                Some("") => writeln!(w, "     ~~~~~~~~")?,
                Some(label) => writeln!(w, "     ~~~~ {label} ~~~~")?,
                None => {}
            }
        }
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let board = open_board(project_root)?;
    let view = BoardView::new(board.board(), args.column);
    render_mode(output, &view, write_text, write_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        let mut star = Player::new(1, "Star", Column::G);
        star.stats.fantasy_points_per_game = Some(51.24);
        star.separator_below = true;
        star.separator_label = Some("Elite".to_string());
        let mut role = Player::new(2, "Role", Column::G);
        role.drafted = true;
        Board {
            guards: vec![star, role],
            centers: vec![Player::new(3, "Big", Column::C)],
            version: 7,
            ..Board::default()
        }
    }

    #[test]
    fn text_rows_use_na_for_unknown_stats() {
        let board = sample();
        let mut out = Vec::new();
        write_text(&BoardView::new(&board, Some(Column::G)), &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("G\t1\t1\tStar\tN/A\tG\t51.2"));
        assert!(lines[1].ends_with("\tElite"));
        assert!(lines[2].contains("\tN/A\tN/A\t1\t-"));
    }

    #[test]
    fn pretty_output_draws_tier_breaks() {
        let board = sample();
        let mut out = Vec::new();
        write_pretty(&BoardView::new(&board, None), &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Guards (G) · 2 players"));
        assert!(text.contains("~~~~ Elite ~~~~"));
        assert!(text.contains("Forwards (F) · 0 players"));
        assert!(text.contains("drafted"));
    }

    #[test]
    fn json_view_keeps_column_order() {
        let board = sample();
        let json = serde_json::to_value(BoardView::new(&board, None)).expect("serialize");
        assert_eq!(json["version"], 7);
        assert_eq!(json["columns"][0]["column"], "G");
        assert_eq!(json["columns"][2]["players"][0]["name"], "Big");
        assert_eq!(json["columns"][0]["players"][0]["separatorLabel"], "Elite");
    }
}
