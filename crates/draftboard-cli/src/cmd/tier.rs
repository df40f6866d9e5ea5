//! `dboard tier add|rm` and `dboard tiers`.

use super::{ChangeReport, open_board, report_change};
use crate::output::{OutputMode, pretty_section, render_mode};
use clap::{Args, Subcommand};
use draftboard_core::model::player::display_stat;
use draftboard_core::tiers::tiers;
use draftboard_core::{Column, PlayerId};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum TierCommand {
    /// Put a tier marker below a player.
    Add {
        /// Player id the marker sits under.
        id: PlayerId,

        /// Marker label. Omit for an unlabeled break.
        #[arg(long, default_value = "")]
        label: String,
    },

    /// Remove the tier marker below a player.
    Rm {
        /// Player id whose marker is removed.
        id: PlayerId,
    },
}

#[derive(Args, Debug)]
pub struct TiersArgs {
    /// Column to split into tiers (G, F or C).
    pub column: Column,
}

pub fn run_tier(command: &TierCommand, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;
    let (action, id, change) = match command {
        TierCommand::Add { id, label } => ("add separator", *id, board.add_separator(*id, label)?),
        TierCommand::Rm { id } => ("remove separator", *id, board.remove_separator(*id)?),
    };
    report_change(output, &ChangeReport::new(action, id, change, &board))
}

#[derive(Debug, Serialize)]
struct TierMember {
    id: PlayerId,
    name: String,
    drafted: bool,
    fantasy_points_per_game: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TierView {
    number: usize,
    closing_label: Option<String>,
    players: Vec<TierMember>,
}

#[derive(Debug, Serialize)]
struct TiersReport {
    column: Column,
    tiers: Vec<TierView>,
}

pub fn run_tiers(args: &TiersArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let board = open_board(project_root)?;
    let snapshot = board.board();

    let report = TiersReport {
        column: args.column,
        tiers: tiers(snapshot, args.column)
            .into_iter()
            .map(|tier| TierView {
                number: tier.number,
                closing_label: tier.closing_label,
                players: tier
                    .players
                    .iter()
                    .filter_map(|id| snapshot.player(*id))
                    .map(|p| TierMember {
                        id: p.id,
                        name: p.name.clone(),
                        drafted: p.drafted,
                        fantasy_points_per_game: p.stats.fantasy_points_per_game,
                    })
                    .collect(),
            })
            .collect(),
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for tier in &r.tiers {
                for p in &tier.players {
                    writeln!(w, "{}\t{}\t{}\t{}", tier.number, p.id, p.name, u8::from(p.drafted))?;
                }
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("{} tiers", r.column.title()))?;
            if r.tiers.is_empty() {
                writeln!(w, "  (empty column)")?;
            }
            for tier in &r.tiers {
                let label = match tier.closing_label.as_deref() {
                    Some("") => String::from(" (unlabeled break)"),
                    Some(label) => format!(": {label}"),
                    None => String::new(),
                };
                writeln!(w, "Tier {}{label}", tier.number)?;
                for p in &tier.players {
                    let mark = if p.drafted { "x" } else { " " };
                    writeln!(
                        w,
                        "  [{mark}] #{:<5} {:<28} {:>6}",
                        p.id,
                        p.name,
                        display_stat(p.fantasy_points_per_game)
                    )?;
                }
            }
            Ok(())
        },
    )
}
