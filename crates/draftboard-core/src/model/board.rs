use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fmt, str::FromStr};

use super::player::{Player, PlayerId};

/// The three fixed board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// Guards.
    G,
    /// Forwards.
    F,
    /// Centers.
    C,
}

impl Column {
    pub const ALL: [Self; 3] = [Self::G, Self::F, Self::C];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::F => "F",
            Self::C => "C",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::G => "Guards",
            Self::F => "Forwards",
            Self::C => "Centers",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "G" | "GUARD" | "GUARDS" => Ok(Self::G),
            "F" | "FORWARD" | "FORWARDS" => Ok(Self::F),
            "C" | "CENTER" | "CENTERS" => Ok(Self::C),
            other => Err(format!("unknown column '{other}' (expected G, F or C)")),
        }
    }
}

/// Full board snapshot: three ordered columns.
///
/// Lower index means higher draft priority. `version` is the load sequence
/// number that produced the snapshot and is not part of the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "G", default)]
    pub guards: Vec<Player>,
    #[serde(rename = "F", default)]
    pub forwards: Vec<Player>,
    #[serde(rename = "C", default)]
    pub centers: Vec<Player>,
    #[serde(skip)]
    pub version: u64,
}

impl Board {
    #[must_use]
    pub fn column(&self, column: Column) -> &[Player] {
        match column {
            Column::G => &self.guards,
            Column::F => &self.forwards,
            Column::C => &self.centers,
        }
    }

    pub fn column_mut(&mut self, column: Column) -> &mut Vec<Player> {
        match column {
            Column::G => &mut self.guards,
            Column::F => &mut self.forwards,
            Column::C => &mut self.centers,
        }
    }

    /// Current id order of a column.
    #[must_use]
    pub fn ids(&self, column: Column) -> Vec<PlayerId> {
        self.column(column).iter().map(|p| p.id).collect()
    }

    /// Index of `id` within `column`.
    #[must_use]
    pub fn index_of(&self, column: Column, id: PlayerId) -> Option<usize> {
        self.column(column).iter().position(|p| p.id == id)
    }

    /// Locate a player across all columns. First match wins.
    #[must_use]
    pub fn locate(&self, id: PlayerId) -> Option<(Column, usize)> {
        Column::ALL
            .into_iter()
            .find_map(|c| self.index_of(c, id).map(|i| (c, i)))
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.locate(id).map(|(c, i)| &self.column(c)[i])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        let (column, index) = self.locate(id)?;
        self.column_mut(column).get_mut(index)
    }

    /// Mutable walk over every player, column by column.
    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.guards
            .iter_mut()
            .chain(self.forwards.iter_mut())
            .chain(self.centers.iter_mut())
    }

    /// All players, column by column.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        Column::ALL.into_iter().flat_map(|c| self.column(c).iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len() + self.forwards.len() + self.centers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the ordering invariants of a snapshot.
    ///
    /// Every id appears once on the whole board, inside the column its
    /// `display_column` names.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashMap<PlayerId, Column> = HashMap::with_capacity(self.len());
        for column in Column::ALL {
            for player in self.column(column) {
                if player.display_column != column {
                    return Err(format!(
                        "player {} is delivered in column {column} but displayed in {}",
                        player.id, player.display_column
                    ));
                }
                if let Some(previous) = seen.insert(player.id, column) {
                    return Err(format!(
                        "player {} appears in both {previous} and {column}",
                        player.id
                    ));
                }
            }
        }
        Ok(())
    }
}
