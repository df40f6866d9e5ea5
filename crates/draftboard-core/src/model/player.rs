use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use super::board::Column;

/// Stable player identity. Never changes across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for PlayerId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Positions a player is eligible for.
///
/// Rendered on the wire as a slash-joined string in `G/F/C` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionSet {
    pub guard: bool,
    pub forward: bool,
    pub center: bool,
}

impl PositionSet {
    #[must_use]
    pub const fn only(column: Column) -> Self {
        let mut set = Self {
            guard: false,
            forward: false,
            center: false,
        };
        set.insert(column);
        set
    }

    #[must_use]
    pub const fn contains(self, column: Column) -> bool {
        match column {
            Column::G => self.guard,
            Column::F => self.forward,
            Column::C => self.center,
        }
    }

    pub const fn insert(&mut self, column: Column) {
        match column {
            Column::G => self.guard = true,
            Column::F => self.forward = true,
            Column::C => self.center = true,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.guard && !self.forward && !self.center
    }

    /// Eligible columns in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.iter().map(Column::as_str).collect();
        write!(f, "{}", tags.join("/"))
    }
}

impl FromStr for PositionSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::default();
        for tag in s.split('/').map(str::trim).filter(|t| !t.is_empty()) {
            set.insert(tag.parse()?);
        }
        Ok(set)
    }
}

impl Serialize for PositionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Season stat line. Every field is optional: `None` means unknown and is
/// never shown as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    #[serde(default)]
    pub games_played: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub rebounds: Option<f64>,
    #[serde(default)]
    pub assists: Option<f64>,
    #[serde(default)]
    pub steals: Option<f64>,
    #[serde(default)]
    pub blocks: Option<f64>,
    #[serde(default)]
    pub three_pointers_made: Option<f64>,
    #[serde(default)]
    pub turnovers: Option<f64>,
    #[serde(default)]
    pub free_throws_missed: Option<f64>,
    #[serde(default)]
    pub fantasy_points: Option<f64>,
    #[serde(default)]
    pub fantasy_points_per_game: Option<f64>,
    #[serde(default)]
    pub adp: Option<f64>,
}

impl StatLine {
    /// Season total, known only when both per-game and games played are.
    #[must_use]
    pub fn derived_fantasy_points(&self) -> Option<f64> {
        self.fantasy_points_per_game
            .zip(self.games_played)
            .map(|(per_game, games)| per_game * games)
    }

    /// Replace `fantasy_points` with the derived total, dropping any value a
    /// store filled in for unknown inputs.
    pub fn normalize(&mut self) {
        self.fantasy_points = self.derived_fantasy_points();
    }
}

/// Format an optional stat for display, `N/A` when unknown.
#[must_use]
pub fn display_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

/// A player row as the board sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub positions: PositionSet,
    pub display_column: Column,
    #[serde(flatten)]
    pub stats: StatLine,
    #[serde(default)]
    pub drafted: bool,
    #[serde(default)]
    pub custom_rank: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub separator_below: bool,
    #[serde(default)]
    pub separator_label: Option<String>,
}

impl Player {
    /// Minimal player with no stats, used by stores and tests.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, column: Column) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            team: None,
            positions: PositionSet::only(column),
            display_column: column,
            stats: StatLine::default(),
            drafted: false,
            custom_rank: None,
            summary: None,
            separator_below: false,
            separator_label: None,
        }
    }

    /// Label of the tier marker below this player, if one is set.
    ///
    /// An unlabeled marker yields `Some("")`.
    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.separator_below
            .then(|| self.separator_label.as_deref().unwrap_or(""))
    }
}
