use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::StatsError;

// ---------------------------------------------------------------------------
// MetadataValue – a single cell in a non-metric column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// Used for the columns the engine does not interpret (shown in the table only).
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v:.2}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, ""),
        }
    }
}

// ---------------------------------------------------------------------------
// Position – tactical position category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    GK,
    D,
    M,
    F,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown position '{0}' (expected GK, D, M or F)")]
pub struct ParsePositionError(pub String);

impl Position {
    pub const ALL: [Position; 4] = [Position::GK, Position::D, Position::M, Position::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::D => "D",
            Position::M => "M",
            Position::F => "F",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match: "f" or " F " are not F.
        match s {
            "GK" => Ok(Position::GK),
            "D" => Ok(Position::D),
            "M" => Ok(Position::M),
            "F" => Ok(Position::F),
            _ => Err(ParsePositionError(s.to_string())),
        }
    }
}

/// Position selector: either every position or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Only(Position),
}

impl PositionFilter {
    /// Choices in the order the position selector lists them.
    pub fn choices() -> impl Iterator<Item = PositionFilter> {
        std::iter::once(PositionFilter::All).chain(Position::ALL.into_iter().map(PositionFilter::Only))
    }

    pub fn accepts(&self, position: Option<Position>) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Only(wanted) => position == Some(*wanted),
        }
    }
}

impl fmt::Display for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionFilter::All => f.write_str("All"),
            PositionFilter::Only(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for PositionFilter {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(PositionFilter::All)
        } else {
            s.parse().map(PositionFilter::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the numeric columns usable as chart axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Minutes,
    Goals,
    Assists,
    Shots,
    Xg,
    Xa,
    KeyPasses,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Minutes,
        Metric::Goals,
        Metric::Assists,
        Metric::Shots,
        Metric::Xg,
        Metric::Xa,
        Metric::KeyPasses,
    ];

    /// Column name in the source file.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Minutes => "minutes",
            Metric::Goals => "goals",
            Metric::Assists => "assists",
            Metric::Shots => "shots",
            Metric::Xg => "xg",
            Metric::Xa => "xa",
            Metric::KeyPasses => "key_passes",
        }
    }

    /// Human-readable axis label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Minutes => "Minutes",
            Metric::Goals => "Goals",
            Metric::Assists => "Assists",
            Metric::Shots => "Shots",
            Metric::Xg => "xG",
            Metric::Xa => "xA",
            Metric::KeyPasses => "Key passes",
        }
    }

    fn expected_names() -> String {
        Metric::ALL
            .iter()
            .map(|m| m.column())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| StatsError::InvalidField {
                field: s.to_string(),
                expected: Metric::expected_names(),
            })
    }
}

// ---------------------------------------------------------------------------
// PlayerSeasonRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One player's aggregated stats for a season.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonRecord {
    pub player: String,
    pub team: String,
    pub league: String,
    /// `None` when the source value is null or not a known position.
    pub primary_position: Option<Position>,
    pub minutes: u32,
    pub goals: f64,
    pub assists: f64,
    pub shots: f64,
    pub xg: f64,
    pub xa: f64,
    pub key_passes: f64,
    /// Remaining columns: column_name → value.
    pub extra: BTreeMap<String, MetadataValue>,
}

impl PlayerSeasonRecord {
    /// Value of a metric column; nulls in the source are NaN.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Minutes => f64::from(self.minutes),
            Metric::Goals => self.goals,
            Metric::Assists => self.assists,
            Metric::Shots => self.shots,
            Metric::Xg => self.xg,
            Metric::Xa => self.xa,
            Metric::KeyPasses => self.key_passes,
        }
    }

    pub fn position_label(&self) -> &'static str {
        self.primary_position.map(|p| p.as_str()).unwrap_or("–")
    }
}

// ---------------------------------------------------------------------------
// PlayerDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct PlayerDataset {
    pub records: Vec<PlayerSeasonRecord>,
    /// Ordered names of the non-core columns kept in `extra`.
    pub extra_columns: Vec<String>,
    /// Every league that appears in `records`.
    pub leagues: BTreeSet<String>,
}

impl PlayerDataset {
    pub fn from_records(records: Vec<PlayerSeasonRecord>, extra_columns: Vec<String>) -> Self {
        let leagues = records.iter().map(|r| r.league.clone()).collect();
        PlayerDataset {
            records,
            extra_columns,
            leagues,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parsing() {
        assert_eq!("GK".parse::<Position>().unwrap(), Position::GK);
        assert_eq!("F".parse::<Position>().unwrap(), Position::F);
        assert!("ST".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_parsing_is_exact() {
        assert!("f".parse::<Position>().is_err());
        assert!(" F ".parse::<Position>().is_err());
        assert!("gk".parse::<Position>().is_err());
        assert!("all".parse::<PositionFilter>().is_err());
    }

    #[test]
    fn test_position_filter_parsing_and_choices() {
        assert_eq!("All".parse::<PositionFilter>().unwrap(), PositionFilter::All);
        assert_eq!(
            "M".parse::<PositionFilter>().unwrap(),
            PositionFilter::Only(Position::M)
        );
        let labels: Vec<String> = PositionFilter::choices().map(|c| c.to_string()).collect();
        assert_eq!(labels, ["All", "GK", "D", "M", "F"]);
    }

    #[test]
    fn test_position_filter_without_position() {
        assert!(PositionFilter::All.accepts(None));
        assert!(!PositionFilter::Only(Position::D).accepts(None));
        assert!(PositionFilter::Only(Position::D).accepts(Some(Position::D)));
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("key_passes".parse::<Metric>().unwrap(), Metric::KeyPasses);
        match "team".parse::<Metric>() {
            Err(StatsError::InvalidField { field, expected }) => {
                assert_eq!(field, "team");
                assert!(expected.contains("xg"));
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_dataset_collects_leagues() {
        let rec = |league: &str| PlayerSeasonRecord {
            player: "p".into(),
            team: "t".into(),
            league: league.into(),
            primary_position: None,
            minutes: 0,
            goals: 0.0,
            assists: 0.0,
            shots: 0.0,
            xg: 0.0,
            xa: 0.0,
            key_passes: 0.0,
            extra: BTreeMap::new(),
        };
        let ds = PlayerDataset::from_records(vec![rec("B"), rec("A"), rec("B")], Vec::new());
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.leagues.iter().collect::<Vec<_>>(), ["A", "B"]);
    }
}
