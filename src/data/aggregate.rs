use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::filter::FilteredSet;
use super::model::{Metric, Position};
use crate::error::{StatsError, StatsResult};

/// Default number of leagues shown in the bar chart.
pub const DEFAULT_TOP_N: usize = 20;

// ---------------------------------------------------------------------------
// League counts (bar chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueCountRow {
    pub league: String,
    pub count: usize,
}

/// Number of players per league, largest first, at most `top_n` rows.
/// Equal counts are ordered by league name.
pub fn count_by_league(filtered: &FilteredSet<'_>, top_n: usize) -> Vec<LeagueCountRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in filtered.iter() {
        *counts.entry(rec.league.as_str()).or_default() += 1;
    }

    // BTreeMap iteration is name-ordered and the sort is stable, so ties stay alphabetical.
    let mut rows: Vec<LeagueCountRow> = counts
        .into_iter()
        .map(|(league, count)| LeagueCountRow {
            league: league.to_string(),
            count,
        })
        .collect();
    rows.sort_by_key(|row| Reverse(row.count));
    rows.truncate(top_n);
    rows
}

// ---------------------------------------------------------------------------
// Scatter data
// ---------------------------------------------------------------------------

/// One plotted player, with the fields shown on hover.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub player: String,
    pub team: String,
    pub league: String,
    pub position: Option<Position>,
}

/// Resolve two axis names against the metric set.
pub fn parse_axes(x_field: &str, y_field: &str) -> StatsResult<(Metric, Metric)> {
    Ok((x_field.parse()?, y_field.parse()?))
}

/// (x, y) pairs for two metric columns named by the caller.
pub fn scatter_pairs(
    filtered: &FilteredSet<'_>,
    x_field: &str,
    y_field: &str,
) -> StatsResult<Vec<ScatterPoint>> {
    let (x, y) = parse_axes(x_field, y_field)?;
    Ok(scatter_metrics(filtered, x, y))
}

/// Typed form of [`scatter_pairs`]. Rows with a null (NaN) value on either axis are skipped.
pub fn scatter_metrics(filtered: &FilteredSet<'_>, x: Metric, y: Metric) -> Vec<ScatterPoint> {
    filtered
        .iter()
        .filter_map(|rec| {
            let (xv, yv) = (rec.metric(x), rec.metric(y));
            if xv.is_nan() || yv.is_nan() {
                return None;
            }
            Some(ScatterPoint {
                x: xv,
                y: yv,
                player: rec.player.clone(),
                team: rec.team.clone(),
                league: rec.league.clone(),
                position: rec.primary_position,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reference diagonal
// ---------------------------------------------------------------------------

/// The y = x line from the origin to `(max, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub max: f64,
}

impl ReferenceLine {
    pub fn start(&self) -> [f64; 2] {
        [0.0, 0.0]
    }

    pub fn end(&self) -> [f64; 2] {
        [self.max, self.max]
    }
}

/// Bound a reference diagonal by the largest value of either axis.
pub fn reference_diagonal(
    filtered: &FilteredSet<'_>,
    x_field: &str,
    y_field: &str,
) -> StatsResult<ReferenceLine> {
    let (x, y) = parse_axes(x_field, y_field)?;
    diagonal_metrics(filtered, x, y)
}

/// Typed form of [`reference_diagonal`]. NaN values are ignored.
pub fn diagonal_metrics(filtered: &FilteredSet<'_>, x: Metric, y: Metric) -> StatsResult<ReferenceLine> {
    filtered
        .iter()
        .flat_map(|rec| [rec.metric(x), rec.metric(y)])
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
        .map(|max| ReferenceLine { max })
        .ok_or(StatsError::EmptyInput)
}
