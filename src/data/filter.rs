use super::model::{PlayerDataset, PlayerSeasonRecord, PositionFilter};

/// 38 matches × 90 minutes: upper bound of the minutes selector.
pub const MAX_MINUTES: u32 = 38 * 90;

/// Default minutes threshold when a session starts.
pub const DEFAULT_MINIMUM_MINUTES: u32 = 180;

// ---------------------------------------------------------------------------
// Filter criteria: position + minutes threshold
// ---------------------------------------------------------------------------

/// The user's current selection. Passed by value into the filter functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub position: PositionFilter,
    pub minimum_minutes: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            position: PositionFilter::All,
            minimum_minutes: DEFAULT_MINIMUM_MINUTES,
        }
    }
}

impl FilterCriteria {
    pub fn new(position: PositionFilter, minimum_minutes: u32) -> Self {
        Self {
            position,
            minimum_minutes,
        }
    }

    /// A record passes when it has played enough minutes and its position is selected.
    pub fn matches(&self, record: &PlayerSeasonRecord) -> bool {
        record.minutes >= self.minimum_minutes && self.position.accepts(record.primary_position)
    }
}

// ---------------------------------------------------------------------------
// FilteredSet – borrowed view of the matching rows
// ---------------------------------------------------------------------------

/// Records matching a set of criteria, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSet<'a> {
    records: Vec<&'a PlayerSeasonRecord>,
}

impl<'a> FilteredSet<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PlayerSeasonRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn get(&self, i: usize) -> Option<&'a PlayerSeasonRecord> {
        self.records.get(i).copied()
    }
}

impl<'a> FromIterator<&'a PlayerSeasonRecord> for FilteredSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a PlayerSeasonRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl PlayerDataset {
    /// View of the rows at `indices` (out-of-range indices are skipped).
    pub fn view(&self, indices: &[usize]) -> FilteredSet<'_> {
        indices.iter().filter_map(|&i| self.records.get(i)).collect()
    }

    /// View of every row.
    pub fn all(&self) -> FilteredSet<'_> {
        self.records.iter().collect()
    }
}

/// Keep the records that satisfy `criteria`, preserving order.
///
/// Accepts any sequence of record references, so a [`FilteredSet`] can be
/// narrowed again with `filter(set.iter(), criteria)`.
pub fn filter<'a, I>(records: I, criteria: FilterCriteria) -> FilteredSet<'a>
where
    I: IntoIterator<Item = &'a PlayerSeasonRecord>,
{
    records
        .into_iter()
        .filter(|rec| criteria.matches(rec))
        .collect()
}

/// Return indices of records that pass `criteria`.
pub fn filtered_indices(records: &[PlayerSeasonRecord], criteria: FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
