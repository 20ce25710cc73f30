use crate::color::PositionColors;
use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterCriteria, FilteredSet, MAX_MINUTES};
use crate::data::model::{Metric, PlayerDataset, PositionFilter};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Views offered in the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Table,
    XgVsGoals,
    CustomAnalysis,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Table, Tab::XgVsGoals, Tab::CustomAnalysis];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Table => "Table",
            Tab::XgVsGoals => "xG vs. Goals",
            Tab::CustomAnalysis => "Custom Analysis",
        }
    }
}

/// The full UI state of one session, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<PlayerDataset>,

    /// Current position / minutes selection.
    pub criteria: FilterCriteria,

    /// Indices of records passing `criteria` (cached).
    pub visible_indices: Vec<usize>,

    pub active_tab: Tab,

    /// Axes of the custom scatter.
    pub x_axis: Metric,
    pub y_axis: Metric,

    /// Leagues shown in the bar chart.
    pub top_n: usize,

    pub colors: PositionColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            criteria: config.initial_criteria(),
            visible_indices: Vec::new(),
            active_tab: Tab::default(),
            x_axis: Metric::Minutes,
            y_axis: Metric::Minutes,
            top_n: config.top_n,
            colors: PositionColors::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and apply the current criteria to it.
    pub fn set_dataset(&mut self, dataset: PlayerDataset) {
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(&ds.records, self.criteria);
            log::debug!(
                "position={} minutes>={} -> {}/{} players",
                self.criteria.position,
                self.criteria.minimum_minutes,
                self.visible_indices.len(),
                ds.len()
            );
        } else {
            self.visible_indices.clear();
        }
    }

    pub fn set_position(&mut self, position: PositionFilter) {
        if self.criteria.position != position {
            self.criteria.position = position;
            self.refilter();
        }
    }

    /// Values above a full season (38 × 90) are clamped.
    pub fn set_minimum_minutes(&mut self, minutes: u32) {
        let minutes = minutes.min(MAX_MINUTES);
        if self.criteria.minimum_minutes != minutes {
            self.criteria.minimum_minutes = minutes;
            self.refilter();
        }
    }

    /// The records currently visible.
    pub fn filtered(&self) -> FilteredSet<'_> {
        self.dataset
            .as_ref()
            .map(|ds| ds.view(&self.visible_indices))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;
    use crate::data::model::Position;

    fn dataset() -> PlayerDataset {
        PlayerDataset::from_records(
            vec![
                record("Ana", "Serie A", Some(Position::F), 2000),
                record("Ben", "Serie A", Some(Position::M), 100),
                record("Cal", "La Liga", Some(Position::F), 150),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();
        assert!(state.filtered().is_empty());
        assert_eq!(state.criteria.minimum_minutes, 180);
        assert_eq!(state.active_tab, Tab::Table);
        assert_eq!((state.x_axis, state.y_axis), (Metric::Minutes, Metric::Minutes));
    }

    #[test]
    fn test_tab_titles() {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        assert_eq!(titles, ["Table", "xG vs. Goals", "Custom Analysis"]);
    }

    #[test]
    fn test_set_dataset_applies_criteria() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.visible_indices, [0]);
    }

    #[test]
    fn test_criteria_changes_refilter() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.set_minimum_minutes(0);
        assert_eq!(state.visible_indices, [0, 1, 2]);

        state.set_position(PositionFilter::Only(Position::F));
        let names: Vec<&str> = state.filtered().iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, ["Ana", "Cal"]);

        state.set_minimum_minutes(10_000);
        assert_eq!(state.criteria.minimum_minutes, MAX_MINUTES);
        assert!(state.filtered().is_empty());
    }

    #[test]
    fn test_config_seeds_state() {
        let config = DashboardConfig {
            default_position: "M".into(),
            default_minimum_minutes: 0,
            top_n: 5,
            ..DashboardConfig::default()
        };
        let mut state = AppState::new(&config);
        state.set_dataset(dataset());
        assert_eq!(state.top_n, 5);
        assert_eq!(state.visible_indices, [1]);
    }
}
