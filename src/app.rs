use std::path::Path;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PlayerScoutApp {
    pub state: AppState,
    title: String,
}

impl PlayerScoutApp {
    /// Build the app and open `dataset` if one was given.
    pub fn new(config: &DashboardConfig, dataset: Option<&Path>) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = dataset {
            panels::load_into(&mut state, path);
        }
        Self {
            state,
            title: config.title.clone(),
        }
    }
}

impl eframe::App for PlayerScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: title, tabs, active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            panels::tab_bar(ui, &mut self.state);
            ui.separator();

            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view players  (File → Open…)");
                });
                return;
            }

            match self.state.active_tab {
                Tab::Table => table::players_table(ui, &self.state),
                Tab::XgVsGoals => plot::xg_goals_view(ui, &self.state),
                Tab::CustomAnalysis => plot::custom_view(ui, &mut self.state),
            }
        });
    }
}
