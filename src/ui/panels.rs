use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::MAX_MINUTES;
use crate::data::model::PositionFilter;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Position selector ----
    ui.strong("Tactical Position");
    let current = state.criteria.position;
    egui::ComboBox::from_id_salt("position")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in PositionFilter::choices() {
                if ui
                    .selectable_label(current == choice, choice.to_string())
                    .clicked()
                {
                    state.set_position(choice);
                }
            }
        });
    ui.add_space(8.0);

    // ---- Minutes threshold ----
    ui.strong("Minutes Played");
    let mut minutes = state.criteria.minimum_minutes;
    if ui
        .add(egui::Slider::new(&mut minutes, 0..=MAX_MINUTES))
        .changed()
    {
        state.set_minimum_minutes(minutes);
    }
    ui.separator();

    // ---- Colour key for the scatter plots ----
    ui.strong("Position colours");
    for (label, color) in state.colors.legend_entries() {
        ui.label(RichText::new(format!("● {label}")).color(color));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} players loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Render the tab selector.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open player season stats")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load `path` and make it the session's dataset; failures go to the status line.
pub fn load_into(state: &mut AppState, path: &Path) {
    match crate::data::loader::load_file(path) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
