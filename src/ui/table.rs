// Tabular view of the filtered players. Purely a view over AppState.

use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Metric, PlayerSeasonRecord};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

pub fn players_table(ui: &mut Ui, state: &AppState) {
    let filtered = state.filtered();
    let extra_columns: &[String] = state
        .dataset
        .as_ref()
        .map(|ds| ds.extra_columns.as_slice())
        .unwrap_or_default();

    ui.label(format!("N: {}", filtered.len()));

    let mut headers: Vec<&str> = vec!["player", "team", "league", "primary_position"];
    headers.extend(Metric::ALL.iter().map(|m| m.column()));
    headers.extend(extra_columns.iter().map(String::as_str));

    egui::ScrollArea::horizontal()
        .id_salt("players_table_hscroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(Column::initial(160.0).at_least(60.0).clip(true))
                .columns(Column::initial(120.0).at_least(40.0).clip(true), 2)
                .columns(Column::auto().at_least(40.0), headers.len() - 3)
                .header(20.0, |mut header| {
                    for name in &headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, filtered.len(), |mut row| {
                        let Some(rec) = filtered.get(row.index()) else {
                            return;
                        };
                        for cell in row_cells(rec, extra_columns) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}

/// Display text for every column of a record, in header order.
fn row_cells(rec: &PlayerSeasonRecord, extra_columns: &[String]) -> Vec<String> {
    let mut cells = vec![
        rec.player.clone(),
        rec.team.clone(),
        rec.league.clone(),
        rec.position_label().to_string(),
    ];
    cells.extend(Metric::ALL.iter().map(|&m| format_metric(rec.metric(m))));
    cells.extend(
        extra_columns
            .iter()
            .map(|col| rec.extra.get(col).map(|v| v.to_string()).unwrap_or_default()),
    );
    cells
}

fn format_metric(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{record, with_xg_goals};
    use crate::data::model::{MetadataValue, Position};

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(12.0), "12");
        assert_eq!(format_metric(0.456), "0.46");
        assert_eq!(format_metric(f64::NAN), "");
    }

    #[test]
    fn test_row_cells_follow_header_order() {
        let mut rec = with_xg_goals(record("Ana", "Serie A", Some(Position::F), 2430), 9.4, f64::NAN);
        rec.extra.insert("age".into(), MetadataValue::Integer(24));
        let cells = row_cells(&rec, &["age".to_string(), "foot".to_string()]);
        assert_eq!(cells.len(), 4 + Metric::ALL.len() + 2);
        assert_eq!(&cells[..5], ["Ana", "Ana FC", "Serie A", "F", "2430"]);
        assert_eq!(cells[5], "");
        assert_eq!(cells[8], "9.40");
        assert_eq!(cells[11], "24");
        assert_eq!(cells[12], "");
    }
}
