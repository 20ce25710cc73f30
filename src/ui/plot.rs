use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::PositionColors;
use crate::data::aggregate::{
    count_by_league, diagonal_metrics, scatter_metrics, ReferenceLine, ScatterPoint,
};
use crate::data::filter::FilteredSet;
use crate::data::model::{Metric, Position};
use crate::error::StatsError;
use crate::state::AppState;

const UNCOLORED_SERIES: &str = "players";
const NO_POSITION_SERIES: &str = "–";

// ---------------------------------------------------------------------------
// xG vs. Goals tab
// ---------------------------------------------------------------------------

/// League bar chart above an xG-vs-goals scatter with a y = x reference line.
pub fn xg_goals_view(ui: &mut Ui, state: &AppState) {
    let filtered = state.filtered();

    let chart_height = (ui.available_height() / 2.0 - 8.0).max(120.0);
    league_bar_chart(ui, &filtered, state.top_n, chart_height);
    ui.separator();

    let points = scatter_metrics(&filtered, Metric::Xg, Metric::Goals);
    let diagonal = match diagonal_metrics(&filtered, Metric::Xg, Metric::Goals) {
        Ok(line) => Some(line),
        // Nothing to bound the line with: draw the points only.
        Err(StatsError::EmptyInput) => None,
        Err(e) => {
            log::warn!("reference line: {e}");
            None
        }
    };
    scatter_plot(
        ui,
        "xg_goals",
        &points,
        (Metric::Xg, Metric::Goals),
        Some(&state.colors),
        diagonal,
    );
}

/// Player counts for the `top_n` largest leagues.
pub fn league_bar_chart(ui: &mut Ui, filtered: &FilteredSet<'_>, top_n: usize, height: f32) {
    let rows = count_by_league(filtered, top_n);
    let labels: Vec<String> = rows.iter().map(|r| r.league.clone()).collect();

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| Bar::new(i as f64, row.count as f64).name(&row.league).width(0.7))
        .collect();
    let chart = BarChart::new(bars)
        .name("Players")
        .color(Color32::from_rgb(99, 110, 250));

    Plot::new("league_counts")
        .height(height)
        .y_axis_label("count")
        .x_axis_label("league")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Custom Analysis tab
// ---------------------------------------------------------------------------

/// Scatter over two user-chosen metrics.
pub fn custom_view(ui: &mut Ui, state: &mut AppState) {
    ui.columns(2, |cols| {
        axis_selector(&mut cols[0], "x_axis", "Select X-axis variable", &mut state.x_axis);
        axis_selector(&mut cols[1], "y_axis", "Select Y-axis variable", &mut state.y_axis);
    });

    let filtered = state.filtered();
    let points = scatter_metrics(&filtered, state.x_axis, state.y_axis);
    ui.label(format!("N: {}", filtered.len()));
    scatter_plot(
        ui,
        "custom_scatter",
        &points,
        (state.x_axis, state.y_axis),
        None,
        None,
    );
}

fn axis_selector(ui: &mut Ui, id: &str, label: &str, axis: &mut Metric) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(axis.column())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                ui.selectable_value(axis, metric, metric.column());
            }
        });
}

// ---------------------------------------------------------------------------
// Shared scatter rendering
// ---------------------------------------------------------------------------

/// Render scatter points, optionally coloured by position and with a diagonal.
pub fn scatter_plot(
    ui: &mut Ui,
    id: &str,
    points: &[ScatterPoint],
    (x, y): (Metric, Metric),
    colors: Option<&PositionColors>,
    diagonal: Option<ReferenceLine>,
) {
    let hover_points = points.to_vec();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x.label())
        .y_axis_label(y.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| hover_label(&hover_points, name, value, (x, y)))
        .show(ui, |plot_ui| {
            match colors {
                Some(colors) => {
                    let groups = Position::ALL.into_iter().map(Some).chain([None]);
                    for position in groups {
                        let series: Vec<[f64; 2]> = points
                            .iter()
                            .filter(|p| p.position == position)
                            .map(|p| [p.x, p.y])
                            .collect();
                        if series.is_empty() {
                            continue;
                        }
                        let name = position.map(|p| p.as_str()).unwrap_or(NO_POSITION_SERIES);
                        plot_ui.points(
                            Points::new(PlotPoints::from(series))
                                .name(name)
                                .color(colors.color_for(position))
                                .radius(3.0),
                        );
                    }
                }
                None => {
                    let series: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(PlotPoints::from(series))
                            .name(UNCOLORED_SERIES)
                            .color(Color32::from_rgb(99, 110, 250))
                            .radius(3.0),
                    );
                }
            }

            if let Some(line) = diagonal {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![line.start(), line.end()]))
                        .name("y = x")
                        .color(Color32::BLACK)
                        .width(1.0),
                );
            }
        });
}

/// Hover text: player, team and league for a hovered point, plain coordinates otherwise.
/// Only points of the hovered series are considered; players sharing the spot are counted.
fn hover_label(points: &[ScatterPoint], name: &str, value: &PlotPoint, (x, y): (Metric, Metric)) -> String {
    let coords = format!("{}: {:.2}\n{}: {:.2}", x.label(), value.x, y.label(), value.y);
    if name.is_empty() {
        return coords;
    }
    let mut hits = points.iter().filter(|p| {
        series_name(p.position, name) == name
            && (p.x - value.x).abs() < 1e-9
            && (p.y - value.y).abs() < 1e-9
    });
    let Some(first) = hits.next() else {
        return coords;
    };
    let player = match hits.count() {
        0 => first.player.clone(),
        more => format!("{} (+{more} more)", first.player),
    };
    format!("{player}\n{} · {}\n{coords}", first.team, first.league)
}

/// Legend name of the series a point is drawn in.
fn series_name(position: Option<Position>, hovered: &str) -> &str {
    // The uncoloured scatter draws every point in one series.
    if hovered == UNCOLORED_SERIES {
        return UNCOLORED_SERIES;
    }
    position.map(|p| p.as_str()).unwrap_or(NO_POSITION_SERIES)
}
