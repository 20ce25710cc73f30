use std::path::PathBuf;

use eframe::egui;
use player_scout::app::PlayerScoutApp;
use player_scout::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, config_error) = match DashboardConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Ignoring config: {e:#}");
            (DashboardConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };

    // A dataset given on the command line wins over the configured one.
    let dataset: Option<PathBuf> = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.dataset.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            let mut app = PlayerScoutApp::new(&config, dataset.as_deref());
            if app.state.status_message.is_none() {
                app.state.status_message = config_error;
            }
            Ok(Box::new(app))
        }),
    )
}
