mod app;
mod config;
mod telemetry;
mod upload;
mod utils;

use app::EasyShareApp;
use config::ShareConfig;
use eframe::CreationContext;
use upload::ShareClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = ShareConfig::from_env()?;
    let client = ShareClient::new(&config)?;

    // Network tasks run here; the UI thread only drains their results.
    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    let api_base = config.api_base.clone();
    eframe::run_native(
        "EasyShare",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(EasyShareApp::new(cc, client, handle, api_base))
        }),
    )?;

    tracing::info!("EasyShare closed");
    Ok(())
}
