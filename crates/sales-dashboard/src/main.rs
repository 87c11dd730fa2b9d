mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::density::DensityConfig;
use dashboard_data::views::ViewConfig;
use dashboard_runtime::{DashboardSession, Dataset};
use dashboard_ui::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The dashboard owns the terminal, so its logs default to a file.
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(bootstrap::default_log_file()),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, View: {}, Theme: {}",
        settings.data.display(),
        settings.view,
        settings.theme
    );

    if !settings.sales_axis_max.is_finite() || settings.sales_axis_max <= 0.0 {
        bail!(
            "--sales-axis-max must be a positive number, got {}",
            settings.sales_axis_max
        );
    }

    let dataset = Dataset::shared(&settings.data)
        .with_context(|| format!("Failed to load sales data from {}", settings.data.display()))?;
    if dataset.is_empty() {
        tracing::warn!("{} contains no order lines", settings.data.display());
    }

    let criteria = dataset.initial_criteria(
        settings.start_date,
        settings.end_date,
        settings.state_filter(),
        settings.city_filter(),
    );
    let config = ViewConfig {
        density: DensityConfig::square(
            usize::from(settings.heatmap_bins),
            settings.sales_axis_max,
        ),
    };
    let session = DashboardSession::with_config(dataset, criteria, config);
    let top = usize::from(settings.top_products);

    match settings.view.as_str() {
        "dashboard" => {
            App::new(session, &settings.theme, top)
                .run()
                .context("Terminal dashboard failed")?;
        }
        "summary" => print!("{}", report::render_summary(&session, top)?),
        "json" => println!("{}", report::render_json(&session)?),
        unknown => bail!("Unknown view mode: {}", unknown),
    }

    Ok(())
}
