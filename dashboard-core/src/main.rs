// NGO Dashboard - prints the overview snapshot as JSON
// Entry point and logging setup

use anyhow::Context;
use ngo_dashboard::dataset::{seed_dataset, Dataset};
use ngo_dashboard::services::{build_snapshot, SettingsService};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DATASET_FILE: &str = "dataset.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the snapshot
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ngo_dashboard=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    tracing::info!("Starting NGO dashboard with data directory {:?}", data_dir);

    let settings = SettingsService::new(data_dir.clone())
        .load()
        .await
        .context("failed to load settings")?;

    let dataset_path = data_dir.join(DATASET_FILE);
    let dataset = if dataset_path.exists() {
        Dataset::load(&dataset_path)
            .await
            .with_context(|| format!("failed to load {}", dataset_path.display()))?
    } else {
        tracing::info!("No dataset file found, using the embedded seed");
        seed_dataset().context("embedded seed dataset is invalid")?
    };

    let snapshot = build_snapshot(&dataset, chrono::Utc::now(), &settings);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
