use anyhow::Result;

use confmap_builder::config;
use confmap_builder::site::SiteBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config("config.toml")?;

    // Initialize logging
    let _logging_guard = confmap_builder::logging::init_logging(
        &config.log_dir,
        "confmap-builder",
        &config.log_level,
    )?;

    tracing::info!("Conference map builder starting...");
    tracing::info!(
        "Collection '{}' (preview: {}), output: {}",
        config.cms.collection_key,
        config.cms.preview,
        config.site.output_dir
    );

    let report = SiteBuilder::new(config.clone()).build().await?;

    tracing::info!(
        "Build finished: {} conferences, {} markers, {} files",
        report.records,
        report.markers,
        report.files.len()
    );

    Ok(())
}
