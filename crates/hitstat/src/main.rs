mod bootstrap;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use hitstat_core::settings::Settings;
use hitstat_runtime::loader::find_input_files;
use hitstat_runtime::session::SessionState;
use hitstat_runtime::upload::upload_all;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("hitstat v{} starting", env!("CARGO_PKG_VERSION"));

    let paths: Vec<PathBuf> = settings
        .inputs
        .iter()
        .flat_map(|input| find_input_files(input))
        .collect();

    if paths.is_empty() {
        bail!("no input files found");
    }
    tracing::info!("Uploading {} file(s)", paths.len());

    let mut session = SessionState::new();
    let reports = upload_all(&mut session, paths).await;

    for report in &reports {
        match &report.result {
            Ok(_) => tracing::info!("{}", report.message()),
            Err(e) => tracing::warn!(error = %e, "{}", report.message()),
        }
    }

    if settings.wants_json() {
        let value = report::render_json(&session, &reports)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", report::render_table(&session, &reports));
    }

    if !reports.iter().any(|r| r.is_success()) {
        bail!("none of the {} file(s) could be used", reports.len());
    }

    Ok(())
}
