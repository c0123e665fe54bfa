use clap::crate_version;
use std::time::Instant;
use ydocs_server::{ApplicationSettings, startup::run_server};

use crate::CliError;
use crate::configuration::AppSettings;

pub fn start_server(settings: AppSettings) -> Result<(), CliError> {
    let start = Instant::now();
    let version = crate_version!().to_owned();

    let configuration = ApplicationSettings::new(
        settings.name,
        version,
        settings.port,
        settings.host,
        settings.source_dir,
        settings.on_parse_error,
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_server(configuration, start))?;

    Ok(())
}
