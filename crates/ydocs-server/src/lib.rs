pub mod into_http;
pub mod routes;
pub mod startup;
pub mod telemetry;

use camino::Utf8PathBuf;
use std::net::IpAddr;
use ydocs_common::{DocumentSource, ParseFailurePolicy};

#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    pub name: String,
    pub version: String,
    pub port: u16,
    pub host: IpAddr,
    pub source_dir: Utf8PathBuf,
    pub on_parse_error: ParseFailurePolicy,
}

impl ApplicationSettings {
    #[must_use]
    pub fn new(
        name: String,
        version: String,
        port: u16,
        host: IpAddr,
        source_dir: Utf8PathBuf,
        on_parse_error: ParseFailurePolicy,
    ) -> Self {
        Self {
            name,
            version,
            port,
            host,
            source_dir,
            on_parse_error,
        }
    }

    pub fn document_source(&self) -> DocumentSource {
        DocumentSource::new(self.source_dir.clone(), self.on_parse_error)
    }
}
