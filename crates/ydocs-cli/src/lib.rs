pub mod clierror;
pub mod commands;
pub mod configuration;

pub use clierror::*;
pub use configuration::get_configuration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use ydocs_common::{DocumentSource, ParseFailurePolicy};

use crate::configuration::{AppSettings, Settings};

#[derive(Parser, Debug)]
#[command(version, about = "Serves YAML document templates as JSON", long_about = None, before_help = r"
       _
 _   _| | ___   ___ ___
| | | | |/ _ \ / __/ __|
| |_| | | (_) | (__\__ \
 \__, |_|\___/ \___|___/
 |___/
")]
pub struct Cli {
    #[arg(long = "log-level", default_value = "INFO")]
    pub loglevel: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Writes a configuration template to `configuration/config.yml`.
    Init,
    /// Starts the HTTP server.
    Serve {
        /// Address to bind.
        #[clap(short = 'I', long)]
        interface: Option<IpAddr>,

        /// Port to listen on.
        #[clap(short = 'P', long)]
        port: Option<u16>,

        /// Directory holding the YAML documents.
        #[clap(short = 'S', long)]
        source_dir: Option<Utf8PathBuf>,

        /// What to do with documents that fail to parse.
        #[arg(value_enum, long)]
        on_parse_error: Option<OnParseError>,
    },
    /// Loads the source directory once and prints what was found.
    List {
        /// Directory holding the YAML documents.
        #[clap(short = 'S', long)]
        source_dir: Option<Utf8PathBuf>,

        #[arg(value_enum, short = 'F', long, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OnParseError {
    Abort,
    Skip,
}

impl From<OnParseError> for ParseFailurePolicy {
    fn from(value: OnParseError) -> Self {
        match value {
            OnParseError::Abort => ParseFailurePolicy::Abort,
            OnParseError::Skip => ParseFailurePolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

/// `serve` flags that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
    pub source_dir: Option<Utf8PathBuf>,
    pub on_parse_error: Option<OnParseError>,
}

impl ServerOverrides {
    pub fn new(
        interface: Option<IpAddr>,
        port: Option<u16>,
        source_dir: Option<Utf8PathBuf>,
        on_parse_error: Option<OnParseError>,
    ) -> Self {
        Self {
            interface,
            port,
            source_dir,
            on_parse_error,
        }
    }

    pub fn apply(self, settings: &AppSettings) -> AppSettings {
        AppSettings {
            name: settings.name.clone(),
            host: self.interface.unwrap_or(settings.host),
            port: self.port.unwrap_or(settings.port),
            source_dir: self
                .source_dir
                .unwrap_or_else(|| settings.source_dir.clone()),
            on_parse_error: self
                .on_parse_error
                .map_or(settings.on_parse_error, ParseFailurePolicy::from),
        }
    }
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone()
    }

    /// Resolves the effective application settings for `command`.
    pub fn settings_for(command: &Command, settings: &Settings) -> AppSettings {
        match command {
            Command::Serve {
                interface,
                port,
                source_dir,
                on_parse_error,
            } => ServerOverrides::new(*interface, *port, source_dir.clone(), *on_parse_error)
                .apply(&settings.app_settings),
            Command::List { source_dir, .. } => ServerOverrides {
                source_dir: source_dir.clone(),
                ..ServerOverrides::default()
            }
            .apply(&settings.app_settings),
            Command::Init => settings.app_settings.clone(),
        }
    }
}

impl AppSettings {
    pub fn document_source(&self) -> DocumentSource {
        DocumentSource::new(self.source_dir.clone(), self.on_parse_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> Settings {
        Settings {
            app_settings: AppSettings {
                name: "ydocs".into(),
                port: 8000,
                host: "127.0.0.1".parse().unwrap(),
                source_dir: "yml".into(),
                on_parse_error: ParseFailurePolicy::Abort,
            },
        }
    }

    #[test]
    fn serve_flags_override_configuration() {
        let cli = Cli::parse_from([
            "ydocs",
            "serve",
            "-P",
            "9001",
            "--source-dir",
            "docs",
            "--on-parse-error",
            "skip",
        ]);

        let resolved = Cli::settings_for(&cli.command(), &settings());
        assert_eq!(resolved.port, 9001);
        assert_eq!(resolved.host.to_string(), "127.0.0.1");
        assert_eq!(resolved.source_dir, "docs");
        assert_eq!(resolved.on_parse_error, ParseFailurePolicy::Skip);
    }

    #[test]
    fn configuration_is_kept_without_flags() {
        let cli = Cli::parse_from(["ydocs", "serve"]);

        let resolved = Cli::settings_for(&cli.command(), &settings());
        assert_eq!(resolved.port, 8000);
        assert_eq!(resolved.source_dir, "yml");
        assert_eq!(resolved.on_parse_error, ParseFailurePolicy::Abort);
    }

    #[test]
    fn list_defaults_to_pretty() {
        let cli = Cli::parse_from(["ydocs", "list", "-S", "docs"]);
        match cli.command() {
            Command::List { source_dir, format } => {
                assert_eq!(source_dir, Some(Utf8PathBuf::from("docs")));
                assert_eq!(format, Format::Pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
