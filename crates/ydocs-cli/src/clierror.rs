use thiserror::Error;
use ydocs_common::LoadError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("{0}")]
    LoadError(#[from] LoadError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Could not serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Other: {0}")]
    Other(#[from] eyre::Report),
}

impl CliError {
    pub fn print_tip(&self) {
        match self {
            CliError::ConfigError(error) => {
                eprintln!("⚙️  Configuration error occurred:");
                eprintln!("   • Error details: {error}");
                eprintln!("   • Check that configuration/config.yml is valid YAML");
                eprintln!("   • Environment overrides look like YDOCS__APP_SETTINGS__PORT=8000");
                eprintln!("   • Run `ydocs init` to generate a template");
            }
            CliError::LoadError(error) => match error {
                LoadError::SourceNotFound(dir) => {
                    eprintln!("💡 The source directory is missing:");
                    eprintln!("   • `{dir}` does not exist");
                    eprintln!("   • Create it or point `source_dir` / `--source-dir` elsewhere");
                }
                LoadError::NotADirectory(dir) => {
                    eprintln!("💡 The source path is not a directory:");
                    eprintln!("   • `{dir}` is a file");
                }
                LoadError::Parse { file, reason } => {
                    eprintln!("💡 A document could not be parsed:");
                    eprintln!("   • File: {file}");
                    eprintln!("   • Reason: {reason}");
                    eprintln!("   • The top level of every document must be a YAML mapping");
                    eprintln!("   • Use `--on-parse-error skip` to leave broken files out");
                }
                LoadError::Io(error) => print_io_tip(error),
            },
            CliError::IoError(error) => print_io_tip(error),
            CliError::SerializeError(error) => {
                eprintln!("💡 Failed to render output as JSON:");
                eprintln!("   • {error}");
            }
            CliError::Other(error) => {
                eprintln!("💡 Unexpected error occurred:");
                eprintln!("   • Error details: {error}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError(_) => 10,
            CliError::LoadError(LoadError::Parse { .. }) => 12,
            CliError::LoadError(_) => 11,
            CliError::IoError(_) | CliError::SerializeError(_) | CliError::Other(_) => 99,
        }
    }

    pub fn exit_with_tips(self) -> ! {
        eprintln!("❌ {self}");
        self.print_tip();
        std::process::exit(self.exit_code());
    }
}

fn print_io_tip(error: &std::io::Error) {
    eprintln!("💡 File system error:");
    match error.kind() {
        std::io::ErrorKind::NotFound => {
            eprintln!("   • File or directory not found");
        }
        std::io::ErrorKind::PermissionDenied => {
            eprintln!("   • Permission denied - check file permissions");
        }
        std::io::ErrorKind::AddrInUse | std::io::ErrorKind::AddrNotAvailable => {
            eprintln!("   • The address is unavailable - try another --interface or --port");
        }
        _ => {
            eprintln!("   • {error}");
        }
    }
}

pub trait ExitOnError<T> {
    fn or_exit(self) -> T;
}

impl<T> ExitOnError<T> for Result<T, CliError> {
    fn or_exit(self) -> T {
        self.unwrap_or_else(|err| err.exit_with_tips())
    }
}
