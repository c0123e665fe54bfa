use clap::Parser;
use tracing::debug;
use ydocs_cli::{Cli, CliError, Command, ExitOnError, commands, get_configuration};
use ydocs_server::telemetry::{get_subscriber, init_subscriber};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_subscriber(get_subscriber(cli.loglevel.to_lowercase()))?;

    if let Err(e) = run_cli(&cli) {
        e.exit_with_tips();
    }

    Ok(())
}

fn run_cli(cli: &Cli) -> Result<(), CliError> {
    match cli.command() {
        Command::Init => commands::configuration::create_config_template(),
        command @ (Command::Serve { .. } | Command::List { .. }) => run_with_config(&command),
    }
}

fn run_with_config(command: &Command) -> Result<(), CliError> {
    let settings = Cli::settings_for(command, &get_configuration()?);
    debug!(?settings, "resolved settings");

    match command {
        Command::Init => unreachable!("Init is handled elsewhere"),
        Command::List { format, .. } => {
            commands::list::handle(&settings.document_source(), format).or_exit();
        }
        Command::Serve { .. } => commands::server::start_server(settings)?,
    }

    Ok(())
}
