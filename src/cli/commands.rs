//! Command dispatch for the netfire binary

use std::fs::File;
use std::io::{self, BufReader};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{Environment, EscapeNetworks, FireBreaker, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands, SessionArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{terminal, IoResultExt};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::EscapeNetworks(args)) => {
            let settings = load_settings(cli)?;
            let strict = settings.session.strict;
            interpret(EscapeNetworks::new(settings.escape), args, strict)
        }
        Some(Commands::FireBreaker(args)) => {
            let settings = load_settings(cli)?;
            let strict = settings.session.strict;
            interpret(FireBreaker::new(settings.fire), args, strict)
        }
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage("no command given, see --help".into())),
    }
}

/// Settings from all layers, with `--strict` forcing strict mode.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.strict {
        settings.session.strict = true;
    }
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

#[instrument(level = "debug", skip(environment))]
fn interpret<E: Environment>(environment: E, args: &SessionArgs, strict: bool) -> CliResult<()> {
    let mut session = Session::new(environment);
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let outcome = match &args.script {
        Some(path) => {
            let file = File::open(path).io_context(&format!("open script {}", path.display()))?;
            terminal::run(&mut session, BufReader::new(file), &mut output, strict)?
        }
        None => terminal::run(&mut session, io::stdin().lock(), &mut output, strict)?,
    };
    debug!("interpret: session ended with {:?}", outcome);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                output::info(&path.display());
                if !path.exists() {
                    output::warning("file does not exist yet, defaults apply");
                }
            }
            None => {
                return Err(CliError::Usage(
                    "no config directory available on this platform".into(),
                ))
            }
        },
    }
    Ok(())
}
