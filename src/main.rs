use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::debug;

use homework_rs::base::account::Credentials;
use homework_rs::base::session::Session;
use homework_rs::workflow::{submit_homework, view_homework};
use homework_rs::Error;

const SETTINGS_FILE: &str = "settings.conf";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Submit homework
    #[arg(short = 's', long = "file", value_name = "FILE", conflicts_with = "view")]
    file: Option<PathBuf>,

    /// View homework
    #[arg(short, long)]
    view: bool,

    /// Settings file (defaults to settings.conf next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.file.is_none() && !args.view {
        if let Err(e) = Args::command().print_help() {
            debug!("failed to print help: {}", e);
        }
        return ExitCode::SUCCESS;
    }

    tokio::select! {
        result = run(args) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(Error::Interrupted) => {
                println!("\n{}", Error::Interrupted);
                ExitCode::SUCCESS
            }
            // nothing to work with is not a failure
            Err(Error::EmptyResult(message)) => {
                println!("{}", message);
                ExitCode::SUCCESS
            }
            Err(e) => {
                debug!("{:?}", e);
                println!("{}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\nExiting...");
            // a prompt might still be waiting for input on the blocking pool
            std::process::exit(0);
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let settings = args.config.unwrap_or_else(default_settings);
    let credentials = Credentials::load(&settings).await?;
    let mut session = Session::new(credentials)?;

    match args.file {
        Some(file) => submit_homework(&mut session, &file).await,
        None => view_homework(&mut session).await,
    }
}

fn default_settings() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SETTINGS_FILE)))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}
