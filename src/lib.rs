pub mod categories;
pub mod cli;
pub mod commands;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod state;
pub mod storage;
pub mod view;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{execute, with_notifications, Cli};
use crate::commands::{err, ok, CommandResult, Controller};
use crate::config::{load_settings, resolve_data_dir};
use crate::i18n::resolve_language;
use crate::logging::init_logging;
use crate::notify::NotificationLog;
use crate::storage::FileStore;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.clone());

    if let Err(error) = init_logging(&data_dir) {
        eprintln!("logging disabled: {error}");
    }

    let store = FileStore::new(data_dir);
    let mut settings = load_settings(&store);
    let language = cli.lang.as_deref().unwrap_or(settings.language.as_str());
    let lang = resolve_language(language);
    log::debug!(
        "starting command={:?} data_dir={}",
        cli.command,
        store.root().display()
    );

    let mut controller = Controller::load(store, NotificationLog::new(), lang);
    let result = execute(&cli.command, &mut controller, &mut settings);
    let result: CommandResult<cli::Rendered> = match result {
        Ok(rendered) => ok(with_notifications(rendered, controller.notifier().take())),
        Err(message) => {
            log::warn!("command rejected: {message}");
            err(&message)
        }
    };
    print_result(&result, cli.json)
}

fn print_result(result: &CommandResult<cli::Rendered>, json: bool) -> ExitCode {
    if json {
        let envelope = CommandResult {
            ok: result.ok,
            data: result.data.as_ref().map(|rendered| &rendered.data),
            error: result.error.clone(),
        };
        match serde_json::to_string_pretty(&envelope) {
            Ok(text) => println!("{text}"),
            Err(error) => {
                eprintln!("json error: {error}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        if let Some(rendered) = &result.data {
            for line in &rendered.lines {
                println!("{line}");
            }
        }
        if let Some(error) = &result.error {
            eprintln!("error: {error}");
        }
    }
    if result.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
