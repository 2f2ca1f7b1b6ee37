mod command;
mod config;
mod console;
mod render;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use command::{Command, CommandError, HELP};
use config::Cli;
use console::{ConsoleHaptics, ConsoleNarrator};
use services::{NarrationDevice, SessionController, SpeechCoordinator, TaskGenerator, TaskSource};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Board goes to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_controller(cli: &Cli) -> Result<SessionController, config::ConfigError> {
    let settings = config::load_settings(cli)?;

    let device: Option<Arc<dyn NarrationDevice>> = if cli.silent {
        None
    } else {
        Some(Arc::new(ConsoleNarrator::new()))
    };
    let tasks: Arc<dyn TaskSource> = match cli.seed {
        Some(seed) => Arc::new(TaskGenerator::seeded(seed)),
        None => Arc::new(TaskGenerator::new()),
    };

    let speech = SpeechCoordinator::new(device, settings.speech().clone());
    Ok(SessionController::new(&settings, speech)
        .with_haptics(Arc::new(ConsoleHaptics))
        .with_task_source(tasks))
}

/// Each input event runs as its own task so a newer one can supersede it.
fn dispatch(controller: &SessionController, command: Command) {
    let controller = controller.clone();
    match command {
        Command::Digit(digit) => {
            tokio::spawn(async move { controller.press_digit(digit).await });
        }
        Command::Choose(index) => {
            tokio::spawn(async move {
                if let Err(err) = controller.choose_option(index).await {
                    warn!(error = %err, index, "answer rejected");
                }
            });
        }
        Command::ToggleQuiz => {
            tokio::spawn(async move {
                if let Err(err) = controller.toggle_quiz_mode().await {
                    warn!(error = %err, "could not switch quiz mode");
                }
            });
        }
        Command::NextTask => {
            tokio::spawn(async move {
                if let Err(err) = controller.next_task().await {
                    warn!(error = %err, "no next task");
                }
            });
        }
        Command::Kind(kind) => {
            tokio::spawn(async move { controller.select_kind(kind).await });
        }
        Command::ToggleMute => {
            let muted = !controller.speech().is_muted();
            controller.set_muted(muted);
            info!(muted, "sound toggled");
        }
        Command::Help | Command::Quit => {}
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let controller = build_controller(&cli)?;
    if let Some(voice) = controller.init_voice().await {
        info!(voice = %voice.display_name, language = %voice.language, "narration ready");
    }

    let renderer = tokio::spawn(render::run(controller.subscribe()));
    println!("{}", render::board(&controller.snapshot()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                warn!(error = %err, "ignored input");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            other => dispatch(&controller, other),
        }
    }

    controller.shutdown().await;
    renderer.abort();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Binary glue: print once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
