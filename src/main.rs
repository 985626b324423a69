// ABOUTME: Main entry point for tmx
//
// Binary: tmx
// - No flags: interactive session manager (requires running inside tmux)
// - --install / --uninstall: manage the tmux key binding and shell helper
// - -h / -V: help and version
//
// The interactive loop never attaches by itself: it exits with an intent
// and the attach happens here, after the terminal has been restored.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use tmx::app::{attach_handler, dispatch, AppEvent, AppState, Command, ExitRequest};
use tmx::cli::Cli;
use tmx::components::LayoutComponent;
use tmx::config;
use tmx::tmux::{inside_tmux, TmuxClient};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = e.print();
                return Ok(());
            }
            eprintln!("unknown argument");
            eprintln!("use -h for help");
            std::process::exit(1);
        }
    };

    if args.install {
        if let Err(e) = config::install_config() {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }
    if args.uninstall {
        if let Err(e) = config::uninstall_config() {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    // The manager switches clients rather than nesting attaches, so it has
    // to run from inside a tmux session.
    if !inside_tmux() {
        println!("tmx must run inside a tmux session");
        println!();
        println!("Usage:");
        println!("  tmux                            # start tmux");
        println!("  tmx                             # run the manager inside it");
        println!();
        println!("or:");
        println!("  tmux attach-session -t default  # attach to an existing session");
        println!("  tmx                             # then run tmx");
        println!();
        println!("Tip: run `tmx --install` to bind Ctrl+b t to tmx");
        std::process::exit(1);
    }

    let client = Arc::new(TmuxClient::new());

    if !client.is_running().await {
        return bootstrap_default_session(&client).await;
    }

    let attach_target = run_tui(client.clone()).await?;

    // The loop has released the terminal; now the attach may take it over.
    if let Some(name) = attach_target {
        if let Err(e) = attach_handler::perform_attach(&client, &name).await {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Offer to create and attach a default session when the server has none.
/// Bypasses the TUI entirely for this bootstrap path.
async fn bootstrap_default_session(client: &TmuxClient) -> Result<()> {
    println!("tmux has no running sessions");
    println!();
    println!("tmx can create a 'default' session and attach to it.");
    print!("Create it now? [Y/n]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();

    if !(answer.is_empty() || answer.eq_ignore_ascii_case("y")) {
        println!();
        println!("Start tmux yourself with:");
        println!("  tmux");
        println!("or create a named session with:");
        println!("  tmux new -s <name>");
        std::process::exit(1);
    }

    if client.has_session("default").await {
        println!("found existing session 'default', attaching...");
    } else {
        if let Err(e) = client.create("default").await {
            eprintln!("failed to create session: {e}");
            eprintln!();
            eprintln!("You can start tmux manually with:");
            eprintln!("  tmux");
            std::process::exit(1);
        }
        // Start the manager inside the fresh session so the user lands in
        // the list view after attaching.
        if let Err(e) = client.send_keys("default", "tmx").await {
            tracing::warn!("could not start tmx in the new session: {e}");
        }
    }

    if let Err(e) = client.attach("default").await {
        eprintln!("failed to attach to session: {e}");
        std::process::exit(1);
    }
    Ok(())
}

/// Run the interactive loop. Returns the name of the session to attach to
/// after the terminal has been restored, if the user picked one.
async fn run_tui(client: Arc<TmuxClient>) -> Result<Option<String>> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(client, &mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result? {
        ExitRequest::Quit => Ok(None),
        ExitRequest::QuitAndAttach(name) => Ok(Some(name)),
    }
}

async fn run_tui_loop(
    client: Arc<TmuxClient>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<ExitRequest> {
    let mut state = AppState::new();
    let mut layout = LayoutComponent::new();

    // Completed background commands re-enter here as events, interleaved
    // with terminal input. One reducer call at a time, no locking.
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    dispatch(Command::RefreshSessions, client.clone(), tx.clone());

    loop {
        terminal.draw(|frame| layout.render(frame, &state))?;

        // Drain any finished command results first.
        while let Ok(app_event) = rx.try_recv() {
            for command in state.handle_event(app_event) {
                dispatch(command, client.clone(), tx.clone());
            }
        }

        if let Some(exit) = state.exit_request.take() {
            return Ok(exit);
        }

        if event::poll(TICK_RATE)? {
            let app_event = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
                _ => None,
            };

            if let Some(app_event) = app_event {
                for command in state.handle_event(app_event) {
                    dispatch(command, client.clone(), tx.clone());
                }
            }
        }

        if let Some(exit) = state.exit_request.take() {
            return Ok(exit);
        }
    }
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // Logs go to a file: writing to stdout/stderr would corrupt the TUI.
    let log_dir = dirs::home_dir()
        .map(|home| home.join(".tmx").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from(".tmx/logs"));

    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    let log_file = log_dir.join(format!(
        "tmx-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_env("TMX_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting, or the message is lost in
        // the alternate screen.
        cleanup_terminal();

        tracing::error!("application panicked: {panic_info}");
        eprintln!("tmx panicked: {panic_info}");
        eprintln!("check ~/.tmx/logs for details");
    }));
}
