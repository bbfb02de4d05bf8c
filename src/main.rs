use anyhow::Result;
use chrono::Local;
use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};
use std::io;
use std::path::PathBuf;

mod ui;
mod utils;

use crate::ui::{App, UiAction, NOTIFICATION_TIMEOUT_SECS};
use friendbridge::auth::{self, AuthError, DemoSessionProvider, Session, SignUpForm};
use friendbridge::settings::{self, AccountSettings};

/// Command line arguments for FriendBridge
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "FriendBridge: find friends, share culture, belong.",
    long_about = "FriendBridge is a terminal client for meeting other students on campus.\n\n\
    Credentials can be pre-filled with FRIENDBRIDGE_EMAIL, FRIENDBRIDGE_PASSWORD,\n\
    FRIENDBRIDGE_NAME and FRIENDBRIDGE_DOB.\n\
    Use -h or --help to see all options."
)]
struct Args {
    /// Directory holding settings.json and the default log file
    #[arg(long, value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// Log file path (defaults to friendbridge.log in the config directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Create a new account instead of signing in
    #[arg(long)]
    sign_up: bool,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL", default_value = "debug")]
    log_level: LevelFilter,
}

// Environment values are only used on the first attempt, retries always prompt
fn field(var: &str, prompt: &str, use_env: bool) -> Result<String> {
    if use_env {
        utils::env_or_prompt(var, prompt)
    } else {
        eprintln!("{}", prompt);
        utils::read_line()
    }
}

/// Run the sign-in or sign-up prompts until a session is issued.
/// Returns `None` when the user leaves the email empty.
async fn authenticate(
    provider: &DemoSessionProvider,
    sign_up: bool,
) -> Result<Option<(Session, Option<String>)>> {
    let mut use_env = true;
    loop {
        let email = field("FRIENDBRIDGE_EMAIL", "OSU email (empty to quit):", use_env)?;
        if email.is_empty() {
            return Ok(None);
        }

        let result = if sign_up {
            let name = field("FRIENDBRIDGE_NAME", "Full name:", use_env)?;
            let dob = field("FRIENDBRIDGE_DOB", "Date of birth (YYYY-MM-DD):", use_env)?;
            match auth::parse_birth_date(&dob) {
                Ok(date_of_birth) => {
                    let form = SignUpForm {
                        name: name.clone(),
                        email,
                        date_of_birth,
                    };
                    auth::sign_up(provider, &form, Local::now().date_naive())
                        .await
                        .map(|session| (session, Some(name)))
                }
                Err(e) => Err(e),
            }
        } else {
            let password = field("FRIENDBRIDGE_PASSWORD", "Password:", use_env)?;
            auth::sign_in(provider, &email, &password).await.map(|session| (session, None))
        };

        match result {
            Ok(outcome) => return Ok(Some(outcome)),
            Err(e) => {
                match &e {
                    AuthError::Unexpected(inner) => error!("Authentication failed: {}", inner),
                    other => warn!("Authentication rejected: {:?}", other),
                }
                eprintln!("{}\n", e);
                use_env = false;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(dir) = &args.config_dir {
        settings::set_config_dir_override(dir.clone());
    }

    let log_file_path = match &args.log_file {
        Some(path) => path.clone(),
        None => match settings::get_config_dir() {
            Ok(dir) => dir.join("friendbridge.log"),
            Err(e) => {
                eprintln!("Warning: {}. Logging to the current directory.", e);
                PathBuf::from("friendbridge.log")
            }
        },
    };

    utils::setup_logging(log_file_path.to_str(), args.log_level)?;
    info!("FriendBridge client starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", log_file_path.display());

    let provider = DemoSessionProvider::new();
    let (session, sign_up_name) = match authenticate(&provider, args.sign_up).await? {
        Some(outcome) => outcome,
        None => {
            info!("No email entered, exiting");
            return Ok(());
        }
    };
    info!("Signed in as {} (verified: {})", session.email, session.is_verified);

    // Saved settings belong to one account; start fresh when the email differs
    let account = match settings::load_settings() {
        Ok(Some(saved)) if saved.email == session.email && sign_up_name.is_none() => saved,
        Ok(_) => AccountSettings::new(sign_up_name.as_deref().unwrap_or(""), &session.email),
        Err(e) => {
            warn!("Could not read saved settings: {}", e);
            AccountSettings::new(sign_up_name.as_deref().unwrap_or(""), &session.email)
        }
    };
    if sign_up_name.is_some() {
        if let Err(e) = settings::save_settings(&account) {
            eprintln!("Warning: Failed to save settings: {}", e);
        }
    }

    let mut app = App::new(session, account);
    app.notify(&format!("Welcome, {}!", app.settings().display_name()));

    let mut terminal = ui::setup_terminal()?;
    let result = run_main_loop(&mut app, &mut terminal);
    ui::restore_terminal(terminal)?;

    if let Err(e) = &result {
        error!("UI loop ended with error: {}", e);
    }
    info!("FriendBridge client shutting down");
    result
}

fn run_main_loop(app: &mut App, terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>) -> Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        app.clean_notifications(NOTIFICATION_TIMEOUT_SECS);

        match app.handle_input()? {
            Some(UiAction::Quit) => {
                info!("User requested quit");
                return Ok(());
            }
            Some(UiAction::SaveSettings(account)) => match settings::save_settings(&account) {
                Ok(()) => app.notify("Settings saved"),
                Err(e) => {
                    error!("Failed to save settings: {}", e);
                    app.notify_error(&format!("Failed to save settings: {}", e));
                }
            },
            Some(UiAction::MessageSent { conversation_id }) => {
                debug!("Message appended to conversation {}", conversation_id);
            }
            None => {}
        }
    }
}
