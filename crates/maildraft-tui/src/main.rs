use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use maildraft_core::config::{api_key_from_env, Config};
use maildraft_core::{DraftGenerator, OpenAIClient, Session, Tone};
use tracing::info;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use logging::LogTarget;

#[derive(Parser)]
#[command(name = "maildraft", version)]
#[command(about = "Draft emails with an OpenAI-compatible chat-completion API")]
struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one draft without the interactive form
    Generate {
        /// Your name
        #[arg(long = "from", default_value = "")]
        sender: String,
        /// Who the email is for
        #[arg(long = "to", default_value = "")]
        recipient: String,
        /// Purpose of the email
        #[arg(long)]
        purpose: String,
        /// Comma separated key points
        #[arg(long)]
        key_points: String,
        /// formal, professional, informal or friendly
        #[arg(long, default_value = "formal")]
        tone: String,
        /// Also save email_draft.txt into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error during startup: {e:#}");
            eprintln!("Please check your API key, base URL, and internet connection.");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()?;
    let level = logging::resolve_level(cli.log_level.as_deref(), config.log_level.as_deref());

    let interactive = cli.command.is_none();
    let target = if interactive {
        LogTarget::File(Config::config_dir()?.join("maildraft.log"))
    } else {
        LogTarget::Stderr
    };
    logging::init(level, target)?;

    let api_key = api_key_from_env()?;
    let client = OpenAIClient::new(config.base_url(), &api_key, config.timeout())?;
    let generator = DraftGenerator::new(client)
        .with_model(config.model())
        .with_max_tokens(config.max_tokens());

    info!(base_url = %config.base_url(), model = %config.model(), "completion client ready");

    match cli.command {
        None => {
            run_tui(App::new(generator, config.download_dir())).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Generate { sender, recipient, purpose, key_points, tone, out }) => {
            let mut session = Session::new();
            session.form.sender = sender;
            session.form.recipient = recipient;
            session.form.purpose = purpose;
            session.form.key_points = key_points;
            generate_once(session, &generator, &tone, out).await
        }
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            if let Some(event) = events.next().await {
                handler::handle_event(&mut app, event);
            }
            app.poll_generation().await;
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

async fn generate_once(
    mut session: Session,
    generator: &DraftGenerator<OpenAIClient>,
    tone: &str,
    out: Option<PathBuf>,
) -> Result<ExitCode> {
    let details = match session.prepare() {
        Ok(mut details) => {
            // Raw label: unknown tones still go out and use the default temperature
            details.tone = Tone::from_str(tone)
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| tone.to_string());
            details
        }
        Err(e) => {
            eprintln!("Warning: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = generator.generate(&details).await;
    let failed = result.is_err();
    session.record_outcome(result);

    if let Some(notice) = session.notice() {
        eprintln!("{}", notice.text);
    }
    println!("{}", session.draft());

    if let (Some(dir), Some(download)) = (out, session.download()) {
        match download.save_in(&dir) {
            Ok(path) => eprintln!("Saved draft to {}", path.display()),
            Err(e) => {
                eprintln!("Could not save draft: {e:#}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
