use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tunedeck_application::UploadMetadata;
use tunedeck_core::song::AudioFormat;
use tunedeck_infrastructure::{ConfigService, TunedeckPaths};

mod bootstrap;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "tunedeck")]
#[command(about = "TuneDeck - play and manage your personal music library", long_about = None)]
#[command(version)]
struct Cli {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List songs in your library
    List {
        /// Only songs whose title, artist or album contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Play a song until it ends (Ctrl-C stops)
    Play {
        song_id: String,
        /// Volume between 0.0 and 1.0
        #[arg(long)]
        volume: Option<f32>,
    },
    /// Download a song in the given format
    Download {
        song_id: String,
        #[arg(short, long, default_value_t = AudioFormat::Mp3)]
        format: AudioFormat,
        /// Directory to save into
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Upload a local mp3, wav or ogg file
    Upload {
        file: PathBuf,
        /// Defaults to the file name without extension
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
    },
    /// Import a track from a Spotify link
    UploadLink { url: String },
    /// Delete a song from your library
    Delete { song_id: String },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration and file locations
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match &cli.config_dir {
        Some(dir) => TunedeckPaths::new(Some(dir.as_path())),
        None => TunedeckPaths::from_env(),
    };
    let config_service = bootstrap::load_config(&paths)?;
    let config = config_service.get_config()?;
    let _log_guard = logging::init(&config.log_level, paths.logs_dir().ok().as_deref());

    let download_override = match &cli.command {
        Commands::Download { out, .. } => out.clone(),
        _ => None,
    };
    let ctx = bootstrap::bootstrap(&config_service, download_override.as_deref())?;

    dispatch(cli.command, &ctx, &config_service)
        .await
        .map_err(commands::utils::with_login_hint)
}

async fn dispatch(
    command: Commands,
    ctx: &bootstrap::AppContext,
    config_service: &ConfigService,
) -> Result<()> {
    let client = &ctx.client;

    match command {
        Commands::Login { username, password } => {
            commands::auth::login(client, username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(client, username, email, password).await,
        Commands::Logout => commands::auth::logout(client).await,
        Commands::Whoami => commands::auth::whoami(client).await,
        Commands::List { search } => commands::library::list(client, search.as_deref()).await,
        Commands::Play { song_id, volume } => {
            commands::playback::play(client, &song_id, volume).await
        }
        Commands::Download {
            song_id, format, ..
        } => commands::transfer::download(client, &song_id, format).await,
        Commands::Upload {
            file,
            title,
            artist,
            album,
        } => {
            let metadata = UploadMetadata {
                title,
                artist,
                album,
            };
            commands::library::upload(client, &file, metadata).await
        }
        Commands::UploadLink { url } => commands::library::upload_link(client, &url).await,
        Commands::Delete { song_id } => commands::library::delete(client, &song_id).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(config_service, &ctx.download_dir),
        },
    }
}
