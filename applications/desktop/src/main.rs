/// Lull - ambient sound mixer for the terminal
use anyhow::Context;
use clap::{Parser, Subcommand};
use lull_audio_desktop::CpalOutput;
use lull_core::{MediaCommand, NowPlayingCenter, SettingsStore, SoundOutput};
use lull_desktop::{
    shell::{self, Command, Reply},
    sounds::scan_sounds,
    LullConfig,
};
use lull_media::SystemMediaControls;
use lull_playback::{MemoryOutput, Session, SoundCatalog};
use lull_storage::SqliteSettingsStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lull")]
#[command(about = "Mix ambient sounds, save presets, fall asleep", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LULL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with sound files (overrides the config)
    #[arg(short, long)]
    sounds: Option<PathBuf>,

    /// Run without opening an audio device
    #[arg(long)]
    no_audio: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive player (default)
    Run,
    /// List the sounds found in the sounds directory
    Sounds,
    /// List saved presets
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| lull_desktop::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = LullConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.sounds.clone() {
        config.sounds.directory = dir;
    }
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config, cli.no_audio).await?,
        Commands::Sounds => list_sounds(&config)?,
        Commands::Presets => list_presets(&config).await?,
    }

    Ok(())
}

async fn run(config: &LullConfig, no_audio: bool) -> anyhow::Result<()> {
    tracing::info!("Starting Lull");

    let store = open_store(config).await?;
    let catalog = SoundCatalog::new(scan_sounds(&config.sounds.directory)?)?;
    if catalog.is_empty() {
        tracing::warn!(
            dir = %config.sounds.directory.display(),
            "No sounds found"
        );
    }

    let output: Box<dyn SoundOutput> = if no_audio {
        tracing::info!("Audio disabled, using silent output");
        Box::new(MemoryOutput::new())
    } else {
        Box::new(CpalOutput::new().context("failed to open audio output")?)
    };

    let (media_tx, mut media_rx) = mpsc::unbounded_channel::<MediaCommand>();
    let center = if config.media.enabled {
        open_media_controls(config, media_tx)
    } else {
        None
    };

    let mut session = Session::new(catalog, output, store, center, config.playback());
    session.restore().await?;

    println!("{}", shell::render_status(&session, Instant::now()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Some(command)) => {
                        match shell::execute(&mut session, command, Instant::now()).await {
                            Ok(Reply::Text(text)) => println!("{text}"),
                            Ok(Reply::Quit) => break,
                            Err(e) => eprintln!("error: {e}"),
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
            Some(command) = media_rx.recv() => {
                if let Err(e) = session.handle_media_command(command).await {
                    tracing::warn!(?command, "Media command failed: {}", e);
                }
                println!("{}", shell::status_line(&session, Instant::now()));
            }
            _ = tick.tick() => {
                if session.tick(Instant::now()).await {
                    println!("Sleep timer finished. {}", shell::status_line(&session, Instant::now()));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        for event in session.drain_events() {
            tracing::debug!(?event, "Playback event");
        }
    }

    session.shutdown().await;
    tracing::info!("Lull stopped");
    Ok(())
}

async fn open_store(config: &LullConfig) -> anyhow::Result<Arc<dyn SettingsStore>> {
    if let Some(parent) = config.database_path().as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let pool = lull_storage::create_pool(&config.storage.database_url).await?;
    lull_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    Ok(Arc::new(SqliteSettingsStore::new(pool)))
}

/// Register with the OS media session. Failure leaves the player usable.
fn open_media_controls(
    config: &LullConfig,
    commands: mpsc::UnboundedSender<MediaCommand>,
) -> Option<Box<dyn NowPlayingCenter>> {
    let mut controls = match SystemMediaControls::new(&config.media.display_name) {
        Ok(controls) => controls,
        Err(e) => {
            tracing::warn!("Media controls unavailable: {}", e);
            return None;
        }
    };

    if let Err(e) = controls.attach(move |command| {
        let _ = commands.send(command);
    }) {
        tracing::warn!("Media keys unavailable: {}", e);
    }
    Some(Box::new(controls))
}

fn list_sounds(config: &LullConfig) -> anyhow::Result<()> {
    for sound in scan_sounds(&config.sounds.directory)? {
        println!("{:<16} {}", sound.id.as_str(), sound.title);
    }
    Ok(())
}

async fn list_presets(config: &LullConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let presets = store.load_presets().await?;
    if presets.is_empty() {
        println!("No presets saved yet");
    }
    for (position, preset) in presets.iter().enumerate() {
        let selected = preset.sound_states.iter().filter(|s| s.is_selected).count();
        println!(
            "{:>2}. {} ({selected} sounds)",
            position + 1,
            preset.display_name()
        );
    }
    Ok(())
}
