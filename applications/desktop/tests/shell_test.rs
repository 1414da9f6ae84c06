//! Shell commands against an in-memory session

use lull_core::{MemorySettingsStore, SoundDefinition, SoundId};
use lull_desktop::shell::{execute, render_presets, render_status, Command, Reply};
use lull_playback::{MemoryOutput, PlaybackConfig, PlaybackError, Session, SoundCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

async fn session() -> (Session, MemoryOutput) {
    let catalog = SoundCatalog::new(vec![
        SoundDefinition::new("Light Rain", PathBuf::from("/sounds/light-rain.ogg")),
        SoundDefinition::new("Wind", PathBuf::from("/sounds/wind.ogg")),
        SoundDefinition::new("Fire", PathBuf::from("/sounds/fire.ogg")),
    ])
    .unwrap();
    let output = MemoryOutput::new();
    let config = PlaybackConfig {
        fade_delay: Duration::ZERO,
        ..PlaybackConfig::default()
    };
    let mut session = Session::new(
        catalog,
        Box::new(output.clone()),
        Arc::new(MemorySettingsStore::new()),
        None,
        config,
    );
    session.restore().await.unwrap();
    (session, output)
}

async fn run(session: &mut Session, line: &str) -> lull_playback::Result<Reply> {
    let command = Command::parse(line).unwrap().unwrap();
    execute(session, command, Instant::now()).await
}

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn sounds_resolve_by_id_or_title() {
    let (mut session, output) = session().await;

    let reply = text(run(&mut session, "sound light rain").await.unwrap());
    assert_eq!(reply, "light-rain on");
    text(run(&mut session, "sound WIND").await.unwrap());

    assert!(session.audio().is_playing());
    assert_eq!(
        output.playing(),
        vec![SoundId::new("light-rain"), SoundId::new("wind")]
    );
}

#[tokio::test]
async fn unknown_sound_is_an_error() {
    let (mut session, _) = session().await;
    let result = run(&mut session, "sound thunder").await;
    assert!(matches!(result, Err(PlaybackError::SoundNotFound(_))));
}

#[tokio::test]
async fn volume_command_sets_the_sound_volume() {
    let (mut session, _) = session().await;
    run(&mut session, "volume fire 40").await.unwrap();
    let fire = session.audio().sound(&SoundId::new("fire")).unwrap();
    assert!((fire.volume - 0.4).abs() < 1e-6);
}

#[tokio::test]
async fn saved_presets_are_listed_and_applied_by_position() {
    let (mut session, _) = session().await;
    run(&mut session, "sound fire").await.unwrap();
    let listing = text(run(&mut session, "save Campfire night").await.unwrap());

    assert!(listing.contains("Campfire night (1 sounds)"), "{listing}");
    assert!(listing.lines().any(|l| l.starts_with('*') && l.contains("Campfire")));

    run(&mut session, "apply 1").await.unwrap();
    assert!(session.presets().current().unwrap().is_default);
    assert!(render_presets(&session).starts_with("* 1."));
}

#[tokio::test]
async fn rename_and_delete_by_name() {
    let (mut session, _) = session().await;
    run(&mut session, "save Focus").await.unwrap();

    let listing = text(run(&mut session, "rename focus Deep work").await.unwrap());
    assert!(listing.contains("Deep work"));

    let listing = text(run(&mut session, "delete deep work").await.unwrap());
    assert!(!listing.contains("Deep work"));
    assert_eq!(session.presets().presets().len(), 1);
}

#[tokio::test]
async fn solo_is_marked_in_the_status() {
    let (mut session, _) = session().await;
    run(&mut session, "sound wind").await.unwrap();
    let line = text(run(&mut session, "solo fire").await.unwrap());
    assert!(line.contains("solo: fire"), "{line}");

    let status = render_status(&session, Instant::now());
    assert!(status.lines().any(|l| l.contains("[S] fire")), "{status}");

    text(run(&mut session, "unsolo").await.unwrap());
    assert!(!session.audio().is_solo_active());
    let reply = text(run(&mut session, "unsolo").await.unwrap());
    assert_eq!(reply, "Solo mode is not active");
}

#[tokio::test]
async fn timer_shows_in_the_status_line() {
    let (mut session, _) = session().await;
    let now = Instant::now();

    let command = Command::parse("timer 30").unwrap().unwrap();
    let reply = execute(&mut session, command, now).await.unwrap();
    assert_eq!(reply, Reply::Text("Pausing in 30:00".to_string()));

    let status = render_status(&session, now);
    assert!(status.starts_with("Paused"));
    assert!(status.lines().next().unwrap().contains("timer 30:00"));

    run(&mut session, "timer off").await.unwrap();
    assert_eq!(session.timer_remaining(now), None);
    assert!(!session.timer_running());
    assert!(!render_status(&session, now).contains("timer"));
}

#[tokio::test]
async fn status_line_reports_volume_in_decibels() {
    let (mut session, _) = session().await;
    let now = Instant::now();

    run(&mut session, "master 100").await.unwrap();
    let status = render_status(&session, now);
    assert!(status.contains("volume 100% (0.0 dB)"), "{status}");

    run(&mut session, "master 50").await.unwrap();
    let status = render_status(&session, now);
    assert!(status.contains("volume 50% (-30.0 dB)"), "{status}");

    run(&mut session, "mute").await.unwrap();
    let line = render_status(&session, now).lines().next().unwrap().to_string();
    assert!(line.contains("volume 50% (muted)"), "{line}");
    assert!(!line.contains("dB"), "{line}");
}

#[tokio::test]
async fn quit_ends_the_shell() {
    let (mut session, _) = session().await;
    assert_eq!(run(&mut session, "quit").await.unwrap(), Reply::Quit);
}
