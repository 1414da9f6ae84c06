//! Preset application tests
//!
//! Applying a preset pauses, waits for the fade delay and then resumes only
//! when it should. Time is paused so the fade delay runs instantly.

use lull_core::types::{Preset, SoundDefinition, SoundId, SoundState};
use lull_playback::{
    AudioManager, MemoryOutput, PlaybackConfig, PlaybackError, PlaybackEvent, PresetManager,
    SoundCatalog,
};
use std::path::PathBuf;
use std::time::Duration;

// ===== Test Helpers =====

fn setup(config: &PlaybackConfig) -> (AudioManager, PresetManager, MemoryOutput) {
    let catalog = SoundCatalog::new(
        ["rain", "wind", "fire"]
            .iter()
            .map(|n| SoundDefinition::new(*n, PathBuf::from(format!("/sounds/{n}.ogg"))))
            .collect(),
    )
    .unwrap();
    let output = MemoryOutput::new();
    let mut audio = AudioManager::new(catalog, Box::new(output.clone()), config);
    audio.load_sounds();
    let presets = PresetManager::new(config);
    (audio, presets, output)
}

fn state(file_name: &str, is_selected: bool, volume: f32) -> SoundState {
    SoundState {
        file_name: file_name.to_string(),
        is_selected,
        volume,
    }
}

fn id(name: &str) -> SoundId {
    SoundId::new(name)
}

// ===== Application =====

#[tokio::test(start_paused = true)]
async fn apply_waits_for_fade_delay_and_resumes() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, out) = setup(&config);
    presets.load(Vec::new(), None, &audio);
    audio.toggle_sound(&id("rain")).unwrap();
    let night = Preset::new("Night", vec![state("wind.ogg", true, 0.5)]);
    let night_id = night.id.clone();
    let saved = vec![presets.presets()[0].clone(), night];
    presets.load(saved, None, &audio);

    let started = tokio::time::Instant::now();
    assert!(presets.apply_preset(&night_id, &mut audio, false).await.unwrap());
    assert!(started.elapsed() >= Duration::from_millis(100));

    assert!(audio.is_playing());
    assert_eq!(out.playing(), vec![id("wind")]);
    assert_eq!(audio.sound(&id("wind")).unwrap().volume, 0.5);
    assert!(!audio.sound(&id("rain")).unwrap().is_selected);
    assert_eq!(presets.current_id(), Some(&night_id));

    let applied = audio
        .drain_events()
        .into_iter()
        .any(|e| matches!(e, PlaybackEvent::PresetApplied { name, .. } if name == "Night"));
    assert!(applied);
}

#[tokio::test(start_paused = true)]
async fn apply_while_paused_stays_paused() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, out) = setup(&config);
    let night = Preset::new("Night", vec![state("wind.ogg", true, 1.0)]);
    let night_id = night.id.clone();
    presets.load(vec![night], None, &audio);

    presets.apply_preset(&night_id, &mut audio, false).await.unwrap();
    assert!(!audio.is_playing());
    assert!(out.playing().is_empty());
    assert!(audio.sound(&id("wind")).unwrap().is_selected);
}

#[tokio::test(start_paused = true)]
async fn reapplying_current_preset_is_a_no_op() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, out) = setup(&config);
    presets.load(Vec::new(), None, &audio);
    let default_id = presets.current_id().unwrap().clone();

    audio.toggle_sound(&id("fire")).unwrap();
    let plays = out.voice(&id("fire")).unwrap().play_count;

    assert!(!presets.apply_preset(&default_id, &mut audio, false).await.unwrap());
    assert_eq!(out.voice(&id("fire")).unwrap().play_count, plays);
    assert!(audio.is_playing());
}

#[tokio::test(start_paused = true)]
async fn initial_load_respects_always_start_paused() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    let preset = Preset::new_default(vec![state("rain.ogg", true, 1.0)]);
    let preset_id = preset.id.clone();
    presets.load(vec![preset], None, &audio);

    presets.apply_preset(&preset_id, &mut audio, true).await.unwrap();
    assert!(!audio.is_playing());
    assert!(audio.sound(&id("rain")).unwrap().is_selected);
}

#[tokio::test(start_paused = true)]
async fn initial_load_autostarts_when_allowed() {
    let config = PlaybackConfig {
        always_start_paused: false,
        ..PlaybackConfig::default()
    };
    let (mut audio, mut presets, out) = setup(&config);
    let preset = Preset::new_default(vec![state("rain.ogg", true, 1.0)]);
    let preset_id = preset.id.clone();
    presets.load(vec![preset], Some(&preset_id), &audio);

    // Initial load applies even though the preset is already current
    assert!(presets.apply_preset(&preset_id, &mut audio, true).await.unwrap());
    assert!(audio.is_playing());
    assert_eq!(out.playing(), vec![id("rain")]);
}

#[tokio::test(start_paused = true)]
async fn initial_load_of_empty_preset_never_autostarts() {
    let config = PlaybackConfig {
        always_start_paused: false,
        ..PlaybackConfig::default()
    };
    let (mut audio, mut presets, _) = setup(&config);
    presets.load(Vec::new(), None, &audio);
    let default_id = presets.current_id().unwrap().clone();

    presets.apply_preset(&default_id, &mut audio, true).await.unwrap();
    assert!(!audio.is_playing());
}

#[tokio::test(start_paused = true)]
async fn apply_during_solo_uses_preset_values() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, out) = setup(&config);
    let calm = Preset::new("Calm", vec![state("rain.ogg", true, 0.2)]);
    let calm_id = calm.id.clone();
    presets.load(vec![calm], None, &audio);

    audio.toggle_sound(&id("wind")).unwrap();
    audio.enter_solo(&id("fire")).unwrap();

    presets.apply_preset(&calm_id, &mut audio, false).await.unwrap();
    assert!(!audio.is_solo_active());
    assert!(audio.is_playing());
    assert_eq!(out.playing(), vec![id("rain")]);
    assert!(!audio.sound(&id("fire")).unwrap().is_selected);
    assert_eq!(audio.sound(&id("fire")).unwrap().volume, 1.0);
}

#[tokio::test(start_paused = true)]
async fn apply_restores_custom_order() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    let mut ordered = Preset::new("Ordered", Vec::new());
    ordered.sound_order = Some(vec!["fire.ogg".into(), "rain.ogg".into(), "wind.ogg".into()]);
    let ordered_id = ordered.id.clone();
    presets.load(vec![ordered], None, &audio);

    presets.apply_preset(&ordered_id, &mut audio, false).await.unwrap();
    let order: Vec<&str> = audio
        .catalog()
        .ordered()
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(order, vec!["fire", "rain", "wind"]);
}

#[tokio::test(start_paused = true)]
async fn unknown_preset_is_an_error() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    presets.load(Vec::new(), None, &audio);

    let missing = lull_core::PresetId::new("missing");
    let result = presets.apply_preset(&missing, &mut audio, false).await;
    assert!(matches!(result, Err(PlaybackError::PresetNotFound(_))));
}

// ===== Deletion =====

#[tokio::test(start_paused = true)]
async fn deleting_current_preset_applies_default() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    presets.load(Vec::new(), None, &audio);
    let default_id = presets.current_id().unwrap().clone();

    audio.toggle_sound(&id("rain")).unwrap();
    let night_id = presets.save_new_preset("Night", &audio).unwrap().id.clone();
    assert_eq!(presets.current_id(), Some(&night_id));

    let removed = presets.delete_preset(&night_id, &mut audio).await.unwrap();
    assert_eq!(removed.name, "Night");
    assert_eq!(presets.current_id(), Some(&default_id));
    // The default was captured with nothing selected
    assert!(!audio.sound(&id("rain")).unwrap().is_selected);
    assert!(!audio.is_playing());
}

#[tokio::test(start_paused = true)]
async fn default_preset_cannot_be_deleted() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    presets.load(Vec::new(), None, &audio);
    let default_id = presets.current_id().unwrap().clone();

    let result = presets.delete_preset(&default_id, &mut audio).await;
    assert!(matches!(result, Err(PlaybackError::DefaultPresetProtected(_))));
    assert_eq!(presets.presets().len(), 1);
}

#[test]
fn update_current_preset_skips_solo_mode() {
    let config = PlaybackConfig::default();
    let (mut audio, mut presets, _) = setup(&config);
    presets.load(Vec::new(), None, &audio);

    audio.enter_solo(&id("rain")).unwrap();
    assert!(!presets.update_current_preset(&audio));

    audio.exit_solo();
    audio.toggle_sound(&id("wind")).unwrap();
    assert!(presets.update_current_preset(&audio));
    assert!(presets.current().unwrap().has_selected_sounds());
}
