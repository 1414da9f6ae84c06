//! Property-based tests for the audio manager
//!
//! Uses proptest to drive random operation sequences and check that the
//! device always matches the catalog.

use lull_core::types::{SoundDefinition, SoundId};
use lull_playback::{perceptual_gain, AudioManager, MemoryOutput, PlaybackConfig, SoundCatalog};
use proptest::prelude::*;
use std::path::PathBuf;

const NAMES: [&str; 4] = ["rain", "wind", "fire", "birds"];

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize),
    Volume(usize, f32),
    Solo(usize),
    ExitSolo,
    Play(bool),
    Hide(usize, bool),
    GlobalVolume(f32),
    Reset,
}

// ===== Helpers =====

fn setup() -> (AudioManager, MemoryOutput) {
    let catalog = SoundCatalog::new(
        NAMES
            .iter()
            .map(|n| SoundDefinition::new(*n, PathBuf::from(format!("/sounds/{n}.ogg"))))
            .collect(),
    )
    .unwrap();
    let output = MemoryOutput::new();
    let mut audio = AudioManager::new(catalog, Box::new(output.clone()), &PlaybackConfig::default());
    audio.load_sounds();
    (audio, output)
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    let index = 0..NAMES.len();
    prop_oneof![
        index.clone().prop_map(Op::Toggle),
        (index.clone(), -0.5f32..1.5).prop_map(|(i, v)| Op::Volume(i, v)),
        index.clone().prop_map(Op::Solo),
        Just(Op::ExitSolo),
        any::<bool>().prop_map(Op::Play),
        (index, any::<bool>()).prop_map(|(i, h)| Op::Hide(i, h)),
        (0.0f32..=1.0).prop_map(Op::GlobalVolume),
        Just(Op::Reset),
    ]
}

fn apply(audio: &mut AudioManager, op: &Op) {
    let id = |i: &usize| SoundId::new(NAMES[*i]);
    match op {
        Op::Toggle(i) => {
            audio.toggle_sound(&id(i)).unwrap();
        }
        Op::Volume(i, v) => audio.set_sound_volume(&id(i), *v).unwrap(),
        Op::Solo(i) => {
            let hidden = audio.sound(&id(i)).is_some_and(|s| s.is_hidden);
            assert_eq!(audio.toggle_solo(&id(i)).is_err(), hidden);
        }
        Op::ExitSolo => {
            audio.exit_solo();
        }
        Op::Play(p) => audio.set_playing(*p),
        Op::Hide(i, h) => audio.set_sound_hidden(&id(i), *h).unwrap(),
        Op::GlobalVolume(v) => audio.set_global_volume(*v),
        Op::Reset => audio.reset_sounds(),
    }
}

fn expected_playing(audio: &AudioManager) -> Vec<SoundId> {
    if !audio.is_playing() {
        return Vec::new();
    }
    let mut ids: Vec<SoundId> = match audio.solo_sound() {
        Some(id) => vec![id.clone()],
        None => audio.catalog().selected_ids(),
    };
    ids.sort();
    ids
}

// ===== Property Tests =====

proptest! {
    /// Property: the device plays exactly the selected (or soloed) sounds
    #[test]
    fn device_matches_catalog(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let (mut audio, output) = setup();
        for op in &ops {
            apply(&mut audio, op);
            prop_assert_eq!(output.playing(), expected_playing(&audio));
        }
    }

    /// Property: playing implies something is audible
    #[test]
    fn playing_is_never_silent(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let (mut audio, output) = setup();
        for op in &ops {
            apply(&mut audio, op);
            if audio.is_playing() {
                prop_assert!(!output.playing().is_empty());
            }
        }
    }

    /// Property: hidden sounds are never selected
    #[test]
    fn hidden_sounds_are_never_selected(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let (mut audio, _) = setup();
        for op in &ops {
            apply(&mut audio, op);
            for sound in audio.catalog().iter() {
                prop_assert!(!(sound.is_hidden && sound.is_selected));
            }
        }
    }

    /// Property: entering and leaving solo restores the mix exactly
    #[test]
    fn solo_round_trip_restores_mix(
        ops in prop::collection::vec(arbitrary_op(), 0..30),
        solo in 0..NAMES.len(),
    ) {
        let (mut audio, output) = setup();
        for op in &ops {
            apply(&mut audio, op);
        }
        audio.exit_solo();

        let mix = audio.mix_snapshot();
        let was_playing = audio.is_playing();
        let playing = output.playing();

        let solo = SoundId::new(NAMES[solo]);
        prop_assume!(!audio.sound(&solo).unwrap().is_hidden);
        audio.enter_solo(&solo).unwrap();
        audio.exit_solo();

        prop_assert_eq!(audio.mix_snapshot(), mix);
        prop_assert_eq!(audio.is_playing(), was_playing);
        prop_assert_eq!(output.playing(), playing);
    }

    /// Property: device gain is always finite and within unity
    #[test]
    fn gain_stays_in_range(level in -10.0f32..10.0) {
        let gain = perceptual_gain(level);
        prop_assert!(gain.is_finite());
        prop_assert!((0.0..=1.0).contains(&gain));
    }
}
