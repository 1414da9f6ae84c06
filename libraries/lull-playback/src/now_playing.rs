//! Now-playing bridge
//!
//! Mirrors the mix into the OS media surface. Failures there never affect
//! playback, so they are logged and dropped.

use crate::manager::AudioManager;
use lull_core::types::{NowPlayingInfo, Preset};
use lull_core::NowPlayingCenter;

/// Compose now-playing metadata
///
/// - title: the preset name, or the solo sound's title in solo mode
/// - artist: the preset creator, else the selected sound titles, else the
///   app name
/// - album: the app name
pub fn compose_now_playing(audio: &AudioManager, preset: Option<&Preset>) -> NowPlayingInfo {
    let app_name = audio.display_name();

    let solo_title = audio
        .solo_sound()
        .and_then(|id| audio.sound(id))
        .map(|s| s.title.clone());
    let title = solo_title
        .or_else(|| preset.map(|p| p.display_name().to_string()))
        .unwrap_or_else(|| app_name.to_string());

    let creator = preset
        .and_then(|p| p.creator.as_ref())
        .map(|c| c.name.trim())
        .filter(|name| !name.is_empty());
    let artist = match creator {
        Some(name) => name.to_string(),
        None => {
            let titles: Vec<&str> = audio
                .catalog()
                .selected()
                .into_iter()
                .map(|s| s.title.as_str())
                .collect();
            if titles.is_empty() {
                app_name.to_string()
            } else {
                titles.join(", ")
            }
        }
    };

    NowPlayingInfo {
        title,
        artist,
        album: app_name.to_string(),
        artwork: preset.and_then(|p| p.artwork.clone()),
        is_playing: audio.is_playing(),
    }
}

/// Pushes now-playing updates to a platform center, skipping repeats
pub struct NowPlayingBridge {
    center: Box<dyn NowPlayingCenter>,
    last: Option<NowPlayingInfo>,
}

impl NowPlayingBridge {
    pub fn new(center: Box<dyn NowPlayingCenter>) -> Self {
        Self { center, last: None }
    }

    /// Publish `info`, sending only the parts that changed
    pub fn update(&mut self, info: NowPlayingInfo) {
        let (metadata_changed, playback_changed) = match &self.last {
            Some(last) => (last.metadata_differs(&info), last.is_playing != info.is_playing),
            None => (true, true),
        };

        if metadata_changed {
            if let Err(e) = self.center.set_metadata(&info) {
                tracing::warn!("Failed to update now-playing metadata: {}", e);
            }
        }
        if playback_changed {
            if let Err(e) = self.center.set_playback(info.is_playing) {
                tracing::warn!("Failed to update now-playing status: {}", e);
            }
        }
        self.last = Some(info);
    }

    /// Remove the app from the media surface
    pub fn clear(&mut self) {
        if let Err(e) = self.center.clear() {
            tracing::warn!("Failed to clear now-playing info: {}", e);
        }
        self.last = None;
    }

    pub fn last(&self) -> Option<&NowPlayingInfo> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryOutput, PlaybackConfig, SoundCatalog};
    use lull_core::types::{PresetCreator, SoundDefinition};
    use std::path::PathBuf;

    fn audio() -> AudioManager {
        let catalog = SoundCatalog::new(vec![
            SoundDefinition::new("Rain", PathBuf::from("/sounds/rain.ogg")),
            SoundDefinition::new("Wind", PathBuf::from("/sounds/wind.ogg")),
        ])
        .unwrap();
        let mut audio = AudioManager::new(
            catalog,
            Box::new(MemoryOutput::new()),
            &PlaybackConfig::default(),
        );
        audio.load_sounds();
        audio
    }

    #[test]
    fn artist_falls_back_to_selected_titles_then_app_name() {
        let mut audio = audio();
        let preset = Preset::new("Evening", Vec::new());

        let info = compose_now_playing(&audio, Some(&preset));
        assert_eq!(info.title, "Evening");
        assert_eq!(info.artist, "Lull");
        assert_eq!(info.album, "Lull");

        audio.toggle_sound(&"rain".into()).unwrap();
        audio.toggle_sound(&"wind".into()).unwrap();
        let info = compose_now_playing(&audio, Some(&preset));
        assert_eq!(info.artist, "Rain, Wind");
        assert!(info.is_playing);
    }

    #[test]
    fn creator_wins_over_sound_titles() {
        let mut audio = audio();
        audio.toggle_sound(&"rain".into()).unwrap();
        let mut preset = Preset::new("Storm", Vec::new());
        preset.creator = Some(PresetCreator {
            name: "Ada".to_string(),
            url: None,
        });
        assert_eq!(compose_now_playing(&audio, Some(&preset)).artist, "Ada");
    }

    #[test]
    fn solo_sound_title_replaces_preset_name() {
        let mut audio = audio();
        audio.enter_solo(&"wind".into()).unwrap();
        let preset = Preset::new_default(Vec::new());
        let info = compose_now_playing(&audio, Some(&preset));
        assert_eq!(info.title, "Wind");
    }
}
