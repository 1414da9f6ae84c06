//! souvlaki-backed now-playing center

use crate::error::{MediaError, Result};
use lull_core::{MediaCommand, NowPlayingCenter, NowPlayingInfo};
use souvlaki::{MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, PlatformConfig};
use std::path::Path;

/// D-Bus well-known name suffix used by MPRIS
const DBUS_NAME: &str = "lull";

/// System media controls for the current platform
pub struct SystemMediaControls {
    controls: MediaControls,
}

impl SystemMediaControls {
    /// Register the app with the OS media session
    ///
    /// # Errors
    /// Returns an error if the platform session is unavailable (for
    /// example no D-Bus session bus on Linux)
    pub fn new(display_name: &str) -> Result<Self> {
        let config = PlatformConfig {
            dbus_name: DBUS_NAME,
            display_name,
            hwnd: None,
        };
        let controls =
            MediaControls::new(config).map_err(|e| MediaError::Create(format!("{e:?}")))?;

        tracing::info!(display_name, "Media session registered");
        Ok(Self { controls })
    }

    /// Forward media key presses to `handler`
    ///
    /// The handler runs on a platform thread. Events with no Lull meaning
    /// (seeking, raise, quit) are dropped.
    pub fn attach<F>(&mut self, handler: F) -> Result<()>
    where
        F: Fn(MediaCommand) + Send + 'static,
    {
        self.controls
            .attach(move |event: MediaControlEvent| {
                match command_for_event(&event) {
                    Some(command) => handler(command),
                    None => tracing::debug!(?event, "Ignoring media event"),
                }
            })
            .map_err(|e| MediaError::Attach(format!("{e:?}")))
    }

    fn update<T>(result: std::result::Result<T, souvlaki::Error>) -> Result<()> {
        result
            .map(|_| ())
            .map_err(|e| MediaError::Update(format!("{e:?}")))
    }
}

impl NowPlayingCenter for SystemMediaControls {
    fn set_metadata(&mut self, info: &NowPlayingInfo) -> lull_core::Result<()> {
        let cover = info.artwork.as_deref().map(cover_url);
        let metadata = MediaMetadata {
            title: Some(info.title.as_str()),
            artist: Some(info.artist.as_str()),
            album: Some(info.album.as_str()),
            cover_url: cover.as_deref(),
            duration: None,
        };
        Self::update(self.controls.set_metadata(metadata))?;
        Ok(())
    }

    fn set_playback(&mut self, is_playing: bool) -> lull_core::Result<()> {
        // Ambient loops have no timeline
        let playback = if is_playing {
            MediaPlayback::Playing { progress: None }
        } else {
            MediaPlayback::Paused { progress: None }
        };
        Self::update(self.controls.set_playback(playback))?;
        Ok(())
    }

    fn clear(&mut self) -> lull_core::Result<()> {
        Self::update(self.controls.set_playback(MediaPlayback::Stopped))?;
        Self::update(self.controls.set_metadata(MediaMetadata::default()))?;
        Ok(())
    }
}

/// Map an OS media event onto a Lull command
pub fn command_for_event(event: &MediaControlEvent) -> Option<MediaCommand> {
    match event {
        MediaControlEvent::Play => Some(MediaCommand::Play),
        MediaControlEvent::Pause => Some(MediaCommand::Pause),
        MediaControlEvent::Toggle => Some(MediaCommand::Toggle),
        MediaControlEvent::Stop => Some(MediaCommand::Stop),
        MediaControlEvent::Next => Some(MediaCommand::Next),
        MediaControlEvent::Previous => Some(MediaCommand::Previous),
        _ => None,
    }
}

/// `file://` URL for a local artwork image
pub fn cover_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
