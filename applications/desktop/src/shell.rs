//! Interactive command shell
//!
//! One command per line. Sounds are referenced by id (`rain`) or title,
//! presets by their 1-based position in `presets`, id or name. Volumes are
//! percentages.

use lull_core::{PresetId, SoundId};
use lull_playback::{PlaybackError, Session};
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const HELP: &str = "\
Playback:  play | pause | toggle | master <0-100> | mute
Sounds:    sound <name> | volume <name> <0-100> | hide <name> | show <name>
           move <name> <position> | reset-order | reset
Solo:      solo <name> | unsolo
Presets:   presets | apply <preset> | next | prev
           save <name> | rename <preset> <name> | delete <preset>
Timer:     timer <minutes> | timer off
Other:     status | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    MasterVolume(f32),
    Mute,
    ToggleSound(String),
    SoundVolume(String, f32),
    Hide(String),
    Show(String),
    Move(String, usize),
    ResetOrder,
    ResetSounds,
    Solo(String),
    Unsolo,
    ListPresets,
    Apply(String),
    Next,
    Previous,
    Save(String),
    Rename(String, String),
    Delete(String),
    Timer(Duration),
    CancelTimer,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        let Some((word, rest)) = split_word(line) else {
            return Ok(None);
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "play" => Self::Play,
            "pause" | "stop" => Self::Pause,
            "toggle" => Self::Toggle,
            "master" => Self::MasterVolume(percent(required(rest, "master", "a volume")?)?),
            "mute" => Self::Mute,
            "sound" => Self::ToggleSound(required(rest, "sound", "a sound name")?.to_string()),
            "volume" => {
                let (name, level) = split_last(required(rest, "volume", "a sound and a volume")?)
                    .ok_or(ParseError::MissingArgument {
                        command: "volume",
                        argument: "a sound and a volume",
                    })?;
                Self::SoundVolume(name.to_string(), percent(level)?)
            }
            "hide" => Self::Hide(required(rest, "hide", "a sound name")?.to_string()),
            "show" => Self::Show(required(rest, "show", "a sound name")?.to_string()),
            "move" => {
                let (name, position) = split_last(required(rest, "move", "a sound and a position")?)
                    .ok_or(ParseError::MissingArgument {
                        command: "move",
                        argument: "a sound and a position",
                    })?;
                let position: usize = position
                    .parse()
                    .ok()
                    .filter(|p| *p >= 1)
                    .ok_or_else(|| ParseError::InvalidNumber(position.to_string()))?;
                Self::Move(name.to_string(), position - 1)
            }
            "reset-order" => Self::ResetOrder,
            "reset" => Self::ResetSounds,
            "solo" => Self::Solo(required(rest, "solo", "a sound name")?.to_string()),
            "unsolo" => Self::Unsolo,
            "presets" => Self::ListPresets,
            "apply" => Self::Apply(required(rest, "apply", "a preset")?.to_string()),
            "next" => Self::Next,
            "prev" | "previous" => Self::Previous,
            "save" => Self::Save(required(rest, "save", "a preset name")?.to_string()),
            "rename" => {
                let (preset, name) = split_word(required(rest, "rename", "a preset and a name")?)
                    .filter(|(_, name)| !name.is_empty())
                    .ok_or(ParseError::MissingArgument {
                        command: "rename",
                        argument: "a preset and a name",
                    })?;
                Self::Rename(preset.to_string(), name.to_string())
            }
            "delete" => Self::Delete(required(rest, "delete", "a preset")?.to_string()),
            "timer" => {
                let arg = required(rest, "timer", "minutes or 'off'")?;
                if arg.eq_ignore_ascii_case("off") {
                    Self::CancelTimer
                } else {
                    let minutes: f64 = arg
                        .parse()
                        .ok()
                        .filter(|m: &f64| m.is_finite() && *m > 0.0)
                        .ok_or_else(|| ParseError::InvalidNumber(arg.to_string()))?;
                    Self::Timer(Duration::from_secs_f64(minutes * 60.0))
                }
            }
            "status" | "ls" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ParseError::UnknownCommand(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    })
}

/// Split off the last word, keeping multi-word names in front
fn split_last(input: &str) -> Option<(&str, &str)> {
    let (front, last) = input.trim().rsplit_once(char::is_whitespace)?;
    let front = front.trim();
    (!front.is_empty()).then_some((front, last))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn percent(input: &str) -> Result<f32, ParseError> {
    let value: f32 = input
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ParseError::InvalidNumber(input.to_string()))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ParseError::InvalidNumber(input.to_string()));
    }
    Ok(value / 100.0)
}

/// Find a sound by id, then by title (case-insensitive)
pub fn resolve_sound(session: &Session, query: &str) -> Option<SoundId> {
    let catalog = session.audio().catalog();
    let id = SoundId::new(query);
    if catalog.contains(&id) {
        return Some(id);
    }
    catalog
        .iter()
        .find(|s| s.title.eq_ignore_ascii_case(query) || s.id.as_str().eq_ignore_ascii_case(query))
        .map(|s| s.id.clone())
}

/// Find a preset by 1-based position, id or name (case-insensitive)
pub fn resolve_preset(session: &Session, query: &str) -> Option<PresetId> {
    let presets = session.presets().presets();
    if let Ok(position) = query.parse::<usize>() {
        if let Some(preset) = position.checked_sub(1).and_then(|i| presets.get(i)) {
            return Some(preset.id.clone());
        }
    }
    presets
        .iter()
        .find(|p| p.id.as_str() == query || p.display_name().eq_ignore_ascii_case(query))
        .map(|p| p.id.clone())
}

fn sound_arg(session: &Session, query: &str) -> lull_playback::Result<SoundId> {
    resolve_sound(session, query).ok_or_else(|| PlaybackError::SoundNotFound(SoundId::new(query)))
}

fn preset_arg(session: &Session, query: &str) -> lull_playback::Result<PresetId> {
    resolve_preset(session, query).ok_or_else(|| PlaybackError::PresetNotFound(PresetId::new(query)))
}

/// Run a command against the session
pub async fn execute(
    session: &mut Session,
    command: Command,
    now: Instant,
) -> lull_playback::Result<Reply> {
    let text = match command {
        Command::Play => {
            session.set_playing(true).await;
            status_line(session, now)
        }
        Command::Pause => {
            session.set_playing(false).await;
            status_line(session, now)
        }
        Command::Toggle => {
            session.toggle_playback().await;
            status_line(session, now)
        }
        Command::MasterVolume(level) => {
            session.set_global_volume(level).await;
            status_line(session, now)
        }
        Command::Mute => {
            session.toggle_mute().await;
            status_line(session, now)
        }
        Command::ToggleSound(name) => {
            let id = sound_arg(session, &name)?;
            let selected = session.toggle_sound(&id).await?;
            format!("{id} {}", if selected { "on" } else { "off" })
        }
        Command::SoundVolume(name, level) => {
            let id = sound_arg(session, &name)?;
            session.set_sound_volume(&id, level).await?;
            format!("{id} volume {:.0}%", level * 100.0)
        }
        Command::Hide(name) => {
            let id = sound_arg(session, &name)?;
            session.set_sound_hidden(&id, true).await?;
            format!("{id} hidden")
        }
        Command::Show(name) => {
            let id = sound_arg(session, &name)?;
            session.set_sound_hidden(&id, false).await?;
            format!("{id} shown")
        }
        Command::Move(name, index) => {
            let id = sound_arg(session, &name)?;
            session.move_sound(&id, index).await?;
            render_status(session, now)
        }
        Command::ResetOrder => {
            session.reset_order().await;
            render_status(session, now)
        }
        Command::ResetSounds => {
            session.reset_sounds().await;
            render_status(session, now)
        }
        Command::Solo(name) => {
            let id = sound_arg(session, &name)?;
            session.toggle_solo(&id).await?;
            status_line(session, now)
        }
        Command::Unsolo => {
            if session.exit_solo().await {
                status_line(session, now)
            } else {
                "Solo mode is not active".to_string()
            }
        }
        Command::ListPresets => render_presets(session),
        Command::Apply(query) => {
            let id = preset_arg(session, &query)?;
            session.apply_preset(&id).await?;
            status_line(session, now)
        }
        Command::Next => {
            session.next_preset().await?;
            status_line(session, now)
        }
        Command::Previous => {
            session.previous_preset().await?;
            status_line(session, now)
        }
        Command::Save(name) => {
            session.save_new_preset(&name).await?;
            render_presets(session)
        }
        Command::Rename(query, name) => {
            let id = preset_arg(session, &query)?;
            session.rename_preset(&id, &name).await?;
            render_presets(session)
        }
        Command::Delete(query) => {
            let id = preset_arg(session, &query)?;
            session.delete_preset(&id).await?;
            render_presets(session)
        }
        Command::Timer(duration) => {
            session.start_timer(duration, now);
            format!("Pausing in {}", format_duration(duration))
        }
        Command::CancelTimer => {
            session.cancel_timer();
            "Sleep timer cancelled".to_string()
        }
        Command::Status => render_status(session, now),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Text(text))
}

/// One-line summary of playback, preset, volume and timer
pub fn status_line(session: &Session, now: Instant) -> String {
    let audio = session.audio();
    let mut line = String::from(if audio.is_playing() { "Playing" } else { "Paused" });

    if let Some(solo) = audio.solo_sound() {
        let _ = write!(line, " | solo: {solo}");
    } else if let Some(preset) = session.presets().current() {
        let _ = write!(line, " | preset: {}", preset.display_name());
    }

    let _ = write!(line, " | volume {:.0}%", audio.global_volume() * 100.0);
    if audio.is_muted() {
        line.push_str(" (muted)");
    } else {
        let _ = write!(line, " ({:.1} dB)", audio.global_volume_db());
    }

    if session.timer_running() {
        let remaining = session.timer_remaining(now).unwrap_or_default();
        let _ = write!(line, " | timer {}", format_duration(remaining));
    }
    line
}

/// Status line followed by every visible sound in display order
pub fn render_status(session: &Session, now: Instant) -> String {
    let mut out = status_line(session, now);
    let solo = session.audio().solo_sound();

    for (position, sound) in session.audio().catalog().visible().into_iter().enumerate() {
        let mark = if solo == Some(&sound.id) {
            "S"
        } else if sound.is_selected {
            "x"
        } else {
            " "
        };
        let _ = write!(
            out,
            "\n{:>3}. [{mark}] {:<16} {:>3.0}%  {}",
            position + 1,
            sound.id.as_str(),
            sound.volume * 100.0,
            sound.title
        );
    }
    out
}

pub fn render_presets(session: &Session) -> String {
    let current = session.presets().current_id();
    let mut out = String::new();
    for (position, preset) in session.presets().presets().iter().enumerate() {
        let marker = if current == Some(&preset.id) { "*" } else { " " };
        let selected = preset.sound_states.iter().filter(|s| s.is_selected).count();
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{marker}{:>2}. {} ({selected} sounds)",
            position + 1,
            preset.display_name()
        );
    }
    out
}

fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
