//! Sound catalog
//!
//! The static list of playable sounds plus their live state. Sounds keep
//! their definition order internally; `custom_order` only affects listing.

use crate::error::{PlaybackError, Result};
use lull_core::types::{Sound, SoundDefinition, SoundId, SoundState, StoredSoundState};
use std::collections::HashSet;

/// All sounds known to the player
#[derive(Debug, Clone, Default)]
pub struct SoundCatalog {
    sounds: Vec<Sound>,
}

impl SoundCatalog {
    /// Build a catalog from definitions, in definition order
    pub fn new(definitions: Vec<SoundDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut sounds = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.into_iter().enumerate() {
            if !seen.insert(definition.id.clone()) {
                return Err(PlaybackError::DuplicateSound(definition.id));
            }
            sounds.push(Sound::from_definition(definition, index as i32));
        }

        Ok(Self { sounds })
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn contains(&self, id: &SoundId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &SoundId) -> Option<&Sound> {
        self.sounds.iter().find(|s| &s.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &SoundId) -> Option<&mut Sound> {
        self.sounds.iter_mut().find(|s| &s.id == id)
    }

    pub(crate) fn require(&self, id: &SoundId) -> Result<&Sound> {
        self.get(id)
            .ok_or_else(|| PlaybackError::SoundNotFound(id.clone()))
    }

    pub(crate) fn require_mut(&mut self, id: &SoundId) -> Result<&mut Sound> {
        self.get_mut(id)
            .ok_or_else(|| PlaybackError::SoundNotFound(id.clone()))
    }

    pub fn find_by_file_name(&self, file_name: &str) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.file_name == file_name)
    }

    /// Sounds in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Sound> {
        self.sounds.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sound> {
        self.sounds.iter_mut()
    }

    /// Sounds in the user's custom order (ties broken by title)
    pub fn ordered(&self) -> Vec<&Sound> {
        let mut list: Vec<&Sound> = self.sounds.iter().collect();
        list.sort_by(|a, b| {
            a.custom_order
                .cmp(&b.custom_order)
                .then_with(|| a.title.cmp(&b.title))
        });
        list
    }

    /// Ordered sounds without hidden ones
    pub fn visible(&self) -> Vec<&Sound> {
        self.ordered().into_iter().filter(|s| !s.is_hidden).collect()
    }

    /// Selected sounds, in custom order
    pub fn selected(&self) -> Vec<&Sound> {
        self.ordered().into_iter().filter(|s| s.is_selected).collect()
    }

    /// IDs of selected sounds, in definition order
    pub fn selected_ids(&self) -> Vec<SoundId> {
        self.sounds
            .iter()
            .filter(|s| s.is_selected)
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        self.sounds.iter().any(|s| s.is_selected)
    }

    /// Move a visible sound to `to_index` in the visible list
    ///
    /// Hidden sounds keep their slots; every sound is renumbered densely.
    pub fn move_sound(&mut self, id: &SoundId, to_index: usize) -> Result<()> {
        self.require(id)?;

        let ordered: Vec<(SoundId, bool)> = self
            .ordered()
            .into_iter()
            .map(|s| (s.id.clone(), s.is_hidden))
            .collect();

        let mut visible: Vec<SoundId> = ordered
            .iter()
            .filter(|(_, hidden)| !hidden)
            .map(|(sid, _)| sid.clone())
            .collect();

        let Some(from) = visible.iter().position(|sid| sid == id) else {
            return Err(lull_core::LullError::invalid_input(format!(
                "cannot move hidden sound '{id}'"
            ))
            .into());
        };
        let moved = visible.remove(from);
        let to = to_index.min(visible.len());
        visible.insert(to, moved);

        // Refill visible slots with the new sequence, hidden slots stay put
        let mut next_visible = visible.into_iter();
        let new_order: Vec<SoundId> = ordered
            .into_iter()
            .map(|(sid, hidden)| {
                if hidden {
                    sid
                } else {
                    next_visible.next().unwrap_or(sid)
                }
            })
            .collect();

        self.renumber(&new_order);
        Ok(())
    }

    /// Restore definition order
    pub fn reset_order(&mut self) {
        for (index, sound) in self.sounds.iter_mut().enumerate() {
            sound.custom_order = index as i32;
        }
    }

    /// Whether the custom order differs from definition order
    pub fn has_custom_order(&self) -> bool {
        self.ordered()
            .iter()
            .zip(self.sounds.iter())
            .any(|(a, b)| a.id != b.id)
    }

    /// File names in custom order
    pub fn order_file_names(&self) -> Vec<String> {
        self.ordered()
            .into_iter()
            .map(|s| s.file_name.clone())
            .collect()
    }

    /// Hide or unhide a sound. Hiding also deselects it.
    ///
    /// Returns whether anything changed.
    pub fn set_hidden(&mut self, id: &SoundId, hidden: bool) -> Result<bool> {
        let sound = self.require_mut(id)?;
        if sound.is_hidden == hidden {
            return Ok(false);
        }
        sound.is_hidden = hidden;
        if hidden {
            sound.is_selected = false;
        }
        Ok(true)
    }

    /// Preset tuples for every sound, in definition order
    pub fn snapshot(&self) -> Vec<SoundState> {
        self.sounds.iter().map(Sound::state).collect()
    }

    /// Apply preset tuples
    ///
    /// Listed sounds take the listed selection and volume. Listed sounds that
    /// are selected but hidden become visible again. Unlisted sounds are
    /// deselected and keep their volume. Returns the IDs that changed.
    pub fn apply_states(&mut self, states: &[SoundState]) -> Vec<SoundId> {
        for state in states {
            if self.find_by_file_name(&state.file_name).is_none() {
                tracing::warn!(
                    file_name = %state.file_name,
                    "preset references a sound that is not in the catalog"
                );
            }
        }

        let mut changed = Vec::new();
        for sound in &mut self.sounds {
            let before = (sound.is_selected, sound.volume, sound.is_hidden);

            match states.iter().find(|s| s.file_name == sound.file_name) {
                Some(state) => {
                    sound.is_selected = state.is_selected;
                    sound.set_volume(state.volume);
                    if state.is_selected {
                        sound.is_hidden = false;
                    }
                }
                None => sound.is_selected = false,
            }

            if before != (sound.is_selected, sound.volume, sound.is_hidden) {
                changed.push(sound.id.clone());
            }
        }
        changed
    }

    /// Apply a custom order given as file names
    ///
    /// Listed sounds take their list position; unlisted ones follow in their
    /// previous relative order. Returns whether the order changed.
    pub fn apply_order(&mut self, file_names: &[String]) -> bool {
        let previous: Vec<SoundId> = self.ordered().iter().map(|s| s.id.clone()).collect();

        let mut new_order: Vec<SoundId> = Vec::with_capacity(previous.len());
        for name in file_names {
            if let Some(sound) = self.find_by_file_name(name) {
                if !new_order.contains(&sound.id) {
                    new_order.push(sound.id.clone());
                }
            }
        }
        for id in &previous {
            if !new_order.contains(id) {
                new_order.push(id.clone());
            }
        }

        if new_order == previous {
            return false;
        }
        self.renumber(&new_order);
        true
    }

    /// Persisted state of one sound
    pub fn stored_state(&self, id: &SoundId) -> Option<StoredSoundState> {
        self.get(id).map(Sound::stored_state)
    }

    /// Restore persisted state of one sound
    pub fn restore(&mut self, id: &SoundId, stored: StoredSoundState) -> Result<()> {
        let sound = self.require_mut(id)?;
        sound.is_hidden = stored.is_hidden;
        sound.is_selected = stored.is_selected && !stored.is_hidden;
        sound.set_volume(stored.volume);
        sound.custom_order = stored.custom_order;
        Ok(())
    }

    fn renumber(&mut self, order: &[SoundId]) {
        for (index, id) in order.iter().enumerate() {
            if let Some(sound) = self.get_mut(id) {
                sound.custom_order = index as i32;
            }
        }
    }
}
