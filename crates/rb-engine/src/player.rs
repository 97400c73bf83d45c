//! Playback state machine.
//!
//! The player is either idle or playing. While playing, each
//! [`tick`](Player::tick) compares the time spent on the current note with
//! its speed-scaled duration, moves on (looping at the end of the song)
//! when it is up, and otherwise keeps the note's relays buzzing.
//!
//! Speed changes take effect at the next end-of-note check and are applied
//! to the whole nominal duration of the current note, not just what is
//! left of it. A note that has already run longer than its new length ends
//! on the next tick; a note slowed down mid-way runs on for the full new
//! length measured from when it started.

use core::fmt;

use rb_ir::{Instant, Note, Song};

use crate::relay::{RelayOutput, StatusIndicator};
use crate::speed::SpeedPercent;
use crate::waveform::{FrequencyTable, WaveformGenerator};

/// Why a play request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayError {
    /// The song has no notes.
    NoSongData,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NoSongData => write!(f, "No song data compiled in."),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlayError {}

/// Position within the song while playing.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    index: usize,
    note_start_ms: u32,
}

/// Owns the song, the relays and all playback state.
pub struct Player<'s, R, S> {
    song: Song<'s>,
    relays: R,
    status: S,
    frequencies: FrequencyTable,
    speed: SpeedPercent,
    /// `None` while idle.
    cursor: Option<Cursor>,
    wave: WaveformGenerator,
}

impl<'s, R: RelayOutput, S: StatusIndicator> Player<'s, R, S> {
    /// Create an idle player. Relays are forced off and the indicator cleared.
    pub fn new(song: Song<'s>, mut relays: R, mut status: S) -> Self {
        relays.all_off();
        status.set_playing(false);
        Self {
            song,
            relays,
            status,
            frequencies: FrequencyTable::DEFAULT,
            speed: SpeedPercent::DEFAULT,
            cursor: None,
            wave: WaveformGenerator::default(),
        }
    }

    pub fn with_frequencies(mut self, frequencies: FrequencyTable) -> Self {
        self.frequencies = frequencies;
        self
    }

    pub fn with_speed(mut self, speed: SpeedPercent) -> Self {
        self.speed = speed;
        self
    }

    // --- Commands ---

    /// Start (or restart) from the first note.
    ///
    /// `speed`, when given, is clamped and becomes the active speed. Fails
    /// without touching any state if the song is empty.
    pub fn play(&mut self, speed: Option<i32>, now: Instant) -> Result<(), PlayError> {
        if self.song.is_empty() {
            log::warn!("play refused: song is empty");
            return Err(PlayError::NoSongData);
        }

        if let Some(requested) = speed {
            self.speed = SpeedPercent::new(requested);
        }

        self.cursor = Some(Cursor {
            index: 0,
            note_start_ms: now.ms,
        });
        self.relays.all_off();
        self.wave.reset(now.us);
        self.status.set_playing(true);

        log::debug!("play: {} notes at {}%", self.song.len(), self.speed.get());
        Ok(())
    }

    /// Halt playback. Relays go off even if already idle.
    pub fn stop(&mut self) {
        if self.cursor.take().is_some() {
            log::debug!("stop");
        }
        self.relays.all_off();
        self.status.set_playing(false);
    }

    /// Clamp and apply a new speed. Valid in either state.
    pub fn set_speed(&mut self, percent: i32) {
        self.speed = SpeedPercent::new(percent);
        log::debug!("speed: {}% (requested {})", self.speed.get(), percent);
    }

    // --- Realtime ---

    /// Advance playback to `now`. Never blocks and never allocates.
    pub fn tick(&mut self, now: Instant) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        let Some(note) = self.song.get(cursor.index).copied() else {
            // Unreachable while the song is non-empty and the index wraps.
            self.cursor = None;
            self.relays.all_off();
            return;
        };

        let target_ms = self.speed.scale(note.duration_ms);
        if now.ms_since(cursor.note_start_ms) >= target_ms {
            cursor.index = self.song.next_index(cursor.index);
            cursor.note_start_ms = now.ms;
            self.relays.all_off();
            self.wave.reset(now.us);
            log::trace!("note {} at {}ms", cursor.index, now.ms);
            return;
        }

        if note.is_rest() {
            self.relays.all_off();
            return;
        }

        self.wave.tick(note.mask, &self.frequencies, now, &mut self.relays);
    }

    // --- Queries ---

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Index of the note being played, `None` while idle.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.map(|c| c.index)
    }

    pub fn current_note(&self) -> Option<Note> {
        self.current_index()
            .and_then(|i| self.song.get(i))
            .copied()
    }

    pub fn speed(&self) -> SpeedPercent {
        self.speed
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn song(&self) -> Song<'s> {
        self.song
    }

    pub fn relays(&self) -> &R {
        &self.relays
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn into_parts(self) -> (R, S) {
        (self.relays, self.status)
    }
}
