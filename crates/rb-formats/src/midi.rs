//! Standard MIDI File to relay notes.
//!
//! All tracks are merged. Pitches are spread linearly over the eight
//! relays by their position in the song's pitch range, and the timeline
//! is cut into segments wherever the set of sounding pitches changes.
//! Each segment becomes one note whose mask is the union of the relays of
//! every pitch sounding in it.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use rb_ir::{Note, RelayMask, Song, RELAY_COUNT};
use thiserror::Error;

/// MIDI default tempo (120 BPM) when the file has no tempo event.
pub const DEFAULT_TEMPO_US: u32 = 500_000;

/// Error type for MIDI encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("invalid MIDI file: {0}")]
    Midi(#[from] midly::Error),

    #[error("SMPTE timecode files are not supported")]
    UnsupportedTiming,

    #[error("no note events found")]
    NoNoteEvents,

    #[error("no usable segments built")]
    NoSegments,
}

/// Result of encoding a MIDI file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSong {
    pub notes: Vec<Note>,
    /// Tempo used for the whole file, in microseconds per quarter note.
    pub tempo_us: u32,
    pub ticks_per_quarter: u16,
    /// Lowest and highest MIDI key seen.
    pub pitch_range: (u8, u8),
}

impl EncodedSong {
    pub fn song(&self) -> Song<'_> {
        Song::new(&self.notes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Off,
    On,
}

#[derive(Clone, Copy, Debug)]
struct KeyEvent {
    tick: u64,
    edge: Edge,
    key: u8,
}

/// Encode a Standard MIDI File into relay notes.
pub fn encode_midi(data: &[u8]) -> Result<EncodedSong, EncodeError> {
    let smf = Smf::parse(data)?;
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => tpq.as_int(),
        Timing::Timecode(..) => return Err(EncodeError::UnsupportedTiming),
    };

    let tempo_us = first_tempo(&smf).unwrap_or(DEFAULT_TEMPO_US);
    // a zero division would otherwise give NaN durations
    let ms_per_tick = tempo_us as f64 / 1000.0 / ticks_per_quarter.max(1) as f64;

    let mut events = collect_key_events(&smf);
    if events.is_empty() {
        return Err(EncodeError::NoNoteEvents);
    }
    events.sort_by_key(|e| e.tick);

    let min_key = events.iter().map(|e| e.key).min().unwrap_or(0);
    let max_key = events.iter().map(|e| e.key).max().unwrap_or(0);
    log::debug!(
        "tempo {}us/qn, {} ticks/qn, keys {}..={}",
        tempo_us,
        ticks_per_quarter,
        min_key,
        max_key
    );

    let notes = build_segments(&events, ms_per_tick, min_key, max_key);
    if notes.is_empty() {
        return Err(EncodeError::NoSegments);
    }

    Ok(EncodedSong {
        notes,
        tempo_us,
        ticks_per_quarter,
        pitch_range: (min_key, max_key),
    })
}

/// Relay for `key` when the song spans `min_key..=max_key`.
///
/// Rounds half to even, so a key exactly between two relays goes to the
/// even one.
pub fn pitch_to_relay(key: u8, min_key: u8, max_key: u8) -> usize {
    if max_key <= min_key {
        return 0;
    }
    let norm = (key as f64 - min_key as f64) / (max_key - min_key) as f64;
    let idx = (norm * (RELAY_COUNT - 1) as f64).round_ties_even();
    idx.clamp(0.0, (RELAY_COUNT - 1) as f64) as usize
}

/// First tempo event, scanning tracks in file order.
fn first_tempo(smf: &Smf<'_>) -> Option<u32> {
    smf.tracks.iter().find_map(|track| {
        track.iter().find_map(|event| match event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        })
    })
}

fn collect_key_events(smf: &Smf<'_>) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        for event in track {
            tick += event.delta.as_int() as u64;
            let TrackEventKind::Midi { message, .. } = event.kind else {
                continue;
            };
            let (edge, key) = match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => (Edge::On, key),
                // note-on with velocity 0 is a note-off
                MidiMessage::NoteOn { key, .. } => (Edge::Off, key),
                MidiMessage::NoteOff { key, .. } => (Edge::Off, key),
                _ => continue,
            };
            events.push(KeyEvent {
                tick,
                edge,
                key: key.as_int(),
            });
        }
    }
    events
}

fn build_segments(events: &[KeyEvent], ms_per_tick: f64, min_key: u8, max_key: u8) -> Vec<Note> {
    let mut notes = Vec::new();
    // keys currently sounding
    let mut active = [false; 128];
    let mut prev_tick = events[0].tick;
    let mut i = 0;

    while i < events.len() {
        let tick = events[i].tick;

        if tick > prev_tick {
            let dt = (tick - prev_tick) as f64;
            let dur_ms = (dt * ms_per_tick).round_ties_even();
            if dur_ms > 0.0 {
                let mask = active_mask(&active, min_key, max_key);
                notes.push(Note {
                    mask,
                    duration_ms: dur_ms.min(u32::MAX as f64) as u32,
                });
            }
            prev_tick = tick;
        }

        while i < events.len() && events[i].tick == tick {
            let e = events[i];
            active[e.key as usize & 0x7F] = e.edge == Edge::On;
            i += 1;
        }
    }

    notes
}

fn active_mask(active: &[bool; 128], min_key: u8, max_key: u8) -> RelayMask {
    active
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .fold(RelayMask::EMPTY, |mask, (key, _)| {
            mask.union(RelayMask::single(pitch_to_relay(key as u8, min_key, max_key)))
        })
}
