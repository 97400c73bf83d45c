//! Song formats for the relaybox player.
//!
//! - [`encode_midi`] turns a Standard MIDI File into relay notes.
//! - [`read_song`] / [`write_song`] handle the `.rsong` binary container.
//! - [`to_rust_source`] renders notes as a `static` table to compile into firmware.

mod container;
mod midi;
mod rust_source;

pub use container::{read_song, song_to_bytes, write_song, ContainerError, FORMAT_VERSION, MAGIC};
pub use midi::{encode_midi, pitch_to_relay, EncodeError, EncodedSong, DEFAULT_TEMPO_US};
pub use rust_source::{const_name, to_rust_source};
