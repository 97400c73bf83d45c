//! Core song types for the relaybox player.
//!
//! A song is a flat, looping list of notes. Each note names the set of
//! relays that buzz for it and how long it lasts at 100% speed. The
//! offline encoder emits these types and the playback engine consumes
//! them.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod instant;
mod note;
mod song;

pub use instant::Instant;
pub use note::{Note, RelayMask, RELAY_COUNT};
pub use song::Song;
