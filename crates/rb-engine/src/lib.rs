//! Playback engine for the relaybox player.
//!
//! Turns a [`Song`](rb_ir::Song) into relay activity. Everything here is
//! driven by an explicit, non-blocking [`Player::tick`] that takes the
//! current time as an argument, so the engine never sleeps and can be
//! tested without hardware or a real clock.

#![cfg_attr(not(feature = "std"), no_std)]

mod control;
mod player;
mod relay;
mod speed;
mod waveform;

pub use control::{poll, Command, CommandQueue, ControlSurface, Reply};
pub use player::{PlayError, Player};
pub use relay::{OutputLine, RelayBank, RelayOutput, StatusIndicator};
pub use speed::{scaled_duration, SpeedPercent, MAX_EFFECTIVE_MS, MIN_EFFECTIVE_MS};
pub use waveform::{
    frequency_for_mask, half_period_us, FrequencyTable, WaveformGenerator, MIN_PERIOD_US,
};
