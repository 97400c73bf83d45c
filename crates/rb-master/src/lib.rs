//! Host controller for the relaybox player.
//!
//! Runs the playback engine on a desktop against a simulated relay board,
//! so songs and control flows can be tried without the hardware. The
//! same API backs the `relaybox` binary and the integration tests.

mod board;
mod clock;
mod config;
mod songs;
mod surface;

use std::fs;
use std::path::Path;

use rb_engine::{poll, Command, CommandQueue, Player, Reply};
use rb_ir::{Note, Song};
use thiserror::Error;

pub use board::{SimLed, SimRelays};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
pub use rb_formats::{ContainerError, EncodeError};
pub use songs::DEMO_SONG;
pub use surface::{parse_command, CommandParseError};

/// Commands that can wait between two polls.
pub const QUEUE_DEPTH: usize = 8;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Owns a song and the settings to play it with.
pub struct Controller {
    notes: Vec<Note>,
    config: Config,
}

impl Controller {
    /// Controller with no song; playing it reports missing song data.
    pub fn new(config: Config) -> Self {
        Self {
            notes: Vec::new(),
            config,
        }
    }

    pub fn with_demo_song(config: Config) -> Self {
        let mut ctrl = Self::new(config);
        ctrl.notes = DEMO_SONG.to_vec();
        ctrl
    }

    // --- Song management ---

    pub fn song(&self) -> Song<'_> {
        Song::new(&self.notes)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    /// Load a `.rsong` container.
    pub fn load_rsong(&mut self, data: &[u8]) -> Result<(), ContainerError> {
        self.notes = rb_formats::read_song(data)?;
        Ok(())
    }

    /// Encode and load a Standard MIDI File.
    pub fn load_midi(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.notes = rb_formats::encode_midi(data)?.notes;
        Ok(())
    }

    /// Load a song file, picking the format from the extension
    /// (`.mid`/`.midi` are encoded, anything else is read as `.rsong`).
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let data = fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_midi = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mid") || e.eq_ignore_ascii_case("midi"));
        if is_midi {
            self.load_midi(&data)?;
        } else {
            self.load_rsong(&data)?;
        }
        log::info!("loaded {} notes from {}", self.notes.len(), path.display());
        Ok(())
    }

    // --- Playback ---

    /// Start a session on the wall clock.
    pub fn session(&self) -> Session<'_, SystemClock> {
        self.session_with_clock(SystemClock::new())
    }

    pub fn session_with_clock<C: Clock>(&self, clock: C) -> Session<'_, C> {
        let relays = SimRelays::new(self.config.relay_pins);
        let led = SimLed::new(self.config.status_led_pin);
        let player = Player::new(self.song(), relays, led)
            .with_frequencies(self.config.frequency_table())
            .with_speed(self.config.speed());
        Session {
            player,
            queue: CommandQueue::new(),
            clock,
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::with_demo_song(Config::default())
    }
}

/// A running player on the simulated board.
pub struct Session<'s, C> {
    player: Player<'s, SimRelays, SimLed>,
    queue: CommandQueue<QUEUE_DEPTH>,
    clock: C,
}

impl<'s, C: Clock> Session<'s, C> {
    /// Queue a command for the next poll. Hands it back if the queue is full.
    pub fn submit(&mut self, command: Command) -> Result<(), Command> {
        self.queue.push(command)
    }

    /// One cooperative step at the clock's current time.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        poll(&mut self.queue, &mut self.player, now);
    }

    /// Next acknowledgment, oldest first.
    pub fn take_reply(&mut self) -> Option<Reply> {
        self.queue.pop_reply()
    }

    pub fn player(&self) -> &Player<'s, SimRelays, SimLed> {
        &self.player
    }

    pub fn relays(&self) -> &SimRelays {
        self.player.relays()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_ir::RelayMask;

    #[test]
    fn empty_controller_cannot_play() {
        let ctrl = Controller::new(Config::default());
        let mut session = ctrl.session_with_clock(ManualClock::new());
        session.submit(Command::Play { speed: None }).unwrap();
        session.poll();
        assert_eq!(session.take_reply(), Some(Reply::NoSongData));
        assert!(!session.player().is_playing());
    }

    #[test]
    fn session_uses_configured_speed_and_table() {
        let config = Config {
            speed_percent: 200,
            frequencies: [100; 8],
            ..Config::default()
        };
        let ctrl = Controller::with_demo_song(config);
        let session = ctrl.session_with_clock(ManualClock::new());
        assert_eq!(session.player().speed().get(), 200);
        assert_eq!(session.player().frequencies().0, [100; 8]);
    }

    #[test]
    fn demo_song_plays_on_manual_clock() {
        let ctrl = Controller::default();
        let clock = ManualClock::new();
        let mut session = ctrl.session_with_clock(&clock);

        session.submit(Command::Play { speed: Some(100) }).unwrap();
        session.poll();
        assert_eq!(session.take_reply(), Some(Reply::Playing));
        assert!(session.player().status().is_on());

        for _ in 0..150 {
            clock.advance_ms(1);
            session.poll();
        }
        // relay 0 at 45 Hz toggles about every 11ms
        assert!(session.relays().clicks()[0] >= 5);
        assert_eq!(session.player().current_index(), Some(0));

        clock.advance_ms(60);
        session.poll();
        assert_eq!(session.player().current_index(), Some(1));

        session.submit(Command::Stop).unwrap();
        session.poll();
        assert_eq!(session.relays().mask(), RelayMask::EMPTY);
        assert!(!session.player().status().is_on());
    }

    #[test]
    fn load_rsong_bytes() {
        let notes = vec![Note::new(0x01, 10), Note::rest(20)];
        let bytes = rb_formats::song_to_bytes(&notes).unwrap();
        let mut ctrl = Controller::new(Config::default());
        ctrl.load_rsong(&bytes).unwrap();
        assert_eq!(ctrl.song().notes(), notes.as_slice());
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut ctrl = Controller::new(Config::default());
        let err = ctrl.load_file(Path::new("no/such/song.rsong")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
