//! Commands from the control surface and the cooperative poll step.

use heapless::Deque;
use rb_ir::Instant;

use crate::player::{PlayError, Player};
use crate::relay::{RelayOutput, StatusIndicator};

/// A request from whatever is controlling playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start from the first note, optionally at a new speed.
    Play { speed: Option<i32> },
    Stop,
    SetSpeed(i32),
    /// A speed request that carried no value. Acknowledged, speed unchanged.
    KeepSpeed,
}

/// Acknowledgment for a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Playing,
    Stopped,
    SpeedUpdated,
    NoSongData,
}

impl Reply {
    /// HTTP-style status code.
    pub const fn status(self) -> u16 {
        match self {
            Reply::NoSongData => 500,
            _ => 200,
        }
    }

    pub const fn body(self) -> &'static str {
        match self {
            Reply::Playing => "Playing song",
            Reply::Stopped => "Stopped",
            Reply::SpeedUpdated => "Speed updated",
            Reply::NoSongData => "No song data compiled in.",
        }
    }

    pub const fn is_ok(self) -> bool {
        self.status() == 200
    }
}

impl<'s, R: RelayOutput, S: StatusIndicator> Player<'s, R, S> {
    /// Run one command and acknowledge it.
    pub fn execute(&mut self, command: Command, now: Instant) -> Reply {
        match command {
            Command::Play { speed } => match self.play(speed, now) {
                Ok(()) => Reply::Playing,
                Err(PlayError::NoSongData) => Reply::NoSongData,
            },
            Command::Stop => {
                self.stop();
                Reply::Stopped
            }
            Command::SetSpeed(percent) => {
                self.set_speed(percent);
                Reply::SpeedUpdated
            }
            Command::KeepSpeed => {
                log::debug!("speed request without a value, keeping {}%", self.speed().get());
                Reply::SpeedUpdated
            }
        }
    }
}

/// Anything that issues commands to the player between ticks.
pub trait ControlSurface {
    /// Handle whatever requests are pending. Must not block.
    fn service<R: RelayOutput, S: StatusIndicator>(
        &mut self,
        player: &mut Player<'_, R, S>,
        now: Instant,
    );
}

/// One cooperative step: let the control surface run, then advance playback.
pub fn poll<C, R, S>(surface: &mut C, player: &mut Player<'_, R, S>, now: Instant)
where
    C: ControlSurface,
    R: RelayOutput,
    S: StatusIndicator,
{
    surface.service(player, now);
    player.tick(now);
}

/// Fixed-capacity command buffer with matching replies.
///
/// Commands pushed between polls are executed in order on the next
/// [`poll`]; each produces one reply, collected with
/// [`pop_reply`](CommandQueue::pop_reply). If the reply buffer is full the
/// oldest reply is dropped.
pub struct CommandQueue<const N: usize> {
    pending: Deque<Command, N>,
    replies: Deque<Reply, N>,
}

impl<const N: usize> CommandQueue<N> {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
            replies: Deque::new(),
        }
    }

    /// Queue a command. Hands it back if the queue is full.
    pub fn push(&mut self, command: Command) -> Result<(), Command> {
        self.pending.push_back(command)
    }

    pub fn pop_reply(&mut self) -> Option<Reply> {
        self.replies.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ControlSurface for CommandQueue<N> {
    fn service<R: RelayOutput, S: StatusIndicator>(
        &mut self,
        player: &mut Player<'_, R, S>,
        now: Instant,
    ) {
        while let Some(command) = self.pending.pop_front() {
            let reply = player.execute(command, now);
            if self.replies.is_full() {
                self.replies.pop_front();
            }
            let _ = self.replies.push_back(reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_ir::{Note, RelayMask, Song};

    #[derive(Default)]
    struct Board(RelayMask);

    impl RelayOutput for Board {
        fn apply_mask(&mut self, mask: RelayMask) {
            self.0 = mask;
        }
    }

    const NOTES: [Note; 2] = [Note::new(0x01, 100), Note::rest(50)];

    fn ms(t: u32) -> Instant {
        Instant::new(t, t * 1000)
    }

    #[test]
    fn replies_match_commands() {
        let mut p = Player::new(Song::new(&NOTES), Board::default(), ());
        assert_eq!(p.execute(Command::Play { speed: Some(120) }, ms(0)), Reply::Playing);
        assert_eq!(p.execute(Command::SetSpeed(500), ms(1)), Reply::SpeedUpdated);
        assert_eq!(p.speed().get(), 300);
        assert_eq!(p.execute(Command::KeepSpeed, ms(2)), Reply::SpeedUpdated);
        assert_eq!(p.speed().get(), 300);
        assert_eq!(p.execute(Command::Stop, ms(2)), Reply::Stopped);
        assert_eq!(p.execute(Command::Stop, ms(3)), Reply::Stopped);
    }

    #[test]
    fn play_without_song_reports_500() {
        let mut p = Player::new(Song::empty(), Board::default(), ());
        let reply = p.execute(Command::Play { speed: None }, ms(0));
        assert_eq!(reply, Reply::NoSongData);
        assert_eq!(reply.status(), 500);
        assert_eq!(reply.body(), "No song data compiled in.");
        assert!(!reply.is_ok());
    }

    #[test]
    fn reply_bodies() {
        assert_eq!(Reply::Playing.body(), "Playing song");
        assert_eq!(Reply::Stopped.body(), "Stopped");
        assert_eq!(Reply::SpeedUpdated.body(), "Speed updated");
        assert_eq!(Reply::SpeedUpdated.status(), 200);
    }

    #[test]
    fn poll_services_commands_before_ticking() {
        let mut p = Player::new(Song::new(&NOTES), Board::default(), ());
        let mut queue = CommandQueue::<4>::new();
        queue.push(Command::Play { speed: Some(100) }).unwrap();

        poll(&mut queue, &mut p, ms(0));
        assert!(p.is_playing());
        assert_eq!(queue.pop_reply(), Some(Reply::Playing));
        assert_eq!(queue.pop_reply(), None);

        poll(&mut queue, &mut p, ms(12));
        assert_eq!(p.relays().0, RelayMask(0x01));

        // Stop lands before the tick in the same poll
        queue.push(Command::Stop).unwrap();
        poll(&mut queue, &mut p, ms(24));
        assert!(!p.is_playing());
        assert_eq!(p.relays().0, RelayMask::EMPTY);
        assert_eq!(queue.pop_reply(), Some(Reply::Stopped));
    }

    #[test]
    fn full_queue_hands_command_back() {
        let mut queue = CommandQueue::<2>::new();
        queue.push(Command::Stop).unwrap();
        queue.push(Command::Stop).unwrap();
        assert_eq!(queue.push(Command::SetSpeed(90)), Err(Command::SetSpeed(90)));
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn commands_run_in_order() {
        let mut p = Player::new(Song::new(&NOTES), Board::default(), ());
        let mut queue = CommandQueue::<4>::new();
        queue.push(Command::SetSpeed(60)).unwrap();
        queue.push(Command::Play { speed: None }).unwrap();
        queue.push(Command::SetSpeed(250)).unwrap();

        poll(&mut queue, &mut p, ms(0));
        assert!(queue.is_idle());
        assert_eq!(p.speed().get(), 250);
        assert_eq!(queue.pop_reply(), Some(Reply::SpeedUpdated));
        assert_eq!(queue.pop_reply(), Some(Reply::Playing));
        assert_eq!(queue.pop_reply(), Some(Reply::SpeedUpdated));
    }

    #[test]
    fn oldest_reply_dropped_when_unread() {
        let mut p = Player::new(Song::new(&NOTES), Board::default(), ());
        let mut queue = CommandQueue::<2>::new();
        for speed in [60, 70] {
            queue.push(Command::SetSpeed(speed)).unwrap();
            poll(&mut queue, &mut p, ms(0));
        }
        queue.push(Command::Stop).unwrap();
        poll(&mut queue, &mut p, ms(1));

        assert_eq!(queue.pop_reply(), Some(Reply::SpeedUpdated));
        assert_eq!(queue.pop_reply(), Some(Reply::Stopped));
        assert_eq!(queue.pop_reply(), None);
    }
}
