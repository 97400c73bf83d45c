//! Built-in songs.

use rb_ir::Note;

/// Walks up every relay one at a time, then a few chords, then a rest.
pub static DEMO_SONG: &[Note] = &[
    Note::new(0x01, 200),
    Note::new(0x02, 200),
    Note::new(0x04, 200),
    Note::new(0x08, 200),
    Note::new(0x10, 200),
    Note::new(0x20, 200),
    Note::new(0x40, 200),
    Note::new(0x80, 400),
    Note::rest(200),
    Note::new(0x11, 300),
    Note::new(0x24, 300),
    Note::new(0x81, 600),
    Note::rest(400),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rb_ir::{RelayMask, Song};

    #[test]
    fn demo_uses_every_relay() {
        let song = Song::new(DEMO_SONG);
        assert_eq!(song.relays_used(), RelayMask(0xFF));
        assert!(song.notes().iter().any(Note::is_rest));
    }
}
