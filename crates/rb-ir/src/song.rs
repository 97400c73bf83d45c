//! Song sequence type.

use crate::note::{Note, RelayMask};

/// An ordered, looping sequence of notes.
///
/// Borrows its notes so that a `static` table compiled into firmware can
/// back it directly. An empty song is representable; the player refuses
/// to start one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Song<'a> {
    notes: &'a [Note],
}

impl<'a> Song<'a> {
    pub const fn new(notes: &'a [Note]) -> Self {
        Self { notes }
    }

    /// A song with no notes.
    pub const fn empty() -> Self {
        Self { notes: &[] }
    }

    pub const fn len(&self) -> usize {
        self.notes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Note> {
        self.notes.get(index)
    }

    pub const fn notes(&self) -> &'a [Note] {
        self.notes
    }

    /// Index of the note after `index`, wrapping to 0 past the end.
    pub fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next >= self.notes.len() {
            0
        } else {
            next
        }
    }

    /// Sum of all nominal durations, in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.notes.iter().map(|n| n.duration_ms as u64).sum()
    }

    /// Union of every relay the song ever touches.
    pub fn relays_used(&self) -> RelayMask {
        self.notes
            .iter()
            .fold(RelayMask::EMPTY, |acc, n| acc.union(n.mask))
    }
}

impl<'a> From<&'a [Note]> for Song<'a> {
    fn from(notes: &'a [Note]) -> Self {
        Self::new(notes)
    }
}
