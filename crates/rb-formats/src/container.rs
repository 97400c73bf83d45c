//! `.rsong` binary song container.
//!
//! Layout (little-endian):
//!
//! | field   | type  |                        |
//! |---------|-------|------------------------|
//! | magic   | 4     | `RSNG`                 |
//! | version | u8    | [`FORMAT_VERSION`]     |
//! | count   | u32   | number of notes        |
//! | notes   | 5 * n | `mask: u8, dur_ms: u32`|

use std::io::{Cursor, Seek, Write};

use binrw::{binrw, BinRead, BinWrite};
use rb_ir::Note;
use thiserror::Error;

pub const MAGIC: &[u8; 4] = b"RSNG";
pub const FORMAT_VERSION: u8 = 1;

/// Error type for the song container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("not a relay song file")]
    BadMagic,

    #[error("unsupported song file version {0}")]
    UnsupportedVersion(u8),

    #[error("too many notes for one song file: {0}")]
    TooManyNotes(usize),

    #[error("malformed song file: {0}")]
    Malformed(binrw::Error),
}

impl From<binrw::Error> for ContainerError {
    fn from(e: binrw::Error) -> Self {
        // field errors arrive wrapped in a backtrace
        if matches!(e.root_cause(), binrw::Error::BadMagic { .. }) {
            ContainerError::BadMagic
        } else {
            ContainerError::Malformed(e)
        }
    }
}

#[binrw]
#[brw(little, magic = b"RSNG")]
struct SongFile {
    version: u8,
    #[bw(calc = records.len() as u32)]
    count: u32,
    #[br(count = count)]
    records: Vec<NoteRecord>,
}

#[binrw]
#[brw(little)]
#[derive(Clone, Copy)]
struct NoteRecord {
    mask: u8,
    duration_ms: u32,
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            mask: note.mask.bits(),
            duration_ms: note.duration_ms,
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note::new(record.mask, record.duration_ms)
    }
}

/// Parse a song file.
pub fn read_song(data: &[u8]) -> Result<Vec<Note>, ContainerError> {
    // Check the version before trusting the count that follows it
    if data.len() > MAGIC.len() && data.starts_with(MAGIC) {
        let version = data[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }
    }

    let file = SongFile::read(&mut Cursor::new(data))?;
    Ok(file.records.into_iter().map(Note::from).collect())
}

/// Write `notes` as a song file.
pub fn write_song<W: Write + Seek>(w: &mut W, notes: &[Note]) -> Result<(), ContainerError> {
    if u32::try_from(notes.len()).is_err() {
        return Err(ContainerError::TooManyNotes(notes.len()));
    }
    let file = SongFile {
        version: FORMAT_VERSION,
        records: notes.iter().map(NoteRecord::from).collect(),
    };
    file.write(w)?;
    Ok(())
}

/// Encode `notes` as song file bytes.
pub fn song_to_bytes(notes: &[Note]) -> Result<Vec<u8>, ContainerError> {
    let mut cursor = Cursor::new(Vec::with_capacity(9 + notes.len() * 5));
    write_song(&mut cursor, notes)?;
    Ok(cursor.into_inner())
}
