//! Render notes as Rust source for compiling a song into firmware.

use std::fmt::Write;

use rb_ir::Note;

/// Turn arbitrary text (usually a file stem) into a `SCREAMING_SNAKE` constant name.
pub fn const_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut last_underscore = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_uppercase());
            last_underscore = false;
        } else if !last_underscore && !name.is_empty() {
            name.push('_');
            last_underscore = true;
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    if name.is_empty() {
        return "SONG".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "SONG_");
    }
    name
}

/// Render `notes` as a `pub static NAME: &[Note]` table.
///
/// `source` is noted in a header comment when given.
pub fn to_rust_source(notes: &[Note], name: &str, source: Option<&str>) -> String {
    let mut out = String::with_capacity(96 + notes.len() * 28);
    match source {
        Some(src) => {
            let _ = writeln!(out, "// generated from {src} by relay-encode");
        }
        None => out.push_str("// generated by relay-encode\n"),
    }
    let total_ms: u64 = notes.iter().map(|n| n.duration_ms as u64).sum();
    let _ = writeln!(out, "// {} notes, {} ms at 100%", notes.len(), total_ms);
    out.push('\n');
    out.push_str("use rb_ir::Note;\n\n");

    let _ = writeln!(out, "pub static {}: &[Note] = &[", const_name(name));
    for note in notes {
        let _ = writeln!(
            out,
            "    Note::new(0x{:02X}, {}),",
            note.mask.bits(),
            note.duration_ms
        );
    }
    out.push_str("];\n");
    out
}
