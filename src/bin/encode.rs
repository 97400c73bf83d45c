//! relay-encode: turn a MIDI file into a relay song.
//!
//! Usage:
//!   relay-encode song.mid                  (Rust source on stdout)
//!   relay-encode song.mid --rust song.rs [--name NAME]
//!   relay-encode song.mid -o song.rsong

use std::path::Path;
use std::{env, fs, process};

use rb_formats::{encode_midi, song_to_bytes, to_rust_source};

fn usage() -> ! {
    eprintln!("Usage: relay-encode <input.mid> [-o out.rsong | --rust out.rs] [--name NAME]");
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let input = args.get(1).filter(|a| !a.starts_with('-')).unwrap_or_else(|| usage());

    let flag = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .map(|i| args.get(i + 1).cloned().unwrap_or_else(|| usage()))
    };
    let container_out = flag("-o");
    let rust_out = flag("--rust");
    if container_out.is_some() && rust_out.is_some() {
        usage();
    }

    let data = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", input, e);
        process::exit(1);
    });
    let encoded = encode_midi(&data).unwrap_or_else(|e| {
        eprintln!("Failed to encode {}: {}", input, e);
        process::exit(1);
    });

    let (lo, hi) = encoded.pitch_range;
    log::info!(
        "{}: {} notes, {} ms, tempo {} us/quarter, {} ticks/quarter, pitches {}..={}",
        input,
        encoded.notes.len(),
        encoded.song().total_duration_ms(),
        encoded.tempo_us,
        encoded.ticks_per_quarter,
        lo,
        hi
    );

    if let Some(path) = container_out {
        let bytes = song_to_bytes(&encoded.notes).unwrap_or_else(|e| {
            eprintln!("Failed to write container: {}", e);
            process::exit(1);
        });
        write_or_exit(&path, &bytes);
        log::info!("wrote {} bytes to {}", bytes.len(), path);
        return;
    }

    let name = flag("--name").unwrap_or_else(|| {
        Path::new(input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let source_name = Path::new(input)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned());
    let source = to_rust_source(&encoded.notes, &name, source_name.as_deref());

    match rust_out {
        Some(path) => {
            write_or_exit(&path, source.as_bytes());
            log::info!("wrote {}", path);
        }
        None => print!("{}", source),
    }
}

fn write_or_exit(path: &str, bytes: &[u8]) {
    fs::write(path, bytes).unwrap_or_else(|e| {
        eprintln!("Failed to write {}: {}", path, e);
        process::exit(1);
    });
}
