//! relaybox: play a song on the simulated relay board.
//!
//! Usage:
//!   relaybox [song.rsong | song.mid] [--config relaybox.toml] [--autoplay]
//!
//! Commands are read from stdin, one per line (`play 120`, `stop`,
//! `speed 200`, `/play?speed=80`, ...). `status` prints the player state
//! and `quit` exits. Set `RUST_LOG=debug` to watch the relays.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;
use std::{env, io, process, thread};

use rb_engine::Command;
use rb_master::{parse_command, Clock, Config, Controller, Session, DEFAULT_CONFIG_FILE};

struct Args {
    song: Option<PathBuf>,
    config: PathBuf,
    autoplay: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        song: None,
        config: PathBuf::from(DEFAULT_CONFIG_FILE),
        autoplay: false,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => match it.next() {
                Some(path) => args.config = PathBuf::from(path),
                None => usage(),
            },
            "--autoplay" => args.autoplay = true,
            "-h" | "--help" => usage(),
            _ if arg.starts_with('-') => usage(),
            _ if args.song.is_none() => args.song = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }
    args
}

fn usage() -> ! {
    eprintln!("Usage: relaybox [song.rsong | song.mid] [--config relaybox.toml] [--autoplay]");
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let autoplay = args.autoplay || config.autoplay;
    let idle = Duration::from_micros(config.idle_sleep_us);

    let ctrl = match &args.song {
        Some(path) => load(path, config),
        None => Controller::with_demo_song(config),
    };

    let song = ctrl.song();
    println!("Notes:    {}", song.len());
    println!("Length:   {} ms at 100%", song.total_duration_ms());
    println!("Relays:   {}", song.relays_used());
    println!("Speed:    {}%", ctrl.config().speed().get());
    println!();

    let mut session = ctrl.session();
    if autoplay {
        submit(&mut session, Command::Play { speed: None });
    }

    let input = spawn_stdin_reader();
    run(&mut session, &input, idle);

    session.submit(Command::Stop).ok();
    session.poll();
    println!("Done.");
}

fn load(path: &Path, config: Config) -> Controller {
    let mut ctrl = Controller::new(config);
    if let Err(e) = ctrl.load_file(path) {
        eprintln!("Failed to load {}: {}", path.display(), e);
        process::exit(1);
    }
    ctrl
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Poll until `quit`, or until stdin closes with nothing left playing.
fn run<C: Clock>(session: &mut Session<'_, C>, input: &Receiver<String>, idle: Duration) {
    let mut last_index = None;
    let mut input_open = true;

    loop {
        while input_open {
            match input.try_recv() {
                Ok(line) => {
                    if !handle_line(session, line.trim()) {
                        return;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => input_open = false,
            }
        }

        session.poll();
        while let Some(reply) = session.take_reply() {
            println!("{} {}", reply.status(), reply.body());
        }

        let index = session.player().current_index();
        if index != last_index {
            if let Some(note) = session.player().current_note() {
                log::info!(
                    "note {:>4}  {}  {} ms",
                    index.unwrap_or_default(),
                    note.mask,
                    note.duration_ms
                );
            }
            last_index = index;
        }

        if !input_open && !session.player().is_playing() {
            return;
        }
        thread::sleep(idle);
    }
}

/// Returns `false` when the user asked to quit.
fn handle_line<C: Clock>(session: &mut Session<'_, C>, line: &str) -> bool {
    match line.to_ascii_lowercase().as_str() {
        "" => {}
        "quit" | "exit" => return false,
        "status" => {
            let player = session.player();
            match player.current_index() {
                Some(i) => println!("playing note {} at {}%", i, player.speed().get()),
                None => println!("idle at {}%", player.speed().get()),
            }
        }
        _ => match parse_command(line) {
            Ok(command) => submit(session, command),
            Err(e) => println!("404 {}", e),
        },
    }
    true
}

fn submit<C: Clock>(session: &mut Session<'_, C>, command: Command) {
    if let Err(dropped) = session.submit(command) {
        log::warn!("command queue full, dropped {:?}", dropped);
    }
}
