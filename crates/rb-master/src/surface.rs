//! Text control surface.
//!
//! Accepts one command per line, either as words (`play 120`, `stop`,
//! `speed 200`) or as the request paths the web page uses
//! (`/play?speed=120`, `/stop`, `/speed?value=200`).

use rb_engine::Command;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("Not found: {0}")]
    Unknown(String),

    #[error("{command} needs a {argument}")]
    MissingValue {
        command: &'static str,
        argument: &'static str,
    },

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

/// Parse one line into a command.
pub fn parse_command(line: &str) -> Result<Command, CommandParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandParseError::Empty);
    }
    if line.starts_with('/') {
        return parse_request(line);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(CommandParseError::Unknown(extra.to_string()));
    }

    match (verb.as_str(), arg) {
        ("play", None) => Ok(Command::Play { speed: None }),
        ("play", Some(speed)) => Ok(Command::Play {
            speed: Some(parse_number(speed)?),
        }),
        ("stop", None) => Ok(Command::Stop),
        ("speed", Some(value)) => Ok(Command::SetSpeed(parse_number(value)?)),
        ("speed", None) => Err(CommandParseError::MissingValue {
            command: "speed",
            argument: "value",
        }),
        _ => Err(CommandParseError::Unknown(line.to_string())),
    }
}

/// `/path?key=value&...`, with query values read the way the board's web
/// server reads them: leading digits only, anything else is 0.
fn parse_request(line: &str) -> Result<Command, CommandParseError> {
    let (path, query) = line.split_once('?').unwrap_or((line, ""));
    let arg = |name: &str| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| leading_int(value))
    };

    match path.to_ascii_lowercase().as_str() {
        "/play" => Ok(Command::Play { speed: arg("speed") }),
        "/stop" => Ok(Command::Stop),
        "/speed" => Ok(arg("value").map_or(Command::KeepSpeed, Command::SetSpeed)),
        _ => Err(CommandParseError::Unknown(path.to_string())),
    }
}

fn parse_number(text: &str) -> Result<i32, CommandParseError> {
    text.parse()
        .map_err(|_| CommandParseError::InvalidNumber(text.to_string()))
}

/// Optional sign then digits; stops at the first other character.
fn leading_int(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as i32));
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words() {
        assert_eq!(parse_command("play"), Ok(Command::Play { speed: None }));
        assert_eq!(
            parse_command("  PLAY 120 "),
            Ok(Command::Play { speed: Some(120) })
        );
        assert_eq!(parse_command("stop"), Ok(Command::Stop));
        assert_eq!(parse_command("speed 250"), Ok(Command::SetSpeed(250)));
    }

    #[test]
    fn out_of_range_numbers_pass_through_for_clamping() {
        assert_eq!(parse_command("speed 9000"), Ok(Command::SetSpeed(9000)));
        assert_eq!(parse_command("speed -3"), Ok(Command::SetSpeed(-3)));
    }

    #[test]
    fn request_paths() {
        assert_eq!(parse_command("/play"), Ok(Command::Play { speed: None }));
        assert_eq!(
            parse_command("/play?speed=150"),
            Ok(Command::Play { speed: Some(150) })
        );
        assert_eq!(parse_command("/stop"), Ok(Command::Stop));
        assert_eq!(parse_command("/speed?value=75"), Ok(Command::SetSpeed(75)));
        assert_eq!(
            parse_command("/speed?x=1&value=200"),
            Ok(Command::SetSpeed(200))
        );
    }

    #[test]
    fn query_values_read_leading_digits() {
        assert_eq!(
            parse_command("/play?speed=120abc"),
            Ok(Command::Play { speed: Some(120) })
        );
        assert_eq!(
            parse_command("/play?speed=fast"),
            Ok(Command::Play { speed: Some(0) })
        );
        assert_eq!(parse_command("/speed?value"), Ok(Command::SetSpeed(0)));
        assert_eq!(parse_command("/speed?value=-60"), Ok(Command::SetSpeed(-60)));
    }

    #[test]
    fn speed_without_value() {
        assert_eq!(parse_command("/speed"), Ok(Command::KeepSpeed));
        assert_eq!(parse_command("/speed?other=3"), Ok(Command::KeepSpeed));
        assert!(matches!(
            parse_command("speed"),
            Err(CommandParseError::MissingValue { .. })
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_command(""), Err(CommandParseError::Empty));
        assert_eq!(
            parse_command("/index.html"),
            Err(CommandParseError::Unknown("/index.html".into()))
        );
        assert!(matches!(
            parse_command("dance"),
            Err(CommandParseError::Unknown(_))
        ));
        assert!(matches!(
            parse_command("stop now"),
            Err(CommandParseError::Unknown(_))
        ));
        assert_eq!(
            parse_command("speed quick"),
            Err(CommandParseError::InvalidNumber("quick".into()))
        );
    }

    #[test]
    fn leading_int_saturates() {
        assert_eq!(leading_int("99999999999999"), i32::MAX);
        assert_eq!(leading_int("+42"), 42);
        assert_eq!(leading_int(""), 0);
    }
}
