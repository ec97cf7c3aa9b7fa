//! Line classifier for the keystroke script language.
//!
//! The entry point is [`parse_line`]. Keywords are matched exactly and
//! case-sensitively; a line whose first word is not a keyword is a key line.

use crate::command::Command;
use crate::error::ParseError;
use std::time::Duration;

type ParseFn = fn(Option<&str>) -> Result<Command, ParseError>;

static REGISTRY: &[(&str, ParseFn)] = &[
    (Command::REM, parse_rem),
    (Command::DEFAULT_DELAY, parse_default_delay),
    (Command::DEFAULTDELAY, parse_default_delay),
    (Command::DELAY, parse_delay),
    (Command::STRING, parse_string),
    (Command::REPEAT, parse_repeat),
];

/// Classify one trimmed script line.
///
/// The line is split on its first space into a keyword and an optional rest.
/// Unknown keywords are not errors: the keyword and every whitespace-separated
/// word of the rest become [`Command::Keys`].
///
/// # Errors
///
/// Returns [`ParseError`] when `STRING`, `REPEAT`, `DELAY` or `DEFAULT_DELAY`
/// is missing its argument or has a non-numeric one.
///
/// # Example
///
/// ```
/// use keyscript::{parse_line, Command};
/// use std::time::Duration;
///
/// assert_eq!(parse_line("DELAY 250").unwrap(), Command::Delay(Duration::from_millis(250)));
/// assert_eq!(
///     parse_line("CTRL ALT DELETE").unwrap(),
///     Command::Keys(vec!["CTRL".into(), "ALT".into(), "DELETE".into()]),
/// );
/// assert!(parse_line("DELAY soon").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let (keyword, rest) = match line.split_once(' ') {
        Some((keyword, rest)) => (keyword, Some(rest)),
        None => (line, None),
    };
    match REGISTRY.iter().find(|(name, _)| *name == keyword) {
        Some((_, parse)) => parse(rest),
        None => Ok(parse_keys(keyword, rest)),
    }
}

fn parse_rem(_rest: Option<&str>) -> Result<Command, ParseError> {
    Ok(Command::Rem)
}

fn parse_default_delay(rest: Option<&str>) -> Result<Command, ParseError> {
    parse_millis(Command::DEFAULT_DELAY, rest).map(Command::DefaultDelay)
}

fn parse_delay(rest: Option<&str>) -> Result<Command, ParseError> {
    parse_millis(Command::DELAY, rest).map(Command::Delay)
}

fn parse_string(rest: Option<&str>) -> Result<Command, ParseError> {
    match rest {
        Some(text) if !text.is_empty() => Ok(Command::String(text.to_string())),
        _ => Err(ParseError::MissingArgument {
            command: Command::STRING,
        }),
    }
}

fn parse_repeat(rest: Option<&str>) -> Result<Command, ParseError> {
    parse_number(Command::REPEAT, rest).map(Command::Repeat)
}

fn parse_keys(first: &str, rest: Option<&str>) -> Command {
    let mut tokens = vec![first.to_string()];
    if let Some(rest) = rest {
        tokens.extend(rest.split_whitespace().map(str::to_string));
    }
    Command::Keys(tokens)
}

/// Parse a millisecond count: `500` → 500ms.
fn parse_millis(command: &'static str, rest: Option<&str>) -> Result<Duration, ParseError> {
    parse_number::<u64>(command, rest).map(Duration::from_millis)
}

fn parse_number<T>(command: &'static str, rest: Option<&str>) -> Result<T, ParseError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    let value = rest
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ParseError::MissingArgument { command })?;
    value.parse().map_err(|source| ParseError::InvalidNumber {
        command,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tokens: &[&str]) -> Command {
        Command::Keys(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_parse_rem() {
        assert_eq!(parse_line("REM").unwrap(), Command::Rem);
        assert_eq!(parse_line("REM DELAY abc").unwrap(), Command::Rem);
    }

    #[test]
    fn test_parse_delays() {
        assert_eq!(
            parse_line("DELAY 200").unwrap(),
            Command::Delay(Duration::from_millis(200))
        );
        assert_eq!(
            parse_line("DEFAULT_DELAY 500").unwrap(),
            Command::DefaultDelay(Duration::from_millis(500))
        );
        assert_eq!(
            parse_line("DEFAULTDELAY 0").unwrap(),
            Command::DefaultDelay(Duration::ZERO)
        );
        assert_eq!(
            parse_line("DELAY  75").unwrap(),
            Command::Delay(Duration::from_millis(75))
        );
    }

    #[test]
    fn test_parse_invalid_numbers() {
        let err = parse_line("DELAY abc").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { command: "DELAY", ref value, .. } if value == "abc"
        ));
        assert!(parse_line("DELAY -5").is_err());
        assert!(parse_line("DEFAULT_DELAY 1.5").is_err());
        assert!(parse_line("REPEAT many").is_err());
    }

    #[test]
    fn test_parse_missing_arguments() {
        for line in ["DELAY", "DEFAULT_DELAY", "DEFAULTDELAY", "REPEAT", "STRING"] {
            assert!(
                matches!(parse_line(line), Err(ParseError::MissingArgument { .. })),
                "{line} should require an argument"
            );
        }
    }

    #[test]
    fn test_parse_string_is_verbatim() {
        assert_eq!(
            parse_line("STRING Hello, World!").unwrap(),
            Command::String("Hello, World!".into())
        );
        assert_eq!(
            parse_line("STRING  two  spaces").unwrap(),
            Command::String(" two  spaces".into())
        );
        assert_eq!(
            parse_line("STRING DELAY 5").unwrap(),
            Command::String("DELAY 5".into())
        );
    }

    #[test]
    fn test_parse_repeat() {
        assert_eq!(parse_line("REPEAT 3").unwrap(), Command::Repeat(3));
    }

    #[test]
    fn test_parse_key_lines() {
        assert_eq!(parse_line("ENTER").unwrap(), keys(&["ENTER"]));
        assert_eq!(
            parse_line("CONTROL ALT DELETE").unwrap(),
            keys(&["CONTROL", "ALT", "DELETE"])
        );
        assert_eq!(parse_line("GUI  r").unwrap(), keys(&["GUI", "r"]));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(parse_line("delay 100").unwrap(), keys(&["delay", "100"]));
        assert_eq!(parse_line("String hi").unwrap(), keys(&["String", "hi"]));
    }
}
