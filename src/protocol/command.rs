//! Parsing of a player's response line.

use crate::game::{Action, ParseActionError};

/// Keyword for conceding the match.
pub const ACCEPT_DEFEAT: &str = "ACCEPT-DEFEAT";

/// A parsed response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The player concedes.
    AcceptDefeat {
        /// Trailing free text, if any.
        message: Option<String>,
    },
    /// The player issues a move or push.
    Act {
        /// The issued action.
        action: Action,
        /// Trailing free text, if any.
        message: Option<String>,
    },
}

/// Why a response line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("empty response")]
    Empty,
    /// Too few tokens for an action.
    #[error("expected 4 tokens, found {0}")]
    Truncated(usize),
    /// Action tokens did not parse.
    #[error(transparent)]
    Action(#[from] ParseActionError),
}

/// Split off the first whitespace-delimited token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn message(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Parse one response line.
///
/// Keywords and directions are case-insensitive. Whatever follows the last
/// required token, trimmed, is the message. Leading whitespace before the
/// keyword is accepted, and surrounding whitespace is dropped from the message.
///
/// # Errors
///
/// Returns an error if the line is neither a concession nor a well-formed
/// action. The unit index is not range-checked here.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let (first, rest) = next_token(line).ok_or(ParseError::Empty)?;
    if first.eq_ignore_ascii_case(ACCEPT_DEFEAT) {
        return Ok(Command::AcceptDefeat {
            message: message(rest),
        });
    }

    let mut tokens = [first, "", "", ""];
    let mut rest = rest;
    for (found, slot) in tokens.iter_mut().enumerate().skip(1) {
        let (token, tail) = next_token(rest).ok_or(ParseError::Truncated(found))?;
        *slot = token;
        rest = tail;
    }
    let [kind, unit, move_dir, build_dir] = tokens;
    let action = Action::from_tokens(kind, unit, move_dir, build_dir)?;
    Ok(Command::Act {
        action,
        message: message(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ActionKind, Direction};

    #[test]
    fn test_parse_action() {
        let command = parse_command("MOVE&BUILD 1 N SE").unwrap();
        assert_eq!(
            command,
            Command::Act {
                action: Action::new(ActionKind::Move, 1, Direction::N, Direction::SE),
                message: None,
            }
        );
    }

    #[test]
    fn test_parse_case_insensitive_with_message() {
        let command = parse_command("push&build 0 nw w   going  up!  ").unwrap();
        assert_eq!(
            command,
            Command::Act {
                action: Action::new(ActionKind::Push, 0, Direction::NW, Direction::W),
                message: Some("going  up!".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_lenient_whitespace() {
        assert_eq!(
            parse_command("  MOVE&BUILD 0 E W\t  ok  \n").unwrap(),
            Command::Act {
                action: Action::new(ActionKind::Move, 0, Direction::E, Direction::W),
                message: Some("ok".to_string()),
            }
        );
        assert_eq!(
            parse_command(" ACCEPT-DEFEAT   ").unwrap(),
            Command::AcceptDefeat { message: None }
        );
    }

    #[test]
    fn test_parse_accept_defeat() {
        assert_eq!(
            parse_command("ACCEPT-DEFEAT").unwrap(),
            Command::AcceptDefeat { message: None }
        );
        assert_eq!(
            parse_command("accept-defeat gg wp").unwrap(),
            Command::AcceptDefeat {
                message: Some("gg wp".to_string())
            }
        );
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(parse_command("MOVE&BUILD 0 N"), Err(ParseError::Truncated(3)));
        assert!(matches!(
            parse_command("WAIT 0 N S"),
            Err(ParseError::Action(ParseActionError::UnknownKind(_)))
        ));
        assert!(matches!(
            parse_command("MOVE&BUILD 10 N S"),
            Err(ParseError::Action(ParseActionError::BadIndex(_)))
        ));
        assert!(matches!(
            parse_command("MOVE&BUILD 0 UP S"),
            Err(ParseError::Action(ParseActionError::BadDirection(_)))
        ));
        assert!(parse_command("ACCEPT-DEFEATED").is_err());
    }
}
