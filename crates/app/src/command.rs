use std::fmt;
use std::str::FromStr;

use count_core::model::{Count, ObjectKind};

/// One line of keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Digit(Count),
    /// Answer tile `a` to `d`.
    Choose(usize),
    ToggleQuiz,
    NextTask,
    Kind(ObjectKind),
    ToggleMute,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    UnknownKind(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty input"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::UnknownKind(raw) => write!(f, "unknown icon kind: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "" => Err(CommandError::Empty),
            "q" | "quiz" => Ok(Command::ToggleQuiz),
            "n" | "next" => Ok(Command::NextTask),
            "m" | "mute" => Ok(Command::ToggleMute),
            "h" | "help" | "?" => Ok(Command::Help),
            "x" | "exit" | "quit" => Ok(Command::Quit),
            "k" | "kind" => rest
                .parse()
                .map(Command::Kind)
                .map_err(|_| CommandError::UnknownKind(rest.to_string())),
            "a" | "b" | "c" | "d" if rest.is_empty() => {
                let index = usize::from(head.as_bytes()[0] - b'a');
                Ok(Command::Choose(index))
            }
            digit if rest.is_empty() => digit
                .parse::<Count>()
                .map(Command::Digit)
                .map_err(|_| CommandError::Unknown(line.to_string())),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

pub const HELP: &str = "\
  0-9        count (or answer a number task)
  a-d        pick an answer tile
  q          quiz on/off
  n          next quiz task
  k <kind>   icon kind: balloon star apple puzzle_piece ladybug dot flower house
  m          sound on/off
  x          quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys() {
        assert_eq!("7".parse(), Ok(Command::Digit(Count::new(7).unwrap())));
        assert_eq!(" c ".parse(), Ok(Command::Choose(2)));
        assert_eq!("q".parse(), Ok(Command::ToggleQuiz));
        assert_eq!("k ladybug".parse(), Ok(Command::Kind(ObjectKind::Ladybug)));
        assert_eq!("kind 🌸".parse(), Ok(Command::Kind(ObjectKind::Flower)));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_unknown_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "12".parse::<Command>(),
            Err(CommandError::Unknown("12".into()))
        );
        assert_eq!(
            "e".parse::<Command>(),
            Err(CommandError::Unknown("e".into()))
        );
        assert_eq!(
            "k dragon".parse::<Command>(),
            Err(CommandError::UnknownKind("dragon".into()))
        );
    }
}
