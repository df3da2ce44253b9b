use serde::{Deserialize, Serialize};

pub const DEFAULT_SECRET_LOW: i64 = 0;
pub const DEFAULT_SECRET_HIGH: i64 = 100;
pub const DEFAULT_PLAYER_COUNT: u32 = 2;
pub const DEFAULT_PORT: u16 = 5000;

/// How a submitted attempt relates to the secret.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    TooLow,
    TooHigh,
    Equal,
}

/// Compares an attempt against the secret. Pure and total over integers.
pub fn evaluate(attempt: i64, secret: i64) -> Comparison {
    if attempt < secret {
        Comparison::TooLow
    } else if attempt > secret {
        Comparison::TooHigh
    } else {
        Comparison::Equal
    }
}

/// Messages the server sends to a player, one JSON-encoded line each.
///
/// The reverse direction carries no structured messages: a player answers a
/// `YourTurn` prompt with a single plain-text integer line.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Welcome { seat: u32, players: u32 },
    WaitingForPlayers { joined: u32, needed: u32 },
    GameStarted,
    YourTurn { low: i64, high: i64 },
    WaitingForSeat { seat: u32 },
    Hint { comparison: Comparison },
    InvalidInput,
    YouWon { secret: i64 },
    OtherWon { winner: u32, secret: i64 },
}

impl ServerMessage {
    /// Encodes the message as one wire line, without the trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes one wire line.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_below_secret() {
        assert_eq!(evaluate(10, 42), Comparison::TooLow);
        assert_eq!(evaluate(41, 42), Comparison::TooLow);
        assert_eq!(evaluate(i64::MIN, 0), Comparison::TooLow);
    }

    #[test]
    fn test_evaluate_above_secret() {
        assert_eq!(evaluate(50, 42), Comparison::TooHigh);
        assert_eq!(evaluate(43, 42), Comparison::TooHigh);
        assert_eq!(evaluate(i64::MAX, 0), Comparison::TooHigh);
    }

    #[test]
    fn test_evaluate_exact_match() {
        assert_eq!(evaluate(42, 42), Comparison::Equal);
        assert_eq!(evaluate(0, 0), Comparison::Equal);
        assert_eq!(evaluate(-7, -7), Comparison::Equal);
    }

    #[test]
    fn test_message_line_roundtrip() {
        let message = ServerMessage::OtherWon {
            winner: 1,
            secret: 42,
        };

        let line = message.to_line().unwrap();
        assert!(!line.contains('\n'));

        let decoded = ServerMessage::from_line(&line).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_messages_are_distinguishable_on_the_wire() {
        let prompt = ServerMessage::YourTurn { low: 0, high: 100 }
            .to_line()
            .unwrap();
        let hint = ServerMessage::Hint {
            comparison: Comparison::TooHigh,
        }
        .to_line()
        .unwrap();

        match ServerMessage::from_line(&prompt).unwrap() {
            ServerMessage::YourTurn { low, high } => {
                assert_eq!(low, 0);
                assert_eq!(high, 100);
            }
            other => panic!("wrong message decoded: {:?}", other),
        }

        match ServerMessage::from_line(&hint).unwrap() {
            ServerMessage::Hint { comparison } => assert_eq!(comparison, Comparison::TooHigh),
            other => panic!("wrong message decoded: {:?}", other),
        }
    }

    #[test]
    fn test_from_line_tolerates_surrounding_whitespace() {
        let line = format!("  {}\r\n", ServerMessage::GameStarted.to_line().unwrap());
        assert_eq!(
            ServerMessage::from_line(&line).unwrap(),
            ServerMessage::GameStarted
        );
    }
}
