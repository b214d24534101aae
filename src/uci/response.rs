//! Decoder for lines the engine writes to its standard output.

use crate::error::DecodeError;

/// Literal readiness marker.
pub const READY_OK: &str = "readyok";

/// One decoded line of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    /// `uciok`, end of the identification block
    UciOk,
    /// `readyok`, answer to `isready`
    ReadyOk,
    /// `id name <...>`
    IdName(String),
    /// `id author <...>`
    IdAuthor(String),
    /// `option name <NAME> type ...`, an advertised option
    Option(String),
    /// `No such option: <NAME>`, a rejected `setoption`
    OptionRejected(String),
    /// `bestmove <move> [ponder <move>]`
    BestMove {
        best: String,
        ponder: Option<String>,
    },
    /// Anything else, kept verbatim (search reports, strings, banners)
    Info(String),
}

impl EngineLine {
    /// Decode one line. Blank lines decode to `None`.
    pub fn decode(line: &str) -> Result<Option<EngineLine>, DecodeError> {
        let trimmed = line.trim();
        let mut tokens = trimmed.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(None);
        };

        let decoded = match first {
            "uciok" if trimmed == "uciok" => EngineLine::UciOk,
            "readyok" if trimmed == READY_OK => EngineLine::ReadyOk,
            "bestmove" => {
                let best = tokens.next().ok_or(DecodeError::MissingBestMove)?;
                let ponder = match (tokens.next(), tokens.next()) {
                    (Some("ponder"), Some(mv)) => Some(mv.to_string()),
                    _ => None,
                };
                EngineLine::BestMove {
                    best: best.to_string(),
                    ponder,
                }
            }
            "id" => match tokens.next() {
                Some("name") => EngineLine::IdName(rest_after(trimmed, 2)),
                Some("author") => EngineLine::IdAuthor(rest_after(trimmed, 2)),
                _ => EngineLine::Info(trimmed.to_string()),
            },
            "option" if tokens.next() == Some("name") => {
                let name: Vec<&str> = tokens.take_while(|t| *t != "type").collect();
                EngineLine::Option(name.join(" "))
            }
            _ if trimmed.starts_with("No such option") => {
                let name = trimmed
                    .split_once(':')
                    .map(|(_, n)| n.trim())
                    .unwrap_or_default();
                if name.is_empty() {
                    return Err(DecodeError::EmptyRejection);
                }
                EngineLine::OptionRejected(name.to_string())
            }
            _ => EngineLine::Info(trimmed.to_string()),
        };

        Ok(Some(decoded))
    }
}

/// Text after the first `n` whitespace-separated tokens.
fn rest_after(line: &str, n: usize) -> String {
    line.split_whitespace().skip(n).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(line: &str) -> EngineLine {
        EngineLine::decode(line).unwrap().unwrap()
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(decode("readyok\n"), EngineLine::ReadyOk);
        assert_eq!(decode("uciok"), EngineLine::UciOk);
        assert_eq!(
            decode("readyok now"),
            EngineLine::Info("readyok now".to_string())
        );
    }

    #[test]
    fn test_bestmove_with_ponder() {
        assert_eq!(
            decode("bestmove e2e4 ponder e7e5"),
            EngineLine::BestMove {
                best: "e2e4".to_string(),
                ponder: Some("e7e5".to_string())
            }
        );
    }

    #[test]
    fn test_bestmove_without_ponder() {
        assert_eq!(
            decode("bestmove g1f3"),
            EngineLine::BestMove {
                best: "g1f3".to_string(),
                ponder: None
            }
        );
        assert_eq!(
            decode("bestmove g1f3 ponder"),
            EngineLine::BestMove {
                best: "g1f3".to_string(),
                ponder: None
            }
        );
    }

    #[test]
    fn test_bestmove_without_move_is_error() {
        assert_eq!(
            EngineLine::decode("bestmove"),
            Err(DecodeError::MissingBestMove)
        );
    }

    #[test]
    fn test_identification() {
        assert_eq!(
            decode("id name Stockfish 16"),
            EngineLine::IdName("Stockfish 16".to_string())
        );
        assert_eq!(
            decode("id author the Stockfish developers"),
            EngineLine::IdAuthor("the Stockfish developers".to_string())
        );
        assert_eq!(
            decode("option name Move Overhead type spin default 10 min 0 max 5000"),
            EngineLine::Option("Move Overhead".to_string())
        );
    }

    #[test]
    fn test_option_rejection() {
        assert_eq!(
            decode("No such option: Contempt Factor"),
            EngineLine::OptionRejected("Contempt Factor".to_string())
        );
        assert_eq!(
            EngineLine::decode("No such option"),
            Err(DecodeError::EmptyRejection)
        );
    }

    #[test]
    fn test_info_and_blank() {
        let line = "info depth 2 seldepth 2 score cp 35 nodes 62 pv e2e4 e7e5";
        assert_eq!(decode(line), EngineLine::Info(line.to_string()));
        assert_eq!(EngineLine::decode("  \r\n"), Ok(None));
    }

    proptest! {
        /// Property: decoding never panics and bestmove lines always carry a move
        #[test]
        fn prop_decode_total(line in "\\PC{0,60}") {
            if let Ok(Some(EngineLine::BestMove { best, .. })) = EngineLine::decode(&line) {
                prop_assert!(!best.is_empty());
            }
        }
    }
}
