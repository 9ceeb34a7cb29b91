use greedris_engine::{BitBoard, PieceKind};
use serde::{Deserialize, Serialize};

/// A board and the piece about to spawn on it.
///
/// ```json
/// { "board": ["..........", "...", "##########"], "piece": "T" }
/// ```
///
/// The board lists the 20 playable rows from the top, `#` for occupied and `.` for empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub board: BitBoard,
    pub piece: PieceKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_json(rows: &[&str]) -> String {
        serde_json::to_string(rows).unwrap()
    }

    #[test]
    fn test_parse_position() {
        let mut rows = vec![".........."; 19];
        rows.push("#########.");
        let json = format!(r#"{{ "board": {}, "piece": "I" }}"#, board_json(&rows));

        let position: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(position.piece, PieceKind::I);
        assert_eq!(position.board.count_occupied(), 9);
        assert!(!position.board.is_occupied(9, 19));
    }

    #[test]
    fn test_reject_malformed_position() {
        let rows = vec![".........."; 19];
        let short = format!(r#"{{ "board": {}, "piece": "I" }}"#, board_json(&rows));
        let err = serde_json::from_str::<Position>(&short).unwrap_err();
        assert!(err.to_string().contains("expected 20 rows"), "{err}");

        let rows = vec![".........."; 20];
        let bad_piece = format!(r#"{{ "board": {}, "piece": "X" }}"#, board_json(&rows));
        assert!(serde_json::from_str::<Position>(&bad_piece).is_err());
    }
}
