use serde::Serialize;

/// Points awarded by number of rows cleared at once.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Running statistics of one game.
///
/// ```
/// use greedris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(0);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Drops by rows cleared: index 0 counts drops that cleared nothing, index 4 counts quads.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket];
    }

    /// Adds another game's totals into this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.score += other.score;
        self.completed_pieces += other.completed_pieces;
        self.total_cleared_lines += other.total_cleared_lines;
        for (total, count) in self
            .line_cleared_counter
            .iter_mut()
            .zip(other.line_cleared_counter)
        {
            *total += count;
        }
    }
}
