use std::{fmt, ops::Range, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BoardParseError, core::piece::Piece};

use super::{
    PLAYABLE_HEIGHT, PLAYABLE_WIDTH, SENTINEL_MARGIN_LEFT, SENTINEL_MARGIN_TOP, TOTAL_HEIGHT,
    TOTAL_WIDTH,
};

pub(super) const PIECE_SPAWN_X: usize = 5;
pub(super) const PIECE_SPAWN_Y: usize = 0;

// Left wall: bits 0-1, right wall: bits 12-13.
const LEFT_SENTINEL_MASK: u16 = 0b11;
const RIGHT_SENTINEL_MASK: u16 = 0b11 << (SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH);
const SENTINEL_MASK: u16 = LEFT_SENTINEL_MASK | RIGHT_SENTINEL_MASK;
const FULL_ROW_MASK: u16 = (1 << TOTAL_WIDTH) - 1;
const PLAYABLE_MASK: u16 = FULL_ROW_MASK & !SENTINEL_MASK;
const STACK_HEIGHT: usize = SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT;

/// Playable row indices (0 = top) of fully occupied rows.
pub type LineSet = ArrayVec<usize, PLAYABLE_HEIGHT>;

/// Single row of the bit board.
///
/// One bit per cell, LSB first: bits 0-1 are the left wall, bits 2-11 the ten playable cells,
/// bits 12-13 the right wall. Wall bits are always set so collision checks need no bounds tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRow {
    bits: u16,
}

impl BitRow {
    pub const EMPTY: Self = Self {
        bits: SENTINEL_MASK,
    };
    pub const FULL_SENTINEL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every playable cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_playable_filled(self) -> bool {
        (self.bits & PLAYABLE_MASK) == PLAYABLE_MASK
    }

    /// Checks if the playable cell at column `x` is occupied.
    #[inline]
    #[must_use]
    pub fn is_occupied(self, x: usize) -> bool {
        debug_assert!(x < PLAYABLE_WIDTH);
        (self.bits & (1 << (x + SENTINEL_MARGIN_LEFT))) != 0
    }

    /// Number of occupied playable cells.
    #[inline]
    #[must_use]
    pub fn count_occupied(self) -> u32 {
        (self.bits & PLAYABLE_MASK).count_ones()
    }

    #[inline]
    fn is_any_cell_occupied(self, x0: usize, mask: u16) -> bool {
        (self.bits & (mask << x0)) != 0
    }

    #[inline]
    fn occupy_cells(&mut self, x0: usize, mask: u16) {
        self.bits |= mask << x0;
    }

    /// Iterates over the playable cells from left to right.
    #[inline]
    pub fn iter_playable_cells(self) -> impl Iterator<Item = bool> {
        (0..PLAYABLE_WIDTH).map(move |x| self.is_occupied(x))
    }

    fn to_ascii(self) -> String {
        self.iter_playable_cells()
            .map(|occupied| if occupied { '#' } else { '.' })
            .collect()
    }
}

/// Fixed-size Tetris grid used for collision detection, locking, and line clearing.
///
/// The playable area is 10 columns by 20 rows, row 0 at the top. It is surrounded by a
/// 2-cell sentinel margin on every side: the side margins and the bottom margin are walls,
/// the top margin is open so pieces can spawn above the visible stack.
///
/// The 2-cell margin exists because every piece is positioned by its 4×4 bounding box. A
/// vertical I piece has two empty columns on one side of its cells, so with a single wall
/// column it could never reach the outermost playable column.
///
/// ```text
///             0  1  2  3  4  5  6  7  8  9 10 11 12 13
/// Board:      W  W  .  .  .  .  .  .  .  .  .  .  W  W
/// I-piece:    W [W  I  .  .] .  .  .  .  .  .  .  W  W
/// I-piece:    W  W  .  .  .  .  .  .  .  . [.  I  W  W]
/// ```
///
/// Boards read and write as ASCII art, one line per playable row, `#` for occupied and `.`
/// for empty:
///
/// ```
/// use greedris_engine::BitBoard;
///
/// let art = format!("{}##########\n", "..........\n".repeat(19));
/// let mut board: BitBoard = art.parse().unwrap();
/// assert_eq!(board.lines_to_clear().as_slice(), &[19]);
/// assert_eq!(board.clear_filled_lines(), 1);
/// assert_eq!(board, BitBoard::INITIAL);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BitBoard {
    rows: [BitRow; TOTAL_HEIGHT],
}

impl BitBoard {
    pub const TOTAL_WIDTH: usize = TOTAL_WIDTH;
    pub const TOTAL_HEIGHT: usize = TOTAL_HEIGHT;
    pub const PLAYABLE_WIDTH: usize = PLAYABLE_WIDTH;
    pub const PLAYABLE_HEIGHT: usize = PLAYABLE_HEIGHT;
    /// Rows a piece can occupy: the open top margin plus the playable rows.
    pub const STACK_HEIGHT: usize = STACK_HEIGHT;
    pub const PLAYABLE_X_RANGE: Range<usize> = 0..PLAYABLE_WIDTH;
    pub const PLAYABLE_Y_RANGE: Range<usize> = 0..PLAYABLE_HEIGHT;

    pub const INITIAL: Self = {
        let mut rows = [BitRow::EMPTY; TOTAL_HEIGHT];
        let mut y = STACK_HEIGHT;
        while y < TOTAL_HEIGHT {
            rows[y] = BitRow::FULL_SENTINEL;
            y += 1;
        }
        Self { rows }
    };

    /// Returns the playable row `y` (0 = top).
    #[must_use]
    pub fn playable_row(&self, y: usize) -> BitRow {
        self.rows[y + SENTINEL_MARGIN_TOP]
    }

    /// Iterates over the playable rows from top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows[SENTINEL_MARGIN_TOP..STACK_HEIGHT].iter().copied()
    }

    /// Iterates over every row a piece can occupy, top to bottom: the open top margin followed
    /// by the playable rows.
    pub fn stack_rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows[..STACK_HEIGHT].iter().copied()
    }

    /// Checks if any cell above playable row 0 is occupied.
    #[must_use]
    pub fn is_above_top(&self) -> bool {
        self.rows[..SENTINEL_MARGIN_TOP]
            .iter()
            .any(|row| row.count_occupied() > 0)
    }

    /// Checks if the playable cell at (`x`, `y`) is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.playable_row(y).is_occupied(x)
    }

    /// Marks the playable cell at (`x`, `y`) as occupied.
    pub fn occupy_cell(&mut self, x: usize, y: usize) {
        assert!(x < PLAYABLE_WIDTH && y < PLAYABLE_HEIGHT);
        self.rows[y + SENTINEL_MARGIN_TOP].occupy_cells(x + SENTINEL_MARGIN_LEFT, 0b1);
    }

    /// Total number of occupied cells, top margin included.
    #[must_use]
    pub fn count_occupied(&self) -> u32 {
        self.stack_rows().map(BitRow::count_occupied).sum()
    }

    /// Checks if the piece overlaps a wall or an occupied cell.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        let x0 = piece.position().x();
        let y0 = piece.position().y();
        piece
            .mask()
            .into_iter()
            .zip(&self.rows[y0..])
            .any(|(mask, row)| row.is_any_cell_occupied(x0, mask))
    }

    /// Locks a piece onto the board by occupying its cells.
    pub fn fill_piece(&mut self, piece: Piece) {
        let x0 = piece.position().x();
        let y0 = piece.position().y();
        for (mask, row) in piece.mask().into_iter().zip(&mut self.rows[y0..]) {
            row.occupy_cells(x0, mask);
        }
    }

    /// Returns the playable rows that are completely filled, top to bottom.
    #[must_use]
    pub fn lines_to_clear(&self) -> LineSet {
        self.playable_rows()
            .enumerate()
            .filter(|(_y, row)| row.is_playable_filled())
            .map(|(y, _row)| y)
            .collect()
    }

    /// Removes the given playable rows and shifts the rows above them down.
    ///
    /// Cells locked in the top margin shift down with the rest of the stack. Rows out of range
    /// are ignored and duplicates count once. Returns the number of rows removed; the same
    /// number of empty rows appear at the top.
    pub fn clear_lines(&mut self, lines: &[usize]) -> usize {
        let stack = &mut self.rows[..STACK_HEIGHT];
        let mut dest = STACK_HEIGHT;
        for y in (0..STACK_HEIGHT).rev() {
            let removed = y
                .checked_sub(SENTINEL_MARGIN_TOP)
                .is_some_and(|line| lines.contains(&line));
            if removed {
                continue;
            }
            dest -= 1;
            stack[dest] = stack[y];
        }
        stack[..dest].fill(BitRow::EMPTY);
        dest
    }

    /// Clears every filled row and returns how many were cleared.
    pub fn clear_filled_lines(&mut self) -> usize {
        let lines = self.lines_to_clear();
        self.clear_lines(&lines)
    }

    /// Builds a board from exactly [`Self::PLAYABLE_HEIGHT`] rows of
    /// [`Self::PLAYABLE_WIDTH`] cells each. Surrounding whitespace on a row is ignored.
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, BoardParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut board = Self::INITIAL;
        let mut row_count = 0;
        for (y, line) in rows.into_iter().enumerate() {
            row_count += 1;
            if y >= PLAYABLE_HEIGHT {
                continue;
            }
            let line = line.trim();
            let width = line.chars().count();
            if width != PLAYABLE_WIDTH {
                return Err(BoardParseError::RowWidth {
                    row: y,
                    expected: PLAYABLE_WIDTH,
                    actual: width,
                });
            }
            for (x, cell) in line.chars().enumerate() {
                match cell {
                    '#' => board.occupy_cell(x, y),
                    '.' => {}
                    _ => return Err(BoardParseError::InvalidCell { row: y, cell }),
                }
            }
        }
        if row_count != PLAYABLE_HEIGHT {
            return Err(BoardParseError::RowCount {
                expected: PLAYABLE_HEIGHT,
                actual: row_count,
            });
        }
        Ok(board)
    }

    /// Parses ASCII art into a board, panicking on malformed input.
    ///
    /// Intended for fixtures; use [`str::parse`] for untrusted input.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        match art.parse() {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        }
    }
}

impl FromStr for BitBoard {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_rows(s.lines().map(str::trim).filter(|line| !line.is_empty()))
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.playable_rows() {
            writeln!(f, "{}", row.to_ascii())?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.playable_rows().map(BitRow::to_ascii))
            .finish()
    }
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ["..........", ..., "##########"]
        serializer.collect_seq(self.playable_rows().map(BitRow::to_ascii))
    }
}

impl<'de> Deserialize<'de> for BitBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(rows.iter().map(String::as_str)).map_err(serde::de::Error::custom)
    }
}
