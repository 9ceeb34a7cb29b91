use std::{cell::OnceCell, iter};

use greedris_engine::BitBoard;

/// Lazily computed metrics of a board.
#[derive(Debug, Clone)]
pub struct BoardAnalysis {
    board: BitBoard,
    column_heights: OnceCell<[u8; BitBoard::PLAYABLE_WIDTH]>,
    column_occupied_cells: OnceCell<[u8; BitBoard::PLAYABLE_WIDTH]>,
    total_height: OnceCell<u8>,
    hole_count: OnceCell<u8>,
    total_blocks: OnceCell<u8>,
    total_spikiness: OnceCell<u8>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: BitBoard) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            total_height: OnceCell::new(),
            hole_count: OnceCell::new(),
            total_blocks: OnceCell::new(),
            total_spikiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> BitBoard {
        self.board
    }

    /// Height of each column: rows from the bottom up to and including its topmost occupied
    /// cell, or 0 for an empty column.
    ///
    /// Cells locked above the playable area count, so a column can be taller than
    /// [`BitBoard::PLAYABLE_HEIGHT`].
    #[must_use]
    pub fn column_heights(&self) -> &[u8; BitBoard::PLAYABLE_WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; BitBoard::PLAYABLE_WIDTH];
            for (x, h) in iter::zip(BitBoard::PLAYABLE_X_RANGE, &mut column_heights) {
                let top = self.board.stack_rows().position(|row| row.is_occupied(x));
                if let Some(min_y) = top {
                    *h = to_u8(BitBoard::STACK_HEIGHT - min_y);
                }
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; BitBoard::PLAYABLE_WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; BitBoard::PLAYABLE_WIDTH];
            for row in self.board.stack_rows() {
                let cells = iter::zip(row.iter_playable_cells(), &mut column_occupied_cells);
                for (occupied, count) in cells {
                    *count += u8::from(occupied);
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn total_height(&self) -> u8 {
        *self
            .total_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Empty cells below the top of their column. Columns of height 1 or less have none.
    #[must_use]
    pub fn hole_count(&self) -> u8 {
        *self.hole_count.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .filter(|(h, _occ)| **h > 1)
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Occupied cells on the whole board.
    #[must_use]
    pub fn total_blocks(&self) -> u8 {
        *self
            .total_blocks
            .get_or_init(|| self.column_occupied_cells().iter().sum())
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn total_spikiness(&self) -> u8 {
        *self.total_spikiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }
}

// Board metrics are bounded by the 220 cells a piece can occupy.
fn to_u8(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}
