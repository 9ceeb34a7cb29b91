use std::fmt;

use serde::{Deserialize, Serialize};

use super::bit_board::{BitBoard, PIECE_SPAWN_X, PIECE_SPAWN_Y};

/// A falling tetromino: kind, rotation state, and bounding-box position.
///
/// Pieces are immutable values; moving or rotating returns a new `Piece`. Legality against a
/// board is checked separately with [`BitBoard::is_colliding`].
///
/// # Example
///
/// ```
/// use greedris_engine::{BitBoard, Piece, PieceKind};
///
/// let board = BitBoard::INITIAL;
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.left().unwrap();
/// let rotated = moved.super_rotated_right(&board).unwrap();
/// assert!(!board.is_colliding(rotated));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position in spawn orientation.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN_POSITION,
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub(crate) fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Iterates over the board cells covered by this piece, in sentinel-inclusive coordinates.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let x0 = self.position.x();
        let y0 = self.position.y();
        self.mask()
            .into_iter()
            .enumerate()
            .flat_map(move |(dy, row)| {
                (0..4)
                    .filter(move |dx| row & (1 << dx) != 0)
                    .map(move |dx| (x0 + dx, y0 + dy))
            })
    }

    fn with_position(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Some(self.with_position(self.position.left()?))
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Some(self.with_position(self.position.right()?))
    }

    #[must_use]
    pub fn up(&self) -> Option<Self> {
        Some(self.with_position(self.position.up()?))
    }

    #[must_use]
    pub fn down(&self) -> Option<Self> {
        Some(self.with_position(self.position.down()?))
    }

    /// Rotates 90° clockwise without collision checks.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    /// Rotates 90° anticlockwise without collision checks.
    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }

    /// Rotates anticlockwise, trying kick offsets if the plain rotation collides.
    #[must_use]
    pub fn super_rotated_left(self, board: &BitBoard) -> Option<Self> {
        kick(board, self.rotated_left())
    }

    /// Rotates clockwise, trying kick offsets if the plain rotation collides.
    #[must_use]
    pub fn super_rotated_right(self, board: &BitBoard) -> Option<Self> {
        kick(board, self.rotated_right())
    }

    /// Returns the piece moved straight down to its lowest non-colliding row.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &BitBoard) -> Self {
        let mut dropped = *self;
        while let Some(piece) = dropped.down().filter(|m| !board.is_colliding(*m)) {
            dropped = piece;
        }
        dropped
    }
}

/// Simplified wall kick: keeps the rotated piece if it fits, otherwise tries one cell up,
/// right, down, then left, and gives up if all four collide.
///
/// This is not the Super Rotation System; there are no per-piece or per-state kick tables.
fn kick(board: &BitBoard, rotated: Piece) -> Option<Piece> {
    if !board.is_colliding(rotated) {
        return Some(rotated);
    }
    [rotated.up(), rotated.right(), rotated.down(), rotated.left()]
        .into_iter()
        .flatten()
        .find(|piece| !board.is_colliding(*piece))
}

/// Position of a piece's 4×4 bounding box, in sentinel-inclusive board coordinates.
///
/// (0, 0) is the top-left corner including the wall margin; x grows rightward and y grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: u8,
    y: u8,
}

impl PiecePosition {
    #[expect(clippy::cast_possible_truncation)]
    pub const SPAWN_POSITION: Self = Self::new(PIECE_SPAWN_X as u8, PIECE_SPAWN_Y as u8);

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!((x as usize) < BitBoard::TOTAL_WIDTH);
        assert!((y as usize) < BitBoard::TOTAL_HEIGHT);
        Self { x, y }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    #[must_use]
    pub const fn left(&self) -> Option<Self> {
        if self.x == 0 {
            None
        } else {
            Some(Self::new(self.x - 1, self.y))
        }
    }

    #[must_use]
    pub const fn right(&self) -> Option<Self> {
        if self.x as usize >= BitBoard::TOTAL_WIDTH - 1 {
            None
        } else {
            Some(Self::new(self.x + 1, self.y))
        }
    }

    #[must_use]
    pub const fn up(&self) -> Option<Self> {
        if self.y == 0 {
            None
        } else {
            Some(Self::new(self.x, self.y - 1))
        }
    }

    #[must_use]
    pub const fn down(&self) -> Option<Self> {
        if self.y as usize >= BitBoard::TOTAL_HEIGHT - 1 {
            None
        } else {
            Some(Self::new(self.x, self.y + 1))
        }
    }
}

/// Rotation state: 0 = spawn, 1 = 90° clockwise, 2 = 180°, 3 = 270° clockwise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl PieceKind {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    pub(crate) fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][rotation.as_usize()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use greedris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Four rows of a piece's 4×4 bounding box; bit `dx` of row `dy` is an occupied cell.
pub(crate) type PieceMask = [u16; 4];

/// Generates the four rotation states by repeatedly rotating 90° clockwise inside a
/// `size`×`size` box (4 for I, 2 for O, 3 otherwise).
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = [
    // I
    mask_rotations(4, [0b0000, 0b1111, 0b0000, 0b0000]),
    // O
    mask_rotations(2, [0b0011, 0b0011, 0b0000, 0b0000]),
    // S
    mask_rotations(3, [0b0110, 0b0011, 0b0000, 0b0000]),
    // Z
    mask_rotations(3, [0b0011, 0b0110, 0b0000, 0b0000]),
    // J
    mask_rotations(3, [0b0001, 0b0111, 0b0000, 0b0000]),
    // L
    mask_rotations(3, [0b0100, 0b0111, 0b0000, 0b0000]),
    // T
    mask_rotations(3, [0b0010, 0b0111, 0b0000, 0b0000]),
];
