use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PieceKind, PieceSeedParseError};

/// 7-bag piece generator.
///
/// Each bag holds all seven kinds once, shuffled. A new bag is appended after every draw that
/// leaves seven or fewer pieces, so [`Self::next_pieces`] always previews more than one bag.
///
/// ```
/// use greedris_engine::{PieceBuffer, PieceKind, PieceSeed};
///
/// let mut buffer = PieceBuffer::with_seed(PieceSeed::from_u128(7));
/// let mut first_bag: Vec<_> = (0..7).map(|_| buffer.pop_next()).collect();
/// first_bag.sort_by_key(|kind| *kind as u8);
/// assert_eq!(first_bag, PieceKind::ALL);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl PieceBuffer {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next piece.
    ///
    /// # Panics
    ///
    /// Never in practice: the bag holds more than one bag's worth between draws.
    pub fn pop_next(&mut self) -> PieceKind {
        let next = self
            .bag
            .pop_front()
            .expect("piece bag is refilled after every draw");
        self.fill_bag();
        next
    }

    /// Upcoming pieces, next first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}

/// 128-bit seed for reproducible piece generation.
///
/// Written as 32 hexadecimal digits, big-endian, in both `Display`/`FromStr` and serde.
///
/// ```
/// use greedris_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdef0123456789ABCDEF".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// assert!("1234".parse::<PieceSeed>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.as_u128())
    }
}

impl FromStr for PieceSeed {
    type Err = PieceSeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(PieceSeedParseError::Length { actual: s.len() });
        }
        if let Some(found) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(PieceSeedParseError::InvalidDigit { found });
        }
        let value = u128::from_str_radix(s, 16)
            .map_err(|source| PieceSeedParseError::InvalidHex { source })?;
        Ok(Self::from_u128(value))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bag_holds_each_kind_once() {
        let mut buffer = PieceBuffer::with_seed(PieceSeed::from_u128(0x1234));
        for _ in 0..5 {
            let mut counts = [0; PieceKind::LEN];
            for _ in 0..PieceKind::LEN {
                counts[buffer.pop_next() as usize] += 1;
            }
            assert_eq!(counts, [1; PieceKind::LEN]);
        }
    }

    #[test]
    fn test_preview_covers_a_full_bag() {
        let mut buffer = PieceBuffer::with_seed(PieceSeed::from_u128(99));
        assert!(buffer.next_pieces().count() > PieceKind::LEN);
        for _ in 0..20 {
            let expected = buffer.next_pieces().next();
            assert_eq!(Some(buffer.pop_next()), expected);
            assert!(buffer.next_pieces().count() > PieceKind::LEN);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed: PieceSeed = rand::rng().random();
        let mut a = PieceBuffer::with_seed(seed);
        let mut b = PieceBuffer::with_seed(seed);
        for _ in 0..30 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn test_seed_serialization() {
        let seed = PieceSeed([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"0123456789abcdeffedcba9876543210\"");
        assert_eq!(serde_json::from_str::<PieceSeed>(&json).unwrap(), seed);

        let zero = serde_json::to_string(&PieceSeed::from_u128(0)).unwrap();
        assert_eq!(zero, format!("\"{}\"", "0".repeat(32)));
    }

    #[test]
    fn test_seed_rejects_malformed_hex() {
        for json in [
            "\"\"",
            "\"0123456789abcdef0123456789abcde\"",
            "\"0123456789abcdef0123456789abcdef0\"",
            "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
            "\"+123456789abcdef0123456789abcdef\"",
            "\"-123456789abcdef0123456789abcdef\"",
        ] {
            let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"), "{json}: {err}");
        }
    }
}
