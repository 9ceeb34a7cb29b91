//! Game rules built on the core data structures.
//!
//! - [`MoveRules`] applies actions to a falling piece and locks it
//! - [`PieceBuffer`] deals pieces from a seeded 7-bag
//! - [`GameField`] and [`GameStats`] track a self-play game turn by turn

pub use self::{game_field::*, game_stats::*, move_rules::*, piece_buffer::*};

mod game_field;
mod game_stats;
mod move_rules;
mod piece_buffer;
