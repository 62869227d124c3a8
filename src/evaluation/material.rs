//! Provides a very basic implementation of evaluation based on material
//! advantage using "[standard piece valuations]".
//!
//! While not very useful in practice, this evaluation function is great for
//! testing perft drivers and the CLI, because it is stable (will not
//! change because of the fixed piece "values"), easy to understand and
//! deterministic.
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use crate::chess::bitboard::Pieces;
use crate::chess::core::PieceKind::{self, Bishop, Knight, Pawn, Queen, Rook};
use crate::chess::core::Player;
use crate::chess::position::Position;
use crate::evaluation::{Evaluator, Score};

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 300;
const BISHOP_VALUE: i32 = 300;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

const VALUES: [(PieceKind, i32); 5] = [
    (Pawn, PAWN_VALUE),
    (Knight, KNIGHT_VALUE),
    (Bishop, BISHOP_VALUE),
    (Rook, ROOK_VALUE),
    (Queen, QUEEN_VALUE),
];

fn piece_value(pieces: &Pieces) -> i32 {
    VALUES
        .iter()
        .map(|&(kind, value)| value * pieces.bitboard_for(kind).count() as i32)
        .sum()
}

/// Material balance: the king is not counted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Material;

impl Evaluator for Material {
    fn evaluate(&self, position: &Position) -> Score {
        let us = position.side_to_move();
        Score::from(piece_value(position.pieces(us)) - piece_value(position.pieces(us.opponent())))
    }
}
