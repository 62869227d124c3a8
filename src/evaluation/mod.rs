//! This module implements "static" [evaluation], i.e. predicting the relative
//! value/score of given position without searching the move tree.
//!
//! For convenience, the score is returned in centipawn units.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

use std::fmt::Display;
use std::ops::Neg;

use crate::chess::position::Position;

pub mod material;

/// Relative value of the position from the perspective of the side to move.
/// A thin wrapper around i32 with the same size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    /// Evaluation relative value in centipawn (100 CP = 1 "pawn") units.
    value: i32,
}

impl Score {
    #[allow(missing_docs)]
    pub const DRAW: Self = Self { value: 0 };

    /// Centipawn value of the score.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.value
    }
}

impl Neg for Score {
    type Output = Self;

    /// Mirrors evaluation to other player's perspective.
    fn neg(self) -> Self::Output {
        Self {
            value: self.value.neg(),
        }
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Self { value }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cp {}", self.value)
    }
}

/// Static evaluation function. Search drivers plug their own implementations;
/// [`Position::evaluate`] uses [`material::Material`].
pub trait Evaluator {
    /// Scores the position from the perspective of the side to move.
    fn evaluate(&self, position: &Position) -> Score;
}
