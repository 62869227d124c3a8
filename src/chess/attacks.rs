//! Mappings of occupied squares to the attacked squares for each piece, and the
//! check and pin analysis built on top of them.
//!
//! Slider attacks use the [classical approach]: the pre-calculated ray in each
//! direction is cut at the first blocker.
//!
//! [classical approach]: https://www.chessprogramming.org/Classical_Approach

use arrayvec::ArrayVec;

use crate::chess::bitboard::{Bitboard, Pieces};
use crate::chess::core::{Direction, PieceKind, Player, Square};
use crate::chess::generated;

/// All squares from `square` (exclusive) to the board edge.
#[must_use]
pub fn ray(direction: Direction, square: Square) -> Bitboard {
    generated::RAYS[direction as usize][square as usize]
}

/// The blocker closest to the ray origin.
fn first_blocker(direction: Direction, blockers: Bitboard) -> Option<Square> {
    if direction.is_positive() {
        blockers.lsb()
    } else {
        blockers.msb()
    }
}

/// Squares attacked along a single ray: everything up to and including the
/// first occupied square.
#[must_use]
pub fn ray_attacks(square: Square, direction: Direction, occupancy: Bitboard) -> Bitboard {
    let ray = ray(direction, square);
    match first_blocker(direction, ray & occupancy) {
        Some(blocker) => ray - self::ray(direction, blocker),
        None => ray,
    }
}

fn slider_attacks(square: Square, directions: &[Direction], occupancy: Bitboard) -> Bitboard {
    directions.iter().fold(Bitboard::empty(), |attacks, direction| {
        attacks | ray_attacks(square, *direction, occupancy)
    })
}

#[allow(missing_docs)]
#[must_use]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    slider_attacks(square, &Direction::DIAGONAL, occupancy)
}

#[allow(missing_docs)]
#[must_use]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    slider_attacks(square, &Direction::STRAIGHT, occupancy)
}

#[allow(missing_docs)]
#[must_use]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

#[allow(missing_docs)]
#[must_use]
pub fn knight_attacks(square: Square) -> Bitboard {
    generated::KNIGHT_ATTACKS[square as usize]
}

#[allow(missing_docs)]
#[must_use]
pub fn king_attacks(square: Square) -> Bitboard {
    generated::KING_ATTACKS[square as usize]
}

/// Squares attacked by a pawn of given color standing on `square`.
#[must_use]
pub fn pawn_attacks(square: Square, player: Player) -> Bitboard {
    match player {
        Player::White => generated::WHITE_PAWN_ATTACKS[square as usize],
        Player::Black => generated::BLACK_PAWN_ATTACKS[square as usize],
    }
}

/// Squares attacked by a piece standing on `square`.
#[must_use]
pub fn attacks_from(kind: PieceKind, player: Player, square: Square, occupancy: Bitboard) -> Bitboard {
    match kind {
        PieceKind::King => king_attacks(square),
        PieceKind::Queen => queen_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Pawn => pawn_attacks(square, player),
    }
}

/// Pieces of player `by` attacking the square given the occupancy.
///
/// A pawn of `by` attacks the square if and only if an opponent pawn on the
/// square would attack it back, so the pawn table is looked up for the other
/// color.
#[must_use]
pub fn attackers(square: Square, by: Player, pieces: &Pieces, occupancy: Bitboard) -> Bitboard {
    (knight_attacks(square) & pieces.knights)
        | (king_attacks(square) & pieces.king)
        | (pawn_attacks(square, by.opponent()) & pieces.pawns)
        | (rook_attacks(square, occupancy) & pieces.straight_sliders())
        | (bishop_attacks(square, occupancy) & pieces.diagonal_sliders())
}

#[allow(missing_docs)]
#[must_use]
pub fn is_attacked(square: Square, by: Player, pieces: &Pieces, occupancy: Bitboard) -> bool {
    attackers(square, by, pieces, occupancy).has_any()
}

/// Direction of the line connecting two squares, if they share a rank, file or
/// diagonal.
#[must_use]
pub fn direction_between(from: Square, to: Square) -> Option<Direction> {
    let file_delta = to.file() as i8 - from.file() as i8;
    let rank_delta = to.rank() as i8 - from.rank() as i8;
    if file_delta != 0 && rank_delta != 0 && file_delta.abs() != rank_delta.abs() {
        return None;
    }
    Direction::from_delta(file_delta.signum(), rank_delta.signum())
}

/// Squares strictly between two squares on a common line, empty otherwise.
#[must_use]
pub fn between(from: Square, to: Square) -> Bitboard {
    direction_between(from, to).map_or(Bitboard::empty(), |direction| {
        ray(direction, from) - ray(direction, to) - to
    })
}

/// Opponent piece giving check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checker {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Direction from the king to a slider, `None` for knights and pawns.
    pub direction: Option<Direction>,
    #[allow(missing_docs)]
    pub square: Square,
}

/// Number of checkers the king can face at once.
pub const MAX_CHECKERS: usize = 2;

/// Check state of the king: whether it is in check and what the legal moves
/// can do about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    #[allow(missing_docs)]
    NotInCheck,
    /// Evade, block or capture the checker.
    SingleCheck,
    /// Only king moves are legal.
    DoubleCheck,
}

/// Result of [`find_checkers`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckInfo {
    checkers: ArrayVec<Checker, MAX_CHECKERS>,
}

impl CheckInfo {
    #[allow(missing_docs)]
    #[must_use]
    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn status(&self) -> CheckStatus {
        match self.checkers.len() {
            0 => CheckStatus::NotInCheck,
            1 => CheckStatus::SingleCheck,
            _ => CheckStatus::DoubleCheck,
        }
    }

    /// Squares a non-king move has to land on: anything outside of check, the
    /// checker or the squares between a slider and the king in single check,
    /// nothing in double check.
    #[must_use]
    pub fn evasion_mask(&self, king: Square) -> Bitboard {
        match self.checkers.as_slice() {
            [] => Bitboard::full(),
            [checker] => match checker.direction {
                Some(direction) => ray(direction, king) - ray(direction, checker.square),
                None => Bitboard::from(checker.square),
            },
            _ => Bitboard::empty(),
        }
    }
}

/// Walks from the king in every direction and collects the opponent pieces
/// attacking it. Stops after the second checker: nothing changes for the move
/// generator beyond double check.
#[must_use]
pub fn find_checkers(king: Square, king_owner: Player, own: &Pieces, enemy: &Pieces) -> CheckInfo {
    let mut checkers = ArrayVec::new();
    let occupancy = own.all() | enemy.all();
    let leapers = [
        (PieceKind::Knight, knight_attacks(king) & enemy.knights),
        (PieceKind::Pawn, pawn_attacks(king, king_owner) & enemy.pawns),
    ];
    for (kind, squares) in leapers {
        for square in squares.iter() {
            if checkers
                .try_push(Checker {
                    kind,
                    direction: None,
                    square,
                })
                .is_err()
            {
                return CheckInfo { checkers };
            }
        }
    }
    for direction in Direction::ALL {
        if checkers.is_full() {
            break;
        }
        let Some(blocker) = first_blocker(direction, ray(direction, king) & occupancy) else {
            continue;
        };
        if let Some(kind) = enemy.slider_at(blocker, direction) {
            checkers.push(Checker {
                kind,
                direction: Some(direction),
                square: blocker,
            });
        }
    }
    CheckInfo { checkers }
}

/// Friendly piece that can not leave the line between its king and an
/// opponent slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Direction from the king towards the pinned piece.
    pub direction: Direction,
    #[allow(missing_docs)]
    pub square: Square,
}

/// Result of [`find_pinned`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinInfo {
    king: Square,
    pins: ArrayVec<Pin, 8>,
    pinned: Bitboard,
}

impl PinInfo {
    #[allow(missing_docs)]
    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Union of the pinned pieces' squares.
    #[must_use]
    pub const fn pinned(&self) -> Bitboard {
        self.pinned
    }

    /// Squares the piece on `square` may move to without exposing the king or
    /// `None` if the piece is not pinned. The pinner is included.
    #[must_use]
    pub fn allowed_squares(&self, square: Square) -> Option<Bitboard> {
        if !self.pinned.contains(square) {
            return None;
        }
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| ray(pin.direction, self.king))
    }
}

/// Walks from the king in every direction: a friendly piece followed by an
/// opponent slider moving along that direction is pinned.
#[must_use]
pub fn find_pinned(king: Square, own: &Pieces, enemy: &Pieces) -> PinInfo {
    let occupancy = own.all() | enemy.all();
    let mut pins = ArrayVec::new();
    let mut pinned = Bitboard::empty();
    for direction in Direction::ALL {
        let Some(candidate) = first_blocker(direction, ray(direction, king) & occupancy) else {
            continue;
        };
        let Some(kind) = own.at(candidate) else {
            continue;
        };
        let Some(pinner) = first_blocker(direction, ray(direction, candidate) & occupancy) else {
            continue;
        };
        if enemy.slider_at(pinner, direction).is_some() {
            pins.push(Pin {
                kind,
                direction,
                square: candidate,
            });
            pinned |= candidate;
        }
    }
    PinInfo { king, pins, pinned }
}
