//! Pseudo-legal [move generation]: the moves follow each piece's pattern and
//! the occupancy rules but can leave the own king in check. Legality is the
//! responsibility of [`crate::chess::position::Position::generate_moves`].
//!
//! Sliding pieces walk the board one square at a time, leapers use the
//! pre-calculated attack tables and pawns are moved set-wise with bitboard
//! shifts.
//!
//! [move generation]: https://www.chessprogramming.org/Move_Generation

use crate::chess::attacks;
use crate::chess::bitboard::{Bitboard, Pieces};
use crate::chess::core::{
    CastleRights,
    CastlingSide,
    Direction,
    File,
    Move,
    MoveFlags,
    MoveList,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};

/// Everything the generator needs to know about the position.
#[derive(Clone, Copy)]
pub(super) struct Context<'a> {
    pub(super) player: Player,
    pub(super) ours: &'a Pieces,
    pub(super) theirs: &'a Pieces,
    pub(super) own: Bitboard,
    pub(super) opponent: Bitboard,
    pub(super) empty: Bitboard,
    pub(super) en_passant_square: Option<Square>,
    pub(super) castling: CastleRights,
}

impl Context<'_> {
    /// Opponent piece that can be captured on the square. The king is never a
    /// capture target.
    fn capturable(&self, square: Square) -> Option<PieceKind> {
        if !self.opponent.contains(square) {
            return None;
        }
        self.theirs
            .at(square)
            .filter(|kind| *kind != PieceKind::King)
    }

    fn push_step(&self, kind: PieceKind, from: Square, to: Square, moves: &mut MoveList) {
        let candidate = Move::new(self.player, kind, from, to);
        if self.empty.contains(to) {
            moves.push(candidate);
        } else if let Some(victim) = self.capturable(to) {
            moves.push(candidate.capturing(victim));
        }
    }
}

/// Appends pseudo-legal moves of all pieces of given kind.
pub(super) fn pseudo_legal_moves(kind: PieceKind, context: &Context<'_>, moves: &mut MoveList) {
    match kind {
        PieceKind::King => king_moves(context, moves),
        PieceKind::Queen => slider_moves(PieceKind::Queen, &Direction::ALL, context, moves),
        PieceKind::Rook => slider_moves(PieceKind::Rook, &Direction::STRAIGHT, context, moves),
        PieceKind::Bishop => {
            slider_moves(PieceKind::Bishop, &Direction::DIAGONAL, context, moves);
        },
        PieceKind::Knight => knight_moves(context, moves),
        PieceKind::Pawn => pawn_moves(context, moves),
    }
}

fn slider_moves(
    kind: PieceKind,
    directions: &[Direction],
    context: &Context<'_>,
    moves: &mut MoveList,
) {
    for from in context.ours.bitboard_for(kind).iter() {
        for direction in directions {
            let mut current = from;
            while let Some(to) = current.shift(*direction) {
                if context.empty.contains(to) {
                    moves.push(Move::new(context.player, kind, from, to));
                    current = to;
                    continue;
                }
                if let Some(victim) = context.capturable(to) {
                    moves.push(Move::new(context.player, kind, from, to).capturing(victim));
                }
                break;
            }
        }
    }
}

fn knight_moves(context: &Context<'_>, moves: &mut MoveList) {
    for from in context.ours.knights.iter() {
        for to in (attacks::knight_attacks(from) - context.own).iter() {
            context.push_step(PieceKind::Knight, from, to, moves);
        }
    }
}

fn king_moves(context: &Context<'_>, moves: &mut MoveList) {
    // Kings can not stand next to each other.
    let opponent_king_zone = context
        .theirs
        .king
        .lsb()
        .map_or(Bitboard::empty(), attacks::king_attacks);
    for from in context.ours.king.iter() {
        for to in (attacks::king_attacks(from) - context.own - opponent_king_zone).iter() {
            context.push_step(PieceKind::King, from, to, moves);
        }
    }
}

/// Pawn movement rules of one player. Everything is derived from the push
/// direction, which is the only difference between White and Black pawns.
struct PawnAdvance {
    push: Direction,
    captures: [Direction; 2],
    /// Single pushes landing here can continue with a double push.
    double_push_rank: Bitboard,
    promotion_rank: Rank,
}

impl PawnAdvance {
    fn new(player: Player) -> Self {
        let push = player.push_direction();
        Self {
            push,
            captures: push.captures(),
            double_push_rank: Rank::pawns_starting(player).mask().shift(push),
            promotion_rank: Rank::backrank(player.opponent()),
        }
    }

    /// Pushes the move or, on the last rank, all of its promotions.
    fn push_with_promotions(&self, candidate: Move, moves: &mut MoveList) {
        if candidate.to().rank() == self.promotion_rank {
            for promotion in Promotion::ALL {
                moves.push(candidate.promoting(promotion));
            }
        } else {
            moves.push(candidate);
        }
    }
}

fn pawn_moves(context: &Context<'_>, moves: &mut MoveList) {
    let advance = PawnAdvance::new(context.player);
    let back = advance.push.opposite();
    let pawns = context.ours.pawns;
    let pawn_move = |from, to| Move::new(context.player, PieceKind::Pawn, from, to);

    let single_pushes = pawns.shift(advance.push) & context.empty;
    for to in single_pushes.iter() {
        if let Some(from) = to.shift(back) {
            advance.push_with_promotions(pawn_move(from, to), moves);
        }
    }

    let double_pushes = (single_pushes & advance.double_push_rank).shift(advance.push) & context.empty;
    for to in double_pushes.iter() {
        if let Some(from) = to.shift(back).and_then(|middle| middle.shift(back)) {
            moves.push(pawn_move(from, to).with_flags(MoveFlags::DOUBLE_PAWN_PUSH));
        }
    }

    let en_passant = context
        .en_passant_square
        .map_or(Bitboard::empty(), Bitboard::from);
    for direction in advance.captures {
        let targets = pawns.shift(direction) & (context.opponent | en_passant);
        for to in targets.iter() {
            let Some(from) = to.shift(direction.opposite()) else {
                continue;
            };
            if context.en_passant_square == Some(to) {
                moves.push(
                    pawn_move(from, to)
                        .capturing(PieceKind::Pawn)
                        .with_flags(MoveFlags::EN_PASSANT),
                );
            } else if let Some(victim) = context.capturable(to) {
                advance.push_with_promotions(pawn_move(from, to).capturing(victim), moves);
            }
        }
    }
}

/// Appends castling candidates: the right is still available, the rook is in
/// its corner and nothing stands between the king and the rook. Whether the
/// king passes attacked squares is checked by the caller.
pub(super) fn castling_candidates(context: &Context<'_>, moves: &mut MoveList) {
    let player = context.player;
    let king_origin = Square::new(File::E, Rank::backrank(player));
    if !context.ours.king.contains(king_origin) {
        return;
    }
    let occupied = !context.empty;
    for side in CastlingSide::ALL {
        if !context.castling.contains(CastleRights::side(player, side)) {
            continue;
        }
        if !context.ours.rooks.contains(side.rook_origin(player)) {
            continue;
        }
        if (side.gap(player) & occupied).has_any() {
            continue;
        }
        moves.push(
            Move::new(player, PieceKind::King, king_origin, side.king_target(player))
                .with_flags(side.flag()),
        );
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::position::Position;

    fn pseudo_legal(fen: &str, kind: PieceKind) -> Vec<String> {
        let position = Position::from_fen(fen).unwrap();
        let mut moves = position
            .pseudo_legal_moves(kind)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        moves.sort();
        moves
    }

    #[test]
    fn starting_position() {
        let position = Position::starting();
        assert_eq!(position.pseudo_legal_moves(PieceKind::Pawn).len(), 16);
        assert_eq!(position.pseudo_legal_moves(PieceKind::Knight).len(), 4);
        for kind in [
            PieceKind::King,
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
        ] {
            assert!(position.pseudo_legal_moves(kind).is_empty());
        }
    }

    #[test]
    fn sliders_stop_at_blockers() {
        assert_eq!(
            pseudo_legal("k7/8/8/1p6/8/3R1N2/8/K7 w - - 0 1", PieceKind::Rook),
            vec![
                "Rd3-a3", "Rd3-b3", "Rd3-c3", "Rd3-d1", "Rd3-d2", "Rd3-d4", "Rd3-d5", "Rd3-d6",
                "Rd3-d7", "Rd3-d8", "Rd3-e3",
            ]
        );
        assert_eq!(
            pseudo_legal("k7/8/8/1p6/8/3B4/8/K7 w - - 0 1", PieceKind::Bishop),
            vec![
                "Bd3-b1", "Bd3-c2", "Bd3-c4", "Bd3-e2", "Bd3-e4", "Bd3-f1", "Bd3-f5", "Bd3-g6",
                "Bd3-h7", "Bd3xb5",
            ]
        );
    }

    #[test]
    fn kings_keep_distance() {
        assert_eq!(
            pseudo_legal("8/8/8/8/8/2k5/8/K7 w - - 0 1", PieceKind::King),
            vec!["Ka1-a2", "Ka1-b1"]
        );
        assert_eq!(
            pseudo_legal("8/8/8/8/8/2k5/8/K7 w - - 0 1", PieceKind::King).len(),
            2
        );
    }

    #[test]
    fn pawns() {
        assert_eq!(
            pseudo_legal("k7/8/8/3pP3/8/8/1P6/K7 w - d6 0 1", PieceKind::Pawn),
            vec!["b2-b3", "b2-b4", "e5-e6", "e5xd6"]
        );
        assert_eq!(
            pseudo_legal("k7/8/8/8/8/8/1p6/R1N4K b - - 0 1", PieceKind::Pawn),
            vec![
                "b2-b1=B", "b2-b1=N", "b2-b1=Q", "b2-b1=R", "b2xa1=B", "b2xa1=N", "b2xa1=Q",
                "b2xa1=R", "b2xc1=B", "b2xc1=N", "b2xc1=Q", "b2xc1=R",
            ]
        );
        // Blocked pawns neither push nor jump.
        assert_eq!(
            pseudo_legal("k7/8/8/8/8/p7/P7/K7 w - - 0 1", PieceKind::Pawn),
            Vec::<String>::new()
        );
        assert_eq!(
            pseudo_legal("k7/p7/8/P7/8/8/8/K7 b - - 0 1", PieceKind::Pawn),
            vec!["a7-a6"]
        );
    }

    #[test]
    fn castling() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        let context = position.movegen_context();
        let mut moves = MoveList::new();
        castling_candidates(&context, &mut moves);
        assert_eq!(
            moves.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["O-O"]
        );

        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 0 1").unwrap();
        let context = position.movegen_context();
        moves.clear();
        castling_candidates(&context, &mut moves);
        assert_eq!(
            moves.iter().map(Move::uci).collect::<Vec<_>>(),
            vec!["e8c8"]
        );
    }
}
