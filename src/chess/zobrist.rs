//! [Zobrist hashing]: every feature of the position (a piece on a square, a
//! castling right, the en passant file and the side to move) is assigned a
//! pseudo-random key and the hash is the XOR of the keys of present features.
//! Making a move toggles only the features it changes, which allows updating
//! the hash incrementally.
//!
//! [Zobrist hashing]: https://www.chessprogramming.org/Zobrist_Hashing

use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::chess::core::{CastleRights, Move, PieceKind, Player, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::position::Position;

/// Zobrist keys are 64-bit unsigned integers that are computed once position is
/// created and updated whenever a move is made.
pub type Key = u64;

/// Seed of the keys shared by default between all positions.
pub const DEFAULT_SEED: u64 = 0x5EED_C0DE_2024_0001;

const PIECE_KINDS: usize = PieceKind::ALL.len();

/// One key per hashed feature. The keys never change after construction:
/// positions hold them behind an [`Arc`] and hashes are only comparable between
/// positions sharing the same seed.
pub struct ZobristKeys {
    seed: u64,
    pieces: [[[Key; BOARD_SIZE as usize]; PIECE_KINDS]; 2],
    /// White short, white long, black short, black long.
    castling: [Key; 4],
    en_passant_files: [Key; BOARD_WIDTH as usize],
    black_to_move: Key,
}

impl ZobristKeys {
    /// Draws all keys from a deterministic RNG seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pieces = [[[0; BOARD_SIZE as usize]; PIECE_KINDS]; 2];
        for square_keys in pieces.iter_mut().flatten() {
            for key in square_keys.iter_mut() {
                *key = rng.next_u64();
            }
        }
        let mut castling = [0; 4];
        castling.iter_mut().for_each(|key| *key = rng.next_u64());
        let mut en_passant_files = [0; BOARD_WIDTH as usize];
        en_passant_files
            .iter_mut()
            .for_each(|key| *key = rng.next_u64());
        let black_to_move = rng.next_u64();
        tracing::debug!(seed, "generated Zobrist keys");
        Self {
            seed,
            pieces,
            castling,
            en_passant_files,
            black_to_move,
        }
    }

    /// Keys for [`DEFAULT_SEED`], built on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<ZobristKeys>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new(DEFAULT_SEED))))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    fn piece(&self, player: Player, kind: PieceKind, square: Square) -> Key {
        self.pieces[player as usize][kind as usize][square as usize]
    }

    fn castling_key(&self, rights: CastleRights) -> Key {
        [
            CastleRights::WHITE_SHORT,
            CastleRights::WHITE_LONG,
            CastleRights::BLACK_SHORT,
            CastleRights::BLACK_LONG,
        ]
        .iter()
        .zip(self.castling)
        .filter(|(flag, _)| rights.contains(**flag))
        .fold(0, |hash, (_, key)| hash ^ key)
    }

    fn en_passant_key(&self, square: Option<Square>) -> Key {
        square.map_or(0, |square| self.en_passant_files[square.file() as usize])
    }

    const fn side_key(&self, player: Player) -> Key {
        match player {
            Player::White => 0,
            Player::Black => self.black_to_move,
        }
    }

    /// Computes the hash of the position from scratch.
    #[must_use]
    pub fn hash(&self, position: &Position) -> Key {
        let mut hash = self.side_key(position.side_to_move())
            ^ self.castling_key(position.castling())
            ^ self.en_passant_key(position.en_passant_square());
        for player in [Player::White, Player::Black] {
            for (kind, bitboard) in position.pieces(player).iter() {
                for square in bitboard.iter() {
                    hash ^= self.piece(player, kind, square);
                }
            }
        }
        hash
    }

    /// Toggles the features changed by `next_move`, given the castling rights
    /// and the en passant square of the position it is played in.
    ///
    /// XOR is its own inverse: calling this with the same arguments on the
    /// hash of the resulting position gives the hash of the original one.
    #[must_use]
    pub fn update(
        &self,
        hash: Key,
        next_move: &Move,
        prior_castling: CastleRights,
        prior_en_passant: Option<Square>,
    ) -> Key {
        let us = next_move.player();
        let mut hash = hash ^ self.black_to_move;
        hash ^= self.piece(us, next_move.piece(), next_move.from());
        hash ^= self.piece(us, next_move.final_kind(), next_move.to());
        if let Some(victim) = next_move.captured() {
            hash ^= self.piece(us.opponent(), victim, next_move.capture_square());
        }
        if let Some(side) = next_move.castling() {
            hash ^= self.piece(us, PieceKind::Rook, side.rook_origin(us));
            hash ^= self.piece(us, PieceKind::Rook, side.rook_target(us));
        }
        hash ^= self.castling_key(prior_castling)
            ^ self.castling_key(prior_castling.after_move(next_move));
        hash ^= self.en_passant_key(prior_en_passant)
            ^ self.en_passant_key(next_move.en_passant_target());
        hash
    }
}

impl std::fmt::Debug for ZobristKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZobristKeys")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deterministic_keys() {
        let first = ZobristKeys::new(42);
        let second = ZobristKeys::new(42);
        let other = ZobristKeys::new(43);
        assert_eq!(first.black_to_move, second.black_to_move);
        assert_eq!(first.pieces, second.pieces);
        assert_ne!(first.black_to_move, other.black_to_move);
        assert_eq!(first.seed(), 42);
    }

    #[test]
    fn shared_keys() {
        let keys = ZobristKeys::shared();
        assert!(Arc::ptr_eq(&keys, &ZobristKeys::shared()));
        assert_eq!(keys.seed(), DEFAULT_SEED);
    }

    #[test]
    fn castling_keys_combine() {
        let keys = ZobristKeys::new(7);
        assert_eq!(keys.castling_key(CastleRights::empty()), 0);
        assert_eq!(
            keys.castling_key(CastleRights::ALL),
            keys.castling.iter().fold(0, |hash, key| hash ^ key)
        );
        assert_eq!(
            keys.castling_key(CastleRights::WHITE_BOTH) ^ keys.castling_key(CastleRights::BLACK_BOTH),
            keys.castling_key(CastleRights::ALL)
        );
    }

    #[test]
    fn seeds_produce_different_hashes() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let default = Position::from_fen(fen).unwrap();
        let seeded = Position::from_fen_with_keys(fen, Arc::new(ZobristKeys::new(1))).unwrap();
        assert_eq!(default, seeded);
        assert_ne!(default.zobrist_hash(), seeded.zobrist_hash());
        assert_eq!(default.zobrist_hash(), Position::starting().zobrist_hash());
    }

    #[test]
    fn incremental_update() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let keys = position.zobrist_keys();
        for next_move in position.generate_moves() {
            let after = position.make_move(&next_move);
            let expected = keys.hash(&after);
            assert_eq!(after.zobrist_hash(), expected, "{next_move}");
            assert_eq!(
                keys.update(
                    expected,
                    &next_move,
                    position.castling(),
                    position.en_passant_square()
                ),
                position.zobrist_hash(),
                "{next_move}"
            );
        }
    }

    #[test]
    fn transpositions_collide() {
        let start = Position::starting();
        let mut first = start.clone();
        for text in ["Ng1-f3", "Ng8-f6", "Nb1-c3", "Nb8-c6"] {
            first = first.make_move(&first.parse_move(text).unwrap());
        }
        let mut second = start;
        for text in ["Nb1-c3", "Nb8-c6", "Ng1-f3", "Ng8-f6"] {
            second = second.make_move(&second.parse_move(text).unwrap());
        }
        assert_eq!(first.zobrist_hash(), second.zobrist_hash());
        // The en passant square is part of the hash.
        let pushed = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        let quiet = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(pushed.zobrist_hash(), quiet.zobrist_hash());
    }
}
