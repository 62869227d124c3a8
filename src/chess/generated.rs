//! Tables pre-calculated by the build script. Indexing by [`Square`] is the
//! only way to access them.
//!
//! [`Square`]: crate::chess::core::Square

use crate::chess::bitboard::Bitboard;
use crate::chess::core::BOARD_SIZE;

/// All squares from the source (exclusive) to the board edge, per direction in
/// compass order and per square.
pub(super) static RAYS: [[Bitboard; BOARD_SIZE as usize]; 8] =
    include!(concat!(env!("OUT_DIR"), "/rays"));

pub(super) static KNIGHT_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/knight_attacks"));
pub(super) static KING_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/king_attacks"));
pub(super) static WHITE_PAWN_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/white_pawn_attacks"));
pub(super) static BLACK_PAWN_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/black_pawn_attacks"));
