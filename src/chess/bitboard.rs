//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. This
//! results in very efficient calculation of possible attack vectors and other
//! meaningful features that are needed to generate moves and detect checks.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::{self, Write};
use std::mem;
use std::ops::{
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
    Sub,
    SubAssign,
};
use std::sync::Arc;

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::chess::core::{Direction, File, Piece, PieceKind, Player, Rank, Square};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant
/// bit corresponds to A1, and the most significant bit - to H8.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Constructs a bitboard representing the universal set, it contains all
    /// squares by setting all bits to binary one.
    #[must_use]
    pub const fn full() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Self::empty(), |result, square| result | Self::from(*square))
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_any(self) -> bool {
        self.bits != 0
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// The set square with the lowest index.
    #[must_use]
    pub const fn lsb(self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }
        // trailing_zeros() is within 0..64 for non-empty sets.
        Some(unsafe { mem::transmute(self.bits.trailing_zeros() as u8) })
    }

    /// The set square with the highest index.
    #[must_use]
    pub const fn msb(self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }
        Some(unsafe { mem::transmute(63 - self.bits.leading_zeros() as u8) })
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Moves every square one step in given direction. Squares leaving the
    /// board are dropped and nothing wraps around to the opposite file.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Self {
        match direction {
            Direction::North => self.shift_north(),
            Direction::NorthEast => self.shift_north_east(),
            Direction::East => self.shift_east(),
            Direction::SouthEast => self.shift_south_east(),
            Direction::South => self.shift_south(),
            Direction::SouthWest => self.shift_south_west(),
            Direction::West => self.shift_west(),
            Direction::NorthWest => self.shift_north_west(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_north(self) -> Self {
        Self::from_bits(self.bits << 8)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_south(self) -> Self {
        Self::from_bits(self.bits >> 8)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_east(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_H) << 1)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_west(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_A) >> 1)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_north_east(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_H) << 9)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_north_west(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_A) << 7)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_south_east(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_H) >> 7)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn shift_south_west(self) -> Self {
        Self::from_bits((self.bits & NOT_FILE_A) >> 9)
    }
}

const NOT_FILE_A: u64 = !File::A.mask().bits();
const NOT_FILE_H: u64 = !File::H.mask().bits();

impl fmt::Debug for Bitboard {
    /// Dumps the set as an 8x8 grid: '1' for set squares and '.' for the rest.
    /// The eighth rank goes first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = Rank::iter().rev().map(|rank| {
            File::iter()
                .map(|file| {
                    if self.contains(Square::new(file, rank)) {
                        '1'
                    } else {
                        '.'
                    }
                })
                .join(SQUARE_SEPARATOR)
        });
        write!(f, "{}", rows.format(LINE_SEPARATOR))
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOr<Square> for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Square) -> Self::Output {
        self | Self::from(rhs)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitOrAssign<Square> for Bitboard {
    fn bitor_assign(&mut self, rhs: Square) {
        *self |= Self::from(rhs);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits.bitand_assign(rhs.bits);
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitxor(rhs.bits))
    }
}

impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits.bitxor_assign(rhs.bits);
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Sub<Square> for Bitboard {
    type Output = Self;

    fn sub(self, rhs: Square) -> Self::Output {
        self - Self::from(rhs)
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl SubAssign<Square> for Bitboard {
    fn sub_assign(&mut self, rhs: Square) {
        *self = *self - rhs;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

impl IntoIterator for Bitboard {
    type IntoIter = BitboardIterator;
    type Item = Square;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let next = Bitboard::from_bits(self.bits).lsb()?;
        // Reset the LS1B.
        self.bits &= self.bits - 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIterator {}

/// Piece-centric representation of all material owned by one player. Uses
/// [Bitboard] to store a set of squares occupied by each piece. The main user
/// is [`crate::chess::position::Position`], [Bitboard] is not very useful on
/// its own.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Pieces {
    pub(super) king: Bitboard,
    pub(super) queens: Bitboard,
    pub(super) rooks: Bitboard,
    pub(super) bishops: Bitboard,
    pub(super) knights: Bitboard,
    pub(super) pawns: Bitboard,
}

impl Pieces {
    pub(super) const fn empty() -> Self {
        Self {
            king: Bitboard::empty(),
            queens: Bitboard::empty(),
            rooks: Bitboard::empty(),
            bishops: Bitboard::empty(),
            knights: Bitboard::empty(),
            pawns: Bitboard::empty(),
        }
    }

    /// Material of the given player in the starting position.
    pub(super) fn starting(player: Player) -> Self {
        let backrank = Rank::backrank(player);
        let on_backrank = |files: &[File]| {
            files.iter().fold(Bitboard::empty(), |result, file| {
                result | Square::new(*file, backrank)
            })
        };
        Self {
            king: on_backrank(&[File::E]),
            queens: on_backrank(&[File::D]),
            rooks: on_backrank(&[File::A, File::H]),
            bishops: on_backrank(&[File::C, File::F]),
            knights: on_backrank(&[File::B, File::G]),
            pawns: Rank::pawns_starting(player).mask(),
        }
    }

    /// All squares occupied by the player.
    #[must_use]
    pub fn all(&self) -> Bitboard {
        self.king | self.queens | self.rooks | self.bishops | self.knights | self.pawns
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn bitboard_for(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queens,
            PieceKind::Rook => self.rooks,
            PieceKind::Bishop => self.bishops,
            PieceKind::Knight => self.knights,
            PieceKind::Pawn => self.pawns,
        }
    }

    fn bitboard_for_mut(&mut self, kind: PieceKind) -> &mut Bitboard {
        match kind {
            PieceKind::King => &mut self.king,
            PieceKind::Queen => &mut self.queens,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Pawn => &mut self.pawns,
        }
    }

    /// Pieces beyond the starting set of each kind. Each of them replaces a
    /// promoted pawn.
    pub(super) fn promoted_count(&self) -> u32 {
        self.queens.count().saturating_sub(1)
            + self.rooks.count().saturating_sub(2)
            + self.bishops.count().saturating_sub(2)
            + self.knights.count().saturating_sub(2)
    }

    /// Rooks and queens.
    #[must_use]
    pub fn straight_sliders(&self) -> Bitboard {
        self.rooks | self.queens
    }

    /// Bishops and queens.
    #[must_use]
    pub fn diagonal_sliders(&self) -> Bitboard {
        self.bishops | self.queens
    }

    /// Returns the kind of the slider on the square if it attacks along given
    /// direction.
    pub(super) fn slider_at(&self, square: Square, direction: Direction) -> Option<PieceKind> {
        [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop]
            .into_iter()
            .find(|kind| kind.slides_along(direction) && self.bitboard_for(*kind).contains(square))
    }

    /// Iterates over (kind, squares) pairs, the king goes first.
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, Bitboard)> + '_ {
        PieceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.bitboard_for(kind)))
    }

    /// Returns the kind of the piece standing on the square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.bitboard_for(*kind).contains(square))
    }

    pub(super) fn add(&mut self, kind: PieceKind, square: Square) {
        debug_assert!(!self.all().contains(square), "{square} is already occupied");
        *self.bitboard_for_mut(kind) |= square;
    }

    pub(super) fn remove(&mut self, kind: PieceKind, square: Square) {
        debug_assert!(
            self.bitboard_for(kind).contains(square),
            "no {kind} on {square} to remove"
        );
        *self.bitboard_for_mut(kind) -= square;
    }
}

impl fmt::Debug for Pieces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(kind, bitboard)| (kind, bitboard.iter().join(","))))
            .finish()
    }
}

/// Composite occupancy masks derived from a [`Board`]. Computed lazily once
/// per position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupancy {
    #[allow(missing_docs)]
    pub white: Bitboard,
    #[allow(missing_docs)]
    pub black: Bitboard,
    #[allow(missing_docs)]
    pub all: Bitboard,
    /// Complement of `all`.
    pub empty: Bitboard,
}

impl Occupancy {
    pub(super) fn new(board: &Board) -> Self {
        let white = board.white.all();
        let black = board.black.all();
        let all = white | black;
        Self {
            white,
            black,
            all,
            empty: !all,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn player(&self, player: Player) -> Bitboard {
        match player {
            Player::White => self.white,
            Player::Black => self.black,
        }
    }
}

/// Piece-centric implementation of the chess board. Each side's pieces live
/// behind an [`Arc`]: a child position shares the sets a move does not touch
/// with its parent and clones the rest on first write.
///
/// Sharing is per player: a write clones all six bitboards of that player,
/// not only the one or two a move changes.
#[derive(Clone, PartialEq, Eq)]
pub(super) struct Board {
    white: Arc<Pieces>,
    black: Arc<Pieces>,
}

impl Board {
    #[must_use]
    pub(super) fn starting() -> Self {
        Self::new(Pieces::starting(Player::White), Pieces::starting(Player::Black))
    }

    pub(super) fn new(white: Pieces, black: Pieces) -> Self {
        Self {
            white: Arc::new(white),
            black: Arc::new(black),
        }
    }

    #[must_use]
    pub(super) fn player_pieces(&self, player: Player) -> &Pieces {
        match player {
            Player::White => &self.white,
            Player::Black => &self.black,
        }
    }

    /// Copy-on-write access: clones the set only if another board shares it.
    pub(super) fn player_pieces_mut(&mut self, player: Player) -> &mut Pieces {
        match player {
            Player::White => Arc::make_mut(&mut self.white),
            Player::Black => Arc::make_mut(&mut self.black),
        }
    }

    /// Returns true if both boards point to the same set of pieces.
    pub(super) fn shares_pieces(&self, other: &Self, player: Player) -> bool {
        match player {
            Player::White => Arc::ptr_eq(&self.white, &other.white),
            Player::Black => Arc::ptr_eq(&self.black, &other.black),
        }
    }

    #[must_use]
    pub(super) fn at(&self, square: Square) -> Option<Piece> {
        [Player::White, Player::Black]
            .into_iter()
            .find_map(|owner| {
                self.player_pieces(owner)
                    .at(square)
                    .map(|kind| Piece { owner, kind })
            })
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0u8;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = Rank::iter().rev().map(|rank| {
            File::iter()
                .map(|file| {
                    self.at(Square::new(file, rank))
                        .map_or_else(|| ".".to_string(), |piece| piece.to_string())
                })
                .join(SQUARE_SEPARATOR)
        });
        write!(f, "{}", rows.format(LINE_SEPARATOR))
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
