//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::chess::bitboard::Bitboard;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Upper bound for the number of legal moves in any position. The known
/// maximum is 218. Position validation limits promoted material, so a single
/// piece kind's pseudo-legal moves (at most 9 queens) stay within bounds too.
pub const MAX_MOVES: usize = 256;

/// Moves are stored on the stack: generating them is on the hot path.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

bitflags::bitflags! {
    /// Everything apart from the squares and the pieces that is needed to make
    /// (and unmake) a [`Move`] and to print it in algebraic notation.
    ///
    /// Check flags are only set by the legal move generator in
    /// [`crate::chess::position::Position::generate_moves`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// The move removes an opponent piece.
        const CAPTURE = 0b0000_0001;
        /// Pawn capture "in passing": the captured pawn is not on the
        /// destination square.
        const EN_PASSANT = 0b0000_0010;
        /// Pawn advancement by 2 squares from its starting rank.
        const DOUBLE_PAWN_PUSH = 0b0000_0100;
        /// Short castle or O-O.
        const KINGSIDE_CASTLE = 0b0000_1000;
        /// Long castle or O-O-O.
        const QUEENSIDE_CASTLE = 0b0001_0000;
        /// The moved piece (or the castling rook) attacks the opponent king.
        const CHECK = 0b0010_0000;
        /// Another piece attacks the opponent king through a vacated square.
        const DISCOVERED_CHECK = 0b0100_0000;
        /// Two pieces attack the opponent king: a direct and a discovered
        /// check or, after en passant, two discovered ones.
        const DOUBLE_CHECK = 0b1000_0000;
    }
}

/// A move produced by the move generator. It knows everything about itself:
/// who moves what, what is captured and whether it gives check, which makes it
/// possible to apply and revert it without consulting the board and to print
/// it in long algebraic notation (`Qb6-b8+`, `e5xd6`, `O-O`).
///
/// Castling is a king move: `from` and `to` are the king's squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    player: Player,
    piece: PieceKind,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    pub(super) const fn new(player: Player, piece: PieceKind, from: Square, to: Square) -> Self {
        Self {
            player,
            piece,
            from,
            to,
            captured: None,
            promotion: None,
            flags: MoveFlags::empty(),
        }
    }

    #[must_use]
    pub(super) fn capturing(mut self, victim: PieceKind) -> Self {
        self.captured = Some(victim);
        self.flags |= MoveFlags::CAPTURE;
        self
    }

    #[must_use]
    pub(super) fn promoting(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[must_use]
    pub(super) fn with_flags(mut self, flags: MoveFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// `discovered` is the number of our sliders uncovered by the move.
    pub(super) fn set_check(&mut self, direct: bool, discovered: u32) {
        self.flags.set(MoveFlags::CHECK, direct);
        self.flags.set(MoveFlags::DISCOVERED_CHECK, discovered > 0);
        self.flags
            .set(MoveFlags::DOUBLE_CHECK, u32::from(direct) + discovered >= 2);
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    /// The kind of the piece standing on `from` before the move.
    #[must_use]
    pub const fn piece(&self) -> PieceKind {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn captured(&self) -> Option<PieceKind> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// The kind of the piece standing on `to` after the move.
    #[must_use]
    pub fn final_kind(&self) -> PieceKind {
        self.promotion.map_or(self.piece, PieceKind::from)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> Option<CastlingSide> {
        if self.flags.contains(MoveFlags::KINGSIDE_CASTLE) {
            Some(CastlingSide::Short)
        } else if self.flags.contains(MoveFlags::QUEENSIDE_CASTLE) {
            Some(CastlingSide::Long)
        } else {
            None
        }
    }

    /// Returns true for direct, discovered and double checks.
    #[must_use]
    pub const fn gives_check(&self) -> bool {
        self.flags
            .intersects(MoveFlags::CHECK.union(MoveFlags::DISCOVERED_CHECK))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_discovered_check(&self) -> bool {
        self.flags.contains(MoveFlags::DISCOVERED_CHECK)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_double_check(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_CHECK)
    }

    /// Square of the captured piece. Differs from `to` only for en passant:
    /// the captured pawn stands next to the capturing pawn's origin.
    #[must_use]
    pub const fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// The square skipped by a double pawn push.
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        if self.is_double_pawn_push() {
            self.from.shift(self.player.push_direction())
        } else {
            None
        }
    }

    /// Serializes the move in [UCI format]. Castling is encoded as the king
    /// move.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    #[must_use]
    pub fn uci(&self) -> String {
        let mut result = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            result.push_str(&PieceKind::from(promotion).to_string());
        }
        result
    }
}

impl fmt::Display for Move {
    /// Long algebraic notation: `<piece><from>-<to>`, `x` for captures,
    /// `=<piece>` for promotions, `+` for checks and `O-O`/`O-O-O` for
    /// castling.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castling() {
            Some(CastlingSide::Short) => f.write_str("O-O")?,
            Some(CastlingSide::Long) => f.write_str("O-O-O")?,
            None => {
                if let Some(letter) = self.piece.algebraic_letter() {
                    f.write_char(letter)?;
                }
                let separator = if self.is_capture() { 'x' } else { '-' };
                write!(f, "{}{separator}{}", self.from, self.to)?;
                if let Some(promotion) = self.promotion {
                    write!(f, "={}", promotion.algebraic_letter())?;
                }
            },
        }
        if self.gives_check() {
            f.write_char('+')?;
        }
        Ok(())
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use raychess::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use raychess::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Returns the neighbouring square in given direction or `None` if the step
    /// leaves the board.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file < 0 || file >= BOARD_WIDTH as i8 || rank < 0 || rank >= BOARD_WIDTH as i8 {
            return None;
        }
        // Both coordinates are within the board, the index is in 0..BOARD_SIZE.
        Some(unsafe { mem::transmute((rank * BOARD_WIDTH as i8 + file) as u8) })
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        if square_index >= BOARD_SIZE {
            bail!("square index should be in 0..BOARD_SIZE, got {square_index}");
        }
        Ok(unsafe { mem::transmute(square_index) })
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Returns a bitboard mask with 1s set for squares of the given file.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0x0101_0101_0101_0101 << self as u8)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Returns a bitboard mask with 1s set for squares of the given rank.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0xFF << (self as u8 * BOARD_WIDTH))
    }

    /// The rank where the player's pieces start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance. This is the only
    /// per-color difference in pawn movement.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::North,
            Self::Black => Direction::South,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    #[allow(missing_docs)]
    pub const ALL: [Self; 6] = [
        Self::King,
        Self::Queen,
        Self::Rook,
        Self::Bishop,
        Self::Knight,
        Self::Pawn,
    ];

    /// Returns true if the piece can attack along the given ray.
    #[must_use]
    pub const fn slides_along(self, direction: Direction) -> bool {
        match self {
            Self::Queen => true,
            Self::Rook => !direction.is_diagonal(),
            Self::Bishop => direction.is_diagonal(),
            Self::King | Self::Knight | Self::Pawn => false,
        }
    }

    /// Uppercase letter used in algebraic notation, pawns don't have one.
    #[must_use]
    pub const fn algebraic_letter(self) -> Option<char> {
        match self {
            Self::King => Some('K'),
            Self::Queen => Some('Q'),
            Self::Rook => Some('R'),
            Self::Bishop => Some('B'),
            Self::Knight => Some('N'),
            Self::Pawn => None,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side. When the king moves, player
    /// loses ability to castle both sides. When the rook moves or is captured,
    /// player loses ability to castle its corresponding side.
    ///
    /// - When castling h-side (short), the king ends up on [`File::G`] and the
    ///   rook on [`File::F`]
    /// - When castling a-side (long), the king ends up on [`File::C`] and the
    ///   rook on [`File::D`]
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        /// White O-O.
        const WHITE_SHORT = 0b1000;
        /// White O-O-O.
        const WHITE_LONG = 0b0100;
        /// Both white castles.
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        /// Black O-O.
        const BLACK_SHORT = 0b0010;
        /// Black O-O-O.
        const BLACK_LONG = 0b0001;
        /// Both black castles.
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        /// Starting position rights.
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// The right to castle given side.
    #[must_use]
    pub const fn side(player: Player, side: CastlingSide) -> Self {
        match (player, side) {
            (Player::White, CastlingSide::Short) => Self::WHITE_SHORT,
            (Player::White, CastlingSide::Long) => Self::WHITE_LONG,
            (Player::Black, CastlingSide::Short) => Self::BLACK_SHORT,
            (Player::Black, CastlingSide::Long) => Self::BLACK_LONG,
        }
    }

    /// Rights that are lost when anything moves from or to the square.
    const fn revoked_by(square: Square) -> Self {
        match square {
            Square::E1 => Self::WHITE_BOTH,
            Square::H1 => Self::WHITE_SHORT,
            Square::A1 => Self::WHITE_LONG,
            Square::E8 => Self::BLACK_BOTH,
            Square::H8 => Self::BLACK_SHORT,
            Square::A8 => Self::BLACK_LONG,
            _ => Self::empty(),
        }
    }

    /// Rights remaining after the move is made.
    #[must_use]
    pub const fn after_move(self, next_move: &Move) -> Self {
        self.difference(Self::revoked_by(next_move.from))
            .difference(Self::revoked_by(next_move.to))
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format: either
    /// "-" or a non-empty subsequence of "KQkq".
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        let mut previous = None;
        for symbol in input.chars() {
            let (order, right) = match symbol {
                'K' => (0, Self::WHITE_SHORT),
                'Q' => (1, Self::WHITE_LONG),
                'k' => (2, Self::BLACK_SHORT),
                'q' => (3, Self::BLACK_LONG),
                _ => bail!("unknown castle rights: {input}"),
            };
            if previous.is_some_and(|previous| previous >= order) {
                bail!("castle rights should follow \"KQkq\" order, got {input}");
            }
            previous = Some(order);
            rights |= right;
        }
        if rights.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

/// Castling towards the h-file (short, O-O) or the a-file (long, O-O-O).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Short,
    Long,
}

impl CastlingSide {
    #[allow(missing_docs)]
    pub const ALL: [Self; 2] = [Self::Short, Self::Long];

    pub(super) const fn king_target(self, player: Player) -> Square {
        match self {
            Self::Short => Square::new(File::G, Rank::backrank(player)),
            Self::Long => Square::new(File::C, Rank::backrank(player)),
        }
    }

    pub(super) const fn rook_origin(self, player: Player) -> Square {
        match self {
            Self::Short => Square::new(File::H, Rank::backrank(player)),
            Self::Long => Square::new(File::A, Rank::backrank(player)),
        }
    }

    pub(super) const fn rook_target(self, player: Player) -> Square {
        match self {
            Self::Short => Square::new(File::F, Rank::backrank(player)),
            Self::Long => Square::new(File::D, Rank::backrank(player)),
        }
    }

    /// Squares the king passes through or lands on: none of them may be
    /// attacked.
    pub(super) fn king_walk(self, player: Player) -> Bitboard {
        let backrank = Rank::backrank(player);
        match self {
            Self::Short => Bitboard::from_squares(&[
                Square::new(File::F, backrank),
                Square::new(File::G, backrank),
            ]),
            Self::Long => Bitboard::from_squares(&[
                Square::new(File::D, backrank),
                Square::new(File::C, backrank),
            ]),
        }
    }

    /// Squares strictly between the king and the rook.
    pub(super) fn gap(self, player: Player) -> Bitboard {
        match self {
            Self::Short => self.king_walk(player),
            Self::Long => {
                self.king_walk(player)
                    | Bitboard::from(Square::new(File::B, Rank::backrank(player)))
            },
        }
    }

    pub(super) const fn flag(self) -> MoveFlags {
        match self {
            Self::Short => MoveFlags::KINGSIDE_CASTLE,
            Self::Long => MoveFlags::QUEENSIDE_CASTLE,
        }
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    #[allow(missing_docs)]
    pub const ALL: [Self; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];

    const fn algebraic_letter(self) -> char {
        match self {
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
        }
    }
}

/// Compass directions on the board from the perspective of White player: North
/// is towards the eighth rank, East is towards the h-file.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions in compass order. Ray tables are indexed in this order.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];
    /// Rook rays.
    pub const STRAIGHT: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];
    /// Bishop rays.
    pub const DIAGONAL: [Self; 4] = [
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
    ];

    #[allow(missing_docs)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::SouthEast | Self::SouthWest | Self::NorthWest
        )
    }

    /// Moving in this direction increases the square index.
    pub(super) const fn is_positive(self) -> bool {
        matches!(
            self,
            Self::North | Self::NorthEast | Self::East | Self::NorthWest
        )
    }

    /// (file, rank) step.
    pub(super) const fn delta(self) -> (i8, i8) {
        match self {
            Self::North => (0, 1),
            Self::NorthEast => (1, 1),
            Self::East => (1, 0),
            Self::SouthEast => (1, -1),
            Self::South => (0, -1),
            Self::SouthWest => (-1, -1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, 1),
        }
    }

    /// Finds the direction for a unit (file, rank) step.
    pub(super) const fn from_delta(file_delta: i8, rank_delta: i8) -> Option<Self> {
        match (file_delta, rank_delta) {
            (0, 1) => Some(Self::North),
            (1, 1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, -1) => Some(Self::SouthEast),
            (0, -1) => Some(Self::South),
            (-1, -1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, 1) => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// Diagonals combining a vertical direction with West and East, used for
    /// pawn captures.
    pub(super) const fn captures(self) -> [Self; 2] {
        match self {
            Self::South => [Self::SouthWest, Self::SouthEast],
            _ => [Self::NorthWest, Self::NorthEast],
        }
    }
}
