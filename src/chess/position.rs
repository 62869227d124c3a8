//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule, en passant
//! and the Zobrist hash.
//!
//! The legal move generator and move making are also implemented here as a way
//! to produce new [`Position`]s: a position is never mutated after it is
//! created.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context};

use crate::chess::attacks::{self, CheckInfo, CheckStatus, PinInfo};
use crate::chess::bitboard::{Bitboard, Board, Occupancy, Pieces};
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::chess::movegen;
use crate::chess::zobrist::{Key, ZobristKeys};
use crate::evaluation::material::Material;
use crate::evaluation::{Evaluator, Score};

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD format accepted here does not support
/// [Operations]: the EPD support exists for compatibility with databases which
/// provide trimmed FEN lines (all FEN parts except Halfmove Clock and Fullmove
/// Counter).
///
/// Positions are immutable: [`Position::make_move`] returns a new one that
/// shares the piece sets the move did not touch with its parent.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
    kings: [Square; 2],
    hash: Key,
    keys: Arc<ZobristKeys>,
    occupancy: OnceLock<Occupancy>,
    check_info: OnceLock<CheckInfo>,
}

/// The part of the position state a move destroys and that can not be restored
/// from the [`Move`] itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    castling: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use raychess::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self::starting_with_keys(ZobristKeys::shared())
    }

    /// Same as [`Position::starting`] but hashed with the given keys.
    #[must_use]
    pub fn starting_with_keys(keys: Arc<ZobristKeys>) -> Self {
        Self::assemble(
            Board::starting(),
            Player::White,
            CastleRights::ALL,
            None,
            0,
            NonZeroU16::MIN,
            [Square::E1, Square::E8],
            keys,
        )
    }

    /// Puts the parts together and computes the hash from scratch.
    #[allow(clippy::too_many_arguments)]
    fn assemble(
        board: Board,
        side_to_move: Player,
        castling: CastleRights,
        en_passant_square: Option<Square>,
        halfmove_clock: u16,
        fullmove_counter: NonZeroU16,
        kings: [Square; 2],
        keys: Arc<ZobristKeys>,
    ) -> Self {
        let mut position = Self {
            board,
            castling,
            side_to_move,
            halfmove_clock,
            fullmove_counter,
            en_passant_square,
            kings,
            hash: 0,
            keys,
            occupancy: OnceLock::new(),
            check_info: OnceLock::new(),
        };
        position.hash = position.keys.hash(&position);
        position
    }

    pub(super) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn they(&self) -> Player {
        self.side_to_move.opponent()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square skipped by the last double pawn push, if any.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter.get()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn pieces(&self, player: Player) -> &Pieces {
        self.board.player_pieces(player)
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn king(&self, player: Player) -> Square {
        self.kings[player as usize]
    }

    /// Squares occupied by each player, computed once per position.
    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        self.occupancy.get_or_init(|| Occupancy::new(&self.board))
    }

    /// Checks against the side to move, computed once per position.
    #[must_use]
    pub fn check_info(&self) -> &CheckInfo {
        self.check_info.get_or_init(|| {
            attacks::find_checkers(
                self.king(self.us()),
                self.us(),
                self.pieces(self.us()),
                self.pieces(self.they()),
            )
        })
    }

    /// Pins against the side to move.
    #[must_use]
    pub fn pin_info(&self) -> PinInfo {
        attacks::find_pinned(
            self.king(self.us()),
            self.pieces(self.us()),
            self.pieces(self.they()),
        )
    }

    /// Pieces of player `by` attacking the square.
    #[must_use]
    pub fn attackers(&self, square: Square, by: Player) -> Bitboard {
        attacks::attackers(square, by, self.pieces(by), self.occupancy().all)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.check_info().status() != CheckStatus::NotInCheck
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.generate_moves().is_empty()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.generate_moves().is_empty()
    }

    /// [Zobrist hash] of the position, maintained incrementally.
    ///
    /// [Zobrist hash]: https://www.chessprogramming.org/Zobrist_Hashing
    #[must_use]
    pub const fn zobrist_hash(&self) -> Key {
        self.hash
    }

    /// Keys used to hash this position and all positions derived from it.
    #[must_use]
    pub const fn zobrist_keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    /// Static evaluation from the perspective of the side to move.
    #[must_use]
    pub fn evaluate(&self) -> Score {
        Material.evaluate(self)
    }

    /// State needed to revert the next move with [`Position::unmake_move`].
    #[must_use]
    pub const fn undo_info(&self) -> Undo {
        Undo {
            castling: self.castling,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
        }
    }

    /// Returns true if both positions point to the same set of the player's
    /// pieces in memory.
    #[must_use]
    pub fn shares_pieces_with(&self, other: &Self, player: Player) -> bool {
        self.board.shares_pieces(&other.board, player)
    }

    pub(super) fn movegen_context(&self) -> movegen::Context<'_> {
        let occupancy = self.occupancy();
        movegen::Context {
            player: self.us(),
            ours: self.pieces(self.us()),
            theirs: self.pieces(self.they()),
            own: occupancy.player(self.us()),
            opponent: occupancy.player(self.they()),
            empty: occupancy.empty,
            en_passant_square: self.en_passant_square,
            castling: self.castling,
        }
    }

    /// Pseudo-legal moves of the side to move for one piece kind: they might
    /// leave the king in check. Castling is not included.
    #[must_use]
    pub fn pseudo_legal_moves(&self, kind: PieceKind) -> MoveList {
        let mut moves = MoveList::new();
        movegen::pseudo_legal_moves(kind, &self.movegen_context(), &mut moves);
        moves
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king in check) and tags the ones giving check.
    ///
    /// The pseudo-legal moves are filtered depending on the check status:
    ///
    /// - In double check, only the king can move.
    /// - In single check, other pieces have to capture the checker or block
    ///   the ray between a slider and the king.
    /// - Pinned pieces stay on the line between the king and the pinner.
    ///
    /// This is a performance and correctness-critical path: every modification
    /// should be benchmarked and carefully tested.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        let us = self.us();
        let king = self.king(us);
        let context = self.movegen_context();
        let occupancy = self.occupancy().all;
        let status = self.check_info().status();
        let mut moves = MoveList::new();
        let mut candidates = MoveList::new();

        // The king can not hide behind itself: remove it from the occupancy so
        // that retreating along the checking ray is still attacked.
        let without_king = occupancy - king;
        movegen::pseudo_legal_moves(PieceKind::King, &context, &mut candidates);
        for candidate in &candidates {
            if !self.is_attacked(candidate.to(), without_king) {
                moves.push(*candidate);
            }
        }

        if status != CheckStatus::DoubleCheck {
            let evasions = self.check_info().evasion_mask(king);
            let pins = self.pin_info();
            for kind in [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Pawn,
            ] {
                candidates.clear();
                movegen::pseudo_legal_moves(kind, &context, &mut candidates);
                for candidate in &candidates {
                    if self.keeps_king_safe(candidate, evasions, &pins) {
                        moves.push(*candidate);
                    }
                }
            }
        }

        if status == CheckStatus::NotInCheck {
            candidates.clear();
            movegen::castling_candidates(&context, &mut candidates);
            for candidate in &candidates {
                let Some(side) = candidate.castling() else {
                    continue;
                };
                if side
                    .king_walk(us)
                    .iter()
                    .all(|square| !self.is_attacked(square, occupancy))
                {
                    moves.push(*candidate);
                }
            }
        }

        for next_move in &mut moves {
            self.tag_check(next_move);
        }
        moves
    }

    /// Legal moves of given player. For the side not to move, the moves are
    /// generated as if it was its turn (the en passant square is dropped).
    #[must_use]
    pub fn legal_moves(&self, player: Player) -> MoveList {
        if player == self.side_to_move {
            return self.generate_moves();
        }
        self.null_move_view().generate_moves()
    }

    /// The same board with the other side to move.
    fn null_move_view(&self) -> Self {
        Self::assemble(
            self.board.clone(),
            self.they(),
            self.castling,
            None,
            self.halfmove_clock,
            self.fullmove_counter,
            self.kings,
            Arc::clone(&self.keys),
        )
    }

    fn is_attacked(&self, square: Square, occupancy: Bitboard) -> bool {
        attacks::is_attacked(square, self.they(), self.pieces(self.they()), occupancy)
    }

    /// Legality of a non-king move given the check and pin state.
    fn keeps_king_safe(&self, candidate: &Move, evasions: Bitboard, pins: &PinInfo) -> bool {
        if candidate.is_en_passant() {
            return self.en_passant_keeps_king_safe(candidate);
        }
        if !evasions.contains(candidate.to()) {
            return false;
        }
        pins.allowed_squares(candidate.from())
            .map_or(true, |allowed| allowed.contains(candidate.to()))
    }

    /// En passant removes two pieces from the board at once, which can expose
    /// the king along the rank. Simulating the resulting occupancy covers this
    /// as well as capturing a checking pawn and diagonal pins.
    fn en_passant_keeps_king_safe(&self, candidate: &Move) -> bool {
        let captured = candidate.capture_square();
        let occupancy = (self.occupancy().all - candidate.from() - captured) | candidate.to();
        let attackers =
            attacks::attackers(self.king(self.us()), self.they(), self.pieces(self.they()), occupancy)
                - captured;
        attackers.is_empty()
    }

    /// Sets check flags given the occupancy after the move.
    fn tag_check(&self, next_move: &mut Move) {
        let us = next_move.player();
        let target = self.king(us.opponent());
        let ours = self.pieces(us);
        let mut vacated = Bitboard::from(next_move.from());
        let mut arrived = Bitboard::from(next_move.to());
        let (attacker, attacker_kind) = match next_move.castling() {
            Some(side) => {
                vacated |= side.rook_origin(us);
                arrived |= side.rook_target(us);
                (side.rook_target(us), PieceKind::Rook)
            },
            None => (next_move.to(), next_move.final_kind()),
        };
        let mut occupancy = (self.occupancy().all - vacated) | arrived;
        if next_move.is_en_passant() {
            occupancy -= next_move.capture_square();
        }
        let direct = attacks::attacks_from(attacker_kind, us, attacker, occupancy).contains(target);
        let discovered = ((attacks::rook_attacks(target, occupancy) & ours.straight_sliders())
            | (attacks::bishop_attacks(target, occupancy) & ours.diagonal_sliders()))
            - vacated;
        next_move.set_check(direct, discovered.count());
    }

    /// Applies a move produced by the legal move generator and returns the
    /// resulting position. The hash is updated incrementally, the piece set of
    /// the player who did not lose anything is shared with `self`.
    ///
    /// This is the unchecked fast path: applying a move that does not belong
    /// to this position is a programming error caught by debug assertions. Use
    /// [`Position::play`] for moves of unknown origin.
    #[must_use]
    pub fn make_move(&self, next_move: &Move) -> Self {
        let us = next_move.player();
        let them = us.opponent();
        debug_assert_eq!(us, self.side_to_move, "{next_move} is played out of turn");

        let mut board = self.board.clone();
        let ours = board.player_pieces_mut(us);
        ours.remove(next_move.piece(), next_move.from());
        ours.add(next_move.final_kind(), next_move.to());
        if let Some(side) = next_move.castling() {
            ours.remove(PieceKind::Rook, side.rook_origin(us));
            ours.add(PieceKind::Rook, side.rook_target(us));
        }
        if let Some(victim) = next_move.captured() {
            board
                .player_pieces_mut(them)
                .remove(victim, next_move.capture_square());
        }

        let mut kings = self.kings;
        if next_move.piece() == PieceKind::King {
            kings[us as usize] = next_move.to();
        }
        let halfmove_clock = if next_move.piece() == PieceKind::Pawn || next_move.is_capture() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_counter = match us {
            Player::White => self.fullmove_counter,
            Player::Black => self.fullmove_counter.saturating_add(1),
        };

        Self {
            board,
            castling: self.castling.after_move(next_move),
            side_to_move: them,
            halfmove_clock,
            fullmove_counter,
            en_passant_square: next_move.en_passant_target(),
            kings,
            hash: self.keys.update(
                self.hash,
                next_move,
                self.castling,
                self.en_passant_square,
            ),
            keys: Arc::clone(&self.keys),
            occupancy: OnceLock::new(),
            check_info: OnceLock::new(),
        }
    }

    /// Reverts `previous` which was applied to the position `undo` was taken
    /// from. The result is equal to that position, hash included.
    #[must_use]
    pub fn unmake_move(&self, previous: &Move, undo: &Undo) -> Self {
        let us = previous.player();
        let them = us.opponent();
        debug_assert_eq!(them, self.side_to_move, "{previous} was not the last move");

        let mut board = self.board.clone();
        let ours = board.player_pieces_mut(us);
        ours.remove(previous.final_kind(), previous.to());
        ours.add(previous.piece(), previous.from());
        if let Some(side) = previous.castling() {
            ours.remove(PieceKind::Rook, side.rook_target(us));
            ours.add(PieceKind::Rook, side.rook_origin(us));
        }
        if let Some(victim) = previous.captured() {
            board
                .player_pieces_mut(them)
                .add(victim, previous.capture_square());
        }

        let mut kings = self.kings;
        if previous.piece() == PieceKind::King {
            kings[us as usize] = previous.from();
        }
        let fullmove_counter = match us {
            Player::White => self.fullmove_counter,
            Player::Black => NonZeroU16::new(self.fullmove_counter.get() - 1)
                .unwrap_or(NonZeroU16::MIN),
        };

        Self {
            board,
            castling: undo.castling,
            side_to_move: us,
            halfmove_clock: undo.halfmove_clock,
            fullmove_counter,
            en_passant_square: undo.en_passant_square,
            kings,
            hash: self.keys.update(
                self.hash,
                previous,
                undo.castling,
                undo.en_passant_square,
            ),
            keys: Arc::clone(&self.keys),
            occupancy: OnceLock::new(),
            check_info: OnceLock::new(),
        }
    }

    /// Checked version of [`Position::make_move`] for moves that were not
    /// necessarily generated for this position.
    ///
    /// # Errors
    ///
    /// If the move is inconsistent with the board: wrong side, no piece to
    /// move, no piece to capture or an occupied destination.
    pub fn play(&self, next_move: &Move) -> anyhow::Result<Self> {
        self.check_consistency(next_move)
            .inspect_err(|error| tracing::debug!(%next_move, %error, "rejected move"))?;
        Ok(self.make_move(next_move))
    }

    fn check_consistency(&self, next_move: &Move) -> anyhow::Result<()> {
        let us = next_move.player();
        if us != self.side_to_move {
            bail!(
                "{next_move} is a {} move but it is {} to move",
                us.name(),
                self.side_to_move.name()
            );
        }
        if !self
            .pieces(us)
            .bitboard_for(next_move.piece())
            .contains(next_move.from())
        {
            bail!(
                "{next_move}: there is no {} {:?} on {}",
                us.name(),
                next_move.piece(),
                next_move.from()
            );
        }
        match next_move.captured() {
            Some(victim) => {
                if !self
                    .pieces(us.opponent())
                    .bitboard_for(victim)
                    .contains(next_move.capture_square())
                {
                    bail!(
                        "{next_move}: there is no {victim:?} to capture on {}",
                        next_move.capture_square()
                    );
                }
            },
            None => {
                if self.occupancy().all.contains(next_move.to()) {
                    bail!("{next_move}: destination {} is occupied", next_move.to());
                }
            },
        }
        if let Some(side) = next_move.castling() {
            if !self.pieces(us).rooks.contains(side.rook_origin(us)) {
                bail!("{next_move}: there is no rook on {}", side.rook_origin(us));
            }
        }
        Ok(())
    }

    /// Finds the legal move written either in long algebraic notation
    /// (`Ng1-f3`, `e7-e8=Q`, `O-O`; the check suffix is optional) or in UCI
    /// format (`g1f3`, `e7e8q`, `e1g1`).
    ///
    /// # Errors
    ///
    /// If the text does not describe a legal move in this position.
    pub fn parse_move(&self, text: &str) -> anyhow::Result<Move> {
        let text = text.trim();
        let wanted = text.trim_end_matches('+');
        if wanted.is_empty() {
            bail!("move should not be empty");
        }
        self.generate_moves()
            .into_iter()
            .find(|candidate| {
                candidate.uci() == text || candidate.to_string().trim_end_matches('+') == wanted
            })
            .with_context(|| format!("{text} is not a legal move in {self}"))
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts are optional and will default to "0 1".
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// If the input is not a valid FEN or the position it describes can not
    /// occur in a game: see [`Position::validate`].
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        Self::from_fen_with_keys(input, ZobristKeys::shared())
    }

    /// Same as [`Position::from_fen`] but hashed with the given keys.
    ///
    /// # Errors
    ///
    /// See [`Position::from_fen`].
    pub fn from_fen_with_keys(input: &str, keys: Arc<ZobristKeys>) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let (white, black) = parse_placement(placement)?;
        let side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        let en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        let halfmove_clock = match parts.next() {
            Some(value) => parse_counter::<u16>(value, "halfmove clock")?,
            None => 0,
        };
        let fullmove_counter = match parts.next() {
            // Some generators write "0 0": the counter starts at 1.
            Some(value) => NonZeroU16::new(parse_counter::<u16>(value, "fullmove counter")?)
                .unwrap_or(NonZeroU16::MIN),
            None => NonZeroU16::MIN,
        };
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }

        let kings = [
            single_king(&white, Player::White)?,
            single_king(&black, Player::Black)?,
        ];
        let position = Self::assemble(
            Board::new(white, black),
            side_to_move,
            castling,
            en_passant_square,
            halfmove_clock,
            fullmove_counter,
            kings,
            keys,
        );
        position.validate()?;
        Ok(position)
    }

    /// Rejects positions that can not be reached in a game and would break the
    /// move generator: wrong number of pieces, pawns on the backranks, too
    /// many checks or an en passant square that does not match the last move.
    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let pawns = self.pieces(player).pawns.count();
            if pawns > u32::from(BOARD_WIDTH) {
                bail!("expected <= 8 {} pawns, got {pawns}", player.name());
            }
            let promoted = self.pieces(player).promoted_count();
            if promoted + pawns > u32::from(BOARD_WIDTH) {
                bail!(
                    "{} has {promoted} promoted pieces but only {} missing pawns",
                    player.name(),
                    u32::from(BOARD_WIDTH) - pawns
                );
            }
        }
        let pawns = self.pieces(Player::White).pawns | self.pieces(Player::Black).pawns;
        if (pawns & (Rank::One.mask() | Rank::Eight.mask())).has_any() {
            bail!("pawns can not be placed on backranks");
        }
        let checks = self.attackers(self.king(self.us()), self.they()).count();
        if checks > 2 {
            bail!("expected <= 2 checks, got {checks}");
        }
        if let Some(en_passant_square) = self.en_passant_square {
            self.validate_en_passant(en_passant_square, checks)?;
        }
        if self.attackers(self.king(self.they()), self.us()).has_any() {
            bail!("the side not to move can not be in check");
        }
        Ok(())
    }

    fn validate_en_passant(&self, en_passant_square: Square, checks: u32) -> anyhow::Result<()> {
        let expected_rank = match self.us() {
            Player::White => Rank::Six,
            Player::Black => Rank::Three,
        };
        if en_passant_square.rank() != expected_rank {
            bail!(
                "expected en passant square to be on rank {expected_rank}, got {}",
                en_passant_square.rank()
            );
        }
        // Both exist: the rank is either 3 or 6.
        let (Some(pushed_pawn), Some(origin)) = (
            en_passant_square.shift(self.they().push_direction()),
            en_passant_square.shift(self.us().push_direction()),
        ) else {
            bail!("en passant square is not beyond pushed pawn");
        };
        if !self.pieces(self.they()).pawns.contains(pushed_pawn) {
            bail!("en passant square is not beyond pushed pawn");
        }
        if (self.occupancy().all & Bitboard::from_squares(&[en_passant_square, origin])).has_any() {
            bail!("en passant square and the pushed pawn's origin should be empty");
        }
        if checks > 1 {
            bail!("more than 1 check after double pawn push is impossible");
        }
        // Before the push it was their move: our king could not be in check.
        let mut before_push = *self.pieces(self.they());
        before_push.remove(PieceKind::Pawn, pushed_pawn);
        before_push.add(PieceKind::Pawn, origin);
        let occupancy = (self.occupancy().all - pushed_pawn) | origin;
        if attacks::is_attacked(self.king(self.us()), self.they(), &before_push, occupancy) {
            bail!("the side to move was already in check before the double pawn push");
        }
        Ok(())
    }
}

fn parse_placement(placement: &str) -> anyhow::Result<(Pieces, Pieces)> {
    let mut white = Pieces::empty();
    let mut black = Pieces::empty();
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != BOARD_WIDTH as usize {
        bail!("incorrect FEN: expected 8 ranks, got {placement}");
    }
    for (rank_fen, rank) in ranks.iter().zip((0..BOARD_WIDTH).rev()) {
        let rank = Rank::try_from(rank)?;
        let mut file: u8 = 0;
        for symbol in rank_fen.chars() {
            match symbol {
                '1'..='8' => file += symbol as u8 - b'0',
                _ => {
                    let piece = Piece::try_from(symbol)?;
                    if file >= BOARD_WIDTH {
                        bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen}");
                    }
                    let square = Square::new(File::try_from(file)?, rank);
                    match piece.owner {
                        Player::White => white.add(piece.kind, square),
                        Player::Black => black.add(piece.kind, square),
                    }
                    file += 1;
                },
            }
            if file > BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen}");
            }
        }
        if file != BOARD_WIDTH {
            bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
        }
    }
    Ok((white, black))
}

fn parse_counter<T>(value: &str, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("incorrect FEN: {name} can not contain anything other than digits, got {value}");
    }
    value
        .parse::<T>()
        .with_context(|| format!("incorrect FEN: {name} can not be parsed from {value}"))
}

fn single_king(pieces: &Pieces, player: Player) -> anyhow::Result<Square> {
    match (pieces.king.count(), pieces.king.lsb()) {
        (1, Some(king)) => Ok(king),
        (count, _) => bail!("expected 1 {} king, got {count}", player.name()),
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and strips the optional "fen " or "epd " prefix before
    /// parsing it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl PartialEq for Position {
    /// Positions are equal when their FENs are, the caches and the keys are not
    /// compared.
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant_square == other.en_passant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_counter == other.fullmove_counter
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "Hash: {:#018x}", self.hash)?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}
