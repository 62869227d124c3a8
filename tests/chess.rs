use std::sync::Arc;

use raychess::chess::core::{CastleRights, Player, Square};
use raychess::chess::position::Position;
use raychess::chess::zobrist::ZobristKeys;
use pretty_assertions::assert_eq;

fn legal_position(input: &str) {
    let position = Position::from_fen(input).expect("we are parsing valid position: {input}");
    assert_eq!(position.to_string(), input);
}

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

fn play(position: &Position, moves: &[&str]) -> Position {
    moves.iter().fold(position.clone(), |position, text| {
        let next_move = position.parse_move(text).unwrap();
        position.make_move(&next_move)
    })
}

#[test]
#[allow(unused_results)]
fn basic_positions() {
    // Full FEN.
    legal_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    legal_position("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
    legal_position("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
    legal_position("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
    legal_position("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    legal_position("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    // Trimmed FEN.
    let position = setup("rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -");
    assert_eq!(
        position.to_string(),
        "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq - 0 1"
    );
}

#[test]
#[should_panic(expected = "expected 1 white king, got 0")]
fn no_white_king() {
    Position::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 black king, got 0")]
fn no_black_king() {
    Position::try_from("8/8/8/8/8/8/8/3K4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 white king, got 3")]
fn too_many_kings() {
    Position::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 white pawns, got 9")]
fn too_many_white_pawns() {
    Position::try_from("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 black pawns, got 9")]
fn too_many_black_pawns() {
    Position::try_from("rnbqkbnr/pppppppp/p7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 6, got 3")]
fn wrong_en_passant_player() {
    Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 3, got 4")]
fn wrong_en_passant_rank() {
    Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq e4 0 1").unwrap();
}

#[test]
#[should_panic(expected = "en passant square is not beyond pushed pawn")]
fn en_passant_not_beyond_pawn() {
    Position::try_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 1").unwrap();
}

#[test]
#[should_panic(expected = "white has 24 promoted pieces but only 8 missing pawns")]
fn too_many_queens() {
    let position =
        Position::try_from("knQQQQQQ/ppQ4Q/QQ5Q/Q7/Q6Q/Q4Q2/Q6Q/QQQQQQQK w - - 0 1").unwrap();
    drop(position.generate_moves());
}

#[test]
#[should_panic(expected = "black has 3 promoted pieces but only 2 missing pawns")]
fn promotions_without_missing_pawns() {
    Position::try_from("qqqqk3/pppppp2/8/8/8/8/8/4K3 w - - 0 1").unwrap();
}

#[test]
fn promoted_material_within_limits() {
    // Nine queens: every pawn promoted.
    let position = setup("1QQQQQQ1/8/8/8/8/8/QQQ5/4K2k w - - 0 1");
    assert!(!position.generate_moves().is_empty());
    // The position with the most legal moves known.
    let position = setup("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1");
    assert_eq!(position.generate_moves().len(), 218);
}

#[test]
#[should_panic(expected = "more than 1 check after double pawn push is impossible")]
fn en_passant_double_check() {
    Position::try_from("r2qkbnr/ppp3Np/8/4Q3/4P3/8/PP4PP/RNB1KB1R b KQkq e3 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 2 checks, got 3")]
fn tripple_check() {
    Position::try_from("2r3r1/P3k3/prp5/1B5p/5P2/2Q1n2p/PP4KP/3R4 w - - 0 34").unwrap();
}

#[test]
#[should_panic(expected = "the side to move was already in check before the double pawn push")]
fn check_with_unrelated_en_passant() {
    Position::try_from("rnbqk1nr/bb3p1p/1q2r3/2pPp3/3P4/7P/1PP1NpPP/R1BQKBNR w KQkq c6 0 1")
        .unwrap();
}

#[test]
#[should_panic(expected = "the side to move was already in check before the double pawn push")]
fn double_push_blocks_existing_check() {
    Position::try_from("q6k/8/8/3pP3/8/8/8/7K w - d6 0 1").unwrap();
}

#[test]
#[should_panic(expected = "the side not to move can not be in check")]
fn opponent_in_check() {
    Position::try_from("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
}

#[test]
fn fen_errors() {
    let error = |input: &str| Position::from_fen(input).unwrap_err().to_string();
    assert_eq!(
        error("8/8/8 w - - 0 1"),
        "incorrect FEN: expected 8 ranks, got 8/8/8"
    );
    assert!(error("4k3/8/8/8/8/8/8/4K2 w - - 0 1").contains("rank size should be exactly 8"));
    assert!(error("4k4/8/8/8/8/8/8/4K3 w - - 0 1").contains("rank size should be exactly 8"));
    assert!(error("4k3/8/8/8/8/8/8/44K3 w - - 0 1").contains("rank size should be exactly 8"));
    assert_eq!(
        error("4k3/8/8/8/8/8/8/4K3"),
        "incorrect FEN: missing side to move"
    );
    assert_eq!(
        error("4k3/8/8/8/8/8/8/4K3 w"),
        "incorrect FEN: missing castling rights"
    );
    assert_eq!(
        error("4k3/8/8/8/8/8/8/4K3 w -"),
        "incorrect FEN: missing en passant square"
    );
    assert_eq!(
        error("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
        "trailing symbols are not allowed in FEN"
    );
    assert!(error("4k3/8/8/8/8/8/8/4K3 w - - x 1").contains("halfmove clock"));
    assert!(error("4k3/8/8/8/8/8/8/4K3 w - - 0 -1").contains("fullmove counter"));
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w qkQK - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - j3 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4KX2 w - - 0 1").is_err());
}

#[test]
fn clean_board_str() {
    // No prefix: infer EPD.
    assert!(Position::try_from("rnbqkbnr/pp2pppp/8/3p4/3P4/3B4/PPP2PPP/RNBQK1NR b KQkq -").is_ok());
    // No prefix: infer FEN.
    assert!(
        Position::try_from("rnbqkbnr/pp2pppp/8/3p4/3P4/3B4/PPP2PPP/RNBQK1NR b KQkq - 0 1").is_ok()
    );
    // Don't crash on unicode symbols.
    assert!(Position::try_from("8/8/8/8/8/8/8/8 b 88 🔠 🔠 ").is_err());
}

#[test]
fn accessors() {
    let position = setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    assert_eq!(position.side_to_move(), Player::White);
    assert_eq!(position.castling(), CastleRights::BLACK_LONG);
    assert_eq!(position.en_passant_square(), None);
    assert_eq!(position.halfmove_clock(), 0);
    assert_eq!(position.fullmove_counter(), 24);
    assert_eq!(position.king(Player::White), Square::C1);
    assert_eq!(position.king(Player::Black), Square::E8);
    assert!(!position.is_in_check());
}

#[test]
fn promotion_moves() {
    let position = setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1");
    let promotion = position.parse_move("b7c8q").unwrap();
    assert_eq!(promotion.to_string(), "b7xc8=Q+");
    assert_eq!(
        position.make_move(&promotion).to_string(),
        "2Q4k/2P5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 b - - 0 1"
    );
    let underpromotion = position.parse_move("b7-b8=N").unwrap();
    assert_eq!(
        position.make_move(&underpromotion).to_string(),
        "1Nn4k/2P5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 b - - 0 1"
    );
}

#[test]
fn en_passant_capture() {
    let position = setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1");
    let capture = position.parse_move("d5xe6").unwrap();
    assert!(capture.is_en_passant());
    assert_eq!(capture.capture_square(), Square::E5);
    assert_eq!(
        position.make_move(&capture).to_string(),
        "2n4k/1PP5/4P1K1/6Q1/3N4/3P4/P3R3/8 b - - 0 1"
    );
}

#[test]
fn castling_reset() {
    let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let after = play(&position, &["a1a8"]);
    assert_eq!(after.to_string(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    assert!(after.is_in_check());
    let after = play(&position, &["Ke1-d1", "Rh8xh1+"]);
    assert_eq!(after.to_string(), "r3k3/8/8/8/8/8/8/R2K3r w q - 0 2");
}

#[test]
fn clocks() {
    let after = play(&Position::starting(), &["Ng1-f3", "Ng8-f6", "Nf3-g1", "Nf6-g8"]);
    assert_eq!(
        after.to_string(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 3"
    );
    assert_eq!(after, play(&after, &[]));
    assert_ne!(after, Position::starting());
    assert_eq!(after.zobrist_hash(), Position::starting().zobrist_hash());
    let after = play(&after, &["e2e4"]);
    assert_eq!(after.halfmove_clock(), 0);
    assert_eq!(after.en_passant_square(), Some(Square::E3));
}

#[test]
fn fen_clocks() {
    let position = setup("4k3/8/8/8/8/8/8/4K3 w - - 300 70");
    assert_eq!(position.halfmove_clock(), 300);
    assert_eq!(position.fullmove_counter(), 70);
    // Some generators start the full-move counter at 0.
    let position = setup("4k3/8/8/8/8/8/8/4K3 w - - 0 0");
    assert_eq!(position.fullmove_counter(), 1);
    assert_eq!(position.to_string(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 w - - 70000 1").is_err());
}

#[test]
fn copy_on_write() {
    let position = Position::starting();
    let quiet = play(&position, &["Ng1-f3"]);
    assert!(quiet.shares_pieces_with(&position, Player::Black));
    assert!(!quiet.shares_pieces_with(&position, Player::White));

    let position = setup("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
    let capture = play(&position, &["e4xd5"]);
    assert!(!capture.shares_pieces_with(&position, Player::Black));
    assert!(!capture.shares_pieces_with(&position, Player::White));
    // The parent is not affected.
    assert_eq!(position.to_string(), "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
}

#[test]
fn play_checks_consistency() {
    let position = Position::starting();
    let e4 = position.parse_move("e2e4").unwrap();
    let d5 = play(&position, &["e2e4"]).parse_move("d7d5").unwrap();
    let exd5 = play(&position, &["e2e4", "d7d5"]).parse_move("e4xd5").unwrap();

    assert!(position.play(&e4).is_ok());
    // Wrong side.
    let error = position.play(&d5).unwrap_err().to_string();
    assert!(error.contains("black move but it is white to move"), "{error}");
    // No victim.
    let error = play(&position, &["e2e4", "e7e5"])
        .play(&exd5)
        .unwrap_err()
        .to_string();
    assert!(error.contains("no Pawn to capture on d5"), "{error}");
    // No piece to move.
    let error = play(&position, &["e2e3", "e7e5"])
        .play(&e4)
        .unwrap_err()
        .to_string();
    assert!(error.contains("there is no white Pawn on e2"), "{error}");
    // Occupied destination.
    let error = play(&position, &["Nb1-c3", "e7e5", "Nc3-e4", "d7d6"])
        .play(&e4)
        .unwrap_err()
        .to_string();
    assert!(error.contains("destination e4 is occupied"), "{error}");
}

#[test]
fn unmake_move() {
    let position = setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    for next_move in position.generate_moves() {
        let undo = position.undo_info();
        let after = position.make_move(&next_move);
        let restored = after.unmake_move(&next_move, &undo);
        assert_eq!(restored.to_string(), position.to_string());
        assert_eq!(restored.zobrist_hash(), position.zobrist_hash());
    }
    // En passant and the fullmove counter.
    let position = setup("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 3 17");
    let capture = position.parse_move("e4d3").unwrap();
    let after = position.make_move(&capture);
    assert_eq!(after.to_string(), "4k3/8/8/8/8/3p4/8/4K3 w - - 0 18");
    let restored = after.unmake_move(&capture, &position.undo_info());
    assert_eq!(restored, position);
}

#[test]
fn custom_keys() {
    let keys = Arc::new(ZobristKeys::new(2024));
    let position = Position::starting_with_keys(Arc::clone(&keys));
    let after = play(&position, &["d2d4", "Ng8-f6"]);
    assert!(Arc::ptr_eq(after.zobrist_keys(), &keys));
    assert_eq!(after.zobrist_hash(), keys.hash(&after));
    let reparsed = Position::from_fen_with_keys(&after.to_string(), keys).unwrap();
    assert_eq!(reparsed.zobrist_hash(), after.zobrist_hash());
    assert_ne!(
        Position::from_fen(&after.to_string()).unwrap().zobrist_hash(),
        after.zobrist_hash()
    );
}
