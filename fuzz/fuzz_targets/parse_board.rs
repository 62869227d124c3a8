#![no_main]
use libfuzzer_sys::fuzz_target;
use raychess::chess::position::Position;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = Position::try_from(s) {
            // Whatever was accepted prints back to a FEN describing the same position.
            let fen = position.to_string();
            let reparsed = Position::from_fen(&fen).expect("printed FEN is valid");
            assert_eq!(reparsed, position);
            assert_eq!(reparsed.zobrist_hash(), position.zobrist_hash());
        }
    }
});
