#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use raychess::chess::position;
use shakmaty::{CastlingMode, Chess, Position};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = position::Position::from_fen(input) else {
        return;
    };
    let shakmaty_setup: shakmaty::fen::Fen = input
        .parse()
        .expect("when we parsed a valid position it should be accepted by shakmaty");
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard)
    else {
        return;
    };
    assert_eq!(
        position
            .generate_moves()
            .iter()
            .map(|m| (m.uci(), m.gives_check()))
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| {
                let mut after = shakmaty_position.clone();
                after.play_unchecked(m);
                (m.to_uci(CastlingMode::Standard).to_string(), after.is_check())
            })
            .sorted()
            .collect::<Vec<_>>()
    );
});
