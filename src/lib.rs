//! Bitboard chess rules engine: legal move generation with check, pin and
//! discovered check detection, immutable positions with incremental
//! [Zobrist hashing] and [perft] tooling.
//!
//! ```
//! use raychess::chess::perft::perft;
//! use raychess::chess::position::Position;
//!
//! let position = Position::starting();
//! let e4 = position.parse_move("e2-e4").unwrap();
//! let after = position.make_move(&e4);
//! assert_eq!(after.generate_moves().len(), 20);
//! assert_eq!(perft(&after, 2), 600);
//! ```
//!
//! [Zobrist hashing]: https://www.chessprogramming.org/Zobrist_Hashing
//! [perft]: https://www.chessprogramming.org/Perft

pub mod chess;
pub mod evaluation;

use shadow_rs::shadow;

shadow!(build);

/// Build type and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version.
pub fn print_engine_info() {
    println!("raychess {}", engine_version());
}

/// Prints information the build type, features and whether the build is clean.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
