//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are generate move, make move and unmake
//! move): the number of leaf nodes of the legal move tree at given depth is
//! compared against known values.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use std::time::Instant;

use rayon::prelude::*;

use crate::chess::core::Move;
use crate::chess::position::Position;

/// Counts the leaf nodes of the legal move tree of given depth.
///
/// ```
/// use raychess::chess::perft::perft;
/// use raychess::chess::position::Position;
///
/// assert_eq!(perft(&Position::starting(), 2), 400);
/// ```
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    // Bulk counting: the leaves are not visited.
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| perft(&position.make_move(next_move), depth - 1))
        .sum()
}

/// Perft split by the root moves: useful for narrowing down a discrepancy with
/// a reference move generator.
#[must_use]
pub fn divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    position
        .generate_moves()
        .iter()
        .map(|next_move| {
            let nodes = perft(&position.make_move(next_move), depth - 1);
            tracing::debug!(%next_move, nodes, "divide");
            (*next_move, nodes)
        })
        .collect()
}

/// Same as [`perft`] but the subtrees of the root moves are counted on the
/// given thread pool.
#[must_use]
pub fn perft_parallel(position: &Position, depth: u8, pool: &rayon::ThreadPool) -> u64 {
    if depth <= 1 {
        return perft(position, depth);
    }
    let start = Instant::now();
    let moves = position.generate_moves();
    let nodes = pool.install(|| {
        moves
            .as_slice()
            .par_iter()
            .map(|next_move| perft(&position.make_move(next_move), depth - 1))
            .sum()
    });
    tracing::info!(
        depth,
        nodes,
        threads = pool.current_num_threads(),
        elapsed = ?start.elapsed(),
        "perft finished"
    );
    nodes
}
