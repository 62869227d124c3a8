//! Implementation of chess rules: board representation, legal move generation
//! and position hashing.

pub mod attacks;
pub mod bitboard;
pub mod core;
mod generated;
mod movegen;
pub mod perft;
pub mod position;
pub mod zobrist;
