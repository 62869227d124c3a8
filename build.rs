//! Pre-calculates the attack and ray tables used by move generation and writes
//! them to the output directory, where `src/chess/generated.rs` includes them.
//! Also records the target features and the version information from Git and
//! the build environment, both are accessed at runtime by the CLI.

use std::fmt::Write;
use std::path::Path;
use std::{env, fs};

const BOARD_WIDTH: i32 = 8;
const BOARD_SIZE: i32 = BOARD_WIDTH * BOARD_WIDTH;

// Compass order has to match `Direction` in src/chess/core.rs.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const WHITE_PAWN_CAPTURES: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_CAPTURES: [(i32, i32); 2] = [(-1, -1), (1, -1)];

fn from_index(index: i32) -> (i32, i32) {
    (index % BOARD_WIDTH, index / BOARD_WIDTH)
}

fn to_square(column: i32, row: i32) -> u64 {
    1 << (row * BOARD_WIDTH + column)
}

fn is_within_board(column: i32, row: i32) -> bool {
    (0..BOARD_WIDTH).contains(&column) && (0..BOARD_WIDTH).contains(&row)
}

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").expect("cargo always sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).expect("OUT_DIR should be writable");
}

fn serialize_bitboard_array(array: &[u64]) -> String {
    let mut result = String::new();
    result.push('[');
    for element in array {
        writeln!(result, "Bitboard::from_bits({element:#018x}),")
            .expect("writing to String never fails");
    }
    result.push(']');
    result
}

/// Squares reachable by a single step from each square.
fn generate_leaper_table(steps: &[(i32, i32)]) -> Vec<u64> {
    (0..BOARD_SIZE)
        .map(|index| {
            let (column, row) = from_index(index);
            steps
                .iter()
                .map(|(dx, dy)| (column + dx, row + dy))
                .filter(|&(column, row)| is_within_board(column, row))
                .fold(0, |acc, (column, row)| acc | to_square(column, row))
        })
        .collect()
}

/// All squares from the source (exclusive) to the board edge in given
/// direction.
fn generate_ray(index: i32, (dx, dy): (i32, i32)) -> u64 {
    let (mut column, mut row) = from_index(index);
    let mut ray = 0;
    loop {
        column += dx;
        row += dy;
        if !is_within_board(column, row) {
            return ray;
        }
        ray |= to_square(column, row);
    }
}

fn generate_rays() -> String {
    let mut result = String::new();
    result.push('[');
    for direction in DIRECTIONS {
        let rays: Vec<u64> = (0..BOARD_SIZE)
            .map(|index| generate_ray(index, direction))
            .collect();
        result.push_str(&serialize_bitboard_array(&rays));
        result.push_str(",\n");
    }
    result.push(']');
    result
}

fn generate_tables() {
    let king_steps: Vec<(i32, i32)> = DIRECTIONS.to_vec();
    generate_file(
        "knight_attacks",
        &serialize_bitboard_array(&generate_leaper_table(&KNIGHT_JUMPS)),
    );
    generate_file(
        "king_attacks",
        &serialize_bitboard_array(&generate_leaper_table(&king_steps)),
    );
    generate_file(
        "white_pawn_attacks",
        &serialize_bitboard_array(&generate_leaper_table(&WHITE_PAWN_CAPTURES)),
    );
    generate_file(
        "black_pawn_attacks",
        &serialize_bitboard_array(&generate_leaper_table(&BLACK_PAWN_CAPTURES)),
    );
    generate_file("rays", &generate_rays());
}

fn generate_build_info() {
    let features = format!(
        "{}bmi2 {}popcnt",
        if cfg!(target_feature = "bmi2") { "+" } else { "-" },
        if cfg!(target_feature = "popcnt") { "+" } else { "-" },
    );
    generate_file("features", &features);
}

fn main() -> shadow_rs::SdResult<()> {
    println!("cargo:rerun-if-changed=build.rs");
    generate_tables();
    generate_build_info();
    shadow_rs::new()
}
