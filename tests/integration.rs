use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "raychess";

#[test]
fn perft_from_starting_position() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["perft", "3", "--threads", "2"])
            .assert()
            .success()
            .stdout("8902\n"),
    );
}

#[test]
fn perft_with_seed_and_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args([
            "--seed",
            "17",
            "perft",
            "2",
            "--fen",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ])
        .assert()
        .success()
        .stdout("191\n"),
    );
}

#[test]
fn divide() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["divide", "2"])
            .assert()
            .success()
            .stdout(contains("e2e4: 20").and(contains("total: 400"))),
    );
}

#[test]
fn list_moves() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["moves", "--fen", "4k3/8/1Q6/8/8/8/8/7K w - - 0 1"])
            .assert()
            .success()
            .stdout(
                contains("Qb6-b8+")
                    .and(contains("Kh1-g2"))
                    .and(contains("no check")),
            ),
    );
}

#[test]
fn checkmate_status() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args([
            "moves",
            "--fen",
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        ])
        .assert()
        .success()
        .stdout(contains("0 moves, checkmate")),
    );
}

#[test]
fn invalid_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["moves", "--fen", "8/8/8 w - - 0 1"])
            .assert()
            .failure()
            .stderr(contains("incorrect FEN")),
    );
}

#[test]
fn info() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.arg("info")
            .assert()
            .success()
            .stdout(contains("raychess").and(contains("Features"))),
    );
}
