use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn alusolve(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_alusolve"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute alusolve")
}

fn solve(program: &str, extra: &[&str]) -> Output {
    let path = fixture(program);
    let mut args = vec!["solve", path.to_str().unwrap()];
    args.extend_from_slice(extra);
    alusolve(&args)
}

fn assert_success(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_solve_largest_model_number() {
    let stdout = assert_success(&solve("monad.txt", &[]));
    assert_eq!(stdout.trim(), "79519999994899");
}

#[test]
fn test_solve_smallest_model_number() {
    let stdout = assert_success(&solve("monad.txt", &["--smallest"]));
    assert_eq!(stdout.trim(), "15119321161111");
}

#[test]
fn test_solve_with_workers_matches_sequential() {
    let stdout = assert_success(&solve("monad.txt", &["-j", "4"]));
    assert_eq!(stdout.trim(), "79519999994899");
    let stdout = assert_success(&solve("monad.txt", &["--smallest", "-j", "3"]));
    assert_eq!(stdout.trim(), "15119321161111");
}

#[test]
fn test_solve_with_statistics() {
    let stdout = assert_success(&solve("sum_mod.txt", &["--stats"]));
    assert!(stdout.contains("Algorithm: backtracking"), "{}", stdout);
    assert!(stdout.contains("Nodes visited:"), "{}", stdout);
    assert_eq!(stdout.lines().last(), Some("96"));
}

#[test]
fn test_solve_toy_program_both_algorithms() {
    for algorithm in ["backtracking", "exhaustive"] {
        let stdout = assert_success(&solve("sum_mod.txt", &["--algorithm", algorithm]));
        assert_eq!(stdout.trim(), "96", "algorithm {}", algorithm);
        let stdout = assert_success(&solve(
            "sum_mod.txt",
            &["--algorithm", algorithm, "--smallest", "--target", "3"],
        ));
        assert_eq!(stdout.trim(), "12", "algorithm {}", algorithm);
    }
}

#[test]
fn test_solve_other_register() {
    // x holds bit 2 of the input
    let stdout = assert_success(&solve("binary.txt", &["--register", "x", "--target", "1"]));
    assert_eq!(stdout.trim(), "7");
    let stdout = assert_success(&solve("binary.txt", &["-r", "x", "--target", "1", "--smallest"]));
    assert_eq!(stdout.trim(), "4");
}

#[test]
fn test_solve_unreachable_target_exits_with_two() {
    let output = solve("sum_mod.txt", &["--target", "7"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No assignment drives z to 7"), "{}", stderr);
}

#[test]
fn test_solve_negative_target() {
    let output = solve("sum_mod.txt", &["--target", "-1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_solve_reports_parse_errors() {
    let output = solve("bad_register.txt", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "{}", stderr);
}

#[test]
fn test_solve_missing_file() {
    let output = solve("does_not_exist.txt", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "{}", stderr);
}

#[test]
fn test_check_accepts_solution() {
    let path = fixture("monad.txt");
    let output = alusolve(&["check", path.to_str().unwrap(), "79519999994899"]);
    let stdout = assert_success(&output);
    assert!(stdout.contains("z = 0: valid"), "{}", stdout);
}

#[test]
fn test_check_rejects_other_digits() {
    let path = fixture("monad.txt");
    let output = alusolve(&["check", path.to_str().unwrap(), "79519999994898"]);
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("z = 19: invalid"), "{}", stdout);
}

#[test]
fn test_check_validates_digits() {
    let path = fixture("monad.txt");
    let output = alusolve(&["check", path.to_str().unwrap(), "123"]);
    assert_eq!(output.status.code(), Some(1));
    let output = alusolve(&["check", path.to_str().unwrap(), "79519999994809"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid digit '0'"), "{}", stderr);
}

#[test]
fn test_fuzz_finds_no_mismatches() {
    let output = alusolve(&["fuzz", "--count", "25", "--seed", "7"]);
    let stdout = assert_success(&output);
    assert!(stdout.contains("0 failures"), "{}", stdout);
    assert!(stdout.contains("fuzz: 27 programs"), "{}", stdout);
}
