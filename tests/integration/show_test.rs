use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn show(program: &str, extra: &[&str]) -> Output {
    let path = fixture(program);
    Command::new(env!("CARGO_BIN_EXE_alusolve"))
        .arg("show")
        .arg(&path)
        .args(extra)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute alusolve")
}

fn stdout_of(output: &Output) -> String {
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
fn test_show_all_registers() {
    let stdout = stdout_of(&show("sum_mod.txt", &[]));
    assert!(stdout.contains("w: i0"), "{}", stdout);
    assert!(stdout.contains("x: i1"), "{}", stdout);
    assert!(stdout.contains("y: 0"), "{}", stdout);
    assert!(stdout.contains("z: ((i0 + i1) % 5)"), "{}", stdout);
    assert!(stdout.contains("range: 0..4, inputs: 2"), "{}", stdout);
}

#[test]
fn test_show_single_register() {
    let stdout = stdout_of(&show("sum_mod.txt", &["--register", "z"]));
    assert!(stdout.starts_with("z: "), "{}", stdout);
    assert!(!stdout.contains("w: "), "{}", stdout);
}

#[test]
fn test_show_monad_program() {
    let stdout = stdout_of(&show("monad.txt", &["-r", "z"]));
    assert!(stdout.contains("inputs: 14"), "{}", stdout);
}

#[test]
fn test_show_pretty() {
    let stdout = stdout_of(&show("sum_mod.txt", &["-r", "z", "--pretty"]));
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("z:"));
    assert!(stdout.contains("i0"), "{}", stdout);
    assert!(stdout.contains("range: 0..4"), "{}", stdout);
}

#[test]
fn test_show_binary_decomposition_ranges() {
    let stdout = stdout_of(&show("binary.txt", &[]));
    for reg in ["w", "x", "y", "z"] {
        assert!(stdout.contains(&format!("{}: ", reg)), "{}", stdout);
    }
    // every register ends up as a single bit
    assert_eq!(stdout.matches("range: 0..1").count(), 4, "{}", stdout);
}

#[test]
fn test_show_reports_parse_error() {
    let output = show("bad_register.txt", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "{}", stderr);
    assert!(stderr.contains("add q 3"), "{}", stderr);
}

#[test]
fn test_no_subcommand_prints_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_alusolve"))
        .output()
        .expect("Failed to execute alusolve");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "{}", stderr);
}
