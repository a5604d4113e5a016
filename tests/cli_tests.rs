//! End-to-end tests that invoke the compiled `treekeep` binary against
//! temporary directory trees.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn treekeep_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_treekeep"))
}

fn run(args: &[&str]) -> Output {
    Command::new(treekeep_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to execute treekeep binary")
}

fn run_on(root: &Path, extra: &[&str]) -> Output {
    let root = root.to_str().expect("temp paths are UTF-8");
    let mut args = vec![root];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn marker_lines(root: &Path, dirs: &[&str], marker: &str) -> Vec<String> {
    dirs.iter()
        .map(|dir| {
            let dir = if dir.is_empty() {
                root.to_path_buf()
            } else {
                root.join(dir)
            };
            dir.join(marker).display().to_string()
        })
        .collect()
}

#[test]
fn empty_root_prints_its_own_marker() {
    let temp_dir = TempDir::new().unwrap();

    let out = run_on(temp_dir.path(), &[]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout_lines(&out),
        marker_lines(temp_dir.path(), &[""], ".gitkeep")
    );
    assert!(temp_dir.path().join(".gitkeep").is_file());
}

#[test]
fn nested_directories_are_printed_sorted() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("c")).unwrap();
    fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();

    let out = run_on(temp_dir.path(), &[]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout_lines(&out),
        marker_lines(temp_dir.path(), &["", "a", "a/b", "c"], ".gitkeep")
    );
}

#[test]
fn second_run_prints_identical_output() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("x/y")).unwrap();

    let first = run_on(temp_dir.path(), &[]);
    let second = run_on(temp_dir.path(), &[]);

    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_root_exits_one_with_message() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("never-created");

    let out = run_on(&missing, &[]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("never-created"),
        "stderr should name the root, got:\n{stderr}"
    );
    assert!(!missing.exists());
}

#[test]
fn file_root_exits_one_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();

    let out = run_on(&file, &[]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not a directory"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "hello");
}

#[test]
fn marker_and_exclude_flags_apply() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join(".git/refs")).unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();

    let out = run_on(temp_dir.path(), &["--marker", ".keep", "-x", ".git"]);

    assert!(out.status.success());
    assert_eq!(
        stdout_lines(&out),
        marker_lines(temp_dir.path(), &["", "src"], ".keep")
    );
    assert!(!temp_dir.path().join(".git/.keep").exists());
}

#[test]
fn layout_file_creates_skeleton() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    let layout = temp_dir.path().join("layout.yaml");
    fs::write(&layout, "skeleton:\n  - data\n  - notebooks\n").unwrap();

    let out = run_on(&root, &["--config", layout.to_str().unwrap()]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout_lines(&out),
        marker_lines(&root, &["", "data", "notebooks"], ".gitkeep")
    );
}

#[test]
fn invalid_marker_exits_one_without_writes() {
    let temp_dir = TempDir::new().unwrap();

    let out = run_on(temp_dir.path(), &["--marker", "../escape"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_root_argument_is_a_usage_error() {
    let out = run(&[]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn logs_go_to_stderr_only() {
    let temp_dir = TempDir::new().unwrap();

    let out = run_on(temp_dir.path(), &["--log-level", "debug"]);

    assert!(out.status.success());
    assert_eq!(stdout_lines(&out).len(), 1);
    assert!(!out.stderr.is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_root_gets_its_own_marker() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target");
    fs::create_dir_all(target.join("a")).unwrap();
    let link = temp_dir.path().join("link");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let out = run_on(&link, &[]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout_lines(&out),
        marker_lines(&link, &["", "a"], ".gitkeep")
    );
    assert!(target.join(".gitkeep").is_file());
}

#[test]
fn marker_write_failure_exits_one_without_output() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("a")).unwrap();
    let too_long = "k".repeat(300);

    let out = run_on(temp_dir.path(), &["--marker", too_long.as_str()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Failed to create placeholder") && stderr.contains(&too_long),
        "stderr should name the failing marker, got:\n{stderr}"
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_directory_names_are_printed_verbatim() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let name = OsStr::from_bytes(b"bad\xff");
    fs::create_dir(temp_dir.path().join(name)).unwrap();

    let out = run_on(temp_dir.path(), &[]);

    assert!(out.status.success());
    let mut expected = temp_dir.path().join(".gitkeep").as_os_str().as_bytes().to_vec();
    expected.push(b'\n');
    expected.extend_from_slice(temp_dir.path().join(name).join(".gitkeep").as_os_str().as_bytes());
    expected.push(b'\n');
    assert_eq!(out.stdout, expected);
}
