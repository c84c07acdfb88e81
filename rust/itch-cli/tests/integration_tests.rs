use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use itch::{ClassTable, HeaderColumns, OrdersTable, TradesTable, WriteParams, NULL_I32, NULL_I64};
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("itch").unwrap()
}

/// Writes a small ITCH file: two add orders (locates 1 and 5) around one
/// broken trade.
fn write_fixture(path: &Path) {
    let orders: ClassTable = OrdersTable {
        hd: HeaderColumns {
            msg_type: vec!['A', 'A'],
            stock_locate: vec![1, 5],
            tracking_number: vec![0, 0],
            timestamp: vec![10, 30],
        },
        order_ref: vec![4, 5],
        buy: vec![true, false],
        shares: vec![100, 250],
        stock: vec!["UFO".to_owned(), "PLTR".to_owned()],
        price: vec![12.96, 25.50],
        mpid: vec![None, None],
    }
    .into();
    let trades: ClassTable = TradesTable {
        hd: HeaderColumns {
            msg_type: vec!['B'],
            stock_locate: vec![1],
            tracking_number: vec![0],
            timestamp: vec![20],
        },
        order_ref: vec![NULL_I64],
        buy: vec![None],
        shares: vec![NULL_I32],
        stock: vec![None],
        price: vec![f64::NAN],
        match_number: vec![77],
        cross_type: vec![None],
    }
    .into();
    itch::write(&[orders, trades], path, &WriteParams::default()).unwrap();
}

#[fixture]
fn fixture_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.itch");
    write_fixture(&path);
    (dir, path)
}

#[rstest]
fn count_prints_per_type_counts(fixture_file: (TempDir, PathBuf)) {
    let (_dir, path) = fixture_file;
    cmd()
        .args(["count", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("msg_type").and(contains("total")));
}

#[rstest]
fn count_total_is_the_sum(fixture_file: (TempDir, PathBuf)) {
    let (_dir, path) = fixture_file;
    let output = cmd()
        .args(["count", path.to_str().unwrap()])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let total_line = stdout.lines().find(|l| l.starts_with("total")).unwrap();
    assert!(total_line.ends_with('3'));
}

#[test]
fn count_missing_file_fails() {
    cmd()
        .args(["count", "./does/not/exist.itch"])
        .assert()
        .failure()
        .stderr(contains("opening file to decode"));
}

#[rstest]
fn filter_by_stock_locate(fixture_file: (TempDir, PathBuf)) {
    let (dir, path) = fixture_file;
    let out = dir.path().join("filtered.itch");
    cmd()
        .args([
            "filter",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--stock-locate",
            "5",
        ])
        .assert()
        .success()
        .stdout(contains("[Messages]   scanned 3, filtered 1"));
    // one framed add order survived
    assert_eq!(fs::read(&out).unwrap().len(), 38);
    let counts = itch::count(&out, itch::MIN_BUFFER_SIZE, None).unwrap();
    assert_eq!(counts.get(b'A'), 1);
    assert_eq!(counts.total(), 1);
}

#[rstest]
fn filter_refuses_existing_output_without_force(fixture_file: (TempDir, PathBuf)) {
    let (dir, path) = fixture_file;
    let out = dir.path().join("filtered.itch");
    fs::write(&out, b"occupied").unwrap();
    cmd()
        .args([
            "filter",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--msg-type",
            "A",
        ])
        .assert()
        .failure()
        .stderr(contains("--force"));
    // unchanged
    assert_eq!(fs::read(&out).unwrap(), b"occupied");
}

#[rstest]
fn filter_without_predicates_fails(fixture_file: (TempDir, PathBuf)) {
    let (dir, path) = fixture_file;
    let out = dir.path().join("filtered.itch");
    cmd()
        .args([
            "filter",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("bad argument"));
}

#[rstest]
fn filter_requires_paired_timestamp_bounds(fixture_file: (TempDir, PathBuf)) {
    let (dir, path) = fixture_file;
    let out = dir.path().join("filtered.itch");
    cmd()
        .args([
            "filter",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--min-timestamp",
            "5",
        ])
        .assert()
        .failure()
        .stderr(contains("pairs"));
}

#[rstest]
fn gzip_then_gunzip_restores_the_file(fixture_file: (TempDir, PathBuf)) {
    let (dir, path) = fixture_file;
    let original = fs::read(&path).unwrap();

    cmd()
        .args(["gzip", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("[Compressed]"));
    let packed = dir.path().join("fixture.itch.gz");
    assert!(packed.exists());

    // counting reads straight through the gzip backend
    let counts = itch::count(&packed, itch::MIN_BUFFER_SIZE, None).unwrap();
    assert_eq!(counts.total(), 3);

    fs::remove_file(&path).unwrap();
    cmd()
        .args(["gunzip", packed.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("[Inflated]"));
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[rstest]
fn debug_session_dumps_hex(fixture_file: (TempDir, PathBuf)) {
    let (_dir, path) = fixture_file;
    cmd()
        .args(["debug", path.to_str().unwrap()])
        .write_stdin("\nx\n")
        .assert()
        .success()
        .stdout(
            contains("Number of messages:")
                .and(contains("'A' (len 2 + 36)"))
                .and(contains("Stopping printing messages")),
        );
}
