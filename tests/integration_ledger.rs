use std::fs;

use assert_matches::assert_matches;
use tempfile::tempdir;

use quien::ledger::{self, FileLedgerStore, LedgerError, ScoreEntry};

#[test]
fn four_players_leave_the_top_three_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Scores").join("scores.txt");
    let store = FileLedgerStore::with_path(&path);

    ledger::record(&store, "Ana", 1500).unwrap();
    ledger::record(&store, "Beto", 1800).unwrap();
    ledger::record(&store, "Caro", 900).unwrap();
    let entries = ledger::record(&store, "Deon", 2000).unwrap();

    let expected = vec![
        ScoreEntry::new("Deon", 2000),
        ScoreEntry::new("Beto", 1800),
        ScoreEntry::new("Ana", 1500),
    ];
    assert_eq!(entries, expected);

    let on_disk = fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk.lines().count(), 3);
    assert!(on_disk.starts_with("1. Deon       ----------->2000"));

    // a fresh store over the same file sees the same board
    let reopened = FileLedgerStore::with_path(&path);
    assert_eq!(ledger::load(&reopened).unwrap(), expected);
}

#[test]
fn hand_edited_file_with_junk_still_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(
        &path,
        "1. Ana       ----------->12x\n2. Beto       ----------->1800\nnot a score line\n",
    )
    .unwrap();

    let store = FileLedgerStore::with_path(&path);
    assert_eq!(
        ledger::load(&store).unwrap(),
        vec![ScoreEntry::new("Beto", 1800)]
    );

    let entries = ledger::record(&store, "Caro", 1900).unwrap();
    assert_eq!(
        entries,
        vec![ScoreEntry::new("Caro", 1900), ScoreEntry::new("Beto", 1800)]
    );
}

#[test]
fn unwritable_location_surfaces_io_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("Scores");
    fs::write(&blocker, "a file where the directory should be").unwrap();

    let store = FileLedgerStore::with_path(blocker.join("scores.txt"));
    assert_matches!(ledger::save(&store, &[ScoreEntry::new("Ana", 1)]), Err(LedgerError::Io(_)));
}
