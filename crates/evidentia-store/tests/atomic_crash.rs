//! Covers §8 scenario S6: a crash between the temp-file write and the
//! rename must never leave `path` holding a truncated or partial record —
//! readers see either the prior complete value or the new one.

use evidentia_store::{read_json_opt, write_json_atomic};
use std::io::Write;
use tempfile::TempDir;

#[test]
fn a_write_that_never_reaches_rename_leaves_the_prior_value_intact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("record.json");

    write_json_atomic(&path, &"first complete value".to_string()).unwrap();

    // Simulate a crash after the temp file is written but before the
    // rename that would make it visible at `path`: build the same kind of
    // temp file `write_atomic` would, write incomplete bytes, and drop it
    // without persisting.
    let mut crashed_tmp = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    crashed_tmp.write_all(b"{\"truncated").unwrap();
    drop(crashed_tmp);

    let read: Option<String> = read_json_opt(&path).unwrap();
    assert_eq!(read, Some("first complete value".to_string()));
}

#[test]
fn a_completed_write_is_never_observed_partially() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("record.json");

    write_json_atomic(&path, &vec![1u32, 2, 3, 4, 5]).unwrap();
    write_json_atomic(&path, &vec![6u32, 7, 8]).unwrap();

    let read: Option<Vec<u32>> = read_json_opt(&path).unwrap();
    assert_eq!(read, Some(vec![6, 7, 8]));
}
