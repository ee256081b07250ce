mod common;

use common::FOUR_PERSON_CSV;
use groupforge::error::GroupForgeError;
use groupforge::loader::{load_matrix_csv, load_pairs_csv, load_roster};
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

// --- MATRIX FILES ---

#[test]
fn test_loads_matrix_file() {
    let file = temp_file(FOUR_PERSON_CSV);
    let m = load_matrix_csv(file.path()).unwrap();
    assert_eq!(m.roster().names().collect::<Vec<_>>(), ["Ann", "Bob", "Cid", "Dee"]);
    assert_eq!(m.pair_count(), 6);
    assert_eq!(m.get_by_name("Ann", "Bob").unwrap(), 5.0);
}

#[test]
fn test_matrix_with_padding_is_trimmed() {
    let file = temp_file(" , A , B \n A , , 2.5 \n B , , \n");
    let m = load_matrix_csv(file.path()).unwrap();
    assert_eq!(m.get_by_name("B", "A").unwrap(), 2.5);
}

#[test]
fn test_duplicate_header_names_fail() {
    let file = temp_file(",A,A\nA,,1\nA,,\n");
    assert!(load_matrix_csv(file.path()).unwrap_err().is_data());
}

#[test]
fn test_missing_rows_fail() {
    let file = temp_file(",A,B,C\nA,,1,2\nB,,,3\n");
    assert!(load_matrix_csv(file.path()).unwrap_err().is_data());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_matrix_csv("definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, GroupForgeError::Io(_)));
}

// --- ROSTER + PAIRS FILES ---

#[test]
fn test_loads_roster_and_pairs() {
    let roster_file = temp_file("name,notes\nAnn,x\nBob,\nCid,y\n");
    let pairs_file = temp_file("a,b,score\nAnn,Bob,3\nBob,Cid,1\nAnn,Cid,-2\n");

    let roster = load_roster(roster_file.path()).unwrap();
    let m = load_pairs_csv(pairs_file.path(), &roster).unwrap();
    assert_eq!(m.get_by_name("Cid", "Ann").unwrap(), -2.0);
}

#[test]
fn test_incomplete_pairs_fail() {
    let roster_file = temp_file("name\nAnn\nBob\nCid\n");
    let pairs_file = temp_file("a,b,score\nAnn,Bob,3\nBob,Cid,1\n");

    let roster = load_roster(roster_file.path()).unwrap();
    let err = load_pairs_csv(pairs_file.path(), &roster).unwrap_err();
    assert!(err.is_data());
    assert!(err.to_string().contains("Missing"));
}

#[test]
fn test_conflicting_pairs_fail() {
    let roster_file = temp_file("name\nAnn\nBob\n");
    let pairs_file = temp_file("a,b,score\nAnn,Bob,3\nBob,Ann,4\n");

    let roster = load_roster(roster_file.path()).unwrap();
    assert!(load_pairs_csv(pairs_file.path(), &roster)
        .unwrap_err()
        .is_data());
}

#[test]
fn test_short_pair_row_fails() {
    let roster_file = temp_file("name\nAnn\nBob\n");
    let pairs_file = temp_file("a,b,score\nAnn,Bob\n");

    let roster = load_roster(roster_file.path()).unwrap();
    assert!(load_pairs_csv(pairs_file.path(), &roster)
        .unwrap_err()
        .is_data());
}
