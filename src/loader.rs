use crate::error::{GfResult, GroupForgeError};
use crate::relationships::{RelationshipMatrix, Score};
use crate::roster::Roster;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

fn parse_score(raw: &str, row: usize, col: usize) -> GfResult<Score> {
    raw.parse::<Score>().map_err(|_| {
        GroupForgeError::Data(format!(
            "Row {}, column {}: '{}' is not a number",
            row, col, raw
        ))
    })
}

/// Square matrix CSV: the header row lists the roster (first cell ignored),
/// each following row starts with the same name in the same order. Cells
/// below the diagonal may be left blank; the diagonal is ignored.
pub fn load_matrix_csv<P: AsRef<Path>>(path: P) -> GfResult<RelationshipMatrix> {
    let path = path.as_ref();
    debug!("Loading relationship matrix from: {}", path.display());
    read_matrix(File::open(path)?)
}

pub fn read_matrix<R: Read>(reader: R) -> GfResult<RelationshipMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = rdr.records();
    let header = match records.next() {
        Some(rec) => rec?,
        None => return Err(GroupForgeError::Data("Matrix file is empty".to_string())),
    };

    let roster = Roster::new(header.iter().skip(1))?;
    let n = roster.len();
    let mut builder = RelationshipMatrix::builder(&roster);
    let mut rows = 0;

    for (i, result) in records.enumerate() {
        let rec = result?;
        let line = i + 2;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        if rows >= n {
            return Err(GroupForgeError::Data(format!(
                "Row {}: matrix has more rows than the {} names in its header",
                line, n
            )));
        }

        let row_name = rec.get(0).unwrap_or("");
        let expected = roster.get(rows).map(|m| m.name.as_str()).unwrap_or("");
        if row_name != expected {
            return Err(GroupForgeError::Data(format!(
                "Row {}: expected '{}' but found '{}'",
                line, expected, row_name
            )));
        }
        if rec.len() > n + 1 {
            return Err(GroupForgeError::Data(format!(
                "Row {}: {} cells for {} columns",
                line,
                rec.len() - 1,
                n
            )));
        }

        for (col, cell) in rec.iter().enumerate().skip(1) {
            let j = col - 1;
            if cell.is_empty() || j == rows {
                continue;
            }
            let score = parse_score(cell, line, col + 1)?;
            builder.set(rows, j, score)?;
        }
        rows += 1;
    }

    if rows != n {
        return Err(GroupForgeError::Data(format!(
            "Matrix has {} rows but {} names in its header",
            rows, n
        )));
    }

    let matrix = builder.build()?;
    info!(
        "Loaded matrix: {} individuals, {} pairs",
        matrix.len(),
        matrix.pair_count()
    );
    Ok(matrix)
}

/// One name per row in the first column, under a header row.
pub fn load_roster<P: AsRef<Path>>(path: P) -> GfResult<Roster> {
    let path = path.as_ref();
    debug!("Loading roster from: {}", path.display());
    read_roster(File::open(path)?)
}

pub fn read_roster<R: Read>(reader: R) -> GfResult<Roster> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        if let Some(name) = rec.get(0).filter(|s| !s.is_empty()) {
            names.push(name.to_string());
        }
    }
    Roster::new(names)
}

/// Rows of `name_a,name_b,score` under a header row. Every pair of the
/// roster must appear; order within a pair does not matter.
pub fn load_pairs_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> GfResult<RelationshipMatrix> {
    let path = path.as_ref();
    debug!("Loading pair scores from: {}", path.display());
    read_pairs(File::open(path)?, roster)
}

pub fn read_pairs<R: Read>(reader: R, roster: &Roster) -> GfResult<RelationshipMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut builder = RelationshipMatrix::builder(roster);
    let mut rows = 0;

    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 2;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        if rec.len() < 3 {
            return Err(GroupForgeError::Data(format!(
                "Row {}: expected name_a,name_b,score",
                line
            )));
        }
        let score = parse_score(&rec[2], line, 3)?;
        builder.set_by_name(&rec[0], &rec[1], score)?;
        rows += 1;
    }

    let matrix = builder.build()?;
    info!(
        "Loaded {} pair rows for {} individuals",
        rows,
        matrix.len()
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const UPPER: &str = "\
,Ann,Bob,Cid,Dee
Ann,,5,1,1
Bob,,,1,1
Cid,,,,5
Dee,,,,
";

    #[test]
    fn reads_upper_triangular_matrix() {
        let m = read_matrix(Cursor::new(UPPER)).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.get_by_name("Dee", "Cid").unwrap(), 5.0);
        assert_eq!(m.get_by_name("Bob", "Ann").unwrap(), 5.0);
    }

    #[test]
    fn full_symmetric_matrix_is_accepted() {
        let csv = ",A,B,C\nA,0,1,2\nB,1,0,3\nC,2,3,0\n";
        let m = read_matrix(Cursor::new(csv)).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 3.0);
    }

    #[test]
    fn asymmetric_cells_are_rejected() {
        let csv = ",A,B\nA,,1\nB,2,\n";
        assert!(read_matrix(Cursor::new(csv)).unwrap_err().is_data());
    }

    #[test]
    fn blank_pair_is_missing() {
        let csv = ",A,B,C\nA,,1,\nB,,,3\nC,,,\n";
        let err = read_matrix(Cursor::new(csv)).unwrap_err();
        assert!(err.is_data());
        assert!(err.to_string().contains("(A, C)"));
    }

    #[test]
    fn row_order_must_match_header() {
        let csv = ",A,B\nB,,1\nA,,\n";
        assert!(read_matrix(Cursor::new(csv)).unwrap_err().is_data());
    }

    #[test]
    fn non_numeric_cell_is_data_error() {
        let csv = ",A,B\nA,,x\nB,,\n";
        assert!(read_matrix(Cursor::new(csv)).unwrap_err().is_data());
    }

    #[test]
    fn roster_and_pairs_build_matrix() {
        let roster = read_roster(Cursor::new("name\nAnn\nBob\n\nCid\n")).unwrap();
        assert_eq!(roster.len(), 3);
        let pairs = "a,b,score\nAnn,Bob,1\nCid,Ann,2\nBob,Cid,0.5\n";
        let m = read_pairs(Cursor::new(pairs), &roster).unwrap();
        assert_eq!(m.get_by_name("Ann", "Cid").unwrap(), 2.0);
    }

    #[test]
    fn unknown_pair_name_is_data_error() {
        let roster = read_roster(Cursor::new("name\nAnn\nBob\n")).unwrap();
        let pairs = "a,b,score\nAnn,Zed,1\n";
        assert!(read_pairs(Cursor::new(pairs), &roster).unwrap_err().is_data());
    }
}
