use anyhow::Result;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use tribeam::io::{parse_table, read_table, render_ranked, write_ranked};
use tribeam::{Group, QueryError, Row};

fn parse(text: &str) -> Result<Vec<Row>> {
    Ok(parse_table(Cursor::new(text))?.rows().to_vec())
}

fn parse_failure(text: &str) -> QueryError {
    let err = parse(text).unwrap_err();
    err.downcast_ref::<QueryError>()
        .cloned()
        .unwrap_or_else(|| panic!("not a parse error: {err:#}"))
}

#[test]
fn parses_rows_in_order() -> Result<()> {
    let rows = parse("3\n1.0 2.5\n-4 1e-3\n+7.25 0\n")?;
    assert_eq!(
        rows,
        vec![
            Row::new(1.0, 2.5),
            Row::new(-4.0, 0.001),
            Row::new(7.25, 0.0)
        ]
    );
    Ok(())
}

#[test]
fn tolerates_whitespace_and_trailing_blank_lines() -> Result<()> {
    let rows = parse("  2 \r\n 1 2 \r\n3   4\n\n\n")?;
    assert_eq!(rows, vec![Row::new(1.0, 2.0), Row::new(3.0, 4.0)]);
    assert!(parse("0\n")?.is_empty());
    assert!(parse("0")?.is_empty());
    Ok(())
}

#[test]
fn malformed_input_names_the_line() {
    assert!(matches!(parse_failure(""), QueryError::Parse { line: 1, .. }));
    assert!(matches!(parse_failure("two\n"), QueryError::Parse { line: 1, .. }));
    assert!(matches!(parse_failure("1\n1.0\n"), QueryError::Parse { line: 2, .. }));
    assert!(matches!(parse_failure("1\n1 2 3\n"), QueryError::Parse { line: 2, .. }));
    assert!(matches!(parse_failure("2\n1 2\nx 2\n"), QueryError::Parse { line: 3, .. }));
    assert!(matches!(parse_failure("2\n1 2\n"), QueryError::Parse { line: 3, .. }));
    assert!(matches!(parse_failure("1\n1 2\n3 4\n"), QueryError::Parse { line: 3, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = read_table(tmp.path().join("nope.txt")).unwrap_err();
    assert!(err.downcast_ref::<QueryError>().is_none());
    assert!(format!("{err:#}").contains("nope.txt"));
}

#[test]
fn renders_count_then_rows() -> Result<()> {
    let groups = [
        Group {
            key: 1.0,
            sum: 24.0,
            first_seen: 0,
        },
        Group {
            key: 1e-4,
            sum: 0.1234565,
            first_seen: 3,
        },
    ];
    let mut buf = Vec::new();
    render_ranked(&mut buf, &groups)?;
    assert_eq!(String::from_utf8(buf)?, "2\n1.0 24.000000\n1.0E-4 0.123457\n");

    let mut empty = Vec::new();
    render_ranked(&mut empty, &[])?;
    assert_eq!(String::from_utf8(empty)?, "0\n");
    Ok(())
}

#[test]
fn write_replaces_existing_file_and_creates_dirs() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("nested/dir/out.txt");
    write_ranked(&out, &[])?;
    assert_eq!(fs::read_to_string(&out)?, "0\n");

    let g = Group {
        key: -2.5,
        sum: 3.0,
        first_seen: 0,
    };
    write_ranked(&out, &[g])?;
    assert_eq!(fs::read_to_string(&out)?, "1\n-2.5 3.000000\n");

    // only the result remains in the directory
    let entries = fs::read_dir(out.parent().unwrap())?.count();
    assert_eq!(entries, 1);
    Ok(())
}
