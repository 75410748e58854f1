//! The `count` + `key weight` table file format.
//!
//! ```text
//! 3
//! 1.0 2.5
//! -4 1e-3
//! 7.25 0
//! ```
//!
//! The first line holds the row count `N`; each of the next `N` lines holds two decimal
//! floating-point values separated by a space. The result file uses the same layout with the
//! group value and its rounded sum.
//!
//! Results are written to a temporary file next to the destination and renamed into place
//! once complete, so a failed query never leaves a partial output file behind.

use crate::accumulate::Group;
use crate::error::QueryError;
use crate::io::number::{format_key, format_sum};
use crate::table::{Row, Table};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Upper bound on rows preallocated from a header before any data line has been seen.
const PREALLOCATE_ROWS: usize = 1 << 20;

/// Read a table file.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if its content does not follow
/// the format (the cause is a [`QueryError::Parse`] naming the offending line).
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let table = parse_table(BufReader::new(f)).with_context(|| format!("read table {}", path.display()))?;
    debug!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

fn parse_error(line: usize, reason: impl Into<String>) -> anyhow::Error {
    QueryError::Parse {
        line,
        reason: reason.into(),
    }
    .into()
}

fn parse_value(token: &str, line: usize, column: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| parse_error(line, format!("{column} column `{token}` is not a number: {e}")))
}

/// Parse a table from any buffered reader.
///
/// Leading and trailing whitespace on a line is ignored, as are blank lines after the last
/// row.
///
/// # Errors
/// Returns an error on read failures or malformed content.
pub fn parse_table<R: BufRead>(reader: R) -> Result<Table> {
    let mut lines = reader.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing row count"))?;
    let header = header.context("read line 1")?;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|e| parse_error(1, format!("row count `{}` is not an integer: {e}", header.trim())))?;

    let mut rows = Vec::with_capacity(count.min(PREALLOCATE_ROWS));
    let mut trailing_blank = 0usize;
    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("read line {line_no}"))?;
        let trimmed = line.trim();
        if rows.len() == count {
            if trimmed.is_empty() {
                trailing_blank += 1;
                continue;
            }
            return Err(parse_error(
                line_no,
                format!("unexpected data after the declared {count} rows"),
            ));
        }

        let mut cols = trimmed.split_whitespace();
        let (Some(key), Some(weight), None) = (cols.next(), cols.next(), cols.next()) else {
            return Err(parse_error(line_no, "expected exactly two columns"));
        };
        rows.push(Row::new(
            parse_value(key, line_no, "key")?,
            parse_value(weight, line_no, "weight")?,
        ));
    }

    if rows.len() < count {
        return Err(parse_error(
            rows.len() + 2,
            format!("expected {count} rows, found {}", rows.len()),
        ));
    }
    if trailing_blank > 0 {
        warn!("ignored {trailing_blank} blank line(s) after the last row");
    }
    Ok(Table::new(rows))
}

/// Render ranked groups in the result format.
///
/// # Errors
/// Returns any error raised by `w`.
pub fn render_ranked<W: Write>(mut w: W, groups: &[Group]) -> std::io::Result<()> {
    writeln!(w, "{}", groups.len())?;
    for g in groups {
        writeln!(w, "{} {}", format_key(g.key), format_sum(g.sum))?;
    }
    w.flush()
}

/// Write ranked groups to `path`, replacing it atomically.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
/// Returns an error if the directory, the temporary file, or the final rename fails.
pub fn write_ranked(path: impl AsRef<Path>, groups: &[Group]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    render_ranked(BufWriter::new(tmp.as_file_mut()), groups)
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("move result into {}", path.display()))?;
    debug!("wrote {} groups to {}", groups.len(), path.display());
    Ok(())
}
