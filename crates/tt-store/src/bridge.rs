//! TSV and JSON interchange with the surrounding text-mining pipeline.
//!
//! Vocabulary extraction produces TSV term lists; the accepted keywords feed
//! back out the same way. Column order is taken from the header, the `order`
//! field is empty while a term is unclassified, and labels travel by name.

use std::fs;
use std::path::Path;

use tt_core::TermRecord;

use crate::error::{Result, StoreError};

const COL_TERM: &str = "term";
const COL_LABEL: &str = "label";
const COL_ORDER: &str = "order";
const COL_RELATED: &str = "related";

// ---------------------------------------------------------------------------
// Pure parsing/formatting helpers (no I/O, fully unit-testable)
// ---------------------------------------------------------------------------

/// Render records as TSV, header row first, `-1`/absent order as empty.
pub fn to_tsv(records: &[TermRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{COL_TERM}\t{COL_LABEL}\t{COL_ORDER}\t{COL_RELATED}\n"
    ));
    for rec in records {
        let order = match rec.order {
            Some(o) => o.to_string(),
            None => String::new(),
        };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            rec.string, rec.label, order, rec.related
        ));
    }
    out
}

/// Parse TSV content into records.
///
/// The header decides column positions; a `term` column is mandatory,
/// the others default to empty when missing (older files carry no
/// `related` column). Label validity is checked later, when the core
/// builds its store from the records.
pub fn parse_tsv(content: &str) -> Result<Vec<TermRecord>> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| StoreError::InvalidData("empty TSV input".to_string()))?;

    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let term_col = columns
        .iter()
        .position(|&c| c == COL_TERM)
        .ok_or_else(|| StoreError::InvalidData(format!("missing '{COL_TERM}' column")))?;
    let label_col = columns.iter().position(|&c| c == COL_LABEL);
    let order_col = columns.iter().position(|&c| c == COL_ORDER);
    let related_col = columns.iter().position(|&c| c == COL_RELATED);

    let field = |fields: &[&str], col: Option<usize>| -> String {
        col.and_then(|i| fields.get(i))
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let string = fields.get(term_col).map(|s| s.trim()).unwrap_or("");
        if string.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "line {}: empty term",
                lineno + 2
            )));
        }

        let order_field = field(&fields, order_col);
        let order = if order_field.is_empty() {
            None
        } else {
            Some(order_field.parse::<i64>().map_err(|_| {
                StoreError::InvalidData(format!(
                    "line {}: bad order value '{order_field}'",
                    lineno + 2
                ))
            })?)
        };

        records.push(TermRecord {
            string: string.to_string(),
            label: field(&fields, label_col),
            order,
            related: field(&fields, related_col),
        });
    }

    Ok(records)
}

pub fn to_json(records: &[TermRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| StoreError::InvalidData(format!("JSON encode failed: {e}")))
}

pub fn parse_json(content: &str) -> Result<Vec<TermRecord>> {
    serde_json::from_str(content).map_err(|e| StoreError::InvalidData(format!("bad JSON: {e}")))
}

// ---------------------------------------------------------------------------
// I/O wrappers (thin shells around the pure helpers)
// ---------------------------------------------------------------------------

pub fn read_tsv_file(path: &Path) -> Result<Vec<TermRecord>> {
    let content = fs::read_to_string(path)?;
    parse_tsv(&content)
}

pub fn write_tsv_file(path: &Path, records: &[TermRecord]) -> Result<()> {
    write_atomic(path, &to_tsv(records))
}

pub fn read_json_file(path: &Path) -> Result<Vec<TermRecord>> {
    let content = fs::read_to_string(path)?;
    parse_json(&content)
}

pub fn write_json_file(path: &Path, records: &[TermRecord]) -> Result<()> {
    write_atomic(path, &to_json(records)?)
}

/// Write to a sibling temp file, then rename over the target. The target
/// either keeps its old contents or gets the complete new ones.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, content)?;
    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TermRecord> {
        let mut a = TermRecord::new("neural networks");
        a.label = "keyword".to_string();
        a.order = Some(3);
        a.related = "networks".to_string();
        let b = TermRecord::new("deep learning");
        vec![a, b]
    }

    #[test]
    fn test_tsv_roundtrip() {
        let original = records();
        let tsv = to_tsv(&original);
        assert_eq!(parse_tsv(&tsv).unwrap(), original);
    }

    #[test]
    fn test_unclassified_order_is_empty_field() {
        let tsv = to_tsv(&records());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "term\tlabel\torder\trelated");
        assert_eq!(lines[1], "neural networks\tkeyword\t3\tnetworks");
        assert_eq!(lines[2], "deep learning\t\t\t");
    }

    #[test]
    fn test_parse_missing_related_column() {
        let content = "term\tlabel\torder\nmachine learning\tnoise\t0\n";
        let records = parse_tsv(content).unwrap();
        assert_eq!(records[0].string, "machine learning");
        assert_eq!(records[0].label, "noise");
        assert_eq!(records[0].order, Some(0));
        assert_eq!(records[0].related, "");
    }

    #[test]
    fn test_parse_header_order_is_flexible() {
        let content = "label\tterm\nkeyword\tdata mining\n";
        let records = parse_tsv(content).unwrap();
        assert_eq!(records[0].string, "data mining");
        assert_eq!(records[0].label, "keyword");
        assert_eq!(records[0].order, None);
    }

    #[test]
    fn test_parse_rejects_missing_term_column() {
        assert!(parse_tsv("label\torder\nkeyword\t0\n").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_order() {
        let content = "term\torder\nfoo\tnot-a-number\n";
        assert!(parse_tsv(content).is_err());
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = "term\tlabel\n\nalpha\t\n\n";
        let records = parse_tsv(content).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let original = records();
        let json = to_json(&original).unwrap();
        assert_eq!(parse_json(&json).unwrap(), original);
    }

    #[test]
    fn test_file_roundtrip_and_atomic_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terms.tsv");

        write_tsv_file(&path, &records()).unwrap();
        assert_eq!(read_tsv_file(&path).unwrap(), records());

        // overwrite with fewer records; no stray temp file remains
        write_tsv_file(&path, &records()[..1]).unwrap();
        assert_eq!(read_tsv_file(&path).unwrap().len(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
