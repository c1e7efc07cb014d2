//! CSV serialization of the result table.
//!
//! UTF-8, standard quoting, header row with the fixed column titles.

use std::io::Write;

use reposheet_shared::{RepoRecord, RepoSheetError, Result, ResultTable};

/// Write `table` as CSV with a header row.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(ResultTable::COLUMNS)
        .map_err(|e| RepoSheetError::Export(format!("csv header: {e}")))?;

    for row in &table.rows {
        let kind = row.kind.to_string();
        out.write_record([row.name.as_str(), kind.as_str(), &row.url, &row.readme])
            .map_err(|e| RepoSheetError::Export(format!("csv row for {}: {e}", row.name)))?;
    }

    out.flush()
        .map_err(|e| RepoSheetError::Export(format!("csv flush: {e}")))
}

/// Render `table` as an in-memory CSV string.
pub fn csv_string(table: &ResultTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RepoSheetError::Export(format!("csv utf-8: {e}")))
}

/// Parse CSV produced by [`write_csv`] back into a table.
pub fn parse_csv(input: &str) -> Result<ResultTable> {
    let mut reader = ::csv::Reader::from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| RepoSheetError::Export(format!("csv headers: {e}")))?;
    let header_fields: Vec<&str> = headers.iter().collect();
    if header_fields != ResultTable::COLUMNS {
        return Err(RepoSheetError::Export(format!(
            "unexpected csv header row: {header_fields:?}"
        )));
    }

    let mut table = ResultTable::new();
    for record in reader.records() {
        let record = record.map_err(|e| RepoSheetError::Export(format!("csv record: {e}")))?;
        if record.len() != ResultTable::COLUMNS.len() {
            return Err(RepoSheetError::Export(format!(
                "csv record has {} fields, expected {}",
                record.len(),
                ResultTable::COLUMNS.len()
            )));
        }

        let kind = record[1]
            .parse()
            .map_err(|e: String| RepoSheetError::Export(e))?;
        table.push(RepoRecord {
            name: record[0].to_string(),
            kind,
            url: record[2].to_string(),
            readme: record[3].to_string(),
        });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reposheet_shared::{README_NOT_FOUND, RepoKind};

    fn sample_table() -> ResultTable {
        let mut table = ResultTable::new();
        table.push(RepoRecord {
            name: "alpha-tool".into(),
            kind: RepoKind::Original,
            url: "https://github.com/krasper/alpha-tool".into(),
            readme: "Does alpha things, with \"quotes\", commas,\nand newlines.".into(),
        });
        table.push(RepoRecord {
            name: "gamma-fork".into(),
            kind: RepoKind::Fork,
            url: "https://github.com/krasper/gamma-fork".into(),
            readme: README_NOT_FOUND.into(),
        });
        table
    }

    #[test]
    fn header_row_uses_fixed_column_titles() {
        let csv = csv_string(&ResultTable::new()).unwrap();
        assert_eq!(csv.trim_end(), "Project Name,Type,URL,README Content");
    }

    #[test]
    fn round_trip_preserves_rows_and_values() {
        let table = sample_table();
        let csv = csv_string(&table).unwrap();
        let parsed = parse_csv(&csv).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn empty_table_round_trips() {
        let csv = csv_string(&ResultTable::new()).unwrap();
        let parsed = parse_csv(&csv).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn kind_serializes_as_display_strings() {
        let csv = csv_string(&sample_table()).unwrap();
        let mut lines = csv.lines().skip(1);
        assert!(lines.next().unwrap().contains("Original"));
        // The quoted readme spans two physical lines; skip to the fork row.
        assert!(csv.contains("gamma-fork,Fork,"));
    }

    #[test]
    fn rejects_foreign_header() {
        let err = parse_csv("a,b,c,d\n1,2,3,4\n").unwrap_err();
        assert!(err.to_string().contains("unexpected csv header"));
    }
}
