//! CSV ingest and normalization.
//!
//! This module turns a sales export into a clean, typed `TransactionRecord` set.
//! It is split in two steps:
//!
//! - `read_table_*`: the file collaborator. Reads header + rows as text, in file order.
//! - `normalize_records`: the Record Normalizer. Trims, validates the schema, parses
//!   dates and quantities.
//!
//! Design goals:
//! - **Strict schema**: missing columns and bad rows abort the run (exit code 2)
//! - **Clear errors**: every row error names its line and offending value
//! - **No filtering**: selection by `Type` happens in the series builder

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::TransactionRecord;
use crate::error::AppError;

pub const COL_PRODUCT: &str = "Product Name";
pub const COL_DATE: &str = "Date of Sale";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_TYPE: &str = "Type";

/// Fixed date template for `Date of Sale`, e.g. `05-Jan-23`.
pub const SALE_DATE_FORMAT: &str = "%d-%b-%y";

/// A raw data row as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub fields: Vec<String>,
}

/// Header + rows, text only, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Column positions of the required fields.
#[derive(Debug, Clone, Copy)]
struct Schema {
    product: usize,
    date: usize,
    quantity: usize,
    kind: usize,
}

/// Read a CSV file from disk.
pub fn read_table_from_path(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::ingestion(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_table_from_reader(file)
}

/// Read CSV text from any reader (UTF-8 assumed).
pub fn read_table_from_reader<R: Read>(reader: R) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::ingestion(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::ingestion("Input CSV is empty (no header row)."));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and line numbers are 1-based.
        let fallback_line = idx + 2;
        let record = result.map_err(|e| {
            AppError::ingestion(format!("CSV parse error near line {fallback_line}: {e}"))
        })?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        // Blank lines are skipped by the csv reader; a row of empty fields is not data either.
        if record.iter().all(str::is_empty) {
            continue;
        }

        rows.push(RawRow {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(RawTable { headers, rows })
}

/// Normalize raw rows into typed transaction records.
///
/// Fails the whole operation on the first invalid row.
pub fn normalize_records(table: &RawTable) -> Result<Vec<TransactionRecord>, AppError> {
    let headers: Vec<String> = table.headers.iter().map(|h| normalize_header_name(h)).collect();
    let schema = resolve_schema(&headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        records.push(normalize_row(row, &headers, schema)?);
    }

    tracing::debug!(rows = records.len(), "normalized transaction records");
    Ok(records)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn resolve_schema(headers: &[String]) -> Result<Schema, AppError> {
    Ok(Schema {
        product: require_column(headers, COL_PRODUCT)?,
        date: require_column(headers, COL_DATE)?,
        quantity: require_column(headers, COL_QUANTITY)?,
        kind: require_column(headers, COL_TYPE)?,
    })
}

fn require_column(headers: &[String], name: &str) -> Result<usize, AppError> {
    find_column(headers, name)
        .ok_or_else(|| AppError::ingestion(format!("Missing required column: `{name}`")))
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
}

fn normalize_row(row: &RawRow, headers: &[String], schema: Schema) -> Result<TransactionRecord, AppError> {
    if row.fields.len() != headers.len() {
        return Err(AppError::ingestion(format!(
            "Line {}: expected {} fields, found {}.",
            row.line,
            headers.len(),
            row.fields.len()
        )));
    }

    // A blank product name passes through; the series builder leaves it out of grouping.
    let product_name = field(row, schema.product);

    let sale_date = parse_sale_date(field(row, schema.date))
        .map_err(|msg| AppError::ingestion(format!("Line {}: {msg}", row.line)))?;
    let quantity = parse_quantity(field(row, schema.quantity))
        .map_err(|msg| AppError::ingestion(format!("Line {}: {msg}", row.line)))?;

    let required = [schema.product, schema.date, schema.quantity, schema.kind];
    let extra = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !required.contains(idx))
        .map(|(idx, name)| (name.clone(), field(row, idx).to_string()))
        .collect::<BTreeMap<_, _>>();

    Ok(TransactionRecord {
        product_name: product_name.to_string(),
        sale_date,
        quantity,
        kind: field(row, schema.kind).to_string(),
        extra,
        line: row.line,
    })
}

fn field(row: &RawRow, idx: usize) -> &str {
    row.fields[idx].trim()
}

/// Parse a `Date of Sale` value using the fixed `%d-%b-%y` template.
pub fn parse_sale_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), SALE_DATE_FORMAT).map_err(|_| {
        format!("Invalid `{COL_DATE}` '{s}'. Expected DD-Mon-YY (e.g. 05-Jan-23).")
    })
}

fn parse_quantity(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{COL_QUANTITY}` '{s}' (must be numeric)."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Invalid `{COL_QUANTITY}` '{s}' (must be finite)."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv_text: &str) -> RawTable {
        read_table_from_reader(csv_text.as_bytes()).unwrap()
    }

    #[test]
    fn trims_headers_and_values() {
        let t = table(" Product Name ,Date of Sale, Quantity ,Type,Region\n  Widget A ,05-Jan-23, 3 , EW ,  North \n");
        let records = normalize_records(&t).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.product_name, "Widget A");
        assert_eq!(r.kind, "EW");
        assert_eq!(r.sale_date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(r.quantity, 3.0);
        assert_eq!(r.extra.get("Region").map(String::as_str), Some("North"));
        assert_eq!(r.line, 2);
    }

    #[test]
    fn strips_bom_from_first_header() {
        let t = table("\u{feff}Product Name,Date of Sale,Quantity,Type\nW,01-Feb-24,1,EW\n");
        assert_eq!(t.headers[0], "Product Name");
        assert!(normalize_records(&t).is_ok());
    }

    #[test]
    fn malformed_date_is_fatal_and_names_the_line() {
        let t = table("Product Name,Date of Sale,Quantity,Type\nW,05-Jan-23,1,EW\nW,2023-01-06,1,EW\n");
        let err = normalize_records(&t).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Line 3"), "{}", err.message());
        assert!(err.message().contains("2023-01-06"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let t = table("Product Name,Date of Sale,Quantity\nW,05-Jan-23,1\n");
        let err = normalize_records(&t).unwrap_err();
        assert!(err.message().contains("`Type`"));
    }

    #[test]
    fn non_numeric_quantity_is_fatal() {
        let t = table("Product Name,Date of Sale,Quantity,Type\nW,05-Jan-23,lots,EW\n");
        let err = normalize_records(&t).unwrap_err();
        assert!(err.message().contains("lots"));
    }

    #[test]
    fn field_count_mismatch_is_fatal() {
        let t = table("Product Name,Date of Sale,Quantity,Type\nW,05-Jan-23,1,EW\nW,06-Jan-23,1\n");
        let err = normalize_records(&t).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Line 3"), "{}", err.message());
        assert!(err.message().contains("expected 4 fields, found 3"));
    }

    #[test]
    fn blank_product_name_passes_through() {
        let t = table("Product Name,Date of Sale,Quantity,Type\nWidget A,05-Jan-23,3,EW\n,06-Jan-23,2,RET\n");
        let records = normalize_records(&t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].product_name, "");
        assert_eq!(records[1].kind, "RET");
    }

    #[test]
    fn header_lookup_falls_back_to_case_insensitive_match() {
        let t = table("product name,DATE OF SALE,quantity,type\nW,05-Jan-23,2,EW\n");
        let records = normalize_records(&t).unwrap();
        assert_eq!(records[0].product_name, "W");
        assert_eq!(records[0].kind, "EW");
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = read_table_from_reader("".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn header_only_input_yields_no_records() {
        let t = table("Product Name,Date of Sale,Quantity,Type\n");
        assert!(normalize_records(&t).unwrap().is_empty());
    }

    #[test]
    fn no_rows_are_filtered() {
        let t = table("Product Name,Date of Sale,Quantity,Type\nA,05-Jan-23,1,EW\nB,06-Jan-23,2,RET\n");
        let records = normalize_records(&t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, "RET");
    }

    #[test]
    fn month_abbreviation_is_case_insensitive() {
        assert_eq!(
            parse_sale_date("31-DEC-22").unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()
        );
    }
}
