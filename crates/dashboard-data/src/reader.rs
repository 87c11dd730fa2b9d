//! CSV loading for the sales dashboard.
//!
//! Reads an order-line export (one row per order line, Superstore layout)
//! into [`Record`] structs. Schema problems fail the whole load: a dashboard
//! over half a dataset is worse than an error message.

use std::io::Read;
use std::path::Path;

use dashboard_core::dates::OrderDateParser;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::Record;
use serde::Deserialize;
use tracing::{debug, info};

// ── Schema ────────────────────────────────────────────────────────────────────

/// Required columns as `(header, accepted alias)` pairs.
pub const REQUIRED_COLUMNS: &[(&str, &str)] = &[
    ("Order Date", "OrderDate"),
    ("State", "State"),
    ("City", "City"),
    ("Segment", "Segment"),
    ("Ship Mode", "ShipMode"),
    ("Category", "Category"),
    ("Sub-Category", "SubCategory"),
    ("Product Name", "ProductName"),
    ("Sales", "Sales"),
    ("Profit", "Profit"),
    ("Discount", "Discount"),
];

/// One CSV row as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Order Date", alias = "OrderDate")]
    order_date: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Segment")]
    segment: String,
    #[serde(rename = "Ship Mode", alias = "ShipMode")]
    ship_mode: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub-Category", alias = "SubCategory")]
    sub_category: String,
    #[serde(rename = "Product Name", alias = "ProductName")]
    product_name: String,
    #[serde(rename = "Sales")]
    sales: f64,
    #[serde(rename = "Profit")]
    profit: f64,
    #[serde(rename = "Discount")]
    discount: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every order line from the CSV file at `path`.
///
/// Fails fast with an input error when the file cannot be read, a required
/// column is missing, or any row is malformed. Rows keep their file order.
pub fn load_dataset(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_from_reader(std::io::BufReader::new(file), path)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse CSV data from any reader. `source` only labels error messages.
pub fn load_from_reader<R: Read>(reader: R, source: &Path) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| map_csv_error(e, 1))?
        .clone();
    if headers.is_empty() {
        return Err(DashboardError::EmptyFile(source.to_path_buf()));
    }
    check_required_columns(&headers, source)?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        // Line 1 is the header; data starts on line 2.
        let fallback_row = index as u64 + 2;
        let string_record = result.map_err(|e| map_csv_error(e, fallback_row))?;
        let row = string_record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_row);

        let raw: RawRow = string_record
            .deserialize(Some(&headers))
            .map_err(|e| map_csv_error(e, row))?;
        records.push(validate_row(raw, row)?);
    }

    debug!(
        "Parsed {} rows from {} ({} columns)",
        records.len(),
        source.display(),
        headers.len()
    );

    Ok(records)
}

/// Names of required columns absent from `headers` (by header or alias).
pub fn missing_columns(headers: &csv::StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|(name, alias)| !headers.iter().any(|h| h == *name || h == *alias))
        .map(|(name, _)| (*name).to_string())
        .collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn check_required_columns(headers: &csv::StringRecord, source: &Path) -> Result<()> {
    let missing = missing_columns(headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::MissingColumns {
            path: source.to_path_buf(),
            columns: missing,
        })
    }
}

/// Turn a raw row into a [`Record`], enforcing the numeric domains.
fn validate_row(raw: RawRow, row: u64) -> Result<Record> {
    let order_date =
        OrderDateParser::parse(&raw.order_date).ok_or_else(|| DashboardError::DateParse {
            row,
            value: raw.order_date.clone(),
        })?;

    if !raw.sales.is_finite() || raw.sales < 0.0 {
        return Err(invalid(row, "Sales", raw.sales));
    }
    if !raw.profit.is_finite() {
        return Err(invalid(row, "Profit", raw.profit));
    }
    if !raw.discount.is_finite() || !(0.0..=1.0).contains(&raw.discount) {
        return Err(invalid(row, "Discount", raw.discount));
    }

    Ok(Record::new(
        order_date,
        raw.state,
        raw.city,
        raw.segment,
        raw.ship_mode,
        raw.category,
        raw.sub_category,
        raw.product_name,
        raw.sales,
        raw.profit,
        raw.discount,
    ))
}

fn invalid(row: u64, column: &'static str, value: f64) -> DashboardError {
    DashboardError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn map_csv_error(err: csv::Error, fallback_row: u64) -> DashboardError {
    let row = err.position().map(|p| p.line()).unwrap_or(fallback_row);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DashboardError::Io(e),
        csv::ErrorKind::Deserialize { err, .. } => DashboardError::MalformedRow {
            row,
            reason: err.to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => DashboardError::MalformedRow {
            row,
            reason: format!("expected {} fields, found {}", expected_len, len),
        },
        other => DashboardError::MalformedRow {
            row,
            reason: format!("{:?}", other),
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "Row ID,Order Date,Ship Mode,Segment,City,State,Category,Sub-Category,Product Name,Sales,Quantity,Discount,Profit";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn parse(lines: &[&str]) -> Result<Vec<Record>> {
        let text = lines.join("\n");
        load_from_reader(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_load_dataset_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "orders.csv",
            &[
                HEADER,
                "1,11/8/2016,Second Class,Consumer,Henderson,Kentucky,Furniture,Bookcases,Bush Somerset Collection Bookcase,261.96,2,0,41.9136",
                "2,6/12/2016,Second Class,Corporate,Los Angeles,California,Office Supplies,Labels,Self-Adhesive Address Labels,14.62,2,0,6.8714",
            ],
        );

        let records = load_dataset(&path).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2016, 11, 8).unwrap());
        assert_eq!(first.year, 2016);
        assert_eq!(first.state, "Kentucky");
        assert_eq!(first.city, "Henderson");
        assert_eq!(first.ship_mode, "Second Class");
        assert_eq!(first.sub_category, "Bookcases");
        assert!((first.sales - 261.96).abs() < 1e-9);
        assert!((first.profit - 41.9136).abs() < 1e-9);
        assert_eq!(first.discount, 0.0);

        assert_eq!(records[1].segment, "Corporate");
    }

    #[test]
    fn test_load_dataset_quoted_product_names() {
        let records = parse(&[
            HEADER,
            r#"1,2017-01-05,Standard Class,Consumer,Houston,Texas,Technology,Phones,"Phone, Wireless ""Pro""",99.5,1,0.2,-3.25"#,
        ])
        .unwrap();
        assert_eq!(records[0].product_name, r#"Phone, Wireless "Pro""#);
        assert!((records[0].profit + 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_load_dataset_accepts_camel_case_headers() {
        let records = parse(&[
            "OrderDate,State,City,Segment,ShipMode,Category,SubCategory,ProductName,Sales,Profit,Discount",
            "2023-01-01,Utah,Provo,Consumer,First Class,Technology,Phones,Handset,100,10,0.1",
        ])
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ship_mode, "First Class");
        assert_eq!(records[0].product_name, "Handset");
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset(Path::new("/tmp/does-not-exist-sales-dashboard.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_load_dataset_empty_file() {
        let err = parse(&[]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyFile(_)));
    }

    #[test]
    fn test_load_dataset_header_only_is_empty_dataset() {
        let records = parse(&[HEADER]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_dataset_missing_columns_reported_together() {
        let err = parse(&[
            "Order Date,State,City,Segment,Category,Sub-Category,Product Name,Profit",
            "2023-01-01,Utah,Provo,Consumer,Technology,Phones,Handset,10",
        ])
        .unwrap_err();
        match err {
            DashboardError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["Ship Mode", "Sales", "Discount"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_dataset_bad_date_fails_fast() {
        let err = parse(&[
            HEADER,
            "1,2016-01-01,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,10,1,0,1",
            "2,someday,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,10,1,0,1",
        ])
        .unwrap_err();
        match err {
            DashboardError::DateParse { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "someday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_dataset_non_numeric_sales_is_malformed() {
        let err = parse(&[
            HEADER,
            "1,2016-01-01,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,lots,1,0,1",
        ])
        .unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn test_load_dataset_rejects_out_of_range_values() {
        let negative_sales = parse(&[
            HEADER,
            "1,2016-01-01,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,-5,1,0,1",
        ])
        .unwrap_err();
        assert!(matches!(
            negative_sales,
            DashboardError::InvalidValue {
                column: "Sales",
                ..
            }
        ));

        let big_discount = parse(&[
            HEADER,
            "1,2016-01-01,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,5,1,1.5,1",
        ])
        .unwrap_err();
        assert!(matches!(
            big_discount,
            DashboardError::InvalidValue {
                column: "Discount",
                ..
            }
        ));

        let nan_profit = parse(&[
            HEADER,
            "1,2016-01-01,Standard Class,Consumer,Houston,Texas,Furniture,Chairs,Chair,5,1,0,NaN",
        ])
        .unwrap_err();
        assert!(matches!(
            nan_profit,
            DashboardError::InvalidValue {
                column: "Profit",
                ..
            }
        ));
    }

    #[test]
    fn test_load_dataset_short_row_is_malformed() {
        let err = parse(&[HEADER, "1,2016-01-01,Standard Class"]).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRow { .. }));
    }

    #[test]
    fn test_missing_columns_none_for_full_header() {
        let headers = csv::StringRecord::from(HEADER.split(',').collect::<Vec<_>>());
        assert!(missing_columns(&headers).is_empty());
    }
}
