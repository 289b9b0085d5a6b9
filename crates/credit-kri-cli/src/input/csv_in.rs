use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

use credit_kri_core::LoanRecord;

#[derive(Deserialize)]
struct SnapshotTag {
    snapshot_date: NaiveDate,
}

/// Parse loan rows from CSV with a header row. Extra columns are ignored;
/// a missing required column fails on the first row.
pub fn read_loans<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<LoanRecord>, Box<dyn std::error::Error>> {
    let mut loans = Vec::new();
    for_each_row(reader, source, |record, headers, line| {
        loans.push(deserialize_row::<LoanRecord>(record, headers, source, line)?);
        Ok(())
    })?;
    Ok(loans)
}

/// Parse flat time-series rows, each carrying a `snapshot_date` column.
pub fn read_tagged_loans<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<(NaiveDate, LoanRecord)>, Box<dyn std::error::Error>> {
    let mut rows = Vec::new();
    for_each_row(reader, source, |record, headers, line| {
        let tag = deserialize_row::<SnapshotTag>(record, headers, source, line)?;
        let loan = deserialize_row::<LoanRecord>(record, headers, source, line)?;
        rows.push((tag.snapshot_date, loan));
        Ok(())
    })?;
    Ok(rows)
}

fn for_each_row<R, F>(reader: R, source: &str, mut f: F) -> Result<(), Box<dyn std::error::Error>>
where
    R: Read,
    F: FnMut(&csv::StringRecord, &csv::StringRecord, u64) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    // Spreadsheet exports often lead with a byte-order mark.
    let headers: csv::StringRecord = rdr
        .headers()
        .map_err(|e| format!("Failed to read header of '{source}': {e}"))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();

    for result in rdr.records() {
        let record = result.map_err(|e| format!("Failed to read '{source}': {e}"))?;
        let line = record.position().map_or(0, |p| p.line());
        f(&record, &headers, line)?;
    }
    Ok(())
}

fn deserialize_row<T: serde::de::DeserializeOwned>(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    source: &str,
    line: u64,
) -> Result<T, Box<dyn std::error::Error>> {
    let value = record
        .deserialize(Some(headers))
        .map_err(|e| format!("'{source}' line {line}: {e}"))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_kri_core::LoanClass;
    use rust_decimal_macros::dec;

    const HEADER: &str = "loan_id,customer_segment,province,industry,loan_type,origination_date,\
months_on_book,original_amount_vnd_mil,outstanding_balance_vnd_mil,interest_rate_pct,\
days_past_due,loan_classification,vintage,utilization_pct";

    #[test]
    fn test_reads_source_export_columns() {
        let data = format!(
            "\u{feff}{HEADER}\n\
             L1,Prime,Hanoi,Retail,Consumer,2024-03-01,20.5,500,400.25,12.5,0,Nhóm 1 - Bình thường,2024Q1,80.05\n\
             L2,NTB,Hanoi,Retail,Auto,2025-07-01,4.4,300,300,10,95,Class5,2025Q3,100\n"
        );
        let loans = read_loans(data.as_bytes(), "test.csv").unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].outstanding_balance, dec!(400.25));
        assert_eq!(loans[0].loan_classification, LoanClass::Class1);
        assert_eq!(loans[1].days_past_due, 95);
        assert!(loans[1].term_months.is_none());
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let data = "loan_id,customer_segment\nL1,Prime\n";
        let err = read_loans(data.as_bytes(), "bad.csv").unwrap_err();
        assert!(err.to_string().contains("missing field"));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_unknown_classification_fails() {
        let data = format!(
            "{HEADER}\nL1,Prime,Hanoi,Retail,Consumer,2024-03-01,20,500,400,12,0,Class9,2024Q1,80\n"
        );
        assert!(read_loans(data.as_bytes(), "bad.csv").is_err());
    }

    #[test]
    fn test_tagged_rows() {
        let data = format!(
            "snapshot_date,{HEADER}\n\
             2025-10-31,L1,Prime,Hanoi,Retail,Consumer,2024-03-01,20,500,400,12,0,Class1,2024Q1,80\n\
             2025-11-30,L1,Prime,Hanoi,Retail,Consumer,2024-03-01,21,500,390,12,35,Class2,2024Q1,78\n"
        );
        let rows = read_tagged_loans(data.as_bytes(), "ts.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());
        assert_eq!(rows[1].1.loan_classification, LoanClass::Class2);
    }
}
