//! CSV format handling for point operations and ledger reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to point operations
//! - Balance and history report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    PointError, PointOperation, Points, TransactionKind, TransactionRecord, UserBalance, UserId,
};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, user, amount
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a PointOperation
///
/// Parses the operation type (case-insensitive) and the amount. The amount
/// is required for every operation. Its sign is not checked here; the
/// service rejects non-positive amounts with a dedicated error.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<PointOperation, PointError> {
    let kind = match csv_record.kind.to_lowercase().as_str() {
        "charge" => TransactionKind::Charge,
        "use" => TransactionKind::Use,
        _ => {
            return Err(PointError::invalid_operation_type(
                &csv_record.kind,
                csv_record.user,
            ))
        }
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            amount_str.trim().parse::<Points>().map_err(|_| {
                PointError::parse(format!(
                    "Invalid amount '{}' for user {}",
                    amount_str, csv_record.user
                ))
            })?
        }
        _ => {
            return Err(PointError::parse(format!(
                "{} operation for user {} requires an amount",
                kind, csv_record.user
            )))
        }
    };

    Ok(PointOperation {
        kind,
        user_id: csv_record.user,
        amount,
    })
}

/// Write balances in CSV format with columns: user, points
///
/// Balances are sorted by user id for deterministic output.
pub fn write_balances_csv(
    balances: &[UserBalance],
    output: &mut dyn Write,
) -> Result<(), PointError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["user", "points"])
        .map_err(|e| PointError::io(format!("Failed to write CSV header: {}", e)))?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|balance| balance.user_id);

    for balance in sorted {
        writer
            .write_record(&[balance.user_id.to_string(), balance.points.to_string()])
            .map_err(|e| PointError::io(format!("Failed to write balance record: {}", e)))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write history records in CSV format with columns: id, user, kind, amount, timestamp
///
/// Records are sorted by id, i.e. commit order. Timestamps are RFC 3339.
pub fn write_history_csv(
    records: &[TransactionRecord],
    output: &mut dyn Write,
) -> Result<(), PointError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["id", "user", "kind", "amount", "timestamp"])
        .map_err(|e| PointError::io(format!("Failed to write CSV header: {}", e)))?;

    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.id);

    for record in sorted {
        writer
            .write_record(&[
                record.id.to_string(),
                record.user_id.to_string(),
                record.kind.to_string(),
                record.amount.to_string(),
                record.timestamp.to_rfc3339(),
            ])
            .map_err(|e| PointError::io(format!("Failed to write history record: {}", e)))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn csv_record(kind: &str, amount: Option<&str>) -> CsvRecord {
        CsvRecord {
            kind: kind.to_string(),
            user: 1,
            amount: amount.map(|s| s.to_string()),
        }
    }

    #[rstest]
    #[case("charge", TransactionKind::Charge, "500", 500)]
    #[case("use", TransactionKind::Use, "300", 300)]
    #[case("CHARGE", TransactionKind::Charge, "1", 1)] // case insensitive
    #[case("Use", TransactionKind::Use, "  42  ", 42)] // whitespace trimming
    #[case("charge", TransactionKind::Charge, "-5", -5)] // sign checked by the service
    fn test_convert_csv_record_valid(
        #[case] kind: &str,
        #[case] expected_kind: TransactionKind,
        #[case] amount: &str,
        #[case] expected_amount: Points,
    ) {
        let operation = convert_csv_record(csv_record(kind, Some(amount))).unwrap();

        assert_eq!(operation.kind, expected_kind);
        assert_eq!(operation.user_id, 1);
        assert_eq!(operation.amount, expected_amount);
    }

    #[test]
    fn test_convert_csv_record_invalid_type() {
        let result = convert_csv_record(csv_record("refund", Some("100")));

        assert_eq!(result, Err(PointError::invalid_operation_type("refund", 1)));
    }

    #[rstest]
    #[case::missing_amount("charge", None, "requires an amount")]
    #[case::empty_amount("use", Some(""), "requires an amount")]
    #[case::whitespace_amount("use", Some("  "), "requires an amount")]
    #[case::invalid_amount("charge", Some("ten"), "Invalid amount")]
    #[case::fractional_amount("charge", Some("1.5"), "Invalid amount")]
    fn test_convert_csv_record_amount_errors(
        #[case] kind: &str,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let error = convert_csv_record(csv_record(kind, amount)).unwrap_err();

        assert!(matches!(error, PointError::ParseError { line: None, .. }));
        assert!(error.to_string().contains(expected_error));
    }

    #[rstest]
    #[case::empty(vec![], "user,points\n")]
    #[case::single(vec![(1, 600)], "user,points\n1,600\n")]
    #[case::sorted_by_user(
        vec![(3, 30), (1, 10), (2, 20)],
        "user,points\n1,10\n2,20\n3,30\n"
    )]
    fn test_write_balances_csv(#[case] rows: Vec<(UserId, Points)>, #[case] expected: &str) {
        let balances: Vec<UserBalance> = rows
            .into_iter()
            .map(|(user_id, points)| UserBalance::new(user_id, points))
            .collect();
        let mut output = Vec::new();

        write_balances_csv(&balances, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_history_csv() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let records = vec![
            TransactionRecord {
                id: 2,
                user_id: 1,
                amount: 300,
                kind: TransactionKind::Use,
                timestamp,
            },
            TransactionRecord {
                id: 1,
                user_id: 1,
                amount: 500,
                kind: TransactionKind::Charge,
                timestamp,
            },
        ];
        let mut output = Vec::new();

        write_history_csv(&records, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,user,kind,amount,timestamp\n\
             1,1,charge,500,2024-01-02T03:04:05+00:00\n\
             2,1,use,300,2024-01-02T03:04:05+00:00\n"
        );
    }
}
