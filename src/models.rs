//! Record types returned by the relational connector.
//!
//! Both records serialize to a fixed camelCase JSON shape. Downstream prompt
//! templates quote these key names verbatim, so renaming a field here is a
//! breaking change for every consumer.

use serde::{Deserialize, Serialize};

/// One student's result from the `Scores` table.
///
/// ```json
/// {"studentName": "Alice", "score": 90}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub student_name: String,
    pub score: i64,
}

/// One income/expense entry from the `DailyRecords` table.
///
/// ```json
/// {"userName": "Alice", "recordDate": "2023-01-01", "typeName": "Income",
///  "itemName": "Salary", "amount": 30000, "remark": ""}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub user_name: String,
    /// `YYYY-MM-DD`, passed through as stored.
    pub record_date: String,
    pub type_name: String,
    pub item_name: String,
    pub amount: i64,
    pub remark: String,
}
