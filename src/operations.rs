//! Built-in operations over the three connectors.
//!
//! | Qualified name | Parameters |
//! |----------------|------------|
//! | `TextFile.ReadAll` | none |
//! | `PdfReader.ReadDocumentText` | none |
//! | `Sqlite.ReadScores` | none |
//! | `Sqlite.ReadAllLedgerRecords` | none |
//! | `Sqlite.ReadUserLedgerRecords` | `userName: string` |
//!
//! Each operation holds an `Arc` of its connector; the connectors carry no
//! mutable state, so operations can run concurrently.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::connector_pdf::DocumentConnector;
use crate::connector_sqlite::RelationalConnector;
use crate::connector_text::TextConnector;
use crate::traits::{Operation, OperationRegistry};

pub const TEXT_PLUGIN: &str = "TextFile";
pub const PDF_PLUGIN: &str = "PdfReader";
pub const SQLITE_PLUGIN: &str = "Sqlite";

pub fn register_text(registry: &mut OperationRegistry, connector: Arc<TextConnector>) {
    registry.register(Arc::new(ReadAll(connector)));
}

pub fn register_pdf(registry: &mut OperationRegistry, connector: Arc<DocumentConnector>) {
    registry.register(Arc::new(ReadDocumentText(connector)));
}

pub fn register_sqlite(registry: &mut OperationRegistry, connector: Arc<RelationalConnector>) {
    registry.register(Arc::new(ReadScores(connector.clone())));
    registry.register(Arc::new(ReadAllLedgerRecords(connector.clone())));
    registry.register(Arc::new(ReadUserLedgerRecords(connector)));
}

pub struct ReadAll(pub Arc<TextConnector>);

#[async_trait]
impl Operation for ReadAll {
    fn plugin(&self) -> &str {
        TEXT_PLUGIN
    }

    fn name(&self) -> &str {
        "ReadAll"
    }

    fn description(&self) -> &str {
        "Read the entire content of the configured text file"
    }

    async fn invoke(&self, _params: Value) -> String {
        self.0.read_all().await
    }
}

pub struct ReadDocumentText(pub Arc<DocumentConnector>);

#[async_trait]
impl Operation for ReadDocumentText {
    fn plugin(&self) -> &str {
        PDF_PLUGIN
    }

    fn name(&self) -> &str {
        "ReadDocumentText"
    }

    fn description(&self) -> &str {
        "Read the text of every page of the configured PDF document"
    }

    async fn invoke(&self, _params: Value) -> String {
        self.0.read_document_text().await
    }
}

pub struct ReadScores(pub Arc<RelationalConnector>);

#[async_trait]
impl Operation for ReadScores {
    fn plugin(&self) -> &str {
        SQLITE_PLUGIN
    }

    fn name(&self) -> &str {
        "ReadScores"
    }

    fn description(&self) -> &str {
        r#"Read the student score list from the SQLite database as JSON. Example: [{"studentName":"Student A","score":90},{"studentName":"Student B","score":85}]"#
    }

    async fn invoke(&self, _params: Value) -> String {
        self.0.read_scores().await
    }
}

pub struct ReadAllLedgerRecords(pub Arc<RelationalConnector>);

#[async_trait]
impl Operation for ReadAllLedgerRecords {
    fn plugin(&self) -> &str {
        SQLITE_PLUGIN
    }

    fn name(&self) -> &str {
        "ReadAllLedgerRecords"
    }

    fn description(&self) -> &str {
        r#"Read the daily income/expense records of all users from the SQLite database as JSON. Example: [{"userName":"User A","recordDate":"2023-01-01","typeName":"Income","itemName":"Salary","amount":30000,"remark":""}]"#
    }

    async fn invoke(&self, _params: Value) -> String {
        self.0.read_all_ledger_records().await
    }
}

pub struct ReadUserLedgerRecords(pub Arc<RelationalConnector>);

#[async_trait]
impl Operation for ReadUserLedgerRecords {
    fn plugin(&self) -> &str {
        SQLITE_PLUGIN
    }

    fn name(&self) -> &str {
        "ReadUserLedgerRecords"
    }

    fn description(&self) -> &str {
        r#"Read the daily income/expense records of one user from the SQLite database as JSON. Example: [{"userName":"User A","recordDate":"2023-01-01","typeName":"Income","itemName":"Salary","amount":30000,"remark":""}]"#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "userName": { "type": "string", "description": "the user name to query" }
            },
            "required": ["userName"]
        })
    }

    async fn invoke(&self, params: Value) -> String {
        let user_name = params["userName"].as_str().unwrap_or_default();
        self.0.read_user_ledger_records(user_name).await
    }
}
