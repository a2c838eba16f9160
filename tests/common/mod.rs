//! Shared fixtures: a seeded SQLite database, a text file and a config.

#![allow(dead_code)]

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEMO_TEXT: &str = "Store opening hours: 09:00-18:00\n營業時間週一至週五\n";

const SCHEMA: [&str; 2] = [
    "CREATE TABLE Scores (StudentName TEXT, Score INTEGER)",
    "CREATE TABLE DailyRecords (UserName TEXT, RecordDate TEXT, TypeName TEXT, ItemName TEXT, Amount INTEGER, Remark TEXT)",
];

async fn execute_all(path: &Path, statements: &[&str]) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    for stmt in statements {
        sqlx::query(stmt).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
}

pub async fn seed_db(path: &Path) {
    let mut stmts = SCHEMA.to_vec();
    stmts.extend([
        "INSERT INTO Scores VALUES ('Alice', 90), ('Bob', 85)",
        "INSERT INTO DailyRecords VALUES ('Alice', '2023-01-01', 'Income', 'Salary', 30000, '')",
    ]);
    execute_all(path, &stmts).await;
}

/// Both tables, no rows.
pub async fn seed_empty_db(path: &Path) {
    execute_all(path, &SCHEMA).await;
}

/// Temp dir with `data/demo.txt`, `data/demodb.sqlite` and
/// `config/ctxs.toml`. The PDF path is configured but left absent.
pub async fn setup_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let data = root.join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::create_dir_all(root.join("config")).unwrap();

    std::fs::write(data.join("demo.txt"), DEMO_TEXT).unwrap();
    seed_db(&data.join("demodb.sqlite")).await;

    let config = format!(
        r#"[sources]
text_file = "{root}/data/demo.txt"
pdf_file = "{root}/data/demo.pdf"
database = "{root}/data/demodb.sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        root = root.display()
    );
    let config_path = root.join("config").join("ctxs.toml");
    std::fs::write(&config_path, config).unwrap();

    (tmp, config_path)
}
