use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn reset_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema reset successfully");
    Ok(())
}

/// Creates the schema unless it is already present
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    if schema_exists(conn)? {
        log::debug!("Database schema already present");
        return Ok(());
    }
    reset_database(conn)
}

fn schema_exists(conn: &Connection) -> Result<bool> {
    let sql = "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'seasons'";
    let count: i64 = conn
        .query_row(sql, [], |row| row.get(0))
        .context("Failed to inspect database schema")?;
    Ok(count > 0)
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
