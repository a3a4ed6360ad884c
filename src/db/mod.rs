use sqlx::mysql::MySqlPool;
use tracing::warn;

pub mod member;
pub mod transaction;

/// Initialize the MySQL connection pool and create tables
pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    create_tables(&pool).await?;
    Ok(pool)
}

/// Read and execute the schema SQL file statement by statement
async fn execute_sql_file(pool: &MySqlPool, file_path: &str) -> Result<(), sqlx::Error> {
    let sql_content = std::fs::read_to_string(file_path).map_err(sqlx::Error::Io)?;

    for statement in sql_content.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::raw_sql(trimmed).execute(pool).await?;
        }
    }

    Ok(())
}

/// Create all database tables
async fn create_tables(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    if let Err(e) = execute_sql_file(pool, "migrations/create_tables.sql").await {
        warn!("Failed to create tables: {}", e);
        return Err(e);
    }
    Ok(())
}
