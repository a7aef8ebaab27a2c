use anyhow::Result;
use sqlx::SqlitePool;

/// Creates the readings table and its index. Safe to run repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // `temp`/`feels_like` hold Celsius, `main` the condition label,
    // `dt` the provider epoch and `date` ingestion time in Unix millis.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city TEXT NOT NULL,
            temp REAL NOT NULL,
            feels_like REAL NOT NULL,
            main TEXT NOT NULL,
            dt INTEGER NOT NULL,
            date INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_weather_city_date ON weather(city, date)")
        .execute(pool)
        .await?;

    Ok(())
}
