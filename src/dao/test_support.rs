use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

/**
 * Initialize the database connection pool and apply migrations.
 */
pub async fn init_db() -> PgPool {
    dotenv::from_filename("./sqlx-postgresql-migration/.env-test").ok();
    let pool = PgPool::connect(dotenv::var("DATABASE_URL").unwrap().as_str()).await.unwrap();
    sqlx::migrate!("./sqlx-postgresql-migration/migrations").run(&pool).await.unwrap();
    pool
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/**
 * Inserts an analyst whose username and email derive from `tag`.
 */
pub async fn add_test_analyst(connection: &mut PgConnection, tag: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO analyst (names, surnames, username, email) VALUES ('Test', 'Analyst', $1, $2) RETURNING id")
        .bind(tag)
        .bind(format!("{tag}@lab.test"))
        .fetch_one(connection)
        .await
        .unwrap();
    id
}

pub async fn add_test_species(connection: &mut PgConnection, scientific_name: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO species (scientific_name) VALUES ($1) RETURNING id").bind(scientific_name).fetch_one(connection).await.unwrap();
    id
}

pub async fn add_test_sample(connection: &mut PgConnection, analyst_id: i64, extraction_date: NaiveDate) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO sample (analyst_id, extraction_date) VALUES ($1, $2) RETURNING id")
        .bind(analyst_id)
        .bind(extraction_date)
        .fetch_one(connection)
        .await
        .unwrap();
    id
}
