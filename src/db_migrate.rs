use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use scheduling_db::schema::initialize_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;
    let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
        .unwrap_or_else(|_| "1".to_string())
        .parse()
        .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

    println!("Connecting to database...");
    let db_pool = scheduling_db::create_pool(&database_url, max_connections).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    Ok(())
}
