mod orders;

use sqlx::{MySql, Pool};

pub type DbPool = Pool<MySql>;

pub use orders::*;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    Pool::<MySql>::connect(database_url).await
}
