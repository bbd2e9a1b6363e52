pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};

use crate::error::AppError;
use crate::password::hash_password;

pub const DEFAULT_ADMIN_FACULTY_ID: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory database with migrations applied.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    // the database lives only as long as its one connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(db: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(db).await?;
    Ok(())
}

/// Default admin, initial labs, and a full 7x8 template for every lab.
pub async fn seed(db: &SqlitePool, lab_count: u32) -> Result<(), AppError> {
    if repository::find_user_by_faculty_id(db, DEFAULT_ADMIN_FACULTY_ID)
        .await?
        .is_none()
    {
        repository::insert_user(
            db,
            "Admin",
            DEFAULT_ADMIN_FACULTY_ID,
            &hash_password(DEFAULT_ADMIN_PASSWORD),
            true,
        )
        .await?;
        warn!("Admin user created: admin / admin (change password ASAP)");
    }

    if repository::count_labs(db).await? == 0 {
        for i in 1..=lab_count {
            repository::insert_lab(db, &format!("Lab {}", i)).await?;
        }
        info!("Created {} initial labs", lab_count);
    }

    let mut filled = 0;
    for lab in repository::fetch_labs(db).await? {
        filled += repository::fill_missing_slots(db, lab.id).await?;
    }
    if filled > 0 {
        info!("Filled {} missing timetable slots", filled);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        seed(&pool, 3).await.expect("Failed to seed");
        seed(&pool, 3).await.expect("Failed to seed twice");

        let labs = repository::fetch_labs(&pool).await.unwrap();
        assert_eq!(labs.len(), 3);
        assert_eq!(labs[0].name, "Lab 1");

        for lab in labs {
            let slots = repository::fetch_lab_slots(&pool, lab.id).await.unwrap();
            assert_eq!(slots.len(), 56);
        }

        let admin = repository::find_user_by_faculty_id(&pool, "admin")
            .await
            .unwrap()
            .expect("admin missing");
        assert!(admin.is_admin);
        assert!(verify_password("admin", &admin.password_hash));
    }
}
