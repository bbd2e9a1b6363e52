use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use lab_timetable::clock::FixedClock;
use lab_timetable::db::{self, repository};
use lab_timetable::services::CleanupScheduler;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_run_once_removes_only_past_bookings() {
    let pool = db::connect_in_memory().await.expect("Failed to create database");
    let user = repository::insert_user(&pool, "Asha", "f1", "x", false).await.unwrap();
    let lab = repository::insert_lab(&pool, "Lab 1").await.unwrap();
    let slot = repository::fetch_lab_slots(&pool, lab.id).await.unwrap()[0].clone();

    repository::insert_booking(&pool, slot.id, date("2026-10-12"), user, None).await.unwrap();
    repository::insert_booking(&pool, slot.id, date("2026-10-19"), user, None).await.unwrap();

    let clock = Arc::new(FixedClock::new(date("2026-10-17")));
    let scheduler = CleanupScheduler::new(pool.clone(), clock, 60);

    assert_eq!(scheduler.run_once().await.expect("cleanup failed"), 1);
    assert!(repository::find_booking(&pool, slot.id, date("2026-10-19")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_scheduler_short_interval() {
    let pool = db::connect_in_memory().await.expect("Failed to create database");
    let user = repository::insert_user(&pool, "Asha", "f1", "x", false).await.unwrap();
    let lab = repository::insert_lab(&pool, "Lab 1").await.unwrap();
    let slot = repository::fetch_lab_slots(&pool, lab.id).await.unwrap()[0].clone();
    repository::insert_booking(&pool, slot.id, date("2026-10-05"), user, None).await.unwrap();

    let clock = Arc::new(FixedClock::new(date("2026-10-17")));
    let scheduler = CleanupScheduler::new(pool.clone(), clock, 1);

    let scheduler_task = tokio::spawn(async move {
        scheduler.start().await;
    });

    tokio::time::sleep(Duration::from_millis(2500)).await;
    scheduler_task.abort();

    assert!(repository::find_booking(&pool, slot.id, date("2026-10-05")).await.unwrap().is_none());
}
