use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{
    Booking, BookingWithUser, Lab, Notification, SlotStatus, TemplateSlot, User, UserSummary,
    WeekendDefault, WeekendOverride,
};
use crate::week::{Day, PERIODS_PER_DAY};

// ---------- users ----------

pub async fn find_user_by_faculty_id(
    db: &SqlitePool,
    faculty_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, faculty_id, password_hash, is_admin FROM users WHERE faculty_id = ?",
    )
    .bind(faculty_id)
    .fetch_optional(db)
    .await
}

pub async fn find_user_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, faculty_id, password_hash, is_admin FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_users(db: &SqlitePool) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, faculty_id, is_admin FROM users ORDER BY id",
    )
    .fetch_all(db)
    .await
}

pub async fn insert_user(
    db: &SqlitePool,
    name: &str,
    faculty_id: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (name, faculty_id, password_hash, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(faculty_id)
    .bind(password_hash)
    .bind(is_admin)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_user(db: &SqlitePool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET name = ?, password_hash = ?, is_admin = ? WHERE id = ?")
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn count_admins(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = 1")
        .fetch_one(db)
        .await
}

/// Removes the user and their bookings; authorship on overrides and
/// notifications is cleared.
pub async fn delete_user(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM bookings WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE weekend_overrides SET created_by = NULL WHERE created_by = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE notifications SET created_by = NULL WHERE created_by = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

// ---------- labs ----------

pub async fn fetch_labs(db: &SqlitePool) -> Result<Vec<Lab>, sqlx::Error> {
    sqlx::query_as::<_, Lab>("SELECT id, name FROM labs ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn find_lab(db: &SqlitePool, id: i64) -> Result<Option<Lab>, sqlx::Error> {
    sqlx::query_as::<_, Lab>("SELECT id, name FROM labs WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn count_labs(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM labs")
        .fetch_one(db)
        .await
}

/// Creates the lab together with its Free weekly template.
pub async fn insert_lab(db: &SqlitePool, name: &str) -> Result<Lab, sqlx::Error> {
    let mut tx = db.begin().await?;

    let id = sqlx::query("INSERT INTO labs (name) VALUES (?)")
        .bind(name)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
    insert_template_slots(&mut tx, id).await?;

    tx.commit().await?;
    Ok(Lab {
        id,
        name: name.to_string(),
    })
}

pub async fn rename_lab(db: &SqlitePool, id: i64, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE labs SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

/// Deletes the lab with its bookings, template, weekend defaults and overrides.
pub async fn delete_lab(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query(
        "DELETE FROM bookings WHERE timetable_id IN (SELECT id FROM timetable_slots WHERE lab_id = ?)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM timetable_slots WHERE lab_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM weekend_defaults WHERE lab_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM weekend_overrides WHERE lab_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM labs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

// ---------- template slots ----------

async fn insert_template_slots(conn: &mut SqliteConnection, lab_id: i64) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for day in Day::ALL {
        for period in 1..=PERIODS_PER_DAY {
            inserted += sqlx::query(
                "INSERT OR IGNORE INTO timetable_slots (lab_id, day, period, status) VALUES (?, ?, ?, 'Free')",
            )
            .bind(lab_id)
            .bind(day)
            .bind(period)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        }
    }
    Ok(inserted)
}

/// Adds any (day, period) cell the lab is missing; returns how many were added.
pub async fn fill_missing_slots(db: &SqlitePool, lab_id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = db.begin().await?;
    let inserted = insert_template_slots(&mut tx, lab_id).await?;
    tx.commit().await?;
    Ok(inserted)
}

pub async fn fetch_lab_slots(db: &SqlitePool, lab_id: i64) -> Result<Vec<TemplateSlot>, sqlx::Error> {
    let mut slots = sqlx::query_as::<_, TemplateSlot>(
        "SELECT id, lab_id, day, period, status, class_info FROM timetable_slots WHERE lab_id = ?",
    )
    .bind(lab_id)
    .fetch_all(db)
    .await?;
    slots.sort_by_key(|s| (s.day, s.period));
    Ok(slots)
}

pub async fn find_slot(db: &SqlitePool, id: i64) -> Result<Option<TemplateSlot>, sqlx::Error> {
    sqlx::query_as::<_, TemplateSlot>(
        "SELECT id, lab_id, day, period, status, class_info FROM timetable_slots WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Sets the template status. Marking a slot Regular drops its bookings on or
/// after `today`; the number dropped is returned.
pub async fn set_slot_status(
    db: &SqlitePool,
    id: i64,
    status: SlotStatus,
    class_info: Option<&str>,
    today: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("UPDATE timetable_slots SET status = ?, class_info = ? WHERE id = ?")
        .bind(status)
        .bind(class_info)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let removed = if status == SlotStatus::Regular {
        sqlx::query("DELETE FROM bookings WHERE timetable_id = ? AND date >= ?")
            .bind(id)
            .bind(today)
            .execute(&mut *tx)
            .await?
            .rows_affected()
    } else {
        0
    };

    tx.commit().await?;
    Ok(removed)
}

// ---------- bookings ----------

pub async fn find_booking(
    db: &SqlitePool,
    timetable_id: i64,
    date: NaiveDate,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        "SELECT id, timetable_id, date, user_id, class_info FROM bookings WHERE timetable_id = ? AND date = ?",
    )
    .bind(timetable_id)
    .bind(date)
    .fetch_optional(db)
    .await
}

/// Bookings of a lab's slots dated within `from..=to`, with the booking user's name.
pub async fn fetch_lab_bookings(
    db: &SqlitePool,
    lab_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<BookingWithUser>, sqlx::Error> {
    sqlx::query_as::<_, BookingWithUser>(
        r#"
        SELECT b.id, b.timetable_id, b.date, b.user_id, b.class_info, u.name AS user_name
        FROM bookings b
        JOIN timetable_slots t ON t.id = b.timetable_id
        LEFT JOIN users u ON u.id = b.user_id
        WHERE t.lab_id = ? AND b.date >= ? AND b.date <= ?
        "#,
    )
    .bind(lab_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

pub async fn insert_booking(
    db: &SqlitePool,
    timetable_id: i64,
    date: NaiveDate,
    user_id: i64,
    class_info: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO bookings (timetable_id, date, user_id, class_info) VALUES (?, ?, ?, ?)",
    )
    .bind(timetable_id)
    .bind(date)
    .bind(user_id)
    .bind(class_info)
    .execute(db)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn delete_booking(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

pub async fn delete_bookings_before(db: &SqlitePool, date: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bookings WHERE date < ?")
        .bind(date)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

// ---------- weekend defaults & overrides ----------

/// `lab_id = None` reads the global defaults.
pub async fn fetch_weekend_defaults(
    db: &SqlitePool,
    lab_id: Option<i64>,
) -> Result<Vec<WeekendDefault>, sqlx::Error> {
    sqlx::query_as::<_, WeekendDefault>(
        "SELECT id, lab_id, day, custom_text FROM weekend_defaults WHERE lab_id IS ? ORDER BY id",
    )
    .bind(lab_id)
    .fetch_all(db)
    .await
}

pub async fn find_weekend_default(
    db: &SqlitePool,
    lab_id: Option<i64>,
    day: Day,
) -> Result<Option<WeekendDefault>, sqlx::Error> {
    sqlx::query_as::<_, WeekendDefault>(
        "SELECT id, lab_id, day, custom_text FROM weekend_defaults WHERE lab_id IS ? AND day = ? ORDER BY id LIMIT 1",
    )
    .bind(lab_id)
    .bind(day)
    .fetch_optional(db)
    .await
}

pub async fn upsert_weekend_default(
    db: &SqlitePool,
    lab_id: Option<i64>,
    day: Day,
    custom_text: Option<&str>,
) -> Result<(), sqlx::Error> {
    match find_weekend_default(db, lab_id, day).await? {
        Some(existing) => {
            sqlx::query("UPDATE weekend_defaults SET custom_text = ? WHERE id = ?")
                .bind(custom_text)
                .bind(existing.id)
                .execute(db)
                .await?;
        }
        None => {
            sqlx::query("INSERT INTO weekend_defaults (lab_id, day, custom_text) VALUES (?, ?, ?)")
                .bind(lab_id)
                .bind(day)
                .bind(custom_text)
                .execute(db)
                .await?;
        }
    }
    Ok(())
}

pub async fn fetch_lab_overrides(
    db: &SqlitePool,
    lab_id: i64,
) -> Result<Vec<WeekendOverride>, sqlx::Error> {
    sqlx::query_as::<_, WeekendOverride>(
        "SELECT id, lab_id, day, target_date, override_type, source_day, created_by FROM weekend_overrides WHERE lab_id = ?",
    )
    .bind(lab_id)
    .fetch_all(db)
    .await
}

pub async fn upsert_follow_override(
    db: &SqlitePool,
    lab_id: i64,
    day: Day,
    target_date: NaiveDate,
    source_day: Day,
    created_by: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO weekend_overrides (lab_id, day, target_date, override_type, source_day, created_by)
        VALUES (?, ?, ?, 'follow', ?, ?)
        ON CONFLICT (lab_id, day, target_date) DO UPDATE SET
            override_type = 'follow',
            source_day = excluded.source_day,
            created_by = excluded.created_by
        "#,
    )
    .bind(lab_id)
    .bind(day)
    .bind(target_date)
    .bind(source_day)
    .bind(created_by)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_override(
    db: &SqlitePool,
    lab_id: i64,
    day: Day,
    target_date: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM weekend_overrides WHERE lab_id = ? AND day = ? AND target_date = ?",
    )
    .bind(lab_id)
    .bind(day)
    .bind(target_date)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

// ---------- notifications ----------

pub async fn fetch_notifications(
    db: &SqlitePool,
    active_only: bool,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = if active_only {
        "SELECT id, title, message, active, created_at FROM notifications WHERE active = 1 ORDER BY created_at DESC, id DESC"
    } else {
        "SELECT id, title, message, active, created_at FROM notifications ORDER BY created_at DESC, id DESC"
    };
    sqlx::query_as::<_, Notification>(sql).fetch_all(db).await
}

/// Inserts a notification after deactivating every other one, so at most one
/// is ever active.
pub async fn insert_notification(
    db: &SqlitePool,
    title: Option<&str>,
    message: Option<&str>,
    active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("UPDATE notifications SET active = 0 WHERE active = 1")
        .execute(&mut *tx)
        .await?;
    let id = sqlx::query(
        "INSERT INTO notifications (title, message, active, created_at, created_by) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(message)
    .bind(active)
    .bind(created_at)
    .bind(created_by)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;
    Ok(id)
}

pub async fn delete_notification(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}
