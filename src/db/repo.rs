use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db::models::{Course, CourseProgress, User};

pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            price INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS course_students (
            course_id TEXT NOT NULL REFERENCES courses(id),
            user_id TEXT NOT NULL REFERENCES users(id),
            UNIQUE (course_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_courses (
            user_id TEXT NOT NULL REFERENCES users(id),
            course_id TEXT NOT NULL REFERENCES courses(id),
            UNIQUE (user_id, course_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS course_progress (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL REFERENCES courses(id),
            user_id TEXT NOT NULL REFERENCES users(id),
            completed_videos TEXT NOT NULL,
            UNIQUE (course_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_course(conn: &mut SqliteConnection, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO courses (id, name, price) VALUES (?, ?, ?)")
        .bind(&course.id)
        .bind(&course.name)
        .bind(course.price)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn insert_user(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (id, first_name, last_name, email) VALUES (?, ?, ?, ?)")
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .execute(conn)
        .await?;

    Ok(())
}

/// Loads a course together with its enrolled student ids, in enrollment order.
pub async fn find_course(
    conn: &mut SqliteConnection,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    let course = sqlx::query_as::<_, Course>("SELECT id, name, price FROM courses WHERE id = ?")
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(mut course) = course else {
        return Ok(None);
    };

    course.students_enrolled = sqlx::query_scalar::<_, String>(
        "SELECT user_id FROM course_students WHERE course_id = ? ORDER BY rowid",
    )
    .bind(course_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(course))
}

/// Loads a user together with enrolled course ids and progress record ids.
pub async fn find_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, first_name, last_name, email FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut user) = user else {
        return Ok(None);
    };

    user.courses = sqlx::query_scalar::<_, String>(
        "SELECT course_id FROM user_courses WHERE user_id = ? ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    user.course_progress = sqlx::query_scalar::<_, String>(
        "SELECT id FROM course_progress WHERE user_id = ? ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(user))
}

pub async fn add_student_to_course(
    conn: &mut SqliteConnection,
    course_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO course_students (course_id, user_id) VALUES (?, ?)")
        .bind(course_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn add_course_to_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO user_courses (user_id, course_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(course_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn create_course_progress(
    conn: &mut SqliteConnection,
    course_id: &str,
    user_id: &str,
) -> Result<CourseProgress, sqlx::Error> {
    let progress = CourseProgress {
        id: Uuid::new_v4().to_string(),
        course_id: course_id.to_string(),
        user_id: user_id.to_string(),
        completed_videos: Vec::new(),
    };

    sqlx::query(
        r#"
        INSERT INTO course_progress (id, course_id, user_id, completed_videos)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&progress.id)
    .bind(&progress.course_id)
    .bind(&progress.user_id)
    .bind(sqlx::types::Json(&progress.completed_videos))
    .execute(conn)
    .await?;

    Ok(progress)
}

pub async fn list_progress(
    conn: &mut SqliteConnection,
    course_id: &str,
    user_id: &str,
) -> Result<Vec<CourseProgress>, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(
        r#"
        SELECT id, course_id, user_id, completed_videos
        FROM course_progress
        WHERE course_id = ? AND user_id = ?
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_all(conn)
    .await
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
