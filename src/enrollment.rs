use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::models::{Course, CourseProgress, User};
use crate::db::repo;
use crate::mail::{templates, Email, Mailer};

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("course {0} not found")]
    CourseNotFound(String),

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user {user_id} already enrolled in course {course_id}")]
    AlreadyEnrolled { course_id: String, user_id: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Records written by a successful enrollment, as they stand after commit.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub course: Course,
    pub user: User,
    pub progress: CourseProgress,
}

/// Enrolls `user_id` in `course_id`.
///
/// The course roster, the progress record and the user's course list are written
/// in one transaction, so either all three exist afterwards or none do.
///
/// The transaction takes SQLite's write lock up front, so the roster check below
/// and the inserts that follow see no interleaved enrollment. A concurrent caller
/// waits for the lock and then fails with [`EnrollmentError::AlreadyEnrolled`].
pub async fn enroll_student(
    pool: &SqlitePool,
    course_id: &str,
    user_id: &str,
) -> Result<Enrollment, EnrollmentError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let mut course = repo::find_course(&mut tx, course_id)
        .await?
        .ok_or_else(|| EnrollmentError::CourseNotFound(course_id.to_string()))?;

    if course.students_enrolled.iter().any(|id| id == user_id) {
        return Err(EnrollmentError::AlreadyEnrolled {
            course_id: course_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    let mut user = repo::find_user(&mut tx, user_id)
        .await?
        .ok_or_else(|| EnrollmentError::UserNotFound(user_id.to_string()))?;

    repo::add_student_to_course(&mut tx, course_id, user_id)
        .await
        .map_err(|e| {
            if repo::is_unique_violation(&e) {
                EnrollmentError::AlreadyEnrolled {
                    course_id: course_id.to_string(),
                    user_id: user_id.to_string(),
                }
            } else {
                EnrollmentError::Database(e)
            }
        })?;

    let progress = repo::create_course_progress(&mut tx, course_id, user_id).await?;
    repo::add_course_to_user(&mut tx, user_id, course_id).await?;

    tx.commit().await?;

    course.students_enrolled.push(user_id.to_string());
    user.courses.push(course_id.to_string());
    user.course_progress.push(progress.id.clone());

    tracing::info!(course_id, user_id, progress_id = %progress.id, "student enrolled");

    Ok(Enrollment {
        course,
        user,
        progress,
    })
}

/// Sends the enrollment confirmation. Delivery failures are logged only, since
/// the enrollment itself is already committed.
pub async fn notify_enrolled(mailer: &dyn Mailer, enrollment: &Enrollment) {
    let email = Email {
        to: enrollment.user.email.clone(),
        subject: format!("Successfully Enrolled into {}", enrollment.course.name),
        html: templates::course_enrollment_email(
            &enrollment.course.name,
            &enrollment.user.full_name(),
        ),
    };

    if let Err(e) = mailer.send(email).await {
        tracing::warn!(
            error = %e,
            user_id = %enrollment.user.id,
            course_id = %enrollment.course.id,
            "enrollment email not delivered"
        );
    }
}
