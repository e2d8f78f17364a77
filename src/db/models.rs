use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Price in whole currency units.
    pub price: i64,
    #[sqlx(skip)]
    pub students_enrolled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(skip)]
    pub courses: Vec<String>,
    #[sqlx(skip)]
    pub course_progress: Vec<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseProgress {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    #[sqlx(json)]
    pub completed_videos: Vec<String>,
}
