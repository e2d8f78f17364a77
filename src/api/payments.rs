use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::error::AppError;
use crate::api::extract::ApiJson;
use crate::api::server::AppState;
use crate::db::models::Course;
use crate::db::repo;
use crate::enrollment;
use crate::mail::{templates, Email};
use crate::payments::{signature, OrderRequest, SignatureError};

#[derive(Debug, Deserialize)]
pub struct CapturePaymentRequest {
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(rename = "courseID", default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessEmailRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
}

/// Validates the requested courses and opens a gateway order for them.
pub async fn capture_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CapturePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.courses.is_empty() {
        return Err(AppError::BadRequest("Please Provide Course ID"));
    }

    let mut conn = state.db.acquire().await?;
    let mut courses: Vec<Course> = Vec::with_capacity(payload.courses.len());

    for course_id in &payload.courses {
        // Listing a course twice must not charge it twice.
        if courses.iter().any(|c| &c.id == course_id) {
            continue;
        }

        let course = repo::find_course(&mut conn, course_id)
            .await?
            .ok_or(AppError::NotFound("Could not find the Course"))?;

        if course.students_enrolled.contains(&user.id) {
            return Err(AppError::AlreadyEnrolled);
        }

        courses.push(course);
    }
    drop(conn);

    let amount = order_amount(&courses).ok_or(AppError::BadRequest("Invalid course price"))?;

    let request = OrderRequest {
        amount,
        currency: state.currency.clone(),
        receipt: Uuid::new_v4().simple().to_string(),
    };

    let order = state.gateway.create_order(&request).await?;
    tracing::info!(user_id = %user.id, order_id = %order.id, amount, "payment order created");

    Ok(Json(json!({
        "success": true,
        "data": order,
    })))
}

/// Checks the gateway's checkout signature and enrolls the caller in the course.
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(payload): ApiJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let course_id = non_empty(payload.course_id).ok_or(AppError::BadRequest("Payment Failed"))?;

    let (Some(order_id), Some(payment_id), Some(sig)) = (
        non_empty(payload.razorpay_order_id),
        non_empty(payload.razorpay_payment_id),
        non_empty(payload.razorpay_signature),
    ) else {
        return Err(AppError::Signature(SignatureError::Missing));
    };

    signature::verify(&state.key_secret, &order_id, &payment_id, &sig)?;

    let enrollment = enrollment::enroll_student(&state.db, &course_id, &user.id).await?;
    enrollment::notify_enrolled(state.mailer.as_ref(), &enrollment).await;

    tracing::info!(user_id = %user.id, %course_id, %order_id, %payment_id, "payment verified");

    Ok(Json(json!({
        "success": true,
        "message": "Payment Verified",
    })))
}

/// Emails the caller a receipt for a completed payment.
pub async fn send_payment_success_email(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(payload): ApiJson<PaymentSuccessEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(order_id), Some(payment_id), Some(amount)) = (
        non_empty(payload.order_id),
        non_empty(payload.payment_id),
        payload.amount,
    ) else {
        return Err(AppError::BadRequest("Please provide all the details"));
    };

    let mut conn = state.db.acquire().await?;
    let student = repo::find_user(&mut conn, &user.id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    drop(conn);

    state
        .mailer
        .send(Email {
            to: student.email.clone(),
            subject: "Payment Received".to_string(),
            html: templates::payment_success_email(
                &student.full_name(),
                amount,
                &state.currency,
                &order_id,
                &payment_id,
            ),
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment email sent",
    })))
}

/// Total of the course prices in the currency's smallest unit, or `None` on a
/// negative price or overflow.
pub fn order_amount(courses: &[Course]) -> Option<u64> {
    courses.iter().try_fold(0u64, |total, course| {
        let price = u64::try_from(course.price).ok()?;
        total.checked_add(price.checked_mul(100)?)
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
