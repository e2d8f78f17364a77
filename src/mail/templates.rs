//! HTML bodies for outbound notifications.

const STYLE: &str = r#"
    body { background-color: #ffffff; font-family: Arial, sans-serif; font-size: 16px; line-height: 1.4; color: #333333; margin: 0; padding: 0; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; text-align: center; }
    .message { font-size: 18px; font-weight: bold; margin-bottom: 20px; }
    .body { font-size: 16px; margin-bottom: 20px; }
    .support { font-size: 14px; color: #999999; margin-top: 20px; }
    .highlight { font-weight: bold; }
"#;

pub fn course_enrollment_email(course_name: &str, student_name: &str) -> String {
    let course_name = escape(course_name);
    let student_name = escape(student_name);

    layout(
        "Course Registration Confirmation",
        &format!(
            r#"<div class="message">Course Registration Confirmation</div>
        <div class="body">
            <p>Dear {student_name},</p>
            <p>You have successfully registered for the course <span class="highlight">"{course_name}"</span>. We are excited to have you as a participant!</p>
            <p>Please log in to your learning dashboard to access the course materials and start your learning journey.</p>
        </div>"#
        ),
    )
}

/// `amount` is in the smallest unit of `currency` (an ISO 4217 code), as reported
/// by the gateway.
pub fn payment_success_email(
    student_name: &str,
    amount: u64,
    currency: &str,
    order_id: &str,
    payment_id: &str,
) -> String {
    let student_name = escape(student_name);
    let currency = escape(currency);
    let order_id = escape(order_id);
    let payment_id = escape(payment_id);
    let major = amount / 100;
    let minor = amount % 100;

    layout(
        "Payment Confirmation",
        &format!(
            r#"<div class="message">Course Payment Confirmation</div>
        <div class="body">
            <p>Dear {student_name},</p>
            <p>We have received a payment of <span class="highlight">{currency} {major}.{minor:02}</span>.</p>
            <p>Your Payment ID is <b>{payment_id}</b></p>
            <p>Your Order ID is <b>{order_id}</b></p>
        </div>"#
        ),
    )
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        {content}
        <div class="support">If you have any questions or need assistance, please reply to this email.</div>
    </div>
</body>
</html>"#
    )
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
