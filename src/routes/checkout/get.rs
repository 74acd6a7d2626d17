use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

use crate::checkout::lock;
use crate::session_state::CheckoutSession;
use crate::view::{CheckoutView, FormMessage};

pub async fn checkout_page(session: CheckoutSession) -> HttpResponse {
    let view = CheckoutView::from(&*lock(session.controller()));
    let response = HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(&view));
    session.attach(response)
}

fn render_page(view: &CheckoutView) -> String {
    let panel = match view {
        CheckoutView::Success {
            message,
            email,
            amount,
        } => render_success(message, email, amount),
        CheckoutView::Form {
            email,
            amount,
            submit_label,
            submit_disabled,
            message,
        } => {
            let message_html = message.as_ref().map(render_message).unwrap_or_default();
            // only an in-flight request can be cancelled
            let cancel_html = if *submit_disabled {
                r#"<form action="/checkout/cancel" method="post"><button type="submit" class="cancel-button">Cancel</button></form>"#
            } else {
                ""
            };
            format!(
                r#"<form class="checkout-form" action="/checkout" method="post">
        <h2>Payment Details</h2>
        <label for="email">Email Address *</label>
        <input type="email" id="email" name="email" placeholder="your.email@example.com" value="{email}" required>
        <label for="amount">Purchase Amount ($) *</label>
        <input type="number" id="amount" name="amount" placeholder="99.99" step="0.01" min="0" value="{amount}" required>
        <button type="submit" class="submit-button"{disabled}>{submit_label}</button>
        {message_html}
        <p class="security-note">&#128274; Your payment information is secure and encrypted</p>
    </form>
    {cancel_html}"#,
                email = escape_html(email),
                amount = escape_html(amount),
                disabled = if *submit_disabled { " disabled" } else { "" },
            )
        }
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Secure Checkout</title>
</head>
<body>
    <section class="checkout-hero">
        <h1>Secure Checkout</h1>
        <p>Complete your purchase safely and securely</p>
    </section>
    {panel}
    <div class="security-features">
        <h3>Why Shop With Us?</h3>
        <div class="feature-item"><h4>SSL Encrypted</h4><p>All transactions are 256-bit encrypted</p></div>
        <div class="feature-item"><h4>Verified Secure</h4><p>Certified by trusted payment processors</p></div>
        <div class="feature-item"><h4>Fraud Protection</h4><p>Advanced fraud detection systems</p></div>
        <div class="feature-item"><h4>Mobile Safe</h4><p>Safe shopping on all devices</p></div>
    </div>
</body>
</html>"#
    )
}

fn render_message(message: &FormMessage) -> String {
    format!(
        r#"<p class="form-msg {}">{}</p>"#,
        message.kind.as_str(),
        escape_html(&message.text)
    )
}

fn render_success(message: &FormMessage, email: &str, amount: &str) -> String {
    format!(
        r#"<div class="success-message">
        <div class="success-icon">&#10003;</div>
        <h2>Payment Successful!</h2>
        <p>Thank you for your purchase</p>
        {message}
        <p class="success-details">A confirmation email has been sent to <strong>{email}</strong></p>
        <p class="amount-paid">Amount Paid: <strong>${amount}</strong></p>
        <form action="/checkout/new" method="post"><button type="submit">Make another payment</button></form>
    </div>"#,
        message = render_message(message),
        email = escape_html(email),
        amount = escape_html(amount),
    )
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
