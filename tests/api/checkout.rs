use std::time::Duration;

use wiremock::matchers::{any, body_json, header_exists, method, path};
use wiremock::{Mock, MockBuilder, ResponseTemplate};

use crate::helpers::{assert_is_redirect_to, spawn_app, PAYMENT_PATH};

fn when_processing_a_payment() -> MockBuilder {
    Mock::given(path(PAYMENT_PATH)).and(method("POST"))
}

#[tokio::test]
async fn checkout_page_shows_an_empty_form() {
    let app = spawn_app().await;

    let html_page = app.get_checkout_html().await;

    assert!(html_page.contains(r#"<button type="submit" class="submit-button">Complete Purchase</button>"#));
    assert!(html_page.contains(r#"name="email" placeholder="your.email@example.com" value="""#));
    assert!(!html_page.contains("form-msg"));
}

#[tokio::test]
async fn missing_fields_are_reported_without_calling_the_endpoint() {
    // arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.payment_server)
        .await;
    let test_cases = vec![
        ("", "10.00", "missing email"),
        ("ursula_le_guin@gmail.com", "", "missing amount"),
        ("", "", "missing both email and amount"),
    ];

    for (email, amount, description) in test_cases {
        // act
        let response = app.post_checkout(email, amount).await;

        // assert
        assert_is_redirect_to(&response, "/checkout");
        let html_page = app.get_checkout_html().await;
        assert!(
            html_page.contains(r#"<p class="form-msg error">Please fill in all fields</p>"#),
            "The validation message was not shown when the form had a {}",
            description
        );
        assert!(html_page.contains(&format!(r#"value="{}""#, email)));
    }
}

#[tokio::test]
async fn a_successful_payment_shows_the_confirmation() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .and(header_exists("Idempotency-Key"))
        .and(body_json(serde_json::json!({
            "email": "a@b.com",
            "amount": "10.00"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "Thanks!" })),
        )
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // act
    let response = app.post_checkout("a@b.com", "10.00").await;

    // assert
    assert_is_redirect_to(&response, "/checkout");
    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains("Payment Successful!"));
    assert!(html_page.contains(r#"<p class="form-msg success">Thanks!</p>"#));
    assert!(html_page.contains("<strong>a@b.com</strong>"));
    assert!(html_page.contains("Amount Paid: <strong>$10.00</strong>"));
    assert!(!html_page.contains("checkout-form"));
}

#[tokio::test]
async fn a_success_without_a_message_uses_the_default_one() {
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    app.post_checkout("a@b.com", "10.00").await;

    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains("Payment submitted successfully!"));
}

#[tokio::test]
async fn starting_a_new_checkout_shows_an_empty_form_again() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.payment_server)
        .await;
    app.post_checkout("a@b.com", "10.00").await;

    // act
    let response = app.post_new_checkout().await;

    // assert
    assert_is_redirect_to(&response, "/checkout");
    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains("Complete Purchase"));
    assert!(html_page.contains(r#"name="amount" placeholder="99.99" step="0.01" min="0" value="""#));
    assert!(!html_page.contains("Payment Successful!"));
}

#[tokio::test]
async fn a_declined_payment_keeps_the_input_and_shows_the_reason() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(serde_json::json!({ "message": "Card declined" })),
        )
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // act
    app.post_checkout("a@b.com", "10.00").await;

    // assert
    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains(r#"<p class="form-msg error">Card declined</p>"#));
    assert!(html_page.contains(r#"value="a@b.com""#));
    assert!(html_page.contains(r#"value="10.00""#));
}

#[tokio::test]
async fn an_unreachable_endpoint_shows_the_generic_error() {
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    app.post_checkout("a@b.com", "10.00").await;

    let html_page = app.get_checkout_html().await;
    assert!(html_page
        .contains(r#"<p class="form-msg error">Something went wrong. Please try again.</p>"#));
}

#[tokio::test]
async fn concurrent_form_submission_charges_once() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // act
    let (first, second) = tokio::join!(app.post_checkout("a@b.com", "10.00"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        app.post_checkout("a@b.com", "10.00").await
    });

    // assert
    assert_is_redirect_to(&first, "/checkout");
    assert_is_redirect_to(&second, "/checkout");
    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains("Payment Successful!"));
    // Mock verifies on drop that the endpoint was hit exactly once
}

#[tokio::test]
async fn the_page_shows_processing_while_a_payment_is_in_flight() {
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .mount(&app.payment_server)
        .await;

    let (_, html_page) = tokio::join!(app.post_checkout("a@b.com", "10.00"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        app.get_checkout_html().await
    });

    assert!(html_page
        .contains(r#"<button type="submit" class="submit-button" disabled>Processing...</button>"#));
}

#[tokio::test]
async fn cancelling_returns_to_the_filled_in_form() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .mount(&app.payment_server)
        .await;

    // act
    let (submitted, cancelled) = tokio::join!(app.post_checkout("a@b.com", "10.00"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        app.post_cancel().await
    });

    // assert
    assert_is_redirect_to(&submitted, "/checkout");
    assert_is_redirect_to(&cancelled, "/checkout");
    let html_page = app.get_checkout_html().await;
    assert!(html_page.contains("Complete Purchase"));
    assert!(html_page.contains(r#"value="a@b.com""#));
    assert!(!html_page.contains("form-msg"));
}

#[tokio::test]
async fn another_visitor_does_not_see_someone_elses_checkout() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "Thanks!" })),
        )
        .expect(1)
        .mount(&app.payment_server)
        .await;
    let other_visitor = app.another_visitor().await;

    // act
    app.post_checkout("a@b.com", "10.00").await;

    // assert
    assert!(app.get_checkout_html().await.contains("Payment Successful!"));
    let other_page = app.get_checkout_html_as(&other_visitor).await;
    assert!(!other_page.contains("Payment Successful!"));
    assert!(!other_page.contains("a@b.com"));
    assert!(other_page.contains(r#"<button type="submit" class="submit-button">Complete Purchase</button>"#));
}

#[tokio::test]
async fn two_visitors_can_pay_at_the_same_time() {
    // arrange
    let app = spawn_app().await;
    when_processing_a_payment()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .expect(2)
        .mount(&app.payment_server)
        .await;
    let other_visitor = app.another_visitor().await;

    // act
    let (first, second) = tokio::join!(app.post_checkout("a@b.com", "10.00"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        other_visitor
            .post(&format!("{}/checkout", &app.address))
            .form(&[("email", "c@d.com"), ("amount", "20.00")])
            .send()
            .await
            .expect("Failed to execute request")
    });

    // assert
    assert_is_redirect_to(&first, "/checkout");
    assert_is_redirect_to(&second, "/checkout");
    assert!(app.get_checkout_html().await.contains("<strong>a@b.com</strong>"));
    assert!(app
        .get_checkout_html_as(&other_visitor)
        .await
        .contains("<strong>c@d.com</strong>"));
}

#[tokio::test]
async fn an_unknown_form_field_is_rejected_without_calling_the_endpoint() {
    // arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.payment_server)
        .await;

    // act
    let response = app
        .post_checkout_form(&[
            ("email", "a@b.com"),
            ("amount", "10.00"),
            ("card_number", "4242424242424242"),
        ])
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 400);
    let html_page = app.get_checkout_html().await;
    assert!(!html_page.contains("a@b.com"));
}
