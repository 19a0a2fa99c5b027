//! Listing, cancelling, status changes and the admin calendar feed.

use chrono::Datelike;
use salvo::http::StatusCode;

use super::helpers::*;

fn booked_id(response: TestResponse) -> String {
    response.assert_status(StatusCode::CREATED).json()["appointment"]["id"]
        .as_str()
        .expect("appointment id")
        .to_string()
}

#[test_log::test(tokio::test)]
async fn cancelling_frees_the_slot_once() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    seed_monday_hours(&service).await;
    let id = booked_id(book(&service, ana, trim, monday, "10:00").await);

    let slots = slots_for(&service, monday, trim).await.string_list("slots");
    assert!(!slots.contains(&"10:00".to_string()));

    let response = TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{id}/cancel"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.json()["appointment"]["status"], "cancelled");

    let slots = slots_for(&service, monday, trim).await.string_list("slots");
    assert!(slots.contains(&"10:00".to_string()));

    TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{id}/cancel"))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn reinstating_into_a_taken_slot_conflicts() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let ben = db.seed_client("Ben", "ben@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    let first = booked_id(book(&service, ana, trim, monday, "10:00").await);
    TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{first}/cancel"))
        .send(&service)
        .await
        .assert_success();

    book(&service, ben, trim, monday, "10:00")
        .await
        .assert_status(StatusCode::CREATED);

    TestRequest::put(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{first}/status"))
        .json(&serde_json::json!({ "status": "confirmed" }))
        .send(&service)
        .await
        .assert_status(StatusCode::CONFLICT);

    // Moving between non-holding statuses needs no check.
    let response = TestRequest::put(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{first}/status"))
        .json(&serde_json::json!({ "status": "no-show" }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.json()["appointment"]["status"], "no-show");
}

#[test_log::test(tokio::test)]
async fn list_filters_by_client_and_date() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let ben = db.seed_client("Ben", "ben@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    book(&service, ana, trim, monday, "09:00").await.assert_success();
    book(&service, ben, trim, monday, "09:30").await.assert_success();

    let all = TestRequest::get(APPOINTMENTS_ROUTE_PREFIX).send(&service).await.assert_success();
    assert_eq!(all.json()["appointments"].as_array().map(Vec::len), Some(2));

    let ana_only = TestRequest::get(&format!("{APPOINTMENTS_ROUTE_PREFIX}?clientId={ana}&date={monday}"))
        .send(&service)
        .await
        .assert_success();
    let listed = ana_only.json();
    assert_eq!(listed["appointments"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["appointments"][0]["startTime"], "09:00");
}

#[test_log::test(tokio::test)]
async fn delete_removes_and_then_404s() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");

    let id = booked_id(book(&service, ana, trim, upcoming_monday(), "10:00").await);

    TestRequest::delete(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("deleted");

    TestRequest::delete(&format!("{APPOINTMENTS_ROUTE_PREFIX}/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn calendar_feed_joins_client_and_service() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    seed_monday_hours(&service).await;
    book(&service, ana, trim, monday, "10:00").await.assert_success();
    TestRequest::post(&format!("{AVAILABILITY_ROUTE_PREFIX}/blocked"))
        .json(&serde_json::json!({ "isRecurring": true, "recurringDayOfWeek": 0, "reason": "Closed Sundays" }))
        .send(&service)
        .await
        .assert_success();

    let response = TestRequest::get(&format!(
        "{AVAILABILITY_ROUTE_PREFIX}/calendar?month={}&year={}",
        monday.month(),
        monday.year()
    ))
    .send(&service)
    .await
    .assert_status(StatusCode::OK);

    let feed = response.json();
    assert_eq!(feed["appointments"][0]["client"]["name"], "Ana");
    assert_eq!(feed["appointments"][0]["service"]["name"], "Trim");
    assert_eq!(feed["blockedDates"][0]["reason"], "Closed Sundays");
    assert_eq!(feed["availability"][0]["dayOfWeek"], 1);
}
