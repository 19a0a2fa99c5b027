//! Booking and hard blocks, including the same-day race.

use chrono::Days;
use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn booking_creates_pending_appointment_from_service() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let client = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let colour = db.seed_service("Colour", 90, 12_000).await.expect("seed service");
    let monday = upcoming_monday();

    let response = TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/book"))
        .json(&serde_json::json!({
            "clientId": client,
            "serviceId": colour,
            "date": monday,
            "startTime": "10:00",
            // Ignored: the service decides the end.
            "endTime": "10:30",
            "clientNotes": "Balayage",
            "inspoPhotos": ["https://img.example.com/1.jpg"]
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    let appointment = &response.json()["appointment"];
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["startTime"], "10:00");
    assert_eq!(appointment["endTime"], "11:30");
    assert_eq!(appointment["durationMinutes"], 90);
    assert_eq!(appointment["totalCostCents"], 12_000);
    assert_eq!(appointment["clientNotes"], "Balayage");
    assert_eq!(appointment["inspoPhotos"][0], "https://img.example.com/1.jpg");
    assert_eq!(appointment["isBlocked"], false);
}

#[test_log::test(tokio::test)]
async fn overlapping_booking_conflicts() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let ben = db.seed_client("Ben", "ben@example.com").await.expect("seed client");
    let colour = db.seed_service("Colour", 60, 9000).await.expect("seed service");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    book(&service, ana, colour, monday, "10:00")
        .await
        .assert_status(StatusCode::CREATED);

    // Different start, same hour.
    book(&service, ben, trim, monday, "10:30")
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_body_contains("10:00");

    // Back to back is fine.
    book(&service, ben, trim, monday, "11:00")
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let ben = db.seed_client("Ben", "ben@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    let (first, second) = tokio::join!(
        book(&service, ana, trim, monday, "14:00"),
        book(&service, ben, trim, monday, "14:00"),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[test_log::test(tokio::test)]
async fn booking_unknown_service_is_not_found() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");

    book(&service, ana, uuid::Uuid::now_v7(), upcoming_monday(), "10:00")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn booking_in_the_past_is_rejected() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");

    let past = upcoming_monday() - Days::new(28);
    book(&service, ana, trim, past, "10:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("past");
}

#[test_log::test(tokio::test)]
async fn booking_outside_opening_hours_is_rejected() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    book(&service, ana, trim, monday, "03:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("not an available slot");

    // Runs past closing time.
    book(&service, ana, trim, monday, "17:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Off the half-hour grid.
    book(&service, ana, trim, monday, "10:15")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // No rule covers Tuesdays.
    book(&service, ana, trim, monday + Days::new(1), "10:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn booking_on_an_all_day_blackout_is_rejected() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    TestRequest::post(&format!("{AVAILABILITY_ROUTE_PREFIX}/blocked"))
        .json(&serde_json::json!({ "date": monday, "reason": "Training day" }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    book(&service, ana, trim, monday, "10:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("not an available slot");

    book(&service, ana, trim, monday + Days::new(7), "10:00")
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn booking_into_a_partial_blackout_is_rejected() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    seed_monday_hours(&service).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let colour = db.seed_service("Colour", 60, 9000).await.expect("seed service");
    let monday = upcoming_monday();

    TestRequest::post(&format!("{AVAILABILITY_ROUTE_PREFIX}/blocked"))
        .json(&serde_json::json!({
            "date": monday,
            "allDay": false,
            "startTime": "12:00",
            "endTime": "13:00",
            "reason": "Lunch"
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    book(&service, ana, colour, monday, "12:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Starts before the blackout but runs into it.
    book(&service, ana, colour, monday, "11:30")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    book(&service, ana, colour, monday, "13:00")
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn hard_block_holds_its_range() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");
    let monday = upcoming_monday();

    seed_monday_hours(&service).await;

    let response = TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/block"))
        .json(&serde_json::json!({
            "date": monday,
            "startTime": "12:00",
            "endTime": "14:00"
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    let block = &response.json()["block"];
    assert_eq!(block["isBlocked"], true);
    assert_eq!(block["status"], "confirmed");
    assert_eq!(block["notes"], "Blocked by admin");
    assert_eq!(block["clientId"], serde_json::Value::Null);

    book(&service, ana, trim, monday, "13:30")
        .await
        .assert_status(StatusCode::CONFLICT);

    let slots = slots_for(&service, monday, trim).await.assert_success().string_list("slots");
    assert!(slots.contains(&"11:30".to_string()));
    assert!(!slots.iter().any(|s| s.as_str() >= "12:00" && s.as_str() < "14:00"));
    assert!(slots.contains(&"14:00".to_string()));
}

#[test_log::test(tokio::test)]
async fn hard_block_rejects_inverted_range() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let service = create_db_test_service(&db).await;

    TestRequest::post(&format!("{APPOINTMENTS_ROUTE_PREFIX}/block"))
        .json(&serde_json::json!({
            "date": upcoming_monday(),
            "startTime": "15:00",
            "endTime": "14:00",
            "reason": "Inventory"
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
