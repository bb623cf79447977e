//! Event lifecycle, comments and bookings over HTTP

mod common;

use axum::http::StatusCode;
use bracket_web::flash::Level;
use common::{event_fields, json_body, location, notices, TestApp};
use uuid::Uuid;

fn detail_url(id: Uuid) -> String {
    format!("http://localhost:3000/events/{id}")
}

#[tokio::test]
async fn test_create_event_scenario() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let response = app
        .post_multipart("/create", &event_fields("Cup"), None, Some(&alice))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        notices(&response)[0].message,
        "Tournament created successfully!"
    );
    let id: Uuid = location(&response)
        .trim_start_matches("/events/")
        .parse()
        .unwrap();

    let body = app.event_json(id, Some(&alice)).await;
    let event = &body["page"]["event"];
    assert_eq!(event["title"], "Cup");
    assert_eq!(event["status"], "Open");
    assert_eq!(event["category"], "Amateur");
    assert_eq!(event["region"], "OCE");
    assert_eq!(event["team_size"], "Duo");
    assert_eq!(event["mode"], "Battle Royale");
    assert_eq!(event["start_at"], "2025-06-01T18:00:00");
    assert_eq!(body["page"]["host"]["username"], "alice");
    assert_eq!(body["page"]["is_host"], true);
    assert_eq!(body["page"]["confirmation_token"], id.to_string());

    let listing = json_body(app.get("/", None).await).await;
    assert_eq!(listing["page"]["events"][0]["id"], id.to_string());
}

#[tokio::test]
async fn test_anonymous_create_goes_to_login() {
    let app = TestApp::new();

    let response = app
        .post_multipart("/create", &event_fields("Cup"), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login?next="));

    let listing = json_body(app.get("/", None).await).await;
    assert!(listing["page"]["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_event_form_returns_to_create() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let mut fields = event_fields("Cup");
    fields.retain(|(name, _)| *name != "time");
    let response = app.post_multipart("/create", &fields, None, Some(&alice)).await;
    assert_eq!(location(&response), "/create");
    assert_eq!(notices(&response)[0].level, Level::Danger);
}

#[tokio::test]
async fn test_cancel_and_reopen_by_host() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let id = app.create_event(&alice, "Cup").await;
    let token = id.to_string();

    // Someone else's cancel changes nothing
    let response = app
        .post_form(
            &format!("/events/{id}/cancel"),
            &[("token", token.as_str())],
            Some(&bob),
            Some(&detail_url(id)),
        )
        .await;
    assert_eq!(location(&response), format!("/events/{id}"));
    let flash = notices(&response);
    assert_eq!(flash[0].level, Level::Warning);
    assert_eq!(flash[0].message, "You can only cancel tournaments you host.");
    let body = app.event_json(id, None).await;
    assert_eq!(body["page"]["event"]["status"], "Open");

    let response = app
        .post_form(
            &format!("/events/{id}/cancel"),
            &[("token", token.as_str())],
            Some(&alice),
            Some(&detail_url(id)),
        )
        .await;
    assert_eq!(location(&response), "/");
    assert_eq!(
        notices(&response)[0].message,
        "Tournament cancelled successfully!"
    );
    let body = app.event_json(id, Some(&bob)).await;
    assert_eq!(body["page"]["event"]["status"], "Cancelled");
    assert_eq!(body["page"]["can_book"], false);

    let response = app
        .post_form(&format!("/events/{id}/reopen"), &[], Some(&alice), None)
        .await;
    assert_eq!(location(&response), format!("/events/{id}"));
    let body = app.event_json(id, None).await;
    assert_eq!(body["page"]["event"]["status"], "Open");
}

#[tokio::test]
async fn test_cancel_needs_token_and_details_referrer() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let id = app.create_event(&alice, "Cup").await;
    let path = format!("/events/{id}/cancel");
    let token = id.to_string();
    let wrong_token = Uuid::new_v4().to_string();

    let attempts = [
        (wrong_token.as_str(), Some(detail_url(id))),
        (token.as_str(), Some("http://localhost:3000/".to_string())),
        (token.as_str(), None),
    ];
    for (token, referer) in attempts {
        let response = app
            .post_form(&path, &[("token", token)], Some(&alice), referer.as_deref())
            .await;
        assert_eq!(location(&response), format!("/events/{id}"));
        assert_eq!(
            notices(&response)[0].message,
            "Please confirm from the event details page."
        );
    }

    let body = app.event_json(id, None).await;
    assert_eq!(body["page"]["event"]["status"], "Open");
}

#[tokio::test]
async fn test_edit_by_host_and_stranger() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let id = app.create_event(&alice, "Cup").await;

    let response = app.get(&format!("/events/{id}/edit"), Some(&bob)).await;
    assert_eq!(location(&response), format!("/events/{id}"));
    assert_eq!(notices(&response)[0].level, Level::Warning);

    let response = app
        .post_multipart(
            &format!("/events/{id}/edit"),
            &event_fields("Stolen Cup"),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(location(&response), format!("/events/{id}"));

    let form = json_body(app.get(&format!("/events/{id}/edit"), Some(&alice)).await).await;
    assert_eq!(form["page"]["event"]["title"], "Cup");
    assert_eq!(form["page"]["choices"]["team_sizes"][1], "Duo");

    let response = app
        .post_multipart(
            &format!("/events/{id}/edit"),
            &event_fields("Grand Cup"),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(location(&response), "/");
    assert_eq!(
        notices(&response)[0].message,
        "Tournament updated successfully!"
    );

    let body = app.event_json(id, None).await;
    assert_eq!(body["page"]["event"]["title"], "Grand Cup");
    assert_eq!(body["page"]["event"]["status"], "Open");
}

#[tokio::test]
async fn test_banner_upload_is_served() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let response = app
        .post_multipart(
            "/create",
            &event_fields("Cup"),
            Some(("../My Banner.png", &b"\x89PNG fake"[..])),
            Some(&alice),
        )
        .await;
    let id: Uuid = location(&response)
        .trim_start_matches("/events/")
        .parse()
        .unwrap();

    let body = app.event_json(id, None).await;
    let banner = body["page"]["event"]["banner"].as_str().unwrap().to_string();
    assert!(banner.starts_with("img/"));
    assert!(banner.ends_with("_My_Banner.png"));

    let response = app.get(&format!("/static/{banner}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_multipart(
            "/create",
            &event_fields("Gif Cup"),
            Some(("banner.gif", &b"GIF89a"[..])),
            Some(&alice),
        )
        .await;
    assert_eq!(location(&response), "/create");
    assert!(notices(&response)[0].message.contains("images only"));
}

#[tokio::test]
async fn test_comments_show_newest_first() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let id = app.create_event(&alice, "Cup").await;
    let path = format!("/events/{id}/comment");

    let response = app.post_form(&path, &[("body", "gl hf")], Some(&bob), None).await;
    assert_eq!(location(&response), format!("/events/{id}"));
    assert_eq!(notices(&response)[0].message, "Comment posted!");
    app.post_form(&path, &[("body", "see you there")], Some(&alice), None)
        .await;

    let response = app.post_form(&path, &[("body", "   ")], Some(&bob), None).await;
    assert_eq!(notices(&response)[0].level, Level::Danger);

    let body = app.event_json(id, None).await;
    let comments = body["page"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"], "see you there");
    assert_eq!(comments[0]["author"], "alice");
    assert_eq!(comments[1]["author"], "bob");
}

#[tokio::test]
async fn test_booking_scenario() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let id = app.create_event(&alice, "Cup").await;

    let response = app
        .post_form(
            &format!("/events/{id}/book"),
            &[("quantity", "3")],
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(location(&response), "/history");
    let message = notices(&response)[0].message.clone();
    let order_id = message
        .strip_prefix("Booking successful! Order ID: ")
        .unwrap()
        .to_string();
    assert_eq!(order_id.len(), 9);
    assert_eq!(&order_id[4..5], "-");
    assert!(order_id
        .chars()
        .filter(|c| *c != '-')
        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));

    let history = json_body(app.get("/history", Some(&bob)).await).await;
    let first = &history["page"]["bookings"][0];
    assert_eq!(first["order_id"], order_id.as_str());
    assert_eq!(first["quantity"], 3);
    assert_eq!(first["status"], "Confirmed");
    assert_eq!(first["event_title"], "Cup");
}

#[tokio::test]
async fn test_bad_bookings_are_rejected() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let id = app.create_event(&alice, "Cup").await;
    let book = format!("/events/{id}/book");

    for quantity in ["0", "-2", "lots", ""] {
        let response = app
            .post_form(&book, &[("quantity", quantity)], Some(&bob), None)
            .await;
        assert_eq!(location(&response), format!("/events/{id}"));
        assert_eq!(notices(&response)[0].level, Level::Danger);
    }

    app.post_form(
        &format!("/events/{id}/cancel"),
        &[("token", id.to_string().as_str())],
        Some(&alice),
        Some(&detail_url(id)),
    )
    .await;
    let response = app
        .post_form(&book, &[("quantity", "1")], Some(&bob), None)
        .await;
    assert_eq!(location(&response), format!("/events/{id}"));
    assert_eq!(notices(&response)[0].level, Level::Warning);

    let history = json_body(app.get("/history", Some(&bob)).await).await;
    assert!(history["page"]["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_booking_returns_to_event_after_login() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let id = app.create_event(&alice, "Cup").await;

    let response = app
        .post_form(
            &format!("/events/{id}/book"),
            &[("quantity", "1")],
            None,
            Some(&detail_url(id)),
        )
        .await;
    assert_eq!(
        location(&response),
        format!("/login?next=%2Fevents%2F{id}")
    );
}

#[tokio::test]
async fn test_delete_rules() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let booked = app.create_event(&alice, "Booked Cup").await;
    let empty = app.create_event(&alice, "Empty Cup").await;

    app.post_form(
        &format!("/events/{booked}/book"),
        &[("quantity", "1")],
        Some(&bob),
        None,
    )
    .await;
    let response = app
        .post_form(
            &format!("/events/{booked}/delete"),
            &[("token", booked.to_string().as_str())],
            Some(&alice),
            Some(&detail_url(booked)),
        )
        .await;
    assert_eq!(location(&response), format!("/events/{booked}"));
    assert_eq!(notices(&response)[0].level, Level::Warning);

    let response = app
        .post_form(
            &format!("/events/{empty}/delete"),
            &[("token", empty.to_string().as_str())],
            Some(&alice),
            Some(&detail_url(empty)),
        )
        .await;
    assert_eq!(location(&response), "/");
    assert_eq!(
        notices(&response)[0].message,
        "Tournament deleted successfully!"
    );

    let response = app.get(&format!("/events/{empty}"), None).await;
    assert_eq!(location(&response), "/");
    assert_eq!(notices(&response)[0].message, "Event not found.");
}

#[tokio::test]
async fn test_profile_lists_hosted_events() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    app.create_event(&alice, "Cup").await;

    let home = json_body(app.get("/", Some(&alice)).await).await;
    let alice_id = home["viewer"]["user_id"].as_str().unwrap().to_string();

    let profile = json_body(app.get(&format!("/users/{alice_id}"), None).await).await;
    assert_eq!(profile["page"]["user"]["username"], "alice");
    assert!(profile["page"]["user"].get("password_hash").is_none());
    assert_eq!(profile["page"]["hosted"][0]["title"], "Cup");

    let response = app.get("/users/not-a-uuid", None).await;
    assert_eq!(location(&response), "/");
    assert_eq!(notices(&response)[0].message, "User not found.");
}

#[tokio::test]
async fn test_public_pages_hide_account_details() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let id = app.create_event(&alice, "Cup").await;

    let details = app.event_json(id, None).await;
    let host = &details["page"]["host"];
    assert_eq!(host["username"], "alice");
    for hidden in ["email", "last_login", "password_hash"] {
        assert!(host.get(hidden).is_none(), "event page shows {hidden}");
    }

    let host_id = host["id"].as_str().unwrap().to_string();
    let profile = json_body(app.get(&format!("/users/{host_id}"), None).await).await;
    let user = &profile["page"]["user"];
    assert_eq!(user["id"], host_id.as_str());
    for hidden in ["email", "last_login", "password_hash"] {
        assert!(user.get(hidden).is_none(), "profile shows {hidden}");
    }
}
