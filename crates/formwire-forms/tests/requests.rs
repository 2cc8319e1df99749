//! What the controller puts on the wire: verbs, query strings, bodies,
//! headers and transforms.

use std::collections::HashMap;

use axum::extract::Form;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use formwire_core::FormSettings;
use formwire_forms::{FormController, FormError, SubmitOptions};
use formwire_http::transport::RouterTransport;
use formwire_http::value::form_data_from_json;
use formwire_http::{FileBlob, FormValue, Method, RequestBody};
use formwire_test::{assert_field_error, assert_recently_successful, StubTransport};

fn form_with(transport: &StubTransport, data: serde_json::Value) -> FormController {
    FormController::with_settings(
        form_data_from_json(data),
        transport.shared(),
        FormSettings::default(),
    )
}

#[tokio::test]
async fn test_get_sends_data_as_query() {
    let transport = StubTransport::new();
    let form = form_with(&transport, json!({"filter": {"role": "admin"}, "page": 2}));

    form.get("/users", SubmitOptions::new()).unwrap().settled().await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "/users");
    assert_eq!(request.query.get("filter[role]"), Some("admin"));
    assert_eq!(request.query.get("page"), Some("2"));
    assert_eq!(request.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_get_with_file_sends_filename() {
    let transport = StubTransport::new();
    let form = form_with(&transport, json!({}));
    form.set_field("doc", FileBlob::new("report.pdf", "application/pdf", vec![1_u8]))
        .unwrap();

    form.get("/search", SubmitOptions::new()).unwrap().settled().await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.query.get("doc"), Some("report.pdf"));
}

#[tokio::test]
async fn test_each_verb_carries_a_body() {
    let transport = StubTransport::new();
    let form = form_with(&transport, json!({"a": {"b": 1}, "c": [2, 3]}));

    form.post("/x", SubmitOptions::new()).unwrap().settled().await;
    form.put("/x", SubmitOptions::new()).unwrap().settled().await;
    form.patch("/x", SubmitOptions::new()).unwrap().settled().await;
    form.delete("/x", SubmitOptions::new()).unwrap().settled().await;
    form.submit_named("PATCH", "/x", SubmitOptions::new())
        .unwrap()
        .settled()
        .await;

    let requests = transport.requests();
    let methods: Vec<Method> = requests.iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        [Method::Post, Method::Put, Method::Patch, Method::Delete, Method::Patch]
    );
    for request in &requests {
        assert!(request.query.is_empty());
        let RequestBody::Form(params) = &request.body else {
            panic!("expected an urlencoded body, got {:?}", request.body);
        };
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(pairs, [("a[b]", "1"), ("c[0]", "2"), ("c[1]", "3")]);
    }
}

#[tokio::test]
async fn test_files_switch_to_multipart() {
    let transport = StubTransport::new();
    let form = form_with(&transport, json!({"a": {"b": 1}, "c": [2, 3]}));
    form.update_data(|mut data| {
        data.insert(
            "avatar".into(),
            FormValue::from(FileBlob::blob("image/png", vec![0_u8; 8])),
        );
        data
    })
    .unwrap();

    form.post("/profile", SubmitOptions::new()).unwrap().settled().await;

    let request = transport.last_request().unwrap();
    let RequestBody::Multipart(multipart) = &request.body else {
        panic!("expected a multipart body");
    };
    let keys: Vec<&str> = multipart.keys().collect();
    assert_eq!(keys, ["a[b]", "c[0]", "c[1]", "avatar"]);
    let file = multipart.get_file("avatar").unwrap();
    assert_eq!(file.name, None);
    assert_eq!(file.len(), 8);
}

#[tokio::test]
async fn test_transform_shapes_the_payload_not_the_data() {
    let transport = StubTransport::new();
    let form = form_with(&transport, json!({"name": "ada", "password": "secret"}));
    form.transform(|mut data| {
        data.shift_remove("password");
        data.insert("remember".into(), FormValue::Bool(true));
        data
    })
    .unwrap();

    form.post("/login", SubmitOptions::new()).unwrap().settled().await;

    let request = transport.last_request().unwrap();
    let RequestBody::Form(params) = &request.body else {
        panic!("expected an urlencoded body");
    };
    assert_eq!(params.get("remember"), Some("1"));
    assert!(!params.contains_key("password"));
    assert_eq!(form.data().len(), 2);
    assert!(form.field("password").is_some());
}

#[tokio::test]
async fn test_headers_merge_over_defaults() {
    let transport = StubTransport::new();
    let mut settings = FormSettings::default();
    settings
        .default_headers
        .insert("X-Requested-With".into(), "formwire".into());
    settings
        .default_headers
        .insert("Accept".into(), "application/json".into());
    let form = FormController::with_settings(form_data_from_json(json!({})), transport.shared(), settings);

    let options = SubmitOptions::new()
        .header("x-requested-with", "override")
        .header("X-CSRF-Token", "abc");
    form.post("/x", options).unwrap().settled().await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.header("x-requested-with"), Some("override"));
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("x-csrf-token"), Some("abc"));
}

#[tokio::test]
async fn test_invalid_default_header_is_reported() {
    let transport = StubTransport::new();
    let mut settings = FormSettings::default();
    settings.default_headers.insert("x-bad".into(), "line\nbreak".into());
    let form = FormController::with_settings(form_data_from_json(json!({})), transport.shared(), settings);

    let err = form.post("/x", SubmitOptions::new()).unwrap_err();
    assert!(matches!(err, FormError::InvalidHeader { ref name, .. } if name == "x-bad"));
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// End to end through an axum router
// ============================================================================

async fn register(Form(fields): Form<HashMap<String, String>>) -> impl IntoResponse {
    if fields.get("user[email]").is_some_and(String::is_empty) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": { "user.email": ["The email field is required."] }
            })),
        );
    }
    (StatusCode::CREATED, Json(json!({ "id": 1 })))
}

fn router_form(data: serde_json::Value) -> FormController {
    let app = Router::new().route("/register", post(register));
    let transport = RouterTransport::with_base_url(app, "http://app.test").unwrap();
    FormController::with_settings(
        form_data_from_json(data),
        std::sync::Arc::new(transport),
        FormSettings::default(),
    )
}

#[tokio::test]
async fn test_router_round_trip_validation_then_success() {
    let form = router_form(json!({"user": {"name": "Ada", "email": ""}}));

    let outcome = form
        .post("/register", SubmitOptions::new())
        .unwrap()
        .settled()
        .await;
    assert!(!outcome.is_success());
    assert_field_error(&form, "user.email", "The email field is required.");

    form.update_data(|mut data| {
        data.insert(
            "user".into(),
            FormValue::from(form_data_from_json(json!({"name": "Ada", "email": "ada@example.com"}))),
        );
        data
    })
    .unwrap();
    let outcome = form
        .post("/register", SubmitOptions::new())
        .unwrap()
        .settled()
        .await;

    let response = outcome.response().unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json().unwrap()["id"], 1);
    assert_recently_successful(&form);
    assert!(!form.has_errors());
}
