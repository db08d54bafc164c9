mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{App, test, web};
use common::{ScriptedHttp, clients, date, techcombank_doc};
use serde_json::{Value, json};
use tygia::bank::{bidv, techcombank};
use tygia::proxy::Relay;
use tygia::server::{AppState, routes};

fn state(http: &std::sync::Arc<ScriptedHttp>) -> web::Data<AppState> {
    web::Data::new(AppState {
        clients: clients(http),
        date_delay: Duration::ZERO,
    })
}

#[actix_web::test]
async fn techcombank_requires_date() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/exchange/techcombank").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing ?date=YYYY-MM-DD");
    assert!(http.requested_urls().is_empty());
}

#[actix_web::test]
async fn techcombank_passes_payload_through() {
    let http = ScriptedHttp::new();
    let doc = techcombank_doc(json!([{ "label": "EUR", "askRate": "27,500" }]));
    http.respond(techcombank::rates_url(date(2024, 1, 2)), 200, doc.clone());
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/exchange/techcombank?date=2024-01-02")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, serde_json::from_str::<Value>(&doc).unwrap());
}

#[actix_web::test]
async fn techcombank_forwards_upstream_status() {
    let http = ScriptedHttp::new();
    http.respond(techcombank::rates_url(date(2024, 1, 6)), 404, "");
    http.respond(techcombank::rates_url(date(2024, 1, 7)), 503, "");
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/exchange/techcombank?date=2024-01-06")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/exchange/techcombank?date=2024-01-07")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[actix_web::test]
async fn techcombank_transport_failure_is_bad_gateway() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/exchange/techcombank?date=2024-01-02")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn bidv_statuses() {
    let http = ScriptedHttp::new();
    let empty_day = date(2024, 1, 7);
    http.respond(
        Relay::CorsProxy.wrap(&bidv::time_search_url(empty_day)),
        200,
        r#"{"data":[]}"#,
    );
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/exchange/bidv").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/exchange/bidv?date=2024-01-07")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/exchange/bidv?date=2024-01-08")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn bidv_passes_detail_through() {
    let http = ScriptedHttp::new();
    let day = date(2024, 1, 2);
    let detail = json!({ "day_vi": "02/01/2024", "hour": "15:30", "data": [{ "currency": "USD", "ban": "24,560" }] });
    http.respond(
        Relay::AllOrigins.wrap(&bidv::time_search_url(day)),
        200,
        json!({ "data": [{ "time": 830, "namerecord": "r1" }] }).to_string(),
    );
    http.respond(
        Relay::CorsProxy.wrap(&bidv::detail_url(day, "r1")),
        200,
        detail.to_string(),
    );
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/exchange/bidv?date=2024-01-02")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, detail);
}

#[actix_web::test]
async fn lists_currencies_per_bank() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/currencies?bank=bidv").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["value"], "USD");
    assert_eq!(body[24]["label"], "Gold (XAU)");

    let req = test::TestRequest::get().uri("/api/currencies?bank=acb").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rates_rejects_reversed_range_before_fetching() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=techcombank&start=2024-01-03&end=2024-01-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(http.requested_urls().is_empty());
}

#[actix_web::test]
async fn rates_as_json_and_csv() {
    let http = ScriptedHttp::new();
    http.respond(
        techcombank::rates_url(date(2024, 1, 2)),
        200,
        techcombank_doc(json!([{ "label": "USD (50,100)", "askRate": "24,590" }])),
    );
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=techcombank&start=2024-01-01&end=2024-01-03")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["rows"][0]["date"], "2024-01-02");
    assert_eq!(body["rows"][0]["currency"], "USD (50,100)");
    assert_eq!(body["message"], Value::Null);

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=techcombank&start=2024-01-01&end=2024-01-03&format=csv")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "text/csv; charset=utf-8");
    assert_eq!(
        resp.headers().get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"exchange_rates_techcombank_USD__50_100__2024-01-01_to_2024-01-03.csv\""
    );
    let csv = test::read_body(resp).await;
    assert_eq!(std::str::from_utf8(&csv).unwrap().lines().count(), 2);
}

#[actix_web::test]
async fn empty_rates_export_is_not_found() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=bidv&currency=EUR&start=2024-01-01&end=2024-01-01")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "No data found for the selected date range");

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=bidv&currency=EUR&start=2024-01-01&end=2024-01-01&format=xlsx")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rates_rejects_currency_outside_catalog() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/rates?bank=techcombank&currency=XAU&start=2024-01-01&end=2024-01-02")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rates_rejects_unknown_bank_and_format() {
    let http = ScriptedHttp::new();
    let app = test::init_service(App::new().app_data(state(&http)).configure(routes)).await;

    for uri in [
        "/api/rates?bank=vcb&start=2024-01-01&end=2024-01-02",
        "/api/rates?bank=bidv&start=2024-01-01&end=2024-01-02&format=pdf",
        "/api/rates?bank=bidv&start=2024-01-01",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
    assert!(http.requested_urls().is_empty());
}

#[actix_web::test]
async fn error_statuses_by_class() {
    use actix_web::ResponseError;
    use tygia::RateError;

    assert_eq!(RateError::UnsupportedFormat("pdf".into()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        RateError::FetchExhausted { url: "u".into(), attempts: 4 }.status_code(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(RateError::NoData.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(RateError::Export("disk full".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
