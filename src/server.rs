//! HTTP surface: upstream passthrough routes plus catalog and export routes.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bank::BankClients;
use crate::catalog::{CurrencyCatalog, Selection};
use crate::date_range::{DateRange, parse_iso_date};
use crate::driver::RangeFetcher;
use crate::error::RateError;
use crate::export::{ExportFormat, file_name};
use crate::model::{Bank, ExchangeRateRow};

pub struct AppState {
    pub clients: BankClients,
    pub date_delay: Duration,
}

impl ResponseError for RateError {
    fn status_code(&self) -> StatusCode {
        match self {
            err if err.is_user_input() => StatusCode::BAD_REQUEST,
            RateError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RateError::NoTimeRecords { .. } | RateError::NoData => StatusCode::NOT_FOUND,
            err if err.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/exchange/techcombank", web::get().to(techcombank))
            .route("/exchange/bidv", web::get().to(bidv))
            .route("/currencies", web::get().to(currencies))
            .route("/rates", web::get().to(rates)),
    );
}

pub async fn run(address: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!("starting web server on address={}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(address)?
    .run()
    .await
}

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

impl DateQuery {
    fn date(&self) -> Result<chrono::NaiveDate, RateError> {
        match self.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(date) => parse_iso_date(date),
            None => Err(RateError::MissingDate),
        }
    }
}

async fn techcombank(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, RateError> {
    let date = query.date()?;
    let payload = state
        .clients
        .techcombank
        .fetch_rates(date)
        .await
        .inspect_err(|e| warn!("techcombank passthrough for {} failed: {}", date, e))?;

    Ok(HttpResponse::Ok().json(payload))
}

async fn bidv(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, RateError> {
    let date = query.date()?;
    let payload = state
        .clients
        .bidv
        .fetch_rates(date)
        .await
        .inspect_err(|e| warn!("bidv passthrough for {} failed: {}", date, e))?;

    Ok(HttpResponse::Ok().json(payload))
}

#[derive(Deserialize)]
struct BankQuery {
    bank: Option<String>,
}

async fn currencies(query: web::Query<BankQuery>) -> Result<HttpResponse, RateError> {
    let bank: Bank = query.bank.as_deref().unwrap_or_default().parse()?;
    Ok(HttpResponse::Ok().json(CurrencyCatalog::currencies(bank)))
}

#[derive(Deserialize)]
struct RatesQuery {
    bank: Option<String>,
    currency: Option<String>,
    start: Option<String>,
    end: Option<String>,
    format: Option<String>,
}

#[derive(Serialize)]
struct RatesBody<'a> {
    rows: &'a [ExchangeRateRow],
    message: Option<&'static str>,
}

async fn rates(
    state: web::Data<AppState>,
    query: web::Query<RatesQuery>,
) -> Result<HttpResponse, RateError> {
    let bank: Bank = query.bank.as_deref().unwrap_or_default().parse()?;
    let selection = Selection::with_currency(bank, query.currency.as_deref())?;
    let range = DateRange::parse(query.start.as_deref(), query.end.as_deref())?;
    let format = match query.format.as_deref() {
        None | Some("json") => None,
        Some(format) => Some(format.parse::<ExportFormat>()?),
    };

    let batch = RangeFetcher::new(state.clients.adapter(bank))
        .with_delay(state.date_delay)
        .fetch_range(range, selection.currency())
        .await?;

    let Some(format) = format else {
        return Ok(HttpResponse::Ok().json(RatesBody {
            rows: &batch.rows,
            message: batch.message(),
        }));
    };
    if batch.is_empty() {
        return Err(RateError::NoData);
    }

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name(&batch, format)),
        ))
        .body(format.encode(&batch.rows)?))
}
