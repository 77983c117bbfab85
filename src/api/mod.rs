pub mod cli;
pub mod input;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::core::{
    AnalysisResult, HeatmapMetric, ListingFilter, ScreenedListing, analyze, current_year,
    estimate_rent_as_of, monthly_payment, screen_listings,
};
use input::{
    ApiHeatmapMetric, AssumptionsPayload, FilterPayload, InputError, ListingPayload,
    MAX_LOAN_TERM_YEARS, PropertyPayload, validate_year_built,
};

const SERVICE_NAME: &str = "Deal Finder API";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzePayload {
    property: PropertyPayload,
    #[serde(default)]
    assumptions: Option<AssumptionsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenPayload {
    listings: Vec<ListingPayload>,
    #[serde(default)]
    assumptions: Option<AssumptionsPayload>,
    #[serde(default)]
    filter: Option<FilterPayload>,
    #[serde(default)]
    metric: Option<ApiHeatmapMetric>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MortgageQuery {
    principal: f64,
    rate: f64,
    years: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RentQuery {
    sqft: f64,
    beds: u32,
    baths: f64,
    #[serde(alias = "year_built")]
    year_built: i32,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MortgageResponse {
    monthly_payment: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RentEstimateResponse {
    monthly_rent: f64,
    as_of_year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenedListingResponse {
    id: i64,
    address: String,
    city: String,
    state: String,
    zip: String,
    latitude: f64,
    longitude: f64,
    status: String,
    home_type: String,
    days_on_market: u32,
    price: f64,
    sqft: f64,
    beds: u32,
    baths: f64,
    price_per_sqft: f64,
    metric_value: f64,
    rating_color: &'static str,
    analysis: AnalysisResult,
}

impl From<ScreenedListing> for ScreenedListingResponse {
    fn from(value: ScreenedListing) -> Self {
        let ScreenedListing {
            listing,
            analysis,
            metric_value,
        } = value;
        Self {
            id: listing.id,
            price_per_sqft: listing.property.price_per_sqft(),
            price: listing.property.price,
            sqft: listing.property.sqft,
            beds: listing.property.beds,
            baths: listing.property.baths,
            address: listing.address,
            city: listing.city,
            state: listing.state,
            zip: listing.zip,
            latitude: listing.latitude,
            longitude: listing.longitude,
            status: listing.status,
            home_type: listing.home_type,
            days_on_market: listing.days_on_market,
            metric_value,
            rating_color: analysis.deal_rating.color(),
            analysis,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenResponse {
    count: usize,
    listings: Vec<ScreenedListingResponse>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/mortgage", get(mortgage_handler))
        .route("/api/rent-estimate", get(rent_estimate_handler))
        .route("/api/screen", post(screen_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::new(host, port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "deal analysis API listening");

    axum::serve(listener, router()).await
}

async fn index_handler() -> Response {
    json_response(
        StatusCode::OK,
        ServiceInfo {
            message: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "healthy" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_handler(payload: Result<Json<AnalyzePayload>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection.body_text()),
    };
    match analyze_request(payload) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => input_error_response(&err),
    }
}

fn analyze_request(payload: AnalyzePayload) -> Result<AnalysisResult, InputError> {
    let property = payload.property.into_property()?;
    let assumptions = payload
        .assumptions
        .unwrap_or_default()
        .into_assumptions()?;
    Ok(analyze(&property, &assumptions))
}

async fn mortgage_handler(query: Result<Query<MortgageQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(&rejection.body_text()),
    };
    if !query.principal.is_finite() || query.principal < 0.0 {
        return input_error_response(&InputError::NotNonNegative { field: "principal" });
    }
    if !(0.0..=1.0).contains(&query.rate) {
        return input_error_response(&InputError::FractionOutOfRange { field: "rate" });
    }
    if !(1..=MAX_LOAN_TERM_YEARS).contains(&query.years) {
        return input_error_response(&InputError::OutOfRange {
            field: "years",
            min: 1,
            max: i64::from(MAX_LOAN_TERM_YEARS),
        });
    }

    json_response(
        StatusCode::OK,
        MortgageResponse {
            monthly_payment: monthly_payment(query.principal, query.rate, query.years),
        },
    )
}

async fn rent_estimate_handler(query: Result<Query<RentQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(&rejection.body_text()),
    };
    for (field, value) in [("sqft", query.sqft), ("baths", query.baths)] {
        if !value.is_finite() || value < 0.0 {
            return input_error_response(&InputError::NotNonNegative { field });
        }
    }
    if let Err(err) = validate_year_built(query.year_built) {
        return input_error_response(&err);
    }

    let as_of_year = current_year();
    json_response(
        StatusCode::OK,
        RentEstimateResponse {
            monthly_rent: estimate_rent_as_of(
                query.sqft,
                query.beds,
                query.baths,
                query.year_built,
                as_of_year,
            ),
            as_of_year,
        },
    )
}

async fn screen_handler(payload: Result<Json<ScreenPayload>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection.body_text()),
    };
    match screen_request(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => input_error_response(&err),
    }
}

fn screen_request(payload: ScreenPayload) -> Result<ScreenResponse, InputError> {
    let listings = payload
        .listings
        .into_iter()
        .map(ListingPayload::into_listing)
        .collect::<Result<Vec<_>, _>>()?;
    let assumptions = payload
        .assumptions
        .unwrap_or_default()
        .into_assumptions()?;
    let filter = payload
        .filter
        .map(ListingFilter::from)
        .unwrap_or_default();
    let metric = payload
        .metric
        .map(HeatmapMetric::from)
        .unwrap_or_default();

    let listings: Vec<ScreenedListingResponse> =
        screen_listings(listings, &assumptions, &filter, metric)
            .into_iter()
            .map(ScreenedListingResponse::from)
            .collect();
    Ok(ScreenResponse {
        count: listings.len(),
        listings,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn input_error_response(err: &InputError) -> Response {
    warn!(%err, "rejected analysis input");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn rejection_response(msg: &str) -> Response {
    warn!(msg, "malformed request");
    error_response(StatusCode::BAD_REQUEST, msg)
}
