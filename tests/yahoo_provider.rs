// tests/yahoo_provider.rs
mod common;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::json;

use common::date;
use price_dashboard::application::usecase::{SeriesFetchUseCase, SeriesFetcher};
use price_dashboard::config::ProviderConfig;
use price_dashboard::domain::errors::ProviderError;
use price_dashboard::domain::models::SymbolRequest;
use price_dashboard::domain::repository::PriceProvider;
use price_dashboard::infrastructure::{InMemorySeriesCache, YahooPriceProvider};

// Dec 30 2022, Jan 3-5 2023 and Jan 31 2023, each at the 09:30 New York open
const TIMESTAMPS: [i64; 5] = [1672410600, 1672756200, 1672842600, 1672929000, 1675175400];

fn aapl_payload() -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "currency": "USD",
                    "gmtoffset": -18000,
                    "exchangeTimezoneName": "America/New_York"
                },
                "timestamp": TIMESTAMPS,
                "indicators": {
                    "quote": [{
                        "open":   [128.41, 130.28, 126.89, 127.13, 142.70],
                        "high":   [129.95, 130.90, 128.66, 127.77, 144.34],
                        "low":    [127.43, 124.17, 125.08, 124.76, 142.28],
                        "close":  [129.93, 125.07, 126.36, 125.02, 144.29],
                        "volume": [77034200, 112117500, 89113600, 80962700, 65874500]
                    }],
                    "adjclose": [{
                        "adjclose": [129.93, 125.07, 126.36, 125.02, 144.29]
                    }]
                }
            }],
            "error": null
        }
    })
}

fn not_found_payload() -> serde_json::Value {
    json!({
        "chart": {
            "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
        }
    })
}

async fn route(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let path = req.uri().path().to_string();
    let response = match path.as_str() {
        "/v8/finance/chart/AAPL" => Response::new(Body::from(aapl_payload().to_string())),
        "/v8/finance/chart/ZZZZINVALID" => {
            let mut response = Response::new(Body::from(not_found_payload().to_string()));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
        "/v8/finance/chart/GATEWAY" => {
            let page = format!("{}é… gateway unavailable", "x".repeat(255));
            let mut response = Response::new(Body::from(page));
            *response.status_mut() = StatusCode::BAD_GATEWAY;
            response
        }
        "/v8/finance/chart/SLOW" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Response::new(Body::from(aapl_payload().to_string()))
        }
        _ => {
            let mut response = Response::new(Body::from("upstream exploded"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };
    Ok(response)
}

fn serve() -> SocketAddr {
    let make_service = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(route)) });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

fn provider_for(addr: SocketAddr) -> YahooPriceProvider {
    YahooPriceProvider::new(&ProviderConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 1,
        adjusted: true,
        ..ProviderConfig::default()
    })
}

#[tokio::test]
async fn rows_outside_the_window_are_dropped() {
    let provider = provider_for(serve());

    let series = provider
        .daily_history("AAPL", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap();

    assert_eq!(
        series.dates(),
        vec![date(2023, 1, 3), date(2023, 1, 4), date(2023, 1, 5)]
    );
    assert_eq!(series.close_prices(), vec![125.07, 126.36, 125.02]);
    assert_eq!(series.bars()[0].volume, 112117500);
}

#[tokio::test]
async fn not_found_is_an_empty_series() {
    let provider = provider_for(serve());

    let series = provider
        .daily_history("ZZZZINVALID", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap();

    assert!(series.is_empty());
    assert_eq!(series.symbol, "ZZZZINVALID");
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let provider = provider_for(serve());

    let err = provider
        .daily_history("MSFT", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::Http {
            status: 500,
            body: "upstream exploded".to_string()
        }
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn long_multibyte_error_pages_are_cut_cleanly() {
    let provider = provider_for(serve());

    let err = provider
        .daily_history("GATEWAY", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();

    match err {
        ProviderError::Http { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body.chars().count(), 256);
            assert!(body.ends_with('é'));
        }
        other => panic!("expected an HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn bad_error_page_does_not_sink_other_symbols() {
    let provider = Arc::new(provider_for(serve()));
    let fetcher = SeriesFetcher::new(provider, Arc::new(InMemorySeriesCache::new()));
    let request = SymbolRequest::new(["GATEWAY", "AAPL"], date(2023, 1, 1), date(2023, 1, 31));

    let result = fetcher.fetch(&request).await;

    assert_eq!(result.get("AAPL").unwrap().len(), 3);
    assert!(result.get("GATEWAY").unwrap().is_empty());
    assert!(matches!(
        result.failure("GATEWAY"),
        Some(ProviderError::Http { status: 502, .. })
    ));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let provider = provider_for(serve());

    let err = provider
        .daily_history("SLOW", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Timeout(1));
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    // bind then drop to get a port nothing listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let provider = provider_for(addr);

    let err = provider
        .daily_history("AAPL", date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Request(_)));
}

#[tokio::test]
async fn failures_stay_with_their_symbol() {
    let provider = Arc::new(provider_for(serve()));
    let fetcher = SeriesFetcher::new(provider, Arc::new(InMemorySeriesCache::new()));
    let request = SymbolRequest::new(
        ["ZZZZINVALID", "AAPL", "MSFT"],
        date(2023, 1, 1),
        date(2023, 1, 31),
    );

    let result = fetcher.fetch(&request).await;

    assert_eq!(result.symbols(), &["ZZZZINVALID", "AAPL", "MSFT"]);
    assert_eq!(result.get("AAPL").unwrap().len(), 3);
    assert!(result.get("ZZZZINVALID").unwrap().is_empty());
    assert!(result.failure("ZZZZINVALID").is_none());
    assert!(result.get("MSFT").unwrap().is_empty());
    assert!(matches!(
        result.failure("MSFT"),
        Some(ProviderError::Http { status: 500, .. })
    ));
    assert!(!result.provider_unavailable());
}
