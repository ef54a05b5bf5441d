use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tcsi_exporter::{api::app_router, build_state_with_client};
use tcsi_invest_api::{
    Account, CurrencyBalance, InvestApiClient, InvestApiError, MoneyAmount, Portfolio, Position,
    Result as ApiResult,
};
use tower::ServiceExt;

#[derive(Default)]
struct FakeBroker {
    accounts: Vec<Account>,
    portfolios: HashMap<String, Portfolio>,
    listing_down: bool,
}

#[async_trait]
impl InvestApiClient for FakeBroker {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        if self.listing_down {
            return Err(InvestApiError::Request("upstream unavailable".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn get_portfolio(&self, account_id: &str) -> ApiResult<Portfolio> {
        self.portfolios
            .get(account_id)
            .cloned()
            .ok_or_else(|| InvestApiError::Api {
                message: format!("unknown account {}", account_id),
                code: None,
                tracking_id: None,
            })
    }
}

fn fake_broker() -> FakeBroker {
    let mut broker = FakeBroker::default();
    broker.accounts.push(Account::new("A1", "brokerage"));
    broker.portfolios.insert(
        "A1".to_string(),
        Portfolio {
            positions: vec![Position {
                instrument_type: "Stock".to_string(),
                figi: "BBG1".to_string(),
                isin: "RU0009029540".to_string(),
                ticker: "SBER".to_string(),
                name: "Sberbank".to_string(),
                average_position_price: MoneyAmount::new("RUB", 100.0),
                expected_yield: MoneyAmount::new("RUB", 50.0),
                balance: 10.0,
                ..Default::default()
            }],
            currencies: vec![CurrencyBalance::new("USD", 500.0)],
        },
    );
    // Listed but its portfolio lookup fails
    broker.accounts.push(Account::new("A9", "TinkoffIis"));
    broker
}

fn router_for(broker: FakeBroker) -> Router {
    let state = build_state_with_client(Arc::new(broker)).unwrap();
    app_router(state)
}

async fn scrape(app: Router) -> (StatusCode, String, String) {
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_exposes_positions_and_cash() {
    let (status, content_type, body) = scrape(router_for(fake_broker())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/plain; version=0.0.4");

    let labels = r#"account_type="brokerage",instrument_type="Stock",figi="BBG1",isin="RU0009029540",ticker="SBER",human_name="Sberbank",currency="RUB""#;
    assert!(body.contains(&format!("tcsi_position_spend_avg{{{}}} 100", labels)));
    assert!(body.contains(&format!("tcsi_position_excepted_yield_total{{{}}} 50", labels)));
    assert!(body.contains(&format!("tcsi_position_items_count{{{}}} 10", labels)));
    assert!(body.contains(&format!("tcsi_position_market_price_avg{{{}}} 105", labels)));
    assert!(body.contains(r#"tcsi_currency_balance{account_type="brokerage",currency="USD"} 500"#));

    // The account whose portfolio failed contributes nothing
    assert!(!body.contains("TinkoffIis"));
}

#[tokio::test]
async fn metrics_stays_available_when_upstream_is_down() {
    let mut broker = fake_broker();
    broker.listing_down = true;

    let (status, _, body) = scrape(router_for(broker)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn repeated_scrapes_are_independent() {
    let app = router_for(fake_broker());
    let (_, _, first) = scrape(app.clone()).await;
    let (_, _, second) = scrape(app).await;
    assert_eq!(first, second);
}
