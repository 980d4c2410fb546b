//! Integration tests for the REST adapter contract
//!
//! A stub transport serves canned JSON per path; a fixture mapper turns it into the
//! canonical types. Diagnostics are captured with `MemorySink`.

use async_trait::async_trait;
use coinbridge::client::{ExchangeConfig, MarketConfig, Transport};
use coinbridge::diagnostics::{DiagnosticCode, MemorySink};
use coinbridge::exchanges::{EndpointMapper, ExchangeProfile, RestExchange};
use coinbridge::market::OrderStatusNormalizer;
use coinbridge::signing::{RequestSpec, SignedRequest};
use coinbridge::types::{
    AssetStatus, Balance, Balances, CanonicalStatus, ChainStatus, ExchangeAdapter, OrderBook,
    OrderBookEntry, OrderInfo, OrderRequest, OrderSide, QueueSymbol, RawQuote, Snapshot,
    DEAD_SYMBOL,
};
use coinbridge::utils::{safe_decimal_or, safe_string, ManualClock};
use coinbridge::{GatewayError, GatewayResult};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const T: i64 = 1_700_000_000_000;
const BASE: u32 = 3000;

// === Fixtures ===

#[derive(Clone)]
enum Reply {
    Json(Value),
    Unavailable,
}

#[derive(Default)]
struct StubTransport {
    replies: Mutex<HashMap<String, Reply>>,
    seen: Mutex<Vec<SignedRequest>>,
}

impl StubTransport {
    fn reply(&self, path: &str, value: Value) {
        self.replies.lock().unwrap().insert(path.into(), Reply::Json(value));
    }

    fn fail(&self, path: &str) {
        self.replies.lock().unwrap().insert(path.into(), Reply::Unavailable);
    }

    fn calls(&self, path: &str) -> usize {
        self.seen.lock().unwrap().iter().filter(|r| r.path == path).count()
    }

    fn last(&self, path: &str) -> Option<SignedRequest> {
        self.seen.lock().unwrap().iter().rev().find(|r| r.path == path).cloned()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: &SignedRequest) -> GatewayResult<Value> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().get(&request.path).cloned();
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Unavailable) => Err(GatewayError::ExchangeNotAvailable {
                message: format!("HTTP 503: {}", request.path),
            }),
            None => Err(GatewayError::BadResponse {
                message: format!("no fixture for {}", request.path),
            }),
        }
    }
}

fn list<'a>(response: &'a Value, data_type: &str) -> GatewayResult<&'a Vec<Value>> {
    response["data"].as_array().ok_or_else(|| GatewayError::ParseError {
        data_type: data_type.into(),
        message: "missing data array".into(),
    })
}

struct FixtureMapper;

impl EndpointMapper for FixtureMapper {
    fn markets_request(&self) -> RequestSpec {
        RequestSpec::get("/markets")
    }

    fn parse_markets(&self, response: &Value) -> GatewayResult<Vec<QueueSymbol>> {
        Ok(list(response, "markets")?
            .iter()
            .filter_map(|m| {
                Some(QueueSymbol::new(
                    safe_string(m, "symbol")?,
                    safe_string(m, "base")?,
                    safe_string(m, "quote")?,
                ))
            })
            .collect())
    }

    fn tickers_request(&self) -> RequestSpec {
        RequestSpec::get("/tickers")
    }

    fn parse_tickers(&self, response: &Value) -> GatewayResult<Snapshot> {
        Ok(list(response, "tickers")?
            .iter()
            .filter_map(|t| {
                let quote = RawQuote::new(
                    safe_decimal_or(t, "last", dec!(0)),
                    safe_decimal_or(t, "bid", dec!(0)),
                    safe_decimal_or(t, "ask", dec!(0)),
                    safe_decimal_or(t, "volume", dec!(0)),
                );
                Some((safe_string(t, "symbol")?, quote))
            })
            .collect())
    }

    fn order_book_request(&self, symbol: &str, limit: Option<u32>) -> GatewayResult<RequestSpec> {
        Ok(RequestSpec::get("/depth")
            .param("symbol", symbol)
            .param("limit", limit.unwrap_or(50)))
    }

    fn parse_order_book(&self, symbol: &str, response: &Value) -> GatewayResult<OrderBook> {
        let side = |key: &str| -> Vec<OrderBookEntry> {
            response[key]
                .as_array()
                .map(|levels| {
                    levels
                        .iter()
                        .filter_map(|l| {
                            let price = l[0].as_str()?.parse().ok()?;
                            let amount = l[1].as_str()?.parse().ok()?;
                            Some(OrderBookEntry::new(price, amount))
                        })
                        .collect()
                })
                .unwrap_or_default()
        };
        Ok(OrderBook::new(symbol, side("bids"), side("asks")))
    }

    fn states_request(&self) -> GatewayResult<RequestSpec> {
        Ok(RequestSpec::get("/states"))
    }

    fn parse_states(&self, response: &Value) -> GatewayResult<Vec<AssetStatus>> {
        Ok(list(response, "states")?
            .iter()
            .filter_map(|s| {
                let mut status = AssetStatus::new(safe_string(s, "coin")?);
                status.deposit = s["deposit"].as_bool();
                status.withdraw = s["withdraw"].as_bool();
                if let Some(chain) = safe_string(s, "chain") {
                    let (deposit, withdraw) = (status.deposit.unwrap_or(true), status.withdraw.unwrap_or(true));
                    status = status.with_chain(ChainStatus::new(chain, deposit, withdraw));
                }
                Some(status)
            })
            .collect())
    }

    fn balances_request(&self) -> GatewayResult<RequestSpec> {
        Ok(RequestSpec::get("/balances"))
    }

    fn parse_balances(&self, response: &Value) -> GatewayResult<Balances> {
        let mut balances = Balances::new(T);
        for b in list(response, "balances")? {
            if let Some(coin) = safe_string(b, "coin") {
                balances.add(
                    coin,
                    Balance::new(safe_decimal_or(b, "free", dec!(0)), safe_decimal_or(b, "locked", dec!(0))),
                );
            }
        }
        Ok(balances)
    }

    fn create_order_request(&self, order: &OrderRequest) -> GatewayResult<RequestSpec> {
        Ok(RequestSpec::post("/order").body(json!({
            "symbol": order.symbol,
            "side": order.side.as_str(),
            "qty": order.amount.to_string(),
        })))
    }

    fn fetch_order_request(&self, id: &str, symbol: &str) -> GatewayResult<RequestSpec> {
        Ok(RequestSpec::get("/order").param("orderId", id).param("symbol", symbol))
    }

    fn parse_order(&self, response: &Value, status: &OrderStatusNormalizer) -> GatewayResult<OrderInfo> {
        let data = &response["data"];
        let mut order = OrderInfo::new(
            safe_string(data, "orderId").unwrap_or_default(),
            safe_string(data, "symbol").unwrap_or_default(),
            status.order(safe_string(data, "status").as_deref()),
        );
        order.amount = safe_decimal_or(data, "qty", dec!(0));
        order.info = data.clone();
        Ok(order)
    }
}

/// Same endpoints as [`FixtureMapper`], but the asset-state endpoint is signed.
struct SignedStates;

impl EndpointMapper for SignedStates {
    fn markets_request(&self) -> RequestSpec {
        FixtureMapper.markets_request()
    }

    fn parse_markets(&self, response: &Value) -> GatewayResult<Vec<QueueSymbol>> {
        FixtureMapper.parse_markets(response)
    }

    fn tickers_request(&self) -> RequestSpec {
        FixtureMapper.tickers_request()
    }

    fn parse_tickers(&self, response: &Value) -> GatewayResult<Snapshot> {
        FixtureMapper.parse_tickers(response)
    }

    fn states_request(&self) -> GatewayResult<RequestSpec> {
        FixtureMapper.states_request()
    }

    fn states_signed(&self) -> bool {
        true
    }

    fn parse_states(&self, response: &Value) -> GatewayResult<Vec<AssetStatus>> {
        FixtureMapper.parse_states(response)
    }
}

struct Harness {
    exchange: RestExchange<FixtureMapper>,
    transport: Arc<StubTransport>,
    clock: Arc<ManualClock>,
    sink: Arc<MemorySink>,
}

fn credentials() -> ExchangeConfig {
    ExchangeConfig::new()
        .with_api_key("key")
        .with_api_secret("secret")
        .with_rate_limit_ms(0)
        .with_exchange_rate(dec!(1300))
}

fn harness(config: ExchangeConfig) -> Harness {
    let transport = Arc::new(StubTransport::default());
    let clock = Arc::new(ManualClock::new(T));
    let sink = Arc::new(MemorySink::new());

    let exchange = RestExchange::new(ExchangeProfile::bybit(), FixtureMapper, &config, MarketConfig::default())
        .unwrap()
        .with_transport(transport.clone())
        .with_clock(clock.clone())
        .with_sink(sink.clone());

    transport.reply(
        "/markets",
        json!({ "data": [
            { "symbol": "BTCUSDT", "base": "BTC", "quote": "USDT" },
            { "symbol": "ETHUSDT", "base": "ETH", "quote": "USDT" },
            { "symbol": "ETHEUR", "base": "ETH", "quote": "EUR" },
        ]}),
    );
    transport.reply(
        "/tickers",
        json!({ "data": [
            { "symbol": "BTCUSDT", "last": "50000", "bid": "49999", "ask": "50001", "volume": "10" },
            { "symbol": "ETHUSDT", "last": "3000", "bid": "2999", "ask": "3001", "volume": "100" },
        ]}),
    );

    Harness {
        exchange,
        transport,
        clock,
        sink,
    }
}

// === Market data ===

#[tokio::test]
async fn test_check_markets_builds_registry_and_goes_alive() {
    let h = harness(credentials());
    assert!(!h.exchange.is_alive());
    assert!(h.exchange.tickers().reset_cache);

    assert!(h.exchange.check_markets().await);
    assert!(h.exchange.is_alive());

    let tickers = h.exchange.tickers();
    assert_eq!(tickers.len(), 2);
    assert!(!tickers.reset_cache);
    assert_eq!(tickers.generation, 1);
    assert!(h.exchange.registry().get("ETHEUR").is_none());
}

#[tokio::test]
async fn test_check_markets_failure_marks_not_alive() {
    let h = harness(credentials());
    h.transport.fail("/markets");

    assert!(!h.exchange.check_markets().await);
    assert!(!h.exchange.is_alive());
    assert_eq!(h.sink.count(DiagnosticCode::SymbolDiscovery.with_base(BASE)), 1);
    assert!(!h.exchange.update_tickers().await);
    assert_eq!(h.transport.calls("/tickers"), 0);
}

#[tokio::test]
async fn test_check_markets_without_supported_pairs_is_not_alive() {
    let h = harness(credentials());
    h.transport.reply(
        "/markets",
        json!({ "data": [{ "symbol": "ETHEUR", "base": "ETH", "quote": "EUR" }] }),
    );

    assert!(!h.exchange.check_markets().await);
    assert!(!h.exchange.is_alive());
    assert_eq!(h.sink.count(DiagnosticCode::SymbolDiscovery.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_update_tickers_converts_and_invalidates() {
    let h = harness(credentials());
    h.exchange.check_markets().await;

    assert!(h.exchange.update_tickers().await);
    let tickers = h.exchange.tickers();
    assert!(tickers.connected);
    assert_eq!(tickers.find("BTCUSDT").unwrap().last_price, dec!(65000000));
    assert_eq!(tickers.find("ETHUSDT").unwrap().bid_price, dec!(3898700));

    h.clock.advance(61_000);
    h.transport.reply(
        "/tickers",
        json!({ "data": [{ "symbol": "ETHUSDT", "last": "3000", "volume": "100" }] }),
    );
    assert!(h.exchange.update_tickers().await);

    let tickers = h.exchange.tickers();
    assert!(tickers.find("BTCUSDT").is_none());
    assert_eq!(tickers.tickers.iter().filter(|t| t.symbol == DEAD_SYMBOL).count(), 1);
    assert_eq!(h.sink.count(DiagnosticCode::SymbolInvalidated.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_ticker_fetch_failure_disconnects() {
    let h = harness(credentials());
    h.exchange.check_markets().await;
    h.transport.fail("/tickers");

    assert!(!h.exchange.update_tickers().await);
    assert!(!h.exchange.tickers().connected);
    assert!(h.exchange.is_alive());
    assert_eq!(h.sink.count(DiagnosticCode::TickerFetch.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_malformed_tickers_reported_as_parse() {
    let h = harness(credentials());
    h.exchange.check_markets().await;
    h.transport.reply("/tickers", json!({ "result": { "list": [] } }));

    assert!(!h.exchange.update_tickers().await);
    assert!(!h.exchange.tickers().connected);
    assert_eq!(h.sink.count(DiagnosticCode::Parse.with_base(BASE)), 1);
    assert_eq!(h.sink.count(DiagnosticCode::TickerFetch.with_base(BASE)), 0);
}

#[tokio::test]
async fn test_oversized_quote_is_skipped_and_reported() {
    let h = harness(credentials());
    h.exchange.check_markets().await;
    h.transport.reply(
        "/tickers",
        json!({ "data": [
            { "symbol": "BTCUSDT", "last": "50000", "bid": "49999", "ask": "50001", "volume": "1e27" },
            { "symbol": "ETHUSDT", "last": "3000", "bid": "2999", "ask": "3001", "volume": "100" },
        ]}),
    );

    assert!(h.exchange.update_tickers().await);
    let tickers = h.exchange.tickers();
    let btc = tickers.find("BTCUSDT").unwrap();
    assert_eq!(btc.last_price, dec!(0));
    assert_eq!(btc.timestamp, 0);
    assert_eq!(tickers.find("ETHUSDT").unwrap().last_price, dec!(3900000));
    assert_eq!(h.sink.count(DiagnosticCode::Parse.with_base(BASE)), 1);

    // next cycle with sane values recovers
    h.transport.reply(
        "/tickers",
        json!({ "data": [
            { "symbol": "BTCUSDT", "last": "50000", "volume": "10" },
            { "symbol": "ETHUSDT", "last": "3000", "volume": "100" },
        ]}),
    );
    assert!(h.exchange.update_tickers().await);
    assert_eq!(h.exchange.tickers().find("BTCUSDT").unwrap().last_price, dec!(65000000));
}

#[tokio::test]
async fn test_request_reset_rebuilds_generation() {
    let h = harness(credentials());
    h.exchange.check_markets().await;
    h.transport.reply("/tickers", json!({ "data": [] }));
    h.exchange.update_tickers().await;
    assert!(h.exchange.tickers().live().next().is_none());

    h.exchange.request_reset();
    assert!(h.exchange.tickers().reset_cache);
    assert!(h.exchange.check_markets().await);

    let tickers = h.exchange.tickers();
    assert_eq!(tickers.generation, 2);
    assert_eq!(tickers.live().count(), 2);
}

#[tokio::test]
async fn test_state_refresh_is_gated() {
    let h = harness(credentials());
    h.exchange.check_markets().await;
    h.transport.reply(
        "/states",
        json!({ "data": [{ "coin": "BTC", "deposit": false, "withdraw": true, "chain": "BTC" }] }),
    );

    assert!(h.exchange.update_states().await);
    assert_eq!(h.transport.calls("/states"), 1);
    let btc = h.exchange.tickers().find("BTCUSDT").cloned().unwrap();
    assert!(!btc.deposit);
    assert!(btc.withdraw);
    assert!(!btc.network);

    // within the interval: no request
    h.clock.advance(60_000);
    assert!(h.exchange.update_states().await);
    assert_eq!(h.transport.calls("/states"), 1);

    h.clock.advance(240_001);
    assert!(h.exchange.update_states().await);
    assert_eq!(h.transport.calls("/states"), 2);
}

#[tokio::test]
async fn test_state_fetch_failure_is_reported() {
    let h = harness(credentials());
    h.transport.fail("/states");

    assert!(!h.exchange.update_states().await);
    assert_eq!(h.sink.count(DiagnosticCode::StateFetch.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_order_book_sorted_and_empty_on_error() {
    let h = harness(credentials());
    h.transport.reply(
        "/depth",
        json!({
            "bids": [["49990", "1"], ["50000", "2"]],
            "asks": [["50020", "1"], ["50010", "3"]],
        }),
    );

    let book = h.exchange.fetch_order_book("BTCUSDT", Some(5)).await;
    assert_eq!(book.best_bid().unwrap().price, dec!(50000));
    assert_eq!(book.best_ask().unwrap().price, dec!(50010));
    assert_eq!(
        h.transport.last("/depth").unwrap().query,
        "symbol=BTCUSDT&limit=5"
    );

    h.transport.fail("/depth");
    let book = h.exchange.fetch_order_book("BTCUSDT", None).await;
    assert_eq!(book.symbol, "BTCUSDT");
    assert!(book.bids.is_empty() && book.asks.is_empty());
    assert_eq!(h.sink.count(DiagnosticCode::OrderBook.with_base(BASE)), 1);
}

// === Authenticated ===

#[tokio::test]
async fn test_private_call_without_credentials_is_configuration_error() {
    let h = harness(ExchangeConfig::new().with_rate_limit_ms(0));

    let err = h.exchange.fetch_balances().await.unwrap_err();
    assert!(err.is_configuration_error());
    assert_eq!(h.transport.calls("/balances"), 0);
}

#[tokio::test]
async fn test_partial_credentials_fail_at_construction() {
    let config = ExchangeConfig::new().with_api_key("key");
    let result = RestExchange::new(ExchangeProfile::bybit(), FixtureMapper, &config, MarketConfig::default());
    assert!(matches!(result, Err(GatewayError::Configuration { .. })));
}

#[tokio::test]
async fn test_invalid_market_config_fails_at_construction() {
    let market = MarketConfig {
        volume_1m_base: dec!(0),
        ..Default::default()
    };
    let result = RestExchange::new(ExchangeProfile::bybit(), FixtureMapper, &credentials(), market);
    assert!(matches!(result, Err(GatewayError::Configuration { .. })));
}

#[tokio::test]
async fn test_signed_states_require_credentials_at_construction() {
    let anonymous = ExchangeConfig::new().with_rate_limit_ms(0);
    let result = RestExchange::new(ExchangeProfile::bybit(), SignedStates, &anonymous, MarketConfig::default());
    assert!(matches!(result, Err(GatewayError::Configuration { .. })));

    let transport = Arc::new(StubTransport::default());
    let exchange = RestExchange::new(ExchangeProfile::bybit(), SignedStates, &credentials(), MarketConfig::default())
        .unwrap()
        .with_transport(transport.clone())
        .with_clock(Arc::new(ManualClock::new(T)));
    transport.reply("/states", json!({ "data": [{ "coin": "BTC", "deposit": true }] }));

    assert!(exchange.update_states().await);
    assert!(transport.last("/states").unwrap().header("X-BAPI-SIGN").is_some());
}

#[tokio::test]
async fn test_balances_are_signed_and_parsed() {
    let h = harness(credentials());
    h.transport.reply(
        "/balances",
        json!({ "data": [{ "coin": "usdt", "free": "100", "locked": "5" }] }),
    );

    let balances = h.exchange.fetch_balances().await.unwrap();
    assert_eq!(balances.get("USDT").unwrap().total(), dec!(105));

    let signed = h.transport.last("/balances").unwrap();
    assert_eq!(signed.header("X-BAPI-API-KEY"), Some("key"));
    assert_eq!(signed.header("X-BAPI-TIMESTAMP"), Some("1700000000000"));
    assert!(signed.header("X-BAPI-SIGN").is_some());
}

#[tokio::test]
async fn test_remote_failure_yields_default_and_report() {
    let h = harness(credentials());
    h.transport.fail("/balances");

    let balances = h.exchange.fetch_balances().await.unwrap();
    assert!(balances.is_empty());
    assert_eq!(h.sink.count(DiagnosticCode::PrivateRequest.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_unsupported_operation_is_not_sent() {
    let h = harness(credentials());
    let err = h.exchange.fetch_deposits(Some("BTC")).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotSupported { .. }));
    assert!(h.transport.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_order_validation_and_status() {
    let h = harness(credentials());

    let err = h
        .exchange
        .create_order(&OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidOrder { .. }));

    let mut missing_price = OrderRequest::limit("BTCUSDT", OrderSide::Buy, dec!(1), dec!(50000));
    missing_price.price = None;
    assert!(h.exchange.create_order(&missing_price).await.is_err());

    h.transport.reply(
        "/order",
        json!({ "data": { "orderId": "42", "symbol": "BTCUSDT", "status": "New", "qty": "1" } }),
    );
    let order = h
        .exchange
        .create_order(&OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1)))
        .await
        .unwrap();
    assert_eq!(order.id, "42");
    assert_eq!(order.status, CanonicalStatus::Open);

    let signed = h.transport.last("/order").unwrap();
    assert_eq!(signed.body.as_deref(), Some(r#"{"qty":"1","side":"buy","symbol":"BTCUSDT"}"#));
}

#[tokio::test]
async fn test_unmapped_status_is_unknown_and_reported_once() {
    let h = harness(credentials());
    h.transport.reply(
        "/order",
        json!({ "data": { "orderId": "7", "symbol": "BTCUSDT", "status": "Mystery" } }),
    );

    let first = h.exchange.fetch_order("7", "BTCUSDT").await.unwrap();
    let second = h.exchange.fetch_order("7", "BTCUSDT").await.unwrap();
    assert_eq!(first.status, CanonicalStatus::Unknown);
    assert_eq!(second.status, CanonicalStatus::Unknown);
    assert_eq!(h.sink.count(DiagnosticCode::UnmappedStatus.with_base(BASE)), 1);
}

#[tokio::test]
async fn test_unmapped_status_reported_again_after_market_rebuild() {
    let h = harness(credentials());
    h.transport.reply(
        "/order",
        json!({ "data": { "orderId": "7", "symbol": "BTCUSDT", "status": "Mystery" } }),
    );

    h.exchange.fetch_order("7", "BTCUSDT").await.unwrap();
    h.exchange.fetch_order("7", "BTCUSDT").await.unwrap();
    assert_eq!(h.sink.count(DiagnosticCode::UnmappedStatus.with_base(BASE)), 1);

    assert!(h.exchange.check_markets().await);
    h.exchange.fetch_order("7", "BTCUSDT").await.unwrap();
    assert_eq!(h.sink.count(DiagnosticCode::UnmappedStatus.with_base(BASE)), 2);
}
