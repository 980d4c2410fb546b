//! Generic REST adapter
//!
//! One `RestExchange` per exchange: a profile, an endpoint mapper and the shared market-data
//! engine. Fetches happen without holding the ticker lock; the write lock is taken only for
//! the synchronous merge that follows.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use super::{EndpointMapper, ExchangeProfile};
use crate::client::{ExchangeConfig, HttpClient, MarketConfig, RateLimiter, Transport};
use crate::diagnostics::{DiagnosticCode, DiagnosticEvent, DiagnosticSink, ReportOnce, TracingSink};
use crate::errors::{GatewayError, GatewayResult};
use crate::market::{NetworkStateTracker, OrderStatusNormalizer, SymbolRegistry, TickerReconciler};
use crate::signing::{Credentials, RequestSpec, SignatureStamp, SignedRequest, Signer};
use crate::types::{
    Balances, DepositInfo, ExchangeAdapter, ExchangeId, OrderBook, OrderInfo, OrderRequest,
    OrderType, SharedTickers, Tickers, TradeInfo, WithdrawalInfo,
};
use crate::utils::time::{Clock, SystemClock};

/// 범용 REST 거래소 어댑터
pub struct RestExchange<M: EndpointMapper> {
    profile: ExchangeProfile,
    mapper: M,
    transport: Arc<dyn Transport>,
    signer: Option<Signer>,
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DiagnosticSink>,
    registry: RwLock<SymbolRegistry>,
    reconciler: TickerReconciler,
    tracker: NetworkStateTracker,
    status: OrderStatusNormalizer,
    tickers: SharedTickers,
    alive: AtomicBool,
    unconverted_reported: ReportOnce<String>,
}

impl<M: EndpointMapper> RestExchange<M> {
    /// 새 어댑터 생성
    ///
    /// Credentials are optional; when present they are validated against the profile's
    /// signing scheme right away. A mapper whose state endpoint is signed needs them.
    pub fn new(
        profile: ExchangeProfile,
        mapper: M,
        config: &ExchangeConfig,
        market: MarketConfig,
    ) -> GatewayResult<Self> {
        market.validate()?;
        let client = HttpClient::new(profile.url(config.is_sandbox())?, config)?;

        let signer = if config.api_key().is_some() || config.secret().is_some() {
            Some(Signer::new(
                profile.scheme,
                profile.headers.clone(),
                Credentials::from_config(config)?,
            )?)
        } else {
            None
        };
        if signer.is_none() && mapper.states_signed() {
            return Err(GatewayError::configuration(format!(
                "{}: asset state endpoint is signed, API credentials required",
                profile.name
            )));
        }

        let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
        let status = Self::normalizer(&profile, sink.clone());

        let mut tickers =
            Tickers::new(profile.name.clone()).with_rates(config.exchange_rate(), market.btc_price);
        tickers.reset_cache = true;

        Ok(Self {
            registry: RwLock::new(SymbolRegistry::new(&profile.quote_currencies)),
            reconciler: TickerReconciler::new(market, &profile.stablecoins),
            tracker: NetworkStateTracker::new(),
            transport: Arc::new(client),
            rate_limiter: RateLimiter::new(config.rate_limit_ms()),
            clock: Arc::new(SystemClock),
            tickers: Arc::new(RwLock::new(tickers)),
            alive: AtomicBool::new(false),
            unconverted_reported: ReportOnce::new(),
            profile,
            mapper,
            signer,
            sink,
            status,
        })
    }

    fn normalizer(profile: &ExchangeProfile, sink: Arc<dyn DiagnosticSink>) -> OrderStatusNormalizer {
        OrderStatusNormalizer::new(
            profile.name.clone(),
            profile.vocabulary.clone(),
            sink,
            DiagnosticCode::UnmappedStatus.with_base(profile.code_base),
        )
    }

    /// 전송 계층 교체 (테스트 등)
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// 시계 교체
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 진단 싱크 교체
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.status = Self::normalizer(&self.profile, sink.clone());
        self.sink = sink;
        self
    }

    pub fn profile(&self) -> &ExchangeProfile {
        &self.profile
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn status_normalizer(&self) -> &OrderStatusNormalizer {
        &self.status
    }

    /// 현재 레지스트리 복사본
    pub fn registry(&self) -> SymbolRegistry {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn read_tickers(&self) -> RwLockReadGuard<'_, Tickers> {
        self.tickers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_tickers(&self) -> RwLockWriteGuard<'_, Tickers> {
        self.tickers.write().unwrap_or_else(|e| e.into_inner())
    }

    fn report(&self, code: DiagnosticCode, event: impl Into<DiagnosticEvent>) {
        self.sink.report(
            &self.profile.name,
            event.into(),
            code.with_base(self.profile.code_base),
        );
    }

    /// Reports a failed fetch. Payloads the mapper could not read go under `Parse`,
    /// everything else under `code`.
    fn report_failure(&self, code: DiagnosticCode, err: GatewayError) {
        let code = match err {
            GatewayError::ParseError { .. } => DiagnosticCode::Parse,
            _ => code,
        };
        self.report(code, err);
    }

    fn signer(&self) -> GatewayResult<&Signer> {
        self.signer.as_ref().ok_or_else(|| {
            GatewayError::configuration(format!("{}: API credentials required", self.profile.name))
        })
    }

    async fn send(&self, signed: &SignedRequest) -> GatewayResult<Value> {
        self.rate_limiter.throttle().await;
        self.transport.execute(signed).await
    }

    async fn public(&self, request: &RequestSpec) -> GatewayResult<Value> {
        let signed = SignedRequest::public(request)?;
        self.send(&signed).await
    }

    async fn private(&self, request: &RequestSpec) -> GatewayResult<Value> {
        let signed = self
            .signer()?
            .sign(request, &SignatureStamp::now(self.clock.as_ref()))?;
        self.send(&signed).await
    }

    /// Authenticated call with the boundary error policy.
    ///
    /// Local failures (no credentials, unsupported operation, unsignable request) are returned
    /// as `Err`. Remote and parse failures are reported and replaced by `T::default()`.
    async fn private_or_default<T, F>(
        &self,
        request: GatewayResult<RequestSpec>,
        parse: F,
    ) -> GatewayResult<T>
    where
        T: Default + Send,
        F: FnOnce(&Value) -> GatewayResult<T> + Send,
    {
        let signer = self.signer()?;
        let request = request?;
        let signed = signer.sign(&request, &SignatureStamp::now(self.clock.as_ref()))?;

        match self.send(&signed).await.and_then(|value| parse(&value)) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                self.report_failure(DiagnosticCode::PrivateRequest, err);
                Ok(T::default())
            },
        }
    }
}

#[async_trait]
impl<M: EndpointMapper> ExchangeAdapter for RestExchange<M> {
    fn id(&self) -> ExchangeId {
        self.profile.id
    }

    fn name(&self) -> &str {
        &self.profile.name
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn tickers(&self) -> Tickers {
        self.read_tickers().clone()
    }

    fn shared_tickers(&self) -> SharedTickers {
        self.tickers.clone()
    }

    fn request_reset(&self) {
        self.write_tickers().reset_cache = true;
    }

    async fn check_markets(&self) -> bool {
        let request = self.mapper.markets_request();
        let listed = match self
            .public(&request)
            .await
            .and_then(|value| self.mapper.parse_markets(&value))
        {
            Ok(listed) => listed,
            Err(err) => {
                self.alive.store(false, Ordering::SeqCst);
                self.report_failure(DiagnosticCode::SymbolDiscovery, err);
                return false;
            },
        };

        let symbols = {
            let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
            let report = registry.rebuild(listed);
            if !report.duplicates.is_empty() || !report.overridden.is_empty() {
                debug!(
                    exchange = %self.profile.name,
                    duplicates = ?report.duplicates,
                    overridden = ?report.overridden,
                    "registry adjusted"
                );
            }
            registry.symbols().to_vec()
        };

        if symbols.is_empty() {
            self.alive.store(false, Ordering::SeqCst);
            self.report(
                DiagnosticCode::SymbolDiscovery,
                DiagnosticEvent::message("no tradable pairs in supported quote currencies"),
            );
            return false;
        }

        let generation = {
            let mut tickers = self.write_tickers();
            tickers.rebuild(&symbols);
            tickers.generation
        };
        self.unconverted_reported.reset();
        self.status.reset_reported();
        self.alive.store(true, Ordering::SeqCst);
        info!(
            exchange = %self.profile.name,
            symbols = symbols.len(),
            generation,
            "markets checked"
        );
        true
    }

    async fn update_tickers(&self) -> bool {
        if !self.is_alive() {
            return false;
        }

        let request = self.mapper.tickers_request();
        let snapshot = match self
            .public(&request)
            .await
            .and_then(|value| self.mapper.parse_tickers(&value))
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.write_tickers().connected = false;
                self.report_failure(DiagnosticCode::TickerFetch, err);
                return false;
            },
        };

        let now = self.clock.now_ms();
        let report = {
            let mut tickers = self.write_tickers();
            let report = self.reconciler.reconcile(&mut tickers, &snapshot, now);
            tickers.connected = true;
            report
        };

        for symbol in &report.invalidated {
            self.report(
                DiagnosticCode::SymbolInvalidated,
                DiagnosticEvent::message(format!("{symbol} missing from ticker snapshot, invalidated")),
            );
        }
        for symbol in &report.out_of_range {
            self.report(
                DiagnosticCode::Parse,
                DiagnosticEvent::message(format!("{symbol} quote out of decimal range, skipped this cycle")),
            );
        }
        for symbol in &report.unconverted {
            if self.unconverted_reported.first(symbol.clone()) {
                self.report(
                    DiagnosticCode::UnconvertedQuote,
                    DiagnosticEvent::message(format!(
                        "{symbol} has an unrecognized quote currency, prices left unconverted"
                    )),
                );
            }
        }
        debug!(
            exchange = %self.profile.name,
            updated = report.updated,
            invalidated = report.invalidated.len(),
            out_of_range = report.out_of_range.len(),
            awaiting_btc = report.awaiting_btc.len(),
            "tickers reconciled"
        );
        true
    }

    async fn update_states(&self) -> bool {
        let now = self.clock.now_ms();
        if now < self.read_tickers().next_state_check {
            return true;
        }
        self.write_tickers().next_state_check = now + self.reconciler.config().state_check_interval_ms;

        let request = match self.mapper.states_request() {
            Ok(request) => request,
            Err(GatewayError::NotSupported { .. }) => return true,
            Err(err) => {
                self.report(DiagnosticCode::StateFetch, err);
                return false;
            },
        };

        let response = if self.mapper.states_signed() {
            self.private(&request).await
        } else {
            self.public(&request).await
        };

        match response.and_then(|value| self.mapper.parse_states(&value)) {
            Ok(statuses) => {
                let touched = {
                    let mut tickers = self.write_tickers();
                    self.tracker.apply(&mut tickers, &statuses)
                };
                debug!(exchange = %self.profile.name, touched, "asset states refreshed");
                true
            },
            Err(err) => {
                self.report_failure(DiagnosticCode::StateFetch, err);
                false
            },
        }
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> OrderBook {
        let empty = || OrderBook {
            symbol: symbol.to_string(),
            ..Default::default()
        };

        let request = match self.mapper.order_book_request(symbol, limit) {
            Ok(request) => request,
            Err(err) => {
                self.report(DiagnosticCode::OrderBook, err);
                return empty();
            },
        };

        match self
            .public(&request)
            .await
            .and_then(|value| self.mapper.parse_order_book(symbol, &value))
        {
            Ok(book) => book,
            Err(err) => {
                self.report_failure(DiagnosticCode::OrderBook, err);
                empty()
            },
        }
    }

    async fn fetch_balances(&self) -> GatewayResult<Balances> {
        self.private_or_default(self.mapper.balances_request(), |value| {
            self.mapper.parse_balances(value)
        })
        .await
    }

    async fn create_order(&self, request: &OrderRequest) -> GatewayResult<OrderInfo> {
        if request.amount <= Decimal::ZERO {
            return Err(GatewayError::InvalidOrder {
                message: format!("amount must be positive, got {}", request.amount),
            });
        }
        if request.order_type == OrderType::Limit && request.price.is_none() {
            return Err(GatewayError::InvalidOrder {
                message: "limit order requires a price".into(),
            });
        }

        self.private_or_default(self.mapper.create_order_request(request), |value| {
            self.mapper.parse_order(value, &self.status)
        })
        .await
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> GatewayResult<OrderInfo> {
        self.private_or_default(self.mapper.cancel_order_request(id, symbol), |value| {
            self.mapper.parse_order(value, &self.status)
        })
        .await
    }

    async fn fetch_order(&self, id: &str, symbol: &str) -> GatewayResult<OrderInfo> {
        self.private_or_default(self.mapper.fetch_order_request(id, symbol), |value| {
            self.mapper.parse_order(value, &self.status)
        })
        .await
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> GatewayResult<Vec<OrderInfo>> {
        self.private_or_default(self.mapper.open_orders_request(symbol), |value| {
            self.mapper.parse_orders(value, &self.status)
        })
        .await
    }

    async fn fetch_my_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> GatewayResult<Vec<TradeInfo>> {
        self.private_or_default(self.mapper.my_trades_request(symbol, since, limit), |value| {
            self.mapper.parse_trades(value, &self.status)
        })
        .await
    }

    async fn fetch_deposits(&self, currency: Option<&str>) -> GatewayResult<Vec<DepositInfo>> {
        self.private_or_default(self.mapper.deposits_request(currency), |value| {
            self.mapper.parse_deposits(value, &self.status)
        })
        .await
    }

    async fn fetch_withdrawals(
        &self,
        currency: Option<&str>,
    ) -> GatewayResult<Vec<WithdrawalInfo>> {
        self.private_or_default(self.mapper.withdrawals_request(currency), |value| {
            self.mapper.parse_withdrawals(value, &self.status)
        })
        .await
    }
}
