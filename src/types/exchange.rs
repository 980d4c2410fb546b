//! Exchange adapter trait - 거래소 통합 인터페이스

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{GatewayError, GatewayResult};
use super::{
    Balances, DepositInfo, OrderBook, OrderInfo, OrderRequest, SharedTickers, Tickers, TradeInfo,
    WithdrawalInfo,
};

/// Exchange ID - identifies the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Bybit,
    Binance,
    Kucoin,
    Coinone,
    Mexc,
}

impl ExchangeId {
    pub const ALL: [ExchangeId; 5] = [
        ExchangeId::Bybit,
        ExchangeId::Binance,
        ExchangeId::Kucoin,
        ExchangeId::Coinone,
        ExchangeId::Mexc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Bybit => "bybit",
            ExchangeId::Binance => "binance",
            ExchangeId::Kucoin => "kucoin",
            ExchangeId::Coinone => "coinone",
            ExchangeId::Mexc => "mexc",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExchangeId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GatewayError::NotSupported {
                feature: format!("exchange {s}"),
            })
    }
}

/// 거래소 통합 인터페이스
///
/// Market-data operations never fail: transport and parse problems are reported to the
/// adapter's diagnostic sink and the call returns a safe default (`false`, an empty book).
/// Authenticated operations return `Err` only for local configuration problems such as
/// missing credentials; remote failures again degrade to empty collections or a zero-valued
/// record whose status is `unknown`.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    // === 메타데이터 ===

    /// 거래소 ID
    fn id(&self) -> ExchangeId;

    /// 거래소 이름
    fn name(&self) -> &str;

    /// Liveness flag. Cleared when symbol discovery fails; the registry is only
    /// trustworthy while this is true.
    fn is_alive(&self) -> bool;

    /// Point-in-time copy of the ticker set.
    fn tickers(&self) -> Tickers;

    /// Shared handle to the live ticker set written by this adapter's polling task.
    fn shared_tickers(&self) -> SharedTickers;

    /// Requests a registry rebuild on the next polling cycle.
    fn request_reset(&self);

    // === 시세 ===

    /// Symbol discovery. Rebuilds the registry and starts a new ticker generation.
    async fn check_markets(&self) -> bool;

    /// One reconciliation pass over a fresh ticker snapshot.
    async fn update_tickers(&self) -> bool;

    /// Refreshes deposit/withdraw/network state, at most once per state check interval.
    async fn update_states(&self) -> bool;

    /// 호가창 조회
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> OrderBook;

    // === Private API ===

    /// 잔고 조회
    async fn fetch_balances(&self) -> GatewayResult<Balances>;

    /// 주문 생성
    async fn create_order(&self, request: &OrderRequest) -> GatewayResult<OrderInfo>;

    /// 주문 취소
    async fn cancel_order(&self, id: &str, symbol: &str) -> GatewayResult<OrderInfo>;

    /// 주문 조회
    async fn fetch_order(&self, id: &str, symbol: &str) -> GatewayResult<OrderInfo>;

    /// 미체결 주문 목록
    async fn fetch_open_orders(&self, symbol: Option<&str>) -> GatewayResult<Vec<OrderInfo>>;

    /// 내 체결 내역
    async fn fetch_my_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> GatewayResult<Vec<TradeInfo>>;

    /// 입금 내역
    async fn fetch_deposits(&self, currency: Option<&str>) -> GatewayResult<Vec<DepositInfo>>;

    /// 출금 내역
    async fn fetch_withdrawals(&self, currency: Option<&str>)
        -> GatewayResult<Vec<WithdrawalInfo>>;
}
