//! Endpoint mapping - 거래소별 URL 및 응답 변환

use serde_json::Value;

use crate::errors::{GatewayError, GatewayResult};
use crate::market::OrderStatusNormalizer;
use crate::signing::RequestSpec;
use crate::types::{
    AssetStatus, Balances, DepositInfo, OrderBook, OrderInfo, OrderRequest, QueueSymbol, Snapshot,
    TradeInfo, WithdrawalInfo,
};

fn not_supported<T>(feature: &str) -> GatewayResult<T> {
    Err(GatewayError::NotSupported {
        feature: feature.into(),
    })
}

/// Exchange-specific request shapes and response parsing.
///
/// Only symbol discovery and the ticker snapshot are required. Every other operation defaults
/// to `NotSupported`, which the adapter hands back to the caller without touching the
/// network. Parsers that produce order or transfer records resolve statuses through the
/// given normalizer.
pub trait EndpointMapper: Send + Sync {
    // === Public ===

    fn markets_request(&self) -> RequestSpec;

    fn parse_markets(&self, response: &Value) -> GatewayResult<Vec<QueueSymbol>>;

    fn tickers_request(&self) -> RequestSpec;

    fn parse_tickers(&self, response: &Value) -> GatewayResult<Snapshot>;

    fn order_book_request(&self, symbol: &str, limit: Option<u32>) -> GatewayResult<RequestSpec> {
        let _ = (symbol, limit);
        not_supported("fetchOrderBook")
    }

    fn parse_order_book(&self, symbol: &str, response: &Value) -> GatewayResult<OrderBook> {
        let _ = (symbol, response);
        not_supported("fetchOrderBook")
    }

    // === Asset state ===

    fn states_request(&self) -> GatewayResult<RequestSpec> {
        not_supported("fetchCurrencies")
    }

    /// Whether the state endpoint needs a signature.
    fn states_signed(&self) -> bool {
        false
    }

    fn parse_states(&self, response: &Value) -> GatewayResult<Vec<AssetStatus>> {
        let _ = response;
        not_supported("fetchCurrencies")
    }

    // === Private ===

    fn balances_request(&self) -> GatewayResult<RequestSpec> {
        not_supported("fetchBalance")
    }

    fn parse_balances(&self, response: &Value) -> GatewayResult<Balances> {
        let _ = response;
        not_supported("fetchBalance")
    }

    fn create_order_request(&self, order: &OrderRequest) -> GatewayResult<RequestSpec> {
        let _ = order;
        not_supported("createOrder")
    }

    fn cancel_order_request(&self, id: &str, symbol: &str) -> GatewayResult<RequestSpec> {
        let _ = (id, symbol);
        not_supported("cancelOrder")
    }

    fn fetch_order_request(&self, id: &str, symbol: &str) -> GatewayResult<RequestSpec> {
        let _ = (id, symbol);
        not_supported("fetchOrder")
    }

    fn open_orders_request(&self, symbol: Option<&str>) -> GatewayResult<RequestSpec> {
        let _ = symbol;
        not_supported("fetchOpenOrders")
    }

    fn parse_order(&self, response: &Value, status: &OrderStatusNormalizer) -> GatewayResult<OrderInfo> {
        let _ = (response, status);
        not_supported("parseOrder")
    }

    fn parse_orders(
        &self,
        response: &Value,
        status: &OrderStatusNormalizer,
    ) -> GatewayResult<Vec<OrderInfo>> {
        let _ = (response, status);
        not_supported("parseOrders")
    }

    fn my_trades_request(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> GatewayResult<RequestSpec> {
        let _ = (symbol, since, limit);
        not_supported("fetchMyTrades")
    }

    fn parse_trades(&self, response: &Value, status: &OrderStatusNormalizer) -> GatewayResult<Vec<TradeInfo>> {
        let _ = (response, status);
        not_supported("fetchMyTrades")
    }

    fn deposits_request(&self, currency: Option<&str>) -> GatewayResult<RequestSpec> {
        let _ = currency;
        not_supported("fetchDeposits")
    }

    fn parse_deposits(
        &self,
        response: &Value,
        status: &OrderStatusNormalizer,
    ) -> GatewayResult<Vec<DepositInfo>> {
        let _ = (response, status);
        not_supported("fetchDeposits")
    }

    fn withdrawals_request(&self, currency: Option<&str>) -> GatewayResult<RequestSpec> {
        let _ = currency;
        not_supported("fetchWithdrawals")
    }

    fn parse_withdrawals(
        &self,
        response: &Value,
        status: &OrderStatusNormalizer,
    ) -> GatewayResult<Vec<WithdrawalInfo>> {
        let _ = (response, status);
        not_supported("fetchWithdrawals")
    }
}
