//! Unified types - 거래소 공통 데이터 모델

mod balance;
mod currency;
mod exchange;
mod market;
mod order;
mod orderbook;
mod status;
mod ticker;
mod trade;
mod transaction;

pub use balance::{Balance, Balances};
pub use currency::{AssetStatus, ChainStatus, WNetwork, WState};
pub use exchange::{ExchangeAdapter, ExchangeId};
pub use market::QueueSymbol;
pub use order::{OrderInfo, OrderRequest, OrderSide, OrderType};
pub use orderbook::{OrderBook, OrderBookEntry};
pub use status::CanonicalStatus;
pub use ticker::{RawQuote, SharedTickers, Snapshot, Ticker, Tickers, DEAD_SYMBOL};
pub use trade::TradeInfo;
pub use transaction::{DepositInfo, WithdrawalInfo};
