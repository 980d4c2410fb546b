//! Market data engine - 거래쌍, 시세, 입출금 상태, 주문 상태

mod network;
mod reconciler;
mod registry;
mod status;

pub use network::NetworkStateTracker;
pub use reconciler::{Conversion, ReconcileReport, TickerReconciler};
pub use registry::{split_base, RegistryReport, SymbolRegistry};
pub use status::{OrderStatusNormalizer, StatusKind, StatusVocabulary};
