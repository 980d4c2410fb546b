//! Order status normalizer
//!
//! Every exchange speaks its own status vocabulary for orders, deposits and withdrawals. A
//! [`StatusVocabulary`] is the finite lookup table for one exchange; the normalizer resolves
//! raw strings through it and falls back to [`CanonicalStatus::Unknown`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, ReportOnce};
use crate::types::{CanonicalStatus, ExchangeId};

use CanonicalStatus::*;

/// 상태 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Order,
    Deposit,
    Withdrawal,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusKind::Order => "order",
            StatusKind::Deposit => "deposit",
            StatusKind::Withdrawal => "withdrawal",
        })
    }
}

/// 거래소별 상태 어휘 (키는 소문자)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusVocabulary {
    order: HashMap<String, CanonicalStatus>,
    deposit: HashMap<String, CanonicalStatus>,
    withdrawal: HashMap<String, CanonicalStatus>,
}

impl StatusVocabulary {
    pub fn new(
        order: &[(&str, CanonicalStatus)],
        deposit: &[(&str, CanonicalStatus)],
        withdrawal: &[(&str, CanonicalStatus)],
    ) -> Self {
        fn table(entries: &[(&str, CanonicalStatus)]) -> HashMap<String, CanonicalStatus> {
            entries.iter().map(|(raw, status)| (raw.to_lowercase(), *status)).collect()
        }
        Self {
            order: table(order),
            deposit: table(deposit),
            withdrawal: table(withdrawal),
        }
    }

    /// 프리셋 어휘
    pub fn preset(id: ExchangeId) -> Self {
        PRESETS.get(&id).cloned().unwrap_or_default()
    }

    /// 항목 추가 또는 교체
    pub fn insert(&mut self, kind: StatusKind, raw: &str, status: CanonicalStatus) {
        self.table_mut(kind).insert(raw.to_lowercase(), status);
    }

    /// Case-insensitive lookup. `None` for strings outside the vocabulary.
    pub fn lookup(&self, kind: StatusKind, raw: &str) -> Option<CanonicalStatus> {
        self.table(kind).get(&raw.trim().to_lowercase()).copied()
    }

    pub fn len(&self, kind: StatusKind) -> usize {
        self.table(kind).len()
    }

    fn table(&self, kind: StatusKind) -> &HashMap<String, CanonicalStatus> {
        match kind {
            StatusKind::Order => &self.order,
            StatusKind::Deposit => &self.deposit,
            StatusKind::Withdrawal => &self.withdrawal,
        }
    }

    fn table_mut(&mut self, kind: StatusKind) -> &mut HashMap<String, CanonicalStatus> {
        match kind {
            StatusKind::Order => &mut self.order,
            StatusKind::Deposit => &mut self.deposit,
            StatusKind::Withdrawal => &mut self.withdrawal,
        }
    }
}

static PRESETS: Lazy<HashMap<ExchangeId, StatusVocabulary>> = Lazy::new(|| {
    let mut presets = HashMap::new();

    presets.insert(
        ExchangeId::Bybit,
        StatusVocabulary::new(
            &[
                ("Created", Pending),
                ("New", Open),
                ("PartiallyFilled", PartiallyFilled),
                ("Filled", Closed),
                ("Cancelled", Canceled),
                ("PartiallyFilledCanceled", Canceled),
                ("Deactivated", Canceled),
                ("Rejected", Rejected),
                ("Untriggered", Pending),
                ("Triggered", Open),
            ],
            &[
                ("1", Pending),
                ("2", Processing),
                ("3", Completed),
                ("4", Failed),
                ("10011", Processing),
                ("10012", Completed),
            ],
            &[
                ("SecurityCheck", Pending),
                ("Pending", Pending),
                ("MoreInformationRequired", Pending),
                ("BlockchainConfirmed", Processing),
                ("success", Completed),
                ("CancelByUser", Canceled),
                ("Reject", Rejected),
                ("Fail", Failed),
            ],
        ),
    );

    presets.insert(
        ExchangeId::Binance,
        StatusVocabulary::new(
            &[
                ("NEW", Open),
                ("PENDING_NEW", Pending),
                ("PARTIALLY_FILLED", PartiallyFilled),
                ("FILLED", Closed),
                ("PENDING_CANCEL", Open),
                ("CANCELED", Canceled),
                ("EXPIRED", Canceled),
                ("EXPIRED_IN_MATCH", Canceled),
                ("REJECTED", Rejected),
            ],
            &[
                ("0", Pending),
                ("6", Processing),
                ("8", Pending),
                ("1", Completed),
                ("7", Failed),
                ("2", Rejected),
            ],
            &[
                ("0", Pending),
                ("2", Pending),
                ("4", Processing),
                ("6", Completed),
                ("1", Canceled),
                ("3", Rejected),
                ("5", Failed),
            ],
        ),
    );

    presets.insert(
        ExchangeId::Kucoin,
        StatusVocabulary::new(
            &[
                ("active", Open),
                ("open", Open),
                ("match", PartiallyFilled),
                ("done", Closed),
                ("cancelled", Canceled),
                ("canceled", Canceled),
            ],
            &[
                ("WAIT_TRM_MGT", Pending),
                ("PROCESSING", Processing),
                ("SUCCESS", Completed),
                ("FAILURE", Failed),
            ],
            &[
                ("REVIEW", Pending),
                ("PROCESSING", Processing),
                ("WALLET_PROCESSING", Processing),
                ("SUCCESS", Completed),
                ("FAILURE", Failed),
            ],
        ),
    );

    presets.insert(
        ExchangeId::Coinone,
        StatusVocabulary::new(
            &[
                ("live", Open),
                ("not_triggered", Pending),
                ("triggered", Open),
                ("partially_filled", PartiallyFilled),
                ("filled", Closed),
                ("canceled", Canceled),
                ("partially_canceled", Canceled),
                ("not_triggered_canceled", Canceled),
                ("not_triggered_partially_canceled", Canceled),
            ],
            &[
                ("DEPOSIT_WAIT", Pending),
                ("DEPOSIT_SUCCESS", Completed),
                ("DEPOSIT_FAIL", Failed),
                ("DEPOSIT_REFUND", Canceled),
                ("DEPOSIT_REJECT", Rejected),
            ],
            &[
                ("WITHDRAWAL_REGISTER", Pending),
                ("WITHDRAWAL_WAIT", Processing),
                ("WITHDRAWAL_REFUND_REQUEST", Processing),
                ("WITHDRAWAL_SUCCESS", Completed),
                ("WITHDRAWAL_FAIL", Failed),
                ("WITHDRAWAL_REFUND", Canceled),
                ("WITHDRAWAL_REJECT", Rejected),
            ],
        ),
    );

    presets.insert(
        ExchangeId::Mexc,
        StatusVocabulary::new(
            &[
                ("NEW", Open),
                ("PARTIALLY_FILLED", PartiallyFilled),
                ("FILLED", Closed),
                ("CANCELED", Canceled),
                ("PARTIALLY_CANCELED", Canceled),
            ],
            &[
                ("2", Pending),
                ("3", Pending),
                ("4", Pending),
                ("6", Processing),
                ("9", Processing),
                ("5", Completed),
                ("12", Completed),
                ("7", Rejected),
                ("8", Canceled),
                ("1", Failed),
                ("10", Failed),
                ("11", Failed),
            ],
            &[
                ("1", Pending),
                ("2", Processing),
                ("3", Processing),
                ("4", Processing),
                ("5", Processing),
                ("6", Processing),
                ("10", Processing),
                ("7", Completed),
                ("8", Failed),
                ("9", Canceled),
            ],
        ),
    );

    presets
});

/// Resolves raw status strings for one exchange.
///
/// Unmapped strings resolve to `unknown` and are reported to the sink once per
/// (kind, raw string) until [`reset_reported`](Self::reset_reported) or the bounded set fills.
pub struct OrderStatusNormalizer {
    exchange: String,
    vocabulary: StatusVocabulary,
    sink: Arc<dyn DiagnosticSink>,
    code: u32,
    reported: ReportOnce<(StatusKind, String)>,
}

impl OrderStatusNormalizer {
    pub fn new(
        exchange: impl Into<String>,
        vocabulary: StatusVocabulary,
        sink: Arc<dyn DiagnosticSink>,
        code: u32,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            vocabulary,
            sink,
            code,
            reported: ReportOnce::new(),
        }
    }

    pub fn vocabulary(&self) -> &StatusVocabulary {
        &self.vocabulary
    }

    /// 상태 정규화 (없거나 알 수 없으면 Unknown)
    pub fn normalize(&self, kind: StatusKind, raw: Option<&str>) -> CanonicalStatus {
        let Some(raw) = raw else {
            return Unknown;
        };
        if let Some(status) = self.vocabulary.lookup(kind, raw) {
            return status;
        }

        if self.reported.first((kind, raw.to_string())) {
            self.sink.report(
                &self.exchange,
                DiagnosticEvent::message(format!("unmapped {kind} status '{raw}'")),
                self.code,
            );
        }
        Unknown
    }

    /// 보고 기록 초기화
    pub fn reset_reported(&self) {
        self.reported.reset();
    }

    pub fn order(&self, raw: Option<&str>) -> CanonicalStatus {
        self.normalize(StatusKind::Order, raw)
    }

    pub fn deposit(&self, raw: Option<&str>) -> CanonicalStatus {
        self.normalize(StatusKind::Deposit, raw)
    }

    pub fn withdrawal(&self, raw: Option<&str>) -> CanonicalStatus {
        self.normalize(StatusKind::Withdrawal, raw)
    }
}

impl fmt::Debug for OrderStatusNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStatusNormalizer")
            .field("exchange", &self.exchange)
            .field("code", &self.code)
            .finish()
    }
}
