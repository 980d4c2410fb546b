//! Canonical status - 주문/입출금 공통 상태

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized order or transfer state, independent of the exchange vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Open,
    PartiallyFilled,
    Closed,
    Canceled,
    Rejected,
    Pending,
    Processing,
    Completed,
    Failed,
    /// Vendor string with no mapping. Needs investigation; never treated as open.
    #[default]
    Unknown,
}

impl CanonicalStatus {
    pub const ALL: [CanonicalStatus; 10] = [
        CanonicalStatus::Open,
        CanonicalStatus::PartiallyFilled,
        CanonicalStatus::Closed,
        CanonicalStatus::Canceled,
        CanonicalStatus::Rejected,
        CanonicalStatus::Pending,
        CanonicalStatus::Processing,
        CanonicalStatus::Completed,
        CanonicalStatus::Failed,
        CanonicalStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Open => "open",
            CanonicalStatus::PartiallyFilled => "partially_filled",
            CanonicalStatus::Closed => "closed",
            CanonicalStatus::Canceled => "canceled",
            CanonicalStatus::Rejected => "rejected",
            CanonicalStatus::Pending => "pending",
            CanonicalStatus::Processing => "processing",
            CanonicalStatus::Completed => "completed",
            CanonicalStatus::Failed => "failed",
            CanonicalStatus::Unknown => "unknown",
        }
    }

    /// 종료 상태 여부
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CanonicalStatus::Closed
                | CanonicalStatus::Canceled
                | CanonicalStatus::Rejected
                | CanonicalStatus::Completed
                | CanonicalStatus::Failed
        )
    }

    /// 진행 중 상태 여부 (Unknown은 어느 쪽도 아님)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CanonicalStatus::Open
                | CanonicalStatus::PartiallyFilled
                | CanonicalStatus::Pending
                | CanonicalStatus::Processing
        )
    }

    pub fn is_unknown(&self) -> bool {
        *self == CanonicalStatus::Unknown
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
