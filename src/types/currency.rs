//! Asset state types - 화폐별 입출금 및 체인 네트워크 상태

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 기준 화폐별 입출금 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WState {
    /// 기준 화폐 코드
    pub base_name: String,
    /// 거래 가능
    pub active: bool,
    /// 입금 가능
    pub deposit: bool,
    /// 출금 가능
    pub withdraw: bool,
    /// 체인별 네트워크 (이름은 `{asset}-{chain}` 형식, WState 안에서 유일)
    #[serde(default)]
    pub networks: Vec<WNetwork>,
}

impl WState {
    /// 새 상태 생성 (기본값은 모두 가능)
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            active: true,
            deposit: true,
            withdraw: true,
            networks: Vec::new(),
        }
    }

    /// 네트워크 조회
    pub fn network(&self, name: &str) -> Option<&WNetwork> {
        self.networks.iter().find(|n| n.name == name)
    }

    /// True when no chain metadata is known or at least one chain allows both directions.
    pub fn network_available(&self) -> bool {
        self.networks.is_empty() || self.networks.iter().any(|n| n.deposit && n.withdraw)
    }
}

/// 체인 네트워크 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WNetwork {
    /// `{asset}-{chain}` 키
    pub name: String,
    /// 체인 식별자 (예: 'ERC20', 'TRC20')
    pub chain: String,
    /// 입금 가능
    pub deposit: bool,
    /// 출금 가능
    pub withdraw: bool,
    /// 최소 출금 수량
    #[serde(default)]
    pub min_withdrawal: Decimal,
    /// 출금 수수료
    #[serde(default)]
    pub withdraw_fee: Decimal,
    /// 입금 확정 컨펌 수
    #[serde(default)]
    pub min_confirm: u32,
}

impl WNetwork {
    /// 네트워크 키 생성
    pub fn key(asset: &str, chain: &str) -> String {
        format!("{}-{}", asset.to_uppercase(), chain.to_uppercase())
    }
}

/// Raw per-asset availability as reported by an exchange, before it is merged into `WState`.
///
/// `None` flags mean the exchange did not say; the tracker then keeps the current value (or
/// `true` for a new state).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStatus {
    pub asset: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub deposit: Option<bool>,
    #[serde(default)]
    pub withdraw: Option<bool>,
    #[serde(default)]
    pub chains: Vec<ChainStatus>,
}

impl AssetStatus {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, active: bool, deposit: bool, withdraw: bool) -> Self {
        self.active = Some(active);
        self.deposit = Some(deposit);
        self.withdraw = Some(withdraw);
        self
    }

    pub fn with_chain(mut self, chain: ChainStatus) -> Self {
        self.chains.push(chain);
        self
    }
}

/// Raw per-chain availability and fee metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStatus {
    pub chain: String,
    pub deposit: bool,
    pub withdraw: bool,
    #[serde(default)]
    pub min_withdrawal: Decimal,
    #[serde(default)]
    pub withdraw_fee: Decimal,
    #[serde(default)]
    pub min_confirm: u32,
}

impl ChainStatus {
    pub fn new(chain: impl Into<String>, deposit: bool, withdraw: bool) -> Self {
        Self {
            chain: chain.into(),
            deposit,
            withdraw,
            ..Default::default()
        }
    }

    pub fn with_fees(mut self, min_withdrawal: Decimal, withdraw_fee: Decimal, min_confirm: u32) -> Self {
        self.min_withdrawal = min_withdrawal;
        self.withdraw_fee = withdraw_fee;
        self.min_confirm = min_confirm;
        self
    }
}
