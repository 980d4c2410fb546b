//! Network state tracker - 입출금 및 체인 상태 병합

use crate::types::{AssetStatus, ChainStatus, Tickers, WNetwork, WState};

/// Merges per-asset deposit/withdraw/chain availability into a [`Tickers`] set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkStateTracker;

impl NetworkStateTracker {
    pub fn new() -> Self {
        Self
    }

    /// Upserts every status, then pushes each touched state onto the matching tickers.
    ///
    /// Returns the number of states touched.
    pub fn apply(&self, tickers: &mut Tickers, statuses: &[AssetStatus]) -> usize {
        let mut touched = Vec::with_capacity(statuses.len());
        for status in statuses {
            let index = self.upsert_state(&mut tickers.states, status);
            if !touched.contains(&index) {
                touched.push(index);
            }
        }

        for &index in &touched {
            let state = &tickers.states[index];
            for ticker in tickers.tickers.iter_mut().filter(|t| t.comp_name == state.base_name) {
                ticker.apply_state(state);
            }
        }
        touched.len()
    }

    /// Upserts one asset's state and returns its position in `states`.
    ///
    /// The first state with a matching base wins. A new state starts fully available; flags the
    /// source leaves out keep their current value.
    pub fn upsert_state(&self, states: &mut Vec<WState>, status: &AssetStatus) -> usize {
        let base = status.asset.to_uppercase();
        let index = match states.iter().position(|s| s.base_name == base) {
            Some(index) => index,
            None => {
                states.push(WState::new(base.clone()));
                states.len() - 1
            },
        };

        let state = &mut states[index];
        if let Some(active) = status.active {
            state.active = active;
        }
        if let Some(deposit) = status.deposit {
            state.deposit = deposit;
        }
        if let Some(withdraw) = status.withdraw {
            state.withdraw = withdraw;
        }
        for chain in &status.chains {
            self.upsert_network(state, chain);
        }
        index
    }

    /// Existing networks only get their availability refreshed; fees and confirmations are
    /// written once.
    pub fn upsert_network(&self, state: &mut WState, chain: &ChainStatus) {
        let name = WNetwork::key(&state.base_name, &chain.chain);
        match state.networks.iter_mut().find(|n| n.name == name) {
            Some(network) => {
                network.deposit = chain.deposit;
                network.withdraw = chain.withdraw;
            },
            None => state.networks.push(WNetwork {
                name,
                chain: chain.chain.clone(),
                deposit: chain.deposit,
                withdraw: chain.withdraw,
                min_withdrawal: chain.min_withdrawal,
                withdraw_fee: chain.withdraw_fee,
                min_confirm: chain.min_confirm,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueueSymbol;
    use rust_decimal_macros::dec;

    fn tickers() -> Tickers {
        let mut tickers = Tickers::new("test");
        tickers.rebuild(&[
            QueueSymbol::new("USDT-KRW", "USDT", "KRW"),
            QueueSymbol::new("BTC-USDT", "BTC", "USDT"),
            QueueSymbol::new("BTC-KRW", "BTC", "KRW"),
        ]);
        tickers
    }

    #[test]
    fn test_new_state_defaults_available() {
        let tracker = NetworkStateTracker::new();
        let mut states = Vec::new();
        tracker.upsert_state(&mut states, &AssetStatus::new("eth"));

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].base_name, "ETH");
        assert!(states[0].active && states[0].deposit && states[0].withdraw);
    }

    #[test]
    fn test_explicit_flags_and_partial_update() {
        let tracker = NetworkStateTracker::new();
        let mut states = Vec::new();
        tracker.upsert_state(&mut states, &AssetStatus::new("BTC").with_flags(true, false, true));
        assert!(!states[0].deposit);

        let mut partial = AssetStatus::new("BTC");
        partial.withdraw = Some(false);
        tracker.upsert_state(&mut states, &partial);

        assert_eq!(states.len(), 1);
        assert!(states[0].active);
        assert!(!states[0].deposit);
        assert!(!states[0].withdraw);
    }

    #[test]
    fn test_first_match_wins() {
        let tracker = NetworkStateTracker::new();
        let mut states = vec![WState::new("BTC"), WState::new("BTC")];
        let index =
            tracker.upsert_state(&mut states, &AssetStatus::new("BTC").with_flags(false, false, false));

        assert_eq!(index, 0);
        assert!(!states[0].active);
        assert!(states[1].active);
    }

    #[test]
    fn test_network_metadata_is_write_once() {
        let tracker = NetworkStateTracker::new();
        let mut states = Vec::new();
        let first = AssetStatus::new("USDT").with_chain(
            ChainStatus::new("TRC20", true, true).with_fees(dec!(10), dec!(1), 20),
        );
        tracker.upsert_state(&mut states, &first);

        let second = AssetStatus::new("USDT").with_chain(
            ChainStatus::new("trc20", false, true).with_fees(dec!(50), dec!(5), 99),
        );
        tracker.upsert_state(&mut states, &second);

        let network = states[0].network("USDT-TRC20").unwrap();
        assert_eq!(states[0].networks.len(), 1);
        assert!(!network.deposit);
        assert!(network.withdraw);
        assert_eq!(network.withdraw_fee, dec!(1));
        assert_eq!(network.min_withdrawal, dec!(10));
        assert_eq!(network.min_confirm, 20);
    }

    #[test]
    fn test_flags_propagate_by_comp_name() {
        let tracker = NetworkStateTracker::new();
        let mut tickers = tickers();
        let touched = tracker.apply(
            &mut tickers,
            &[AssetStatus::new("BTC")
                .with_flags(true, false, true)
                .with_chain(ChainStatus::new("BTC", false, true))],
        );

        assert_eq!(touched, 1);
        let btc: Vec<_> = tickers.tickers.iter().filter(|t| t.base_name == "BTC").collect();
        assert_eq!(btc.len(), 2);
        assert!(btc.iter().all(|t| !t.deposit && t.withdraw && !t.network));

        let usdt = tickers.find("USDT-KRW").unwrap();
        assert!(usdt.deposit && usdt.network);
    }

    #[test]
    fn test_rebuild_reapplies_states() {
        let tracker = NetworkStateTracker::new();
        let mut tickers = tickers();
        tracker.apply(&mut tickers, &[AssetStatus::new("BTC").with_flags(false, true, true)]);

        tickers.rebuild(&[QueueSymbol::new("BTC-USDT", "BTC", "USDT")]);
        assert!(!tickers.tickers[0].active);
    }
}
