//! Polling driver - 거래소별 폴링 워커
//!
//! One tokio task per adapter. Cycles inside a task are serialized: the interval only fires
//! again after the previous cycle returned, and late ticks are skipped instead of queued.
//! Shutdown is a `watch` channel shared by every worker.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::types::ExchangeAdapter;

/// 한 주기의 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// `Some` when the registry was (re)verified this cycle
    pub discovered: Option<bool>,
    /// `None` when the adapter was not alive
    pub states: Option<bool>,
    pub tickers: Option<bool>,
}

impl CycleOutcome {
    /// Every step that ran succeeded.
    pub fn is_healthy(&self) -> bool {
        self.discovered != Some(false) && self.states != Some(false) && self.tickers == Some(true)
    }
}

/// Runs one polling cycle against an adapter.
///
/// Order: re-verify markets when the adapter is down or a reset was requested, then refresh
/// asset states, then reconcile tickers. Nothing after discovery runs while the adapter is
/// not alive.
pub async fn run_cycle(adapter: &dyn ExchangeAdapter) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();

    let reset_requested = {
        let shared = adapter.shared_tickers();
        let tickers = shared.read().unwrap_or_else(|e| e.into_inner());
        tickers.reset_cache
    };
    if !adapter.is_alive() || reset_requested {
        outcome.discovered = Some(adapter.check_markets().await);
    }

    if !adapter.is_alive() {
        return outcome;
    }

    outcome.states = Some(adapter.update_states().await);
    outcome.tickers = Some(adapter.update_tickers().await);
    outcome
}

/// 폴링 드라이버
pub struct PollDriver {
    interval: Duration,
    adapters: Vec<Arc<dyn ExchangeAdapter>>,
}

impl PollDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            adapters: Vec::new(),
        }
    }

    /// 어댑터 추가
    pub fn with_adapter(mut self, adapter: Arc<dyn ExchangeAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn add(&mut self, adapter: Arc<dyn ExchangeAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Spawns one worker per adapter and returns the handle that stops them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> DriverHandle {
        let (shutdown, receiver) = watch::channel(false);
        let period = self.interval;

        let tasks = self
            .adapters
            .into_iter()
            .map(|adapter| tokio::spawn(worker(adapter, period, receiver.clone())))
            .collect();

        info!(interval_ms = period.as_millis() as u64, "poll driver started");
        DriverHandle { shutdown, tasks }
    }
}

async fn worker(adapter: Arc<dyn ExchangeAdapter>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut cycles: u64 = 0;

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(_) => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            _ = ticker.tick() => {
                let outcome = run_cycle(adapter.as_ref()).await;
                cycles += 1;
                if outcome.is_healthy() {
                    debug!(exchange = adapter.name(), cycles, "cycle complete");
                } else {
                    warn!(exchange = adapter.name(), cycles, ?outcome, "cycle degraded");
                }
            }
        }
    }

    info!(exchange = adapter.name(), cycles, "poll worker stopped");
}

/// 실행 중인 드라이버 핸들
pub struct DriverHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl DriverHandle {
    pub fn workers(&self) -> usize {
        self.tasks.len()
    }

    /// Signals every worker and waits for them to finish their current cycle.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "poll worker ended abnormally");
            }
        }
    }
}
