//! Dashboard engine.
//!
//! Owns the in-memory dashboard state and every timer that mutates it.
//! Ticks run synchronously under the state lock and publish a
//! [`DashboardUpdate`] afterwards. Reconfiguration is serialised by the task
//! lock: affected timers are cancelled and awaited, dependent state is reset,
//! and only then are the timers spawned again.

use super::alerts::{self, AlertIds};
use super::configuration::ConfigurationState;
use super::details;
use super::portfolio;
use super::price_feed;
use super::random::SeededSource;
use super::risk;
use super::scheduler::ScheduledTask;
use crate::types::{
    AccountSummary, Alert, ConfigChange, ConfigUpdate, Configuration, DashboardSnapshot,
    DashboardUpdate, DetailKind, DetailReport, Position, PriceRecord, RiskSnapshot,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(1000);
pub const CONNECT_DELAY: Duration = Duration::from_millis(1000);
pub const POSITION_PERIOD: Duration = Duration::from_millis(2000);
pub const RISK_PERIOD: Duration = Duration::from_millis(3000);
pub const ALERT_PERIOD: Duration = Duration::from_millis(5000);

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

struct EngineState {
    config: ConfigurationState,
    prices: Vec<PriceRecord>,
    positions: Vec<Position>,
    account: AccountSummary,
    risk: RiskSnapshot,
    alerts: Vec<Alert>,
    alert_ids: AlertIds,
    connected: bool,
    last_update: i64,
}

/// State plus the update channel, shared with every timer.
struct Shared {
    state: RwLock<EngineState>,
    tx: broadcast::Sender<DashboardUpdate>,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, update: DashboardUpdate) {
        // No subscribers is fine.
        let _ = self.tx.send(update);
    }

    fn tick_heartbeat(&self) {
        let now = now_ms();
        self.write().last_update = now;
        self.publish(DashboardUpdate::Heartbeat { timestamp: now });
    }

    fn mark_connected(&self) {
        self.write().connected = true;
        info!("Market data connection established");
        self.publish(DashboardUpdate::Connection { connected: true });
    }

    fn tick_prices(&self, rng: &mut SeededSource) {
        let now = now_ms();
        let data = {
            let mut state = self.write();
            let next = price_feed::tick(&state.prices, rng, now);
            state.prices = next;
            state.prices.clone()
        };
        debug!("Price tick: {} symbols", data.len());
        self.publish(DashboardUpdate::Prices { data });
    }

    fn tick_positions(&self, rng: &mut SeededSource) {
        let (data, account) = {
            let mut state = self.write();
            let positions = portfolio::revalue(&state.positions, rng);
            let account = portfolio::step_account(&state.account, rng);
            state.positions = positions;
            state.account = account;
            (state.positions.clone(), account)
        };
        debug!("Position tick: {} positions", data.len());
        self.publish(DashboardUpdate::Positions { data, account });
    }

    fn tick_risk(&self, rng: &mut SeededSource) {
        let data = {
            let mut state = self.write();
            let balance = state.config.current().account_balance;
            let next = risk::step(&state.risk, balance, rng);
            state.risk = next;
            next
        };
        debug!("Risk tick: leverage {:.2}, margin ratio {:.3}", data.leverage, data.margin_ratio);
        self.publish(DashboardUpdate::Risk {
            data,
            level: data.level(),
        });
    }

    fn tick_alerts(&self, rng: &mut SeededSource) {
        let now = now_ms();
        let emitted = {
            let mut guard = self.write();
            let state = &mut *guard;
            let next = alerts::tick(&state.alerts, rng, &mut state.alert_ids, now);
            let emitted = next.first() != state.alerts.first();
            state.alerts = next;
            emitted.then(|| state.alerts.clone())
        };
        if let Some(data) = emitted {
            if let Some(alert) = data.first() {
                debug!("Alert emitted [{}]: {}", alert.severity.as_str(), alert.message);
            }
            self.publish(DashboardUpdate::Alerts { data });
        }
    }
}

/// Stream numbers mixed into the engine seed.
#[derive(Debug, Clone, Copy)]
enum Stream {
    Prices,
    Positions,
    Risk,
    Alerts,
}

#[derive(Default)]
struct Timers {
    heartbeat: Option<ScheduledTask>,
    connection: Option<ScheduledTask>,
    prices: Option<ScheduledTask>,
    positions: Option<ScheduledTask>,
    risk: Option<ScheduledTask>,
    alerts: Option<ScheduledTask>,
}

struct Lifecycle {
    timers: Timers,
    /// Draws for regenerating state on reconfiguration.
    rng: SeededSource,
    seed: Option<u64>,
    spawned: u64,
    stopped: bool,
}

impl Lifecycle {
    fn stream_rng(&mut self, stream: Stream) -> SeededSource {
        self.spawned += 1;
        SeededSource::for_stream(self.seed, ((stream as u64) << 32) | self.spawned)
    }

    fn spawn(&mut self, shared: &Arc<Shared>, stream: Stream, refresh: Duration) -> ScheduledTask {
        let mut rng = self.stream_rng(stream);
        let shared = shared.clone();
        match stream {
            Stream::Prices => ScheduledTask::periodic("prices", refresh, move || {
                shared.tick_prices(&mut rng)
            }),
            Stream::Positions => ScheduledTask::periodic("positions", POSITION_PERIOD, move || {
                shared.tick_positions(&mut rng)
            }),
            Stream::Risk => ScheduledTask::periodic("risk", RISK_PERIOD, move || {
                shared.tick_risk(&mut rng)
            }),
            Stream::Alerts => ScheduledTask::periodic("alerts", ALERT_PERIOD, move || {
                shared.tick_alerts(&mut rng)
            }),
        }
    }
}

async fn cancel(slot: &mut Option<ScheduledTask>) {
    if let Some(task) = slot.take() {
        task.cancel().await;
    }
}

/// Running dashboard engine.
pub struct DashboardEngine {
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl DashboardEngine {
    /// Build the initial state and start every timer.
    ///
    /// Must be called inside a tokio runtime. A `seed` makes every stream
    /// reproducible.
    pub fn start(config: Configuration, seed: Option<u64>) -> Arc<Self> {
        let config = ConfigurationState::new(config);
        let current = config.current().clone();
        let mut rng = SeededSource::for_stream(seed, 0);
        let now = now_ms();

        let state = EngineState {
            prices: price_feed::initialize(&current.selected_symbols, &mut rng, now),
            positions: portfolio::initialize(&current.selected_symbols, &mut rng),
            account: portfolio::anchor_account(current.account_balance),
            risk: risk::anchor(current.account_balance),
            alerts: Vec::new(),
            alert_ids: AlertIds::new(),
            connected: false,
            last_update: now,
            config,
        };

        let (tx, _) = broadcast::channel(1024);
        let shared = Arc::new(Shared {
            state: RwLock::new(state),
            tx,
        });

        let mut lifecycle = Lifecycle {
            timers: Timers::default(),
            rng,
            seed,
            spawned: 0,
            stopped: false,
        };

        let refresh = Duration::from_millis(current.refresh_rate_ms.as_millis());
        let heartbeat_shared = shared.clone();
        let connection_shared = shared.clone();
        lifecycle.timers = Timers {
            heartbeat: Some(ScheduledTask::periodic("heartbeat", HEARTBEAT_PERIOD, move || {
                heartbeat_shared.tick_heartbeat()
            })),
            connection: Some(ScheduledTask::once("connection", CONNECT_DELAY, move || {
                connection_shared.mark_connected()
            })),
            prices: Some(lifecycle.spawn(&shared, Stream::Prices, refresh)),
            positions: Some(lifecycle.spawn(&shared, Stream::Positions, refresh)),
            risk: Some(lifecycle.spawn(&shared, Stream::Risk, refresh)),
            alerts: Some(lifecycle.spawn(&shared, Stream::Alerts, refresh)),
        };

        info!(
            "Dashboard engine started: balance {}, symbols {:?}, refresh {}",
            current.account_balance, current.selected_symbols, current.refresh_rate_ms
        );

        Arc::new(Self {
            shared,
            lifecycle: Mutex::new(lifecycle),
        })
    }

    /// Subscribe to incremental updates.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardUpdate> {
        self.shared.tx.subscribe()
    }

    /// Current state, copied out.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let state = self.shared.read();
        DashboardSnapshot {
            config: state.config.current().clone(),
            prices: state.prices.clone(),
            positions: state.positions.clone(),
            account: state.account,
            risk: state.risk,
            risk_level: state.risk.level(),
            alerts: state.alerts.clone(),
            connected: state.connected,
            last_update: state.last_update,
        }
    }

    pub fn config(&self) -> Configuration {
        self.shared.read().config.current().clone()
    }

    /// Apply a partial configuration edit and return the resulting configuration.
    pub async fn apply_config(&self, update: &ConfigUpdate) -> Configuration {
        let mut lifecycle = self.lifecycle.lock().await;
        let mut next = self.shared.read().config.clone();
        let change = next.apply(update);
        self.reconfigure(&mut lifecycle, next, change).await;
        self.config()
    }

    /// Check or uncheck one symbol. Returns whether the selection changed.
    pub async fn toggle_symbol(&self, symbol: &str, checked: bool) -> bool {
        let mut lifecycle = self.lifecycle.lock().await;
        let mut next = self.shared.read().config.clone();
        let changed = next.toggle_symbol(symbol, checked);
        if changed {
            let change = ConfigChange {
                symbols: true,
                ..Default::default()
            };
            self.reconfigure(&mut lifecycle, next, change).await;
        } else {
            debug!("Symbol toggle {} -> {} ignored", symbol, checked);
        }
        changed
    }

    /// Remove one alert. Returns whether it existed.
    pub fn dismiss_alert(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.shared.write();
            let (next, removed) = alerts::dismiss(&state.alerts, id);
            state.alerts = next;
            removed.then(|| state.alerts.clone())
        };
        match removed {
            Some(data) => {
                debug!("Alert {} dismissed", id);
                self.shared.publish(DashboardUpdate::Alerts { data });
                true
            }
            None => false,
        }
    }

    /// Informational report; never changes state.
    pub fn request_details(&self, kind: DetailKind) -> DetailReport {
        let active = self.shared.read().config.current().selected_symbols.len();
        details::report(kind, active)
    }

    /// Cancel every timer and wait for them to finish. Safe to call twice.
    pub async fn shutdown(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.stopped {
            return;
        }
        lifecycle.stopped = true;

        let timers = &mut lifecycle.timers;
        cancel(&mut timers.heartbeat).await;
        cancel(&mut timers.connection).await;
        cancel(&mut timers.prices).await;
        cancel(&mut timers.positions).await;
        cancel(&mut timers.risk).await;
        cancel(&mut timers.alerts).await;
        info!("Dashboard engine stopped");
    }

    pub async fn is_running(&self) -> bool {
        !self.lifecycle.lock().await.stopped
    }

    /// Number of live timer tasks.
    pub async fn active_timers(&self) -> usize {
        let lifecycle = self.lifecycle.lock().await;
        let t = &lifecycle.timers;
        [&t.heartbeat, &t.connection, &t.prices, &t.positions, &t.risk, &t.alerts]
            .iter()
            .filter(|slot| matches!(slot, Some(task) if !task.is_finished()))
            .count()
    }

    /// Stop the timers `change` affects, then commit `next` and reset the
    /// state that depends on it.
    async fn reconfigure(
        &self,
        lifecycle: &mut Lifecycle,
        next: ConfigurationState,
        change: ConfigChange,
    ) {
        if !change.any() {
            return;
        }
        let restart_prices = change.symbols || change.refresh_rate;
        let restart_positions = change.symbols || change.balance;
        let restart_risk = change.balance;

        let timers = &mut lifecycle.timers;
        if restart_prices {
            cancel(&mut timers.prices).await;
        }
        if restart_positions {
            cancel(&mut timers.positions).await;
        }
        if restart_risk {
            cancel(&mut timers.risk).await;
        }

        let now = now_ms();
        let config = {
            let mut state = self.shared.write();
            state.config = next;
            let config = state.config.current().clone();
            if change.symbols {
                state.prices = price_feed::initialize(&config.selected_symbols, &mut lifecycle.rng, now);
                state.positions = portfolio::initialize(&config.selected_symbols, &mut lifecycle.rng);
            }
            if change.balance {
                state.account = portfolio::anchor_account(config.account_balance);
                let risk = risk::reanchor(&state.risk, config.account_balance);
                state.risk = risk;
            }
            config
        };

        info!(
            "Configuration changed: balance {}, symbols {:?}, refresh {}",
            config.account_balance, config.selected_symbols, config.refresh_rate_ms
        );
        self.publish_reset(change, config.clone());

        if lifecycle.stopped {
            warn!("Engine stopped; timers not restarted");
            return;
        }

        let refresh = Duration::from_millis(config.refresh_rate_ms.as_millis());
        if restart_prices {
            let task = lifecycle.spawn(&self.shared, Stream::Prices, refresh);
            lifecycle.timers.prices = Some(task);
        }
        if restart_positions {
            let task = lifecycle.spawn(&self.shared, Stream::Positions, refresh);
            lifecycle.timers.positions = Some(task);
        }
        if restart_risk {
            let task = lifecycle.spawn(&self.shared, Stream::Risk, refresh);
            lifecycle.timers.risk = Some(task);
        }
    }

    fn publish_reset(&self, change: ConfigChange, config: Configuration) {
        let (prices, positions, account, risk) = {
            let state = self.shared.read();
            (state.prices.clone(), state.positions.clone(), state.account, state.risk)
        };
        self.shared.publish(DashboardUpdate::Config { data: config });
        if change.symbols {
            self.shared.publish(DashboardUpdate::Prices { data: prices });
        }
        if change.symbols || change.balance {
            self.shared.publish(DashboardUpdate::Positions {
                data: positions,
                account,
            });
        }
        if change.balance {
            self.shared.publish(DashboardUpdate::Risk {
                data: risk,
                level: risk.level(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_engine() -> Arc<DashboardEngine> {
        DashboardEngine::start(Configuration::default(), Some(7))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_snapshot() {
        let engine = default_engine();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.prices.len(), 4);
        assert_eq!(snapshot.positions.len(), 3);
        assert_eq!(snapshot.risk.unrealized_pnl, 1_250.0);
        assert_eq!(snapshot.risk.var_1min, -875.0);
        assert_eq!(snapshot.risk.var_5min, -2_150.0);
        assert_eq!(snapshot.risk.cvar, -3_200.0);
        assert!(snapshot.alerts.is_empty());
        assert!(!snapshot.connected);

        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_balance_change_doubles_baseline() {
        let engine = default_engine();
        let update = ConfigUpdate {
            account_balance: Some(json!(50_000)),
            ..Default::default()
        };
        engine.apply_config(&update).await;

        let risk = engine.snapshot().risk;
        assert_eq!(risk.unrealized_pnl, 2_500.0);
        assert_eq!(risk.var_1min, -1_750.0);
        assert_eq!(risk.var_5min, -4_300.0);
        assert_eq!(risk.cvar, -6_400.0);
        assert_eq!(engine.snapshot().account.available_margin, 37_500.0);

        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_idempotent() {
        let engine = default_engine();
        assert_eq!(engine.active_timers().await, 6);
        engine.shutdown().await;
        engine.shutdown().await;
        assert_eq!(engine.active_timers().await, 0);
        assert!(!engine.is_running().await);
    }
}
