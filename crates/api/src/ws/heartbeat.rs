use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

/// Seconds between heartbeat pings.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Ping every open session socket every [`HEARTBEAT_INTERVAL_SECS`].
///
/// Runs until the returned handle is aborted at shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> JoinHandle<()> {
    start_heartbeat_every(ws_manager, Duration::from_secs(HEARTBEAT_INTERVAL_SECS))
}

/// Like [`start_heartbeat`] with a custom period. Ticks with no open
/// connections are skipped.
pub fn start_heartbeat_every(ws_manager: Arc<WsManager>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let open = ws_manager.connection_count().await;
            if open == 0 {
                continue;
            }
            tracing::trace!(open, "Pinging session sockets");
            ws_manager.ping_all().await;
        }
    })
}
