use crate::game::Transition;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that fires the timeout transition whenever the
/// current phase's countdown runs out.
///
/// Every phase change restarts the countdown inside the engine, so the task
/// only ever has to ask "has the current deadline passed?".
pub fn spawn_deadline_watcher(state: Arc<AppState>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            if let Transition::Advanced { from, to } = state.tick().await {
                tracing::debug!("Deadline watcher advanced {:?} -> {:?}", from, to);
            }
        }
    })
}
