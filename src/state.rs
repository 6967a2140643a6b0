use crate::presenter::ViewModel;
use crate::session::Tasbih;
use crate::storage::JsonFileStore;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

pub type WebTasbih = Tasbih<JsonFileStore, ViewModel>;

#[derive(Clone)]
pub struct AppState {
    pub tasbih: Arc<Mutex<WebTasbih>>,
    hold: Arc<Mutex<Option<JoinHandle<()>>>>,
    heartbeat: Arc<Mutex<Instant>>,
    hold_idle_timeout: Duration,
}

impl AppState {
    /// `hold_idle_timeout` bounds how long a hold keeps repeating without
    /// hearing from the client.
    pub fn new(tasbih: WebTasbih, hold_idle_timeout: Duration) -> Self {
        Self {
            tasbih: Arc::new(Mutex::new(tasbih)),
            hold: Arc::new(Mutex::new(None)),
            heartbeat: Arc::new(Mutex::new(Instant::now())),
            hold_idle_timeout,
        }
    }

    /// Records that the client is still around.
    pub async fn touch(&self) {
        *self.heartbeat.lock().await = Instant::now();
    }

    /// Begins a press and starts the single hold driver task, replacing
    /// any previous one.
    pub async fn press_start(&self) {
        self.touch().await;
        let mut hold = self.hold.lock().await;
        if let Some(task) = hold.take() {
            task.abort();
        }
        self.tasbih.lock().await.press_start(Instant::now());

        *hold = Some(tokio::spawn(drive_hold(
            Arc::clone(&self.tasbih),
            Arc::clone(&self.heartbeat),
            self.hold_idle_timeout,
        )));
    }

    pub async fn press_end(&self, cancelled: bool) {
        self.touch().await;
        let mut hold = self.hold.lock().await;
        if let Some(task) = hold.take() {
            task.abort();
        }
        let mut tasbih = self.tasbih.lock().await;
        if cancelled {
            tasbih.press_cancel();
        } else {
            tasbih.press_end();
        }
    }
}

/// Fires whatever hold increments are due until the press machine goes
/// idle. Cancels the press once the client has been silent for
/// `idle_timeout`.
async fn drive_hold(
    tasbih: Arc<Mutex<WebTasbih>>,
    heartbeat: Arc<Mutex<Instant>>,
    idle_timeout: Duration,
) {
    loop {
        let silent_at = *heartbeat.lock().await + idle_timeout;
        let now = Instant::now();

        let mut guard = tasbih.lock().await;
        if now >= silent_at {
            warn!("client went silent during a hold, cancelling press");
            guard.press_cancel();
            break;
        }
        let fired = guard.press_tick(now);
        if fired > 0 {
            debug!(fired, "hold tick");
        }
        let Some(deadline) = guard.press_deadline() else {
            break;
        };
        drop(guard);

        let wake = deadline.min(silent_at);
        tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;
    }
}
