use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::api::{MarketData, PlatformExposure};
use crate::config::Config;
use crate::session::WorkflowState;

/// Last known state of the market-data poll. `Unavailable` is the sentinel
/// the UI shows after a failed poll — no immediate retry, the next tick
/// overwrites it.
#[derive(Debug, Clone)]
pub enum MarketFeed {
    Waiting,
    Live(MarketData),
    Unavailable { error: String },
}

impl MarketFeed {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(data) if data.is_live())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    pub ts: String,
    pub kind: String,
    pub detail: String,
}

pub struct AppState {
    pub config: RwLock<Config>,
    pub workflow: Mutex<WorkflowState>,
    pub market: RwLock<MarketFeed>,
    pub exposure: RwLock<Option<PlatformExposure>>,
    pub events: Mutex<VecDeque<EventEntry>>,
    pub poll_cancel: CancellationToken,
}

const MAX_EVENTS: usize = 200;

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
            workflow: Mutex::new(WorkflowState::Intake),
            market: RwLock::new(MarketFeed::Waiting),
            exposure: RwLock::new(None),
            events: Mutex::new(VecDeque::with_capacity(MAX_EVENTS)),
            poll_cancel: CancellationToken::new(),
        })
    }

    pub fn push_event(&self, kind: &str, detail: &str) {
        let entry = EventEntry {
            ts: chrono::Utc::now().format("%H:%M:%S").to_string(),
            kind: kind.to_string(),
            detail: detail.to_string(),
        };
        let mut events = self.events.lock().unwrap();
        if events.len() >= MAX_EVENTS {
            events.pop_front();
        }
        events.push_back(entry);
    }

    pub fn step(&self) -> u8 {
        self.workflow.lock().unwrap().step()
    }

    pub fn market_is_live(&self) -> bool {
        self.market.read().unwrap().is_live()
    }

    pub fn set_market(&self, feed: MarketFeed) {
        *self.market.write().unwrap() = feed;
    }

    pub fn set_exposure(&self, exposure: PlatformExposure) {
        *self.exposure.write().unwrap() = Some(exposure);
    }

    /// Back to step 1; polled market/exposure snapshots are kept, the
    /// pollers themselves are only cancelled on shutdown.
    pub fn reset_session(&self) {
        self.workflow.lock().unwrap().reset();
        self.events.lock().unwrap().clear();
    }
}
