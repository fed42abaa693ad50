//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the panel catalog every session plans with and a map of live
//! layout sessions. Each session's engine sits behind its own mutex, which
//! is the single serialization point for that document: concurrent HTTP
//! and websocket commands against one session are applied one at a time.
//!
//! Sessions idle longer than `idle_timeout` are evicted by the session
//! reaper. A session someone still holds a handle to (an open websocket, a
//! command in flight) is never evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use layout::catalog::PanelCatalog;
use layout::doc::LayoutSettings;
use layout::engine::EngineCore;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::DEFAULT_SESSION_IDLE_SECS;

/// One layout session's engine and when it was last used.
#[derive(Debug)]
pub struct LiveSession {
    pub engine: EngineCore,
    pub last_used: Instant,
}

impl LiveSession {
    #[must_use]
    pub fn new(engine: EngineCore) -> Self {
        Self { engine, last_used: Instant::now() }
    }

    /// Mark the session used now and hand out its engine.
    pub fn touch(&mut self) -> &mut EngineCore {
        self.last_used = Instant::now();
        &mut self.engine
    }
}

/// One live layout session.
pub type Session = Arc<Mutex<LiveSession>>;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PanelCatalog>,
    pub settings: LayoutSettings,
    pub max_sessions: usize,
    pub idle_timeout: Duration,
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: PanelCatalog, settings: LayoutSettings, max_sessions: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings,
            max_sessions,
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// A fresh engine wired to this server's catalog and layout settings.
    #[must_use]
    pub fn new_engine(&self) -> EngineCore {
        EngineCore::new(PanelCatalog::clone(&self.catalog), self.settings)
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use layout::catalog::{Dimension, PanelCatalog, PanelSpec};
    use layout::doc::LayoutSettings;

    use super::AppState;

    pub const PANEL: &str = "Test 400";

    pub fn catalog() -> PanelCatalog {
        PanelCatalog::new(vec![PanelSpec {
            model_name: PANEL.to_owned(),
            power_wattage: 400.0,
            dimension: Dimension { length: 65.0, width: 39.0 },
            efficiency: 0.2,
        }])
        .unwrap()
    }

    pub fn app_state() -> AppState {
        AppState::new(catalog(), LayoutSettings::default(), 8)
    }
}
