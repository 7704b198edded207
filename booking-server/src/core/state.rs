//! Server state

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::{Clock, ExpiryReaper, SystemClock};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::services::NotifierService;
use crate::utils::AppResult;

/// Server state — shared handles for every request handler and task.
///
/// Cloning is shallow; all coordination between clones happens in the
/// store's conditional writes, never through in-process shared mutable
/// state.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Time source for TTL comparisons
    pub clock: Arc<dyn Clock>,
    /// Booking event emitter
    pub notifier: NotifierService,
}

impl ServerState {
    /// Open the database and assemble the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::open(&config.work_dir).await?;
        Ok(Self {
            config: config.clone(),
            db,
            clock: Arc::new(SystemClock),
            notifier: NotifierService::new(),
        })
    }

    /// Assemble state from pre-built parts. Used by tests to inject an
    /// in-memory database and a manual clock.
    pub fn with_parts(
        config: Config,
        db: Surreal<Db>,
        clock: Arc<dyn Clock>,
        notifier: NotifierService,
    ) -> Self {
        Self {
            config,
            db,
            clock,
            notifier,
        }
    }

    /// Register the background tasks on the given manager
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let reaper = ExpiryReaper::new(
            self.db.clone(),
            self.clock.clone(),
            self.config.reaper_interval_secs,
        );
        let token = tasks.shutdown_token();
        tasks.spawn("expiry_reaper", TaskKind::Periodic, async move {
            reaper.run(token).await;
        });
    }
}
