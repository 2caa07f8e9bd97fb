//! High-level runtime orchestrator.
//!
//! The runtime owns the tick worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_content::{ContentCatalog, ContentFactory};
use combat_core::{CombatConfig, CombatSystem};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::{
    GridVisibility, OpenLineOfSight, OracleManager, OwnershipPolicy, PvpZone, RectPvpZones,
    VIEW_DISTANCE,
};
use crate::workers::{Command, TickWorker};

/// Game tick length.
pub const TICK_INTERVAL: Duration = Duration::from_millis(600);

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// `None` disables the timer; ticks then only run on [`RuntimeHandle::step`].
    pub tick_interval: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
    pub view_distance: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            tick_interval: Some(TICK_INTERVAL),
            event_buffer_size: 1024,
            command_buffer_size: 64,
            seed: None,
            view_distance: VIEW_DISTANCE,
        }
    }
}

impl RuntimeConfig {
    /// Manually stepped, seeded configuration for deterministic runs.
    pub fn manual(seed: u64) -> Self {
        Self {
            tick_interval: None,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Main runtime that orchestrates combat ticks
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Stop the worker, even while other handle clones are alive.
    pub async fn shutdown(self) -> Result<()> {
        // the worker may already be gone; joining below reports the real outcome
        let _ = self.handle.shutdown().await;
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<ContentCatalog>>,
    content_dir: Option<PathBuf>,
    zones: Vec<PvpZone>,
    geometry: OpenLineOfSight,
    ownership: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            content_dir: None,
            zones: Vec::new(),
            geometry: OpenLineOfSight::new(),
            ownership: true,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already loaded catalog.
    pub fn catalog(mut self, catalog: impl Into<Arc<ContentCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Load `combat.toml` and `catalog.ron` from a directory at build time.
    ///
    /// The file config replaces `config.combat`.
    pub fn content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = Some(dir.into());
        self
    }

    pub fn pvp_zone(mut self, zone: PvpZone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn geometry(mut self, geometry: OpenLineOfSight) -> Self {
        self.geometry = geometry;
        self
    }

    /// Whether instanced entities are reserved for their owner (default true).
    pub fn enforce_ownership(mut self, enforce: bool) -> Self {
        self.ownership = enforce;
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let mut config = self.config;

        let catalog = match (self.catalog, self.content_dir) {
            (Some(catalog), _) => catalog,
            (None, Some(dir)) => {
                let factory = ContentFactory::new(dir);
                config.combat = factory
                    .load_config()
                    .map_err(|e| RuntimeError::Content(format!("{:#}", e)))?;
                let catalog = factory
                    .load_catalog()
                    .map_err(|e| RuntimeError::Content(format!("{:#}", e)))?;
                Arc::new(catalog)
            }
            (None, None) => return Err(RuntimeError::MissingCatalog),
        };

        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            "starting combat runtime (seed {}, tick {:?})",
            seed,
            config.tick_interval
        );

        let oracles = OracleManager::new(catalog, seed)
            .with_visibility(GridVisibility::new(config.view_distance))
            .with_geometry(self.geometry)
            .with_zones(RectPvpZones::new(self.zones))
            .with_policy(self.ownership.then_some(OwnershipPolicy));

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = TickWorker::new(
            CombatSystem::new(config.combat),
            oracles,
            command_rx,
            event_bus,
            config.tick_interval,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
