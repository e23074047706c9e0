//! The top-level world: chunk store, update scheduler, light engine,
//! and the published tick-boundary snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use basalt_registry::{BlockRegistry, Tool, is_correct_tool};
use basalt_utils::random::Random;
use basalt_utils::{BlockId, BlockPos, ChunkPos, Direction, UpdateFlags};
use basalt_world::{BlockState, Chunk, ChunkStore, WorldError, WorldSnapshot};
use parking_lot::Mutex;

use crate::config::SimConfig;
use crate::light_engine::LightEngine;
use crate::ticks::{TickPriority, TicketKind, UpdateQueue, UpdateTicket};

/// The top-level owner of the simulation state.
///
/// The tick driver holds the `World` mutably for the duration of a
/// step; everything producers and external readers touch concurrently
/// (the scheduler, the tick counter, the published snapshot) sits
/// behind its own synchronization and is reachable through a
/// [`WorldHandle`].
pub struct World {
    registry: Arc<BlockRegistry>,
    store: ChunkStore,
    light: LightEngine,
    scheduler: Arc<Mutex<UpdateQueue>>,
    tick: Arc<AtomicU64>,
    snapshot: Arc<ArcSwap<WorldSnapshot>>,
}

/// A cloneable handle for mutation producers and snapshot readers
/// outside the tick loop.
#[derive(Clone)]
pub struct WorldHandle {
    scheduler: Arc<Mutex<UpdateQueue>>,
    tick: Arc<AtomicU64>,
    snapshot: Arc<ArcSwap<WorldSnapshot>>,
}

impl World {
    #[must_use]
    pub fn new(registry: Arc<BlockRegistry>, config: &SimConfig) -> Self {
        let store = ChunkStore::new(registry.clone(), config.vertical_range());
        let snapshot = Arc::new(ArcSwap::from_pointee(store.snapshot()));
        Self {
            registry,
            store,
            light: LightEngine::new(),
            scheduler: Arc::new(Mutex::new(UpdateQueue::new(config.scheduler_capacity))),
            tick: Arc::new(AtomicU64::new(0)),
            snapshot,
        }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn handle(&self) -> WorldHandle {
        WorldHandle {
            scheduler: self.scheduler.clone(),
            tick: self.tick.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    /// Lazily allocates a chunk and seeds its sky light.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) {
        if self.store.is_loaded(pos) {
            return;
        }
        self.store.ensure_chunk(pos);
        if let Err(error) = self.light.seed_chunk_sky(&mut self.store, pos) {
            log::warn!("sky seeding for chunk ({}, {}) failed: {error}", pos.x(), pos.z());
        }
    }

    /// Evicts a chunk, returning it for saving.
    pub fn remove_chunk(&mut self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.store.remove_chunk(pos)
    }

    /// Scans a chunk for corrupt states, poisoning it on failure.
    pub fn verify_chunk(&mut self, pos: ChunkPos) -> Result<(), WorldError> {
        self.store.verify_chunk(pos)
    }

    pub fn get_block(&self, pos: BlockPos) -> Result<BlockState, WorldError> {
        self.store.get_block(pos)
    }

    pub fn id_at(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        self.store.id_at(pos)
    }

    pub fn light_at(&self, pos: BlockPos) -> Result<(u8, u8), WorldError> {
        self.store.light_at(pos)
    }

    /// The effective light level: the brighter of the two channels.
    pub fn light_level(&self, pos: BlockPos) -> Result<u8, WorldError> {
        let (sky, block) = self.store.light_at(pos)?;
        Ok(sky.max(block))
    }

    #[must_use]
    pub fn chunk_ref(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.store.chunk_ref(pos)
    }

    /// Loaded chunk coordinates in deterministic (x, z) order.
    #[must_use]
    pub fn loaded_chunk_positions(&self) -> Vec<ChunkPos> {
        let mut positions: Vec<ChunkPos> = self.store.loaded_chunks().collect();
        positions.sort_by_key(|pos| (pos.x(), pos.z()));
        positions
    }

    /// Replaces the block state at `pos`, applying the requested side
    /// effects (light updates, neighbor tickets, dirty marking).
    ///
    /// # Errors
    /// Every [`ChunkStore::set_block`] error passes through unchanged;
    /// nothing is written on failure.
    pub fn set_block(
        &mut self,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
    ) -> Result<(), WorldError> {
        let old = self.store.get_block(pos)?;
        self.store.set_block(pos, state)?;

        if flags.contains(UpdateFlags::LIGHT) {
            self.light
                .block_changed(&mut self.store, pos, old.id, old.sky_light, old.block_light)?;
        }

        if flags.contains(UpdateFlags::NEIGHBOR_TICKETS) {
            let now = self.current_tick();
            let mut scheduler = self.scheduler.lock();
            scheduler.schedule_immediate(pos, now);
            for direction in Direction::VALUES {
                scheduler.schedule_immediate(direction.relative(&pos), now);
            }
        }

        Ok(())
    }

    /// Breaks a block: rolls its drops, replaces it with the default
    /// block, cancels its pending scheduled ticket, and notifies the
    /// neighbors.
    pub fn break_block<R: Random>(
        &mut self,
        pos: BlockPos,
        tool: Option<&Tool>,
        rng: &mut R,
    ) -> Result<Vec<(BlockId, u8)>, WorldError> {
        let old = self.store.get_block(pos)?;
        let definition = self
            .registry
            .lookup(old.id)
            .map_err(|_| WorldError::CorruptBlockState {
                pos,
                reason: "unknown block id",
            })?;
        let drops = definition
            .drops
            .roll(rng, is_correct_tool(definition, tool));

        let mut air = BlockState::of(self.registry.default_id());
        air.sky_light = old.sky_light;
        air.block_light = old.block_light;
        self.set_block(pos, air, UpdateFlags::UPDATE_ALL)?;

        // The block is gone; a pending scheduled tick for it is stale.
        self.scheduler.lock().cancel(pos, TicketKind::Scheduled);

        Ok(drops)
    }

    /// Enqueues a ticket through the shared scheduler.
    pub fn schedule(&self, pos: BlockPos, kind: TicketKind, delay: u32, priority: TickPriority) {
        let now = self.current_tick();
        self.scheduler
            .lock()
            .schedule(pos, kind, now, delay, priority);
    }

    pub fn schedule_immediate(&self, pos: BlockPos) {
        let now = self.current_tick();
        self.scheduler.lock().schedule_immediate(pos, now);
    }

    pub fn cancel_ticket(&self, pos: BlockPos, kind: TicketKind) -> bool {
        self.scheduler.lock().cancel(pos, kind)
    }

    /// Drains due tickets under the given budget.
    pub fn drain_due(&self, now: u64, budget: usize) -> Vec<UpdateTicket> {
        self.scheduler.lock().drain_due(now, budget)
    }

    /// Pending ticket count.
    #[must_use]
    pub fn pending_tickets(&self) -> usize {
        self.scheduler.lock().len()
    }

    /// Tickets shed by the scheduler's capacity bound so far.
    #[must_use]
    pub fn dropped_tickets(&self) -> u64 {
        self.scheduler.lock().dropped()
    }

    /// Runs queued light propagation to fixed point.
    pub fn flush_light(&mut self) {
        self.light.flush(&mut self.store);
    }

    /// Publishes the current state as the tick-boundary snapshot.
    pub fn publish_snapshot(&mut self) {
        self.snapshot.store(Arc::new(self.store.snapshot()));
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        self.snapshot.load_full()
    }

    /// Advances the tick counter; the driver calls this once per step
    /// after publishing.
    pub fn advance_tick(&mut self) {
        self.tick.fetch_add(1, Ordering::AcqRel);
    }
}

impl WorldHandle {
    /// Current tick as producers observe it.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    /// Enqueues a ticket from outside the tick loop.
    pub fn schedule(&self, pos: BlockPos, kind: TicketKind, delay: u32, priority: TickPriority) {
        let now = self.current_tick();
        self.scheduler
            .lock()
            .schedule(pos, kind, now, delay, priority);
    }

    pub fn schedule_immediate(&self, pos: BlockPos) {
        let now = self.current_tick();
        self.scheduler.lock().schedule_immediate(pos, now);
    }

    pub fn cancel(&self, pos: BlockPos, kind: TicketKind) -> bool {
        self.scheduler.lock().cancel(pos, kind)
    }

    /// The last published tick-boundary snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        self.snapshot.load_full()
    }
}
