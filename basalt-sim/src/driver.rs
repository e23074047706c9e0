//! The tick driver: the outer loop advancing the simulation.

use basalt_utils::random::Xoroshiro;

use crate::config::SimConfig;
use crate::rules;
use crate::sampler;
use crate::ticks::{TickPriority, TicketKind, UpdateTicket};
use crate::world::World;

/// What one simulation step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Tickets drained and successfully applied.
    pub applied: usize,
    /// Random tick candidates forwarded to the rules.
    pub random_applied: usize,
    /// Tickets pushed back one tick after a retryable failure.
    pub rescheduled: usize,
}

/// Drives the simulation one discrete step at a time.
///
/// Owns the step budget and the seeded random source; rules run to
/// completion synchronously within the step, and every mutation made
/// inside a step is visible to the rules that run after it in the same
/// step.
pub struct TickDriver {
    rng: Xoroshiro,
    budget: usize,
    random_tick_count: u32,
}

impl TickDriver {
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            rng: Xoroshiro::from_seed(config.seed),
            budget: config.max_ticks_per_step,
            random_tick_count: config.random_tick_count,
        }
    }

    /// Runs one simulation step.
    ///
    /// Drains due tickets under the per-tick budget, applies their
    /// rules, runs random tick sampling for every loaded chunk, settles
    /// light, publishes the tick-boundary snapshot, and advances the
    /// tick counter. Tickets beyond the budget stay queued.
    pub fn step(&mut self, world: &mut World) -> StepSummary {
        let now = world.current_tick();
        let mut summary = StepSummary::default();

        for ticket in world.drain_due(now, self.budget) {
            self.run_ticket(world, &ticket, &mut summary);
        }

        for chunk_pos in world.loaded_chunk_positions() {
            let candidates =
                sampler::sample(world, chunk_pos, self.random_tick_count, &mut self.rng);
            for pos in candidates {
                let ticket = UpdateTicket {
                    pos,
                    kind: TicketKind::Random,
                    due: now,
                    priority: TickPriority::Normal,
                    seq: 0,
                };
                summary.random_applied += 1;
                self.run_ticket(world, &ticket, &mut summary);
            }
        }

        world.flush_light();
        world.publish_snapshot();
        world.advance_tick();
        summary
    }

    fn run_ticket(&mut self, world: &mut World, ticket: &UpdateTicket, summary: &mut StepSummary) {
        match rules::apply(world, ticket, &mut self.rng) {
            Ok(()) => summary.applied += 1,
            Err(error) if error.is_retryable() => {
                log::debug!(
                    "ticket at ({}, {}, {}) hit {error}; retrying next tick",
                    ticket.pos.x(),
                    ticket.pos.y(),
                    ticket.pos.z()
                );
                world.schedule(ticket.pos, TicketKind::Scheduled, 1, ticket.priority);
                summary.rescheduled += 1;
            }
            Err(error) => {
                // Isolated to this ticket; the step carries on.
                log::warn!(
                    "ticket at ({}, {}, {}) failed: {error}",
                    ticket.pos.x(),
                    ticket.pos.y(),
                    ticket.pos.z()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use basalt_registry::{PropertyKey, builtin};
    use basalt_utils::random::Xoroshiro;
    use basalt_utils::{BlockPos, ChunkPos, UpdateFlags};
    use basalt_world::BlockState;

    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            seed: 99,
            ..SimConfig::default()
        }
    }

    /// World with the 3x3 chunk neighborhood around the origin loaded.
    fn world_3x3() -> World {
        let mut world = World::new(Arc::new(builtin::registry()), &config());
        for cx in -1..=1 {
            for cz in -1..=1 {
                world.ensure_chunk(ChunkPos::new(cx, cz));
            }
        }
        world
    }

    fn place(world: &mut World, pos: BlockPos, state: BlockState) {
        world
            .set_block(pos, state, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)
            .expect("placement");
    }

    fn water_level(world: &World, pos: BlockPos) -> Option<u8> {
        let state = world.get_block(pos).expect("loaded");
        if state.id == builtin::WATER {
            Some(state.property(PropertyKey::Level).unwrap_or(0))
        } else {
            None
        }
    }

    #[test]
    fn water_source_spreads_one_level_per_tick() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        let source = BlockPos::new(0, 64, 0);
        place(
            &mut world,
            source,
            BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 0),
        );
        world.schedule_immediate(source);

        driver.step(&mut world);
        assert_eq!(water_level(&world, BlockPos::new(1, 64, 0)), Some(1));
        assert_eq!(water_level(&world, BlockPos::new(2, 64, 0)), None);
        assert_eq!(water_level(&world, source), Some(0));

        driver.step(&mut world);
        assert_eq!(water_level(&world, BlockPos::new(2, 64, 0)), Some(2));
        assert_eq!(water_level(&world, source), Some(0));
    }

    #[test]
    fn water_levels_rise_with_distance_and_stop_at_seven() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        let source = BlockPos::new(0, 64, 0);
        place(
            &mut world,
            source,
            BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 0),
        );
        world.schedule_immediate(source);

        for _ in 0..12 {
            driver.step(&mut world);
        }

        for x in 1..=7 {
            assert_eq!(
                water_level(&world, BlockPos::new(x, 64, 0)),
                Some(x as u8),
                "level at x={x}"
            );
        }
        // Flow never exceeds level 7.
        assert_eq!(water_level(&world, BlockPos::new(8, 64, 0)), None);
    }

    #[test]
    fn orphaned_flow_drains_after_the_source_breaks() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        let source = BlockPos::new(0, 64, 0);
        place(
            &mut world,
            source,
            BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 0),
        );
        world.schedule_immediate(source);
        for _ in 0..4 {
            driver.step(&mut world);
        }
        assert_eq!(water_level(&world, BlockPos::new(2, 64, 0)), Some(2));

        let mut rng = Xoroshiro::from_seed(7);
        world.break_block(source, None, &mut rng).expect("break");
        // The drain wave chases the remaining spread front; give it
        // room to settle completely.
        for _ in 0..40 {
            driver.step(&mut world);
        }

        for x in 0..=8 {
            assert_eq!(
                water_level(&world, BlockPos::new(x, 64, 0)),
                None,
                "water at x={x} should have drained"
            );
        }
    }

    #[test]
    fn sand_falls_exactly_one_cell_per_tick() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        let start = BlockPos::new(8, 100, 8);
        world
            .set_block(start, BlockState::of(builtin::SAND), UpdateFlags::UPDATE_ALL)
            .expect("placement");

        for fallen in 1..=5i32 {
            driver.step(&mut world);
            let expected = BlockPos::new(8, 100 - fallen, 8);
            assert_eq!(world.id_at(expected).expect("loaded"), builtin::SAND);
            assert_eq!(
                world.id_at(expected.offset(0, 1, 0)).expect("loaded"),
                builtin::AIR,
                "vacated cell after {fallen} falls"
            );
        }
    }

    #[test]
    fn sand_rests_on_solid_ground() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        place(&mut world, BlockPos::new(8, 86, 8), BlockState::of(builtin::STONE));
        world
            .set_block(
                BlockPos::new(8, 90, 8),
                BlockState::of(builtin::SAND),
                UpdateFlags::UPDATE_ALL,
            )
            .expect("placement");

        for _ in 0..8 {
            driver.step(&mut world);
        }
        assert_eq!(
            world.id_at(BlockPos::new(8, 87, 8)).expect("loaded"),
            builtin::SAND
        );
        assert_eq!(
            world.id_at(BlockPos::new(8, 88, 8)).expect("loaded"),
            builtin::AIR
        );
    }

    #[test]
    fn sand_pillars_cascade() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        place(&mut world, BlockPos::new(8, 88, 8), BlockState::of(builtin::STONE));
        world
            .set_block(
                BlockPos::new(8, 90, 8),
                BlockState::of(builtin::SAND),
                UpdateFlags::UPDATE_ALL,
            )
            .expect("placement");
        world
            .set_block(
                BlockPos::new(8, 91, 8),
                BlockState::of(builtin::SAND),
                UpdateFlags::UPDATE_ALL,
            )
            .expect("placement");

        for _ in 0..6 {
            driver.step(&mut world);
        }
        assert_eq!(
            world.id_at(BlockPos::new(8, 89, 8)).expect("loaded"),
            builtin::SAND
        );
        assert_eq!(
            world.id_at(BlockPos::new(8, 90, 8)).expect("loaded"),
            builtin::SAND
        );
        assert_eq!(
            world.id_at(BlockPos::new(8, 91, 8)).expect("loaded"),
            builtin::AIR
        );
    }

    #[test]
    fn unloaded_neighbor_reschedules_the_ticket() {
        let mut world = World::new(Arc::new(builtin::registry()), &config());
        world.ensure_chunk(ChunkPos::new(0, 0));
        let mut driver = TickDriver::new(&config());

        // At the chunk corner, spreading needs the unloaded neighbors.
        let source = BlockPos::new(0, 64, 0);
        place(
            &mut world,
            source,
            BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 0),
        );
        world.schedule_immediate(source);

        let summary = driver.step(&mut world);
        assert_eq!(summary.rescheduled, 1);
        assert_eq!(water_level(&world, BlockPos::new(1, 64, 0)), None);

        // Once the neighborhood loads, the retried ticket succeeds.
        for cx in -1..=1 {
            for cz in -1..=1 {
                world.ensure_chunk(ChunkPos::new(cx, cz));
            }
        }
        driver.step(&mut world);
        assert_eq!(water_level(&world, BlockPos::new(1, 64, 0)), Some(1));
    }

    #[test]
    fn update_budget_defers_excess_tickets() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&SimConfig {
            max_ticks_per_step: 2,
            ..config()
        });

        for x in 0..6 {
            world.schedule_immediate(BlockPos::new(x, 64, 0));
        }
        assert_eq!(world.pending_tickets(), 6);

        let summary = driver.step(&mut world);
        assert_eq!(summary.applied, 2);
        assert_eq!(world.pending_tickets(), 4);

        driver.step(&mut world);
        assert_eq!(world.pending_tickets(), 2);
        driver.step(&mut world);
        assert_eq!(world.pending_tickets(), 0);
    }

    #[test]
    fn opaque_blocks_hold_no_light() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());
        driver.step(&mut world);

        let top = config().vertical_range().max_y() - 1;
        let pos = BlockPos::new(8, top, 8);
        assert_eq!(world.light_at(pos).expect("loaded").0, 15);

        world
            .set_block(pos, BlockState::of(builtin::STONE), UpdateFlags::UPDATE_ALL)
            .expect("placement");
        driver.step(&mut world);
        assert_eq!(world.light_at(pos).expect("loaded"), (0, 0));
    }

    #[test]
    fn sky_light_attenuates_one_per_block() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());
        driver.step(&mut world);

        let top = config().vertical_range().max_y() - 1;
        for depth in 0..=15i32 {
            let expected = 15i32.saturating_sub(depth).max(0) as u8;
            let (sky, _) = world
                .light_at(BlockPos::new(4, top - depth, 4))
                .expect("loaded");
            assert_eq!(sky, expected, "depth {depth}");
        }
    }

    #[test]
    fn emitted_light_diffuses_and_retracts() {
        let mut world = world_3x3();
        let mut driver = TickDriver::new(&config());

        let lamp = BlockPos::new(8, 64, 8);
        world
            .set_block(lamp, BlockState::of(builtin::GLOWSTONE), UpdateFlags::UPDATE_ALL)
            .expect("placement");
        driver.step(&mut world);

        assert_eq!(world.light_at(lamp).expect("loaded").1, 15);
        assert_eq!(world.light_at(lamp.offset(1, 0, 0)).expect("loaded").1, 14);
        assert_eq!(world.light_at(lamp.offset(0, 0, 4)).expect("loaded").1, 11);
        assert_eq!(world.light_at(lamp.offset(0, 0, 15)).expect("loaded").1, 0);

        let mut rng = Xoroshiro::from_seed(7);
        world.break_block(lamp, None, &mut rng).expect("break");
        driver.step(&mut world);

        assert_eq!(world.light_at(lamp).expect("loaded").1, 0);
        assert_eq!(world.light_at(lamp.offset(1, 0, 0)).expect("loaded").1, 0);
        assert_eq!(world.light_at(lamp.offset(0, 0, 4)).expect("loaded").1, 0);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let build = || {
            let mut world = world_3x3();
            let mut driver = TickDriver::new(&config());
            let source = BlockPos::new(0, 64, 0);
            place(
                &mut world,
                source,
                BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 0),
            );
            world.schedule_immediate(source);
            world
                .set_block(
                    BlockPos::new(8, 100, 8),
                    BlockState::of(builtin::SAND),
                    UpdateFlags::UPDATE_ALL,
                )
                .expect("placement");
            for _ in 0..8 {
                driver.step(&mut world);
            }
            world
        };

        let a = build();
        let b = build();
        for x in -8..=8 {
            for z in -8..=8 {
                let pos = BlockPos::new(x, 64, z);
                assert_eq!(
                    a.get_block(pos).expect("loaded"),
                    b.get_block(pos).expect("loaded"),
                    "divergence at ({x}, 64, {z})"
                );
            }
        }
        for y in 90..=100 {
            let pos = BlockPos::new(8, y, 8);
            assert_eq!(
                a.get_block(pos).expect("loaded"),
                b.get_block(pos).expect("loaded")
            );
        }
        assert_eq!(a.pending_tickets(), b.pending_tickets());
    }
}
