//! Block update & propagation simulation: the update scheduler, the
//! propagation rules, light, random ticks, and the tick driver that
//! binds them to a world.

pub mod config;
pub mod driver;
pub mod light_engine;
pub mod rules;
pub mod sampler;
pub mod ticks;
pub mod world;

pub use config::SimConfig;
pub use driver::{StepSummary, TickDriver};
pub use light_engine::LightEngine;
pub use ticks::{TickPriority, TicketKind, UpdateQueue, UpdateTicket};
pub use world::{World, WorldHandle};
