//! Simulation configuration.

use std::fs;
use std::path::Path;

use basalt_world::VerticalRange;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = r#"{
    // Seed driving every random decision in the simulation.
    seed: 0,
    // Vertical range: lowest layer and total height (multiple of 16).
    min_y: -64,
    world_height: 384,
    // Random tick candidates drawn per loaded chunk per tick.
    random_tick_count: 3,
    // Update tickets processed per tick; the backpressure bound.
    max_ticks_per_step: 4096,
    // Pending tickets held before the queue starts shedding.
    scheduler_capacity: 65536,
}"#;

/// Tunables of the tick loop and the world it drives.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub seed: u64,
    pub min_y: i32,
    pub world_height: u32,
    pub random_tick_count: u32,
    pub max_ticks_per_step: usize,
    pub scheduler_capacity: usize,
}

impl SimConfig {
    /// Loads the config file, writing the default one first if absent.
    ///
    /// # Panics
    /// Panics if the file cannot be read, written, or parsed, or if the
    /// parsed config fails validation.
    #[must_use]
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            let raw = fs::read_to_string(path).expect("config file is readable");
            let config: Self = serde_json5::from_str(&raw).expect("config file parses");
            config.validate().expect("config file is valid");
            config
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("config directory is creatable");
            }
            fs::write(path, DEFAULT_CONFIG).expect("config file is writable");
            Self::default()
        }
    }

    /// Checks the config against the engine's structural limits.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.world_height == 0 || !self.world_height.is_multiple_of(16) {
            return Err("world_height must be a positive multiple of 16");
        }
        if self.world_height > 4096 {
            return Err("world_height must be at most 4096");
        }
        if self.random_tick_count > 4096 {
            return Err("random_tick_count must be at most 4096");
        }
        if self.max_ticks_per_step == 0 {
            return Err("max_ticks_per_step must be positive");
        }
        if self.scheduler_capacity < 64 {
            return Err("scheduler_capacity must be at least 64");
        }
        Ok(())
    }

    /// The vertical range this config describes.
    #[must_use]
    pub fn vertical_range(&self) -> VerticalRange {
        VerticalRange::new(self.min_y, self.world_height)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_y: -64,
            world_height: 384,
            random_tick_count: 3,
            max_ticks_per_step: 4096,
            scheduler_capacity: 65536,
        }
    }
}
