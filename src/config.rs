//! Session constants gathered in one place.

use std::time::Duration;

use anyhow::{ensure, Result};

const FIELD_WIDTH: u16 = 30;
const FIELD_HEIGHT: u16 = 30;
const ENEMY_COUNT: usize = 5;
const ITEM_SPAWN_INTERVAL: u32 = 50;
const ITEM_FALL_INTERVAL: u32 = 10;
const FPS: u32 = 30;
const END_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub width: u16,
    pub height: u16,
    pub enemy_count: usize,
    /// Ticks between item spawns.
    pub item_spawn_interval: u32,
    /// Fall interval given to every spawned item.
    pub item_fall_interval: u32,
    pub fps: u32,
    /// How long the game-over screen stays up before exit.
    pub end_delay: Duration,
    /// Drop collected items every n ticks.  `None` keeps them all session long.
    pub compact_every: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            enemy_count: ENEMY_COUNT,
            item_spawn_interval: ITEM_SPAWN_INTERVAL,
            item_fall_interval: ITEM_FALL_INTERVAL,
            fps: FPS,
            end_delay: END_DELAY,
            compact_every: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "field must be at least 1x1, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.item_spawn_interval > 0, "item spawn interval must be positive");
        ensure!(self.item_fall_interval > 0, "item fall interval must be positive");
        ensure!(self.fps > 0, "frame rate must be positive");
        ensure!(
            self.compact_every != Some(0),
            "compaction cadence must be positive"
        );
        Ok(())
    }

    /// Target wall-clock length of one tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}
