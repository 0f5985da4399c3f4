//! # Placement
//!
//! Where a freshly placed device lands on the canvas.
//!
//! The controller asks a [`Placement`] for each new device. The default
//! scatters devices uniformly over the configured area; tests inject a fixed
//! or seeded strategy so layouts are reproducible.

use crate::Position;
use crate::config::PlacementArea;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of initial positions for placed devices.
pub trait Placement {
    /// Position for the next placed device.
    fn next_position(&mut self) -> Position;
}

/// Uniformly random positions within `[0, width) x [0, height)`.
#[derive(Debug, Clone)]
pub struct RandomPlacement {
    rng: StdRng,
    width: i32,
    height: i32,
}

impl RandomPlacement {
    /// Create a placement over `area`, seeded from the area or the OS.
    #[must_use]
    pub fn new(area: PlacementArea) -> Self {
        let rng = match area.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            width: area.width.max(1),
            height: area.height.max(1),
        }
    }
}

impl Placement for RandomPlacement {
    fn next_position(&mut self) -> Position {
        Position::new(
            self.rng.random_range(0..self.width),
            self.rng.random_range(0..self.height),
        )
    }
}

/// Every device lands on the same spot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPlacement(pub Position);

impl Placement for FixedPlacement {
    fn next_position(&mut self) -> Position {
        self.0
    }
}
