//! Viewport offset over the world map.
//!
//! Screen pixels map 1:1 to world units; the camera is a pure translation.

use serde::{Deserialize, Serialize};

use crate::config::GalaxyRules;
use crate::math::Vec2Fixed;

/// Directional keys held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PanInput {
    /// Pan left.
    #[serde(default)]
    pub left: bool,
    /// Pan right.
    #[serde(default)]
    pub right: bool,
    /// Pan up.
    #[serde(default)]
    pub up: bool,
    /// Pan down.
    #[serde(default)]
    pub down: bool,
}

impl PanInput {
    /// No key held.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// Whether any direction is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Top-left corner of the viewport in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Camera {
    position: Vec2Fixed,
    bounds: Vec2Fixed,
}

impl Camera {
    /// Camera at the world origin.
    #[must_use]
    pub fn new(rules: &GalaxyRules) -> Self {
        Self {
            position: Vec2Fixed::ZERO,
            bounds: rules.camera_bounds(),
        }
    }

    /// Camera with the viewport centred on `focus`, clamped to the world.
    #[must_use]
    pub fn centered_on(focus: Vec2Fixed, rules: &GalaxyRules) -> Self {
        let mut camera = Self::new(rules);
        let half_viewport = Vec2Fixed::new(rules.viewport_width / 2, rules.viewport_height / 2);
        camera.set_position(focus - half_viewport);
        camera
    }

    /// Current top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2Fixed {
        self.position
    }

    /// Largest allowed position on each axis (world size minus viewport).
    #[must_use]
    pub const fn bounds(&self) -> Vec2Fixed {
        self.bounds
    }

    /// Move to `position`, clamped to `[0, bounds]`.
    pub fn set_position(&mut self, position: Vec2Fixed) {
        self.position = position.clamp(Vec2Fixed::ZERO, self.bounds);
    }

    /// Apply one frame of panning.
    pub fn pan(&mut self, input: PanInput, rules: &GalaxyRules) {
        if !input.any() {
            return;
        }

        let speed = rules.camera_speed;
        let mut next = self.position;
        if input.left {
            next.x -= speed;
        }
        if input.right {
            next.x += speed;
        }
        if input.up {
            next.y -= speed;
        }
        if input.down {
            next.y += speed;
        }
        self.set_position(next);
    }

    /// Convert a screen point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2Fixed) -> Vec2Fixed {
        screen + self.position
    }

    /// Convert a world point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2Fixed) -> Vec2Fixed {
        world - self.position
    }
}
