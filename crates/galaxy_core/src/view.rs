//! Zoom level and view mode.

use serde::{Deserialize, Serialize};

use crate::config::GalaxyRules;
use crate::math::{fixed_serde, Fixed};

/// What the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Whole-galaxy map.
    Overview,
    /// Close-up of the selected planet.
    PlanetDetail,
}

/// Continuous zoom easing toward a target, plus the selected planet.
///
/// The mode is derived from the zoom value and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    /// Current zoom in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    zoom: Fixed,
    /// Value the zoom eases toward.
    #[serde(with = "fixed_serde")]
    target_zoom: Fixed,
    /// Planet picked by the last click on a planet.
    selected: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Fully zoomed out, nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            zoom: Fixed::ZERO,
            target_zoom: Fixed::ZERO,
            selected: None,
        }
    }

    /// Current zoom.
    #[must_use]
    pub const fn zoom(&self) -> Fixed {
        self.zoom
    }

    /// Zoom target.
    #[must_use]
    pub const fn target_zoom(&self) -> Fixed {
        self.target_zoom
    }

    /// Name of the selected planet.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Mode implied by the current zoom.
    #[must_use]
    pub fn mode(&self, rules: &GalaxyRules) -> ViewMode {
        if self.zoom > rules.detail_zoom_threshold {
            ViewMode::PlanetDetail
        } else {
            ViewMode::Overview
        }
    }

    /// Select a planet and zoom all the way in on it.
    pub fn select_planet(&mut self, name: impl Into<String>) {
        self.selected = Some(name.into());
        self.target_zoom = Fixed::ONE;
    }

    #[cfg(test)]
    fn set_target_zoom(&mut self, target: Fixed) {
        self.target_zoom = target.clamp(Fixed::ZERO, Fixed::ONE);
    }

    /// Ease the zoom one frame toward its target.
    ///
    /// Moves `zoom_rate` of the remaining distance. Once within
    /// `zoom_settle_epsilon` of the target the zoom stays put.
    pub fn update(&mut self, rules: &GalaxyRules) {
        let delta = self.target_zoom - self.zoom;
        if delta.abs() <= rules.zoom_settle_epsilon {
            return;
        }

        let before = self.mode(rules);
        self.zoom = (self.zoom + delta * rules.zoom_rate).clamp(Fixed::ZERO, Fixed::ONE);
        let after = self.mode(rules);
        if before != after {
            tracing::debug!(zoom = %self.zoom, ?after, "View mode changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Fixed, b: f64) -> bool {
        (a - Fixed::from_num(b)).abs() < Fixed::from_num(0.000_001)
    }

    #[test]
    fn test_starts_in_overview() {
        let view = ViewState::new();
        assert_eq!(view.mode(&GalaxyRules::default()), ViewMode::Overview);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_first_update_covers_a_tenth() {
        let rules = GalaxyRules::default();
        let mut view = ViewState::new();
        view.select_planet("Coruscant");

        view.update(&rules);

        assert!(close(view.zoom(), 0.1));
        assert_eq!(view.selected(), Some("Coruscant"));
    }

    #[test]
    fn test_zoom_approaches_monotonically() {
        let rules = GalaxyRules::default();
        let mut view = ViewState::new();
        view.select_planet("Coruscant");

        let mut previous = view.zoom();
        for _ in 0..100 {
            view.update(&rules);
            assert!(view.zoom() >= previous);
            assert!(view.zoom() <= Fixed::ONE);
            previous = view.zoom();
        }
        assert!(Fixed::ONE - view.zoom() <= rules.zoom_settle_epsilon);
    }

    #[test]
    fn test_mode_flips_once_past_threshold() {
        let rules = GalaxyRules::default();
        let mut view = ViewState::new();
        view.select_planet("Coruscant");

        let mut flips = 0;
        let mut mode = view.mode(&rules);
        for _ in 0..100 {
            view.update(&rules);
            let next = view.mode(&rules);
            if next != mode {
                flips += 1;
                assert_eq!(next, ViewMode::PlanetDetail);
                assert!(view.zoom() > rules.detail_zoom_threshold);
            }
            mode = next;
        }
        assert_eq!(flips, 1);
    }

    #[test]
    fn test_settled_zoom_does_not_move() {
        let rules = GalaxyRules::default();
        let mut view = ViewState::new();
        view.set_target_zoom(Fixed::from_num(0.005));

        view.update(&rules);

        assert_eq!(view.zoom(), Fixed::ZERO);
    }

    #[test]
    fn test_target_is_clamped() {
        let mut view = ViewState::new();
        view.set_target_zoom(Fixed::from_num(3));
        assert_eq!(view.target_zoom(), Fixed::ONE);
        view.set_target_zoom(Fixed::from_num(-1));
        assert_eq!(view.target_zoom(), Fixed::ZERO);
    }
}
