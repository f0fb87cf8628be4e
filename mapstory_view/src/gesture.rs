// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch gesture helpers: pinch sampling and rotation snapping.
//!
//! ## Usage
//!
//! 1) Call [`GestureState::touch_start`] when a new interaction begins.
//! 2) For single-touch moves call [`GestureState::drag`].
//! 3) For multi-touch moves build a [`PinchSample`] for the previous and
//!    current touch positions and call [`GestureState::pinch`].
//! 4) Call [`GestureState::touch_end`] when all touches are released.
//!
//! Rotation snapping avoids accidental micro-rotation: while the map is
//! unrotated, rotation only starts once the accumulated twist reaches the
//! un-snap threshold; once rotated, it snaps back to north when the twist
//! returns within the re-snap threshold.
//!
//! ```
//! use kurbo::{Point, Size};
//! use mapstory_view::{GestureState, PinchSample, SnapConfig, Viewport};
//!
//! let mut vp = Viewport::new(Point::ORIGIN, 1.0, Size::new(200.0, 200.0));
//! let mut gesture = GestureState::new(SnapConfig::default());
//! gesture.touch_start(&vp);
//!
//! let before = PinchSample::from_touches(&[Point::new(50.0, 100.0), Point::new(150.0, 100.0)]).unwrap();
//! let after = PinchSample::from_touches(&[Point::new(25.0, 100.0), Point::new(175.0, 100.0)]).unwrap();
//! gesture.pinch(&mut vp, &before, &after);
//!
//! // Fingers moved apart by a factor of 1.5: zoomed in, no rotation.
//! assert!((vp.resolution() - 1.0 / 1.5).abs() < 1e-12);
//! assert_eq!(vp.rotation(), 0.0);
//! ```

use kurbo::Point;

use crate::viewport::{Viewport, normalize_rotation};

/// Thresholds for rotation snapping.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapConfig {
    /// Accumulated twist (degrees) needed before an unrotated map starts rotating.
    pub unsnap_degrees: f64,
    /// Twist (degrees) within which a rotated map snaps back to zero.
    pub resnap_degrees: f64,
    /// When `true`, gestures never rotate the map.
    pub rotation_lock: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            unsnap_degrees: 30.0,
            resnap_degrees: 5.0,
            rotation_lock: false,
        }
    }
}

/// Per-gesture rotation snapping state.
#[derive(Copy, Clone, Debug, Default)]
pub struct RotationSnap {
    config: SnapConfig,
    inner_rotation: f64,
}

impl RotationSnap {
    /// Creates snapping state with the given thresholds.
    #[must_use]
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            inner_rotation: 0.0,
        }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub fn config(&self) -> SnapConfig {
        self.config
    }

    /// Replaces the thresholds; the accumulated angle is kept.
    pub fn set_config(&mut self, config: SnapConfig) {
        self.config = config;
    }

    /// Accumulated twist in degrees, normalized to `(-180, 180]`.
    #[must_use]
    pub fn inner_rotation(&self) -> f64 {
        self.inner_rotation
    }

    /// Starts accumulating from the viewport's current rotation.
    pub fn begin(&mut self, current_rotation: f64) {
        self.inner_rotation = normalize_rotation(current_rotation);
    }

    /// Accumulates `angle_delta` and returns the rotation delta to apply.
    ///
    /// `current_rotation` is the viewport rotation before this update.
    pub fn update(&mut self, angle_delta: f64, current_rotation: f64) -> f64 {
        if self.config.rotation_lock {
            return 0.0;
        }
        self.inner_rotation = normalize_rotation(self.inner_rotation + angle_delta);

        let inner = self.inner_rotation.abs();
        if current_rotation == 0.0 {
            if inner >= self.config.unsnap_degrees.abs() {
                log::trace!("rotation unsnapped at {:.2} deg", self.inner_rotation);
                return self.inner_rotation;
            }
            0.0
        } else if inner <= self.config.resnap_degrees.abs() {
            log::trace!("rotation snapped back from {current_rotation:.2} deg");
            -current_rotation
        } else {
            self.inner_rotation - current_rotation
        }
    }
}

/// Summary of a multi-touch sample: centroid, spread and twist.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinchSample {
    /// Centroid of all touches in screen pixels.
    pub center: Point,
    /// Distance from the centroid to the first touch.
    pub radius: f64,
    /// Angle of the line from the first to the second touch, in degrees.
    pub angle: f64,
}

impl PinchSample {
    /// Builds a sample from touch positions.
    ///
    /// Returns `None` when fewer than two touches are given.
    #[must_use]
    pub fn from_touches(touches: &[Point]) -> Option<Self> {
        let [first, second, ..] = touches else {
            return None;
        };
        let mut sum = kurbo::Vec2::ZERO;
        for t in touches {
            sum += t.to_vec2();
        }
        let center = (sum / touches.len() as f64).to_point();
        let radius = (*first - center).hypot();
        let angle = (*second - *first).atan2().to_degrees();
        Some(Self {
            center,
            radius,
            angle,
        })
    }
}

/// Combines pan, pinch zoom and snapped rotation into viewport updates.
#[derive(Copy, Clone, Debug, Default)]
pub struct GestureState {
    snap: RotationSnap,
    active: bool,
}

impl GestureState {
    /// Creates gesture state with the given snapping thresholds.
    #[must_use]
    pub fn new(config: SnapConfig) -> Self {
        Self {
            snap: RotationSnap::new(config),
            active: false,
        }
    }

    /// Returns the rotation snapping state.
    #[must_use]
    pub fn snap(&self) -> &RotationSnap {
        &self.snap
    }

    /// Returns the rotation snapping state for reconfiguration.
    pub fn snap_mut(&mut self) -> &mut RotationSnap {
        &mut self.snap
    }

    /// Begins a new interaction.
    pub fn touch_start(&mut self, viewport: &Viewport) {
        self.active = true;
        self.snap.begin(viewport.rotation());
    }

    /// Single-touch pan from `previous` to `position`.
    pub fn drag(&mut self, viewport: &mut Viewport, position: Point, previous: Point) {
        viewport.transform(position, previous, 1.0, 0.0);
        self.snap.begin(viewport.rotation());
    }

    /// Multi-touch update from `previous` to `current`.
    pub fn pinch(&mut self, viewport: &mut Viewport, previous: &PinchSample, current: &PinchSample) {
        let rotation_delta = self
            .snap
            .update(current.angle - previous.angle, viewport.rotation());
        let ratio = if previous.radius > 0.0 {
            current.radius / previous.radius
        } else {
            1.0
        };
        viewport.transform(current.center, previous.center, ratio, rotation_delta);
    }

    /// Ends the interaction.
    pub fn touch_end(&mut self) {
        self.active = false;
    }

    /// Returns `true` between [`GestureState::touch_start`] and [`GestureState::touch_end`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{PinchSample, RotationSnap, SnapConfig};

    #[test]
    fn pinch_sample_needs_two_touches() {
        assert!(PinchSample::from_touches(&[]).is_none());
        assert!(PinchSample::from_touches(&[Point::ORIGIN]).is_none());
    }

    #[test]
    fn pinch_sample_values() {
        let s = PinchSample::from_touches(&[Point::new(0.0, 0.0), Point::new(10.0, 10.0)])
            .expect("two touches");
        assert_eq!(s.center, Point::new(5.0, 5.0));
        assert!((s.radius - 5.0 * core::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((s.angle - 45.0).abs() < 1e-12);
    }

    #[test]
    fn lock_blocks_rotation() {
        let mut snap = RotationSnap::new(SnapConfig {
            rotation_lock: true,
            ..SnapConfig::default()
        });
        snap.begin(0.0);
        assert_eq!(snap.update(90.0, 0.0), 0.0);
        assert_eq!(snap.inner_rotation(), 0.0);
    }

    #[test]
    fn inner_rotation_is_normalized() {
        let mut snap = RotationSnap::new(SnapConfig::default());
        snap.begin(170.0);
        snap.update(100.0, 170.0);
        assert_eq!(snap.inner_rotation(), -90.0);
    }

    #[test]
    fn rotated_map_tracks_twist() {
        let mut snap = RotationSnap::new(SnapConfig::default());
        snap.begin(40.0);
        let delta = snap.update(5.0, 40.0);
        assert!((delta - 5.0).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snap_config_from_json_uses_defaults() {
        let config: SnapConfig =
            serde_json::from_str(r#"{ "unsnap_degrees": 45.0 }"#).expect("valid config");
        assert_eq!(config.unsnap_degrees, 45.0);
        assert_eq!(config.resnap_degrees, 5.0);
        assert!(!config.rotation_lock);
    }
}
