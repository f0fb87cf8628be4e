// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Size, Vec2};
use mapstory_geom::Envelope;

/// Normalizes an angle in degrees into the half-open range `(-180, 180]`.
///
/// For example `270` becomes `-90` and `-180` becomes `180`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let mut r = degrees % 360.0;
    if r > 180.0 {
        r -= 360.0;
    } else if r <= -180.0 {
        r += 360.0;
    }
    r
}

/// Map viewport: the camera state mapping world space onto a pixel surface.
///
/// The state is a world-space `center`, a `resolution` in world units per
/// pixel, a `rotation` in degrees and the pixel size of the surface. World Y
/// points up while screen Y points down; the world center always maps onto
/// the center of the surface.
///
/// A viewport is created once per rendering surface and mutated in place by
/// gestures and resizes. It is not synchronized: gesture updates and render
/// passes must be serialized by the caller.
#[derive(Clone, Debug)]
pub struct Viewport {
    center: Point,
    resolution: f64,
    rotation: f64,
    size: Size,
    min_resolution: f64,
    max_resolution: f64,
    world_to_screen: Affine,
    screen_to_world: Affine,
}

impl Viewport {
    /// Creates a viewport centered on `center` with the given resolution and surface size.
    ///
    /// - Initial rotation is `0`.
    /// - Resolution is limited to `[1e-9, 1e12]` by default.
    /// - A non-positive or non-finite `resolution` falls back to `1.0`.
    #[must_use]
    pub fn new(center: Point, resolution: f64, size: Size) -> Self {
        let resolution = if resolution.is_finite() && resolution > 0.0 {
            resolution
        } else {
            1.0
        };
        let mut vp = Self {
            center,
            resolution,
            rotation: 0.0,
            size,
            min_resolution: 1e-9,
            max_resolution: 1e12,
            world_to_screen: Affine::IDENTITY,
            screen_to_world: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Returns the world-space point shown at the center of the surface.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Sets the world-space center.
    pub fn set_center(&mut self, center: Point) {
        if self.center == center {
            return;
        }
        self.center = center;
        self.rebuild_transforms();
    }

    /// Returns the current resolution in world units per pixel.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Sets the resolution, clamping it into the configured limits.
    ///
    /// Non-positive or non-finite values are ignored.
    pub fn set_resolution(&mut self, resolution: f64) {
        if !resolution.is_finite() || resolution <= 0.0 {
            return;
        }
        let clamped = resolution.clamp(self.min_resolution, self.max_resolution);
        if self.resolution == clamped {
            return;
        }
        self.resolution = clamped;
        self.rebuild_transforms();
    }

    /// Sets the minimum and maximum resolution.
    ///
    /// The range is normalized so that `min <= max`; the current resolution
    /// is clamped into the new range.
    pub fn set_resolution_limits(&mut self, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_resolution = min.max(f64::MIN_POSITIVE);
        self.max_resolution = max.max(self.min_resolution);
        let clamped = self
            .resolution
            .clamp(self.min_resolution, self.max_resolution);
        if clamped != self.resolution {
            self.resolution = clamped;
            self.rebuild_transforms();
        }
    }

    /// Returns the configured `(min, max)` resolution limits.
    #[must_use]
    pub fn resolution_limits(&self) -> (f64, f64) {
        (self.min_resolution, self.max_resolution)
    }

    /// Returns the rotation in degrees, normalized to `(-180, 180]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the rotation in degrees; the value is normalized to `(-180, 180]`.
    pub fn set_rotation(&mut self, degrees: f64) {
        let r = normalize_rotation(degrees);
        if self.rotation == r {
            return;
        }
        self.rotation = r;
        self.rebuild_transforms();
    }

    /// Returns `true` when the rotation is not exactly zero.
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    /// Returns the surface size in pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Sets the surface size, typically after a resize.
    ///
    /// Center, resolution and rotation are kept; only the visible extent changes.
    pub fn set_size(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        self.size = size;
        self.rebuild_transforms();
    }

    /// Returns the world → screen transform.
    #[must_use]
    pub fn world_to_screen_affine(&self) -> Affine {
        self.world_to_screen
    }

    /// Returns the screen → world transform.
    #[must_use]
    pub fn screen_to_world_affine(&self) -> Affine {
        self.screen_to_world
    }

    /// Converts a world-space point into screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        self.world_to_screen * pt
    }

    /// Converts a screen pixel position into world space.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        self.screen_to_world * pt
    }

    /// Returns the world-space envelope covering the whole surface.
    ///
    /// When rotated, this is the bounding box of the four projected corners
    /// and therefore larger than the surface area in world units.
    #[must_use]
    pub fn visible_extent(&self) -> Envelope {
        let (w, h) = (self.size.width, self.size.height);
        let corners = [
            Point::ORIGIN,
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        let mut extent = Envelope::from_point(self.screen_to_world(corners[0]));
        for c in &corners[1..] {
            extent = extent.join_point(self.screen_to_world(*c));
        }
        extent
    }

    /// Applies one pan/pinch/rotate gesture sample.
    ///
    /// The world point that was under `previous_focus` ends up under `focus`
    /// after the update. `scale_ratio` is the pinch ratio (new distance over
    /// previous distance): values above one zoom in. `rotation_delta` is
    /// added to the current rotation in degrees.
    ///
    /// Center, resolution and rotation change together; there is no
    /// observable intermediate state.
    pub fn transform(
        &mut self,
        focus: Point,
        previous_focus: Point,
        scale_ratio: f64,
        rotation_delta: f64,
    ) {
        let anchor = self.screen_to_world(previous_focus);

        if scale_ratio.is_finite() && scale_ratio > 0.0 && scale_ratio != 1.0 {
            self.resolution =
                (self.resolution / scale_ratio).clamp(self.min_resolution, self.max_resolution);
        }
        if rotation_delta != 0.0 {
            self.rotation = normalize_rotation(self.rotation + rotation_delta);
        }
        self.rebuild_transforms();

        let under_focus = self.screen_to_world(focus);
        self.center += anchor - under_focus;
        self.rebuild_transforms();
    }

    /// Pans by a delta in screen pixels; content follows the pointer.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let focus = self.surface_center();
        self.transform(focus + delta, focus, 1.0, 0.0);
    }

    /// Zooms by `factor` keeping the world point under `anchor` fixed.
    ///
    /// A factor above one zooms in (resolution decreases).
    pub fn zoom_about_screen_point(&mut self, anchor: Point, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.transform(anchor, anchor, factor, 0.0);
    }

    /// Centers the view on the given world-space point.
    pub fn center_on(&mut self, world_pt: Point) {
        self.set_center(world_pt);
    }

    /// Centers on `extent` and picks the resolution that fits it entirely
    /// into the surface (ignoring rotation).
    ///
    /// Degenerate extents only recenter.
    pub fn fit_extent(&mut self, extent: Envelope) {
        self.center = extent.centroid();
        let (w, h) = (self.size.width, self.size.height);
        if extent.width() > 0.0 && extent.height() > 0.0 && w > 0.0 && h > 0.0 {
            let res = (extent.width() / w).max(extent.height() / h);
            self.resolution = res.clamp(self.min_resolution, self.max_resolution);
        }
        self.rebuild_transforms();
    }

    /// Builds the draw matrix for content laid out in world units from `top_left`.
    ///
    /// The matrix is `prior ∘ center-in-screen ∘ rotation ∘ zoom ∘ focal-offset`
    /// where the focal offset moves `top_left` relative to the view center
    /// (flipping Y). Content drawn into `(0, 0, width, height)` in world units
    /// lands where the world rectangle `top_left .. top_left + (width, -height)`
    /// is shown on screen. `prior` is the surface's existing matrix (for
    /// example a device pixel ratio scale) and is applied last.
    #[must_use]
    pub fn rotated_draw_matrix(&self, prior: Affine, top_left: Point) -> Affine {
        let focal_offset = Affine::translate(Vec2::new(
            top_left.x - self.center.x,
            self.center.y - top_left.y,
        ));
        let zoom = Affine::scale(1.0 / self.resolution);
        let rotation = Affine::rotate(self.rotation.to_radians());
        let center_in_screen = Affine::translate(self.surface_center().to_vec2());
        prior * center_in_screen * rotation * zoom * focal_offset
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            center: self.center,
            resolution: self.resolution,
            rotation: self.rotation,
            size: self.size,
            visible_extent: self.visible_extent(),
            min_resolution: self.min_resolution,
            max_resolution: self.max_resolution,
        }
    }

    fn surface_center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    fn rebuild_transforms(&mut self) {
        let inv_res = 1.0 / self.resolution;
        // World → screen: move the center to the origin, scale with a Y flip,
        // rotate, then move the origin to the surface center.
        self.world_to_screen = Affine::translate(self.surface_center().to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(inv_res, -inv_res)
            * Affine::translate(-self.center.to_vec2());
        self.screen_to_world = self.world_to_screen.inverse();
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// World-space center.
    pub center: Point,
    /// World units per pixel.
    pub resolution: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Surface size in pixels.
    pub size: Size,
    /// World envelope currently visible.
    pub visible_extent: Envelope,
    /// Minimum resolution.
    pub min_resolution: f64,
    /// Maximum resolution.
    pub max_resolution: f64,
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Size, Vec2};
    use mapstory_geom::Envelope;

    use super::{Viewport, normalize_rotation};

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn center_maps_to_surface_center() {
        let vp = Viewport::new(Point::new(0.0, 0.0), 1.0, Size::new(100.0, 100.0));
        assert_close(vp.world_to_screen(Point::ORIGIN), Point::new(50.0, 50.0));
    }

    #[test]
    fn world_y_up_is_screen_y_down() {
        let vp = Viewport::new(Point::new(0.0, 0.0), 2.0, Size::new(100.0, 100.0));
        assert_close(vp.world_to_screen(Point::new(20.0, 20.0)), Point::new(60.0, 40.0));
    }

    #[test]
    fn normalize_rotation_range() {
        assert_eq!(normalize_rotation(270.0), -90.0);
        assert_eq!(normalize_rotation(-180.0), 180.0);
        assert_eq!(normalize_rotation(180.0), 180.0);
        assert_eq!(normalize_rotation(540.0), 180.0);
        assert_eq!(normalize_rotation(-190.0), 170.0);
        assert_eq!(normalize_rotation(0.0), 0.0);
    }

    #[test]
    fn rotation_is_normalized_and_is_rotated_tracks_it() {
        let mut vp = Viewport::new(Point::ORIGIN, 1.0, Size::new(10.0, 10.0));
        assert!(!vp.is_rotated());
        vp.set_rotation(450.0);
        assert_eq!(vp.rotation(), 90.0);
        assert!(vp.is_rotated());
        vp.set_rotation(360.0);
        assert!(!vp.is_rotated());
    }

    #[test]
    fn invalid_resolution_is_ignored() {
        let mut vp = Viewport::new(Point::ORIGIN, 0.0, Size::new(10.0, 10.0));
        assert_eq!(vp.resolution(), 1.0);
        vp.set_resolution(-3.0);
        assert_eq!(vp.resolution(), 1.0);
        vp.set_resolution(f64::NAN);
        assert_eq!(vp.resolution(), 1.0);
    }

    #[test]
    fn resolution_limits_clamp() {
        let mut vp = Viewport::new(Point::ORIGIN, 10.0, Size::new(10.0, 10.0));
        vp.set_resolution_limits(20.0, 1.0);
        assert_eq!(vp.resolution_limits(), (1.0, 20.0));
        vp.set_resolution(100.0);
        assert_eq!(vp.resolution(), 20.0);
        vp.zoom_about_screen_point(Point::new(5.0, 5.0), 1000.0);
        assert_eq!(vp.resolution(), 1.0);
    }

    #[test]
    fn pan_moves_content_with_pointer() {
        let mut vp = Viewport::new(Point::ORIGIN, 1.0, Size::new(100.0, 100.0));
        vp.pan_by_screen(Vec2::new(10.0, 0.0));
        // Content moved right, so the world origin is now right of center.
        assert_close(vp.world_to_screen(Point::ORIGIN), Point::new(60.0, 50.0));
        assert_close(vp.center(), Point::new(-10.0, 0.0));
    }

    #[test]
    fn visible_extent_unrotated() {
        let vp = Viewport::new(Point::new(100.0, 50.0), 2.0, Size::new(100.0, 50.0));
        let e = vp.visible_extent();
        assert!((e.min_x() - 0.0).abs() < 1e-9);
        assert!((e.max_x() - 200.0).abs() < 1e-9);
        assert!((e.min_y() - 0.0).abs() < 1e-9);
        assert!((e.max_y() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn fit_extent_covers_extent() {
        let mut vp = Viewport::new(Point::ORIGIN, 1.0, Size::new(200.0, 100.0));
        let extent = Envelope::new(-50.0, -50.0, 150.0, 50.0);
        vp.fit_extent(extent);
        assert_close(vp.center(), Point::new(50.0, 0.0));
        let visible = vp.visible_extent();
        assert!(visible.min_x() <= extent.min_x() + 1e-9);
        assert!(visible.max_x() >= extent.max_x() - 1e-9);
        assert!(visible.min_y() <= extent.min_y() + 1e-9);
        assert!(visible.max_y() >= extent.max_y() - 1e-9);
    }

    #[test]
    fn rotated_draw_matrix_matches_world_to_screen_when_unrotated() {
        let vp = Viewport::new(Point::new(10.0, 20.0), 0.5, Size::new(80.0, 60.0));
        let top_left = Point::new(4.0, 30.0);
        let m = vp.rotated_draw_matrix(Affine::IDENTITY, top_left);
        // Local (0, 0) is the top-left corner, local (w, h) the bottom-right.
        assert_close(m * Point::ORIGIN, vp.world_to_screen(top_left));
        assert_close(
            m * Point::new(6.0, 8.0),
            vp.world_to_screen(Point::new(10.0, 22.0)),
        );
    }

    #[test]
    fn rotated_draw_matrix_agrees_with_rotated_viewport() {
        let mut vp = Viewport::new(Point::new(10.0, 20.0), 0.5, Size::new(80.0, 60.0));
        vp.set_rotation(33.0);
        let top_left = Point::new(4.0, 30.0);
        let m = vp.rotated_draw_matrix(Affine::IDENTITY, top_left);
        assert_close(m * Point::ORIGIN, vp.world_to_screen(top_left));
        assert_close(
            m * Point::new(6.0, 8.0),
            vp.world_to_screen(Point::new(10.0, 22.0)),
        );
    }

    #[test]
    fn rotated_draw_matrix_applies_prior_last() {
        let mut vp = Viewport::new(Point::ORIGIN, 1.0, Size::new(100.0, 100.0));
        vp.set_rotation(90.0);
        let prior = Affine::scale(2.0);
        let m = vp.rotated_draw_matrix(prior, Point::ORIGIN);
        let without = vp.rotated_draw_matrix(Affine::IDENTITY, Point::ORIGIN);
        assert_close(m * Point::new(3.0, 4.0), prior * (without * Point::new(3.0, 4.0)));
    }

    #[test]
    fn debug_info_reports_state() {
        let mut vp = Viewport::new(Point::new(1.0, 2.0), 3.0, Size::new(40.0, 30.0));
        vp.set_rotation(-45.0);
        let info = vp.debug_info();
        assert_eq!(info.center, Point::new(1.0, 2.0));
        assert_eq!(info.resolution, 3.0);
        assert_eq!(info.rotation, -45.0);
        assert_eq!(info.size, Size::new(40.0, 30.0));
        assert!(info.min_resolution <= info.max_resolution);
    }
}
