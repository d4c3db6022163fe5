use crate::coords::Viewport;
use crate::input::PanZoomEvent;

use super::Affine2;

/// Wheel/pinch delta → zoom factor exponent, per device pixel of gesture.
///
/// Empirically tuned; anchor preservation holds for any value, so changing
/// this only changes how fast the zoom feels.
pub const ZOOM_SENSITIVITY: f64 = 1.0e-3;

/// Viewport with a zero dimension — the pixel-to-world scale would divide
/// by it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("degenerate viewport {width}x{height}")]
pub struct DegenerateViewport {
    pub width: u32,
    pub height: u32,
}

/// Owns the screen-to-world transform and mutates it from gesture deltas.
///
/// Single writer: the runtime drains queued input and applies it here once
/// per frame, in arrival order, before the renderer reads the transform.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Affine2,
    sensitivity: f64,
}

impl Camera {
    /// Builds a camera whose view is centered on `center` with the smaller
    /// viewport dimension spanning exactly `span` world units.
    ///
    /// Fit-inside, not stretch-to-fill: the scale is uniform, so the fractal
    /// is undistorted at any aspect ratio and the longer dimension simply
    /// shows more of the plane.
    pub fn new(
        viewport: Viewport,
        center: (f64, f64),
        span: f64,
    ) -> Result<Self, DegenerateViewport> {
        Ok(Self {
            transform: Affine2::fit(viewport, center, span)?,
            sensitivity: ZOOM_SENSITIVITY,
        })
    }

    pub fn with_sensitivity(mut self, per_pixel: f64) -> Self {
        self.sensitivity = per_pixel;
        self
    }

    #[inline]
    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    /// Applies one gesture increment to the transform.
    ///
    /// Pan translates by `(-dx, +dy)` in the transform's own basis; the
    /// vertical flip is the device-pixel y-down vs. world y-up convention.
    ///
    /// Zoom composes `translate(anchor) · scale(factor) · translate(-anchor)`
    /// onto the *existing* transform, in that order. That sequence is what
    /// pins the world point under the anchor pixel in place for any factor;
    /// reordering it (or rebuilding the transform from scratch) breaks the
    /// anchor under repeated gestures.
    pub fn apply_pan_zoom(&mut self, event: &PanZoomEvent, viewport: Viewport) {
        if event.dx != 0.0 || event.dy != 0.0 {
            self.transform = self.transform * Affine2::translation(-event.dx, event.dy);
        }

        if event.dz != 0.0 {
            let factor = (self.sensitivity * event.dz).exp();
            let (ax, ay) = anchor_in_camera_basis(event.x, event.y, viewport);

            self.transform = self.transform
                * Affine2::translation(ax, ay)
                * Affine2::scaling(factor)
                * Affine2::translation(-ax, -ay);
        }
    }

    /// The 3×3 homogeneous `camera` uniform, column-major.
    #[inline]
    pub fn uniform_matrix(&self) -> [f32; 9] {
        self.transform.to_homogeneous()
    }
}

impl Affine2 {
    /// Builds the initial screen-to-world map: uniform scale
    /// `span / min(width, height)` composed with a translation to `center`.
    pub fn fit(
        viewport: Viewport,
        center: (f64, f64),
        span: f64,
    ) -> Result<Self, DegenerateViewport> {
        if !viewport.is_valid() {
            return Err(DegenerateViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let scale = span / f64::from(viewport.min_dimension());

        Ok(Affine2 {
            a: scale,
            b: 0.0,
            c: 0.0,
            d: scale,
            tx: center.0,
            ty: center.1,
        })
    }
}

/// Re-expresses a top-left-origin device-pixel position as a centered,
/// y-up offset — the coordinate frame the transform composes in.
#[inline]
fn anchor_in_camera_basis(x: f64, y: f64, viewport: Viewport) -> (f64, f64) {
    let w = f64::from(viewport.width);
    let h = f64::from(viewport.height);
    (x - w * 0.5, h * 0.5 - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(800, 600);

    fn camera() -> Camera {
        Camera::new(VIEWPORT, (-0.5, 0.0), 4.0).unwrap()
    }

    fn pan(dx: f64, dy: f64) -> PanZoomEvent {
        PanZoomEvent {
            dx,
            dy,
            dz: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }

    fn zoom(dz: f64, x: f64, y: f64) -> PanZoomEvent {
        PanZoomEvent {
            dx: 0.0,
            dy: 0.0,
            dz,
            x,
            y,
        }
    }

    fn assert_world_close(a: (f64, f64), b: (f64, f64)) {
        let scale = a.0.abs().max(a.1.abs()).max(1.0);
        assert!(
            (a.0 - b.0).abs() <= 1e-6 * scale && (a.1 - b.1).abs() <= 1e-6 * scale,
            "{a:?} vs {b:?}"
        );
    }

    // ── anchor invariance ─────────────────────────────────────────────────

    #[test]
    fn zoom_keeps_world_point_under_anchor() {
        for &(x, y) in &[(400.0, 300.0), (0.0, 0.0), (799.0, 599.0), (123.4, 456.7)] {
            for &dz in &[120.0, -120.0, 1.0, -3000.0] {
                let mut cam = camera();
                let (ax, ay) = anchor_in_camera_basis(x, y, VIEWPORT);
                let before = cam.transform().apply(ax, ay);

                cam.apply_pan_zoom(&zoom(dz, x, y), VIEWPORT);

                assert_world_close(before, cam.transform().apply(ax, ay));
            }
        }
    }

    #[test]
    fn anchor_invariance_survives_repeated_gestures() {
        let mut cam = camera();

        // Wander first so the transform is no longer the initial fit.
        cam.apply_pan_zoom(&pan(35.0, -12.0), VIEWPORT);
        cam.apply_pan_zoom(&zoom(240.0, 200.0, 150.0), VIEWPORT);
        cam.apply_pan_zoom(&pan(-8.0, 90.0), VIEWPORT);

        let (x, y) = (620.0, 75.0);
        let (ax, ay) = anchor_in_camera_basis(x, y, VIEWPORT);
        let before = cam.transform().apply(ax, ay);

        for _ in 0..50 {
            cam.apply_pan_zoom(&zoom(60.0, x, y), VIEWPORT);
        }

        assert_world_close(before, cam.transform().apply(ax, ay));
    }

    #[test]
    fn anchor_invariance_is_independent_of_sensitivity() {
        for &k in &[1.0e-4, 1.0e-3, 0.05] {
            let mut cam = camera().with_sensitivity(k);
            let (ax, ay) = anchor_in_camera_basis(250.0, 410.0, VIEWPORT);
            let before = cam.transform().apply(ax, ay);

            cam.apply_pan_zoom(&zoom(-500.0, 250.0, 410.0), VIEWPORT);

            assert_world_close(before, cam.transform().apply(ax, ay));
        }
    }

    // ── idempotence and linearity ─────────────────────────────────────────

    #[test]
    fn zero_delta_event_is_exact_noop() {
        let mut cam = camera();
        let before = cam.transform();

        cam.apply_pan_zoom(&zoom(0.0, 417.0, 33.0), VIEWPORT);

        assert_eq!(before, cam.transform());
    }

    #[test]
    fn pans_compose_additively() {
        let mut split = camera();
        split.apply_pan_zoom(&pan(13.0, -7.0), VIEWPORT);
        split.apply_pan_zoom(&pan(-4.5, 22.0), VIEWPORT);

        let mut merged = camera();
        merged.apply_pan_zoom(&pan(13.0 - 4.5, -7.0 + 22.0), VIEWPORT);

        let s = split.transform();
        let m = merged.transform();
        assert_world_close((s.tx, s.ty), (m.tx, m.ty));
        assert_eq!(s.a, m.a);
    }

    #[test]
    fn zooms_with_shared_anchor_compose_additively() {
        let (x, y) = (333.0, 444.0);

        let mut split = camera();
        split.apply_pan_zoom(&zoom(170.0, x, y), VIEWPORT);
        split.apply_pan_zoom(&zoom(-410.0, x, y), VIEWPORT);

        let mut merged = camera();
        merged.apply_pan_zoom(&zoom(170.0 - 410.0, x, y), VIEWPORT);

        let s = split.transform();
        let m = merged.transform();
        assert_world_close((s.a, s.d), (m.a, m.d));
        assert_world_close((s.tx, s.ty), (m.tx, m.ty));
    }

    #[test]
    fn pan_moves_content_with_the_pointer() {
        let mut cam = camera();
        let center_before = cam.transform().apply(0.0, 0.0);

        // Dragging right must move the camera center left in world space.
        cam.apply_pan_zoom(&pan(100.0, 0.0), VIEWPORT);
        let center_after = cam.transform().apply(0.0, 0.0);

        assert!(center_after.0 < center_before.0);
        assert_eq!(center_after.1, center_before.1);
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn fit_scales_to_the_smaller_dimension() {
        let t = Affine2::fit(Viewport::new(800, 400), (0.0, 0.0), 4.0).unwrap();
        assert_eq!(t.a, 0.01);
        assert_eq!(t.d, 0.01);
        assert_eq!((t.tx, t.ty), (0.0, 0.0));

        // Rotated viewport picks the other dimension.
        let t = Affine2::fit(Viewport::new(400, 800), (0.0, 0.0), 4.0).unwrap();
        assert_eq!(t.a, 0.01);
    }

    #[test]
    fn fit_rejects_degenerate_viewports() {
        let err = Affine2::fit(Viewport::new(0, 500), (0.0, 0.0), 4.0).unwrap_err();
        assert_eq!(
            err,
            DegenerateViewport {
                width: 0,
                height: 500
            }
        );

        assert!(Affine2::fit(Viewport::new(500, 0), (0.0, 0.0), 4.0).is_err());
        assert!(Affine2::fit(Viewport::new(0, 0), (0.0, 0.0), 4.0).is_err());
    }

    #[test]
    fn long_gesture_sequences_stay_finite() {
        let mut cam = camera();

        for i in 0..500 {
            let f = f64::from(i);
            cam.apply_pan_zoom(&pan(f.sin() * 40.0, f.cos() * 40.0), VIEWPORT);
            cam.apply_pan_zoom(
                &zoom(if i % 2 == 0 { 90.0 } else { -75.0 }, 100.0 + f, 500.0 - f),
                VIEWPORT,
            );
        }

        assert!(cam.transform().is_finite());
        let m = cam.uniform_matrix();
        assert!(m.iter().all(|v| v.is_finite()));
    }

    // ── uniform promotion ─────────────────────────────────────────────────

    #[test]
    fn uniform_matrix_carries_scale_and_translation() {
        let cam = Camera::new(Viewport::new(400, 400), (-0.5, 0.25), 4.0).unwrap();
        let m = cam.uniform_matrix();

        assert_eq!(m[0], 0.01);
        assert_eq!(m[4], 0.01);
        assert_eq!(m[6], -0.5);
        assert_eq!(m[7], 0.25);
        assert_eq!(m[8], 1.0);
    }
}
