use eframe::egui::{Pos2, Rect, Vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 4.0;

const FIT_MARGIN: f32 = 0.8;
const FIT_DURATION_SECS: f32 = 0.75;

struct CameraAnimation {
    from_pan: Vec2,
    from_zoom: f32,
    to_pan: Vec2,
    to_zoom: f32,
    elapsed: f32,
}

/// Pan and zoom applied on top of world coordinates.
///
/// World space has its origin at the top-left corner of the graph area, so the
/// identity camera shows the layout exactly as the simulation placed it.
pub(in crate::app) struct Camera {
    pub(in crate::app) pan: Vec2,
    pub(in crate::app) zoom: f32,
    animation: Option<CameraAnimation>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            animation: None,
        }
    }
}

fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Pan and zoom that center `bounds` in a viewport of `viewport` size.
///
/// Returns `None` for empty or non-finite bounds.
pub(in crate::app) fn fit_target(bounds: Rect, viewport: Vec2) -> Option<(Vec2, f32)> {
    if !bounds.is_finite() || bounds.is_negative() {
        return None;
    }

    let size = bounds.size().max(Vec2::splat(1.0));
    let zoom = ((viewport.x / size.x).min(viewport.y / size.y) * FIT_MARGIN).clamp(MIN_ZOOM, MAX_ZOOM);
    let pan = viewport * 0.5 - bounds.center().to_vec2() * zoom;
    Some((pan, zoom))
}

impl Camera {
    pub(in crate::app) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(in crate::app) fn animate_to(&mut self, pan: Vec2, zoom: f32) {
        self.animation = Some(CameraAnimation {
            from_pan: self.pan,
            from_zoom: self.zoom,
            to_pan: pan,
            to_zoom: zoom,
            elapsed: 0.0,
        });
    }

    /// Advances a running fit animation by `dt` seconds.
    pub(in crate::app) fn update(&mut self, dt: f32) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };

        animation.elapsed += dt.max(0.0);
        let t = (animation.elapsed / FIT_DURATION_SECS).min(1.0);
        let eased = ease_in_out_cubic(t);

        self.pan = animation.from_pan + (animation.to_pan - animation.from_pan) * eased;
        self.zoom = animation.from_zoom + (animation.to_zoom - animation.from_zoom) * eased;

        if t >= 1.0 {
            self.animation = None;
        }
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.animation = None;
        self.pan += delta;
    }

    /// Scales around `anchor` (relative to the graph area's top-left corner),
    /// keeping the world point under it fixed.
    pub(in crate::app) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        self.animation = None;

        let anchor = anchor.to_vec2();
        let world = (anchor - self.pan) / self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor - world * self.zoom;
    }
}
