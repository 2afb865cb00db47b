use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

const ROOT_COLOR: Color32 = Color32::from_rgb(0x4A, 0x90, 0xE2);
const DEFAULT_CATEGORY_COLOR: Color32 = Color32::from_rgb(0xB8, 0xE9, 0x86);

pub(super) const GRID_STEP: f32 = 40.0;
pub(super) const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(54, 64, 75, 153);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);

fn category_color(category: &str) -> Option<Color32> {
    let color = match category {
        "vitamins" => Color32::from_rgb(0x4A, 0x90, 0xE2),
        "dietary" => Color32::from_rgb(0x7E, 0xD3, 0x21),
        "health" => Color32::from_rgb(0x50, 0xE3, 0xC2),
        "deficiency" => Color32::from_rgb(0xF5, 0xA6, 0x23),
        "excess" => Color32::from_rgb(0xD0, 0x02, 0x1B),
        "classification" => Color32::from_rgb(0x90, 0x13, 0xFE),
        "sources" => Color32::from_rgb(0xFF, 0x6B, 0x35),
        "default" => DEFAULT_CATEGORY_COLOR,
        _ => return None,
    };
    Some(color)
}

/// Fill for a node; the traversal root always gets the root color.
pub(super) fn node_fill(category: Option<&str>, depth: usize) -> Color32 {
    if depth == 0 {
        return ROOT_COLOR;
    }

    category
        .and_then(category_color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Ellipse radii in world units: width grows with the title, height marks the root.
pub(super) fn node_half_size(title: &str, depth: usize) -> Vec2 {
    let characters = title.chars().count() as f32;
    let rx = (characters * 4.0 + 20.0).max(40.0);
    let ry = if depth == 0 { 35.0 } else { 25.0 };
    vec2(rx, ry)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Grid that scrolls and scales with the camera.
pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(26, 32, 44));

    let step = (GRID_STEP * zoom).max(8.0);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 74, 92, 77));
    let origin = rect.min + pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.min + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.min - pan) / zoom
}

pub(super) fn ellipse_contains(center: Pos2, radius: Vec2, point: Pos2) -> bool {
    if radius.x <= 0.0 || radius.y <= 0.0 {
        return false;
    }

    let offset = point - center;
    let nx = offset.x / radius.x;
    let ny = offset.y / radius.y;
    nx * nx + ny * ny <= 1.0
}

pub(super) fn ellipse_visible(rect: Rect, center: Pos2, radius: Vec2) -> bool {
    rect.intersects(Rect::from_center_size(center, radius * 2.0))
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn root_color_ignores_category() {
        assert_eq!(node_fill(Some("excess"), 0), ROOT_COLOR);
        assert_eq!(node_fill(Some("excess"), 2), Color32::from_rgb(0xD0, 0x02, 0x1B));
        assert_eq!(node_fill(Some("unknown"), 1), DEFAULT_CATEGORY_COLOR);
        assert_eq!(node_fill(None, 1), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn footprint_grows_with_title() {
        assert_eq!(node_half_size("A", 1), vec2(40.0, 25.0));
        assert_eq!(node_half_size("A", 0), vec2(40.0, 35.0));
        assert_eq!(node_half_size("Vitamins in Human Body", 0).x, 22.0 * 4.0 + 20.0);
    }

    #[test]
    fn screen_and_world_transforms_invert() {
        let rect = Rect::from_min_size(pos2(300.0, 40.0), vec2(800.0, 600.0));
        let pan = vec2(-25.0, 60.0);
        let world = vec2(123.0, -45.0);

        let screen = world_to_screen(rect, pan, 2.5, world);
        assert!((screen_to_world(rect, pan, 2.5, screen) - world).length() < 1e-4);
        assert_eq!(world_to_screen(rect, Vec2::ZERO, 1.0, Vec2::ZERO), rect.min);
    }

    #[test]
    fn ellipse_hit_test_uses_both_radii() {
        let center = pos2(0.0, 0.0);
        let radius = vec2(60.0, 25.0);
        assert!(ellipse_contains(center, radius, pos2(55.0, 0.0)));
        assert!(!ellipse_contains(center, radius, pos2(0.0, 30.0)));
        assert!(!ellipse_contains(center, Vec2::ZERO, center));
    }

    #[test]
    fn blend_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);
    }
}
