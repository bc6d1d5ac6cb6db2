//! Two-handle slider partitioning 100% into train/validation/test bands.

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Response, Sense, Stroke, vec2};

use crate::dataset::PartitionRatio;

use super::style;

const TRACK_HEIGHT: f32 = 18.0;
const HANDLE_WIDTH: f32 = 6.0;

/// Draw the selector and apply any drag to `ratio`. Returns the track
/// response so callers can detect interaction.
pub(super) fn ratio_selector(ui: &mut egui::Ui, ratio: &mut PartitionRatio) -> Response {
    let palette = style::palette();
    let width = ui.available_width().clamp(240.0, 420.0);
    let (rect, response) =
        ui.allocate_exact_size(vec2(width, TRACK_HEIGHT + 18.0), Sense::click_and_drag());
    let track = Rect::from_min_size(rect.min, vec2(rect.width(), TRACK_HEIGHT));

    // Remember which handle a drag grabbed so it cannot switch mid-drag.
    let grab_key = response.id.with("grab_lower");
    if response.drag_started() || response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let value = value_at(track, pos.x);
            let lower = nearest_is_lower(ratio, value);
            ui.data_mut(|data| data.insert_temp(grab_key, lower));
            apply_drag(ratio, value, lower);
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let lower = ui
                .data(|data| data.get_temp::<bool>(grab_key))
                .unwrap_or(true);
            apply_drag(ratio, value_at(track, pos.x), lower);
        }
    }
    if response.drag_stopped() {
        ui.data_mut(|data| data.remove_temp::<bool>(grab_key));
    }

    let painter = ui.painter_at(rect);
    let x1 = x_for(track, ratio.cut1());
    let x2 = x_for(track, ratio.cut2());
    let bands = [
        (track.left(), x1, palette.accent_teal),
        (x1, x2, palette.accent_ice),
        (x2, track.right(), palette.accent_amber),
    ];
    for (left, right, color) in bands {
        if right > left {
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(left, track.top()), Pos2::new(right, track.bottom())),
                0.0,
                color,
            );
        }
    }
    painter.rect_stroke(
        track,
        0.0,
        style::section_stroke(),
        egui::StrokeKind::Inside,
    );
    for x in [x1, x2] {
        let handle = Rect::from_center_size(
            Pos2::new(x, track.center().y),
            vec2(HANDLE_WIDTH, TRACK_HEIGHT + 6.0),
        );
        painter.rect_filled(handle, 0.0, palette.text_primary);
        painter.rect_stroke(
            handle,
            0.0,
            Stroke::new(1.0, palette.bg_primary),
            egui::StrokeKind::Inside,
        );
    }

    let labels = [
        (
            (track.left() + x1) / 2.0,
            format!("{}%", ratio.train_percent()),
        ),
        ((x1 + x2) / 2.0, format!("{}%", ratio.val_percent())),
        (
            (x2 + track.right()) / 2.0,
            format!("{}%", ratio.test_percent()),
        ),
    ];
    for (x, text) in labels {
        painter.text(
            Pos2::new(x, track.bottom() + 4.0),
            Align2::CENTER_TOP,
            text,
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }
    response
}

fn apply_drag(ratio: &mut PartitionRatio, value: u8, lower: bool) {
    if lower {
        ratio.set_cut1(value);
    } else {
        ratio.set_cut2(value);
    }
}

fn x_for(track: Rect, cut: u8) -> f32 {
    track.left() + track.width() * (cut as f32 / 100.0)
}

/// Map a pointer x to the 0..=100 cut domain.
fn value_at(track: Rect, x: f32) -> u8 {
    let fraction = ((x - track.left()) / track.width()).clamp(0.0, 1.0);
    (fraction * 100.0).round() as u8
}

/// Pick the handle closest to `value`; on a tie the side the pointer sits
/// on wins, so coincident handles can still be pulled apart.
fn nearest_is_lower(ratio: &PartitionRatio, value: u8) -> bool {
    let d1 = ratio.cut1().abs_diff(value);
    let d2 = ratio.cut2().abs_diff(value);
    if d1 != d2 {
        return d1 < d2;
    }
    value <= ratio.cut1()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 0.0), vec2(200.0, TRACK_HEIGHT))
    }

    #[test]
    fn value_at_maps_and_clamps_the_pointer() {
        let track = track();
        assert_eq!(value_at(track, 100.0), 0);
        assert_eq!(value_at(track, 300.0), 100);
        assert_eq!(value_at(track, 200.0), 50);
        assert_eq!(value_at(track, 0.0), 0);
        assert_eq!(value_at(track, 999.0), 100);
    }

    #[test]
    fn nearest_handle_wins_the_grab() {
        let ratio = PartitionRatio::default();
        assert!(nearest_is_lower(&ratio, 10));
        assert!(nearest_is_lower(&ratio, 71));
        assert!(!nearest_is_lower(&ratio, 89));
        assert!(!nearest_is_lower(&ratio, 100));
    }

    #[test]
    fn coincident_handles_split_by_pointer_side() {
        let ratio = PartitionRatio::new(50, 50);
        assert!(nearest_is_lower(&ratio, 40));
        assert!(nearest_is_lower(&ratio, 50));
        assert!(!nearest_is_lower(&ratio, 60));
    }
}
