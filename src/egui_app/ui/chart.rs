//! Bar chart for the per-class image distribution.

use eframe::egui::{self, Align2, FontId, RichText, Sense, StrokeKind, vec2};

use crate::dataset::ClassDistribution;

use super::style;

const BAR_MAX_HEIGHT: f32 = 120.0;
const BAR_WIDTH: f32 = 56.0;
const BAR_GAP: f32 = 10.0;

/// Vertical bars, one per class label. Zero-count classes keep their label
/// and render as an empty slot.
pub(super) fn distribution_chart(ui: &mut egui::Ui, distribution: &ClassDistribution) {
    let palette = style::palette();
    let rows = distribution.chart_rows();
    let max_count = distribution.max_count();

    let width = rows.len() as f32 * (BAR_WIDTH + BAR_GAP);
    let height = BAR_MAX_HEIGHT + 36.0;
    let (rect, _) = ui.allocate_exact_size(vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);

    for (index, row) in rows.iter().enumerate() {
        let left = rect.left() + index as f32 * (BAR_WIDTH + BAR_GAP);
        let baseline = rect.top() + 16.0 + BAR_MAX_HEIGHT;
        let bar_height = (row.count as f32 / max_count as f32) * BAR_MAX_HEIGHT;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, baseline - bar_height),
            egui::pos2(left + BAR_WIDTH, baseline),
        );
        let highlight = row.category.is_some();
        if row.count > 0 {
            painter.rect_filled(bar, 0.0, style::chart_bar_color(highlight));
            painter.rect_stroke(bar, 0.0, style::inner_border(), StrokeKind::Inside);
        }
        painter.text(
            egui::pos2(left + BAR_WIDTH / 2.0, baseline - bar_height - 4.0),
            Align2::CENTER_BOTTOM,
            row.count.to_string(),
            FontId::proportional(12.0),
            palette.text_primary,
        );
        painter.text(
            egui::pos2(left + BAR_WIDTH / 2.0, baseline + 4.0),
            Align2::CENTER_TOP,
            &row.label,
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }
    ui.label(
        RichText::new(format!("{} images in total", distribution.total_images()))
            .color(palette.text_muted),
    );
}
