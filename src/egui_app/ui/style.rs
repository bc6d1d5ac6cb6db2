use eframe::egui::{
    Color32, Stroke, Ui, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_strong: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_teal: Color32,
    pub accent_ice: Color32,
    pub accent_amber: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(10, 11, 13),
        bg_secondary: Color32::from_rgb(24, 27, 31),
        bg_tertiary: Color32::from_rgb(40, 44, 50),
        panel_outline: Color32::from_rgb(38, 43, 50),
        grid_strong: Color32::from_rgb(56, 61, 68),
        grid_soft: Color32::from_rgb(29, 32, 37),
        text_primary: Color32::from_rgb(188, 195, 204),
        text_muted: Color32::from_rgb(138, 146, 156),
        accent_teal: Color32::from_rgb(98, 214, 196),
        accent_ice: Color32::from_rgb(167, 217, 255),
        accent_amber: Color32::from_rgb(214, 176, 112),
        warning: Color32::from_rgb(200, 128, 96),
        success: Color32::from_rgb(102, 176, 136),
    }
}

/// Tone of the footer status badge and of inline notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

pub fn status_badge(tone: StatusTone) -> (String, Color32) {
    let label = match tone {
        StatusTone::Idle => "Idle",
        StatusTone::Busy => "Busy",
        StatusTone::Info => "Info",
        StatusTone::Warning => "Warning",
        StatusTone::Error => "Error",
    };
    (label.to_string(), status_badge_color(tone))
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::from_rgb(42, 42, 42),
        StatusTone::Busy => Color32::from_rgb(31, 139, 255),
        StatusTone::Info => Color32::from_rgb(64, 140, 112),
        StatusTone::Warning => Color32::from_rgb(192, 138, 43),
        StatusTone::Error => Color32::from_rgb(192, 57, 43),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    set_rectilinear(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn section_stroke() -> Stroke {
    let palette = palette();
    Stroke::new(1.0, palette.panel_outline)
}

pub fn inner_border() -> Stroke {
    let palette = palette();
    Stroke::new(1.0, palette.grid_soft)
}

/// Frame used for bordered list/table compartments.
pub fn section_frame() -> eframe::egui::Frame {
    eframe::egui::Frame::new()
        .fill(compartment_fill())
        .stroke(section_stroke())
        .inner_margin(eframe::egui::Margin::symmetric(8, 6))
}

pub fn paint_section_border(ui: &Ui, rect: eframe::egui::Rect) {
    ui.painter().rect_stroke(
        rect,
        CornerRadius::ZERO,
        section_stroke(),
        eframe::egui::StrokeKind::Inside,
    );
}

pub fn row_hover_fill() -> Color32 {
    let palette = palette();
    Color32::from_rgb(
        (palette.bg_tertiary.r() as u16 + 6) as u8,
        (palette.bg_tertiary.g() as u16 + 6) as u8,
        (palette.bg_tertiary.b() as u16 + 6) as u8,
    )
}

pub fn row_selected_fill() -> Color32 {
    let palette = palette();
    Color32::from_rgb(
        (palette.bg_tertiary.r() as u16 + 18) as u8,
        (palette.bg_tertiary.g() as u16 + 14) as u8,
        (palette.bg_tertiary.b() as u16 + 10) as u8,
    )
}

pub fn compartment_fill() -> Color32 {
    let palette = palette();
    palette.bg_secondary
}

/// Text color for destructive actions and their confirmations.
pub fn destructive_text() -> Color32 {
    Color32::from_rgb(222, 110, 104)
}

/// Color of a bar in the class distribution chart.
pub fn chart_bar_color(highlight: bool) -> Color32 {
    let palette = palette();
    if highlight {
        palette.accent_teal
    } else {
        palette.grid_strong
    }
}
