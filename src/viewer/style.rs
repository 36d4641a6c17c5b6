use eframe::egui::{
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
    Color32, Stroke, Visuals,
};

#[derive(Clone, Copy)]
pub struct Palette {
    pub sea: Color32,
    pub panel: Color32,
    pub widget: Color32,
    pub outline: Color32,
    pub graticule_major: Color32,
    pub graticule_minor: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
}

pub fn palette() -> Palette {
    Palette {
        sea: Color32::from_rgb(14, 22, 30),
        panel: Color32::from_rgb(26, 28, 30),
        widget: Color32::from_rgb(42, 44, 48),
        outline: Color32::from_rgb(38, 42, 48),
        graticule_major: Color32::from_rgb(44, 58, 70),
        graticule_minor: Color32::from_rgb(26, 36, 46),
        text_primary: Color32::from_rgb(185, 192, 200),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent: Color32::from_rgb(167, 217, 255),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.sea;
    visuals.panel_fill = palette.panel;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent;
    visuals.extreme_bg_color = palette.sea;
    visuals.selection.bg_fill = palette.widget;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_fill = palette.panel;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        set_rectilinear(widget, palette);
    }
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.widget;
    vis.weak_bg_fill = palette.graticule_minor;
    vis.bg_stroke = Stroke::new(1.0, palette.outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}
