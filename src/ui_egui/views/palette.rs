use egui::{Color32, Visuals};

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// `#RRGGBB` or `#RGB` to a color.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Readable text on top of `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::from_rgb(25, 25, 25)
    } else {
        Color32::WHITE
    }
}

#[derive(Clone, Copy)]
pub(crate) struct GridPalette {
    pub background: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub row_bg: Color32,
    pub row_alt_bg: Color32,
    pub today_bg: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub selection: Color32,
    pub selected_outline: Color32,
    pub conflict: Color32,
    pub now_line: Color32,
    pub fallback_bar: Color32,
}

impl GridPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.extreme_bg_color;
        let panel = visuals.panel_fill;
        let accent = visuals.selection.bg_fill;
        let text = visuals.text_color();

        Self {
            background: panel,
            header_bg: blend(panel, text, 0.06),
            header_text: text,
            row_bg: base,
            row_alt_bg: blend(base, text, 0.03),
            today_bg: blend(base, accent, 0.12),
            hour_line: with_alpha(text, if visuals.dark_mode { 70 } else { 60 }),
            slot_line: with_alpha(text, 18),
            selection: with_alpha(accent, 110),
            selected_outline: visuals.selection.stroke.color,
            conflict: Color32::from_rgb(220, 50, 47),
            now_line: Color32::from_rgb(230, 80, 60),
            fallback_bar: accent,
        }
    }
}
