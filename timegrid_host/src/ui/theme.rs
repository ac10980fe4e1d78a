use eframe::egui::Color32;

pub struct Theme {
    // Base Backgrounds
    pub bg_dark: Color32,
    pub bg_measure: Color32,
    pub bg_header: Color32,

    // Grid lines
    pub row_line: Color32,
    pub bar_line: Color32,
    pub beat_line: Color32,
    pub subbeat_line: Color32,

    // Cells & selection
    pub cell_bg: Color32,
    pub cell_border: Color32,
    pub selected_border: Color32,
    pub band_fill: Color32,
    pub band_border: Color32,

    // Markers
    pub playhead: Color32,
    pub range_head: Color32,

    // Text
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

pub const THEME: Theme = Theme {
    bg_dark: Color32::from_rgb(18, 20, 19),
    bg_measure: Color32::from_rgb(26, 28, 27),
    bg_header: Color32::from_rgb(36, 40, 41),

    row_line: Color32::from_rgb(10, 10, 10),
    bar_line: Color32::from_rgb(42, 42, 42),
    beat_line: Color32::from_rgb(42, 42, 42),
    subbeat_line: Color32::from_rgb(30, 30, 30),

    cell_bg: Color32::from_rgb(16, 92, 28),
    cell_border: Color32::from_rgb(0, 0, 0),
    selected_border: Color32::YELLOW,
    band_fill: Color32::from_rgba_premultiplied(60, 60, 60, 80),
    band_border: Color32::WHITE,

    playhead: Color32::from_rgba_premultiplied(128, 128, 128, 128),
    range_head: Color32::from_rgba_premultiplied(128, 128, 128, 80),

    text_primary: Color32::from_rgb(240, 240, 240),
    text_secondary: Color32::from_rgb(119, 121, 120),
};
