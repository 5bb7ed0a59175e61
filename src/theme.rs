use eframe::egui::{self, Color32};

// Buttons
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(30, 185, 84); // Spotify-ish green for the download action
pub const SECONDARY_BUTTON_BG: Color32 = Color32::from_rgb(230, 230, 232);
pub const BUTTON_MAIN_TEXT: Color32 = Color32::from_rgb(255, 255, 255);
pub const BUTTON_SECONDARY_TEXT: Color32 = Color32::from_rgb(36, 36, 36);

// Text
pub const SECONDARY_TEXT: Color32 = Color32::from_rgb(110, 110, 115);
pub const TEXT_ERROR: Color32 = Color32::from_rgb(200, 30, 30);
pub const TEXT_SUCCESS: Color32 = Color32::from_rgb(20, 140, 60);

// Panels
pub const STATUS_BG: Color32 = Color32::from_rgb(248, 248, 248);
pub const INPUT_BG: Color32 = Color32::from_rgb(250, 250, 250);
pub const BORDER_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 67, 15);

// Sizing & Spacing
pub const ROUNDING_FRAME: f32 = 4.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: egui::Vec2 = egui::Vec2::new(200.0, 44.0);
pub const COMBO_WIDTH: f32 = 160.0;

pub const HEADING_FONT_SIZE: f32 = 20.0;
pub const BUTTON_FONT_SIZE: f32 = 16.0;
