//! Color themes for the chat panel.
//!
//! Surfaces go from the window background (`surface[0]`) up to input and
//! hover fills (`surface[2]`). Bubble colors distinguish the two roles.

use eframe::egui::Color32;

#[derive(Clone, Debug, PartialEq)]
pub struct ChatTheme {
    pub name: String,
    pub surface: [Color32; 3],
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border: Color32,
}

impl ChatTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            surface: [
                Color32::from_rgb(19, 19, 26),  // surface_0: App background
                Color32::from_rgb(28, 28, 38),  // surface_1: Header and input panels
                Color32::from_rgb(45, 45, 52),  // surface_2: Text input fill
            ],
            user_bubble: Color32::from_rgb(60, 69, 165),
            assistant_bubble: Color32::from_rgb(37, 37, 50),
            accent: Color32::from_rgb(88, 101, 242),
            error: Color32::from_rgb(240, 71, 71),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(185, 187, 190),
            text_muted: Color32::from_rgb(114, 118, 125),
            border: Color32::from_rgb(47, 49, 54),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            surface: [
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(246, 246, 247),
                Color32::WHITE,
            ],
            user_bubble: Color32::from_rgb(214, 219, 255),
            assistant_bubble: Color32::from_rgb(242, 243, 245),
            accent: Color32::from_rgb(88, 101, 242),
            error: Color32::from_rgb(240, 71, 71),
            text_primary: Color32::from_rgb(6, 6, 7),
            text_secondary: Color32::from_rgb(79, 86, 96),
            text_muted: Color32::from_rgb(116, 127, 141),
            border: Color32::from_rgb(210, 213, 219),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        let dark = ChatTheme::dark();
        let light = ChatTheme::light();
        assert_ne!(dark, light);
        assert_ne!(dark.user_bubble, dark.assistant_bubble);
        assert_ne!(light.user_bubble, light.assistant_bubble);
    }
}
