use eframe::egui::{self, Color32};
use serde::{Deserialize, Serialize};

/// Storage key for the persisted theme.
pub const THEME_KEY: &str = "theme";
pub const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
pub const DANGER: Color32 = Color32::from_rgb(220, 50, 50);
pub const SUCCESS: Color32 = Color32::from_rgb(0, 150, 80);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value::<Theme>(s, THEME_KEY))
            .unwrap_or_default()
    }

    pub fn store(self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, THEME_KEY, &self);
    }

    pub fn apply(self, ctx: &egui::Context) {
        let visuals = match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        };
        ctx.set_visuals(visuals);
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark",
            Theme::Dark => "☀ Light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_plain_names() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"light\"").unwrap(),
            Theme::Light
        );
    }

    #[test]
    fn toggling_twice_is_identity() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn missing_storage_means_light() {
        assert_eq!(Theme::load(None), Theme::Light);
    }
}
