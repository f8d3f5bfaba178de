use log::error;

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Base radius of a heat spot relative to the shorter canvas side.
    pub base_radius: f64,
    /// Render at device resolution instead of CSS pixels.
    pub scale_by_device_pixel_ratio: bool,
    pub show_secondary: bool,
}

impl Settings {
    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => {
                let Some(window) = web_sys::window() else {
                    error!("failed to access window to determine preferred color scheme");
                    return Theme::Light;
                };
                match window.match_media("(prefers-color-scheme: dark)") {
                    Ok(Some(media_query_list)) => {
                        if media_query_list.matches() {
                            Theme::Dark
                        } else {
                            Theme::Light
                        }
                    }
                    Ok(None) => {
                        error!("failed to determine preferred color scheme");
                        Theme::Light
                    }
                    Err(_) => {
                        error!("failed to match media to determine preferred color scheme");
                        Theme::Light
                    }
                }
            }
            Theme::Light | Theme::Dark => self.theme,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            base_radius: 0.10,
            scale_by_device_pixel_ratio: false,
            show_secondary: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    System,
    Light,
    Dark,
}
