//! User preferences, stored as TOML in the platform's preferences directory.

use std::{path::Path, time::Duration};

use crate::renderer::RenderSettings;

const DOCUMENTATION: &str = "\
# Scrawl settings.
#
# fading_timeout_ms:   how long a fading stroke stays on the page, in milliseconds.
# damage_margin_px:    extra pixels repainted around every new stroke.
# viewport_margin_px:  minimum gap between the page and the edge of the view.
# min_viewport_px:     smallest view, per side, that will be drawn into.
# temporary_opacity:   opacity of fading strokes, from 0 to 1.
#
# Delete this file to restore the defaults.

";

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub fading_timeout_ms: u64,
    pub damage_margin_px: u32,
    pub viewport_margin_px: u32,
    pub min_viewport_px: u32,
    pub temporary_opacity: f32,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            fading_timeout_ms: 1500,
            damage_margin_px: 2,
            viewport_margin_px: 8,
            min_viewport_px: 32,
            temporary_opacity: 0.5,
        }
    }
}

pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Load from user preferences. Defaulted, with a warning, if unavailable for any reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
            None => {
                log::warn!("No preferences directory, using default settings.");
                Self::default()
            }
        }
    }
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings: Self = toml::from_str(&string)?;
            Ok(settings.sanitized())
        };
        settings.unwrap_or_else(|err| {
            log::warn!("Settings at {} unavailable, defaulting: {err}", path.display());
            Self::default()
        })
    }
    /// Save to user preferences.
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. Errors (like already existing) surface on file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);
        preferences.push(Self::FILENAME);
        self.save_to(&preferences)
    }
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let mut text = DOCUMENTATION.to_owned();
        text.push_str(&toml::to_string_pretty(self)?);
        std::fs::write(path, text)?;
        Ok(())
    }
    /// Clamp values that would make rendering impossible.
    #[must_use]
    fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.temporary_opacity) {
            log::warn!(
                "temporary_opacity {} out of range, clamping",
                self.temporary_opacity
            );
            self.temporary_opacity = if self.temporary_opacity.is_nan() {
                Self::default().temporary_opacity
            } else {
                self.temporary_opacity.clamp(0.0, 1.0)
            };
        }
        self.min_viewport_px = self.min_viewport_px.max(1);
        self
    }
    #[must_use]
    pub fn fading_timeout(&self) -> Duration {
        Duration::from_millis(self.fading_timeout_ms)
    }
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self) -> RenderSettings {
        RenderSettings {
            damage_margin: self.damage_margin_px,
            viewport_margin: self.viewport_margin_px as f32,
            min_viewport: self.min_viewport_px,
            temporary_opacity: self.temporary_opacity,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Settings;
    use crate::renderer::RenderSettings;

    #[test]
    fn defaults_agree() {
        assert_eq!(Settings::default().render(), RenderSettings::default());
        assert_eq!(Settings::default().fading_timeout().as_millis(), 1500);
    }
    #[test]
    fn missing_fields_default() {
        let settings: Settings = toml::from_str("fading_timeout_ms = 250\n").unwrap();
        assert_eq!(settings.fading_timeout_ms, 250);
        assert_eq!(settings.damage_margin_px, Settings::default().damage_margin_px);
    }
    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("scrawl-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        let settings = Settings {
            fading_timeout_ms: 900,
            temporary_opacity: 0.25,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Scrawl settings."));
        assert_eq!(Settings::load_or_default(&path), settings);

        std::fs::write(&path, "temporary_opacity = 7.0").unwrap();
        assert_eq!(Settings::load_or_default(&path).temporary_opacity, 1.0);
        std::fs::write(&path, "this is not toml").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }
    #[test]
    fn missing_file_defaults() {
        let path = std::env::temp_dir().join("scrawl-settings-that-does-not-exist.toml");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
