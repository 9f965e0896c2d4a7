//! Runtime settings for a Trellis application.

use std::time::Duration;

/// Environment variable selecting the theme variant (`dark` or `light`).
pub const ENV_THEME: &str = "TRELLIS_THEME";
/// Environment variable overriding the UI scale factor.
pub const ENV_SCALE: &str = "TRELLIS_SCALE";
/// Environment variable toggling animations (`0`, `1`, `false`, `true`).
pub const ENV_ANIMATIONS: &str = "TRELLIS_ANIMATIONS";

/// Built-in theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Settings shared by every canvas of an application.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: ThemeVariant,
    /// Multiplier applied to theme sizes.
    pub scale: f32,
    /// Whether widgets may start decorative animations.
    pub show_animations: bool,
    /// How long an unused renderer stays cached before it can be dropped.
    pub cache_expiry: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: ThemeVariant::Dark,
            scale: 1.0,
            show_animations: true,
            cache_expiry: Duration::from_secs(60),
        }
    }
}

impl Settings {
    /// Read overrides from the process environment.
    ///
    /// Values that fail to parse keep their default and are reported with a
    /// warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(ENV_THEME) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "dark" => settings.theme = ThemeVariant::Dark,
                "light" => settings.theme = ThemeVariant::Light,
                other => tracing::warn!("{}: unknown theme variant {:?}, using dark", ENV_THEME, other),
            }
        }

        if let Some(raw) = lookup(ENV_SCALE) {
            match raw.trim().parse::<f32>() {
                Ok(scale) if scale.is_finite() => settings.scale = scale.clamp(0.5, 4.0),
                _ => tracing::warn!("{}: invalid scale {:?}, using 1.0", ENV_SCALE, raw),
            }
        }

        if let Some(raw) = lookup(ENV_ANIMATIONS) {
            match raw.trim() {
                "1" | "true" => settings.show_animations = true,
                "0" | "false" => settings.show_animations = false,
                other => tracing::warn!("{}: invalid flag {:?}", ENV_ANIMATIONS, other),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_without_overrides() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_THEME, "Light"),
            (ENV_SCALE, "2"),
            (ENV_ANIMATIONS, "0"),
        ]));
        assert_eq!(settings.theme, ThemeVariant::Light);
        assert_eq!(settings.scale, 2.0);
        assert!(!settings.show_animations);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[(ENV_THEME, "purple"), (ENV_SCALE, "huge"), (ENV_SCALE, "")]));
        assert_eq!(settings.theme, ThemeVariant::Dark);
        assert_eq!(settings.scale, 1.0);
    }

    #[test]
    fn test_scale_is_clamped() {
        let settings = Settings::from_lookup(lookup(&[(ENV_SCALE, "100")]));
        assert_eq!(settings.scale, 4.0);
    }
}
