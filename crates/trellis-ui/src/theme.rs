//! Theme values consumed by layouts and renderers.
//!
//! Core code only talks to the narrow [`ThemeProvider`] accessor. Lookups by
//! unknown name never fail: they log a warning and return a documented
//! fallback (transparent color, zero size, empty resource). The fallible
//! `try_*` variants on [`Theme`] are available when the caller wants to know.
//!
//! # Example
//!
//! ```
//! use trellis_core::Color;
//! use trellis_ui::theme::{names, Theme, ThemeProvider};
//!
//! let theme = Theme::dark().with_color(names::COLOR_PRIMARY, Color::from_hex(0x3C78C8));
//! assert_eq!(theme.color(names::COLOR_PRIMARY), Color::from_hex(0x3C78C8));
//! assert_eq!(theme.color("no-such-color"), Color::TRANSPARENT);
//! ```

use std::fmt;

use trellis_core::alloc::HashMap;
use trellis_core::config::{Settings, ThemeVariant};
use trellis_core::Color;

use crate::resource::Resource;

/// Well-known theme keys.
pub mod names {
    pub const COLOR_BACKGROUND: &str = "background";
    pub const COLOR_FOREGROUND: &str = "foreground";
    pub const COLOR_PRIMARY: &str = "primary";
    pub const COLOR_BUTTON: &str = "button";
    pub const COLOR_DISABLED: &str = "disabled";
    pub const COLOR_DISABLED_BUTTON: &str = "disabledButton";
    pub const COLOR_FOCUS: &str = "focus";
    pub const COLOR_HOVER: &str = "hover";
    pub const COLOR_PRESSED: &str = "pressed";
    pub const COLOR_SHADOW: &str = "shadow";
    pub const COLOR_INPUT_BACKGROUND: &str = "inputBackground";
    pub const COLOR_INPUT_BORDER: &str = "inputBorder";

    pub const SIZE_PADDING: &str = "padding";
    pub const SIZE_INNER_PADDING: &str = "innerPadding";
    pub const SIZE_TEXT: &str = "text";
    pub const SIZE_INLINE_ICON: &str = "iconInline";
    pub const SIZE_INPUT_BORDER: &str = "inputBorder";

    pub const ICON_CHECK_BUTTON: &str = "checkButton";
    pub const ICON_CHECK_BUTTON_CHECKED: &str = "checkButtonChecked";
    pub const ICON_CHECK_BUTTON_FILL: &str = "checkButtonFill";
    pub const ICON_COMPUTER: &str = "computer";
}

/// Narrow accessor for theme values.
pub trait ThemeProvider: Send + Sync {
    fn color(&self, name: &str) -> Color;
    fn size(&self, name: &str) -> f32;
    fn icon(&self, name: &str) -> Resource;

    fn padding(&self) -> f32 {
        self.size(names::SIZE_PADDING)
    }

    fn inner_padding(&self) -> f32 {
        self.size(names::SIZE_INNER_PADDING)
    }
}

/// Lookup failures reported by the `try_*` accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    UnknownColor(String),
    UnknownSize(String),
    UnknownIcon(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::UnknownColor(name) => write!(f, "Unknown theme color {:?}", name),
            ThemeError::UnknownSize(name) => write!(f, "Unknown theme size {:?}", name),
            ThemeError::UnknownIcon(name) => write!(f, "Unknown theme icon {:?}", name),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Result type for theme lookups.
pub type ThemeResult<T> = Result<T, ThemeError>;

/// Built-in string-keyed theme.
#[derive(Debug, Clone)]
pub struct Theme {
    variant: ThemeVariant,
    scale: f32,
    colors: HashMap<String, Color>,
    sizes: HashMap<String, f32>,
    icons: HashMap<String, Resource>,
}

impl Theme {
    /// Dark palette.
    pub fn dark() -> Self {
        Self::with_palette(
            ThemeVariant::Dark,
            &[
                (names::COLOR_BACKGROUND, Color::from_rgb_u8(18, 18, 18)),
                (names::COLOR_FOREGROUND, Color::from_rgb_u8(255, 255, 255)),
                (names::COLOR_PRIMARY, Color::from_rgb_u8(60, 120, 200)),
                (names::COLOR_BUTTON, Color::from_rgb_u8(40, 40, 44)),
                (names::COLOR_DISABLED, Color::from_rgb_u8(100, 100, 100)),
                (names::COLOR_DISABLED_BUTTON, Color::from_rgb_u8(38, 38, 38)),
                (names::COLOR_FOCUS, Color::from_rgba_u8(60, 120, 200, 110)),
                (names::COLOR_HOVER, Color::from_rgba_u8(255, 255, 255, 20)),
                (names::COLOR_PRESSED, Color::from_rgba_u8(255, 255, 255, 40)),
                (names::COLOR_SHADOW, Color::from_rgba_u8(0, 0, 0, 100)),
                (names::COLOR_INPUT_BACKGROUND, Color::from_rgb_u8(30, 30, 30)),
                (names::COLOR_INPUT_BORDER, Color::from_rgb_u8(60, 60, 60)),
            ],
        )
    }

    /// Light palette.
    pub fn light() -> Self {
        Self::with_palette(
            ThemeVariant::Light,
            &[
                (names::COLOR_BACKGROUND, Color::from_rgb_u8(250, 250, 250)),
                (names::COLOR_FOREGROUND, Color::from_rgb_u8(0, 0, 0)),
                (names::COLOR_PRIMARY, Color::from_rgb_u8(50, 100, 200)),
                (names::COLOR_BUTTON, Color::from_rgb_u8(235, 235, 235)),
                (names::COLOR_DISABLED, Color::from_rgb_u8(180, 180, 180)),
                (names::COLOR_DISABLED_BUTTON, Color::from_rgb_u8(229, 229, 229)),
                (names::COLOR_FOCUS, Color::from_rgba_u8(50, 100, 200, 90)),
                (names::COLOR_HOVER, Color::from_rgba_u8(0, 0, 0, 15)),
                (names::COLOR_PRESSED, Color::from_rgba_u8(0, 0, 0, 30)),
                (names::COLOR_SHADOW, Color::from_rgba_u8(0, 0, 0, 50)),
                (names::COLOR_INPUT_BACKGROUND, Color::from_rgb_u8(255, 255, 255)),
                (names::COLOR_INPUT_BORDER, Color::from_rgb_u8(200, 200, 200)),
            ],
        )
    }

    /// Theme matching the variant and scale in `settings`.
    pub fn for_settings(settings: &Settings) -> Self {
        let theme = match settings.theme {
            ThemeVariant::Dark => Theme::dark(),
            ThemeVariant::Light => Theme::light(),
        };
        theme.scaled(settings.scale)
    }

    fn with_palette(variant: ThemeVariant, colors: &[(&str, Color)]) -> Self {
        let sizes = [
            (names::SIZE_PADDING, 4.0),
            (names::SIZE_INNER_PADDING, 8.0),
            (names::SIZE_TEXT, 14.0),
            (names::SIZE_INLINE_ICON, 20.0),
            (names::SIZE_INPUT_BORDER, 2.0),
        ];
        let icons = [
            names::ICON_CHECK_BUTTON,
            names::ICON_CHECK_BUTTON_CHECKED,
            names::ICON_CHECK_BUTTON_FILL,
            names::ICON_COMPUTER,
        ];

        Theme {
            variant,
            scale: 1.0,
            colors: colors.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            sizes: sizes.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            icons: icons.iter().map(|k| (k.to_string(), Resource::named(k))).collect(),
        }
    }

    /// Multiply every size by `scale`.
    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn with_color(mut self, name: &str, color: Color) -> Self {
        self.colors.insert(name.to_string(), color);
        self
    }

    pub fn with_size(mut self, name: &str, size: f32) -> Self {
        self.sizes.insert(name.to_string(), size);
        self
    }

    pub fn with_icon(mut self, name: &str, icon: Resource) -> Self {
        self.icons.insert(name.to_string(), icon);
        self
    }

    pub fn try_color(&self, name: &str) -> ThemeResult<Color> {
        self.colors
            .get(name)
            .copied()
            .ok_or_else(|| ThemeError::UnknownColor(name.to_string()))
    }

    pub fn try_size(&self, name: &str) -> ThemeResult<f32> {
        self.sizes
            .get(name)
            .map(|size| size * self.scale)
            .ok_or_else(|| ThemeError::UnknownSize(name.to_string()))
    }

    pub fn try_icon(&self, name: &str) -> ThemeResult<Resource> {
        self.icons
            .get(name)
            .cloned()
            .ok_or_else(|| ThemeError::UnknownIcon(name.to_string()))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ThemeProvider for Theme {
    fn color(&self, name: &str) -> Color {
        self.try_color(name).unwrap_or_else(|err| {
            tracing::warn!("{}, using transparent", err);
            Color::TRANSPARENT
        })
    }

    fn size(&self, name: &str) -> f32 {
        self.try_size(name).unwrap_or_else(|err| {
            tracing::warn!("{}, using 0", err);
            0.0
        })
    }

    fn icon(&self, name: &str) -> Resource {
        self.try_icon(name).unwrap_or_else(|err| {
            tracing::warn!("{}, using empty resource", err);
            Resource::empty()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_fall_back() {
        let theme = Theme::dark();
        assert_eq!(theme.color("missing"), Color::TRANSPARENT);
        assert_eq!(theme.size("missing"), 0.0);
        assert!(theme.icon("missing").is_empty());
        assert_eq!(
            theme.try_color("missing"),
            Err(ThemeError::UnknownColor("missing".into()))
        );
    }

    #[test]
    fn test_scale_applies_to_sizes() {
        let theme = Theme::light().scaled(2.0);
        assert_eq!(theme.padding(), 8.0);
        assert_eq!(theme.variant(), ThemeVariant::Light);
    }

    #[test]
    fn test_overrides() {
        let theme = Theme::dark().with_size(names::SIZE_PADDING, 10.0);
        assert_eq!(theme.padding(), 10.0);
        assert_eq!(theme.icon(names::ICON_COMPUTER).name(), names::ICON_COMPUTER);
    }
}
