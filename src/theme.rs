//! Brand configuration passed explicitly into every render call.
//!
//! One immutable record replaces the pile of per-style module constants a
//! design system tends to accumulate: canvas size, palette, brand strings
//! and font locations all live here so styles stay independently testable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{ThumbsmithError, ThumbsmithResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandTheme {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,

    /// Canvas background.
    pub background: Rgba,
    /// Primary accent (rings, pills, highlights).
    pub accent: Rgba,
    /// Secondary accent used by gradient styles.
    pub accent_alt: Rgba,
    /// Title text color.
    pub text: Rgba,
    /// Muted/secondary text color.
    pub text_muted: Rgba,

    /// Brand name rendered in the footer.
    pub brand_name: String,
    /// Brand URL rendered next to the name.
    pub brand_url: String,

    /// Directory searched for the two font files.
    pub fonts_dir: PathBuf,
    /// Display/bold face file name (titles, watermarks).
    pub font_display: String,
    /// Body/regular face file name (tags, footer).
    pub font_body: String,
}

impl Default for BrandTheme {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            background: Rgba::rgb(10, 10, 10),
            accent: Rgba::rgb(229, 255, 0),
            accent_alt: Rgba::rgb(13, 148, 136),
            text: Rgba::WHITE,
            text_muted: Rgba::rgba(255, 255, 255, 150),
            brand_name: "THUMBSMITH".to_owned(),
            brand_url: "thumbsmith.dev".to_owned(),
            fonts_dir: PathBuf::from("fonts"),
            font_display: "SpaceGrotesk-Bold.ttf".to_owned(),
            font_body: "Inter-Regular.ttf".to_owned(),
        }
    }
}

impl BrandTheme {
    /// Load a theme from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> ThumbsmithResult<Self> {
        let bytes = std::fs::read(path)?;
        let theme: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ThumbsmithError::validation(format!("theme '{}': {e}", path.display())))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> ThumbsmithResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ThumbsmithError::validation(
                "theme width/height must be > 0",
            ));
        }
        Ok(())
    }

    pub fn display_font_path(&self) -> PathBuf {
        self.fonts_dir.join(&self.font_display)
    }

    pub fn body_font_path(&self) -> PathBuf {
        self.fonts_dir.join(&self.font_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_valid_and_1200x630() {
        let t = BrandTheme::default();
        t.validate().unwrap();
        assert_eq!((t.width, t.height), (1200, 630));
    }

    #[test]
    fn partial_json_takes_defaults() {
        let t: BrandTheme =
            serde_json::from_str(r##"{ "accent": "#FF0055", "brand_name": "ACME" }"##).unwrap();
        assert_eq!(t.accent, Rgba::rgb(255, 0, 85));
        assert_eq!(t.brand_name, "ACME");
        assert_eq!(t.width, 1200);
    }

    #[test]
    fn serialized_theme_loads_back_unchanged() {
        let theme = BrandTheme::default();
        let json = serde_json::to_string(&theme).unwrap();
        let back: BrandTheme = serde_json::from_str(&json).unwrap();
        assert_eq!(back.accent, theme.accent);
        assert_eq!(back.text_muted, theme.text_muted);
        assert_eq!(back.brand_name, theme.brand_name);
        assert_eq!((back.width, back.height), (theme.width, theme.height));
    }

    #[test]
    fn zero_dimensions_rejected() {
        let t = BrandTheme {
            width: 0,
            ..BrandTheme::default()
        };
        assert!(t.validate().is_err());
    }
}
