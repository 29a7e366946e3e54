use anyhow::{Context, Result};
use ratatui::style::Color;

use crate::storage::LocalStorage;

pub const DARK_MODE_KEY: &str = "seekjob-dark";

/// Reads the saved preference, falling back to the terminal's own scheme.
pub fn load_dark_mode(storage: &LocalStorage) -> Result<bool> {
    let Some(raw) = storage.get_item(DARK_MODE_KEY)? else {
        let dark = system_prefers_dark();
        log::debug!("No saved theme, terminal prefers dark: {}", dark);
        return Ok(dark);
    };
    match serde_json::from_str::<bool>(&raw) {
        Ok(dark) => Ok(dark),
        Err(e) => {
            log::warn!("Ignoring unreadable {} value {:?}: {}", DARK_MODE_KEY, raw, e);
            Ok(system_prefers_dark())
        }
    }
}

pub fn save_dark_mode(storage: &LocalStorage, dark: bool) -> Result<()> {
    let raw = serde_json::to_string(&dark).context("Failed to encode theme")?;
    storage.set_item(DARK_MODE_KEY, &raw)
}

pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| colorfgbg_is_dark(&v))
        .unwrap_or(false)
}

/// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); ANSI backgrounds 0-6 and 8 are dark.
fn colorfgbg_is_dark(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(bg <= 6 || bg == 8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub salary: Color,
    pub featured: Color,
    pub error: Color,
    pub success: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                bg: Color::Rgb(0x0d, 0x11, 0x17),
                surface: Color::Rgb(0x16, 0x1b, 0x27),
                border: Color::Rgb(0x2d, 0x37, 0x48),
                text: Color::White,
                muted: Color::Rgb(0x9c, 0xa3, 0xaf),
                accent: Color::Rgb(0x60, 0xa5, 0xfa),
                salary: Color::Rgb(0x60, 0xa5, 0xfa),
                featured: Color::Rgb(0xfb, 0xbf, 0x24),
                error: Color::Rgb(0xf8, 0x71, 0x71),
                success: Color::Rgb(0x34, 0xd3, 0x99),
            }
        } else {
            Self {
                bg: Color::White,
                surface: Color::Rgb(0xf9, 0xfa, 0xfb),
                border: Color::Rgb(0xe5, 0xe7, 0xeb),
                text: Color::Rgb(0x1a, 0x1a, 0x2e),
                muted: Color::Rgb(0x6b, 0x72, 0x80),
                accent: Color::Rgb(0x2a, 0x68, 0xff),
                salary: Color::Rgb(0x25, 0x63, 0xeb),
                featured: Color::Rgb(0xd9, 0x77, 0x06),
                error: Color::Rgb(0xdc, 0x26, 0x26),
                success: Color::Rgb(0x05, 0x96, 0x69),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_preference_round_trips_as_json() {
        let storage = LocalStorage::open_in_memory().unwrap();
        save_dark_mode(&storage, true).unwrap();
        assert_eq!(
            storage.get_item(DARK_MODE_KEY).unwrap().as_deref(),
            Some("true")
        );
        assert!(load_dark_mode(&storage).unwrap());

        save_dark_mode(&storage, false).unwrap();
        assert!(!load_dark_mode(&storage).unwrap());
    }

    #[test]
    fn test_missing_or_corrupt_value_falls_back_to_terminal() {
        let storage = LocalStorage::open_in_memory().unwrap();
        assert_eq!(load_dark_mode(&storage).unwrap(), system_prefers_dark());

        storage.set_item(DARK_MODE_KEY, "maybe").unwrap();
        assert_eq!(load_dark_mode(&storage).unwrap(), system_prefers_dark());
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(colorfgbg_is_dark("15;0"), Some(true));
        assert_eq!(colorfgbg_is_dark("0;15"), Some(false));
        assert_eq!(colorfgbg_is_dark("15;default;8"), Some(true));
        assert_eq!(colorfgbg_is_dark("0;7"), Some(false));
        assert_eq!(colorfgbg_is_dark("garbage"), None);
        assert_eq!(colorfgbg_is_dark(""), None);
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::for_mode(true), Palette::for_mode(false));
    }
}
