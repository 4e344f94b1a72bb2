//! Theme state machine
//!
//! The active theme is one of five fixed palettes. It is read from the
//! preference store at start-up, changes only through [`ThemeState::set_theme`],
//! and is written back on every change. Each theme maps to a total table of
//! seven colour tokens that presentation paints with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Preference key holding the last chosen theme
pub const THEME_KEY: &str = "mythic-chronicles-theme";

/// Error persisting a preference
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to write preferences: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No preference directory available")]
    NoLocation,
}

/// Durable key-value storage for user preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown theme '{0}'. Expected one of: light, dark, forest, galaxy, vintage")]
pub struct ParseThemeError(pub String);

/// A named visual palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Forest,
    Galaxy,
    Vintage,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Light,
        Theme::Dark,
        Theme::Forest,
        Theme::Galaxy,
        Theme::Vintage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Forest => "forest",
            Theme::Galaxy => "galaxy",
            Theme::Vintage => "vintage",
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(*self)
    }

    /// Exact lowercase name lookup, without the trimming and case folding
    /// of [`FromStr`]
    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|theme| theme.as_str() == name)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "forest" => Ok(Theme::Forest),
            "galaxy" => Ok(Theme::Galaxy),
            "vintage" => Ok(Theme::Vintage),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// Semantic colour slots of a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    BgPrimary,
    BgSecondary,
    BgAccent,
    TextPrimary,
    TextSecondary,
    Border,
    Accent,
}

impl ColorToken {
    pub const ALL: [ColorToken; 7] = [
        ColorToken::BgPrimary,
        ColorToken::BgSecondary,
        ColorToken::BgAccent,
        ColorToken::TextPrimary,
        ColorToken::TextSecondary,
        ColorToken::Border,
        ColorToken::Accent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorToken::BgPrimary => "bg-primary",
            ColorToken::BgSecondary => "bg-secondary",
            ColorToken::BgAccent => "bg-accent",
            ColorToken::TextPrimary => "text-primary",
            ColorToken::TextSecondary => "text-secondary",
            ColorToken::Border => "border",
            ColorToken::Accent => "accent",
        }
    }
}

/// An opaque 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colour values for every [`ColorToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_primary: Rgb,
    pub bg_secondary: Rgb,
    pub bg_accent: Rgb,
    pub text_primary: Rgb,
    pub text_secondary: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::table([
                0xFFFFFF, 0xF8FAFC, 0xEEF2FF, 0x1E293B, 0x475569, 0xE2E8F0, 0x6366F1,
            ]),
            Theme::Dark => Self::table([
                0x0F172A, 0x1E293B, 0x312E81, 0xF1F5F9, 0xCBD5E1, 0x334155, 0x8B5CF6,
            ]),
            Theme::Forest => Self::table([
                0x0F2F1F, 0x1A4D2E, 0x2D5A3D, 0xE8F5E8, 0xB8D4B8, 0x3A6B47, 0x10B981,
            ]),
            Theme::Galaxy => Self::table([
                0x0C0A1A, 0x1A1625, 0x2D1B69, 0xE0E7FF, 0xC7D2FE, 0x4338CA, 0xA855F7,
            ]),
            Theme::Vintage => Self::table([
                0x2A1F14, 0x3E2723, 0x5D4037, 0xF5E6D3, 0xD7CCC8, 0x8D6E63, 0xFF8A65,
            ]),
        }
    }

    // Same order as ColorToken::ALL
    const fn table(values: [u32; 7]) -> Self {
        Self {
            bg_primary: Rgb::hex(values[0]),
            bg_secondary: Rgb::hex(values[1]),
            bg_accent: Rgb::hex(values[2]),
            text_primary: Rgb::hex(values[3]),
            text_secondary: Rgb::hex(values[4]),
            border: Rgb::hex(values[5]),
            accent: Rgb::hex(values[6]),
        }
    }

    pub fn get(&self, token: ColorToken) -> Rgb {
        match token {
            ColorToken::BgPrimary => self.bg_primary,
            ColorToken::BgSecondary => self.bg_secondary,
            ColorToken::BgAccent => self.bg_accent,
            ColorToken::TextPrimary => self.text_primary,
            ColorToken::TextSecondary => self.text_secondary,
            ColorToken::Border => self.border,
            ColorToken::Accent => self.accent,
        }
    }

    /// All seven tokens with their colours, in token order
    pub fn entries(&self) -> Vec<(ColorToken, Rgb)> {
        ColorToken::ALL.iter().map(|t| (*t, self.get(*t))).collect()
    }

    /// Renders the palette as `--theme-*` CSS custom properties
    pub fn css_variables(&self) -> String {
        self.entries()
            .into_iter()
            .map(|(token, color)| format!("--theme-{}: {};", token.name(), color))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The current theme plus its derived palette
pub struct ThemeState<S: PreferenceStore> {
    current: Theme,
    palette: Palette,
    store: S,
}

impl<S: PreferenceStore> ThemeState<S> {
    /// Restores the persisted theme if it is one of `available`, else `Dark`
    ///
    /// The saved value must be an exact theme name. Restoring does not
    /// re-save the resolved theme: nothing is written until the first
    /// transition, so a saved choice the site stops enabling survives a
    /// fallback run.
    pub fn init(store: S, available: &[Theme]) -> Self {
        let saved = store.get(THEME_KEY).and_then(|raw| Theme::from_name(&raw));
        let current = match saved {
            Some(theme) if available.contains(&theme) => theme,
            _ => Theme::Dark,
        };
        debug!(theme = %current, ?saved, "Initial theme");

        Self {
            current,
            palette: Palette::for_theme(current),
            store,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Switches to `theme` and persists it
    ///
    /// Any theme is accepted, including ones the deployment does not list.
    /// A failed write only loses durability; the switch still happens.
    pub fn set_theme(&mut self, theme: Theme) {
        self.current = theme;
        self.palette = Palette::for_theme(theme);
        debug!(theme = %theme, "Theme changed");
        self.persist();
    }

    /// Moves to the theme after the current one in `available`
    ///
    /// When the current theme is not listed the first available theme is
    /// chosen. An empty list leaves the state untouched.
    pub fn cycle(&mut self, available: &[Theme]) {
        if available.is_empty() {
            return;
        }
        let next = match available.iter().position(|t| *t == self.current) {
            Some(idx) => available[(idx + 1) % available.len()],
            None => available[0],
        };
        self.set_theme(next);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set(THEME_KEY, self.current.as_str()) {
            warn!("Theme preference not saved: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore {
        values: HashMap<String, String>,
        fail_writes: bool,
        writes: usize,
    }

    impl PreferenceStore for MapStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(PreferenceError::NoLocation);
            }
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn store_with(theme: &str) -> MapStore {
        let mut store = MapStore::default();
        store.values.insert(THEME_KEY.to_string(), theme.to_string());
        store
    }

    #[test]
    fn first_run_defaults_to_dark() {
        let state = ThemeState::init(MapStore::default(), &Theme::ALL);
        assert_eq!(state.current(), Theme::Dark);
        assert_eq!(*state.palette(), Palette::for_theme(Theme::Dark));
    }

    #[test]
    fn restores_persisted_theme_when_available() {
        let state = ThemeState::init(store_with("forest"), &[Theme::Dark, Theme::Forest]);
        assert_eq!(state.current(), Theme::Forest);
    }

    #[test]
    fn falls_back_when_persisted_theme_not_available() {
        let state = ThemeState::init(store_with("forest"), &[Theme::Dark, Theme::Light]);
        assert_eq!(state.current(), Theme::Dark);
    }

    #[test]
    fn falls_back_on_garbage_preference() {
        let state = ThemeState::init(store_with("neon"), &Theme::ALL);
        assert_eq!(state.current(), Theme::Dark);
    }

    #[test]
    fn restore_requires_exact_name() {
        for saved in [" forest ", "Forest", "FOREST"] {
            let state = ThemeState::init(store_with(saved), &Theme::ALL);
            assert_eq!(state.current(), Theme::Dark, "saved {:?}", saved);
        }
        assert_eq!(Theme::from_name("galaxy"), Some(Theme::Galaxy));
        assert_eq!(Theme::from_name(" galaxy"), None);
    }

    #[test]
    fn set_theme_is_total_and_persisted() {
        let mut state = ThemeState::init(MapStore::default(), &[Theme::Dark]);

        for theme in Theme::ALL {
            state.set_theme(theme);
            assert_eq!(state.current(), theme);
            assert_eq!(*state.palette(), Palette::for_theme(theme));
            assert_eq!(state.store().get(THEME_KEY).as_deref(), Some(theme.as_str()));
        }
    }

    #[test]
    fn set_theme_accepts_unlisted_theme() {
        let mut state = ThemeState::init(MapStore::default(), &[Theme::Dark]);
        state.set_theme(Theme::Vintage);
        assert_eq!(state.current(), Theme::Vintage);
    }

    #[test]
    fn failed_write_does_not_block_transition() {
        let store = MapStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut state = ThemeState::init(store, &Theme::ALL);

        state.set_theme(Theme::Galaxy);
        assert_eq!(state.current(), Theme::Galaxy);
        assert_eq!(state.palette().accent, Rgb::hex(0xA855F7));
        assert!(state.store().get(THEME_KEY).is_none());
    }

    #[test]
    fn every_transition_writes() {
        let mut state = ThemeState::init(store_with("forest"), &[Theme::Dark]);
        assert_eq!(state.store().writes, 0);
        assert_eq!(state.store().get(THEME_KEY).as_deref(), Some("forest"));

        state.set_theme(Theme::Light);
        state.set_theme(Theme::Light);
        assert_eq!(state.store().writes, 2);
    }

    #[test]
    fn boxed_store_works_as_store() {
        let boxed: Box<dyn PreferenceStore> = Box::new(MapStore::default());
        let mut state = ThemeState::init(boxed, &Theme::ALL);
        state.set_theme(Theme::Forest);
        assert_eq!(state.store().get(THEME_KEY).as_deref(), Some("forest"));
    }

    #[test]
    fn cycle_walks_available_list() {
        let available = [Theme::Dark, Theme::Forest, Theme::Vintage];
        let mut state = ThemeState::init(MapStore::default(), &available);

        state.cycle(&available);
        assert_eq!(state.current(), Theme::Forest);
        state.cycle(&available);
        assert_eq!(state.current(), Theme::Vintage);
        state.cycle(&available);
        assert_eq!(state.current(), Theme::Dark);
    }

    #[test]
    fn cycle_from_unlisted_theme_picks_first() {
        let available = [Theme::Forest, Theme::Galaxy];
        let mut state = ThemeState::init(MapStore::default(), &available);
        assert_eq!(state.current(), Theme::Dark);

        state.cycle(&available);
        assert_eq!(state.current(), Theme::Forest);

        state.cycle(&[]);
        assert_eq!(state.current(), Theme::Forest);
    }

    #[test]
    fn theme_parsing() {
        assert_eq!("Forest".parse::<Theme>(), Ok(Theme::Forest));
        assert_eq!(" galaxy ".parse::<Theme>(), Ok(Theme::Galaxy));
        assert!("neon".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn palette_tables_match_theme() {
        let light = Palette::for_theme(Theme::Light);
        assert_eq!(light.bg_primary.to_string(), "#FFFFFF");
        assert_eq!(light.accent.to_string(), "#6366F1");

        let vintage = Theme::Vintage.palette();
        assert_eq!(vintage.get(ColorToken::Border).to_string(), "#8D6E63");
        assert_eq!(vintage.get(ColorToken::TextPrimary).to_string(), "#F5E6D3");
    }

    #[test]
    fn palette_is_total_and_distinct() {
        let palettes: Vec<_> = Theme::ALL.iter().map(|t| t.palette()).collect();
        for (i, a) in palettes.iter().enumerate() {
            assert_eq!(a.entries().len(), 7);
            for b in &palettes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn css_variables_cover_all_tokens() {
        let css = Theme::Dark.palette().css_variables();
        assert_eq!(css.lines().count(), 7);
        assert!(css.contains("--theme-bg-primary: #0F172A;"));
        assert!(css.contains("--theme-accent: #8B5CF6;"));
    }
}
