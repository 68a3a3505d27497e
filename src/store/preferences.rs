use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::base::keys::{LANGUAGE, THEME};
use super::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // i18next may store region variants such as "en-US"
        let primary = s.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => Err(format!("unknown language '{}', expected en or ru", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI preferences kept next to the tokens.
#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn Storage>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn theme(&self) -> Theme {
        self.read(THEME).await
    }

    pub async fn language(&self) -> Language {
        self.read(LANGUAGE).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), String> {
        self.storage.set_item(THEME, theme.as_str()).await
    }

    pub async fn set_language(&self, language: Language) -> Result<(), String> {
        self.storage.set_item(LANGUAGE, language.as_str()).await
    }

    async fn read<T: FromStr<Err = String> + Default>(&self, key: &str) -> T {
        match self.storage.get_item(key).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!(key, "Ignoring stored preference: {}", e);
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key, "Failed to read preference: {}", e);
                T::default()
            }
        }
    }
}
