//! UI theme preference.
//!
//! Purely cosmetic; the client only stores and reports the value. Rendering
//! is up to whatever frontend consumes it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use aether_common::ConfigError;

/// Built-in themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Benz,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[Theme::Dark, Theme::Light, Theme::Benz];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Benz => "benz",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "benz" => Ok(Theme::Benz),
            other => Err(ConfigError::ParseError(format!("unknown theme: {other}"))),
        }
    }
}
