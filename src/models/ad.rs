use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key of the site setting that gates every public ad slot.
pub const ADSENSE_SETTING_KEY: &str = "adsense";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    #[default]
    Auto,
    Horizontal,
    Vertical,
    Rectangle,
}

impl AdFormat {
    pub const ALL: [AdFormat; 4] = [
        AdFormat::Auto,
        AdFormat::Horizontal,
        AdFormat::Vertical,
        AdFormat::Rectangle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Auto => "auto",
            AdFormat::Horizontal => "horizontal",
            AdFormat::Vertical => "vertical",
            AdFormat::Rectangle => "rectangle",
        }
    }

    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for AdFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Invalid ad format: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    #[default]
    Active,
    Paused,
    Archived,
}

impl AdStatus {
    pub const ALL: [AdStatus; 3] = [AdStatus::Active, AdStatus::Paused, AdStatus::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Active => "active",
            AdStatus::Paused => "paused",
            AdStatus::Archived => "archived",
        }
    }

    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for AdStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid ad status: {s}"))
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdPlacement {
    pub id: String,
    pub name: String,
    pub location: String,
    pub ad_client: String,
    pub ad_slot: String,
    pub format: AdFormat,
    pub status: AdStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAdPlacement {
    pub name: String,
    pub location: String,
    pub ad_client: String,
    pub ad_slot: String,
    pub format: AdFormat,
    pub status: AdStatus,
}

impl From<&AdPlacement> for NewAdPlacement {
    fn from(placement: &AdPlacement) -> Self {
        Self {
            name: placement.name.clone(),
            location: placement.location.clone(),
            ad_client: placement.ad_client.clone(),
            ad_slot: placement.ad_slot.clone(),
            format: placement.format,
            status: placement.status,
        }
    }
}
