//! Closed sets of provider resource and delivery types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownKind {
    kind: &'static str,
    value: String,
}

/// Coarse content kind; selects the provider endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Raw,
    Image,
    Video,
}

impl ResourceType {
    /// Probe order after the extracted guess.
    pub const ALL: [ResourceType; 3] = [ResourceType::Raw, ResourceType::Image, ResourceType::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Raw => "raw",
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind {
                kind: "resource type",
                value: s.to_string(),
            })
    }
}

/// Access-control class: `upload` is public, the others need signed access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Upload,
    Authenticated,
    Private,
}

impl DeliveryType {
    /// Probe order after the extracted guess.
    pub const ALL: [DeliveryType; 3] = [
        DeliveryType::Upload,
        DeliveryType::Authenticated,
        DeliveryType::Private,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryType::Upload => "upload",
            DeliveryType::Authenticated => "authenticated",
            DeliveryType::Private => "private",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind {
                kind: "delivery type",
                value: s.to_string(),
            })
    }
}
