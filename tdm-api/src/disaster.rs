use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct DisasterId(pub i64);

impl fmt::Display for DisasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    bolero::generator::TypeGenerator,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum DisasterKind {
    Earthquake,
    Typhoon,
    Landslide,
    Fire,
    Flood,
    Accident,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 6] = [
        DisasterKind::Earthquake,
        DisasterKind::Typhoon,
        DisasterKind::Landslide,
        DisasterKind::Fire,
        DisasterKind::Flood,
        DisasterKind::Accident,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Typhoon => "typhoon",
            DisasterKind::Landslide => "landslide",
            DisasterKind::Fire => "fire",
            DisasterKind::Flood => "flood",
            DisasterKind::Accident => "accident",
        }
    }
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisasterKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DisasterKind> {
        let wanted = crate::normalize_variant(s);
        DisasterKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| anyhow!("unknown disaster kind {s:?}"))
    }
}

/// Latitude/longitude pair, stored as a `[lat, lng]` array
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl From<(f64, f64)> for Location {
    fn from((lat, lng): (f64, f64)) -> Location {
        Location { lat, lng }
    }
}

impl From<Location> for (f64, f64) {
    fn from(l: Location) -> (f64, f64) {
        (l.lat, l.lng)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StoryLink {
    pub title: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Disaster {
    pub id: DisasterId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DisasterKind,
    #[serde(rename = "date")]
    pub occurred_on: NaiveDate,
    pub location: Location,
    pub description: String,
    #[serde(rename = "casualties")]
    pub casualty_summary: String,
    #[serde(default)]
    pub stories: Vec<StoryLink>,
}

impl Disaster {
    pub fn year(&self) -> i32 {
        self.occurred_on.year()
    }

    /// The year floored to a multiple of ten
    pub fn decade(&self) -> i32 {
        self.year().div_euclid(10) * 10
    }
}

/// A disaster as submitted by a user, before it gets an id
#[derive(Clone, Debug, PartialEq)]
pub struct NewDisaster {
    pub name: String,
    pub kind: DisasterKind,
    pub occurred_on: NaiveDate,
    pub location: Option<Location>,
    pub description: String,
    pub casualty_summary: String,
    pub stories: Vec<StoryLink>,
}

impl NewDisaster {
    /// Returns `None` if there is no location to place the disaster at
    pub fn with_id(self, id: DisasterId) -> Option<Disaster> {
        Some(Disaster {
            id,
            name: self.name,
            kind: self.kind,
            occurred_on: self.occurred_on,
            location: self.location?,
            description: self.description,
            casualty_summary: self.casualty_summary,
            stories: self.stories,
        })
    }
}
