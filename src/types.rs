//! Type definitions for the show-browser application.
//!
//! This module contains the records fetched from the TVmaze API. They are
//! deserialized straight from the JSON responses and never modified afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a show. Unique and stable across the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an episode. Only guaranteed unique within its show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub u64);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image references in the sizes TVmaze provides.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Image {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

/// Aggregate rating of a show.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
}

/// A TV series.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Show {
    /// Unique identifier for the show.
    pub id: ShowId,

    /// Display name of the show.
    pub name: String,

    /// HTML summary, if the API has one.
    #[serde(default)]
    pub summary: Option<String>,

    /// Genre tags, e.g. "Drama" or "Comedy".
    #[serde(default)]
    pub genres: Vec<String>,

    /// Running status, e.g. "Ended" or "Running".
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: Rating,

    /// Typical episode runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,

    #[serde(default)]
    pub image: Option<Image>,
}

impl Show {
    /// Medium-sized image reference, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.medium.as_deref())
    }
}

/// A single installment of a show.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Episode {
    pub id: EpisodeId,

    pub name: String,

    /// Season number, starting at 1.
    pub season: u32,

    /// Episode number within its season. Specials carry no number and decode as 0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u32,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub runtime: Option<u32>,

    #[serde(default)]
    pub image: Option<Image>,
}

impl Episode {
    /// Season/episode code, zero-padded to two digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use show_browser::types::{Episode, EpisodeId};
    ///
    /// let ep = Episode {
    ///     id: EpisodeId(1),
    ///     name: "Pilot".to_string(),
    ///     season: 2,
    ///     number: 5,
    ///     summary: None,
    ///     runtime: None,
    ///     image: None,
    /// };
    /// assert_eq!(ep.code(), "S02E05");
    /// ```
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }

    /// Title used for cards and selector options.
    ///
    /// # Examples
    ///
    /// ```
    /// use show_browser::types::{Episode, EpisodeId};
    ///
    /// let ep = Episode {
    ///     id: EpisodeId(7),
    ///     name: "Winter Is Coming".to_string(),
    ///     season: 1,
    ///     number: 1,
    ///     summary: None,
    ///     runtime: Some(62),
    ///     image: None,
    /// };
    /// assert_eq!(ep.label(), "Winter Is Coming - S01E01");
    /// ```
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.code())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.medium.as_deref())
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
