use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::entities::movie;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::P480, Resolution::P720, Resolution::P1080];

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::P480 => "480p",
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
        }
    }

    pub fn column(self) -> movie::Column {
        match self {
            Resolution::P480 => movie::Column::File480p,
            Resolution::P720 => movie::Column::File720p,
            Resolution::P1080 => movie::Column::File1080p,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown resolution {s:?}, expected 480p, 720p or 1080p"))
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewMovie {
    pub title: String,
    pub poster_url: Option<String>,
    pub file_480p: Option<String>,
    pub file_720p: Option<String>,
    pub file_1080p: Option<String>,
}

impl NewMovie {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }
}

/// Changes to an existing catalog entry; `None` leaves the field as is.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieEdit {
    pub title: Option<String>,
    pub poster_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Profile data seen on an incoming update. `None` means the field was not
/// observed, so the stored value is kept.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserProfile {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieListEntry {
    pub position: u64,
    pub title: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct MoviePage {
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_movies: u64,
    pub entries: Vec<MovieListEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LastUpload {
    pub title: String,
    pub uploaded_at: Option<i64>,
    pub ago: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatalogStatus {
    pub total_movies: u64,
    pub last_upload: Option<LastUpload>,
}

pub fn describe_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        format!("{seconds} seconds ago")
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else {
        format!("{days} days ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_parses_case_insensitively() {
        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::P720);
        assert_eq!("1080P".parse::<Resolution>().unwrap(), Resolution::P1080);
        assert!("4k".parse::<Resolution>().is_err());
    }

    #[test]
    fn resolution_maps_to_its_own_column() {
        use sea_orm::IdenStatic;

        assert_eq!(Resolution::P480.column().as_str(), "file_480p");
        assert_eq!(Resolution::P720.column().as_str(), "file_720p");
        assert_eq!(Resolution::P1080.to_string(), "1080p");
    }

    #[test]
    fn elapsed_picks_largest_whole_unit() {
        assert_eq!(describe_elapsed(5), "5 seconds ago");
        assert_eq!(describe_elapsed(59), "59 seconds ago");
        assert_eq!(describe_elapsed(60), "1 minutes ago");
        assert_eq!(describe_elapsed(3 * 3600 + 59), "3 hours ago");
        assert_eq!(describe_elapsed(49 * 3600), "2 days ago");
        assert_eq!(describe_elapsed(-10), "0 seconds ago");
    }
}
