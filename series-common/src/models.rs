use std::{fmt, str::FromStr};

use uuid::Uuid;

macro_rules! id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id!(SeriesId);
id!(ReviewId);
id!(
    /// Identifies the external author of a review, always supplied by the client
    AuthorId
);

impl SeriesId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl ReviewId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A TV series in the catalog.
///
/// `end_year` is `0` while the series is still running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    id: SeriesId,
    title: String,
    description: String,
    episodes: i32,
    begin_year: i32,
    end_year: i32,
    creator: String,
}

impl Series {
    pub fn new(
        id: SeriesId,
        title: impl Into<String>,
        description: impl Into<String>,
        episodes: i32,
        begin_year: i32,
        end_year: i32,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            episodes,
            begin_year,
            end_year,
            creator: creator.into(),
        }
    }

    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn episodes(&self) -> i32 {
        self.episodes
    }

    pub fn begin_year(&self) -> i32 {
        self.begin_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    series_id: SeriesId,
    author_id: AuthorId,
    text: String,
}

impl Review {
    pub fn new(
        id: ReviewId,
        series_id: SeriesId,
        author_id: AuthorId,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            series_id,
            author_id,
            text: text.into(),
        }
    }

    pub fn id(&self) -> ReviewId {
        self.id
    }

    pub fn series_id(&self) -> SeriesId {
        self.series_id
    }

    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
