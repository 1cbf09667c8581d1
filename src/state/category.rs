//! Resource categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NarrativeError;

/// One of the fixed resource kinds every project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Characters,
    Locations,
    Props,
    Clothing,
}

impl Category {
    /// All categories, in catalog display order.
    pub const ALL: [Category; 4] = [
        Category::Characters,
        Category::Locations,
        Category::Props,
        Category::Clothing,
    ];

    /// Directory name inside a project.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Characters => "characters",
            Category::Locations => "locations",
            Category::Props => "props",
            Category::Clothing => "clothing",
        }
    }

    /// Title used in remix headers, e.g. `Characters`.
    pub fn title(self) -> &'static str {
        match self {
            Category::Characters => "Characters",
            Category::Locations => "Locations",
            Category::Props => "Props",
            Category::Clothing => "Clothing",
        }
    }

    /// Singular noun for messages, e.g. `character`.
    pub fn singular(self) -> &'static str {
        match self {
            Category::Characters => "character",
            Category::Locations => "location",
            Category::Props => "prop",
            // "clothing" is a mass noun
            Category::Clothing => "clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = NarrativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.dir_name() == wanted || c.singular() == wanted)
            .ok_or_else(|| NarrativeError::UnknownCategory(s.to_string()))
    }
}
