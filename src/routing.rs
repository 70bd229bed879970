//! Project-name → card-table-list routing.
//!
//! Basecamp card tables are per-project, so routing a task to a project
//! also needs the id of the list to create the card on. The table below
//! carries the known mappings; a TOML file can override or extend it
//! without a rebuild.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Known project display names (lowercased) and their card-table list ids.
const DEFAULT_LIST_ROUTES: &[(&str, u64)] = &[
    ("case study : deck + website", 9120546407),
    ("blogs: website", 9110129241),
    ("new website", 9029767677),
    ("truva", 9001050258),
    ("project attonomous", 8699666732),
    ("amp template", 8662227827),
    ("apparel - group", 8587548781),
    ("jockey & speedo - moengage", 8545140731),
    ("levi's - clevertap", 8418705199),
    ("akasa airlines", 7891669952),
    ("content for attributics", 7577004160),
    ("attributics", 6935986330),
    ("learning track & certifications", 6859333025),
    ("unicef", 7161225064),
];

#[derive(Debug, thiserror::Error)]
pub enum RoutesError {
    #[error("failed to read routes file: {0}")]
    Read(String),
    #[error("failed to parse routes file: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ListRoutesFile {
    #[serde(default)]
    lists: HashMap<String, u64>,
}

/// Lookup from lowercased project display name to list id.
#[derive(Debug, Clone)]
pub struct ListRoutes {
    routes: HashMap<String, u64>,
}

impl ListRoutes {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self {
            routes: DEFAULT_LIST_ROUTES
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
        }
    }

    /// The compiled-in table merged with a `[lists]` TOML file. File entries
    /// win on conflict; keys are lowercased on load.
    pub fn with_overrides(path: &Path) -> Result<Self, RoutesError> {
        let content =
            std::fs::read_to_string(path).map_err(|err| RoutesError::Read(err.to_string()))?;
        let file: ListRoutesFile =
            toml::from_str(&content).map_err(|err| RoutesError::Parse(err.to_string()))?;

        let mut table = Self::builtin();
        for (name, list_id) in file.lists {
            table.routes.insert(name.to_lowercase(), list_id);
        }
        Ok(table)
    }

    /// List id for a project display name, matched case-insensitively.
    pub fn list_for(&self, project_name: &str) -> Option<u64> {
        self.routes.get(&project_name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
