//! Run settings.
//!
//! Four variables are required and checked together before any network
//! call; the rest point at the published file and default to the
//! production repository.
//!
//! Every reader has two forms:
//! - `from_lookup(f)` — explicit variable source; used in tests
//! - `from_env()` — reads the process environment, delegates to `from_lookup`

use std::fmt;

use crate::error::ConfigError;

pub const POCKETBASE_URL: &str = "POCKETBASE_URL";
pub const ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const GITHUB_PAT: &str = "GITHUB_PAT";

/// Required variables in diagnostic order.
pub const REQUIRED: [&str; 4] = [POCKETBASE_URL, ADMIN_EMAIL, ADMIN_PASSWORD, GITHUB_PAT];

pub const REPO_OWNER: &str = "DEXSYNC_REPO_OWNER";
pub const REPO_NAME: &str = "DEXSYNC_REPO_NAME";
pub const BRANCH: &str = "DEXSYNC_BRANCH";
pub const FILE_PATH: &str = "DEXSYNC_FILE_PATH";
pub const COLLECTION: &str = "DEXSYNC_COLLECTION";

const DEFAULT_OWNER: &str = "helblingjoel";
const DEFAULT_REPO: &str = "pokecompanion";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_FILE_PATH: &str = "src/lib/data/pokemonNames.json";
const DEFAULT_COLLECTION: &str = "pokemon_names";

/// The hosted file being kept in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Repository-relative path, no leading slash.
    pub path: String,
}

impl Default for RepoTarget {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            path: DEFAULT_FILE_PATH.to_string(),
        }
    }
}

impl RepoTarget {
    /// Unauthenticated raw URL of the file on its branch.
    pub fn raw_url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            self.owner, self.repo, self.branch, self.path
        )
    }
}

impl fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}:{}", self.owner, self.repo, self.branch, self.path)
    }
}

/// Everything a run needs to reach its collaborators.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub pocketbase_url: String,
    pub admin_email: String,
    pub admin_password: String,
    pub github_token: String,
    /// Database collection holding one row per species.
    pub collection: String,
    pub target: RepoTarget,
}

impl Settings {
    /// Build settings from an arbitrary variable source.
    ///
    /// Blank values count as missing. Every missing required variable is
    /// reported in a single [`ConfigError::Missing`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .into_iter()
            .filter(|k| get(*k).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { names: missing });
        }

        let required = |key: &str| get(key).unwrap_or_default();
        let defaults = RepoTarget::default();
        Ok(Self {
            pocketbase_url: required(POCKETBASE_URL).trim_end_matches('/').to_string(),
            admin_email: required(ADMIN_EMAIL),
            admin_password: required(ADMIN_PASSWORD),
            github_token: required(GITHUB_PAT),
            collection: get(COLLECTION).unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            target: RepoTarget {
                owner: get(REPO_OWNER).unwrap_or(defaults.owner),
                repo: get(REPO_NAME).unwrap_or(defaults.repo),
                branch: get(BRANCH).unwrap_or(defaults.branch),
                path: get(FILE_PATH)
                    .map(|p| p.trim_start_matches('/').to_string())
                    .unwrap_or(defaults.path),
            },
        })
    }

    /// `from_lookup` over the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("pocketbase_url", &self.pocketbase_url)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"<redacted>")
            .field("github_token", &"<redacted>")
            .field("collection", &self.collection)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (POCKETBASE_URL, "https://pb.example.com/"),
            (ADMIN_EMAIL, "admin@example.com"),
            (ADMIN_PASSWORD, "hunter2"),
            (GITHUB_PAT, "ghp_secret"),
        ]
    }

    #[test]
    fn defaults_point_at_production_file() {
        let settings = Settings::from_lookup(vars(&complete())).expect("settings");
        assert_eq!(settings.pocketbase_url, "https://pb.example.com");
        assert_eq!(settings.collection, "pokemon_names");
        assert_eq!(
            settings.target.raw_url(),
            "https://raw.githubusercontent.com/helblingjoel/pokecompanion/main/src/lib/data/pokemonNames.json"
        );
    }

    #[test]
    fn overrides_apply() {
        let mut pairs = complete();
        pairs.push((REPO_OWNER, "someone"));
        pairs.push((BRANCH, "data"));
        pairs.push((FILE_PATH, "/names.json"));
        let settings = Settings::from_lookup(vars(&pairs)).expect("settings");
        assert_eq!(settings.target.to_string(), "someone/pokecompanion@data:names.json");
    }

    #[test]
    fn every_missing_variable_is_reported() {
        let err = Settings::from_lookup(vars(&[(ADMIN_EMAIL, "a@b.c")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                names: vec![POCKETBASE_URL, ADMIN_PASSWORD, GITHUB_PAT]
            }
        );
        assert!(err.to_string().contains("GITHUB_PAT"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != GITHUB_PAT);
        pairs.push((GITHUB_PAT, "   "));
        let err = Settings::from_lookup(vars(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing { names: vec![GITHUB_PAT] });
    }

    #[test]
    fn debug_redacts_secrets() {
        let settings = Settings::from_lookup(vars(&complete())).expect("settings");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("ghp_secret"));
    }
}
