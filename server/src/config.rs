use std::path::PathBuf;

use anyhow::Result;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Dataset file; the bundled dataset is used when unset.
    pub dataset_path: Option<PathBuf>,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let dataset_path = std::env::var("ROSTER_DATASET")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        Ok(Self {
            dataset_path,
            cors_allowed_origins,
        })
    }

    /// A dataset given on the command line takes precedence over the
    /// environment.
    pub fn with_dataset(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.dataset_path = path;
        }
        self
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
