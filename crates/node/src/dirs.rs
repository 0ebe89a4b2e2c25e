//! Directory management for the vigil client.

use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use eyre::{Result, eyre};

use crate::{
    args::DataDirArgs,
    constants::{CONFIG_FILE_NAME, JOURNAL_FILE_NAME},
};

/// Returns the default project directories for vigil.
pub fn default_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("live", "koii", "vigil")
}

/// Returns the default data directory path.
pub fn default_data_dir() -> Option<PathBuf> {
    default_project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Resolved data directory.
#[derive(Debug, Clone)]
pub struct DataDirs {
    pub root: PathBuf,
}

impl DataDirs {
    /// Resolve the data directory from `args`, creating it if needed.
    pub fn new(args: &DataDirArgs) -> Result<Self> {
        let root = args
            .datadir
            .clone()
            .unwrap_or_else(|| default_data_dir().unwrap_or_else(|| PathBuf::from(".vigil")));

        fs::create_dir_all(&root)
            .map_err(|e| eyre!("Failed to create directory {}: {}", root.display(), e))?;

        Ok(Self { root })
    }

    /// Returns the path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Returns the path to the vote journal database.
    pub fn journal_file(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explicit_datadir_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("vigil");

        let dirs = DataDirs::new(&DataDirArgs {
            datadir: Some(root.clone()),
        })
        .unwrap();

        assert!(root.is_dir());
        assert_eq!(dirs.config_file(), root.join("config.toml"));
        assert_eq!(dirs.journal_file(), root.join("journal.redb"));
    }
}
