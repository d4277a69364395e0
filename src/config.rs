// Copyright 2023 Remi Bernotavicius

use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// How the ingredient name search compares text.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SearchCase {
    /// Plain substring containment.
    #[default]
    Sensitive,
    /// Substring containment after lower-casing both sides. SQLite only folds ASCII.
    Insensitive,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub search_case: SearchCase,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
}

impl Config {
    pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
    pub const DEFAULT_CONNECT_DELAY_MS: u64 = 2000;
    pub const DEFAULT_CONNECT_DELAY: Duration =
        Duration::from_millis(Self::DEFAULT_CONNECT_DELAY_MS);

    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            search_case: SearchCase::default(),
            connect_attempts: Self::DEFAULT_CONNECT_ATTEMPTS,
            connect_delay: Self::DEFAULT_CONNECT_DELAY,
        }
    }

    /// Uses the database under [`data_path`].
    pub fn with_default_path() -> Result<Self> {
        Ok(Self::new(data_path()?.join("data.sqlite")))
    }
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/pantry/`
pub fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| Error::Config("failed to get user home directory".into()))?;
    let path = dirs.data_dir().join("pantry");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}
