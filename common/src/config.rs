use crate::errors::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "/var/cache/aur-build/db";
pub const DEFAULT_LIST_URL: &str = "https://aur.archlinux.org/packages.gz";
pub const DEFAULT_PKG_CACHE: &str = "/var/cache/pacman/pkg";
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".pkg.tar.xz";
pub const BUILD_DIR_PREFIX: &str = "/var/tmp/pamac-build-";

pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<ConfigFile> {
    let mut config = ConfigFile::default();

    if let Some(c) = load_from("/etc/aur-build.conf")? {
        config.update(c);
    }

    if let Ok(path) = config_path() {
        if let Some(c) = load_from(path)? {
            config.update(c);
        }
    }

    if let Some(path) = path {
        let c = load_from(path)?
            .ok_or_else(|| format_err!("Failed to read config file"))?;
        config.update(c);
    }

    Ok(config)
}

fn config_path() -> Result<PathBuf> {
    let config_dir = dirs_next::config_dir()
        .ok_or_else(|| format_err!("Failed to find config dir"))?;
    Ok(config_dir.join("aur-build.conf"))
}

fn load_from<P: AsRef<Path>>(path: P) -> Result<Option<ConfigFile>> {
    if let Ok(buf) = fs::read_to_string(path.as_ref()) {
        debug!("loading config file {:?}", path.as_ref());
        let config = toml::from_str(&buf)
            .context("Failed to load config")?;
        Ok(Some(config))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
}

impl ConfigFile {
    pub fn update(&mut self, c: ConfigFile) {
        self.db.update(c.db);
        self.source.update(c.source);
        self.builder.update(c.builder);
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DbConfig {
    path: Option<PathBuf>,
}

impl DbConfig {
    pub fn update(&mut self, c: DbConfig) {
        if c.path.is_some() {
            self.path = c.path;
        }
    }

    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DB_PATH))
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SourceConfig {
    url: Option<String>,
}

impl SourceConfig {
    pub fn update(&mut self, c: SourceConfig) {
        if c.url.is_some() {
            self.url = c.url;
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_LIST_URL)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BuilderConfig {
    search: Option<Vec<String>>,
    build: Option<Vec<String>>,
    remove: Option<Vec<String>>,
    pkg_cache: Option<PathBuf>,
    artifact_suffix: Option<String>,
    build_dir: Option<PathBuf>,
}

fn command_or(cmd: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match cmd {
        Some(cmd) if !cmd.is_empty() => cmd.clone(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl BuilderConfig {
    pub fn update(&mut self, c: BuilderConfig) {
        if c.search.is_some() {
            self.search = c.search;
        }
        if c.build.is_some() {
            self.build = c.build;
        }
        if c.remove.is_some() {
            self.remove = c.remove;
        }
        if c.pkg_cache.is_some() {
            self.pkg_cache = c.pkg_cache;
        }
        if c.artifact_suffix.is_some() {
            self.artifact_suffix = c.artifact_suffix;
        }
        if c.build_dir.is_some() {
            self.build_dir = c.build_dir;
        }
    }

    pub fn search(&self) -> Vec<String> {
        command_or(&self.search, &["pacman", "-Ss"])
    }

    pub fn build(&self) -> Vec<String> {
        command_or(&self.build, &["pamac", "build", "--no-confirm"])
    }

    pub fn remove(&self) -> Vec<String> {
        command_or(&self.remove, &["pamac", "remove", "--no-confirm"])
    }

    pub fn pkg_cache(&self) -> &Path {
        self.pkg_cache
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PKG_CACHE))
    }

    pub fn artifact_suffix(&self) -> &str {
        self.artifact_suffix
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACT_SUFFIX)
    }

    /// pamac's build directory, which is per user
    pub fn build_dir(&self, user: &str) -> PathBuf {
        self.build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}{}", BUILD_DIR_PREFIX, user)))
    }
}
