//! Configuration cache building
//!
//! A build moves through `Clearing → Merging → Writing → Validating` and ends
//! either `Committed` or `RolledBack`. Only a failed validation rolls back:
//! merge failures happen before anything is written.

use crate::domain::{ConfigMap, Layout};
use crate::host::{Filesystem, Host, HostError, CLEAR_COMMAND};
use crate::merge::{fresh_configuration, MergeError};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod artifact;

pub use artifact::{load_cached, ArtifactError};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to clear the previous configuration cache")]
    Clear(#[source] HostError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Failed to write configuration cache {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Your configuration files are not serializable.")]
    NotSerializable {
        #[source]
        source: ArtifactError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clearing,
    Merging,
    Writing,
    Validating,
    Committed,
    RolledBack,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clearing => "clearing",
            Stage::Merging => "merging",
            Stage::Writing => "writing",
            Stage::Validating => "validating",
            Stage::Committed => "committed",
            Stage::RolledBack => "rolled-back",
        };
        f.write_str(name)
    }
}

/// Summary of a committed cache build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheReport {
    pub path: PathBuf,
    pub units: usize,
    pub bytes: usize,
}

pub struct CacheBuilder<'a> {
    host: &'a dyn Host,
    layout: &'a Layout,
}

impl<'a> CacheBuilder<'a> {
    pub fn new(host: &'a dyn Host, layout: &'a Layout) -> Self {
        Self { host, layout }
    }

    pub fn build(&self) -> Result<CacheReport, CacheError> {
        let fs = self.host.filesystem();
        let path = &self.layout.cache_file;

        enter(Stage::Clearing);
        self.host.call(CLEAR_COMMAND).map_err(CacheError::Clear)?;

        enter(Stage::Merging);
        let config = fresh_configuration(self.host, self.layout)?;

        enter(Stage::Writing);
        let text = artifact::encode(&config)
            .map_err(|source| CacheError::NotSerializable { source })?;
        fs.write_atomic(path, &text)
            .map_err(|source| CacheError::Write { path: path.clone(), source })?;

        enter(Stage::Validating);
        if let Err(source) = validate(fs, path, &config) {
            enter(Stage::RolledBack);
            tracing::warn!("Cached configuration failed validation: {}", source);
            if let Err(err) = fs.remove(path) {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", path.display(), err);
                }
            }
            return Err(CacheError::NotSerializable { source });
        }

        enter(Stage::Committed);
        tracing::info!("Cached {} configuration units in {}", config.len(), path.display());
        Ok(CacheReport { path: path.clone(), units: config.len(), bytes: text.len() })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "config cache stage");
}

fn validate(fs: &dyn Filesystem, path: &Path, written: &ConfigMap) -> Result<(), ArtifactError> {
    let reloaded = load_cached(fs, path)?;
    artifact::verify(written, &reloaded)
}

/// Remove the cached artifact. Returns whether a file was removed.
pub fn clear_cache(fs: &dyn Filesystem, path: &Path) -> io::Result<bool> {
    if !fs.exists(path) {
        return Ok(false);
    }
    match fs.remove(path) {
        Ok(()) => {
            tracing::debug!("Removed cached configuration {}", path.display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::host::{LocalFs, LocalHost};
    use serde_yaml::Value;
    use std::cell::RefCell;
    use std::error::Error as _;
    use std::fs;
    use tempfile::TempDir;

    fn app(tmp: &TempDir) -> LocalHost {
        let base = tmp.path();
        fs::create_dir_all(base.join("bootstrap")).unwrap();
        fs::write(base.join("bootstrap/app.toml"), "name = 'demo'\n").unwrap();
        fs::create_dir_all(base.join("config")).unwrap();
        fs::create_dir_all(base.join("vendor/framework/config")).unwrap();
        LocalHost::new(base, &Settings::default())
    }

    #[test]
    fn test_build_writes_loadable_artifact() {
        let tmp = TempDir::new().unwrap();
        let host = app(&tmp);
        let base = tmp.path();
        fs::write(base.join("config/app.toml"), "debug = true\nlog = '${storage_path}/app.log'\n")
            .unwrap();
        fs::write(base.join("vendor/framework/config/app.toml"), "debug = false\n").unwrap();
        fs::write(base.join("vendor/framework/config/view.toml"), "compiled = 'views'\n").unwrap();

        let report = CacheBuilder::new(&host, host.layout()).build().unwrap();
        assert_eq!(report.units, 2);
        assert_eq!(report.path, base.join("bootstrap/cache/config.json"));

        let cached = load_cached(&LocalFs::new(), &report.path).unwrap();
        let app = cached.get("app").unwrap();
        assert_eq!(app["debug"], Value::Bool(true));
        let expected_log = format!("{}/app.log", base.join("storage").display());
        assert_eq!(app["log"], Value::from(expected_log));
        assert_eq!(cached.get("view").unwrap()["compiled"], Value::from("views"));
    }

    #[test]
    fn test_build_overwrites_previous_artifact() {
        let tmp = TempDir::new().unwrap();
        let host = app(&tmp);
        let cache = host.layout().cache_file.clone();
        fs::create_dir_all(cache.parent().unwrap()).unwrap();
        fs::write(&cache, "stale").unwrap();
        fs::write(tmp.path().join("config/app.toml"), "debug = true\n").unwrap();

        CacheBuilder::new(&host, host.layout()).build().unwrap();
        let cached = load_cached(&LocalFs::new(), &cache).unwrap();
        assert_eq!(cached.len(), 1);
    }

    #[test]
    fn test_merge_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let host = app(&tmp);
        fs::write(tmp.path().join("config/app.toml"), "debug = [").unwrap();

        let err = CacheBuilder::new(&host, host.layout()).build().unwrap_err();
        assert!(matches!(err, CacheError::Merge(MergeError::Load(_))));
        assert!(!host.layout().cache_file.exists());
    }

    #[test]
    fn test_merge_failure_still_clears_previous_artifact() {
        let tmp = TempDir::new().unwrap();
        let host = app(&tmp);
        let cache = host.layout().cache_file.clone();
        fs::create_dir_all(cache.parent().unwrap()).unwrap();
        fs::write(&cache, "{}").unwrap();
        fs::write(tmp.path().join("config/app.toml"), "debug = [").unwrap();

        assert!(CacheBuilder::new(&host, host.layout()).build().is_err());
        assert!(!cache.exists());
    }

    #[test]
    fn test_missing_bootstrap_descriptor_fails() {
        let tmp = TempDir::new().unwrap();
        let host = LocalHost::new(tmp.path(), &Settings::default());

        let err = CacheBuilder::new(&host, host.layout()).build().unwrap_err();
        assert!(matches!(err, CacheError::Merge(MergeError::Bootstrap(_))));
    }

    #[test]
    fn test_unserializable_value_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let host = app(&tmp);
        fs::write(tmp.path().join("config/metrics.toml"), "threshold = nan\n").unwrap();

        let err = CacheBuilder::new(&host, host.layout()).build().unwrap_err();
        assert!(matches!(err, CacheError::NotSerializable { .. }));
        assert_eq!(err.to_string(), "Your configuration files are not serializable.");
        assert!(err.source().is_some());
        assert!(!host.layout().cache_file.exists());
    }

    /// Host whose filesystem corrupts every write.
    struct CorruptingHost {
        inner: LocalHost,
        fs: CorruptingFs,
    }

    struct CorruptingFs {
        removed: RefCell<Vec<PathBuf>>,
    }

    impl Filesystem for CorruptingFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            LocalFs::new().read_to_string(path)
        }

        fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()> {
            let truncated = &contents[..contents.len() / 2];
            LocalFs::new().write_atomic(path, truncated)
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            self.removed.borrow_mut().push(path.to_path_buf());
            LocalFs::new().remove(path)
        }

        fn exists(&self, path: &Path) -> bool {
            path.exists()
        }
    }

    impl Host for CorruptingHost {
        fn base_path(&self, relative: &str) -> PathBuf {
            self.inner.base_path(relative)
        }

        fn storage_path(&self) -> PathBuf {
            self.inner.storage_path()
        }

        fn filesystem(&self) -> &dyn Filesystem {
            &self.fs
        }

        fn call(&self, command: &str) -> Result<(), HostError> {
            self.inner.call(command)
        }
    }

    #[test]
    fn test_corrupt_artifact_is_deleted() {
        let tmp = TempDir::new().unwrap();
        let inner = app(&tmp);
        fs::write(tmp.path().join("config/app.toml"), "name = 'demo'\ndebug = true\n").unwrap();
        let layout = inner.layout().clone();
        let host = CorruptingHost { inner, fs: CorruptingFs { removed: RefCell::new(Vec::new()) } };

        let err = CacheBuilder::new(&host, &layout).build().unwrap_err();
        match err {
            CacheError::NotSerializable { source } => {
                assert!(matches!(source, ArtifactError::Decode { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!layout.cache_file.exists());
        assert_eq!(host.fs.removed.borrow().as_slice(), &[layout.cache_file.clone()]);
    }

    #[test]
    fn test_clear_cache_reports_removal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let fs_ = LocalFs::new();

        assert!(!clear_cache(&fs_, &path).unwrap());
        fs::write(&path, "{}").unwrap();
        assert!(clear_cache(&fs_, &path).unwrap());
        assert!(!path.exists());
    }
}
