//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Where the installer reads and writes on disk
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Prebuilt frontend bundle; also receives the generated config module
    pub app_dir: PathBuf,

    /// Holds the install record
    pub data_dir: PathBuf,

    /// Working directory for the backend CLI
    pub project_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(
        app_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app_dir: app_dir.into(),
            data_dir: data_dir.into(),
            project_dir: project_dir.into(),
        }
    }

    /// Lay everything out under one root; handy for tests and containers
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(root.join("dist"), root.clone(), root)
    }

    pub fn app_dir(&self) -> Dir {
        Dir::new(&self.app_dir)
    }

    /// Generated runtime config module
    pub fn config_file(&self) -> File {
        self.app_dir().file("config.js")
    }

    /// Document served for `/` and for client-side routes
    pub fn index_file(&self) -> File {
        self.app_dir().file("index.html")
    }

    /// Admin credentials and project reference from the last install
    pub fn install_record_file(&self) -> File {
        Dir::new(&self.data_dir).file("install.json")
    }

    pub fn project_dir(&self) -> Dir {
        Dir::new(&self.project_dir)
    }

    /// Present once the CLI has initialized the project
    pub fn project_config_file(&self) -> File {
        self.project_dir().subdir("supabase").file("config.toml")
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new("dist", ".", ".")
    }
}
