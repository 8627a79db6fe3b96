// src/manager/projects.rs

//! Project directories: creation, removal, listing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::errors::{Result, VenvmanError};
use crate::fs::FileSystem;
use crate::platform::{self, Platform};
use crate::policy::{self, VENVS_DIR};
use crate::templates;

/// Subdirectories of a project that are not shown as folders.
const HIDDEN_FOLDERS: &[&str] = &[VENVS_DIR, "__pycache__", ".git"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderInfo {
    pub name: String,
    pub path: PathBuf,
}

/// One project as shown in the project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub path: PathBuf,
    pub environments: Vec<EnvironmentInfo>,
    pub folders: Vec<FolderInfo>,
}

#[derive(Debug, Clone)]
pub struct ProjectManager {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    platform: Platform,
    readme: bool,
    gitignore: bool,
    gitignore_extra: Vec<String>,
}

impl ProjectManager {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
            platform: Platform::current(),
            readme: true,
            gitignore: true,
            gitignore_extra: Vec::new(),
        }
    }

    /// Manager honouring the `[project]` section of `cfg`.
    pub fn from_config(cfg: &ConfigFile, root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            readme: cfg.project.readme,
            gitignore: cfg.project.gitignore,
            gitignore_extra: cfg.project.gitignore_extra.clone(),
            ..Self::new(root, fs)
        }
    }

    /// Create the projects root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.fs.is_dir(&self.root) {
            debug!(root = %self.root.display(), "creating projects root");
            self.fs.create_dir_all(&self.root)?;
        }
        Ok(())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        policy::project_path(&self.root, name)
    }

    pub fn exists(&self, name: &str) -> bool {
        policy::validate_name(name) && self.fs.is_dir(&self.path(name))
    }

    /// Project directory, once `name` has passed the name policy; `..` or an
    /// absolute name never reaches the filesystem.
    fn checked_path(&self, name: &str) -> Result<PathBuf> {
        policy::check_name("project", name)?;
        Ok(self.path(name))
    }

    /// Create `name` with its README and `.gitignore`.
    ///
    /// Not transactional: if writing a template fails the directory stays.
    pub fn create(&self, name: &str) -> Result<String> {
        let path = self.checked_path(name)?;
        if self.fs.exists(&path) {
            return Err(VenvmanError::already_exists("project", name));
        }

        self.ensure_root()?;
        self.fs.create_dir_all(&path)?;

        if self.readme {
            self.fs
                .write(&path.join("README.md"), templates::readme(name).as_bytes())?;
        }
        if self.gitignore {
            self.fs.write(
                &path.join(".gitignore"),
                templates::gitignore(&self.gitignore_extra).as_bytes(),
            )?;
        }

        info!(project = name, path = %path.display(), "project created");
        Ok(format!("Project '{name}' created"))
    }

    /// Remove the project and everything in it, environments included.
    pub fn delete(&self, name: &str) -> Result<String> {
        let path = self.checked_path(name)?;
        if !self.fs.exists(&path) {
            return Err(VenvmanError::not_found("project", name));
        }

        self.fs.remove_dir_all(&path)?;
        info!(project = name, "project deleted");
        Ok(format!("Project '{name}' deleted"))
    }

    /// Every project under the root, sorted by name.
    ///
    /// An unreadable root is treated as empty.
    pub fn list(&self) -> Vec<ProjectInfo> {
        if !self.fs.is_dir(&self.root) {
            debug!(root = %self.root.display(), "projects root missing");
            return Vec::new();
        }

        self.fs
            .subdirectories(&self.root)
            .into_iter()
            .filter_map(|path| {
                Some(ProjectInfo {
                    name: file_name(&path)?,
                    environments: self.environments_of(&path),
                    folders: self.folders_of(&path),
                    path,
                })
            })
            .collect()
    }

    fn environments_of(&self, project_dir: &Path) -> Vec<EnvironmentInfo> {
        self.fs
            .subdirectories(&project_dir.join(VENVS_DIR))
            .into_iter()
            .filter(|p| policy::environment_exists_in(self.fs.as_ref(), p))
            .filter_map(|path| Some(EnvironmentInfo { name: file_name(&path)?, path }))
            .collect()
    }

    fn folders_of(&self, project_dir: &Path) -> Vec<FolderInfo> {
        self.fs
            .subdirectories(project_dir)
            .into_iter()
            .filter_map(|path| Some(FolderInfo { name: file_name(&path)?, path }))
            .filter(|f| !HIDDEN_FOLDERS.contains(&f.name.as_str()))
            .collect()
    }

    pub fn open_folder(&self, name: &str) -> Result<String> {
        let path = self.checked_path(name)?;
        if !self.fs.exists(&path) {
            return Err(VenvmanError::not_found("project", name));
        }
        platform::open_folder(self.platform, &path).map_err(|e| {
            warn!(project = name, error = %e, "could not open folder");
            VenvmanError::Other(e.context("could not open the folder"))
        })?;
        Ok("Folder opened in the file browser".to_string())
    }

    pub fn open_terminal(&self, name: &str) -> Result<String> {
        let path = self.checked_path(name)?;
        if !self.fs.exists(&path) {
            return Err(VenvmanError::not_found("project", name));
        }
        platform::open_terminal(self.platform, &path).map_err(|e| {
            warn!(project = name, error = %e, "could not open terminal");
            VenvmanError::Other(e.context("could not open a terminal"))
        })?;
        Ok("Terminal opened in the project".to_string())
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn manager(fs: &MockFileSystem) -> ProjectManager {
        ProjectManager::new("/root/projects", Arc::new(fs.clone()))
    }

    #[test]
    fn create_writes_templates() {
        let fs = MockFileSystem::new();
        let pm = manager(&fs);

        let msg = pm.create("demo").unwrap();
        assert_eq!(msg, "Project 'demo' created");
        assert!(pm.exists("demo"));

        let readme = fs
            .read_to_string(Path::new("/root/projects/demo/README.md"))
            .unwrap();
        assert!(readme.starts_with("# demo"));
        assert!(fs.is_file(Path::new("/root/projects/demo/.gitignore")));
    }

    #[test]
    fn create_rejects_bad_names_and_duplicates() {
        let fs = MockFileSystem::new();
        let pm = manager(&fs);

        assert!(matches!(pm.create(" "), Err(VenvmanError::BlankName { .. })));
        assert!(matches!(pm.create("a b"), Err(VenvmanError::InvalidName { .. })));

        pm.create("demo").unwrap();
        assert!(matches!(
            pm.create("demo"),
            Err(VenvmanError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn templates_follow_config() {
        let fs = MockFileSystem::new();
        let mut cfg = ConfigFile::default();
        cfg.project.readme = false;
        let pm = ProjectManager::from_config(&cfg, "/root/projects", Arc::new(fs.clone()));

        pm.create("demo").unwrap();
        assert!(!fs.exists(Path::new("/root/projects/demo/README.md")));
        assert!(fs.exists(Path::new("/root/projects/demo/.gitignore")));
    }

    #[test]
    fn list_reports_valid_environments_and_visible_folders() {
        let fs = MockFileSystem::new();
        fs.add_file("/root/projects/demo/venvs/dev/pyvenv.cfg", "");
        fs.add_dir("/root/projects/demo/venvs/broken");
        fs.add_dir("/root/projects/demo/src");
        fs.add_dir("/root/projects/demo/.git");
        fs.add_dir("/root/projects/alpha");
        fs.add_file("/root/projects/notes.txt", "not a project");

        let projects = manager(&fs).list();

        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "demo"]);

        let demo = &projects[1];
        let envs: Vec<_> = demo.environments.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(envs, vec!["dev"]);
        let folders: Vec<_> = demo.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folders, vec!["src"]);
    }

    #[test]
    fn list_of_missing_root_is_empty() {
        let fs = MockFileSystem::new();
        assert!(manager(&fs).list().is_empty());
    }

    #[test]
    fn delete_removes_project() {
        let fs = MockFileSystem::new();
        let pm = manager(&fs);
        pm.create("demo").unwrap();

        assert_eq!(pm.delete("demo").unwrap(), "Project 'demo' deleted");
        assert!(!pm.exists("demo"));
        assert!(matches!(pm.delete("demo"), Err(VenvmanError::NotFound { .. })));
    }
}
