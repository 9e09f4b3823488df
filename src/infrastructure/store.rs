//! Properties Repository Store
//!
//! Persists the repository registry in a flat key-indexed properties file,
//! `repositories.db` under the base storage root:
//!
//! ```text
//! count = 2
//! item.0.name = releases
//! item.0.location = /srv/depot/storage/releases
//! item.0.url = /depot/releases
//! item.0.proxy =
//! item.0.mirror = false
//! ...
//! ```
//!
//! Absent optional fields are written as empty strings and read back as
//! unset. The schema deliberately carries no scheduling fields; a reloaded
//! registry comes back unscheduled (see DESIGN.md).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use fs2::FileExt;

use crate::domain::entities::repository::DEFAULT_POOL_SIZE;
use crate::domain::entities::Repository;
use crate::domain::ports::{RepositoryStore, StoreError};

pub struct PropertiesStore {
    path: PathBuf,
}

impl PropertiesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn load_from_disk(&self) -> Result<Vec<Repository>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::AccessError {
            message: e.to_string(),
        })?;
        parse_properties(&content, &self.path)
    }

    fn save_to_disk(&self, repositories: &[Repository]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::AccessError {
                message: e.to_string(),
            })?;
        }

        let content = encode_properties(repositories);
        fs::write(&self.path, content).map_err(|e| StoreError::AccessError {
            message: e.to_string(),
        })
    }
}

impl RepositoryStore for PropertiesStore {
    fn load(&self) -> Result<Vec<Repository>, StoreError> {
        self.load_from_disk()
    }

    fn save(&self, repositories: &[Repository]) -> Result<(), StoreError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::AccessError {
                message: e.to_string(),
            })?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(|e| StoreError::AccessError {
            message: e.to_string(),
        })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StoreError::AccessError {
                message: e.to_string(),
            })?;

        let result = self.save_to_disk(repositories);

        let _ = FileExt::unlock(&lock_file);
        result
    }
}

fn encode_properties(repositories: &[Repository]) -> String {
    fn opt(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("")
    }

    let mut out = String::from("# depot repository store\n");
    out.push_str(&format!("count = {}\n", repositories.len()));
    for (i, repo) in repositories.iter().enumerate() {
        out.push_str(&format!("item.{i}.name = {}\n", repo.name()));
        out.push_str(&format!(
            "item.{i}.location = {}\n",
            repo.location.display()
        ));
        out.push_str(&format!("item.{i}.url = {}\n", repo.url));
        out.push_str(&format!("item.{i}.proxy = {}\n", opt(&repo.proxy)));
        out.push_str(&format!("item.{i}.mirror = {}\n", repo.mirror));
        out.push_str(&format!("item.{i}.realm = {}\n", opt(&repo.realm)));
        out.push_str(&format!(
            "item.{i}.downloadRole = {}\n",
            opt(&repo.download_role)
        ));
        out.push_str(&format!(
            "item.{i}.uploadRole = {}\n",
            opt(&repo.upload_role)
        ));
        out.push_str(&format!("item.{i}.poolSize = {}\n", repo.pool_size));
    }
    out
}

fn parse_properties(content: &str, path: &PathBuf) -> Result<Vec<Repository>, StoreError> {
    let corrupted = |message: String| StoreError::Corrupted {
        path: path.clone(),
        message,
    };

    let mut fields: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| corrupted(format!("malformed line '{line}'")))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }

    let count: usize = fields
        .get("count")
        .ok_or_else(|| corrupted("missing 'count' field".to_string()))?
        .parse()
        .map_err(|_| corrupted("invalid 'count' field".to_string()))?;

    fn optional(fields: &HashMap<String, String>, key: &str) -> Option<String> {
        fields.get(key).filter(|v| !v.is_empty()).cloned()
    }

    let mut repositories = Vec::with_capacity(count);
    for i in 0..count {
        let name = fields
            .get(&format!("item.{i}.name"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| corrupted(format!("missing name for item {i}")))?;
        let location = fields
            .get(&format!("item.{i}.location"))
            .ok_or_else(|| corrupted(format!("missing location for item {i}")))?;
        let url = fields
            .get(&format!("item.{i}.url"))
            .ok_or_else(|| corrupted(format!("missing url for item {i}")))?;

        let mut repo = Repository::new(name.clone(), PathBuf::from(location), url.clone());
        repo.proxy = optional(&fields, &format!("item.{i}.proxy"));
        repo.mirror = fields
            .get(&format!("item.{i}.mirror"))
            .map(|v| v == "true")
            .unwrap_or(false);
        repo.realm = optional(&fields, &format!("item.{i}.realm"));
        repo.download_role = optional(&fields, &format!("item.{i}.downloadRole"));
        repo.upload_role = optional(&fields, &format!("item.{i}.uploadRole"));
        repo.pool_size = fields
            .get(&format!("item.{i}.poolSize"))
            .and_then(|v| v.parse().ok())
            .filter(|&p| p > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);
        repositories.push(repo);
    }

    Ok(repositories)
}
