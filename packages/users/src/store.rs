//! File-backed user repository.
//!
//! All records live in memory behind a single async mutex and are written
//! back to `users.json` after every mutation. A mutation is applied to a copy
//! first and only committed to memory once the file write succeeded, so the
//! in-memory list never runs ahead of the disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, UsersError};
use crate::models::{AnalysisUpdate, User, UserInput};

pub const USERS_FILE_NAME: &str = "users.json";

/// Storage for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<User>>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;
    /// Insert a new record. Fails with `DuplicateEmail` when another record
    /// already uses the address (case-insensitive).
    async fn add(&self, user: User) -> Result<()>;
    /// Replace an existing record. Fails with `NotFound` for unknown ids and
    /// `DuplicateEmail` when the address belongs to a different record.
    async fn update(&self, user: User) -> Result<()>;
    /// Apply an edit to the stored record's profile fields, leaving its
    /// enrichment fields as they are. Returns the updated record.
    async fn edit(&self, id: Uuid, input: UserInput) -> Result<User>;
    /// Write analysis results onto the stored record, leaving its profile
    /// fields as they are. Returns the updated record.
    async fn record_analysis(&self, id: Uuid, analysis: AnalysisUpdate) -> Result<User>;
    /// Remove a record. Unknown ids are not an error.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct FileUserRepository {
    path: PathBuf,
    users: Mutex<Vec<User>>,
}

impl FileUserRepository {
    /// Open (and create, if needed) the store under `data_dir`, loading any
    /// existing records.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;

        let repo = Self {
            path: data_dir.join(USERS_FILE_NAME),
            users: Mutex::new(Vec::new()),
        };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Reload records from disk. A missing or blank file means no records.
    pub async fn initialize(&self) -> Result<()> {
        let mut users = self.users.lock().await;

        let loaded = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Vec::new(),
            Ok(json) => serde_json::from_str::<Vec<User>>(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %self.path.display(), count = loaded.len(), "loaded user records");
        *users = loaded;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, users: &[User]) -> Result<()> {
        let json = serde_json::to_vec_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = users.len(), "saved user records");
        Ok(())
    }

    /// Read-modify-write of one record under the store lock.
    async fn modify<F>(&self, id: Uuid, change: F) -> Result<User>
    where
        F: FnOnce(&mut User) -> Result<()> + Send,
    {
        let mut users = self.users.lock().await;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UsersError::NotFound(id))?;

        let mut next = users.clone();
        change(&mut next[idx])?;
        next[idx].id = id;
        let email = &next[idx].email;
        if next
            .iter()
            .any(|u| u.id != id && same_email(&u.email, email))
        {
            return Err(UsersError::DuplicateEmail(email.clone()));
        }

        let updated = next[idx].clone();
        self.save(&next).await?;
        *users = next;
        Ok(updated)
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn add(&self, user: User) -> Result<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| same_email(&u.email, &user.email)) {
            return Err(UsersError::DuplicateEmail(user.email));
        }

        let mut next = users.clone();
        next.push(user);
        self.save(&next).await?;
        *users = next;
        Ok(())
    }

    async fn update(&self, user: User) -> Result<()> {
        self.modify(user.id, |stored| {
            *stored = user;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn edit(&self, id: Uuid, input: UserInput) -> Result<User> {
        self.modify(id, |stored| stored.apply(input)).await
    }

    async fn record_analysis(&self, id: Uuid, analysis: AnalysisUpdate) -> Result<User> {
        self.modify(id, |stored| {
            stored.record_analysis(&analysis);
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.lock().await;
        if !users.iter().any(|u| u.id == id) {
            return Ok(());
        }

        let next: Vec<User> = users.iter().filter(|u| u.id != id).cloned().collect();
        self.save(&next).await?;
        *users = next;
        Ok(())
    }
}
