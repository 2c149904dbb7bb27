//! Persisted login credential (token + role).
//!
//! The credential is stored as two entries, `token` and `role`, each with its
//! own expiry, in `<base>/credentials.json` with restricted permissions (0600).
//! Every client process pointing at the same base directory sees the same
//! credential, the way browser tabs share cookies.
//!
//! Reads never fail: a missing, unreadable, corrupt or expired file reads as
//! "no credential", which every guard treats as unauthenticated.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{Config, StorageKind, paths};
use crate::role::Role;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

fn now_millis_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(u64::MAX)
}

/// Proof of authentication used to gate navigation.
///
/// Never mutated in place: a new login replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub role: Role,
}

impl Credential {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }
}

/// A single stored value with its expiry (milliseconds since epoch).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    expires: u64,
}

impl StoredEntry {
    fn live_value(&self, now: u64) -> Option<&str> {
        (now < self.expires).then_some(self.value.as_str())
    }
}

/// On-disk layout of `credentials.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredCredentials {
    /// Bumped on every write so watchers notice same-size rewrites.
    #[serde(default)]
    revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<StoredEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<StoredEntry>,
}

impl StoredCredentials {
    fn credential_at(&self, now: u64) -> Option<Credential> {
        let token = self.token.as_ref()?.live_value(now)?;
        if token.trim().is_empty() {
            return None;
        }
        let role_tag = self.role.as_ref()?.live_value(now)?;
        match role_tag.parse::<Role>() {
            Ok(role) => Some(Credential::new(token, role)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored credential with unknown role");
                None
            }
        }
    }
}

#[derive(Debug, Default)]
struct MemoryStore {
    stored: Option<StoredCredentials>,
    revision: u64,
}

#[derive(Debug, Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<MemoryStore>>),
    Disabled,
}

/// Opaque marker that changes whenever the stored credential changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    stamp: u128,
    len: u64,
    revision: u64,
}

/// Owner of the persisted credential.
///
/// Cloning shares the underlying storage (clones of a memory holder see each
/// other's writes).
#[derive(Debug, Clone)]
pub struct CredentialHolder {
    backend: Backend,
}

impl CredentialHolder {
    /// File-backed holder at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
        }
    }

    /// Process-local holder.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(MemoryStore::default()))),
        }
    }

    /// Holder whose storage is turned off: `get` is always absent.
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
        }
    }

    /// Builds the holder selected by `config.storage`.
    pub fn from_config(config: &Config) -> Self {
        match config.storage {
            StorageKind::File => Self::file(paths::credentials_path()),
            StorageKind::Memory => Self::memory(),
            StorageKind::Disabled => Self::disabled(),
        }
    }

    /// Path of the backing file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            _ => None,
        }
    }

    /// Returns the stored credential, or None if never set, expired, or unreadable.
    pub fn get(&self) -> Option<Credential> {
        self.get_at(now_millis_u64())
    }

    fn get_at(&self, now: u64) -> Option<Credential> {
        match &self.backend {
            Backend::File(path) => load_file(path)?.credential_at(now),
            Backend::Memory(store) => lock(store).stored.as_ref()?.credential_at(now),
            Backend::Disabled => None,
        }
    }

    /// Persists token and role with the same expiry, replacing any previous credential.
    ///
    /// # Errors
    /// Returns an error if the credential file cannot be written.
    pub fn set(&self, token: &str, role: Role, ttl_days: u32) -> Result<()> {
        let expires =
            now_millis_u64().saturating_add(u64::from(ttl_days).saturating_mul(MILLIS_PER_DAY));
        let mut stored = StoredCredentials {
            revision: 0,
            token: Some(StoredEntry {
                value: token.to_string(),
                expires,
            }),
            role: Some(StoredEntry {
                value: role.as_str().to_string(),
                expires,
            }),
        };

        match &self.backend {
            Backend::File(path) => {
                stored.revision = read_revision(path).wrapping_add(1);
                save_file(path, &stored)?;
            }
            Backend::Memory(store) => {
                let mut store = lock(store);
                store.stored = Some(stored);
                store.revision = store.revision.wrapping_add(1);
            }
            Backend::Disabled => {
                tracing::debug!("credential storage disabled; not persisting login");
                return Ok(());
            }
        }

        tracing::info!(role = %role, ttl_days, "credential stored");
        Ok(())
    }

    /// Removes both entries. Idempotent.
    ///
    /// # Errors
    /// Returns an error if an existing credential file cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match &self.backend {
            Backend::File(path) => match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to remove {}", path.display()));
                }
            },
            Backend::Memory(store) => {
                let mut store = lock(store);
                store.stored = None;
                store.revision = store.revision.wrapping_add(1);
            }
            Backend::Disabled => {}
        }

        tracing::info!("credential cleared");
        Ok(())
    }

    /// Current storage fingerprint (None when nothing is stored).
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        match &self.backend {
            Backend::File(path) => {
                let meta = fs::metadata(path).ok()?;
                let stamp = meta
                    .modified()
                    .ok()
                    .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
                    .map_or(0, |d| d.as_nanos());
                Some(Fingerprint {
                    stamp,
                    len: meta.len(),
                    revision: read_revision(path),
                })
            }
            Backend::Memory(store) => {
                let store = lock(store);
                store.stored.as_ref().map(|_| Fingerprint {
                    stamp: 0,
                    len: 0,
                    revision: store.revision,
                })
            }
            Backend::Disabled => None,
        }
    }
}

fn lock(store: &Mutex<MemoryStore>) -> std::sync::MutexGuard<'_, MemoryStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_file(path: &Path) -> Option<StoredCredentials> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "credential file unreadable");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(stored) => Some(stored),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "credential file corrupt");
            None
        }
    }
}

/// Revision of the stored file, 0 when missing or unparsable.
fn read_revision(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str::<StoredCredentials>(&contents).ok())
        .map_or(0, |stored| stored.revision)
}

/// Writes a sibling temp file, then renames it over `path`.
///
/// Readers see either the previous file or the new one, never a partial write.
fn save_file(path: &Path, stored: &StoredCredentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents =
        serde_json::to_string_pretty(stored).context("Failed to serialize credentials")?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(e) = write_private(&tmp_path, &contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        });
    }

    Ok(())
}

fn write_private(path: &Path, contents: &str) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

/// Detects credential changes made by other clients sharing the storage.
///
/// Hosts poll this periodically and re-evaluate the current route's guard when
/// it reports a change.
#[derive(Debug)]
pub struct CredentialWatcher {
    last: Option<Fingerprint>,
}

impl CredentialWatcher {
    pub fn new(holder: &CredentialHolder) -> Self {
        Self {
            last: holder.fingerprint(),
        }
    }

    /// Returns true if the storage changed since the previous poll.
    pub fn poll(&mut self, holder: &CredentialHolder) -> bool {
        let current = holder.fingerprint();
        if current == self.last {
            return false;
        }
        self.last = current;
        true
    }

    /// Accepts the current storage state without reporting it as a change.
    pub fn sync(&mut self, holder: &CredentialHolder) {
        self.last = holder.fingerprint();
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_get_absent_when_never_set() {
        let dir = tempdir().unwrap();
        let holder = CredentialHolder::file(dir.path().join("credentials.json"));
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let dir = tempdir().unwrap();
        let holder = CredentialHolder::file(dir.path().join("credentials.json"));

        holder.set("abc", Role::Recruiter, 7).unwrap();

        assert_eq!(holder.get(), Some(Credential::new("abc", Role::Recruiter)));
    }

    #[test]
    fn test_set_is_visible_to_other_holders_on_same_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let tab_a = CredentialHolder::file(&path);
        let tab_b = CredentialHolder::file(&path);

        tab_a.set("abc", Role::JobSeeker, 7).unwrap();
        assert_eq!(tab_b.get().map(|c| c.role), Some(Role::JobSeeker));

        tab_b.clear().unwrap();
        assert!(tab_a.get().is_none());
    }

    #[test]
    fn test_relogin_replaces_credential() {
        let holder = CredentialHolder::memory();
        holder.set("first", Role::JobSeeker, 7).unwrap();
        holder.set("second", Role::Recruiter, 7).unwrap();

        assert_eq!(holder.get(), Some(Credential::new("second", Role::Recruiter)));
    }

    #[test]
    fn test_expired_credential_reads_absent() {
        let holder = CredentialHolder::memory();
        holder.set("abc", Role::Recruiter, 7).unwrap();

        let eight_days = now_millis_u64() + 8 * MILLIS_PER_DAY;
        assert!(holder.get_at(eight_days).is_none());
        let six_days = now_millis_u64() + 6 * MILLIS_PER_DAY;
        assert!(holder.get_at(six_days).is_some());
    }

    #[test]
    fn test_role_entry_expired_alone_reads_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let far = now_millis_u64() + MILLIS_PER_DAY;
        fs::write(
            &path,
            format!(
                r#"{{"token":{{"value":"abc","expires":{far}}},"role":{{"value":"recruiter","expires":1}}}}"#
            ),
        )
        .unwrap();

        assert!(CredentialHolder::file(&path).get().is_none());
    }

    #[test]
    fn test_unknown_role_reads_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let far = now_millis_u64() + MILLIS_PER_DAY;
        fs::write(
            &path,
            format!(
                r#"{{"token":{{"value":"abc","expires":{far}}},"role":{{"value":"admin","expires":{far}}}}}"#
            ),
        )
        .unwrap();

        assert!(CredentialHolder::file(&path).get().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        assert!(CredentialHolder::file(&path).get().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let holder = CredentialHolder::file(dir.path().join("credentials.json"));
        holder.set("abc", Role::Recruiter, 7).unwrap();

        holder.clear().unwrap();
        assert!(holder.get().is_none());
        holder.clear().unwrap();
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_disabled_storage_is_always_absent() {
        let holder = CredentialHolder::disabled();
        holder.set("abc", Role::Recruiter, 7).unwrap();
        assert!(holder.get().is_none());
        assert!(holder.clear().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_written_with_restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        CredentialHolder::file(&path)
            .set("abc", Role::Recruiter, 7)
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_swaps_in_a_new_file() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let holder = CredentialHolder::file(&path);

        holder.set("abc", Role::Recruiter, 7).unwrap();
        let first = fs::metadata(&path).unwrap().ino();
        holder.set("xyz", Role::Recruiter, 7).unwrap();
        let second = fs::metadata(&path).unwrap().ino();

        assert_ne!(first, second);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "credentials.json")
            .collect();
        assert!(leftovers.is_empty(), "stray files: {leftovers:?}");
    }

    #[test]
    fn test_set_fails_when_path_is_a_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::create_dir(&path).unwrap();

        let holder = CredentialHolder::file(&path);
        assert!(holder.set("abc", Role::Recruiter, 7).is_err());
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_watcher_notices_same_size_rewrite_with_same_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let this_tab = CredentialHolder::file(&path);
        let other_tab = CredentialHolder::file(&path);

        this_tab.set("aaa", Role::Recruiter, 7).unwrap();
        let mut watcher = CredentialWatcher::new(&this_tab);
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        let len = fs::metadata(&path).unwrap().len();

        other_tab.set("bbb", Role::Recruiter, 7).unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), len);

        assert!(watcher.poll(&this_tab));
        assert_eq!(this_tab.get().unwrap().token, "bbb");
    }

    #[test]
    fn test_watcher_reports_changes_from_other_holder() {
        let shared = CredentialHolder::memory();
        let other_tab = shared.clone();
        let mut watcher = CredentialWatcher::new(&shared);

        assert!(!watcher.poll(&shared));

        other_tab.set("abc", Role::Recruiter, 7).unwrap();
        assert!(watcher.poll(&shared));
        assert!(!watcher.poll(&shared));

        other_tab.clear().unwrap();
        assert!(watcher.poll(&shared));
    }

    #[test]
    fn test_watcher_sync_swallows_own_write() {
        let holder = CredentialHolder::memory();
        let mut watcher = CredentialWatcher::new(&holder);

        holder.set("abc", Role::Recruiter, 7).unwrap();
        watcher.sync(&holder);
        assert!(!watcher.poll(&holder));
    }
}
