// ── Credentials file I/O ──
//
// One JSON file per tunnel, written exactly once. The existence check and
// the write are a single `create_new` open, so a concurrent writer can never
// be clobbered.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::Credentials;

/// Where a tunnel's credentials live: an explicit file, or a directory
/// holding `<tunnel-id>.json` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsLocation {
    File(PathBuf),
    Dir(PathBuf),
}

impl CredentialsLocation {
    pub fn path_for(&self, tunnel_id: &Uuid) -> PathBuf {
        match self {
            Self::File(path) => expand_tilde(path),
            Self::Dir(dir) => tunnel_file_path(tunnel_id, dir),
        }
    }
}

/// `<dir>/<tunnel-id>.json`, with a leading `~` expanded.
pub fn tunnel_file_path(tunnel_id: &Uuid, dir: &Path) -> PathBuf {
    expand_tilde(dir).join(format!("{tunnel_id}.json"))
}

/// Replace a leading `~` component with the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

/// Persist `creds` at `path` with owner-read-only permissions.
///
/// Fails with [`CoreError::AlreadyExists`] if anything is at `path`; the
/// existing file is left untouched.
pub fn write_credentials(path: &Path, creds: &Credentials) -> Result<(), CoreError> {
    let body = serde_json::to_vec(creds)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = open_exclusive(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            CoreError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            CoreError::Io(e)
        }
    })?;

    if let Err(e) = file.write_all(&body).and_then(|()| file.sync_all()) {
        drop(file);
        // The file is ours; a partial write would block a retry.
        let _ = fs::remove_file(path);
        return Err(CoreError::Io(e));
    }

    debug!(path = %path.display(), "credentials written");
    Ok(())
}

#[cfg(unix)]
fn open_exclusive(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o400)
        .open(path)
}

#[cfg(not(unix))]
fn open_exclusive(path: &Path) -> io::Result<fs::File> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms)?;
    Ok(file)
}

/// Load and validate a credentials file.
pub fn read_credentials(path: &Path) -> Result<Credentials, CoreError> {
    if !path.is_file() {
        return Err(CoreError::CredentialsNotFound {
            path: path.to_path_buf(),
        });
    }

    let body = fs::read(path)?;
    let creds: Credentials =
        serde_json::from_slice(&body).map_err(|e| CoreError::InvalidCredentials {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if creds.account_tag.is_empty() {
        return Err(CoreError::InvalidCredentials {
            path: path.to_path_buf(),
            message: "AccountTag is empty".into(),
        });
    }
    if creds.tunnel_secret.as_bytes().is_empty() {
        return Err(CoreError::InvalidCredentials {
            path: path.to_path_buf(),
            message: "TunnelSecret is empty".into(),
        });
    }

    Ok(creds)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::model::TunnelSecret;

    fn creds() -> Credentials {
        Credentials {
            account_tag: "acct-1".into(),
            tunnel_secret: TunnelSecret::generate(),
            tunnel_id: Uuid::new_v4(),
            tunnel_name: "web".into(),
        }
    }

    #[test]
    fn writes_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let creds = creds();
        let path = tunnel_file_path(&creds.tunnel_id, dir.path());

        write_credentials(&path, &creds).unwrap();
        assert_eq!(read_credentials(&path).unwrap(), creds);
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_read_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("creds.json");
        write_credentials(&path, &creds()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);
    }

    #[test]
    fn refuses_to_overwrite_and_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.json");
        fs::write(&path, b"original").unwrap();

        let err = write_credentials(&path, &creds()).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists { path: ref p } if *p == path));
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/creds.json");
        write_credentials(&path, &creds()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = read_credentials(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CoreError::CredentialsNotFound { .. }));
    }

    #[test]
    fn malformed_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, br#"{"AccountTag": "a"}"#).unwrap();

        let err = read_credentials(&path).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials { .. }));
    }

    #[test]
    fn location_resolves_paths() {
        let id = Uuid::nil();
        let dir = CredentialsLocation::Dir(PathBuf::from("/etc/tunnels"));
        assert_eq!(
            dir.path_for(&id),
            PathBuf::from("/etc/tunnels/00000000-0000-0000-0000-000000000000.json")
        );

        let file = CredentialsLocation::File(PathBuf::from("/tmp/x.json"));
        assert_eq!(file.path_for(&id), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_tilde(Path::new("~/.tunnelctl"));
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with(".tunnelctl"));
        assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
