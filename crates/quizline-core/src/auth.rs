//! Credential store: `username,hash` lines, SHA-256 password hashes.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::fingerprint::sha256_hex;

#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new user. Returns `false` if the username already exists.
    pub fn register(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("username must not be empty"));
        }
        if username.contains([',', '\n', '\r']) {
            return Err(AuthError::Validation(
                "username must not contain commas or line breaks",
            ));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password must not be empty"));
        }

        if self.load_all()?.contains_key(username) {
            return Ok(false);
        }

        let io_err = |source| AuthError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let line = format!("{username},{}\n", hash_password(password));
        file.write_all(line.as_bytes()).map_err(io_err)?;

        tracing::info!(username, "user registered");
        Ok(true)
    }

    /// Check a password by re-hashing it against the stored hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let users = self.load_all()?;
        let ok = users
            .get(username.trim())
            .is_some_and(|stored| *stored == hash_password(password));
        if !ok {
            tracing::debug!(username, "authentication failed");
        }
        Ok(ok)
    }

    fn load_all(&self) -> Result<HashMap<String, String>, AuthError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(AuthError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(content
            .lines()
            .filter_map(|line| line.split_once(','))
            .map(|(user, hash)| (user.to_string(), hash.trim().to_string()))
            .collect())
    }
}

fn hash_password(password: &str) -> String {
    sha256_hex(&[password])
}
