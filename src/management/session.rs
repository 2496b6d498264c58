use std::path::PathBuf;

use chrono::Utc;

use crate::{config, types::Session};

/// Persists the session token between CLI invocations.
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new(hm_token: &str, username: Option<String>) -> Self {
        SessionManager {
            session: Session {
                hm_token: hm_token.to_string(),
                username,
                obtained_at: Utc::now(),
            },
        }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::session_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let session: Session = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { session })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::session_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.session).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Deletes the stored session. A missing file counts as cleared.
    pub async fn clear() -> Result<(), String> {
        match async_fs::remove_file(Self::session_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        &self.session.hm_token
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    fn session_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }
}
