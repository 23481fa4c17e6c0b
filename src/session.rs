use std::path::PathBuf;

use thiserror::Error;

use crate::api::types::ViewerSession;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = crate::config::config_dir() {
        paths.push(dir.join(".env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files. Earlier files win because dotenvy never overwrites
/// variables that are already set.
pub fn load_env_files() -> Result<(), SessionError> {
    for path in env_file_paths() {
        if path.exists() {
            dotenvy::from_path(&path)?;
        }
    }
    Ok(())
}

/// Resolve the viewer from `TWEETCARD_USER_ID` and friends.
///
/// Returns `None` when no user id is configured, which the client treats as
/// an anonymous viewer.
pub fn load_session() -> Result<Option<ViewerSession>, SessionError> {
    load_env_files()?;
    Ok(session_from(|name| std::env::var(name).ok()))
}

fn session_from(lookup: impl Fn(&str) -> Option<String>) -> Option<ViewerSession> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let user_id = get("TWEETCARD_USER_ID")?;
    Some(ViewerSession {
        user_id,
        name: get("TWEETCARD_USER_NAME"),
        token: get("TWEETCARD_TOKEN"),
    })
}
