use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const ROOT_ENV_VAR: &str = "SPOOKY_MAZE_ROOT";
pub const MAZE_FILE_NAME: &str = "maze.txt";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub maze_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} is not valid unicode: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("cannot locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("executable path {0} has no parent directory")]
    ExeHasNoParent(PathBuf),
    #[error("{env_var}={path} is not a spooky-maze checkout (expected Cargo.toml plus assets/ or crates/)")]
    InvalidEnvRoot { path: PathBuf, env_var: &'static str },
    #[error(
        "no spooky-maze checkout found above {start_dir}; \
set {env_var} to the directory holding Cargo.toml and assets/"
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root. The maze file itself is not checked here;
/// a missing maze is a session start failure, not a startup failure.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match env_root()? {
        Some(root) => root,
        None => root_above_executable()?,
    };
    Ok(paths_for_root(root))
}

fn paths_for_root(root: PathBuf) -> AppPaths {
    let assets_dir = root.join("assets");
    AppPaths {
        maze_file: assets_dir.join(MAZE_FILE_NAME),
        assets_dir,
        root,
    }
}

fn env_root() -> Result<Option<PathBuf>, StartupError> {
    let raw = match env::var(ROOT_ENV_VAR) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    let root = canonical_or_raw(Path::new(&raw));
    if looks_like_checkout(&root) {
        Ok(Some(root))
    } else {
        Err(StartupError::InvalidEnvRoot {
            path: root,
            env_var: ROOT_ENV_VAR,
        })
    }
}

fn root_above_executable() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let Some(exe_dir) = exe.parent() else {
        return Err(StartupError::ExeHasNoParent(exe));
    };
    exe_dir
        .ancestors()
        .find(|candidate| looks_like_checkout(candidate))
        .map(canonical_or_raw)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: canonical_or_raw(exe_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn looks_like_checkout(path: &Path) -> bool {
    path.join("Cargo.toml").is_file()
        && (path.join("assets").is_dir() || path.join("crates").is_dir())
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn checkout_requires_cargo_toml() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join("assets")).expect("mkdir assets");
        assert!(!looks_like_checkout(temp.path()));

        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("write manifest");
        assert!(looks_like_checkout(temp.path()));
    }

    #[test]
    fn maze_file_lives_under_assets() {
        let paths = paths_for_root(PathBuf::from("/srv/maze"));
        assert_eq!(paths.assets_dir, PathBuf::from("/srv/maze/assets"));
        assert_eq!(paths.maze_file, PathBuf::from("/srv/maze/assets/maze.txt"));
    }
}
