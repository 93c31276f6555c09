//! Path utilities for locating local files.
//!
//! ```text
//! ~
//!  └── .vcd_rights
//!       └── session.yaml
//! ```

use std::path::{Path, PathBuf};

use dirs::home_dir;
use lazy_static::lazy_static;

lazy_static! {
    static ref PROFILE_CFG_DIR: PathBuf = PathBuf::from(".vcd_rights");
    static ref SESSION_CFG: PathBuf = PathBuf::from("session.yaml");
}

/// The directory holding user-level configuration.
pub fn profile_cfg_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROFILE_CFG_DIR.as_path())
}

/// The default session file path.
pub fn session_cfg_path() -> PathBuf {
    session_cfg_path_in(profile_cfg_dir())
}

/// The session file path within a given directory.
pub fn session_cfg_path_in<P: AsRef<Path>>(dir: P) -> PathBuf {
    dir.as_ref().join(SESSION_CFG.as_path())
}
