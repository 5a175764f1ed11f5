use std::env;
use std::path::PathBuf;

use dirs_next::home_dir;

/// Environment variable pointing the TUI log file somewhere specific.
pub const LOG_PATH_ENV: &str = "KNOBS_LOG_FILE";

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Log destination used while the TUI owns the terminal.
pub fn default_log_path() -> PathBuf {
    match env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_tilde(&path),
        _ => env::temp_dir().join("knobs.log"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /tmp/knobs.yaml "), PathBuf::from("/tmp/knobs.yaml"));
    }

    #[test]
    fn tilde_prefix_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/knobs.yaml"), home.join("knobs.yaml"));
            assert_eq!(expand_tilde("~"), home);
        }
    }

    #[test]
    fn log_path_honors_env_override() {
        temp_env::with_var(LOG_PATH_ENV, Some("/var/tmp/custom.log"), || {
            assert_eq!(default_log_path(), PathBuf::from("/var/tmp/custom.log"));
        });
        temp_env::with_var(LOG_PATH_ENV, None::<&str>, || {
            assert_eq!(default_log_path(), env::temp_dir().join("knobs.log"));
        });
    }
}
