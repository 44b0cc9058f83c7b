use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding where the history log lives.
pub const HISTORY_VAR: &str = "TALLY_HISTORY";
pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

#[derive(Clone, PartialEq, Debug)]
pub struct Config {
    pub history_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_var(env::var_os(HISTORY_VAR))
    }

    pub fn with_history_path(path: impl Into<PathBuf>) -> Config {
        Config { history_path: path.into() }
    }

    fn from_var(var: Option<OsString>) -> Config {
        match var {
            Some(path) if !path.is_empty() => {
                Config::with_history_path(expand_home(PathBuf::from(path)))
            }
            _ => Config::with_history_path(DEFAULT_HISTORY_FILE),
        }
    }
}

// "~/x" -> "$HOME/x", left alone when there's no home to expand to
fn expand_home(path: PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), home::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}
