// Blogsync platform paths
// Linux:   $XDG_CONFIG_HOME/blogsync, $XDG_DATA_HOME/blogsync (~/.config, ~/.local/share)
// macOS:   ~/Library/Application Support/Blogsync
// Windows: %APPDATA%/Blogsync

use std::env;
use std::path::PathBuf;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(var) {
        return PathBuf::from(dir).join("blogsync");
    }
    let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
    fallback
        .iter()
        .fold(PathBuf::from(home), |path, part| path.join(part))
        .join("blogsync")
}

#[cfg(target_os = "macos")]
fn app_support_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
    PathBuf::from(home)
        .join("Library")
        .join("Application Support")
        .join("Blogsync")
}

#[cfg(target_os = "windows")]
fn appdata_dir() -> PathBuf {
    let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
    PathBuf::from(appdata).join("Blogsync")
}

/// Directory holding `config.json`.
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Directory holding the persistent storage file.
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}
