use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Intraop";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    format!("warn,{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Intraop/ on all platforms (user-visible, kept next to case exports)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Default path of the case registry database
pub fn database_path() -> PathBuf {
    app_data_dir().join("registry.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Intraop"));
    }

    #[test]
    fn database_path_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("registry.db"));
    }

    #[test]
    fn default_filter_names_crate() {
        assert!(default_log_filter().contains("intraop=info"));
    }
}
