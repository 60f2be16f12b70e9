//! Path context for runtime environment detection and project-aware paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Context for managing application paths based on studio/project/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// The runtime environment (development or production)
    environment: RuntimeEnvironment,
    /// Base path for all application data
    base_path: Arc<Path>,
    /// Studio identifier (e.g., "ecosort_labs")
    studio: String,
    /// Project identifier (e.g., "ecosort")
    project_id: String,
    /// Application identifier (e.g., "ecosort")
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: PathBuf,
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let environment = Self::detect_environment();

        Self {
            environment,
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Detects the runtime environment based on executable location.
    fn detect_environment() -> RuntimeEnvironment {
        // Check if running from cargo (development)
        if let Ok(exe_path) = std::env::current_exe() {
            // If the executable is in a "target/debug" or "target/release" directory,
            // we're likely in development mode
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        // Check for cargo environment variables
        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    /// Determines the base path based on the runtime environment.
    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => {
                // In development, use project root or current directory
                if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
                    PathBuf::from(manifest_dir)
                } else if let Ok(current_dir) = std::env::current_dir() {
                    current_dir
                } else {
                    PathBuf::from(".")
                }
            }
            RuntimeEnvironment::Production => {
                // In production, use platform-specific data directory
                if cfg!(target_os = "macos") {
                    dirs::data_local_dir()
                        .expect("failed to determine Application Support directory")
                        .join("EcoSort")
                } else if cfg!(target_os = "windows") {
                    dirs::data_local_dir()
                        .expect("failed to determine LocalAppData directory")
                        .join("EcoSort")
                } else if cfg!(any(target_os = "linux", target_os = "freebsd")) {
                    dirs::data_local_dir()
                        .expect("failed to determine XDG_DATA_HOME directory")
                        .join("EcoSort")
                } else {
                    PathBuf::from(".")
                }
            }
        }
    }

    /// Returns the runtime environment.
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the studio identifier.
    pub fn studio(&self) -> &str {
        &self.studio
    }

    /// Returns the project identifier.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the app identifier.
    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the project root path: `<base>/<studio>/<project_id>`
    pub fn project_root(&self) -> PathBuf {
        self.base_path.join(&self.studio).join(&self.project_id)
    }

    /// Returns the settings file path: `<studio>/<project_id>/<app_id>.settings.ron`
    pub fn settings_file(&self, app_id: Option<&str>) -> PathBuf {
        self.project_root()
            .join(format!("{}.settings.ron", app_id.unwrap_or(self.app_id)))
    }

    /// Returns the data directory path: `<studio>/<project_id>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.project_root().join("data")
    }

    /// Returns the captures directory path: `<studio>/<project_id>/captures/`
    ///
    /// Simulated camera and library picks place their fake image files here.
    pub fn captures_dir(&self) -> PathBuf {
        self.project_root().join("captures")
    }

    /// Returns a capture file path: `<studio>/<project_id>/captures/<name>.jpg`
    pub fn capture_file(&self, name: &str) -> PathBuf {
        self.captures_dir().join(format!("{name}.jpg"))
    }

    /// Returns the logs directory path: `<studio>/<project_id>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.project_root().join("logs")
    }

    /// Returns a log file path with timestamp: `<studio>/<project_id>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        let dirs = vec![
            self.project_root(),
            self.data_dir(),
            self.captures_dir(),
            self.logs_dir(),
        ];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_context_structure() {
        let ctx = PathContext::with_base_path(
            PathBuf::from("/test/base"),
            "my_studio",
            "my_project",
            "ecosort",
        );

        assert_eq!(ctx.studio(), "my_studio");
        assert_eq!(ctx.project_id(), "my_project");
        assert_eq!(ctx.app_id(), "ecosort");
        assert_eq!(
            ctx.project_root(),
            PathBuf::from("/test/base/my_studio/my_project")
        );
    }

    #[test]
    fn test_settings_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        assert_eq!(
            ctx.settings_file(None),
            PathBuf::from("/base/studio/project/app.settings.ron")
        );
        assert_eq!(
            ctx.settings_file(Some("other")),
            PathBuf::from("/base/studio/project/other.settings.ron")
        );
    }

    #[test]
    fn test_capture_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        assert_eq!(
            ctx.captures_dir(),
            PathBuf::from("/base/studio/project/captures")
        );
        assert_eq!(
            ctx.capture_file("cap-1234"),
            PathBuf::from("/base/studio/project/captures/cap-1234.jpg")
        );
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        let log_path = ctx.log_file("20240315-120000");
        assert_eq!(
            log_path,
            PathBuf::from("/base/studio/project/logs/app.20240315-120000.log")
        );
    }
}
