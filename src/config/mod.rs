use std::env;
use std::path::PathBuf;

/// Runtime configuration for the upload service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding every uploaded file (default: ./uploads)
    pub upload_dir: PathBuf,

    /// Base address used to build download URLs (default: http://localhost:8080)
    pub public_base_url: String,

    /// Maximum file size in bytes (default: 50 MB)
    pub max_file_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8080".to_string(),
            max_file_size: 50 * 1024 * 1024, // 50 MB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(default.public_base_url),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),
        }
    }

    /// Create config for development (local folder, relaxed size limit)
    pub fn development() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8080".to_string(),
            max_file_size: 256 * 1024 * 1024, // 256 MB
        }
    }

    /// Create config for production (explicit storage location required)
    pub fn production() -> Self {
        let default = Self::default();
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .expect("CRITICAL: UPLOAD_DIR must be set"),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .expect("CRITICAL: PUBLIC_BASE_URL must be set"),
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),
        }
    }
}
