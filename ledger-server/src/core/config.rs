use std::path::{Path, PathBuf};

use crate::auth::JwtConfig;
use crate::utils::logger;

const DEFAULT_WORK_DIR: &str = "/var/lib/ledger";

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/ledger | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BUSINESS_NAME | My Business | 商号，出现在对账单里 |
/// | ADMIN_PASSWORD | admin123 | 首次启动时 admin 账号的初始密码 |
/// | LOG_LEVEL | info | 日志级别 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志和上传的图片
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// Business name printed on statements
    pub business_name: String,
    /// Initial password for the seeded admin account
    pub admin_password: String,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| DEFAULT_WORK_DIR.into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            business_name: std::env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "My Business".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `<work_dir>/database/ledger.db`
    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.work_dir).join("database").join("ledger.db")
    }

    /// `<work_dir>/uploads` - item images, served under `/uploads/`
    pub fn uploads_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("uploads")
    }

    /// `<work_dir>/logs`
    pub fn logs_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    /// Create the work directory layout (database/, logs/, uploads/)
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(Path::new(&self.work_dir).join("database"))?;
        std::fs::create_dir_all(self.logs_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 设置运行环境 (dotenv, 日志)
///
/// 日志目录默认为 `<work_dir>/logs`，`LOG_DIR` 可覆盖。
pub fn setup_environment() -> std::io::Result<()> {
    // .env is optional; ignore a missing file
    let _ = dotenv::dotenv();

    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| DEFAULT_WORK_DIR.into());
        Path::new(&work_dir)
            .join("logs")
            .to_string_lossy()
            .into_owned()
    });
    logger::init_logger_with_file(level.as_deref(), Some(&log_dir));

    Ok(())
}
