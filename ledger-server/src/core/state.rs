use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::staff;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (database/, logs/, uploads/)
    /// 2. 数据库 (work_dir/database/ledger.db, 自动迁移)
    /// 3. 初始 admin 账号 (staff 表为空时)
    /// 4. JWT 服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db = DbService::new(db_path.to_str().expect("Non-UTF8 database path"))
            .await
            .expect("Failed to initialize database");

        seed_default_admin(&db.pool, &config.admin_password)
            .await
            .expect("Failed to seed default admin account");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db, jwt_service)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}

/// Create the default admin account when the staff table is empty.
///
/// Password comes from `ADMIN_PASSWORD`; operators are expected to change it
/// after first login.
async fn seed_default_admin(
    pool: &SqlitePool,
    password: &str,
) -> Result<(), crate::db::repository::RepoError> {
    if staff::count(pool).await? > 0 {
        return Ok(());
    }

    let admin = staff::create(
        pool,
        "admin",
        "Administrator",
        shared::models::StaffRole::Admin.as_str(),
        password,
    )
    .await?;
    tracing::info!(username = %admin.username, "Seeded default admin account");
    Ok(())
}
