//! Ledger Server - 小商户记账系统后端
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT + Argon2，员工令牌与客户令牌分离
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **HTTP API** (`api`): RESTful 接口（客户、商品、交易、看板、报表、门户）
//! - **对账单** (`statement`): JSON / PDF / WhatsApp 三种输出
//!
//! # 模块结构
//!
//! ```text
//! ledger-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (repository)
//! ├── statement/     # 对账单构建与渲染
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod statement;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, setup_environment};
pub use utils::{AppError, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __              __
   / /   ___  ____/ /___ ____  _____
  / /   / _ \/ __  / __ `/ _ \/ ___/
 / /___/  __/ /_/ / /_/ /  __/ /
/_____/\___/\__,_/\__, /\___/_/
                 /____/
       Ledger Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
