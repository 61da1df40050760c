//! 认证授权模块
//!
//! 提供 JWT 认证和路由守卫中间件：
//! - [`JwtService`] - JWT 令牌服务（员工 + 客户）
//! - [`CurrentUser`] - 当前主体上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_staff`] / [`require_admin`] / [`require_customer`] - 角色守卫

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_customer, require_staff};
