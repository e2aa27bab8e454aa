//! SISystem - 多租户学校管理平台后端服务
//!
//! 基于 Actix Web 构建，面向印尼中小学的学籍、教职工、考勤与成绩管理。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `identity`: 身份提供方（登录凭据与找回密码）
//! - `mailer`: 邮件发送（Mailjet 主通道，Resend 备用）
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM，按学校隔离）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod identity;
pub mod mailer;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
