// ==========================================
// AutoTrac 作业分析系统 - 配置层
// ==========================================
// 职责: 流水线配置加载与校验
// 存储: JSON 文件
// ==========================================

pub mod config_manager;
pub mod pipeline_config;

// 重导出核心配置类型
pub use config_manager::ConfigManager;
pub use pipeline_config::{ConfigError, PipelineConfig, ResolverVocabulary};
