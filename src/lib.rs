// ==========================================
// AutoTrac 作业分析系统 - 核心库
// ==========================================
// 职责: 班次日志导入 → 规范化 → 聚合 → 分区补全 → 全局统计
// 系统定位: 分析结果交给外部展示层（图表 / PDF）渲染
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 聚合规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 应用层 - 会话状态
pub mod app;

// API 层 - 业务接口
pub mod api;

// 导出层 - CSV / JSON
pub mod export;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AggregatedRow, AnalysisResult, CanonicalRow, GlobalStatsRow, PipelineStats, ScheduleMode,
    ShiftLabel, ZoneLookup, GLOBAL_SENTINEL,
};

// 导入
pub use importer::{ImportError, ImportResult, PipelineInputs};

// 引擎
pub use engine::{
    AnalysisPipeline, Aggregator, FleetInsights, GlobalStatsReducer, ZoneEnricher, ZoneInsight,
};

// 配置
pub use config::{ConfigManager, PipelineConfig};

// API
pub use api::{AnalysisApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "AutoTrac 作业分析系统";
