// ==========================================
// AutoTrac 作业分析系统 - API 层
// ==========================================
// 职责: 对外业务接口（CLI / 展示层调用）
// ==========================================

pub mod analysis_api;
pub mod error;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, InsightsResponse};
pub use error::{ApiError, ApiResult};
