// ==========================================
// AutoTrac 作业分析系统 - 应用层
// ==========================================
// 职责: 会话级共享状态
// ==========================================

pub mod state;

// 重导出
pub use state::SessionStore;
