// ==========================================
// AutoTrac 作业分析系统 - 领域模型层
// ==========================================
// 职责: 定义表格、班次、聚合结果等领域类型
// 红线: 不含文件读取逻辑,不含聚合逻辑
// ==========================================

pub mod table;
pub mod types;
pub mod utilization;

// 重导出核心类型
pub use table::{CellValue, RawTable};
pub use types::{ScheduleMode, ShiftLabel};
pub use utilization::{
    AggregatedRow, AnalysisResult, CanonicalRow, GlobalStatsRow, PipelineStats, ZoneLookup,
    GLOBAL_SENTINEL,
};
