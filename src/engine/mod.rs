// ==========================================
// AutoTrac 作业分析系统 - 引擎层
// ==========================================
// 职责: 聚合、比值派生、分区补全、全局统计、洞察
// 红线: 引擎不读文件；输入一律来自 importer 产出的 CanonicalRow
// ==========================================

pub mod aggregator;
pub mod global_stats;
pub mod insights;
pub mod orchestrator;
pub mod ratio;
pub mod zone_enricher;

// 重导出核心引擎
pub use aggregator::{AggregationOutput, Aggregator};
pub use global_stats::GlobalStatsReducer;
pub use insights::{FleetInsights, InsightEngine, MachineScore, ZoneInsight, ZoneStatus};
pub use orchestrator::AnalysisPipeline;
pub use ratio::{utilization_pct, RatioOutcome};
pub use zone_enricher::{EnrichmentOutput, ZoneEnricher};
