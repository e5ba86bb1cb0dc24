// ==========================================
// AutoTrac 作业分析系统 - 分析流水线编排器
// ==========================================
// 职责: 协调加载 → 聚合 → 分区补全 → 全局统计的执行顺序
// 红线: 任一输入文件失败即整体失败，不产生部分结果
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::{AnalysisResult, PipelineStats};
use crate::engine::aggregator::Aggregator;
use crate::engine::global_stats::GlobalStatsReducer;
use crate::engine::insights::{FleetInsights, InsightEngine, ZoneInsight};
use crate::engine::zone_enricher::ZoneEnricher;
use crate::importer::{
    ImportResult, PipelineInputs, RuleBasedColumnResolver, ShiftLoader, UniversalFileParser,
    ZoneLoader,
};
use chrono::Utc;
use tracing::{debug, info, instrument};

// ==========================================
// AnalysisPipeline - 分析流水线
// ==========================================
pub struct AnalysisPipeline {
    shift_loader: ShiftLoader,
    zone_loader: ZoneLoader,
    aggregator: Aggregator,
    enricher: ZoneEnricher,
    reducer: GlobalStatsReducer,
    insights: InsightEngine,
}

impl AnalysisPipeline {
    /// 按配置创建流水线
    ///
    /// # 参数
    /// - config: 流水线配置（列名词表、目标使用率）
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_loaders(
            ShiftLoader::new(
                Box::new(UniversalFileParser),
                Box::new(RuleBasedColumnResolver::from_config(config)),
            ),
            ZoneLoader::new(
                Box::new(UniversalFileParser),
                Box::new(RuleBasedColumnResolver::from_config(config)),
            ),
            config.target_pct,
        )
    }

    /// 使用自定义加载器创建（测试或替换解析器时使用）
    pub fn with_loaders(shift_loader: ShiftLoader, zone_loader: ZoneLoader, target_pct: f64) -> Self {
        Self {
            shift_loader,
            zone_loader,
            aggregator: Aggregator::new(),
            enricher: ZoneEnricher::new(),
            reducer: GlobalStatsReducer::new(),
            insights: InsightEngine::new(target_pct),
        }
    }

    /// 执行完整分析流程
    ///
    /// # 参数
    /// - inputs: 班次模式与各槽位文件
    ///
    /// # 返回
    /// 聚合行（含分区）+ 全局统计；任一文件失败返回 Err
    #[instrument(skip(self, inputs), fields(mode = %inputs.mode))]
    pub fn run(&self, inputs: &PipelineInputs) -> ImportResult<AnalysisResult> {
        inputs.validate()?;
        info!(shift_files = inputs.shift_files.len(), "开始执行分析流程");

        // 步骤1: 全部输入文件先解析完成，再进入计算
        debug!("步骤1: 加载班次表");
        let loaded = self.shift_loader.load_all(inputs)?;

        debug!("步骤2: 加载分区对照表");
        let lookup = self.zone_loader.load(inputs.zone_path()?)?;

        // 步骤3: (machine_id, shift_label) 分组聚合
        debug!("步骤3: 分组聚合");
        let aggregated = self.aggregator.aggregate(&loaded.rows);

        // 步骤4: LEFT JOIN 分区
        debug!("步骤4: 分区补全");
        let enriched = self.enricher.enrich(aggregated.rows, &lookup);

        // 步骤5: 班次全局统计
        debug!("步骤5: 全局统计");
        let global_stats = self.reducer.reduce(&enriched.rows);

        let stats = PipelineStats {
            input_rows: loaded.input_rows,
            dropped_rows: loaded.dropped_rows,
            coerced_cells: loaded.coerced_cells,
            aggregated_rows: enriched.rows.len(),
            invalid_ratio_rows: aggregated.overflow_rows,
            zone_misses: enriched.zone_misses,
        };

        info!(
            aggregated_rows = stats.aggregated_rows,
            invalid_ratio_rows = stats.invalid_ratio_rows,
            zone_misses = stats.zone_misses,
            "分析流程完成"
        );

        Ok(AnalysisResult {
            mode: inputs.mode,
            rows: enriched.rows,
            global_stats,
            stats,
            generated_at: Utc::now(),
        })
    }

    /// 基于分析结果计算车队与分区洞察
    pub fn insights(&self, result: &AnalysisResult) -> (FleetInsights, Vec<ZoneInsight>) {
        (
            self.insights.fleet(&result.rows, &result.global_stats),
            self.insights.zones(&result.rows),
        )
    }
}
