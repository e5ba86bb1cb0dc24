// ==========================================
// AutoTrac 作业分析系统 - 分析API
// ==========================================
// 职责: 会话管理 + 运行流水线 + 结果/洞察/导出
// 红线: 运行前先清空会话旧结果，仅在成功时写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::SessionStore;
use crate::config::PipelineConfig;
use crate::domain::AnalysisResult;
use crate::engine::{AnalysisPipeline, FleetInsights, ZoneInsight};
use crate::export::{self, AnalysisReport, ExportFormat};
use crate::importer::PipelineInputs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 车队与分区洞察
#[derive(Debug, Clone, serde::Serialize)]
pub struct InsightsResponse {
    pub fleet: FleetInsights,
    pub zones: Vec<ZoneInsight>,
}

// ==========================================
// AnalysisApi
// ==========================================
pub struct AnalysisApi {
    pipeline: AnalysisPipeline,
    sessions: SessionStore,
}

impl AnalysisApi {
    /// 创建API实例
    ///
    /// # 参数
    /// - config: 流水线配置（会先校验）
    pub fn new(config: &PipelineConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self::with_store(config, SessionStore::new()))
    }

    /// 使用共享会话存储创建
    pub fn with_store(config: &PipelineConfig, sessions: SessionStore) -> Self {
        Self {
            pipeline: AnalysisPipeline::new(config),
            sessions,
        }
    }

    pub fn open_session(&self) -> ApiResult<Uuid> {
        self.sessions.open_session()
    }

    pub fn close_session(&self, session_id: Uuid) -> ApiResult<()> {
        self.sessions.close_session(session_id)
    }

    /// 运行分析流水线
    ///
    /// # 返回
    /// - Ok: 结果已写入会话
    /// - Err: 会话结果保持为空（不保留上一次结果）
    #[instrument(skip(self, inputs), fields(session_id = %session_id))]
    pub fn run_analysis(&self, session_id: Uuid, inputs: &PipelineInputs) -> ApiResult<Arc<AnalysisResult>> {
        self.sessions.clear(session_id)?;

        let result = self.pipeline.run(inputs).map_err(|e| {
            error!(error = %e, "分析流程失败");
            ApiError::from(e)
        })?;

        self.sessions.store(session_id, result)?;
        info!("分析结果已写入会话");
        self.sessions.get(session_id)
    }

    /// 重置会话（清空结果）
    pub fn reset(&self, session_id: Uuid) -> ApiResult<()> {
        self.sessions.clear(session_id)?;
        info!(session_id = %session_id, "会话已重置");
        Ok(())
    }

    pub fn results(&self, session_id: Uuid) -> ApiResult<Arc<AnalysisResult>> {
        self.sessions.get(session_id)
    }

    pub fn insights(&self, session_id: Uuid) -> ApiResult<InsightsResponse> {
        let result = self.sessions.get(session_id)?;
        let (fleet, zones) = self.pipeline.insights(&result);
        Ok(InsightsResponse { fleet, zones })
    }

    /// 组装完整报告
    pub fn report(&self, session_id: Uuid) -> ApiResult<AnalysisReport> {
        let result = self.sessions.get(session_id)?;
        let (fleet, zones) = self.pipeline.insights(&result);
        Ok(AnalysisReport::new(&result, fleet, zones))
    }

    /// 导出会话结果到目录
    pub fn export(&self, session_id: Uuid, dir: &Path, format: ExportFormat) -> ApiResult<Vec<PathBuf>> {
        let report = self.report(session_id)?;
        export::export_to_dir(dir, &report, format)
    }
}
