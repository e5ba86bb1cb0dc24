// ==========================================
// AutoTrac 作业分析系统 - 流水线配置
// ==========================================
// 职责: 列名解析词表 / 目标阈值 / 默认班次模式
// 存储: JSON 文件（缺省字段取默认值）
// ==========================================

use crate::domain::ScheduleMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("无法确定配置目录")]
    NoConfigDir,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ==========================================
// ResolverVocabulary - 列名解析词表
// ==========================================
// 全部按子串包含匹配（表头已小写 + 下划线化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverVocabulary {
    /// 机器号列同义词（西语/英语变体）
    pub machine_synonyms: Vec<String>,
    /// AutoTrac 工时列: 需同时命中 autotrac_tokens 与 active_tokens
    pub autotrac_tokens: Vec<String>,
    pub active_tokens: Vec<String>,
    /// 收割利用工时列: 需同时命中 utilization_tokens 与 harvest_tokens
    pub utilization_tokens: Vec<String>,
    pub harvest_tokens: Vec<String>,
    /// 分区列（源术语 "alce"）
    pub zone_tokens: Vec<String>,
}

impl Default for ResolverVocabulary {
    fn default() -> Self {
        Self {
            machine_synonyms: words(&["maquina", "máquina", "equipo", "unidad", "machine"]),
            autotrac_tokens: words(&["autotrac"]),
            active_tokens: words(&["activo", "active"]),
            utilization_tokens: words(&["utilizac", "utiliz"]),
            harvest_tokens: words(&["cosecha", "harvest"]),
            zone_tokens: words(&["alce", "zone", "zona"]),
        }
    }
}

impl ResolverVocabulary {
    fn groups(&self) -> [(&'static str, &Vec<String>); 6] {
        [
            ("machine_synonyms", &self.machine_synonyms),
            ("autotrac_tokens", &self.autotrac_tokens),
            ("active_tokens", &self.active_tokens),
            ("utilization_tokens", &self.utilization_tokens),
            ("harvest_tokens", &self.harvest_tokens),
            ("zone_tokens", &self.zone_tokens),
        ]
    }
}

// ==========================================
// PipelineConfig - 流水线配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CLI 未指定时使用的班次模式
    pub default_mode: ScheduleMode,
    /// AutoTrac 使用率目标（洞察统计用）
    pub target_pct: f64,
    pub vocabulary: ResolverVocabulary,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_mode: ScheduleMode::EightHour,
            target_pct: 0.9,
            vocabulary: ResolverVocabulary::default(),
        }
    }
}

impl PipelineConfig {
    /// 校验配置: 词表非空且不含空白词，target_pct ∈ (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_pct > 0.0 && self.target_pct <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "target_pct".to_string(),
                message: format!("{} 不在 (0, 1] 范围内", self.target_pct),
            });
        }

        for (key, tokens) in self.vocabulary.groups() {
            if tokens.is_empty() || tokens.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("vocabulary.{}", key),
                    message: "词表不能为空，且不能包含空白词".to_string(),
                });
            }
        }

        Ok(())
    }
}
