// ==========================================
// AutoTrac 作业分析系统 - 利用率领域模型
// ==========================================
// CanonicalRow: 列名解析后的中间行（仅在合并阶段存在）
// AggregatedRow / GlobalStatsRow: 流水线输出，会话内持有
// ==========================================

use crate::domain::types::{ScheduleMode, ShiftLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 全局统计行的 machine_id / zone 哨兵值
pub const GLOBAL_SENTINEL: &str = "Global";

// ==========================================
// CanonicalRow - 规范化班次行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub machine_id: String,            // 已 trim
    pub autotrac_active_hours: f64,     // >= 0，无法解析记为 0
    pub harvest_utilization_hours: f64, // >= 0，无法解析记为 0
    pub shift_label: ShiftLabel,
}

// ==========================================
// AggregatedRow - (机器, 班次) 聚合行
// ==========================================
// 不变量: (machine_id, shift_label) 在集合内唯一
// autotrac_pct: None 表示无数据（分母为 0 或比值 > 1）
// zone: None 表示分区对照表无匹配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub machine_id: String,
    pub shift_label: ShiftLabel,
    pub autotrac_active_hours: f64,
    pub harvest_utilization_hours: f64,
    pub autotrac_pct: Option<f64>,
    pub zone: Option<i64>,
}

// ==========================================
// GlobalStatsRow - 班次全局统计
// ==========================================
// 每个班次一行，忽略机器与分区
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatsRow {
    pub machine_id: String, // 恒为 "Global"
    pub shift_label: ShiftLabel,
    pub autotrac_active_hours: f64,
    pub harvest_utilization_hours: f64,
    pub autotrac_pct: Option<f64>,
    pub zone: String, // 恒为 "Global"
}

impl GlobalStatsRow {
    pub fn new(
        shift_label: ShiftLabel,
        autotrac_active_hours: f64,
        harvest_utilization_hours: f64,
        autotrac_pct: Option<f64>,
    ) -> Self {
        Self {
            machine_id: GLOBAL_SENTINEL.to_string(),
            shift_label,
            autotrac_active_hours,
            harvest_utilization_hours,
            autotrac_pct,
            zone: GLOBAL_SENTINEL.to_string(),
        }
    }
}

// ==========================================
// ZoneLookup - 机器 → 分区对照
// ==========================================
// 值为 None: 对照表中存在该机器，但分区值不是整数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneLookup {
    entries: HashMap<String, Option<i64>>,
}

impl ZoneLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记机器分区；同一机器重复出现时保留首条，返回 false
    pub fn insert(&mut self, machine_id: &str, zone: Option<i64>) -> bool {
        let key = machine_id.trim().to_string();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, zone);
        true
    }

    /// 查询机器分区（未匹配或分区值无效均返回 None）
    pub fn zone_of(&self, machine_id: &str) -> Option<i64> {
        self.entries.get(machine_id.trim()).copied().flatten()
    }

    pub fn contains(&self, machine_id: &str) -> bool {
        self.entries.contains_key(machine_id.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<i64>)> for ZoneLookup {
    fn from_iter<I: IntoIterator<Item = (String, Option<i64>)>>(iter: I) -> Self {
        let mut lookup = ZoneLookup::new();
        for (machine_id, zone) in iter {
            lookup.insert(&machine_id, zone);
        }
        lookup
    }
}

// ==========================================
// PipelineStats - 流水线运行统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub input_rows: usize,         // 各班次表合计数据行
    pub dropped_rows: usize,       // 机器号为空被丢弃的行
    pub coerced_cells: usize,      // 无法解析被记为 0 的工时单元格
    pub aggregated_rows: usize,    // 聚合后 (机器, 班次) 行数
    pub invalid_ratio_rows: usize, // 比值 > 1 被置空的行
    pub zone_misses: usize,        // 未匹配分区的聚合行
}

// ==========================================
// AnalysisResult - 一次分析的完整输出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub mode: ScheduleMode,
    pub rows: Vec<AggregatedRow>,
    pub global_stats: Vec<GlobalStatsRow>,
    pub stats: PipelineStats,
    pub generated_at: DateTime<Utc>,
}
