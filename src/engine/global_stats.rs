// ==========================================
// AutoTrac 作业分析系统 - 全局统计归约
// ==========================================
// 职责: 仅按 shift_label 分组（忽略机器与分区）求和并派生比值
// 比值规则与聚合引擎一致（含 > 1 置空）
// ==========================================

use crate::domain::{AggregatedRow, GlobalStatsRow, ShiftLabel};
use crate::engine::ratio::utilization_pct;
use std::collections::BTreeMap;
use tracing::debug;

pub struct GlobalStatsReducer;

impl GlobalStatsReducer {
    pub fn new() -> Self {
        Self
    }

    /// 每个出现过的班次恰好一行，按班次顺序排列
    pub fn reduce(&self, rows: &[AggregatedRow]) -> Vec<GlobalStatsRow> {
        let mut totals: BTreeMap<ShiftLabel, (f64, f64)> = BTreeMap::new();
        for row in rows {
            let entry = totals.entry(row.shift_label).or_insert((0.0, 0.0));
            entry.0 += row.autotrac_active_hours;
            entry.1 += row.harvest_utilization_hours;
        }

        let stats: Vec<GlobalStatsRow> = totals
            .into_iter()
            .map(|(shift, (active, utilization))| {
                GlobalStatsRow::new(shift, active, utilization, utilization_pct(active, utilization))
            })
            .collect();

        debug!(shifts = stats.len(), "全局统计完成");
        stats
    }
}

impl Default for GlobalStatsReducer {
    fn default() -> Self {
        Self::new()
    }
}
