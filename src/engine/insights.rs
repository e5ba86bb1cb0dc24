// ==========================================
// AutoTrac 作业分析系统 - 车队/分区洞察
// ==========================================
// 职责: 驾驶舱与报表使用的汇总指标
// 口径: 百分比均值忽略空值；zone 为空的行不参与分区洞察
// ==========================================

use crate::domain::{AggregatedRow, GlobalStatsRow, ShiftLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// 每台机器的平均使用率（跨班次，忽略空值）
fn machine_means<'a>(
    rows: impl IntoIterator<Item = &'a AggregatedRow>,
) -> BTreeMap<&'a str, Option<f64>> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let entry = grouped.entry(row.machine_id.as_str()).or_default();
        if let Some(p) = row.autotrac_pct {
            entry.push(p);
        }
    }
    grouped
        .into_iter()
        .map(|(machine, values)| (machine, mean(values)))
        .collect()
}

// ==========================================
// FleetInsights - 车队汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetInsights {
    pub total_machines: usize,
    /// 各班次全局使用率的均值
    pub average_pct: Option<f64>,
    pub total_harvest_hours: f64,
    pub machines_above_target: usize,
    pub machines_without_usage: usize,
    pub target_pct: f64,
    pub meets_target: bool,
}

// ==========================================
// ZoneInsight - 分区汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    NoUsage,      // 全部机器未使用
    PartialUsage, // 部分机器未使用
    FullUsage,    // 无未使用机器
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineScore {
    pub machine_id: String,
    pub shift_label: ShiftLabel,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneInsight {
    pub zone: i64,
    pub machine_count: usize,
    pub average_pct: Option<f64>,
    pub machines_above_target: usize,
    pub machines_without_usage: usize,
    pub best: Option<MachineScore>,
    pub worst: Option<MachineScore>,
    pub status: ZoneStatus,
    pub meets_target: bool,
}

pub struct InsightEngine {
    target_pct: f64,
}

impl InsightEngine {
    pub fn new(target_pct: f64) -> Self {
        Self { target_pct }
    }

    fn count_machines(&self, means: &BTreeMap<&str, Option<f64>>) -> (usize, usize) {
        let above = means
            .values()
            .filter(|m| matches!(m, Some(v) if *v >= self.target_pct))
            .count();
        let without = means.values().filter(|m| **m == Some(0.0)).count();
        (above, without)
    }

    pub fn fleet(&self, rows: &[AggregatedRow], global: &[GlobalStatsRow]) -> FleetInsights {
        let means = machine_means(rows);
        let (machines_above_target, machines_without_usage) = self.count_machines(&means);
        let average_pct = mean(global.iter().filter_map(|g| g.autotrac_pct));

        FleetInsights {
            total_machines: means.len(),
            average_pct,
            total_harvest_hours: global.iter().map(|g| g.harvest_utilization_hours).sum(),
            machines_above_target,
            machines_without_usage,
            target_pct: self.target_pct,
            meets_target: average_pct.map_or(false, |p| p >= self.target_pct),
        }
    }

    /// 各分区洞察，按分区号升序
    pub fn zones(&self, rows: &[AggregatedRow]) -> Vec<ZoneInsight> {
        let mut by_zone: BTreeMap<i64, Vec<&AggregatedRow>> = BTreeMap::new();
        for row in rows {
            if let Some(zone) = row.zone {
                by_zone.entry(zone).or_default().push(row);
            }
        }

        by_zone
            .into_iter()
            .map(|(zone, zone_rows)| self.zone(zone, &zone_rows))
            .collect()
    }

    fn zone(&self, zone: i64, rows: &[&AggregatedRow]) -> ZoneInsight {
        let means = machine_means(rows.iter().copied());
        let (machines_above_target, machines_without_usage) = self.count_machines(&means);
        let average_pct = mean(rows.iter().filter_map(|r| r.autotrac_pct));

        let mut best: Option<MachineScore> = None;
        let mut worst: Option<MachineScore> = None;
        for row in rows {
            let Some(pct) = row.autotrac_pct else { continue };
            let score = || MachineScore {
                machine_id: row.machine_id.clone(),
                shift_label: row.shift_label,
                pct,
            };
            if best.as_ref().map_or(true, |b| pct > b.pct) {
                best = Some(score());
            }
            if worst.as_ref().map_or(true, |w| pct < w.pct) {
                worst = Some(score());
            }
        }

        let status = if machines_without_usage == means.len() {
            ZoneStatus::NoUsage
        } else if machines_without_usage > 0 {
            ZoneStatus::PartialUsage
        } else {
            ZoneStatus::FullUsage
        };

        ZoneInsight {
            zone,
            machine_count: means.len(),
            average_pct,
            machines_above_target,
            machines_without_usage,
            best,
            worst,
            status,
            meets_target: average_pct.map_or(false, |p| p >= self.target_pct),
        }
    }
}
