// ==========================================
// AutoTrac 作业分析系统 - 班次聚合引擎
// ==========================================
// 职责: 合并各班次行 → 按 (machine_id, shift_label) 分组求和 → 派生比值
// 输出: 按机器号、班次顺序排序；zone 待分区引擎填充
// ==========================================

use crate::domain::{AggregatedRow, CanonicalRow, ShiftLabel};
use crate::engine::ratio::RatioOutcome;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Default, Clone, Copy)]
struct HourTotals {
    active: f64,
    utilization: f64,
}

/// 聚合输出
#[derive(Debug, Clone, Default)]
pub struct AggregationOutput {
    pub rows: Vec<AggregatedRow>,
    /// 比值 > 1 被置空的行数
    pub overflow_rows: usize,
}

pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// 分组聚合
    ///
    /// 不变量: 输出中 (machine_id, shift_label) 唯一
    #[instrument(skip(self, rows), fields(input_rows = rows.len()))]
    pub fn aggregate(&self, rows: &[CanonicalRow]) -> AggregationOutput {
        let mut groups: BTreeMap<(String, ShiftLabel), HourTotals> = BTreeMap::new();

        for row in rows {
            let totals = groups
                .entry((row.machine_id.trim().to_string(), row.shift_label))
                .or_default();
            totals.active += row.autotrac_active_hours;
            totals.utilization += row.harvest_utilization_hours;
        }

        let mut output = AggregationOutput::default();
        for ((machine_id, shift_label), totals) in groups {
            let outcome = RatioOutcome::derive(totals.active, totals.utilization);
            if outcome.is_overflow() {
                debug!(machine_id = %machine_id, shift = %shift_label, "比值 > 1，置空");
                output.overflow_rows += 1;
            }

            output.rows.push(AggregatedRow {
                machine_id,
                shift_label,
                autotrac_active_hours: totals.active,
                harvest_utilization_hours: totals.utilization,
                autotrac_pct: outcome.pct(),
                zone: None,
            });
        }

        debug!(groups = output.rows.len(), overflow = output.overflow_rows, "聚合完成");
        output
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn row(machine: &str, shift: ShiftLabel, active: f64, util: f64) -> CanonicalRow {
        CanonicalRow {
            machine_id: machine.to_string(),
            autotrac_active_hours: active,
            harvest_utilization_hours: util,
            shift_label: shift,
        }
    }

    #[test]
    fn test_single_row_half() {
        let out = Aggregator::new().aggregate(&[row("T-100", ShiftLabel::Early, 5.0, 10.0)]);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].autotrac_pct, Some(0.5));
        assert_eq!(out.rows[0].zone, None);
    }

    #[test]
    fn test_zero_utilization_is_null() {
        let out = Aggregator::new().aggregate(&[row("T-100", ShiftLabel::Early, 5.0, 0.0)]);
        assert_eq!(out.rows[0].autotrac_pct, None);
        assert_eq!(out.overflow_rows, 0);
    }

    #[test]
    fn test_overflow_is_null() {
        let out = Aggregator::new().aggregate(&[row("T-100", ShiftLabel::Early, 12.0, 10.0)]);
        assert_eq!(out.rows[0].autotrac_pct, None);
        assert_eq!(out.overflow_rows, 1);
    }

    #[test]
    fn test_sums_within_group_and_keeps_shifts_apart() {
        let out = Aggregator::new().aggregate(&[
            row("T-200", ShiftLabel::Early, 1.0, 2.0),
            row("T-200", ShiftLabel::Early, 2.0, 4.0),
            row("T-200", ShiftLabel::Mid, 2.0, 4.0),
            row("T-100", ShiftLabel::Late, 0.0, 3.0),
        ]);

        assert_eq!(out.rows.len(), 3);
        // 排序: 机器号，其次班次顺序
        assert_eq!(out.rows[0].machine_id, "T-100");
        assert_eq!(out.rows[1].shift_label, ShiftLabel::Early);
        assert_eq!(out.rows[1].autotrac_active_hours, 3.0);
        assert_eq!(out.rows[1].harvest_utilization_hours, 6.0);
        assert_eq!(out.rows[1].autotrac_pct, Some(0.5));
        assert_eq!(out.rows[2].shift_label, ShiftLabel::Mid);
        assert_eq!(out.rows[2].autotrac_pct, Some(0.5));
    }

    #[test]
    fn test_group_keys_unique_and_sum_preserved() {
        let input: Vec<CanonicalRow> = (0..60)
            .map(|i| {
                let shift = [ShiftLabel::Early, ShiftLabel::Mid, ShiftLabel::Late][i % 3];
                row(&format!("M-{}", i % 7), shift, (i % 5) as f64 * 0.7, 4.0)
            })
            .collect();

        let out = Aggregator::new().aggregate(&input);

        let keys: HashSet<(String, ShiftLabel)> = out
            .rows
            .iter()
            .map(|r| (r.machine_id.clone(), r.shift_label))
            .collect();
        assert_eq!(keys.len(), out.rows.len());

        for m in 0..7 {
            let id = format!("M-{}", m);
            let raw: f64 = input
                .iter()
                .filter(|r| r.machine_id == id)
                .map(|r| r.autotrac_active_hours)
                .sum();
            let aggregated: f64 = out
                .rows
                .iter()
                .filter(|r| r.machine_id == id)
                .map(|r| r.autotrac_active_hours)
                .sum();
            assert!((raw - aggregated).abs() < 1e-9);
        }

        for r in &out.rows {
            if r.harvest_utilization_hours == 0.0 {
                assert!(r.autotrac_pct.is_none());
            }
            if let Some(p) = r.autotrac_pct {
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
