// ==========================================
// AutoTrac 作业分析系统 - 分区补全引擎
// ==========================================
// 职责: 聚合行 LEFT JOIN 分区对照表（按 trim 后的 machine_id）
// 红线: 未匹配的机器保留，zone = None，不丢行
// ==========================================

use crate::domain::{AggregatedRow, ZoneLookup};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// 分区补全结果
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutput {
    pub rows: Vec<AggregatedRow>,
    /// zone 为空的聚合行数
    pub zone_misses: usize,
    /// 对照表中不存在的机器（去重、排序）
    pub unmatched_machines: Vec<String>,
}

pub struct ZoneEnricher;

impl ZoneEnricher {
    pub fn new() -> Self {
        Self
    }

    pub fn enrich(&self, rows: Vec<AggregatedRow>, lookup: &ZoneLookup) -> EnrichmentOutput {
        let mut unmatched: BTreeSet<String> = BTreeSet::new();
        let mut zone_misses = 0usize;

        let rows: Vec<AggregatedRow> = rows
            .into_iter()
            .map(|mut row| {
                row.machine_id = row.machine_id.trim().to_string();
                row.zone = lookup.zone_of(&row.machine_id);
                if row.zone.is_none() {
                    zone_misses += 1;
                    if !lookup.contains(&row.machine_id) {
                        unmatched.insert(row.machine_id.clone());
                    }
                }
                row
            })
            .collect();

        if !unmatched.is_empty() {
            warn!(
                machines = unmatched.len(),
                sample = ?unmatched.iter().take(5).collect::<Vec<_>>(),
                "部分机器未在分区对照表中找到"
            );
        }
        debug!(rows = rows.len(), zone_misses, "分区补全完成");

        EnrichmentOutput {
            rows,
            zone_misses,
            unmatched_machines: unmatched.into_iter().collect(),
        }
    }
}

impl Default for ZoneEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShiftLabel;

    fn agg(machine: &str, shift: ShiftLabel) -> AggregatedRow {
        AggregatedRow {
            machine_id: machine.to_string(),
            shift_label: shift,
            autotrac_active_hours: 1.0,
            harvest_utilization_hours: 2.0,
            autotrac_pct: Some(0.5),
            zone: None,
        }
    }

    #[test]
    fn test_left_join_keeps_unmatched() {
        let lookup: ZoneLookup = vec![("T-100".to_string(), Some(1))].into_iter().collect();
        let rows = vec![
            agg("T-100", ShiftLabel::Early),
            agg("T-100", ShiftLabel::Mid),
            agg("T-300", ShiftLabel::Early),
        ];

        let out = ZoneEnricher::new().enrich(rows, &lookup);

        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[0].zone, Some(1));
        assert_eq!(out.rows[1].zone, Some(1));
        assert_eq!(out.rows[2].zone, None);
        assert_eq!(out.zone_misses, 1);
        assert_eq!(out.unmatched_machines, vec!["T-300".to_string()]);
    }

    #[test]
    fn test_join_normalizes_whitespace() {
        let lookup: ZoneLookup = vec![(" T-100  ".to_string(), Some(4))].into_iter().collect();
        let out = ZoneEnricher::new().enrich(vec![agg("T-100 ", ShiftLabel::Day)], &lookup);
        assert_eq!(out.rows[0].machine_id, "T-100");
        assert_eq!(out.rows[0].zone, Some(4));
    }

    #[test]
    fn test_known_machine_with_invalid_zone_is_null_but_not_unmatched() {
        let lookup: ZoneLookup = vec![("T-100".to_string(), None)].into_iter().collect();
        let out = ZoneEnricher::new().enrich(vec![agg("T-100", ShiftLabel::Day)], &lookup);
        assert_eq!(out.rows[0].zone, None);
        assert_eq!(out.zone_misses, 1);
        assert!(out.unmatched_machines.is_empty());
    }
}
