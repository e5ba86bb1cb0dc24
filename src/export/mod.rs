// ==========================================
// AutoTrac 作业分析系统 - 结果导出
// ==========================================
// 职责: 聚合表 / 全局表 → CSV 或 JSON；完整分析报告 → JSON
// 口径: CSV 中空值（pct / zone）写为空单元格，JSON 中写为 null
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{AggregatedRow, AnalysisResult, GlobalStatsRow, PipelineStats, ScheduleMode};
use crate::engine::{FleetInsights, ZoneInsight};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// 表格导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

// ==========================================
// AnalysisReport - 交给展示层的完整报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: ScheduleMode,
    pub generated_at: DateTime<Utc>,
    pub stats: PipelineStats,
    pub rows: Vec<AggregatedRow>,
    pub global_stats: Vec<GlobalStatsRow>,
    pub fleet: FleetInsights,
    pub zones: Vec<ZoneInsight>,
}

impl AnalysisReport {
    pub fn new(result: &AnalysisResult, fleet: FleetInsights, zones: Vec<ZoneInsight>) -> Self {
        Self {
            mode: result.mode,
            generated_at: result.generated_at,
            stats: result.stats.clone(),
            rows: result.rows.clone(),
            global_stats: result.global_stats.clone(),
            fleet,
            zones,
        }
    }
}

/// 任意可序列化行写为 CSV（首行为字段名）
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .map_err(|e| ApiError::Export(format!("CSV 写入失败: {}", e)))?;
    Ok(())
}

/// 美化 JSON
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> ApiResult<()> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

pub fn write_table<W: Write, T: Serialize>(writer: W, rows: &[T], format: ExportFormat) -> ApiResult<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, rows),
        ExportFormat::Json => write_json(writer, rows),
    }
}

/// 两张表写入同一 CSV 流: 聚合表，空行，全局统计表
pub fn write_tables_csv<W: Write>(mut writer: W, report: &AnalysisReport) -> ApiResult<()> {
    write_csv(&mut writer, &report.rows)?;
    writeln!(writer).map_err(|e| ApiError::Export(format!("CSV 写入失败: {}", e)))?;
    write_csv(&mut writer, &report.global_stats)
}

fn create_file(path: &Path) -> ApiResult<File> {
    File::create(path)
        .map_err(|e| ApiError::Export(format!("无法创建文件 {}: {}", path.display(), e)))
}

/// 导出到目录
///
/// # 输出文件
/// - autotrac_<mode>_machines.<ext>: 按 (机器, 班次) 聚合表
/// - autotrac_<mode>_global.<ext>: 班次全局统计
/// - autotrac_<mode>_report.json: 完整报告
///
/// # 返回
/// 写出的文件路径
pub fn export_to_dir(dir: &Path, report: &AnalysisReport, format: ExportFormat) -> ApiResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .map_err(|e| ApiError::Export(format!("无法创建目录 {}: {}", dir.display(), e)))?;

    let prefix = format!("autotrac_{}", report.mode);
    let machines_path = dir.join(format!("{}_machines.{}", prefix, format.extension()));
    let global_path = dir.join(format!("{}_global.{}", prefix, format.extension()));
    let report_path = dir.join(format!("{}_report.json", prefix));

    write_table(create_file(&machines_path)?, &report.rows, format)?;
    write_table(create_file(&global_path)?, &report.global_stats, format)?;
    write_json(create_file(&report_path)?, report)?;

    info!(dir = %dir.display(), format = format.extension(), "分析结果已导出");
    Ok(vec![machines_path, global_path, report_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShiftLabel;

    fn rows() -> Vec<AggregatedRow> {
        vec![
            AggregatedRow {
                machine_id: "T-100".to_string(),
                shift_label: ShiftLabel::Early,
                autotrac_active_hours: 5.0,
                harvest_utilization_hours: 10.0,
                autotrac_pct: Some(0.5),
                zone: Some(1),
            },
            AggregatedRow {
                machine_id: "T-300".to_string(),
                shift_label: ShiftLabel::Late,
                autotrac_active_hours: 12.0,
                harvest_utilization_hours: 10.0,
                autotrac_pct: None,
                zone: None,
            },
        ]
    }

    #[test]
    fn test_csv_nulls_are_empty_cells() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "machine_id,shift_label,autotrac_active_hours,harvest_utilization_hours,autotrac_pct,zone"
        );
        assert_eq!(lines[1], "T-100,early,5.0,10.0,0.5,1");
        assert_eq!(lines[2], "T-300,late,12.0,10.0,,");
    }

    #[test]
    fn test_json_nulls() {
        let mut buf = Vec::new();
        write_json(&mut buf, &rows()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["shift_label"], "early");
        assert!(value[1]["autotrac_pct"].is_null());
        assert!(value[1]["zone"].is_null());
    }

    #[test]
    fn test_global_csv_uses_sentinel() {
        let global = vec![GlobalStatsRow::new(ShiftLabel::Day, 3.0, 6.0, Some(0.5))];
        let mut buf = Vec::new();
        write_csv(&mut buf, &global).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("Global,day,"));
        assert!(text.lines().nth(1).unwrap().ends_with(",Global"));
    }

    #[test]
    fn test_combined_csv_carries_both_tables() {
        let result = AnalysisResult {
            mode: ScheduleMode::EightHour,
            rows: rows(),
            global_stats: vec![GlobalStatsRow::new(ShiftLabel::Early, 5.0, 10.0, Some(0.5))],
            stats: PipelineStats::default(),
            generated_at: Utc::now(),
        };
        let report = AnalysisReport::new(&result, sample_fleet(), Vec::new());

        let mut buf = Vec::new();
        write_tables_csv(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let sections: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].lines().count(), 3);
        assert!(sections[1].starts_with("machine_id,shift_label,"));
        assert!(sections[1].lines().nth(1).unwrap().starts_with("Global,early,"));
    }

    fn sample_fleet() -> FleetInsights {
        FleetInsights {
            total_machines: 2,
            average_pct: Some(0.5),
            total_harvest_hours: 10.0,
            machines_above_target: 0,
            machines_without_usage: 0,
            target_pct: 0.9,
            meets_target: false,
        }
    }
}
