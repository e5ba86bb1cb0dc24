// ==========================================
// 分析流水线集成测试
// ==========================================
// 覆盖: 文件 → 列名解析 → 聚合 → 分区补全 → 全局统计 → 会话
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use autotrac_analytics::api::{AnalysisApi, ApiError};
use autotrac_analytics::config::PipelineConfig;
use autotrac_analytics::export::ExportFormat;
use autotrac_analytics::importer::ImportError;
use autotrac_analytics::{logging, AnalysisPipeline, PipelineInputs, ScheduleMode, ShiftLabel};
use std::collections::HashSet;
use test_helpers::{shift_csv, write_csv, write_xlsx, zone_csv, XlsxCell};

fn pipeline() -> AnalysisPipeline {
    AnalysisPipeline::new(&PipelineConfig::default())
}

fn row<'a>(
    rows: &'a [autotrac_analytics::AggregatedRow],
    machine: &str,
    shift: ShiftLabel,
) -> &'a autotrac_analytics::AggregatedRow {
    rows.iter()
        .find(|r| r.machine_id == machine && r.shift_label == shift)
        .unwrap_or_else(|| panic!("缺少行 ({}, {})", machine, shift))
}

// ==========================================
// 8 小时模式: 比值规则 / 分组 / 分区 / 全局
// ==========================================

#[test]
fn test_eight_hour_pipeline_end_to_end() {
    logging::init_test();

    let early = shift_csv(&[
        ("T-100", "5", "10"), // 0.5
        ("T-200", "3", "6"),
        ("T-300", "1", "4"),
    ]);
    let mid = shift_csv(&[
        ("T-100", "4", "0"), // 分母为 0
        ("T-200", "2", "4"),
    ]);
    let late = shift_csv(&[
        ("T-100", "12", "10"), // 1.2 > 1
        ("T-200", "abc", "5"), // 无法解析 → 0
    ]);
    let zones = zone_csv(&[("T-100", "1"), ("T-200", "2")]);

    let inputs = PipelineInputs::new(ScheduleMode::EightHour)
        .with_shift(ShiftLabel::Early, early.path())
        .with_shift(ShiftLabel::Mid, mid.path())
        .with_shift(ShiftLabel::Late, late.path())
        .with_zone_file(zones.path());

    let result = pipeline().run(&inputs).unwrap();

    // 场景 1-3
    assert_eq!(row(&result.rows, "T-100", ShiftLabel::Early).autotrac_pct, Some(0.5));
    assert_eq!(row(&result.rows, "T-100", ShiftLabel::Mid).autotrac_pct, None);
    let overflow = row(&result.rows, "T-100", ShiftLabel::Late);
    assert_eq!(overflow.autotrac_pct, None);
    assert_eq!(overflow.autotrac_active_hours, 12.0);

    // 场景 4: 同一机器不同班次分开
    assert_eq!(row(&result.rows, "T-200", ShiftLabel::Early).autotrac_pct, Some(0.5));
    assert_eq!(row(&result.rows, "T-200", ShiftLabel::Mid).autotrac_pct, Some(0.5));
    assert_eq!(row(&result.rows, "T-200", ShiftLabel::Late).autotrac_pct, Some(0.0));

    // 场景 5: 未登记机器保留，zone 为空
    let t300 = row(&result.rows, "T-300", ShiftLabel::Early);
    assert_eq!(t300.zone, None);
    assert_eq!(row(&result.rows, "T-100", ShiftLabel::Early).zone, Some(1));
    assert_eq!(row(&result.rows, "T-200", ShiftLabel::Late).zone, Some(2));

    // 唯一性
    let keys: HashSet<(String, ShiftLabel)> = result
        .rows
        .iter()
        .map(|r| (r.machine_id.clone(), r.shift_label))
        .collect();
    assert_eq!(keys.len(), result.rows.len());
    assert_eq!(result.rows.len(), 7);

    // 全局统计: 每个班次一行，合计与聚合表一致
    assert_eq!(result.global_stats.len(), 3);
    for global in &result.global_stats {
        let active: f64 = result
            .rows
            .iter()
            .filter(|r| r.shift_label == global.shift_label)
            .map(|r| r.autotrac_active_hours)
            .sum();
        assert!((global.autotrac_active_hours - active).abs() < 1e-9);
        assert_eq!(global.machine_id, "Global");
        assert_eq!(global.zone, "Global");
    }
    let early_global = &result.global_stats[0];
    assert_eq!(early_global.shift_label, ShiftLabel::Early);
    assert_eq!(early_global.autotrac_active_hours, 9.0);
    assert_eq!(early_global.harvest_utilization_hours, 20.0);
    assert_eq!(early_global.autotrac_pct, Some(0.45));

    // late: 12 / 15 = 0.8（单行溢出不影响班次合计）
    let late_global = &result.global_stats[2];
    assert_eq!(late_global.autotrac_active_hours, 12.0);
    assert!((late_global.autotrac_pct.unwrap() - 0.8).abs() < 1e-12);

    assert_eq!(result.stats.input_rows, 7);
    assert_eq!(result.stats.coerced_cells, 1);
    assert_eq!(result.stats.invalid_ratio_rows, 1);
    assert_eq!(result.stats.zone_misses, 1);

    // 洞察: T-300 计入车队，但不计入分区
    let (fleet, zone_insights) = pipeline().insights(&result);
    assert_eq!(fleet.total_machines, 3);
    let zone_machines: usize = zone_insights.iter().map(|z| z.machine_count).sum();
    assert_eq!(zone_machines, 2);
}

// ==========================================
// 场景 6: 表头拼写/顺序不同
// ==========================================

#[test]
fn test_header_variants_resolve() {
    logging::init_test();

    // 机器列在前，"Máquina Horas AutoTrac Activo (h)" 只能命中工时规则
    let day = write_csv(
        "Equipo,Máquina Horas AutoTrac Activo (h),Notas,Utilización de Cosecha Total (h)\n\
         T-1,6,ok,8\n\
         T-1,2,ok,8\n",
    );
    let night = write_csv(
        "Harvest Utilization (h),Machine ID,AutoTrac Active (h)\n\
         10, T-1 ,5\n",
    );
    let zones = write_csv("Zona,Unidad\n3,T-1\n");

    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, night.path())
        .with_zone_file(zones.path());

    let result = pipeline().run(&inputs).unwrap();

    assert_eq!(result.rows.len(), 2);
    let day_row = row(&result.rows, "T-1", ShiftLabel::Day);
    assert_eq!(day_row.autotrac_active_hours, 8.0);
    assert_eq!(day_row.harvest_utilization_hours, 16.0);
    assert_eq!(day_row.autotrac_pct, Some(0.5));
    assert_eq!(day_row.zone, Some(3));

    let night_row = row(&result.rows, "T-1", ShiftLabel::Night);
    assert_eq!(night_row.autotrac_pct, Some(0.5));
    assert_eq!(night_row.zone, Some(3));
}

// ==========================================
// 失败路径: 中止且不产生部分结果
// ==========================================

#[test]
fn test_missing_file_aborts_pipeline() {
    logging::init_test();

    let day = shift_csv(&[("T-1", "1", "2")]);
    let zones = zone_csv(&[("T-1", "1")]);

    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, "/nonexistent/turno_noche.csv")
        .with_zone_file(zones.path());

    assert!(pipeline().run(&inputs).is_err());
}

#[test]
fn test_unresolvable_column_names_table() {
    logging::init_test();

    let day = shift_csv(&[("T-1", "1", "2")]);
    let night = write_csv("Máquina,AutoTrac Activo\nT-1,1\n");
    let zones = zone_csv(&[("T-1", "1")]);

    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, night.path())
        .with_zone_file(zones.path());

    match pipeline().run(&inputs) {
        Err(ImportError::ColumnResolution { table, column }) => {
            assert!(table.contains("Turno 6pm-6am"));
            assert_eq!(column, "autotrac_active_hours");
        }
        other => panic!("期望 ColumnResolution，实际为 {:?}", other.map(|r| r.rows.len())),
    }
}

#[test]
fn test_wrong_slot_for_mode_rejected() {
    let early = shift_csv(&[("T-1", "1", "2")]);
    let zones = zone_csv(&[("T-1", "1")]);

    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Early, early.path())
        .with_zone_file(zones.path());

    assert!(matches!(
        pipeline().run(&inputs),
        Err(ImportError::UnexpectedInput { .. })
    ));
}

// ==========================================
// 会话生命周期
// ==========================================

#[test]
fn test_session_run_reset_and_rerun_failure() {
    logging::init_test();

    let api = AnalysisApi::new(&PipelineConfig::default()).unwrap();
    let session = api.open_session().unwrap();

    let day = shift_csv(&[("T-1", "4", "8")]);
    let night = shift_csv(&[("T-1", "2", "8")]);
    let zones = zone_csv(&[("T-1", "5")]);
    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, night.path())
        .with_zone_file(zones.path());

    api.run_analysis(session, &inputs).unwrap();
    assert_eq!(api.results(session).unwrap().rows.len(), 2);

    let insights = api.insights(session).unwrap();
    assert_eq!(insights.zones.len(), 1);
    assert_eq!(insights.zones[0].zone, 5);

    api.reset(session).unwrap();
    assert!(matches!(api.results(session), Err(ApiError::NoResults(_))));

    // 再次成功运行后，失败的运行会清掉旧结果
    api.run_analysis(session, &inputs).unwrap();
    let broken = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, "/nonexistent/night.csv")
        .with_zone_file(zones.path());
    assert!(api.run_analysis(session, &broken).is_err());
    assert!(matches!(api.results(session), Err(ApiError::NoResults(_))));
}

#[test]
fn test_export_writes_tables_and_report() {
    logging::init_test();

    let api = AnalysisApi::new(&PipelineConfig::default()).unwrap();
    let session = api.open_session().unwrap();

    let day = shift_csv(&[("T-1", "4", "8"), ("T-9", "1", "0")]);
    let night = shift_csv(&[("T-1", "2", "8")]);
    let zones = zone_csv(&[("T-1", "5")]);
    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, night.path())
        .with_zone_file(zones.path());
    api.run_analysis(session, &inputs).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = api.export(session, dir.path(), ExportFormat::Csv).unwrap();
    assert_eq!(written.len(), 3);

    let machines = std::fs::read_to_string(&written[0]).unwrap();
    assert!(machines.starts_with("machine_id,shift_label,"));
    assert!(machines.contains("T-9,day,1.0,0.0,,"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[2]).unwrap()).unwrap();
    assert_eq!(report["mode"], "twelve_hour");
    assert_eq!(report["global_stats"].as_array().unwrap().len(), 2);
    assert_eq!(report["fleet"]["total_machines"], 2);
}

// ==========================================
// Excel 输入: 数值机器号与 CSV 文本机器号对齐
// ==========================================

#[test]
fn test_excel_shift_joins_csv_ids() {
    logging::init_test();

    let day = write_xlsx(
        &["Máquina", "AutoTrac Activo (h)", "Utilización Cosecha (h)"],
        &[
            vec![XlsxCell::Num(100.0), XlsxCell::Num(3.0), XlsxCell::Num(6.0)],
            vec![XlsxCell::Text("T-2"), XlsxCell::Text("n/a"), XlsxCell::Num(4.0)],
        ],
    );
    let night = shift_csv(&[("100", "1", "4")]);
    let zones = zone_csv(&[("100", "7")]);

    let inputs = PipelineInputs::new(ScheduleMode::TwelveHour)
        .with_shift(ShiftLabel::Day, day.path())
        .with_shift(ShiftLabel::Night, night.path())
        .with_zone_file(zones.path());

    let result = pipeline().run(&inputs).unwrap();

    let day_row = row(&result.rows, "100", ShiftLabel::Day);
    assert_eq!(day_row.autotrac_pct, Some(0.5));
    assert_eq!(day_row.zone, Some(7));
    assert_eq!(row(&result.rows, "100", ShiftLabel::Night).zone, Some(7));

    let t2 = row(&result.rows, "T-2", ShiftLabel::Day);
    assert_eq!(t2.autotrac_active_hours, 0.0);
    assert_eq!(t2.autotrac_pct, Some(0.0));
    assert_eq!(result.stats.coerced_cells, 1);
}
