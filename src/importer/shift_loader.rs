// ==========================================
// AutoTrac 作业分析系统 - 班次表加载器
// ==========================================
// 职责: 每个班次槽位一个文件 → 解析 → 列名解析 → 打班次标签
// 流程: 输入校验 → 全部文件解析（任一失败即中止）→ 行转换
// ==========================================

use crate::domain::{CanonicalRow, RawTable, ScheduleMode, ShiftLabel};
use crate::importer::column_resolver::{CanonicalField, ResolvedTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{ColumnResolver, FileParser};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 分区对照表的槽位名称
pub const ZONE_SLOT: &str = "zone_lookup";

// ==========================================
// PipelineInputs - 一次运行的输入文件
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub mode: ScheduleMode,
    pub shift_files: BTreeMap<ShiftLabel, PathBuf>,
    pub zone_file: Option<PathBuf>,
}

impl PipelineInputs {
    pub fn new(mode: ScheduleMode) -> Self {
        Self {
            mode,
            shift_files: BTreeMap::new(),
            zone_file: None,
        }
    }

    pub fn with_shift(mut self, shift: ShiftLabel, path: impl Into<PathBuf>) -> Self {
        self.shift_files.insert(shift, path.into());
        self
    }

    pub fn with_zone_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.zone_file = Some(path.into());
        self
    }

    /// 校验输入组合: 模式所需班次齐全、无多余班次、分区表存在
    pub fn validate(&self) -> ImportResult<()> {
        if let Some(extra) = self
            .shift_files
            .keys()
            .find(|shift| !self.mode.contains(**shift))
        {
            return Err(ImportError::UnexpectedInput {
                slot: format!("{} ({})", extra.code(), extra.display_name()),
            });
        }

        if let Some(missing) = self
            .mode
            .shifts()
            .iter()
            .find(|shift| !self.shift_files.contains_key(*shift))
        {
            return Err(ImportError::MissingInput {
                slot: format!("{} ({})", missing.code(), missing.display_name()),
            });
        }

        if self.zone_file.is_none() {
            return Err(ImportError::MissingInput {
                slot: ZONE_SLOT.to_string(),
            });
        }

        Ok(())
    }

    /// 分区对照表路径（须先 validate）
    pub fn zone_path(&self) -> ImportResult<&Path> {
        self.zone_file
            .as_deref()
            .ok_or_else(|| ImportError::MissingInput {
                slot: ZONE_SLOT.to_string(),
            })
    }
}

// ==========================================
// LoadedShift - 单个班次表加载结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LoadedShift {
    pub rows: Vec<CanonicalRow>,
    pub input_rows: usize,
    pub dropped_rows: usize,
    pub coerced_cells: usize,
}

impl LoadedShift {
    fn merge(&mut self, other: LoadedShift) {
        self.rows.extend(other.rows);
        self.input_rows += other.input_rows;
        self.dropped_rows += other.dropped_rows;
        self.coerced_cells += other.coerced_cells;
    }
}

// ==========================================
// ShiftLoader
// ==========================================
pub struct ShiftLoader {
    file_parser: Box<dyn FileParser>,
    column_resolver: Box<dyn ColumnResolver>,
    cleaner: DataCleaner,
}

impl ShiftLoader {
    pub fn new(file_parser: Box<dyn FileParser>, column_resolver: Box<dyn ColumnResolver>) -> Self {
        Self {
            file_parser,
            column_resolver,
            cleaner: DataCleaner,
        }
    }

    /// 解析单个班次文件
    pub fn parse_file(&self, path: &Path, shift: ShiftLabel) -> ImportResult<ResolvedTable> {
        let mut table = self
            .file_parser
            .parse_to_table(path)
            .map_err(|e| e.in_table(shift.display_name()))?;
        // 错误信息中同时给出班次与文件名
        table.name = format!("{} [{}]", shift.display_name(), table.name);

        self.column_resolver.resolve_shift_table(&table)
    }

    /// 已解析表 → CanonicalRow（打班次标签）
    pub fn load_table(&self, resolved: &ResolvedTable, shift: ShiftLabel) -> ImportResult<LoadedShift> {
        let machine_col = resolved.require(CanonicalField::MachineId)?;
        let active_col = resolved.require(CanonicalField::AutotracActiveHours)?;
        let harvest_col = resolved.require(CanonicalField::HarvestUtilizationHours)?;
        let table: &RawTable = &resolved.table;

        let mut loaded = LoadedShift {
            input_rows: table.len(),
            ..LoadedShift::default()
        };

        for row in 0..table.len() {
            let Some(machine_id) = self.cleaner.machine_id(table.cell(row, machine_col)) else {
                loaded.dropped_rows += 1;
                continue;
            };

            let active = self.cleaner.hours(table.cell(row, active_col));
            let harvest = self.cleaner.hours(table.cell(row, harvest_col));
            loaded.coerced_cells += usize::from(active.coerced) + usize::from(harvest.coerced);

            loaded.rows.push(CanonicalRow {
                machine_id,
                autotrac_active_hours: active.value,
                harvest_utilization_hours: harvest.value,
                shift_label: shift,
            });
        }

        if loaded.dropped_rows > 0 {
            warn!(table = %table.name, dropped = loaded.dropped_rows, "机器号为空的行已丢弃");
        }
        if loaded.coerced_cells > 0 {
            debug!(table = %table.name, coerced = loaded.coerced_cells, "无法解析的工时已记为 0");
        }

        Ok(loaded)
    }

    /// 加载全部班次表
    ///
    /// 先解析全部文件，任一文件失败即返回错误（不产生部分结果）
    pub fn load_all(&self, inputs: &PipelineInputs) -> ImportResult<LoadedShift> {
        inputs.validate()?;

        let mut resolved = Vec::with_capacity(inputs.shift_files.len());
        for shift in inputs.mode.shifts() {
            let path = inputs
                .shift_files
                .get(shift)
                .ok_or_else(|| ImportError::MissingInput {
                    slot: shift.code().to_string(),
                })?;
            resolved.push((*shift, self.parse_file(path, *shift)?));
        }

        let mut combined = LoadedShift::default();
        for (shift, table) in &resolved {
            let loaded = self.load_table(table, *shift)?;
            info!(
                shift = %shift,
                rows = loaded.rows.len(),
                dropped = loaded.dropped_rows,
                "班次表加载完成"
            );
            combined.merge(loaded);
        }

        Ok(combined)
    }
}
