// ==========================================
// AutoTrac 作业分析系统 - 分区对照表加载器
// ==========================================
// 职责: 机器 → 分区（alce）对照文件 → ZoneLookup
// ==========================================

use crate::domain::ZoneLookup;
use crate::importer::column_resolver::{CanonicalField, ResolvedTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::{ColumnResolver, FileParser};
use std::path::Path;
use tracing::{info, warn};

pub struct ZoneLoader {
    file_parser: Box<dyn FileParser>,
    column_resolver: Box<dyn ColumnResolver>,
    cleaner: DataCleaner,
}

impl ZoneLoader {
    pub fn new(file_parser: Box<dyn FileParser>, column_resolver: Box<dyn ColumnResolver>) -> Self {
        Self {
            file_parser,
            column_resolver,
            cleaner: DataCleaner,
        }
    }

    /// 解析并校验分区对照文件（不构建对照表）
    pub fn parse_file(&self, path: &Path) -> ImportResult<ResolvedTable> {
        let table = self
            .file_parser
            .parse_to_table(path)
            .map_err(|e| e.in_table("zone_lookup"))?;
        self.column_resolver.resolve_zone_table(&table)
    }

    /// 已解析表 → ZoneLookup
    ///
    /// - 机器号为空的行跳过
    /// - 同一机器重复出现: 保留首条
    /// - 分区值非整数: 记为 None（机器仍视为已登记）
    pub fn build_lookup(&self, resolved: &ResolvedTable) -> ImportResult<ZoneLookup> {
        let machine_col = resolved.require(CanonicalField::MachineId)?;
        let zone_col = resolved.require(CanonicalField::Zone)?;
        let table = &resolved.table;

        let mut lookup = ZoneLookup::new();
        let mut duplicates = 0usize;
        let mut invalid_zones = 0usize;

        for row in 0..table.len() {
            let Some(machine_id) = self.cleaner.machine_id(table.cell(row, machine_col)) else {
                continue;
            };
            let zone = self.cleaner.zone(table.cell(row, zone_col));
            if zone.is_none() {
                invalid_zones += 1;
            }
            if !lookup.insert(&machine_id, zone) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            warn!(table = %table.name, duplicates, "分区对照表存在重复机器，保留首条");
        }
        if invalid_zones > 0 {
            warn!(table = %table.name, invalid_zones, "分区值不是整数，记为空");
        }
        info!(table = %table.name, machines = lookup.len(), "分区对照表加载完成");

        Ok(lookup)
    }

    pub fn load(&self, path: &Path) -> ImportResult<ZoneLookup> {
        let resolved = self.parse_file(path)?;
        self.build_lookup(&resolved)
    }
}
