// ==========================================
// AutoTrac 作业分析系统 - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析 / 列名解析接口（不包含实现）
// ==========================================

use crate::domain::RawTable;
use crate::importer::column_resolver::ResolvedTable;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → RawTable
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawTable): 首行为表头，完全空白的行已跳过
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// ColumnResolver Trait
// ==========================================
// 用途: 表头 → 规范列
// 实现者: RuleBasedColumnResolver
pub trait ColumnResolver: Send + Sync {
    /// 解析班次表，必需列: machine_id / autotrac_active_hours / harvest_utilization_hours
    ///
    /// # 返回
    /// - Err(ImportError::ColumnResolution): 指明缺失的表与列
    fn resolve_shift_table(&self, table: &RawTable) -> ImportResult<ResolvedTable>;

    /// 解析分区对照表，必需列: machine_id / zone
    fn resolve_zone_table(&self, table: &RawTable) -> ImportResult<ResolvedTable>;
}
