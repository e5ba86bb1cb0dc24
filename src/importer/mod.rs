// ==========================================
// AutoTrac 作业分析系统 - 导入层
// ==========================================
// 职责: 班次日志 / 分区对照文件 → 规范化行
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod shift_loader;
pub mod zone_loader;

// 重导出核心类型
pub use column_resolver::{
    clean_header, CanonicalField, ColumnRule, ResolvedTable, RuleBasedColumnResolver,
};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use shift_loader::{LoadedShift, PipelineInputs, ShiftLoader};
pub use zone_loader::ZoneLoader;

// 重导出 Trait 接口
pub use importer_trait::{ColumnResolver, FileParser};
