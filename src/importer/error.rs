// ==========================================
// AutoTrac 作业分析系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 导入/解析失败会中止整次流水线（无部分结果）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsm/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("表格无表头或无数据 (表 {table})")]
    EmptyTable { table: String },

    // ===== 列名解析错误 =====
    #[error("必需列无法定位 (表 {table}, 列 {column})")]
    ColumnResolution { table: String, column: String },

    // ===== 输入组合错误 =====
    #[error("缺少输入文件: {slot}")]
    MissingInput { slot: String },

    #[error("当前班次模式不接受该输入: {slot}")]
    UnexpectedInput { slot: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 为文件级错误补充来源表名
    pub fn in_table(self, table: &str) -> Self {
        match self {
            ImportError::FileReadError(msg) => {
                ImportError::FileReadError(format!("{} ({})", msg, table))
            }
            ImportError::ExcelParseError(msg) => {
                ImportError::ExcelParseError(format!("{} ({})", msg, table))
            }
            ImportError::CsvParseError(msg) => {
                ImportError::CsvParseError(format!("{} ({})", msg, table))
            }
            other => other,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_resolution_message_names_table_and_column() {
        let err = ImportError::ColumnResolution {
            table: "Turno 6-2".to_string(),
            column: "machine_id".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Turno 6-2"));
        assert!(msg.contains("machine_id"));
    }

    #[test]
    fn test_in_table_annotates_parse_errors_only() {
        let err = ImportError::CsvParseError("bad quote".into()).in_table("zones.csv");
        assert!(err.to_string().contains("zones.csv"));

        let err = ImportError::FileNotFound("a.csv".into()).in_table("zones.csv");
        assert!(!err.to_string().contains("zones.csv"));
    }
}
