// ==========================================
// AutoTrac 作业分析系统 - 数据清洗器实现
// ==========================================
// 职责: 机器号标准化 / 工时数值强制转换 / 分区值解析
// 红线: 数值异常不报错，统一落为 0 或 None
// ==========================================

use crate::domain::CellValue;

/// 工时强制转换结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoercedHours {
    pub value: f64,
    /// 非空单元格被改写为 0（无法解析/负数/非有限值）
    pub coerced: bool,
}

pub struct DataCleaner;

impl DataCleaner {
    /// 机器号: 字符串化 + TRIM，空值返回 None
    pub fn machine_id(&self, cell: &CellValue) -> Option<String> {
        cell.as_key()
    }

    /// 工时: 无法解析、负数、非有限值一律记为 0
    pub fn hours(&self, cell: &CellValue) -> CoercedHours {
        if cell.is_empty() {
            return CoercedHours {
                value: 0.0,
                coerced: false,
            };
        }

        match cell.as_number() {
            Some(n) if n >= 0.0 => CoercedHours {
                value: n,
                coerced: false,
            },
            _ => CoercedHours {
                value: 0.0,
                coerced: true,
            },
        }
    }

    /// 分区: 仅接受整数值（"3" / "3.0" / 3.0），其余为 None
    pub fn zone(&self, cell: &CellValue) -> Option<i64> {
        cell.as_number()
            .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
            .map(|n| n as i64)
    }
}
