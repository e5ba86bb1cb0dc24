// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成临时班次表 / 分区对照表文件
// ==========================================

#![allow(dead_code)]

use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 默认西语表头（8 小时导出模板）
pub const SHIFT_HEADER: &str = "Máquina,Horas AutoTrac Activo (h),Horas Utilización Cosecha (h)";

/// 写入临时 CSV（文件随返回值存活）
pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("autotrac_")
        .suffix(".csv")
        .tempfile()
        .expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入临时文件失败");
    file.flush().expect("刷新临时文件失败");
    file
}

/// 班次表: (machine, active, util)
pub fn shift_csv(rows: &[(&str, &str, &str)]) -> NamedTempFile {
    shift_csv_with_header(SHIFT_HEADER, rows)
}

pub fn shift_csv_with_header(header: &str, rows: &[(&str, &str, &str)]) -> NamedTempFile {
    let mut content = format!("{}\n", header);
    for (machine, active, util) in rows {
        content.push_str(&format!("{},{},{}\n", machine, active, util));
    }
    write_csv(&content)
}

/// 分区对照表: (machine, zone)
pub fn zone_csv(rows: &[(&str, &str)]) -> NamedTempFile {
    let mut content = String::from("Equipo,Alce\n");
    for (machine, zone) in rows {
        content.push_str(&format!("{},{}\n", machine, zone));
    }
    write_csv(&content)
}

/// Excel 单元格
pub enum XlsxCell<'a> {
    Num(f64),
    Text(&'a str),
}

/// 写入临时 .xlsx（首个工作表: 表头 + 数据行）
pub fn write_xlsx(headers: &[&str], rows: &[Vec<XlsxCell>]) -> NamedTempFile {
    let file = Builder::new()
        .prefix("autotrac_")
        .suffix(".xlsx")
        .tempfile()
        .expect("创建临时文件失败");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).expect("写入表头失败");
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let (r, col) = (r as u32 + 1, col as u16);
            match cell {
                XlsxCell::Num(n) => sheet.write_number(r, col, *n),
                XlsxCell::Text(t) => sheet.write_string(r, col, *t),
            }
            .expect("写入单元格失败");
        }
    }
    workbook.save(file.path()).expect("保存 Excel 失败");
    file
}
