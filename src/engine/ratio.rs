// ==========================================
// AutoTrac 作业分析系统 - 利用率比值派生
// ==========================================
// autotrac_pct = autotrac_active_hours / harvest_utilization_hours
// 红线: 比值 > 1 视为源数据错误，置空而不是截断为 100%
// ==========================================

/// 比值派生结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioOutcome {
    /// 0 <= ratio <= 1
    Valid(f64),
    /// 分母为 0，无数据
    NoUtilization,
    /// ratio > 1，源数据不可信
    Overflow(f64),
}

impl RatioOutcome {
    pub fn derive(active_hours: f64, utilization_hours: f64) -> Self {
        if utilization_hours <= 0.0 {
            return RatioOutcome::NoUtilization;
        }

        let ratio = active_hours / utilization_hours;
        if ratio > 1.0 {
            RatioOutcome::Overflow(ratio)
        } else {
            RatioOutcome::Valid(ratio)
        }
    }

    /// 对外暴露的百分比（仅 Valid 有值）
    pub fn pct(&self) -> Option<f64> {
        match self {
            RatioOutcome::Valid(r) => Some(*r),
            RatioOutcome::NoUtilization | RatioOutcome::Overflow(_) => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, RatioOutcome::Overflow(_))
    }
}

/// 快捷函数: 派生 autotrac_pct
pub fn utilization_pct(active_hours: f64, utilization_hours: f64) -> Option<f64> {
    RatioOutcome::derive(active_hours, utilization_hours).pct()
}
