// ==========================================
// AutoTrac 作业分析系统 - 会话状态
// ==========================================
// 职责: 按会话 ID 缓存分析结果（不使用进程级全局变量）
// 生命周期: 运行成功写入 → 重置/新一次运行前清空
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::AnalysisResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

type Sessions = HashMap<Uuid, Option<Arc<AnalysisResult>>>;

/// 会话结果缓存
///
/// 可 Clone，多个持有者共享同一份存储
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<Sessions>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, Sessions>> {
        self.sessions
            .lock()
            .map_err(|e| ApiError::Internal(format!("会话锁获取失败: {}", e)))
    }

    /// 新建会话，返回 UUID v4
    pub fn open_session(&self) -> ApiResult<Uuid> {
        let id = Uuid::new_v4();
        self.lock()?.insert(id, None);
        debug!(session_id = %id, "会话已创建");
        Ok(id)
    }

    pub fn contains(&self, session_id: Uuid) -> ApiResult<bool> {
        Ok(self.lock()?.contains_key(&session_id))
    }

    /// 写入分析结果（覆盖旧结果）
    pub fn store(&self, session_id: Uuid, result: AnalysisResult) -> ApiResult<()> {
        let mut sessions = self.lock()?;
        let slot = sessions
            .get_mut(&session_id)
            .ok_or(ApiError::SessionNotFound(session_id))?;
        *slot = Some(Arc::new(result));
        Ok(())
    }

    /// 清空会话结果（会话本身保留）
    pub fn clear(&self, session_id: Uuid) -> ApiResult<()> {
        let mut sessions = self.lock()?;
        let slot = sessions
            .get_mut(&session_id)
            .ok_or(ApiError::SessionNotFound(session_id))?;
        *slot = None;
        Ok(())
    }

    /// 读取会话结果
    ///
    /// # 返回
    /// - 会话不存在: SessionNotFound
    /// - 尚无结果: NoResults
    pub fn get(&self, session_id: Uuid) -> ApiResult<Arc<AnalysisResult>> {
        let sessions = self.lock()?;
        match sessions.get(&session_id) {
            None => Err(ApiError::SessionNotFound(session_id)),
            Some(None) => Err(ApiError::NoResults(session_id)),
            Some(Some(result)) => Ok(Arc::clone(result)),
        }
    }

    /// 关闭会话并丢弃其结果
    pub fn close_session(&self, session_id: Uuid) -> ApiResult<()> {
        self.lock()?
            .remove(&session_id)
            .map(|_| ())
            .ok_or(ApiError::SessionNotFound(session_id))
    }
}
