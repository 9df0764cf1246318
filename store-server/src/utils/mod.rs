//! 工具模块 - 通用工具函数
//!
//! - [`logger`] - 日志初始化
//! - [`validation`] - 输入校验
//! - [`time`] - 业务时区换算
//! - [`json_body`] - 请求体解析失败 → 400

pub mod logger;
pub mod time;
pub mod validation;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use shared::AppError;

/// Unwrap a JSON body, turning a malformed body into a validation error
///
/// Handlers take `Result<Json<T>, JsonRejection>` so that every body error
/// is reported in the unified `{code, message}` shape instead of axum's
/// plain-text rejection.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            Err(AppError::invalid_request(rejection.body_text()))
        }
    }
}
