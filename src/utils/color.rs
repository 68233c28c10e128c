use regex::Regex;
use crate::error::{AppError, AppResult};

/// 校验颜色格式 (#RRGGBB)
pub fn validate_hex_color(color: &str) -> AppResult<()> {
    let color_regex = Regex::new(r"^#[0-9A-Fa-f]{6}$")
        .map_err(|e| AppError::InternalError(format!("Invalid color pattern: {e}")))?;

    if !color_regex.is_match(color) {
        return Err(AppError::ValidationError(format!(
            "Invalid color {color}, expected #RRGGBB"
        )));
    }

    Ok(())
}
