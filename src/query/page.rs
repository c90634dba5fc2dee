//! 1-indexed UI page numbers to 0-indexed offset/limit windows.

use crate::config::QueryConfig;
use crate::error::AppError;

/// Internal 0-indexed page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
}

impl PageRequest {
    /// `page` is 1-indexed. Out-of-range values are rejected, never clamped.
    pub fn from_ui(page: i64, size: i64, config: &QueryConfig) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::Validation(format!("page must be at least 1, got {}", page)));
        }
        if size < 1 || size > i64::from(config.max_page_size) {
            return Err(AppError::Validation(format!(
                "size must be between 1 and {}, got {}",
                config.max_page_size, size
            )));
        }
        let index = u32::try_from(page - 1)
            .map_err(|_| AppError::Validation(format!("page {} is out of range", page)))?;
        Ok(PageRequest { index, size: size as u32 })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.index) * i64::from(self.size)
    }
}
