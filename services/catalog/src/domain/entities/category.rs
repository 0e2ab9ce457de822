//! 分类实体

use errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const CATEGORY_NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub category_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Category {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        if self.name.chars().count() > CATEGORY_NAME_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Category name must be at most {} characters",
                CATEGORY_NAME_MAX_CHARS
            )));
        }
        Ok(())
    }

    pub fn with_id(mut self, category_id: i32) -> Self {
        self.category_id = category_id;
        self
    }
}
