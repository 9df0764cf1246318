//! 菜单目录
//!
//! 只读的菜单商品列表。启动时从 `MENU_CATALOG_PATH` 加载一次，未设置时使用
//! 编译进二进制的示例菜单。菜单目录用于播种库存记录，从不回写。

use std::path::Path;

use shared::models::MenuItem;
use shared::{AppError, AppResult, ErrorCode};

const SAMPLE_MENU: &str = include_str!("../../data/sample-menu.json");

/// Menu items sorted by category, then name
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    pub fn from_items(mut items: Vec<MenuItem>) -> Self {
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Self { items }
    }

    /// Parse a catalog JSON array
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let items: Vec<MenuItem> = serde_json::from_str(raw).map_err(|e| {
            AppError::with_message(ErrorCode::MenuUnavailable, format!("Invalid menu catalog: {}", e))
        })?;
        Ok(Self::from_items(items))
    }

    /// The bundled sample menu
    pub fn sample() -> AppResult<Self> {
        Self::from_json(SAMPLE_MENU)
    }

    /// Catalog file at `path`, or the sample menu when no path is configured
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            let catalog = Self::sample()?;
            tracing::info!(items = catalog.len(), "Using bundled sample menu");
            return Ok(catalog);
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_message(
                ErrorCode::MenuUnavailable,
                format!("Cannot read menu catalog {}: {}", path.display(), e),
            )
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "Menu catalog loaded");
        Ok(catalog)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sample_menu_parses_and_sorts() {
        let catalog = MenuCatalog::sample().unwrap();
        assert!(!catalog.is_empty());

        let keys: Vec<_> = catalog
            .items()
            .iter()
            .map(|i| (i.category.clone(), i.name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let mut ids: Vec<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"b","name":"Boerewors","category":"Meat","price":"65","stock":12}},
               {{"id":"a","name":"Amasi","category":"Drinks","price":18.5}}]"#
        )
        .unwrap();

        let catalog = MenuCatalog::load(Some(file.path())).unwrap();
        let ids: Vec<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(catalog.items()[1].price, 65.0);
        assert_eq!(catalog.items()[1].stock, 12);
    }

    #[test]
    fn test_missing_or_invalid_file() {
        let err = MenuCatalog::load(Some(Path::new("/nonexistent/menu.json"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuUnavailable);

        let err = MenuCatalog::from_json("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuUnavailable);
    }
}
