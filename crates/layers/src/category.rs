//! Fixed layer categories and their draw order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayerError;

/// Draw tier of a layer. Declaration order is draw order: background is drawn
/// first (bottom), debug last (top).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Background,
    Base,
    Overlay,
    Data,
    Setting,
    Debug,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Background,
        Category::Base,
        Category::Overlay,
        Category::Data,
        Category::Setting,
        Category::Debug,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Category::Background => "background",
            Category::Base => "base",
            Category::Overlay => "overlay",
            Category::Data => "data",
            Category::Setting => "setting",
            Category::Debug => "debug",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Background => "Background",
            Category::Base => "Base Layers",
            Category::Overlay => "Overlays",
            Category::Data => "Data",
            Category::Setting => "Settings",
            Category::Debug => "Debugging",
        }
    }

    pub const fn draw_order(self) -> usize {
        self as usize
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Exact key first, then a case-insensitive substring of a label.
    pub fn resolve(name: &str) -> Result<Category, LayerError> {
        if let Some(category) = Self::from_key(name) {
            return Ok(category);
        }
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(LayerError::UnknownCategory(name.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase().contains(&needle))
            .ok_or_else(|| LayerError::UnknownCategory(name.to_string()))
    }
}

impl FromStr for Category {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;
    use crate::error::LayerError;

    #[test]
    fn draw_order_follows_declaration() {
        let orders: Vec<usize> = Category::ALL.iter().map(|c| c.draw_order()).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4, 5]);
        assert!(Category::Background < Category::Debug);
    }

    #[test]
    fn resolves_keys_and_label_fragments() {
        assert_eq!(Category::resolve("data"), Ok(Category::Data));
        assert_eq!(Category::resolve("Base Layers"), Ok(Category::Base));
        assert_eq!(Category::resolve("OVERLAY"), Ok(Category::Overlay));
        assert_eq!(Category::resolve("debug"), Ok(Category::Debug));
        assert_eq!(Category::resolve("sett"), Ok(Category::Setting));
        assert_eq!("background".parse::<Category>(), Ok(Category::Background));
    }

    #[test]
    fn unknown_or_blank_names_fail() {
        assert_eq!(
            Category::resolve("terrain"),
            Err(LayerError::UnknownCategory("terrain".to_string()))
        );
        assert!(matches!(
            Category::resolve("  "),
            Err(LayerError::UnknownCategory(_))
        ));
    }

    #[test]
    fn serde_uses_keys() {
        let json = serde_json::to_string(&Category::Setting).expect("json");
        assert_eq!(json, "\"setting\"");
        let back: Category = serde_json::from_str("\"base\"").expect("parse");
        assert_eq!(back, Category::Base);
    }
}
