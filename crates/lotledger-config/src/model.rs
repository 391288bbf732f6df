use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub currency: String,
    #[serde(default = "Config::default_precision")]
    pub currency_precision: u8,
    #[serde(default = "Config::default_precision")]
    pub quantity_precision: u8,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_journal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom directory for journal documents. Defaults to `<base>/journals`.
    pub default_journal_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom directory for journal backups. Defaults to `<base>/backups`.
    pub default_backup_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            currency_precision: Self::default_precision(),
            quantity_precision: Self::default_precision(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
            last_opened_journal: None,
            default_journal_root: None,
            default_backup_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub fn default_precision() -> u8 {
        2
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_journal_root(&self, base: &Path) -> PathBuf {
        self.default_journal_root
            .clone()
            .unwrap_or_else(|| base.join("journals"))
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.default_backup_root
            .clone()
            .unwrap_or_else(|| base.join("backups"))
    }

    /// Colors are used only when enabled and plain output is off.
    pub fn use_color(&self) -> bool {
        self.ui_color_enabled && !self.plain_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "currency": "EUR" }"#).unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.currency_precision, 2);
        assert_eq!(cfg.backup_retention, 5);
        assert!(cfg.use_color());
    }

    #[test]
    fn roots_resolve_under_base_unless_overridden() {
        let mut cfg = Config::default();
        let base = Path::new("/tmp/lots");
        assert_eq!(cfg.resolve_journal_root(base), base.join("journals"));
        cfg.default_backup_root = Some(PathBuf::from("/srv/backups"));
        assert_eq!(cfg.resolve_backup_root(base), PathBuf::from("/srv/backups"));
    }
}
