// ---------------- 配置与按键映射 ----------------
// qbank.toml 示例：
//
//   auto_submit_on_filter_change = true
//   toast_duration_ms = 1500
//   per_page = 30
//
//   [keys]
//   a = "toggle_answer"
//   y = "copy_question"

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::store::DEFAULT_PER_PAGE;
use crate::toast::DEFAULT_TOAST_DURATION;

pub const CONFIG_FILE_NAME: &str = "qbank.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置失败: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置失败: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub auto_submit_on_filter_change: bool,
    pub toast_duration_ms: u64,
    pub per_page: usize,
    pub keys: HashMap<String, String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            auto_submit_on_filter_change: false,
            toast_duration_ms: DEFAULT_TOAST_DURATION.as_millis() as u64,
            per_page: DEFAULT_PER_PAGE,
            keys: HashMap::new(),
        }
    }
}

impl ViewerConfig {
    pub fn from_toml(s: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml(&content, path)?;
        tracing::info!(path = %path.display(), "配置已载入");
        Ok(cfg)
    }

    /// 依次尝试：显式路径、QBANK_CONFIG、当前目录及其上级中的 qbank.toml。
    /// 都找不到时使用默认配置。
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        if let Ok(envp) = std::env::var("QBANK_CONFIG") {
            return Self::load(Path::new(&envp));
        }
        if let Ok(cwd) = std::env::current_dir() {
            for anc in cwd.ancestors() {
                let p = anc.join(CONFIG_FILE_NAME);
                if p.exists() {
                    return Self::load(&p);
                }
            }
        }
        Ok(Self::default())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn keymap(&self) -> HashMap<char, KeyAction> {
        parse_keymap(&self.keys)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    FocusNext,
    FocusPrev,
    Activate,
    SelectPrev,
    SelectNext,
    SubmitFilters,
    ToggleAnswer,
    ToggleExplanation,
    CopyQuestion,
    BackToList,
    Reload,
    Quit,
}

fn parse_keymap(map: &HashMap<String, String>) -> HashMap<char, KeyAction> {
    let mut out = HashMap::new();
    for (k, v) in map {
        let mut chars = k.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            match action_from_str(v) {
                Some(act) => {
                    out.insert(ch, act);
                }
                None => tracing::warn!(key = %k, action = %v, "未知的按键动作，已忽略"),
            }
        }
    }
    if out.is_empty() {
        return default_keymap();
    }
    out
}

fn action_from_str(s: &str) -> Option<KeyAction> {
    use KeyAction::*;
    Some(match s {
        "focus_next" => FocusNext,
        "focus_prev" => FocusPrev,
        "activate" => Activate,
        "select_prev" => SelectPrev,
        "select_next" => SelectNext,
        "submit_filters" => SubmitFilters,
        "toggle_answer" => ToggleAnswer,
        "toggle_explanation" => ToggleExplanation,
        "copy_question" => CopyQuestion,
        "back_to_list" => BackToList,
        "reload" => Reload,
        "quit" => Quit,
        _ => return None,
    })
}

pub fn default_keymap() -> HashMap<char, KeyAction> {
    use KeyAction::*;
    let mut m = HashMap::new();
    m.insert('j', FocusNext);
    m.insert('k', FocusPrev);
    m.insert('h', SelectPrev);
    m.insert('l', SelectNext);
    m.insert('s', SubmitFilters);
    m.insert('a', ToggleAnswer);
    m.insert('e', ToggleExplanation);
    m.insert('y', CopyQuestion);
    m.insert('b', BackToList);
    m.insert('R', Reload); // 大写 R
    m.insert('q', Quit);
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_auto_submit_off() {
        let cfg = ViewerConfig::default();
        assert!(!cfg.auto_submit_on_filter_change);
        assert_eq!(cfg.toast_duration(), Duration::from_millis(2000));
        assert_eq!(cfg.keymap(), default_keymap());
    }

    #[test]
    fn toml_overrides_fields_and_keys() {
        let cfg = ViewerConfig::from_toml(
            r#"
auto_submit_on_filter_change = true
toast_duration_ms = 1500

[keys]
c = "copy_question"
zz = "quit"
x = "no_such_action"
"#,
            Path::new("qbank.toml"),
        )
        .unwrap();
        assert!(cfg.auto_submit_on_filter_change);
        assert_eq!(cfg.toast_duration_ms, 1500);
        assert_eq!(cfg.per_page, DEFAULT_PER_PAGE);
        let km = cfg.keymap();
        assert_eq!(km.get(&'c'), Some(&KeyAction::CopyQuestion));
        assert_eq!(km.len(), 1);
    }

    #[test]
    fn unusable_keys_fall_back_to_defaults() {
        let cfg =
            ViewerConfig::from_toml("[keys]\nab = \"quit\"\n", Path::new("qbank.toml")).unwrap();
        assert_eq!(cfg.keymap(), default_keymap());
    }

    #[test]
    fn load_reads_file_and_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&good, "per_page = 5\n").unwrap();
        assert_eq!(ViewerConfig::load(&good).unwrap().per_page, 5);

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "per_page = \"many\"\n").unwrap();
        assert!(matches!(
            ViewerConfig::load(&bad),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            ViewerConfig::discover(Some(&dir.path().join("missing.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }
}
