// ---------------- Keymap ----------------
// keymap.toml 示例：
//   [keys]
//   " " = "reveal_one"
//   "f" = "flip"

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    RevealOne,
    Flip,
    MarkCorrect,
    MarkIncorrect,
    ToggleReview,
    Restart,
    Quit,
}

#[derive(Deserialize)]
struct KeyMapToml {
    keys: HashMap<String, String>,
}

/// 从当前目录向上查找 keymap.toml。
pub fn load_keymap() -> Result<HashMap<char, KeyAction>> {
    let mut paths = vec![PathBuf::from("keymap.toml")];
    if let Ok(cwd) = std::env::current_dir() {
        for anc in cwd.ancestors() {
            paths.push(anc.join("kentei-cards/keymap.toml"));
        }
    }
    for p in paths {
        if p.exists() {
            let content = fs::read_to_string(&p)
                .with_context(|| format!("读取 keymap 失败: {}", p.display()))?;
            return parse_keymap_toml(&content)
                .with_context(|| format!("解析 keymap 失败: {}", p.display()));
        }
    }
    Err(anyhow::anyhow!("未找到 keymap.toml"))
}

pub fn parse_keymap_toml(content: &str) -> Result<HashMap<char, KeyAction>> {
    let km: KeyMapToml = toml::from_str(content)?;
    Ok(parse_keymap(km.keys))
}

fn parse_keymap(map: HashMap<String, String>) -> HashMap<char, KeyAction> {
    let mut out = HashMap::new();
    for (k, v) in map {
        let mut chars = k.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(act) = action_from_str(&v) {
                out.insert(ch, act);
            }
        }
    }
    if out.is_empty() {
        out = default_keymap();
    }
    out
}

fn action_from_str(s: &str) -> Option<KeyAction> {
    use KeyAction::*;
    Some(match s {
        "reveal_one" => RevealOne,
        "flip" => Flip,
        "correct" => MarkCorrect,
        "incorrect" => MarkIncorrect,
        "toggle_review" => ToggleReview,
        "restart" => Restart,
        "quit" => Quit,
        _ => return None,
    })
}

pub fn default_keymap() -> HashMap<char, KeyAction> {
    use KeyAction::*;
    let mut m = HashMap::new();
    m.insert(' ', RevealOne);
    m.insert('f', Flip);
    m.insert('o', MarkCorrect);
    m.insert('x', MarkIncorrect);
    m.insert('r', ToggleReview);
    m.insert('R', Restart);
    m.insert('q', Quit);
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_actions() {
        let km = parse_keymap_toml(
            r#"
            [keys]
            "j" = "reveal_one"
            "k" = "flip"
            "y" = "correct"
            "n" = "incorrect"
            "#,
        )
        .unwrap();
        assert_eq!(km.get(&'j'), Some(&KeyAction::RevealOne));
        assert_eq!(km.get(&'k'), Some(&KeyAction::Flip));
        assert_eq!(km.get(&'y'), Some(&KeyAction::MarkCorrect));
        assert_eq!(km.get(&'n'), Some(&KeyAction::MarkIncorrect));
        assert_eq!(km.len(), 4);
    }

    #[test]
    fn skips_unknown_actions_and_multi_char_keys() {
        let km = parse_keymap_toml(
            r#"
            [keys]
            "ab" = "flip"
            "z" = "does_not_exist"
            "Q" = "quit"
            "#,
        )
        .unwrap();
        assert_eq!(km.len(), 1);
        assert_eq!(km.get(&'Q'), Some(&KeyAction::Quit));
    }

    #[test]
    fn nothing_usable_falls_back_to_default() {
        let km = parse_keymap_toml("[keys]\n\"zz\" = \"flip\"\n").unwrap();
        assert_eq!(km, default_keymap());
    }

    #[test]
    fn invalid_toml_is_error() {
        assert!(parse_keymap_toml("keys = [").is_err());
    }
}
