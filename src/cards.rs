// ---------------- 卡组 ----------------
// 内置卡组随二进制一起编译；--cards 可以换成外部 JSON 文件（同一格式）。

use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;

use crate::error::CardError;

const EMBEDDED_CARDS: &str = include_str!("../data/cards.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// 载入内置卡组。内置数据损坏属于启动期致命错误，由 main 直接报错退出。
pub fn load_cards() -> Result<Vec<Card>, CardError> {
    parse_cards(EMBEDDED_CARDS)
}

pub fn load_cards_from(path: &Path) -> Result<Vec<Card>, CardError> {
    let s = fs::read_to_string(path).map_err(|source| CardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_cards(&s)
}

/// 解析并校验：至少一张卡，id 唯一，question/answer 非空。保持文件中的顺序。
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardError> {
    let cards: Vec<Card> = serde_json::from_str(s)?;
    if cards.is_empty() {
        return Err(CardError::Empty);
    }
    let mut seen = HashSet::new();
    for c in &cards {
        if !seen.insert(c.id) {
            return Err(CardError::DuplicateId(c.id));
        }
        if c.question.trim().is_empty() {
            return Err(CardError::EmptyField {
                id: c.id,
                field: "question",
            });
        }
        if c.answer.trim().is_empty() {
            return Err(CardError::EmptyField {
                id: c.id,
                field: "answer",
            });
        }
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_deck_is_valid() {
        let cards = load_cards().unwrap();
        assert!(!cards.is_empty());
        assert_eq!(cards[0].id, 1);
    }

    #[test]
    fn parse_keeps_order() {
        let cards = parse_cards(
            r#"[{"id":2,"question":"Q2","answer":"C"},{"id":1,"question":"Q1","answer":"AB"}]"#,
        )
        .unwrap();
        let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let err = parse_cards(
            r#"[{"id":1,"question":"a","answer":"b"},{"id":1,"question":"c","answer":"d"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CardError::DuplicateId(1)));
    }

    #[test]
    fn empty_answer_rejected() {
        let err = parse_cards(r#"[{"id":7,"question":"q","answer":"  "}]"#).unwrap_err();
        assert!(matches!(
            err,
            CardError::EmptyField {
                id: 7,
                field: "answer"
            }
        ));
    }

    #[test]
    fn empty_deck_rejected() {
        assert!(matches!(parse_cards("[]"), Err(CardError::Empty)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(parse_cards("{"), Err(CardError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_cards_from(Path::new("/nonexistent/cards.json")).unwrap_err();
        assert!(matches!(err, CardError::Io { .. }));
    }
}
