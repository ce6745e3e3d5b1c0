// ---------------- 单张卡片的逐字揭示 ----------------
// 每显示一张卡片就新建一个 CardPresenter；它只管自己的揭示状态，
// 作答结果通过 submit 交回会话。

use crate::cards::Card;
use crate::session::Verdict;

/// 未揭示字符的占位符（全角下划线）。
pub const PLACEHOLDER: char = '＿';

#[derive(Debug, Clone)]
pub struct CardPresenter {
    card_id: i64,
    answer: String,
    revealed_prefix: String,
    fully_revealed: bool,
}

impl CardPresenter {
    pub fn new(card: &Card) -> Self {
        Self {
            card_id: card.id,
            answer: card.answer.clone(),
            revealed_prefix: String::new(),
            fully_revealed: false,
        }
    }

    pub fn card_id(&self) -> i64 {
        self.card_id
    }

    #[cfg(test)]
    pub fn revealed_prefix(&self) -> &str {
        &self.revealed_prefix
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.fully_revealed
    }

    pub fn can_reveal_more(&self) -> bool {
        self.revealed_prefix.len() < self.answer.len()
    }

    /// 按顺序多揭示一个字符；已全部揭示时什么也不做。
    pub fn reveal_one(&mut self) {
        let Some(next) = self.answer[self.revealed_prefix.len()..].chars().next() else {
            return;
        };
        self.revealed_prefix.push(next);
        if self.revealed_prefix.len() == self.answer.len() {
            self.fully_revealed = true;
        }
    }

    pub fn reveal_all(&mut self) {
        self.revealed_prefix = self.answer.clone();
        self.fully_revealed = true;
    }

    pub fn displayed_text(&self) -> String {
        if self.fully_revealed {
            return self.answer.clone();
        }
        let hidden = self.answer[self.revealed_prefix.len()..].chars().count();
        let mut s = self.revealed_prefix.clone();
        s.extend(std::iter::repeat(PLACEHOLDER).take(hidden));
        s
    }

    /// 只有全部揭示后才能提交；否则返回 None。
    pub fn submit(&self, verdict: Verdict) -> Option<(i64, Verdict)> {
        self.fully_revealed.then_some((self.card_id, verdict))
    }
}
