// ---------------- 学习会话 ----------------
// 持有卡组、当前位置、错题集合、复习模式。所有状态只通过这里的方法修改，
// 持久化和重新洗牌都在对应的修改之后显式调用。

use std::collections::BTreeSet;

use rand::{rngs::StdRng, Rng};
use tracing::{debug, info, warn};

use crate::cards::Card;
use crate::storage::{self, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    EnteredReview,
    LeftReview,
    /// 错题集合为空，拒绝进入复习模式；状态不变。
    NothingToReview,
}

/// 由会话状态推导出的展示状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    ReviewComplete,
    DeckComplete,
    Card,
}

pub struct Session {
    cards: Vec<Card>,
    incorrect_ids: BTreeSet<i64>,
    review_mode: bool,
    deck: Vec<i64>,
    position: usize,
    ready: bool,
    store: Box<dyn KeyValueStore>,
    rng: StdRng,
}

impl Session {
    /// 空会话，尚未载入（Loading 状态）。
    pub fn new(store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        Self {
            cards: Vec::new(),
            incorrect_ids: BTreeSet::new(),
            review_mode: false,
            deck: Vec::new(),
            position: 0,
            ready: false,
            store,
            rng,
        }
    }

    /// 载入卡组与持久化的错题集合，两者都完成后才标记 ready，
    /// 避免把默认空集合写回覆盖尚未载入的记录。
    pub fn initialize(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.incorrect_ids = storage::load_incorrect_ids(self.store.as_ref());
        self.ready = true;
        info!(
            cards = self.cards.len(),
            incorrect = self.incorrect_ids.len(),
            "会话已载入"
        );
        self.regenerate_deck();
    }

    pub fn regenerate_deck(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let source: Vec<i64> = if self.review_mode {
            self.incorrect_ids.iter().copied().collect()
        } else {
            self.cards.iter().map(|c| c.id).collect()
        };
        self.deck = shuffle(source, &mut self.rng);
        self.position = 0;
        debug!(review = self.review_mode, size = self.deck.len(), "重新洗牌");
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }

    pub fn record_verdict(&mut self, card_id: i64, verdict: Verdict) {
        let changed = match verdict {
            Verdict::Correct => self.review_mode && self.incorrect_ids.remove(&card_id),
            Verdict::Incorrect => self.incorrect_ids.insert(card_id),
        };
        debug!(card_id, ?verdict, changed, "记录作答");
        self.advance();
        if changed {
            self.persist();
            // 复习模式下错题集合就是卡组来源，集合变了就重新洗牌并从头开始
            if self.review_mode {
                self.regenerate_deck();
            }
        }
    }

    pub fn toggle_review_mode(&mut self) -> ToggleOutcome {
        if !self.review_mode && self.incorrect_ids.is_empty() {
            return ToggleOutcome::NothingToReview;
        }
        self.review_mode = !self.review_mode;
        self.regenerate_deck();
        info!(review = self.review_mode, "切换复习模式");
        if self.review_mode {
            ToggleOutcome::EnteredReview
        } else {
            ToggleOutcome::LeftReview
        }
    }

    /// 卡组走完后从头再来，不重新洗牌。
    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// 清空错题集合并写回。
    pub fn clear_incorrect(&mut self) {
        if self.incorrect_ids.is_empty() {
            return;
        }
        self.incorrect_ids.clear();
        self.persist();
        if self.review_mode {
            self.regenerate_deck();
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        let id = *self.deck.get(self.position)?;
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn screen(&self) -> Screen {
        if self.deck.is_empty() {
            if self.review_mode {
                Screen::ReviewComplete
            } else {
                Screen::Loading
            }
        } else if self.position >= self.deck.len() {
            Screen::DeckComplete
        } else {
            Screen::Card
        }
    }

    /// (当前序号, 卡组长度)，只在有卡片可答时返回。
    pub fn progress(&self) -> Option<(usize, usize)> {
        (self.position < self.deck.len()).then(|| (self.position + 1, self.deck.len()))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[cfg(test)]
    pub fn deck(&self) -> &[i64] {
        &self.deck
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_review_mode(&self) -> bool {
        self.review_mode
    }

    pub fn incorrect_ids(&self) -> &BTreeSet<i64> {
        &self.incorrect_ids
    }

    fn persist(&mut self) {
        if !self.ready {
            return;
        }
        if let Err(e) = storage::save_incorrect_ids(self.store.as_mut(), &self.incorrect_ids) {
            warn!(error = %e, "写入错题记录失败");
        }
    }
}

/// Fisher–Yates，在副本上原地交换。
pub fn shuffle<T, R: Rng>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
    items
}
