// ---------------- 界面状态与按键处理 ----------------
use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::keymap::KeyAction;
use crate::presenter::CardPresenter;
use crate::session::{Screen, Session, ToggleOutcome, Verdict};
use crate::theme::Theme;

pub const NOTHING_TO_REVIEW: &str = "間違えた問題はありません。素晴らしい！";

pub struct App {
    pub session: Session,
    pub presenter: Option<CardPresenter>,
    pub keymap: HashMap<char, KeyAction>,
    pub theme: Theme,
    /// 弹窗提示，下一次按键关闭。
    pub notice: Option<String>,
}

impl App {
    pub fn new(session: Session, keymap: HashMap<char, KeyAction>, theme: Theme) -> Self {
        let mut app = Self {
            session,
            presenter: None,
            keymap,
            theme,
            notice: None,
        };
        app.sync_presenter();
        app
    }

    /// 会话每次变动后重建揭示状态：展示的卡片换了，揭示进度清零。
    fn sync_presenter(&mut self) {
        self.presenter = match self.session.screen() {
            Screen::Card => self.session.current_card().map(CardPresenter::new),
            _ => None,
        };
    }

    fn submit(&mut self, verdict: Verdict) {
        let Some((id, verdict)) = self.presenter.as_ref().and_then(|p| p.submit(verdict)) else {
            return;
        };
        self.session.record_verdict(id, verdict);
        self.sync_presenter();
    }

    /// 返回 true 表示退出。
    pub fn apply_action(&mut self, action: KeyAction) -> bool {
        debug!(
            ?action,
            card = ?self.presenter.as_ref().map(|p| p.card_id()),
            position = self.session.position(),
            "按键动作"
        );
        match action {
            KeyAction::RevealOne => {
                if let Some(p) = self.presenter.as_mut() {
                    p.reveal_one();
                }
            }
            KeyAction::Flip => {
                if let Some(p) = self.presenter.as_mut() {
                    p.reveal_all();
                }
            }
            KeyAction::MarkCorrect => self.submit(Verdict::Correct),
            KeyAction::MarkIncorrect => self.submit(Verdict::Incorrect),
            KeyAction::ToggleReview => match self.session.toggle_review_mode() {
                ToggleOutcome::NothingToReview => {
                    self.notice = Some(NOTHING_TO_REVIEW.to_string());
                }
                ToggleOutcome::EnteredReview | ToggleOutcome::LeftReview => {
                    self.sync_presenter();
                }
            },
            KeyAction::Restart => {
                // 只有普通模式走完一轮才提供“もう一度”
                if self.session.screen() == Screen::DeckComplete {
                    self.session.restart();
                    self.sync_presenter();
                }
            }
            KeyAction::Quit => return true,
        }
        false
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.notice.take().is_some() {
        return false;
    }
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Enter => {
            let action = if app.session.screen() == Screen::DeckComplete {
                KeyAction::Restart
            } else {
                KeyAction::Flip
            };
            app.apply_action(action)
        }
        KeyCode::Right => app.apply_action(KeyAction::RevealOne),
        KeyCode::Char(ch) => match app.keymap.get(&ch).copied() {
            Some(action) => app.apply_action(action),
            None => false,
        },
        _ => false,
    }
}
