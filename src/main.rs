// 基于 ratatui + crossterm 的 G検定 单词卡 TUI
// 功能：
// - 内置卡组（或 --cards 指定 JSON），随机洗牌后逐张学习
// - 答案可逐字揭示或一次翻开，翻开后标记 正解/不正解
// - 答错的卡片记入错题集合并写回本地存储；复习模式只出错题，答对即移出

mod app;
mod cards;
mod error;
mod keymap;
mod presenter;
mod session;
mod storage;
mod theme;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{handle_key, App};
use crate::keymap::{default_keymap, load_keymap};
use crate::session::{Session, ToggleOutcome};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::theme::{theme_of, ThemeKind};

#[derive(Debug, Clone, Parser)]
#[command(name = "kentei-cards", about = "G検定 单词卡（逐字揭示 + 错题复习）", version)]
struct Cli {
    /// 卡组 JSON 文件，默认使用内置卡组
    #[arg(long, short = 'c')]
    cards: Option<PathBuf>,

    /// 本地存储文件（保存错题记录）
    #[arg(long, short = 's', env = "KENTEI_STORE", default_value = "kentei-store.json")]
    store: PathBuf,

    /// 不读写存储文件，错题只保存在内存中
    #[arg(long)]
    no_save: bool,

    /// 洗牌随机种子（便于复现顺序）
    #[arg(long)]
    seed: Option<u64>,

    /// 启动即进入复习模式（错题为空时忽略）
    #[arg(long)]
    review: bool,

    /// 主题（外观）：dark | light
    #[arg(long, value_enum, default_value_t = ThemeKind::Dark)]
    theme: ThemeKind,

    /// 日志文件，默认与存储文件同目录的 kentei-cards.log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// 只校验卡组并输出摘要，不进入界面
    #[arg(long)]
    check: bool,

    /// 清空错题记录后退出
    #[arg(long)]
    reset_incorrect: bool,
}

fn default_log_path(cli: &Cli) -> PathBuf {
    if let Some(p) = &cli.log_file {
        return p.clone();
    }
    cli.store
        .parent()
        .map(|dir| dir.join("kentei-cards.log"))
        .unwrap_or_else(|| PathBuf::from("kentei-cards.log"))
}

/// 标准输出归 TUI 使用，日志只写文件。
fn init_logging(path: &PathBuf) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let file = File::create(path)
        .with_context(|| format!("创建日志文件失败: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kentei_cards=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_session(cli: &Cli) -> Result<Session> {
    let cards = match &cli.cards {
        Some(p) => cards::load_cards_from(p)
            .with_context(|| format!("载入卡组失败: {}", p.display()))?,
        None => cards::load_cards().context("内置卡组数据损坏")?,
    };
    let store: Box<dyn KeyValueStore> = if cli.no_save {
        Box::new(MemoryStore::default())
    } else {
        Box::new(FileStore::new(cli.store.clone()))
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(store, rng);
    session.initialize(cards);
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = default_log_path(&cli);
    init_logging(&log_path)?;
    info!(store = %cli.store.display(), no_save = cli.no_save, "启动");

    let mut session = build_session(&cli)?;

    if cli.check {
        println!(
            "{} cards, {} incorrect",
            session.cards().len(),
            session.incorrect_ids().len()
        );
        return Ok(());
    }
    if cli.reset_incorrect {
        let n = session.incorrect_ids().len();
        session.clear_incorrect();
        println!("cleared {} incorrect cards", n);
        return Ok(());
    }
    if cli.review && session.toggle_review_mode() == ToggleOutcome::NothingToReview {
        warn!("错题为空，--review 被忽略");
    }

    let keymap = load_keymap().unwrap_or_else(|e| {
        info!(reason = %e, "使用默认 keymap");
        default_keymap()
    });
    let mut app = App::new(session, keymap, theme_of(cli.theme));

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // 退出还原
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("退出");
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, k) {
                    break;
                }
            }
        }
    }
    Ok(())
}
