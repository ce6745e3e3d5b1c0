// ---------------- 绘制 ----------------
// 顶栏（标题 + 复习模式开关）/ 主区（按 Screen 分支）/ 底栏（进度 + 快捷键）

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::session::Screen;

pub fn ui(f: &mut Frame, app: &App) {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, v[0], app);
    draw_main(f, v[1], app);
    draw_footer(f, v[2], app);

    if let Some(msg) = app.notice.as_deref() {
        draw_notice(f, msg, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let review = app.session.is_review_mode();
    let segs = vec![
        Span::styled(
            " G検定単語帳 ",
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(th.muted)),
        Span::styled(
            format!("復習モード ({})", app.session.incorrect_ids().len()),
            Style::default().fg(if review { th.warn } else { th.muted }),
        ),
        Span::styled(
            if review { " [ON]" } else { " [OFF]" },
            Style::default().fg(if review { th.good } else { th.muted }),
        ),
    ];
    let para = Paragraph::new(Line::from(segs)).style(Style::default().bg(th.bar_bg).fg(th.fg));
    f.render_widget(para, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    match app.session.screen() {
        Screen::Loading => {
            let para = Paragraph::new("Loading cards...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(th.muted));
            f.render_widget(para, centered_rect(60, 20, area));
        }
        Screen::ReviewComplete => draw_message(
            f,
            area,
            app,
            "✔ 復習完了!",
            "間違えた問題は全てクリアしました。お疲れ様でした!",
            None,
        ),
        Screen::DeckComplete => draw_message(
            f,
            area,
            app,
            "✦ デッキ完了!",
            "全てのカード学習お疲れ様でした!",
            Some("[Enter/R] もう一度"),
        ),
        Screen::Card => draw_card(f, area, app),
    }
}

fn draw_message(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    body: &str,
    action: Option<&str>,
) {
    let th = app.theme;
    let rect = centered_rect(70, 50, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.muted));
    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(th.good).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(body.to_string())),
    ];
    if let Some(a) = action {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            a.to_string(),
            Style::default().fg(th.accent),
        )));
    }
    let para = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(th.fg));
    f.render_widget(para, rect);
}

fn draw_card(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    // 卡组与卡片对不上时什么都不画
    let (Some(card), Some(p)) = (app.session.current_card(), app.presenter.as_ref()) else {
        return;
    };
    let rect = centered_rect(80, 70, area);
    let block = Block::default()
        .title(Span::styled(" Flashcard ", Style::default().fg(th.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.muted));
    let answer = p.displayed_text();
    let actions = if p.is_fully_revealed() {
        Line::from(vec![
            Span::styled("[x] ✗ 間違えた", Style::default().fg(th.bad)),
            Span::raw("    "),
            Span::styled("[o] ✓ 正解した", Style::default().fg(th.good)),
        ])
    } else {
        let reveal_style = if p.can_reveal_more() {
            Style::default().fg(th.fg)
        } else {
            Style::default().fg(th.muted)
        };
        Line::from(vec![
            Span::styled("[Space] 1文字めくる", reveal_style),
            Span::raw("    "),
            Span::styled("[f] めくる", Style::default().fg(th.accent)),
        ])
    };
    let lines = vec![
        Line::from(Span::styled(
            card.question.clone(),
            Style::default().fg(th.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            answer,
            Style::default().fg(if p.is_fully_revealed() { th.good } else { th.warn }),
        )),
        Line::from(""),
        actions,
    ];
    let para = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(para, rect);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let mut segs = Vec::new();
    if let Some((cur, total)) = app.session.progress() {
        segs.push(Span::styled(
            format!(" {} / {} ", cur, total),
            Style::default().fg(th.accent),
        ));
        segs.push(Span::styled("|", Style::default().fg(th.muted)));
    }
    segs.push(Span::styled(
        " [Space]1文字 [f]めくる [o]正解 [x]不正解 [r]復習モード [R]もう一度 [q]終了 ",
        Style::default().fg(th.muted),
    ));
    let para = Paragraph::new(Line::from(segs)).style(Style::default().bg(th.bar_bg));
    f.render_widget(para, area);
}

fn draw_notice(f: &mut Frame, msg: &str, app: &App) {
    let th = app.theme;
    let full = f.area();
    // 按显示宽度留出边框与留白
    let width = (UnicodeWidthStr::width(msg) as u16 + 6).min(full.width);
    let height = 5.min(full.height);
    let area = Rect {
        x: full.x + (full.width - width) / 2,
        y: full.y + (full.height - height) / 2,
        width,
        height,
    };
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(" Info ", Style::default().fg(th.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.warn));
    let para = Paragraph::new(vec![
        Line::from(Span::raw(msg.to_string())),
        Line::from(Span::styled("(任意のキーで閉じる)", Style::default().fg(th.muted))),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}
