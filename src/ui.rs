use clap::ValueEnum;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::page::{ElementKind, NavRole, Route};
use crate::toast::Toast;

// ---------------- 主题与样式 ----------------
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeKind {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    fg: Color,
    muted: Color,
    accent: Color,
    bar_bg: Color,
    selection_bg: Color,
    good: Color,
    toast_bg: Color,
    toast_fg: Color,
}

pub fn theme_of(kind: ThemeKind) -> Theme {
    match kind {
        ThemeKind::Dark => Theme {
            fg: Color::Rgb(220, 220, 220),
            muted: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(95, 175, 255),
            bar_bg: Color::Rgb(35, 40, 46),
            selection_bg: Color::Rgb(60, 65, 72),
            good: Color::Rgb(130, 200, 120),
            toast_bg: Color::Rgb(31, 41, 55),
            toast_fg: Color::White,
        },
        ThemeKind::Light => Theme {
            fg: Color::Rgb(30, 30, 30),
            muted: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(0, 122, 255),
            bar_bg: Color::Rgb(235, 240, 245),
            selection_bg: Color::Rgb(210, 220, 235),
            good: Color::Rgb(38, 166, 91),
            toast_bg: Color::Rgb(31, 41, 55),
            toast_fg: Color::White,
        },
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    // 顶栏 + 页面 + 底栏
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, v[0], app);
    draw_page(f, v[1], app);
    draw_footer(f, v[2], app);
    let area = f.area();
    draw_toasts(f, area, app.toasts.visible(), app.theme);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let auto = app.auto_submit_active();
    let segs = vec![
        Span::styled(
            " 题库 · Viewer ",
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(th.muted)),
        Span::styled(app.page.title.clone(), Style::default().fg(th.fg)),
        Span::styled(" | auto-submit:", Style::default().fg(th.muted)),
        Span::styled(
            if auto { "ON" } else { "OFF" },
            Style::default().fg(if auto { th.good } else { th.muted }),
        ),
    ];
    let para = Paragraph::new(Line::from(segs)).style(Style::default().bg(th.bar_bg).fg(th.fg));
    f.render_widget(para, area);
}

fn page_lines(app: &App) -> (Vec<Line<'static>>, usize) {
    let th = app.theme;
    let mut lines = Vec::new();
    let mut focus_line = 0;
    for (idx, el) in app.page.elements.iter().enumerate() {
        if el.hidden {
            continue;
        }
        let focused = app.page.focus == Some(idx);
        if focused {
            focus_line = lines.len();
        }
        let marker = if focused { "▸ " } else { "  " };
        let hl = |s: Style| {
            if focused {
                s.bg(th.selection_bg).add_modifier(Modifier::BOLD)
            } else {
                s
            }
        };
        let line = match &el.kind {
            ElementKind::Heading(s) => Line::from(Span::styled(
                s.clone(),
                Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
            )),
            ElementKind::Text(s) => Line::from(Span::styled(s.clone(), Style::default().fg(th.fg))),
            ElementKind::Meta(s) => {
                Line::from(Span::styled(s.clone(), Style::default().fg(th.muted)))
            }
            ElementKind::Link(l) => {
                let color = match l.nav {
                    Some(NavRole::Prev) | Some(NavRole::Next) => th.accent,
                    None => th.fg,
                };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(th.accent)),
                    Span::styled(l.text.clone(), hl(Style::default().fg(color))),
                ])
            }
            ElementKind::Select(s) => Line::from(vec![
                Span::styled(marker, Style::default().fg(th.accent)),
                Span::styled(format!("{}: ", s.name), Style::default().fg(th.muted)),
                Span::styled(
                    format!("‹ {} ›", s.selected_label()),
                    hl(Style::default().fg(th.fg)),
                ),
            ]),
            ElementKind::Submit { label, .. } => Line::from(vec![
                Span::styled(marker, Style::default().fg(th.accent)),
                Span::styled(format!("[ {} ]", label), hl(Style::default().fg(th.good))),
            ]),
            ElementKind::Separator => Line::from(Span::styled(
                "─".repeat(40),
                Style::default().fg(th.muted),
            )),
        };
        lines.push(line);
    }
    (lines, focus_line)
}

fn draw_page(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let (lines, focus_line) = page_lines(app);
    let inner_h = area.height.saturating_sub(2) as usize;
    let scroll = if inner_h > 0 && focus_line >= inner_h {
        focus_line + 1 - inner_h
    } else {
        0
    };
    let title = match app.page.route {
        Route::List(_) => " 题目列表 ",
        Route::Detail(_) => " 题目详情 ",
    };
    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(th.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(th.muted)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let mut tips = String::from(" [q]退出  [j/k]移动  [Enter]打开 ");
    match app.page.route {
        Route::List(_) => {
            if matches!(app.focused_kind(), Some(ElementKind::Select(_))) {
                tips.push_str(" [h/l]切换选项 ");
            }
            if !app.auto_submit_active() {
                tips.push_str(" [s]提交筛选 ");
            }
        }
        Route::Detail(_) => {
            tips.push_str(" [←/→]上一题/下一题  [a]答案  [e]解析  [y]复制题干  [b]返回列表 ");
        }
    }
    tips.push_str(" [R]重载 ");
    let help = Paragraph::new(Line::from(Span::styled(tips, Style::default().fg(th.muted))))
        .style(Style::default().bg(th.bar_bg));
    f.render_widget(help, area);
}

/// 右下角提示框；多条提示叠在同一位置，后出现的在上层。
fn toast_rect(message: &str, area: Rect) -> Rect {
    let width = u16::try_from(message.width())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let height = 3.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    }
}

fn draw_toasts(f: &mut Frame, area: Rect, toasts: &[Toast], th: Theme) {
    for t in toasts {
        let rect = toast_rect(t.message(), area);
        f.render_widget(Clear, rect);
        let style = Style::default().bg(th.toast_bg).fg(th.toast_fg);
        let para = Paragraph::new(Line::from(Span::raw(t.message().to_string())))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .style(style),
            )
            .style(style);
        f.render_widget(para, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::Toasts;
    use ratatui::{backend::TestBackend, Terminal};

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn toast_renders_markup_as_plain_text() {
        let mut toasts = Toasts::default();
        toasts.show("<b>bold</b>", None);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_toasts(f, area, toasts.visible(), theme_of(ThemeKind::Dark));
            })
            .unwrap();
        // 底部留一行，边框占一行：文本在倒数第三行
        let row = row_text(&terminal, 7);
        assert!(row.contains("<b>bold</b>"), "row was {:?}", row);
    }

    #[test]
    fn toast_rect_sits_bottom_right_and_fits() {
        let area = Rect::new(0, 0, 80, 24);
        let r = toast_rect("abc", area);
        assert_eq!((r.width, r.height), (7, 3));
        assert_eq!(r.x + r.width, 79);
        assert_eq!(r.y + r.height, 23);

        let r = toast_rect(&"x".repeat(65_536), area);
        assert_eq!(r.width, 80);
        assert_eq!(r.x, 0);

        let tiny = Rect::new(0, 0, 5, 2);
        let r = toast_rect("a long message", tiny);
        assert!(r.width <= 5 && r.height <= 2);
    }
}
