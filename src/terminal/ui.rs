use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::dashboard::category_view;
use crate::dashboard::state::DashboardState;
use crate::domain::category::Category;
use crate::terminal::state::{AppState, Mode};

pub fn render(f: &mut Frame, state: &mut AppState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let Some(session) = state.session.clone() else {
        render_login(f, header, body);
        return;
    };
    let dash = session.dashboard.snapshot();

    let mut title = vec![Span::styled(
        " Your Email Dashboard ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    title.push(Span::styled(
        format!(" {} ", session.identity),
        Style::default().fg(Color::Gray),
    ));
    if dash.is_loading() {
        title.push(Span::styled(" syncing… ", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(title)), header);

    let [meetings, emails, categories] = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(35),
        Constraint::Percentage(30),
    ])
    .margin(1)
    .areas(body);

    render_meetings(f, meetings, &dash, state);
    render_emails(f, emails, &dash);
    render_categories(f, categories, &dash);
    render_footer(f, footer, state.mode);
}

fn render_login(f: &mut Frame, header: Rect, body: Rect) {
    f.render_widget(
        Paragraph::new(" Your Email Dashboard ").style(Style::default().add_modifier(Modifier::BOLD)),
        header,
    );
    let p = Paragraph::new("Please log in to view your dashboard.\nRun: rs_mail_dashboard login\n\n(q to quit)")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, body);
}

fn render_meetings(f: &mut Frame, area: Rect, dash: &DashboardState, state: &mut AppState) {
    let block = Block::default()
        .title(" Upcoming Meetings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if dash.meetings().is_empty() {
        let msg = if dash.is_loading() {
            "Meetings are loading..."
        } else {
            "No meetings found."
        };
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    }

    let expanded = dash.notes().expanded();
    let items: Vec<ListItem> = dash
        .meetings()
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let mut lines = vec![Line::from(m.text().to_string())];
            if expanded == Some(idx) {
                let note = dash.notes().note(idx);
                let editing = state.mode == Mode::EditingNote(idx);
                let style = Style::default().fg(if editing { Color::Cyan } else { Color::Gray });
                if note.is_empty() && !editing {
                    lines.push(Line::styled("  Add your notes... (e)", style));
                } else {
                    for l in note.lines() {
                        lines.push(Line::styled(format!("  {l}"), style));
                    }
                    if editing {
                        lines.push(Line::styled("  _", style));
                    }
                }
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_emails(f: &mut Frame, area: Rect, dash: &DashboardState) {
    let block = Block::default().title(" Recent Emails ").borders(Borders::ALL);

    if dash.emails().is_empty() {
        f.render_widget(Paragraph::new("Loading emails or none found.").block(block), area);
        return;
    }

    let mut lines = Vec::new();
    for e in dash.emails() {
        lines.push(Line::styled(
            e.subject_or_placeholder().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(vec![
            Span::styled("From: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(e.from_or_placeholder().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Date: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(e.date_or_placeholder().to_string()),
        ]));
        lines.push(Line::styled(
            e.snippet_or_placeholder().to_string(),
            Style::default().fg(Color::Gray),
        ));
        lines.push(Line::default());
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_categories(f: &mut Frame, area: Rect, dash: &DashboardState) {
    let block = Block::default().title(" Categories ").borders(Borders::ALL);

    let mut lines = Vec::new();
    for group in category_view::project(dash.classification(), &Category::ALL) {
        lines.push(Line::styled(
            format!("{} ({})", group.title, group.items.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if group.items.is_empty() {
            lines.push(Line::styled("  none", Style::default().fg(Color::DarkGray)));
        }
        for item in group.items {
            lines.push(Line::from(format!("  • {item}")));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, mode: Mode) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let hint = match mode {
        Mode::Browse => Line::from(vec![
            Span::styled("j/k", bold),
            Span::raw(" move  "),
            Span::styled("Enter", bold),
            Span::raw(" expand  "),
            Span::styled("e", bold),
            Span::raw(" note  "),
            Span::styled("q", bold),
            Span::raw(" quit"),
        ]),
        Mode::EditingNote(_) => Line::from(vec![
            Span::raw("typing note  "),
            Span::styled("Esc", bold),
            Span::raw(" done"),
        ]),
    };
    f.render_widget(Paragraph::new(hint), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::session::{Identity, SessionTracker};

    fn screen(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn unauthenticated_shows_login_prompt() {
        let out = screen(&mut AppState::new(None));
        assert!(out.contains("Please log in"));
    }

    #[test]
    fn fresh_session_renders_loading_before_cycle_runs() {
        let session = SessionTracker::new().observe(Some(Identity::new("u")));
        let out = screen(&mut AppState::new(session));
        assert!(out.contains("syncing"));
        assert!(out.contains("Meetings are loading..."));
        assert!(!out.contains("No meetings found."));
    }

    #[test]
    fn empty_dashboard_shows_placeholders_and_all_categories() {
        let session = SessionTracker::new().observe(Some(Identity::new("u")));
        let dash = session.as_ref().unwrap().dashboard.clone();
        let t = dash.apply(|s| s.begin_cycle());
        dash.apply(|s| s.finish_cycle(t));

        let out = screen(&mut AppState::new(session));
        assert!(!out.contains("syncing"));
        assert!(out.contains("No meetings found."));
        assert!(out.contains("Loading emails or none found."));
        assert!(out.contains("Travel (0)"));
        assert!(out.contains("Other (0)"));
    }
}
