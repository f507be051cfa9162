use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{AdminApp, AdminTab, BrowseRow, EditorScreen, KeyMode, Screen};
use crate::forms::AdminForm;
use crate::models::{ContentStatus, DraftStatus};

pub fn draw(frame: &mut Frame, app: &AdminApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match &app.screen {
        Screen::Browse => match app.tab {
            AdminTab::Content => render_content_tree(frame, app, chunks[1]),
            AdminTab::Ads => render_placements(frame, app, chunks[1]),
        },
        Screen::BookForm(form) => render_form(frame, form, app.form_index, chunks[1]),
        Screen::AdForm(form) => render_form(frame, form, app.form_index, chunks[1]),
        Screen::Editor(screen) => render_editor(frame, app, screen, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    if let Some(input) = &app.input {
        render_input(frame, &input.label, &input.buffer);
    }
    if let Some(confirm) = &app.confirm {
        render_confirm(frame, &confirm.prompt());
    }
    if app.show_help {
        render_help(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &AdminApp, area: Rect) {
    let titles: Vec<Line> = AdminTab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let selected = AdminTab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" BookBridge Admin {} ", app.route))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn status_span(status: Option<ContentStatus>) -> Span<'static> {
    match status {
        None => Span::styled("[no content]", Style::default().fg(Color::DarkGray)),
        Some(ContentStatus::Draft) => Span::styled("[draft]", Style::default().fg(Color::Yellow)),
        Some(ContentStatus::Published) => {
            Span::styled("[published]", Style::default().fg(Color::Green))
        }
        Some(ContentStatus::Archived) => {
            Span::styled("[archived]", Style::default().fg(Color::DarkGray))
        }
    }
}

fn render_content_tree(frame: &mut Frame, app: &AdminApp, area: Rect) {
    let items: Vec<ListItem> = app
        .content_rows()
        .into_iter()
        .map(|row| match row {
            BrowseRow::Book(i) => {
                let book = &app.books[i];
                let marker = if app.expanded.contains(&book.id) { "▾ " } else { "▸ " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        book.title.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", book.title_ch), Style::default().fg(Color::Blue)),
                    Span::styled(format!("  {}", book.author), Style::default().fg(Color::DarkGray)),
                ]))
            }
            BrowseRow::Chapter(i, j) => match app.chapter_at(i, j) {
                Some(listing) => ListItem::new(Line::from(vec![
                    Span::raw(format!("    {}. {} ", listing.chapter.order, listing.chapter.title)),
                    status_span(listing.content_status),
                ])),
                None => ListItem::new(""),
            },
        })
        .collect();

    let title = format!(" Books ({}) ", app.books.len());
    render_list(frame, items, &title, app.selected_index, area);
}

fn render_placements(frame: &mut Frame, app: &AdminApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (label, color) = if app.adsense_enabled {
        ("ON", Color::Green)
    } else {
        ("OFF", Color::Red)
    };
    let toggle = Paragraph::new(Line::from(vec![
        Span::raw("Ads on public pages: "),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("   (t to toggle)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" AdSense "));
    frame.render_widget(toggle, chunks[0]);

    let items: Vec<ListItem> = app
        .placements
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", p.name), Style::default().fg(Color::White)),
                Span::styled(format!("{:<20}", p.location), Style::default().fg(Color::Blue)),
                Span::raw(format!("{} / {}  ", p.ad_client, p.ad_slot)),
                Span::styled(
                    format!("{} {}", p.format.as_str(), p.status),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Placements ({}) ", app.placements.len());
    render_list(frame, items, &title, app.selected_index, chunks[1]);
}

fn render_list(frame: &mut Frame, items: Vec<ListItem>, title: &str, selected: usize, area: Rect) {
    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form<F: AdminForm>(frame: &mut Frame, form: &F, selected: usize, area: Rect) {
    let items: Vec<ListItem> = form
        .labels()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let value = form.value(i);
            let value_style = if form.is_choice(i) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{label:<18}"), Style::default().fg(Color::Blue)),
                Span::styled(value, value_style),
            ]))
        })
        .collect();

    render_list(frame, items, &format!(" {} ", form.title()), selected, area);
}

fn preview(text: &str, width: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > width {
        let cut: String = first_line.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        first_line.to_string()
    }
}

fn render_editor(frame: &mut Frame, app: &AdminApp, screen: &EditorScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let width = chunks[0].width.saturating_sub(40) as usize;
    let items: Vec<ListItem> = screen
        .editor
        .fields()
        .into_iter()
        .map(|path| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<34}", path.label()), Style::default().fg(Color::Blue)),
                Span::raw(preview(&screen.editor.value(path), width.max(8))),
            ]))
        })
        .collect();

    let dirty = if screen.editor.dirty { " *" } else { "" };
    let draft = match screen.draft_status {
        DraftStatus::Idle => String::new(),
        DraftStatus::Generating => format!(" {} drafting", app.spinner()),
        DraftStatus::Applied => " draft applied".to_string(),
        DraftStatus::Failed => " draft failed".to_string(),
    };
    let title = format!(
        " {} · {}{dirty}{draft} ",
        screen.book.title, screen.chapter.title
    );
    render_list(frame, items, &title, screen.selected, chunks[0]);

    let (label, value) = match screen.selected_field() {
        Some(path) => (path.label(), screen.editor.value(path)),
        None => (String::new(), String::new()),
    };
    let detail = Paragraph::new(value)
        .block(
            Block::default()
                .title(format!(" {label} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, chunks[1]);
}

fn render_status(frame: &mut Frame, app: &AdminApp, area: Rect) {
    let (text, color) = if let Some(error) = &app.error {
        (format!("Error: {error}"), Color::Red)
    } else if let Some(notice) = &app.notice {
        (notice.clone(), Color::Green)
    } else {
        let hints = match (app.key_mode(), app.tab) {
            (KeyMode::Browse, AdminTab::Content) => {
                "Enter:open  n:new book  e:edit  c:add chapter  d:delete  o:browser  Tab:ads  ?:help  q:quit"
            }
            (KeyMode::Browse, AdminTab::Ads) => {
                "Enter/e:edit  n:new placement  d:delete  t:toggle ads  Tab:content  ?:help  q:quit"
            }
            (KeyMode::Form, _) => "Enter:edit field  Space:cycle  s:save  Esc:cancel",
            (KeyMode::Editor, _) => {
                "Enter:edit  Space:cycle/mark  V/E/K/Q:add  D:remove question  +/-:importance  g:draft  s:save  Esc:back"
            }
            _ => "",
        };
        (hints.to_string(), Color::DarkGray)
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, label: &str, buffer: &str) {
    let area = centered_rect(70, 20, frame.area());

    let block = Block::default()
        .title(format!(" {label} (Enter to apply, Esc to cancel) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(format!("> {buffer}_"))
        .block(block)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame, prompt: &str) {
    let area = centered_rect(50, 15, frame.area());

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        Line::from(Span::styled("y: yes   n: no", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 80, frame.area());

    let help_text = vec![
        "",
        " Lists:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    Expand book / open chapter editor / edit placement",
        "   Tab      Switch between Content and AdSense",
        "   n        New book or placement",
        "   e        Edit book or placement",
        "   c        Add chapter to the selected book",
        "   d        Delete (asks first)",
        "   t        Toggle ads on public pages",
        "   o        Open the public page in a browser",
        "   r        Reload",
        "",
        " Forms and editor:",
        "   Enter    Edit field / cycle choice",
        "   Space    Cycle choice, mark correct option",
        "   V E K Q  Add vocabulary, example, key point, question",
        "   D        Remove the selected question",
        "   + / -    Key point importance",
        "   g        Generate a draft",
        "   s        Save",
        "   Esc      Back",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
