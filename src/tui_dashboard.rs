use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::api::{AnalyticsReport, ApiClient, LinkAnalytics, LinkPage, ShortLink};
use crate::store::SessionStore;
use crate::tui::TuiRunOptions;

const PAGE_SIZE: u32 = 10;

pub(crate) fn run(opts: TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the dashboard requires an interactive terminal (TTY)");
    }

    // Connect and check the session before touching the terminal, so
    // failures come out as plain errors on a sane screen.
    let store = SessionStore::open(SessionStore::default_root()?)?;
    let base_url = match opts.api_url {
        Some(url) => url,
        None => store.read_config()?.api_base_url().to_string(),
    };
    let client = ApiClient::open(base_url, store)?;
    if client.current_session().is_none() {
        anyhow::bail!("not signed in (run `shortify login --email ...`)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut app = Dashboard::new(client);
    app.reload();
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

struct Dashboard {
    client: ApiClient,
    page: u32,
    links: Option<LinkPage>,
    report: Option<AnalyticsReport>,
    selected: usize,
    status: String,
    updated_at: String,
    quit: bool,
}

impl Dashboard {
    fn new(client: ApiClient) -> Self {
        Self {
            client,
            page: 1,
            links: None,
            report: None,
            selected: 0,
            status: String::new(),
            updated_at: String::new(),
            quit: false,
        }
    }

    fn reload(&mut self) {
        self.status.clear();
        match self.client.links(self.page, PAGE_SIZE) {
            Ok(page) => {
                self.selected = self
                    .selected
                    .min(page.data.len().saturating_sub(1));
                self.links = Some(page);
            }
            Err(err) => self.status = err.to_string(),
        }
        match self.client.analytics() {
            Ok(report) => self.report = Some(report),
            Err(err) => {
                if self.status.is_empty() {
                    self.status = err.to_string();
                }
            }
        }
        self.updated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
    }

    fn items(&self) -> &[ShortLink] {
        self.links.as_ref().map(|p| p.data.as_slice()).unwrap_or(&[])
    }

    fn selected_link(&self) -> Option<&ShortLink> {
        self.items().get(self.selected)
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        let max = self.items().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    fn next_page(&mut self) {
        if let Some(page) = &self.links
            && let Some(next) = page.pagination.next_page
        {
            self.page = next;
            self.selected = 0;
            self.reload();
        }
    }

    fn prev_page(&mut self) {
        if let Some(page) = &self.links
            && let Some(prev) = page.pagination.prev_page
        {
            self.page = prev;
            self.selected = 0;
            self.reload();
        }
    }

    fn delete_selected(&mut self) {
        let Some(link) = self.selected_link() else {
            return;
        };
        let code = link.code.clone();
        match self.client.delete_links(&[code.clone()]) {
            Ok(_) => {
                // Stepping off a now-empty trailing page.
                if self.items().len() == 1 && self.page > 1 {
                    self.page -= 1;
                }
                self.reload();
                self.status = format!("Deleted {}", code);
            }
            Err(err) => self.status = err.to_string(),
        }
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut Dashboard,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }
        if event::poll(Duration::from_millis(200)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut Dashboard, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char('r') => app.reload(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char('d') => app.delete_selected(),
        _ => {}
    }
}

fn draw(frame: &mut ratatui::Frame, app: &Dashboard) {
    let header = Line::from(vec![
        Span::styled("Shortify", Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(app.updated_at.clone(), Style::default().fg(Color::Gray)),
    ]);
    let outer = Block::default().borders(Borders::ALL).title(header);
    let inner = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(overview_line(app)), rows[0]);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    render_links(frame, app, parts[0]);
    render_detail(frame, app, parts[1]);

    let footer = if app.status.is_empty() {
        Line::from(Span::styled(
            "q: quit  r: reload  j/k: move  n/p: page  d: delete",
            Style::default().fg(Color::Gray),
        ))
    } else {
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Red),
        ))
    };
    frame.render_widget(Paragraph::new(footer), rows[2]);
}

fn overview_line(app: &Dashboard) -> Line<'static> {
    match &app.report {
        Some(report) => Line::from(format!(
            "links: {}   clicks: {}   this month: {}   avg/link: {:.1}",
            report.overview.total_urls,
            report.overview.total_clicks,
            report.overview.this_month_clicks,
            report.overview.average_ctr
        )),
        None => Line::from("(analytics unavailable)"),
    }
}

fn render_links(frame: &mut ratatui::Frame, app: &Dashboard, area: ratatui::layout::Rect) {
    let items = app.items();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.selected.min(items.len().saturating_sub(1))));
    }

    let mut rows = Vec::new();
    for link in items {
        rows.push(ListItem::new(format!(
            "{}  {:>6}  {}",
            link.code, link.click_count, link.url
        )));
    }
    if items.is_empty() {
        rows.push(ListItem::new("(no links)"));
    }

    let title = match &app.links {
        Some(page) => format!(
            "links p{}/{} ({} total)",
            page.pagination.current_page, page.pagination.total_pages, page.pagination.total_items
        ),
        None => "links".to_string(),
    };

    let list = List::new(rows)
        .block(Block::default().borders(Borders::RIGHT).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut ratatui::Frame, app: &Dashboard, area: ratatui::layout::Rect) {
    let details = match app.selected_link() {
        None => vec![Line::from("(no selection)")],
        Some(link) => {
            let mut out = Vec::new();
            out.push(Line::from(format!("code: {}", link.code)));
            out.push(Line::from(format!("short: {}", link.short_url)));
            out.push(Line::from(format!("target: {}", link.url)));
            out.push(Line::from(format!("clicks: {}", link.click_count)));
            out.push(Line::from(format!("created: {}", fmt_created(link.createdon))));

            if let Some(stats) = link_stats(app, &link.code) {
                if !stats.countries.is_empty() {
                    out.push(Line::from(""));
                    out.push(Line::from("countries:"));
                    for c in &stats.countries {
                        out.push(Line::from(format!(
                            "  {}  {:.0}%  {}",
                            c.name, c.percentage, c.clicks
                        )));
                    }
                }
                out.push(Line::from(""));
                out.push(Line::from(format!(
                    "mobile {:.0}% / desktop {:.0}%",
                    stats.devices.mobile.percentage, stats.devices.desktop.percentage
                )));
                if !stats.referrers.is_empty() {
                    out.push(Line::from("referrers:"));
                    for r in &stats.referrers {
                        out.push(Line::from(format!(
                            "  {}  {:.0}%  {}",
                            r.name, r.percentage, r.clicks
                        )));
                    }
                }
            }
            out
        }
    };
    frame.render_widget(Paragraph::new(details).wrap(Wrap { trim: false }), area);
}

fn link_stats<'a>(app: &'a Dashboard, code: &str) -> Option<&'a LinkAnalytics> {
    app.report
        .as_ref()?
        .top_urls
        .iter()
        .find(|l| l.code == code)
}

fn fmt_created(ts: i64) -> String {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}
