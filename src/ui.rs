use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    prelude::*,
    widgets::{
        canvas::Canvas, Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap,
    },
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use friendbridge::auth::Session;
use friendbridge::filter::{self, PeopleFilter, HIGH_COMPATIBILITY};
use friendbridge::models::{
    Category, Challenge, CompatibilityBand, Conversation, DeliveryStatus, Difficulty, Location, Message,
    Person, PresenceStatus, UserStats,
};
use friendbridge::seed::{self, MAP_HEIGHT, MAP_WIDTH};
use friendbridge::settings::AccountSettings;
use friendbridge::ConversationStore;

// Export types needed by main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

/// Seconds a notification stays on screen
pub const NOTIFICATION_TIMEOUT_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    People,
    Messages,
    Map,
    Challenges,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::People,
        Screen::Messages,
        Screen::Map,
        Screen::Challenges,
        Screen::Settings,
    ];

    fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::People => "People",
            Screen::Messages => "Messages",
            Screen::Map => "Campus Map",
            Screen::Challenges => "Challenges",
            Screen::Settings => "Settings",
        }
    }

    fn index(&self) -> usize {
        Screen::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn from_digit(c: char) -> Option<Screen> {
        let n = c.to_digit(10)? as usize;
        Screen::ALL.get(n.checked_sub(1)?).copied()
    }

    fn has_search(&self) -> bool {
        matches!(self, Screen::People | Screen::Messages | Screen::Map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Browse,
    Search,
    Compose,
    EditName,
}

/// Requests the UI hands back to the main loop
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Quit,
    SaveSettings(AccountSettings),
    MessageSent { conversation_id: String },
}

// Transient notice in the top-right corner
struct Notification {
    text: String,
    is_error: bool,
    timestamp: chrono::DateTime<chrono::Utc>,
}

struct HelpDialog {}

pub struct App {
    screen: Screen,
    focus: Focus,
    session: Session,
    settings: AccountSettings,
    people: Vec<Person>,
    people_filter: PeopleFilter,
    people_index: usize,
    conversations: ConversationStore,
    challenges: Vec<Challenge>,
    challenge_category: Option<Category>,
    challenge_index: usize,
    locations: Vec<Location>,
    location_category: Option<Category>,
    location_index: usize,
    stats: UserStats,
    search: Input,
    compose: Input,
    name_input: Input,
    notification: Option<Notification>,
    help_dialog: Option<HelpDialog>,
}

impl App {
    pub fn new(session: Session, settings: AccountSettings) -> Self {
        App {
            screen: Screen::Dashboard,
            focus: Focus::Browse,
            session,
            settings,
            people: seed::people(),
            people_filter: PeopleFilter::All,
            people_index: 0,
            conversations: ConversationStore::new(seed::conversations()),
            challenges: seed::challenges(),
            challenge_category: None,
            challenge_index: 0,
            locations: seed::locations(),
            location_category: None,
            location_index: 0,
            stats: seed::user_stats(),
            search: Input::default(),
            compose: Input::default(),
            name_input: Input::default(),
            notification: None,
            help_dialog: None,
        }
    }

    #[cfg(test)]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &AccountSettings {
        &self.settings
    }

    #[cfg(test)]
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            debug!("UI: switching to {} screen", screen.title());
        }
        self.screen = screen;
        self.focus = Focus::Browse;
        self.search = Input::default();
        self.people_index = 0;
        self.location_index = 0;
        self.challenge_index = 0;
    }

    pub fn notify(&mut self, text: &str) {
        self.notification = Some(Notification {
            text: text.to_string(),
            is_error: false,
            timestamp: chrono::Utc::now(),
        });
    }

    pub fn notify_error(&mut self, text: &str) {
        self.notification = Some(Notification {
            text: text.to_string(),
            is_error: true,
            timestamp: chrono::Utc::now(),
        });
    }

    #[cfg(test)]
    pub fn notification_text(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.text.as_str())
    }

    // Drop the notification once it has been shown long enough
    pub fn clean_notifications(&mut self, timeout_secs: i64) {
        if let Some(notification) = &self.notification {
            let now = chrono::Utc::now();
            if (now - notification.timestamp).num_seconds() > timeout_secs {
                debug!("UI: Auto-dismissing notification '{}'", notification.text);
                self.notification = None;
            }
        }
    }

    pub fn show_help_dialog(&mut self) {
        self.help_dialog = Some(HelpDialog {});
    }

    fn visible_people(&self) -> Vec<&Person> {
        filter::filter_people(
            &self.people,
            self.people_filter,
            self.search.value(),
            self.settings.match_preferences.min_compatibility,
        )
    }

    fn visible_conversations(&self) -> Vec<&Conversation> {
        self.conversations.search(self.search.value())
    }

    fn visible_locations(&self) -> Vec<&Location> {
        filter::filter_locations(&self.locations, self.location_category, self.search.value())
    }

    fn visible_challenges(&self) -> Vec<&Challenge> {
        filter::filter_challenges(&self.challenges, self.challenge_category)
    }

    fn highlighted_person(&self) -> Option<&Person> {
        let people = self.visible_people();
        people.get(self.people_index.min(people.len().saturating_sub(1))).copied()
    }

    fn highlighted_location(&self) -> Option<&Location> {
        let locations = self.visible_locations();
        locations.get(self.location_index.min(locations.len().saturating_sub(1))).copied()
    }

    fn highlighted_challenge(&self) -> Option<&Challenge> {
        let challenges = self.visible_challenges();
        challenges.get(self.challenge_index.min(challenges.len().saturating_sub(1))).copied()
    }

    /// Poll the terminal for one key press and apply it.
    pub fn handle_input(&mut self) -> Result<Option<UiAction>> {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(None)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        // Any key closes the help dialog
        if self.help_dialog.is_some() {
            self.help_dialog = None;
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Some(UiAction::Quit),
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.show_help_dialog();
                    return None;
                }
                KeyCode::Char('s') if self.screen == Screen::Settings && self.focus == Focus::Browse => {
                    return Some(UiAction::SaveSettings(self.settings.clone()));
                }
                _ => {}
            }
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Compose => self.handle_compose_key(key),
            Focus::EditName => self.handle_edit_name_key(key),
            Focus::Browse => self.handle_browse_key(key),
        }
    }

    fn next_focus(&mut self) {
        self.focus = match (self.screen, self.focus) {
            (Screen::Messages, Focus::Browse) => Focus::Search,
            (Screen::Messages, Focus::Search) => Focus::Compose,
            (Screen::Messages, _) => Focus::Browse,
            (screen, Focus::Browse) if screen.has_search() => Focus::Search,
            _ => Focus::Browse,
        };
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Browse,
            KeyCode::Tab => self.next_focus(),
            _ => {
                let before = self.search.value().to_string();
                self.search.handle_event(&Event::Key(key));
                if self.search.value() != before {
                    self.people_index = 0;
                    self.location_index = 0;
                }
            }
        }
        None
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Browse,
            KeyCode::Tab => self.next_focus(),
            KeyCode::Enter => return self.send_message(),
            _ => {
                self.compose.handle_event(&Event::Key(key));
            }
        }
        None
    }

    fn send_message(&mut self) -> Option<UiAction> {
        let text = self.compose.value().to_string();
        let conversation_id = self.conversations.selected_id()?.to_string();
        if self.conversations.append(&text).is_none() {
            return None;
        }
        self.compose = Input::default();
        info!("UI: Message sent to conversation {}", conversation_id);
        self.notify("Message sent");
        Some(UiAction::MessageSent { conversation_id })
    }

    fn handle_edit_name_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Browse,
            KeyCode::Enter => {
                let name = self.name_input.value().trim().to_string();
                if name.is_empty() {
                    self.notify_error("Name cannot be empty");
                } else {
                    self.settings.name = name;
                    self.notify("Name updated, Ctrl+S to save");
                    self.focus = Focus::Browse;
                }
            }
            _ => {
                self.name_input.handle_event(&Event::Key(key));
            }
        }
        None
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(UiAction::Quit),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(screen) = Screen::from_digit(c) {
                    self.set_screen(screen);
                }
            }
            KeyCode::Char('/') if self.screen.has_search() => self.focus = Focus::Search,
            // Some terminals deliver Ctrl+H as Backspace
            KeyCode::Char('?') => self.show_help_dialog(),
            KeyCode::Tab => self.next_focus(),
            KeyCode::Left => self.cycle_filter(false),
            KeyCode::Right => self.cycle_filter(true),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Enter => self.activate(),
            KeyCode::Char('+') | KeyCode::Char('=') if self.screen == Screen::Settings => {
                self.settings.match_preferences.raise();
            }
            KeyCode::Char('-') if self.screen == Screen::Settings => {
                self.settings.match_preferences.lower();
            }
            _ => {}
        }
        None
    }

    fn cycle_filter(&mut self, forward: bool) {
        match self.screen {
            Screen::People => {
                let filters = PeopleFilter::ALL;
                let current = filters.iter().position(|f| *f == self.people_filter).unwrap_or(0);
                self.people_filter = filters[step(current, filters.len(), forward)];
                self.people_index = 0;
            }
            Screen::Map => {
                self.location_category = cycle_category(self.location_category, forward);
                self.location_index = 0;
            }
            Screen::Challenges => {
                self.challenge_category = cycle_category(self.challenge_category, forward);
                self.challenge_index = 0;
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        match self.screen {
            Screen::People => {
                let len = self.visible_people().len();
                self.people_index = move_index(self.people_index, len, forward);
            }
            Screen::Map => {
                let len = self.visible_locations().len();
                self.location_index = move_index(self.location_index, len, forward);
            }
            Screen::Challenges => {
                let len = self.visible_challenges().len();
                self.challenge_index = move_index(self.challenge_index, len, forward);
            }
            Screen::Messages => {
                let ids: Vec<String> = self.visible_conversations().iter().map(|c| c.id.clone()).collect();
                if ids.is_empty() {
                    return;
                }
                let next = match self.conversations.selected_id().and_then(|id| ids.iter().position(|c| c == id)) {
                    Some(current) => step(current, ids.len(), forward),
                    None => 0,
                };
                self.conversations.select(&ids[next]);
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        match self.screen {
            Screen::Messages => {
                if self.conversations.selected().is_some() {
                    self.focus = Focus::Compose;
                }
            }
            Screen::People => {
                // Open the conversation with the highlighted person, if there is one
                let Some(name) = self.highlighted_person().map(|p| p.name.clone()) else {
                    return;
                };
                let id = self.conversations.conversations().iter().find(|c| c.name == name).map(|c| c.id.clone());
                match id {
                    Some(id) => {
                        self.set_screen(Screen::Messages);
                        self.conversations.select(&id);
                        self.focus = Focus::Compose;
                    }
                    None => self.notify_error(&format!("No conversation with {} yet", name)),
                }
            }
            Screen::Settings => {
                self.name_input = Input::new(self.settings.name.clone());
                self.focus = Focus::EditName;
            }
            _ => {}
        }
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Screen tabs
                Constraint::Min(5),    // Screen body
                Constraint::Length(1), // Help line
            ])
            .split(size);

        let titles: Vec<Line> = Screen::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("FriendBridge"))
            .select(self.screen.index())
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        match self.screen {
            Screen::Dashboard => draw_dashboard(frame, self, chunks[1]),
            Screen::People => draw_people(frame, self, chunks[1]),
            Screen::Messages => draw_messages_screen(frame, self, chunks[1]),
            Screen::Map => draw_map(frame, self, chunks[1]),
            Screen::Challenges => draw_challenges(frame, self, chunks[1]),
            Screen::Settings => draw_settings(frame, self, chunks[1]),
        }

        let help = Paragraph::new(Line::from(Span::styled(
            "1-6 screens | TAB focus | / search | \u{2190}\u{2192} filter | \u{2191}\u{2193} select | Ctrl+H help | ESC quit",
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(help, chunks[2]);

        if let Some(notification) = &self.notification {
            draw_notification(frame, notification, size);
        }

        if self.help_dialog.is_some() {
            draw_help_dialog(frame, size);
        }
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

fn move_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    step(index.min(len - 1), len, forward)
}

// All -> Campus -> ... -> Cultural -> All
fn cycle_category(current: Option<Category>, forward: bool) -> Option<Category> {
    let mut options: Vec<Option<Category>> = vec![None];
    options.extend(Category::ALL.iter().copied().map(Some));
    let position = options.iter().position(|c| *c == current).unwrap_or(0);
    options[step(position, options.len(), forward)]
}

fn status_color(status: PresenceStatus) -> Color {
    match status {
        PresenceStatus::Online => Color::Green,
        PresenceStatus::Offline => Color::DarkGray,
        PresenceStatus::Busy => Color::Yellow,
    }
}

fn status_dot(status: PresenceStatus) -> Span<'static> {
    Span::styled("\u{25cf} ", Style::default().fg(status_color(status)))
}

fn band_color(band: CompatibilityBand) -> Color {
    match band {
        CompatibilityBand::High => Color::Green,
        CompatibilityBand::Medium => Color::Yellow,
        CompatibilityBand::Low => Color::Red,
    }
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Campus => Color::Blue,
        Category::Social => Color::Green,
        Category::Academic => Color::Magenta,
        Category::Physical => Color::LightRed,
        Category::Cultural => Color::LightMagenta,
    }
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn filter_tabs<'a>(labels: Vec<String>, selected: usize) -> Tabs<'a> {
    Tabs::new(labels)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn category_labels() -> Vec<String> {
    let mut labels = vec!["All Activities".to_string()];
    labels.extend(Category::ALL.iter().map(|c| c.label().to_string()));
    labels
}

fn category_tab_index(category: Option<Category>) -> usize {
    match category {
        None => 0,
        Some(c) => Category::ALL.iter().position(|x| *x == c).map(|i| i + 1).unwrap_or(0),
    }
}

fn draw_search_box<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect, placeholder: &str) {
    let focused = app.focus == Focus::Search;
    let text = if app.search.value().is_empty() && !focused {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.value().to_string())
    };
    let widget = Paragraph::new(Line::from(text))
        .block(Block::default().borders(Borders::ALL).title("Search (/)").border_style(focused_border(focused)));
    f.render_widget(widget, area);
    if focused {
        f.set_cursor(area.x + app.search.cursor() as u16 + 1, area.y + 1);
    }
}

fn draw_dashboard<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let verified = if app.session.is_verified { "verified" } else { "unverified" };
    let welcome = vec![
        Line::from(Span::styled(
            format!("Welcome back, {}!", app.settings.display_name()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} ({})", app.session.email, verified)),
        Line::from(app.settings.university.clone()),
        Line::from(""),
        Line::from(format!("Unread messages: {}", app.conversations.unread_total())),
        Line::from(format!(
            "Points: {}   Streak: {} days",
            app.stats.total_points, app.stats.current_streak
        )),
    ];
    let welcome = Paragraph::new(welcome)
        .block(Block::default().borders(Borders::ALL).title("Find friends, share culture, belong"))
        .wrap(Wrap { trim: true });
    f.render_widget(welcome, left[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Challenge progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(app.stats.progress())
        .label(format!("{}/{}", app.stats.completed_challenges, app.stats.total_challenges));
    f.render_widget(gauge, left[1]);

    let matches: Vec<ListItem> = filter::filter_people(&app.people, PeopleFilter::HighCompatibility, "", None)
        .into_iter()
        .take(3)
        .map(|p| {
            ListItem::new(Line::from(vec![
                status_dot(p.status),
                Span::raw(format!("{} - {}, {} ", p.name, p.major, p.country)),
                Span::styled(format!("{}%", p.compatibility), Style::default().fg(band_color(p.compatibility_band()))),
            ]))
        })
        .collect();
    let matches = List::new(matches)
        .block(Block::default().borders(Borders::ALL).title(format!("Top matches ({}%+)", HIGH_COMPATIBILITY)));
    f.render_widget(matches, right[0]);

    let mut busiest: Vec<&Location> = app.locations.iter().collect();
    busiest.sort_by(|a, b| b.active_users.cmp(&a.active_users));
    let busiest: Vec<ListItem> = busiest
        .into_iter()
        .take(3)
        .map(|l| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", l.category.label()), Style::default().fg(category_color(l.category))),
                Span::raw(format!("{} - {} active, {}", l.name, l.active_users, l.distance)),
            ]))
        })
        .collect();
    let busiest = List::new(busiest).block(Block::default().borders(Borders::ALL).title("Happening on campus"));
    f.render_widget(busiest, right[1]);
}

fn draw_people<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);

    let selected_filter = PeopleFilter::ALL.iter().position(|p| *p == app.people_filter).unwrap_or(0);
    let labels = PeopleFilter::ALL.iter().map(|p| p.label().to_string()).collect();
    f.render_widget(filter_tabs(labels, selected_filter), left[0]);

    draw_search_box(f, app, left[1], "Search by name, major, or country...");

    let people = app.visible_people();
    let items: Vec<ListItem> = people
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                status_dot(p.status),
                Span::raw(format!("{:<16} {:<18} ", p.name, p.country)),
                Span::styled(format!("{:>3}%", p.compatibility), Style::default().fg(band_color(p.compatibility_band()))),
            ]))
        })
        .collect();

    let min_pref = match app.settings.match_preferences.min_compatibility {
        Some(min) => format!(", min {}%", min),
        None => String::new(),
    };
    let title = format!("People ({}{})", people.len(), min_pref);
    let mut state = ListState::default();
    if !people.is_empty() {
        state.select(Some(app.people_index.min(people.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(focused_border(app.focus == Focus::Browse)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, left[2], &mut state);

    let detail = match app.highlighted_person() {
        Some(p) => {
            let band = band_color(p.compatibility_band());
            vec![
                Line::from(Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
                Line::from(format!("{} \u{2022} {} \u{2022} {}", p.country, p.major, p.year)),
                Line::from(vec![
                    status_dot(p.status),
                    Span::raw(format!("Last active {}", p.last_activity)),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Compatibility: "),
                    Span::styled(format!("{}%", p.compatibility), Style::default().fg(band)),
                ]),
                Line::from(format!(
                    "Challenges together: {}/{} ({}%)",
                    p.challenges_completed,
                    p.total_challenges,
                    p.challenge_progress()
                )),
                Line::from(format!("Activities: {}", p.activities.join(", "))),
                Line::from(format!("Interests: {}", p.interests.join(", "))),
                Line::from(format!("Languages: {}", p.languages.join(", "))),
                Line::from(""),
                Line::from(Span::styled("Enter to message", Style::default().fg(Color::Gray))),
            ]
        }
        None => vec![Line::from("No people match your filters")],
    };
    let detail = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title("Profile"))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, columns[1]);
}

fn draw_messages_screen<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(columns[1]);

    draw_search_box(f, app, left[0], "Search conversations...");

    let selected_id = app.conversations.selected_id();
    let wrap_width = left[1].width.saturating_sub(4).max(1) as usize;
    let conversations = app.visible_conversations();
    let items: Vec<ListItem> = conversations
        .iter()
        .map(|c| {
            let marker = if Some(c.id.as_str()) == selected_id { "> " } else { "  " };
            let mut header = vec![
                Span::raw(marker),
                status_dot(c.status),
                Span::styled(c.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ];
            if c.unread_count > 0 {
                header.push(Span::styled(format!(" ({})", c.unread_count), Style::default().fg(Color::Cyan)));
            }
            let preview = wrap(&c.last_message, wrap_width)
                .into_iter()
                .next()
                .map(|l| l.into_owned())
                .unwrap_or_default();
            ListItem::new(vec![
                Line::from(header),
                Line::from(Span::styled(format!("    {}", preview), Style::default().fg(Color::Gray))),
                Line::from(Span::styled(format!("    {}", c.last_activity), Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Conversations")
            .border_style(focused_border(app.focus == Focus::Browse)),
    );
    f.render_widget(list, left[1]);

    match app.conversations.selected() {
        Some(conversation) => draw_messages(f, conversation, right[0]),
        None => {
            let empty = Paragraph::new("Select a conversation").block(Block::default().borders(Borders::ALL).title("Messages"));
            f.render_widget(empty, right[0]);
        }
    }

    let compose_focused = app.focus == Focus::Compose;
    let input = Paragraph::new(app.compose.value())
        .block(Block::default().title("Message").borders(Borders::ALL).border_style(focused_border(compose_focused)));
    f.render_widget(input, right[1]);
    if compose_focused {
        f.set_cursor(right[1].x + app.compose.cursor() as u16 + 1, right[1].y + 1);
    }
}

fn delivery_indicator(message: &Message) -> &'static str {
    if !message.is_own() {
        return "";
    }
    match message.delivery_status {
        DeliveryStatus::Sent => " \u{2713}",
        DeliveryStatus::Delivered => " \u{2713}\u{2713}",
        DeliveryStatus::Read => " \u{2713}\u{2713}\u{2713}",
    }
}

fn draw_messages<B: Backend>(f: &mut Frame<B>, conversation: &Conversation, area: Rect) {
    let wrap_width = area.width.saturating_sub(2).max(1) as usize; // Account for borders

    let items: Vec<ListItem> = conversation
        .messages
        .iter()
        .flat_map(|m| {
            let sender = if m.is_own() { "You" } else { conversation.name.as_str() };
            let full_content = format!("[{}] {}: {}{}", m.timestamp, sender, m.text, delivery_indicator(m));

            let wrapped_lines: Vec<String> = wrap(&full_content, wrap_width)
                .into_iter()
                .map(|l| l.into_owned())
                .collect();

            let style = if m.is_own() {
                match m.delivery_status {
                    DeliveryStatus::Sent => Style::default().fg(Color::Blue),
                    DeliveryStatus::Delivered | DeliveryStatus::Read => Style::default().fg(Color::Green),
                }
            } else {
                Style::default()
            };

            wrapped_lines
                .into_iter()
                .map(move |line| ListItem::new(Text::from(line)).style(style))
        })
        .collect();

    let title = format!(
        "{} \u{2022} {} \u{2022} {}",
        conversation.name, conversation.major, conversation.country
    );

    // Keep the newest message in view
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(items.len() - 1));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default());
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_map<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(5)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    draw_search_box(f, app, left[0], "Search locations...");
    f.render_widget(filter_tabs(category_labels(), category_tab_index(app.location_category)), left[1]);

    let locations = app.visible_locations();
    let highlighted = app.highlighted_location().map(|l| l.id.clone());
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Interactive Campus Map"))
        .x_bounds([0.0, MAP_WIDTH])
        .y_bounds([0.0, MAP_HEIGHT])
        .paint(|ctx| {
            for location in &locations {
                let style = if Some(&location.id) == highlighted.as_ref() {
                    Style::default().fg(category_color(location.category)).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(category_color(location.category))
                };
                // Display coordinates grow downwards, the canvas grows upwards
                ctx.print(
                    location.coordinates.x,
                    MAP_HEIGHT - location.coordinates.y,
                    Span::styled(format!("\u{25cf} {}", location.name), style),
                );
            }
        });
    f.render_widget(canvas, left[2]);

    let items: Vec<ListItem> = locations
        .iter()
        .map(|l| {
            ListItem::new(Line::from(vec![
                Span::styled("\u{25cf} ", Style::default().fg(category_color(l.category))),
                Span::raw(format!("{} ({} active)", l.name, l.active_users)),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    if !locations.is_empty() {
        state.select(Some(app.location_index.min(locations.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Locations ({})", locations.len())).border_style(focused_border(app.focus == Focus::Browse)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, right[0], &mut state);

    let detail = match app.highlighted_location() {
        Some(l) => vec![
            Line::from(Span::styled(l.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(l.category.label(), Style::default().fg(category_color(l.category)))),
            Line::from(l.description.clone()),
            Line::from(""),
            Line::from(format!("Distance: {}", l.distance)),
            Line::from(format!("Activities: {}", l.activities)),
            Line::from(format!("Active users: {}", l.active_users)),
        ],
        None => vec![Line::from("No locations match your search")],
    };
    let detail = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, right[1]);
}

fn draw_challenges<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(5)])
        .split(area);
    let stats_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(50), Constraint::Percentage(25)])
        .split(rows[0]);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let points = Paragraph::new(format!("{} points", app.stats.total_points))
        .block(Block::default().borders(Borders::ALL).title("Total"));
    f.render_widget(points, stats_row[0]);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Completed"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(app.stats.progress())
        .label(format!("{}/{}", app.stats.completed_challenges, app.stats.total_challenges));
    f.render_widget(gauge, stats_row[1]);
    let streak = Paragraph::new(format!("{} days", app.stats.current_streak))
        .block(Block::default().borders(Borders::ALL).title("Streak"));
    f.render_widget(streak, stats_row[2]);

    f.render_widget(filter_tabs(category_labels(), category_tab_index(app.challenge_category)), rows[1]);

    let challenges = app.visible_challenges();
    let items: Vec<ListItem> = challenges
        .iter()
        .map(|c| {
            let done = if c.completed { "\u{2713} " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(done, Style::default().fg(Color::Green)),
                Span::raw(format!("{:<22} {:>4} pts ", c.title, c.points)),
                Span::styled(c.difficulty.label(), Style::default().fg(difficulty_color(c.difficulty))),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    if !challenges.is_empty() {
        state.select(Some(app.challenge_index.min(challenges.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Challenges ({})", challenges.len())).border_style(focused_border(true)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, body[0], &mut state);

    let detail = match app.highlighted_challenge() {
        Some(c) => vec![
            Line::from(Span::styled(c.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(vec![
                Span::styled(c.category.label(), Style::default().fg(category_color(c.category))),
                Span::raw(" \u{2022} "),
                Span::styled(c.difficulty.label(), Style::default().fg(difficulty_color(c.difficulty))),
            ]),
            Line::from(c.description.clone()),
            Line::from(""),
            Line::from(format!("Location: {} ({})", c.location, c.distance)),
            Line::from(format!("Points: {}", c.points)),
            Line::from(format!("Participants: {}", c.participants)),
            Line::from(if c.completed { "Completed" } else { "Not started" }),
        ],
        None => vec![Line::from("No challenges in this category")],
    };
    let detail = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, body[1]);
}

fn draw_settings<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let profile = Paragraph::new(vec![
        Line::from(format!("Full name:  {}", app.settings.name)),
        Line::from(format!("Email:      {}", app.settings.email)),
        Line::from(format!("University: {}", app.settings.university)),
        Line::from(""),
        Line::from(Span::styled("Enter to edit your name", Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().borders(Borders::ALL).title("Profile Information"));
    f.render_widget(profile, rows[0]);

    let min = match app.settings.match_preferences.min_compatibility {
        Some(v) => format!("{}%", v),
        None => "any".to_string(),
    };
    let prefs = Paragraph::new(vec![
        Line::from(format!("Minimum compatibility: {}", min)),
        Line::from(""),
        Line::from(Span::styled("+/- to adjust", Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().borders(Borders::ALL).title("Match Preferences"));
    f.render_widget(prefs, rows[1]);

    let actions = Paragraph::new(vec![
        Line::from("Ctrl+S  save settings"),
        Line::from("2       browse people"),
        Line::from("3       open messages"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Quick Actions"));
    f.render_widget(actions, rows[2]);

    if app.focus == Focus::EditName {
        let popup_width = 50.min(area.width.saturating_sub(4));
        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(popup_width)) / 2,
            area.y + area.height.saturating_sub(3) / 2,
            popup_width,
            3,
        );
        f.render_widget(Clear, popup_area);
        let input = Paragraph::new(app.name_input.value()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Full name (Enter to confirm, Esc to cancel)")
                .border_style(focused_border(true)),
        );
        f.render_widget(input, popup_area);
        f.set_cursor(popup_area.x + app.name_input.cursor() as u16 + 1, popup_area.y + 1);
    }
}

fn draw_notification<B: Backend>(f: &mut Frame<B>, notification: &Notification, area: Rect) {
    let width = (notification.text.chars().count() as u16 + 4).min(area.width);
    let popup_area = Rect::new(area.width.saturating_sub(width), 0, width, 3.min(area.height));
    let color = if notification.is_error { Color::Red } else { Color::Green };

    f.render_widget(Clear, popup_area);
    let widget = Paragraph::new(notification.text.as_str())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(widget, popup_area);
}

fn draw_help_dialog<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 16.min(area.height.saturating_sub(4));
    let popup_area = Rect::new(
        (area.width.saturating_sub(popup_width)) / 2,
        (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_area);
    let lines = vec![
        "1-6         switch screen",
        "TAB         cycle focus (list, search, message box)",
        "/           search people, conversations or locations",
        "Left/Right  change filter",
        "Up/Down     move selection",
        "Enter       open conversation / send / edit",
        "+ / -       minimum compatibility (Settings)",
        "Ctrl+S      save settings",
        "Ctrl+H, ?   this help",
        "ESC         leave input, or quit",
        "",
        "Press any key to close",
    ];
    let content = List::new(lines.into_iter().map(ListItem::new).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(Color::Green));
    f.render_widget(content, popup_area);
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let session = Session {
            token: "token".to_string(),
            email: "brutus.1@osu.edu".to_string(),
            issued_at: chrono::Utc::now(),
            is_verified: true,
            university: None,
        };
        App::new(session, AccountSettings::new("Brutus Buckeye", "brutus.1@osu.edu"))
    }

    fn press(app: &mut App, code: KeyCode) -> Option<UiAction> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_digits_switch_screens() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen(), Screen::Messages);
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.screen(), Screen::Settings);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.screen(), Screen::Settings);
    }

    #[test]
    fn test_escape_quits_from_browse() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Esc), Some(UiAction::Quit));
    }

    #[test]
    fn test_compose_and_send() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter); // focus compose on the selected conversation
        type_text(&mut app, "On my way");

        let before = app.conversations().selected().unwrap().messages.len();
        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(action, Some(UiAction::MessageSent { conversation_id: "1".to_string() }));

        let conversation = app.conversations().selected().unwrap();
        assert_eq!(conversation.messages.len(), before + 1);
        assert_eq!(conversation.last_message, "On my way");
        assert_eq!(app.notification_text(), Some("Message sent"));
    }

    #[test]
    fn test_blank_message_not_sent() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "   ");
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert_eq!(app.conversations().selected().unwrap().messages.len(), 4);
    }

    #[test]
    fn test_down_selects_next_conversation_without_clearing_unread() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        let selected = app.conversations().selected().unwrap();
        assert_eq!(selected.id, "3");
        assert_eq!(selected.unread_count, 1);
    }

    #[test]
    fn test_people_filter_cycles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.people_filter, PeopleFilter::HighCompatibility);
        assert_eq!(app.visible_people().len(), 4);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.people_filter, PeopleFilter::Recent);
    }

    #[test]
    fn test_search_focus_filters_people() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "finance");
        // Typing into search must not switch screens or quit
        assert_eq!(app.screen(), Screen::People);
        let names: Vec<&str> = app.visible_people().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Priya Sharma", "Maria Santos"]);
    }

    #[test]
    fn test_enter_on_person_opens_conversation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Down); // Fatima Ali
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Messages);
        assert_eq!(app.conversations().selected_id(), Some("2"));
    }

    #[test]
    fn test_person_without_conversation_notifies() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Down); // Wei Chen
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::People);
        assert_eq!(app.notification_text(), Some("No conversation with Wei Chen yet"));
    }

    #[test]
    fn test_map_category_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        for _ in 0..5 {
            press(&mut app, KeyCode::Right); // Cultural
        }
        assert_eq!(app.location_category, Some(Category::Cultural));
        let names: Vec<&str> = app.visible_locations().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Ohio Stadium", "Food Truck Court", "Wexner Center"]);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.location_category, None);
    }

    #[test]
    fn test_settings_edit_and_save() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.settings().match_preferences.min_compatibility, Some(55));

        press(&mut app, KeyCode::Enter);
        for _ in 0.."Brutus Buckeye".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Brutus");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.settings().name, "Brutus");

        let action = app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        match action {
            Some(UiAction::SaveSettings(saved)) => {
                assert_eq!(saved.name, "Brutus");
                assert_eq!(saved.match_preferences.min_compatibility, Some(55));
            }
            other => panic!("Expected SaveSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_help_dialog_swallows_next_key() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL));
        assert_eq!(press(&mut app, KeyCode::Esc), None);
        assert_eq!(press(&mut app, KeyCode::Esc), Some(UiAction::Quit));
    }

    #[test]
    fn test_notification_expires() {
        let mut app = app();
        app.notify("Saved");
        app.clean_notifications(NOTIFICATION_TIMEOUT_SECS);
        assert_eq!(app.notification_text(), Some("Saved"));
        app.clean_notifications(-1);
        assert_eq!(app.notification_text(), None);
    }
}
