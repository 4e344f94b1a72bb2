//! TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::views;
use super::Screen;
use crate::domain::{
    ContentTab, Palette, Poetry, PreferenceStore, Selection, SelectionState, Story, Theme,
    ThemeState,
};
use crate::storage::LoadState;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box; the query applies live
    Search,
}

const HELP: &str =
    "j/k:move tab:switch g/G:genre x:all genres /:search t:theme enter:open q:quit";

/// Application state
pub struct App {
    /// Settled outcome of the single content load
    content: LoadState,

    /// Active theme and its persisted preference
    theme: ThemeState<Box<dyn PreferenceStore>>,

    /// Themes the site enables
    available_themes: Vec<Theme>,

    /// Tab, genre filter and query
    selection: SelectionState,

    /// Highlighted row in the active tab
    list_index: usize,

    screen: Screen,

    input_mode: InputMode,

    /// Status message to display
    status_message: Option<String>,

    /// Whether to quit
    should_quit: bool,
}

impl App {
    pub fn new(
        content: LoadState,
        theme: ThemeState<Box<dyn PreferenceStore>>,
        available_themes: Vec<Theme>,
    ) -> Self {
        Self {
            content,
            theme,
            available_themes,
            selection: SelectionState::default(),
            list_index: 0,
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit() {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize | Event::Tick => {}
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let palette = self.palette();
        match (&self.content, self.screen()) {
            (LoadState::Loading, _) => views::status::draw_loading(frame, palette),
            (LoadState::Error(message), _) => views::status::draw_error(frame, palette, message),
            (LoadState::Ready(library), Screen::Home) => views::home::draw(frame, self, library),
            (LoadState::Ready(library), Screen::Story { id, page }) => match library.story(id) {
                Some(story) => views::reader::draw_story(frame, palette, story, *page),
                None => views::home::draw(frame, self, library),
            },
            (LoadState::Ready(library), Screen::Poem { id, scroll }) => match library.poem(id) {
                Some(poem) => views::reader::draw_poem(frame, palette, poem, *scroll),
                None => views::home::draw(frame, self, library),
            },
        }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.content.library().is_none() {
            // Loading or error: nothing to browse
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.should_quit = true;
            }
            return;
        }

        match (&self.input_mode, &self.screen) {
            (InputMode::Search, _) => self.handle_search_key(key),
            (InputMode::Normal, Screen::Home) => self.handle_home_key(key),
            (InputMode::Normal, Screen::Story { .. }) => self.handle_story_key(key),
            (InputMode::Normal, Screen::Poem { .. }) => self.handle_poem_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }

            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.visible_len();
                if len > 0 {
                    self.list_index = (self.list_index + 1) % len;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.visible_len();
                if len > 0 {
                    self.list_index = (self.list_index + len - 1) % len;
                }
            }

            KeyCode::Tab | KeyCode::BackTab => {
                self.selection.active_tab = self.selection.active_tab.toggle();
                self.list_index = 0;
            }
            KeyCode::Char('1') => {
                self.selection.active_tab = ContentTab::Stories;
                self.list_index = 0;
            }
            KeyCode::Char('2') => {
                self.selection.active_tab = ContentTab::Poetries;
                self.list_index = 0;
            }

            KeyCode::Char('g') => {
                let genres = self.genres();
                self.selection.cycle_genre(&genres);
                self.list_index = 0;
            }
            KeyCode::Char('G') => {
                let genres = self.genres();
                self.selection.cycle_genre_back(&genres);
                self.list_index = 0;
            }
            KeyCode::Char('x') => {
                self.selection.clear_filters();
                self.list_index = 0;
            }

            KeyCode::Char('/') => {
                if self.search_enabled() {
                    self.input_mode = InputMode::Search;
                } else {
                    self.status_message = Some("Search is disabled for this site".to_string());
                }
            }
            KeyCode::Esc => {
                self.selection.search_query.clear();
                self.list_index = 0;
            }

            KeyCode::Char('t') => self.cycle_theme(),

            KeyCode::Enter => self.open_selected(),

            KeyCode::Char('?') => {
                self.status_message = Some(HELP.to_string());
            }

            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.selection.search_query.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.selection.search_query.pop();
            }
            KeyCode::Char(c) => {
                self.selection.search_query.push(c);
            }
            _ => return,
        }
        self.list_index = 0;
    }

    fn handle_story_key(&mut self, key: KeyEvent) {
        let page_count = match (&self.screen, self.content.library()) {
            (Screen::Story { id, .. }, Some(library)) => {
                library.story(id).map_or(0, |s| s.pages.len())
            }
            _ => 0,
        };

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.screen = Screen::Home,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
                if let Screen::Story { page, .. } = &mut self.screen {
                    if *page + 1 < page_count {
                        *page += 1;
                    }
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if let Screen::Story { page, .. } = &mut self.screen {
                    *page = page.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn handle_poem_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.screen = Screen::Home,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('j') | KeyCode::Down => {
                if let Screen::Poem { scroll, .. } = &mut self.screen {
                    *scroll = scroll.saturating_add(1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Screen::Poem { scroll, .. } = &mut self.screen {
                    *scroll = scroll.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn cycle_theme(&mut self) {
        if self.available_themes.is_empty() {
            self.status_message = Some("This site enables no themes".to_string());
            return;
        }
        self.theme.cycle(&self.available_themes);
        self.status_message = Some(format!("Theme: {}", self.theme.current()));
    }

    fn open_selected(&mut self) {
        let Some(library) = self.content.library() else {
            return;
        };
        let selection = self.selection.apply(library);

        let screen = match self.selection.active_tab {
            ContentTab::Stories => selection.stories.get(self.list_index).map(|s| Screen::Story {
                id: s.id.clone(),
                page: 0,
            }),
            ContentTab::Poetries => selection.poetries.get(self.list_index).map(|p| Screen::Poem {
                id: p.id.clone(),
                scroll: 0,
            }),
        };

        if let Some(screen) = screen {
            self.screen = screen;
        }
    }

    fn visible_len(&self) -> usize {
        match self.selection() {
            Some(selection) => match self.selection.active_tab {
                ContentTab::Stories => selection.stories.len(),
                ContentTab::Poetries => selection.poetries.len(),
            },
            None => 0,
        }
    }

    fn genres(&self) -> Vec<String> {
        self.content
            .library()
            .map(|library| library.genres().to_vec())
            .unwrap_or_default()
    }

    fn search_enabled(&self) -> bool {
        self.content
            .library()
            .is_some_and(|library| library.config().header.show_search)
    }

    // Accessors for views

    /// Current filtered view; recomputed on every call
    pub fn selection(&self) -> Option<Selection<'_>> {
        self.content.library().map(|library| self.selection.apply(library))
    }

    pub fn selection_state(&self) -> &SelectionState {
        &self.selection
    }

    pub fn list_index(&self) -> usize {
        self.list_index
    }

    pub fn palette(&self) -> &Palette {
        self.theme.palette()
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn selected_story<'a>(&self, selection: &Selection<'a>) -> Option<&'a Story> {
        match self.selection.active_tab {
            ContentTab::Stories => selection.stories.get(self.list_index).copied(),
            ContentTab::Poetries => None,
        }
    }

    pub fn selected_poem<'a>(&self, selection: &Selection<'a>) -> Option<&'a Poetry> {
        match self.selection.active_tab {
            ContentTab::Poetries => selection.poetries.get(self.list_index).copied(),
            ContentTab::Stories => None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
