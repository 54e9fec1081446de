//! Interactive TUI (Terminal User Interface) for Berth.
//!
//! Provides a responsive workspace picker with:
//! - Filter-as-you-type across name, description, and path
//! - Scope cycling (all / pinned / recent) and tag cycling
//! - Launching, pinning, and rescanning without leaving the picker
//!
//! The scan runs in the background; the picker drains scanner updates every
//! tick, so results stream in while the tree is still being walked.

use crate::app::App;
use crate::editor;
use berth_core::{filter, Catalog, Config, Filter, ScanUpdate, Scope, Workspace};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Picker state.
struct Picker {
    /// The main application
    app: App,

    /// Snapshot currently displayed
    catalog: Arc<Catalog>,

    /// Current filter text
    query_string: String,

    /// Current membership scope
    scope: Scope,

    /// Index into the catalog's tag list; None = no tag filter
    tag_index: Option<usize>,

    /// Current filtered results
    results: Vec<Workspace>,

    /// Selected result index
    selected: usize,

    /// Vertical scroll offset
    scroll_offset: usize,

    /// Whether we should quit
    should_quit: bool,

    /// Running entry count of the in-flight scan
    scan_count: Option<usize>,

    /// Status message
    status_message: Option<String>,
}

impl Picker {
    fn new(app: App) -> Self {
        let catalog = app.scanner.catalog();
        let mut picker = Picker {
            app,
            catalog,
            query_string: String::new(),
            scope: Scope::All,
            tag_index: None,
            results: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            should_quit: false,
            scan_count: Some(0),
            status_message: None,
        };
        picker.refilter();
        picker
    }

    /// Pull pending scanner updates into the picker state.
    fn drain_scanner(&mut self) {
        for update in self.app.scanner.poll() {
            match update {
                ScanUpdate::Progress { count, .. } => {
                    self.scan_count = Some(count);
                }
                ScanUpdate::Completed { catalog } => {
                    self.catalog = catalog;
                    self.scan_count = None;

                    // The tag list may have changed shape entirely.
                    if let Some(index) = self.tag_index {
                        if index >= self.catalog.tags().len() {
                            self.tag_index = None;
                        }
                    }
                    self.refilter();
                }
                ScanUpdate::Failed { error, .. } => {
                    self.scan_count = None;
                    self.status_message = Some(format!("Scan failed: {}", error));
                }
            }
        }
    }

    /// The filter corresponding to the current picker controls.
    fn current_filter(&self) -> Filter {
        let mut query = Filter::new()
            .with_text(self.query_string.clone())
            .with_scope(self.scope);

        if let Some(index) = self.tag_index {
            if let Some(tag) = self.catalog.tags().get(index) {
                query = query.with_tag(tag.clone());
            }
        }

        query
    }

    /// Re-run the filter against the current snapshot.
    fn refilter(&mut self) {
        self.results = filter::apply(
            &self.catalog,
            &self.current_filter(),
            &self.app.config.shortlist.pinned,
            &self.app.config.shortlist.recent,
        );

        // Reset selection
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Handle input character.
    fn on_char(&mut self, c: char) {
        self.query_string.push(c);
        self.refilter();
    }

    /// Handle backspace.
    fn on_backspace(&mut self) {
        self.query_string.pop();
        self.refilter();
    }

    /// Move selection up.
    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    /// Move selection down.
    fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    /// Page up.
    fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        self.ensure_visible();
    }

    /// Page down.
    fn page_down(&mut self, page_size: usize) {
        self.selected = (self.selected + page_size).min(self.results.len().saturating_sub(1));
        self.ensure_visible();
    }

    /// Ensure selected item is visible.
    fn ensure_visible(&mut self) {
        // This will be set properly based on visible area
        let visible_height = 20; // Approximate

        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }

    /// Cycle the membership scope.
    fn cycle_scope(&mut self) {
        self.scope = self.scope.cycle();
        self.refilter();
    }

    /// Cycle the tag filter through the catalog's tag list.
    fn cycle_tag(&mut self) {
        let tag_count = self.catalog.tags().len();
        self.tag_index = match self.tag_index {
            None if tag_count > 0 => Some(0),
            Some(index) if index + 1 < tag_count => Some(index + 1),
            _ => None,
        };
        self.refilter();
    }

    /// Launch the selected workspace in the editor.
    fn launch_selected(&mut self) {
        let workspace = match self.results.get(self.selected) {
            Some(ws) => ws.clone(),
            None => return,
        };

        match self.try_launch(&workspace) {
            Ok(()) => {
                self.status_message = Some(format!("Launched {}", workspace.name));
            }
            Err(e) => {
                self.status_message = Some(format!("Launch failed: {}", e));
            }
        }
    }

    fn try_launch(&mut self, workspace: &Workspace) -> anyhow::Result<()> {
        let binary = editor::resolve(self.app.config.general.editor.as_deref())?;
        editor::launch(&binary, &workspace.path)?;
        self.app.record_launch(&workspace.path_str())
    }

    /// Toggle the pin on the selected workspace.
    fn toggle_pin_selected(&mut self) {
        let path = match self.results.get(self.selected) {
            Some(ws) => ws.path_str().into_owned(),
            None => return,
        };

        self.app.config.toggle_pin(&path);
        if let Err(e) = self.app.save_config() {
            self.status_message = Some(format!("Could not save config: {}", e));
        }

        // Membership changed; re-run the filter but keep the cursor nearby.
        let previous = self.selected;
        self.refilter();
        self.selected = previous.min(self.results.len().saturating_sub(1));
        self.ensure_visible();
    }

    /// Kick off a fresh scan of the configured root.
    fn rescan(&mut self) {
        self.app.scanner.start_scan(&self.app.config.general.root);
        self.scan_count = Some(0);
        self.status_message = None;
    }
}

/// Run the TUI application.
pub fn run(config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let app = App::new(config, config_path);
    app.scanner.start_scan(&app.config.general.root);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create picker state
    let mut picker = Picker::new(app);

    // Main loop
    let result = run_loop(&mut terminal, &mut picker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, picker: &mut Picker) -> anyhow::Result<()> {
    loop {
        picker.drain_scanner();
        terminal.draw(|f| ui::draw(f, picker))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => {
                            picker.should_quit = true;
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            picker.should_quit = true;
                        }
                        KeyCode::Tab => {
                            picker.cycle_scope();
                        }
                        KeyCode::Char(c) => {
                            if key.modifiers.contains(KeyModifiers::CONTROL) {
                                match c {
                                    'p' => picker.toggle_pin_selected(),
                                    't' => picker.cycle_tag(),
                                    'r' => picker.rescan(),
                                    _ => {}
                                }
                            } else {
                                picker.on_char(c);
                            }
                        }
                        KeyCode::Backspace => {
                            picker.on_backspace();
                        }
                        KeyCode::Up => {
                            picker.select_previous();
                        }
                        KeyCode::Down => {
                            picker.select_next();
                        }
                        KeyCode::PageUp => {
                            picker.page_up(10);
                        }
                        KeyCode::PageDown => {
                            picker.page_down(10);
                        }
                        KeyCode::Home => {
                            picker.selected = 0;
                            picker.scroll_offset = 0;
                        }
                        KeyCode::End => {
                            if !picker.results.is_empty() {
                                picker.selected = picker.results.len() - 1;
                                picker.ensure_visible();
                            }
                        }
                        KeyCode::Enter => {
                            picker.launch_selected();
                        }
                        _ => {}
                    }
                }
            }
        }

        if picker.should_quit {
            break;
        }
    }

    Ok(())
}

mod ui {
    use super::*;

    /// Draw the UI.
    pub fn draw(f: &mut Frame, picker: &mut Picker) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Filter box
                Constraint::Min(10),   // Results
                Constraint::Length(2), // Status bar
            ])
            .split(f.area());

        draw_filter_box(f, picker, chunks[0]);
        draw_results(f, picker, chunks[1]);
        draw_status_bar(f, picker, chunks[2]);
    }

    /// Draw the filter input box.
    fn draw_filter_box(f: &mut Frame, picker: &Picker, area: Rect) {
        let input = Paragraph::new(picker.query_string.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" 🔍 Filter (type to narrow) "),
            );
        f.render_widget(input, area);

        // Show cursor
        f.set_cursor_position(Position::new(
            area.x + picker.query_string.len() as u16 + 1,
            area.y + 1,
        ));
    }

    /// Draw the results list.
    fn draw_results(f: &mut Frame, picker: &mut Picker, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;

        // Update scroll offset based on visible height
        if picker.selected >= picker.scroll_offset + visible_height {
            picker.scroll_offset = picker.selected - visible_height + 1;
        }

        let items: Vec<ListItem> = picker
            .results
            .iter()
            .skip(picker.scroll_offset)
            .take(visible_height)
            .enumerate()
            .map(|(i, ws)| {
                let marker = if picker.app.config.is_pinned(&ws.path_str()) {
                    "📌"
                } else {
                    "  "
                };

                let tags = if ws.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", ws.tags.join(", "))
                };

                let line = if ws.description.is_empty() {
                    format!("{} {}{}", marker, ws.name, tags)
                } else {
                    format!("{} {} - {}{}", marker, ws.name, ws.description, tags)
                };

                let style = if i + picker.scroll_offset == picker.selected {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(line).style(style)
            })
            .collect();

        let title = format!(
            " Workspaces ({} of {}) ",
            picker.results.len(),
            picker.catalog.len()
        );

        let results = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(results, area);
    }

    /// Draw the status bar.
    fn draw_status_bar(f: &mut Frame, picker: &Picker, area: Rect) {
        let tag = match picker.tag_index.and_then(|i| picker.catalog.tags().get(i)) {
            Some(tag) => tag.as_str(),
            None => "-",
        };

        let scanning = match picker.scan_count {
            Some(count) if picker.app.scanner.is_scanning() => {
                format!("Scanning ({} found)... | ", count)
            }
            _ => String::new(),
        };

        let status = if let Some(ref msg) = picker.status_message {
            msg.clone()
        } else {
            format!(
                "{}Scope: {} | Tag: {} | ↑↓:Navigate Enter:Launch Tab:Scope Ctrl+T:Tag Ctrl+P:Pin Ctrl+R:Rescan Esc:Quit",
                scanning,
                picker.scope.label(),
                tag
            )
        };

        let status_bar = Paragraph::new(status).style(Style::default().fg(Color::Gray));

        f.render_widget(status_bar, area);
    }
}
