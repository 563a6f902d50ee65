use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::action::Action;
use crate::catalog::{Catalog, NAV_SHORTCUTS, PROACTIVE_INSIGHTS, PROMPT_CATEGORIES, QUICK_LINKS, YOUR_DAY_TASKS};
use crate::command::CommandParser;
use crate::config::{Config, LayoutProfile, COMMANDS};
use crate::conversation::{ResponsePhase, SidePanelMode};
use crate::orchestrator::Orchestrator;
use crate::router::{Panel, PanelRegistry};
use crate::sequencer::{Pacing, SequenceEvent, SequenceStep};
use crate::tour::{AnchorMap, TourController};
use crate::ui_state::{Focus, UIState};

/// A selectable query: welcome prompt, follow-up chip, sidebar entry or task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub query: String,
}

impl Suggestion {
    fn new(label: &str, query: &str) -> Self {
        Self {
            label: label.to_string(),
            query: query.to_string(),
        }
    }
}

pub struct App {
    pub config: Config,
    pub orchestrator: Orchestrator,
    pub panels: PanelRegistry,
    pub tour: Option<TourController>,
    /// Regions recorded by the last draw, read by the tour.
    pub anchors: AnchorMap,
    pub ui: UIState,
    pub animation_frame: usize,
    pub animation_tick: u64,
    pub should_quit: bool,
    missing_panel_warned: Cell<bool>,
}

impl App {
    pub fn new(config: Config, catalog: Arc<Catalog>, panels: PanelRegistry) -> Self {
        let orchestrator = Orchestrator::new(catalog, Pacing::from(&config.timing));
        let tour = config
            .layout
            .supports_tour()
            .then(|| TourController::new(config.timing.anchor_retry_limit, config.tour_enabled));

        let mut app = Self {
            config,
            orchestrator,
            panels,
            tour,
            anchors: AnchorMap::default(),
            ui: UIState::new(),
            animation_frame: 0,
            animation_tick: 0,
            should_quit: false,
            missing_panel_warned: Cell::new(false),
        };

        let intent = app
            .tour
            .as_ref()
            .filter(|t| t.is_visible())
            .and_then(|t| t.current_intent());
        if let Some(intent) = intent {
            app.orchestrator.apply_tour_intent(intent);
        }
        app
    }

    pub fn layout(&self) -> LayoutProfile {
        self.config.layout
    }

    pub fn greeting(&self) -> String {
        format!("Hi {}!", self.config.first_name())
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        // Using larger modulo (360) for smoother color transitions
        self.animation_frame = (self.animation_frame + 1) % self.config.ui.animation_frame_mod;
        self.ui.send_animation = self.ui.send_animation.saturating_sub(1);
        self.ui.expire_status(self.animation_tick, self.config.timing.status_timeout_ticks);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.ui.set_status(message, self.animation_tick);
    }

    /// "Running scan behavioral signals..." while a tool call is shown.
    pub fn tool_call_status(&self) -> Option<String> {
        let state = self.orchestrator.state();
        match state.phase() {
            ResponsePhase::RunningTool(_) => state.active_tool_call().map(humanize_tool_call),
            _ => None,
        }
    }

    pub fn tour_is_open(&self) -> bool {
        self.tour.as_ref().is_some_and(|t| t.is_visible())
    }

    /// Panel for the active visualization, if one resolves.
    pub fn active_panel(&self) -> Option<&dyn Panel> {
        let id = self.orchestrator.state().active_visualization()?;
        let panel = self.panels.resolve(id);
        if panel.is_none() && !self.missing_panel_warned.replace(true) {
            warn!(visualization = %id, "No panel registered, showing default info");
        }
        panel
    }

    // Selectable lists

    /// Welcome prompts and insights before the first turn, follow-ups after.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        let state = self.orchestrator.state();
        if state.turns().is_empty() {
            let prompts = PROMPT_CATEGORIES
                .iter()
                .flat_map(|c| c.prompts.iter())
                .map(|p| Suggestion::new(p, p));
            let insights = PROACTIVE_INSIGHTS.iter().map(|i| Suggestion::new(i.action, i.query));
            return prompts.chain(insights).collect();
        }
        state
            .latest_followups()
            .iter()
            .map(|f| Suggestion::new(f, f))
            .collect()
    }

    pub fn sidebar_items(&self) -> Vec<Suggestion> {
        if !self.layout().shows_sidebar() {
            return Vec::new();
        }
        NAV_SHORTCUTS.iter().map(|(label, query)| Suggestion::new(label, query)).collect()
    }

    /// Tasks and quick links of the "your day" panel, when it is showing.
    pub fn side_panel_items(&self) -> Vec<Suggestion> {
        let showing_your_day = self.layout() == LayoutProfile::Workspace
            && self.orchestrator.state().side_panel() == SidePanelMode::DefaultInfo;
        if !showing_your_day {
            return Vec::new();
        }
        YOUR_DAY_TASKS
            .iter()
            .map(|t| Suggestion::new(t.label, t.query))
            .chain(QUICK_LINKS.iter().map(|(label, query)| Suggestion::new(label, query)))
            .collect()
    }

    fn focused_items(&self) -> Vec<Suggestion> {
        match self.ui.focus {
            Focus::Input => Vec::new(),
            Focus::Suggestions => self.suggestions(),
            Focus::Sidebar => self.sidebar_items(),
            Focus::SidePanel => self.side_panel_items(),
        }
    }

    // Input handling

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.tour_is_open() {
            self.on_tour_key(key);
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.showing_command_popup() && self.ui.command_selection.is_some() {
                    self.reset_command_selection();
                } else if self.ui.focus != Focus::Input {
                    self.ui.set_focus(Focus::Input);
                } else if self.orchestrator.state().side_panel() == SidePanelMode::Visualization {
                    self.orchestrator.close_visualization();
                } else if self.ui.input.is_empty() {
                    self.should_quit = true;
                } else {
                    self.ui.input.clear();
                }
            }
            KeyCode::Enter => match self.ui.focus {
                Focus::Input => {
                    if self.showing_command_popup() && self.ui.command_selection.is_some() {
                        self.apply_command_selection();
                    } else {
                        self.submit_input();
                    }
                }
                _ => self.activate_selection(),
            },
            KeyCode::Tab | KeyCode::BackTab => {
                if self.showing_command_popup() && self.ui.command_selection.is_some() {
                    self.apply_command_selection();
                } else {
                    let next = self.ui.focus.next(self.layout().shows_sidebar());
                    self.ui.set_focus(next);
                }
            }
            KeyCode::Backspace => {
                self.ui.input.pop();
                self.reset_command_selection();
            }
            KeyCode::Up => {
                if self.showing_command_popup() {
                    self.command_select_up();
                } else if self.ui.focus == Focus::Input {
                    self.scroll_up();
                } else {
                    let len = self.focused_items().len();
                    self.ui.select_up(len);
                }
            }
            KeyCode::Down => {
                if self.showing_command_popup() {
                    self.command_select_down();
                } else if self.ui.focus == Focus::Input {
                    self.scroll_down();
                } else {
                    let len = self.focused_items().len();
                    self.ui.select_down(len);
                }
            }
            KeyCode::PageUp => self.scroll_up(),
            KeyCode::PageDown => self.scroll_down(),
            KeyCode::F(2) => {
                self.ui.show_raw_markup = !self.ui.show_raw_markup;
            }
            KeyCode::Char('x')
                if self.ui.focus == Focus::SidePanel
                    && self.orchestrator.state().side_panel() == SidePanelMode::Visualization =>
            {
                self.orchestrator.close_visualization();
            }
            KeyCode::Char(c) => {
                if self.ui.focus != Focus::Input {
                    self.ui.set_focus(Focus::Input);
                }
                self.ui.input.push(c);
                self.reset_command_selection();
            }
            _ => {}
        }
    }

    fn on_tour_key(&mut self, key: KeyEvent) {
        let Some(tour) = self.tour.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => tour.dismiss(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => {
                if tour.is_complete() {
                    tour.dismiss();
                } else if let Some(intent) = tour.advance() {
                    self.orchestrator.apply_tour_intent(intent);
                }
            }
            KeyCode::Char('r') if tour.is_complete() => {
                if let Some(intent) = tour.restart() {
                    self.orchestrator.apply_tour_intent(intent);
                }
            }
            _ => {}
        }
    }

    /// Pasted text lands in the input as a single line.
    pub fn on_paste(&mut self, text: &str) {
        let filtered: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.ui.input.push_str(&filtered);
        self.ui.set_focus(Focus::Input);
        self.reset_command_selection();
    }

    pub fn on_sequence_event(&mut self, event: SequenceEvent) {
        let delivery = matches!(event.step, SequenceStep::Deliver(_));
        if self.orchestrator.handle(event) && delivery {
            self.ui.scroll_offset = 0;
            if self.ui.focus == Focus::Suggestions {
                self.ui.selection = 0;
            }
        }
    }

    /// One anchor lookup for the tour step on screen.
    pub fn poll_tour(&mut self) {
        if let Some(tour) = self.tour.as_mut() {
            tour.poll_anchor(&self.anchors);
        }
    }

    pub fn shutdown(&mut self) {
        self.orchestrator.shutdown();
    }

    pub fn submit_input(&mut self) {
        let text = self.ui.input.trim().to_string();
        if text.is_empty() {
            return;
        }

        // Handle slash commands locally
        if CommandParser::is_command(&text) {
            self.ui.input.clear();
            match CommandParser::parse(&text) {
                Ok(action) => {
                    debug!(command = %text, "Slash command dispatched");
                    self.handle_action(action);
                }
                Err(message) => self.set_status(message),
            }
            return;
        }

        if self.submit_query(&text) {
            self.ui.input.clear();
        }
    }

    fn submit_query(&mut self, query: &str) -> bool {
        if self.orchestrator.select_followup(query).is_some() {
            self.ui.scroll_offset = 0;
            self.ui.send_animation = 20;
            true
        } else {
            if self.orchestrator.is_responding() {
                self.set_status("Mamba is still responding...");
            }
            false
        }
    }

    fn activate_selection(&mut self) {
        if self.ui.focus == Focus::SidePanel
            && self.orchestrator.state().side_panel() == SidePanelMode::Visualization
        {
            self.orchestrator.close_visualization();
            return;
        }
        let items = self.focused_items();
        if let Some(item) = items.get(self.ui.selection) {
            self.submit_query(&item.query);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Help => {
                let help = COMMANDS
                    .iter()
                    .map(|(cmd, desc)| format!("{} {}", cmd, desc.to_lowercase()))
                    .collect::<Vec<_>>()
                    .join(" · ");
                self.set_status(help);
            }
            Action::RestartTour => {
                let Some(tour) = self.tour.as_mut() else {
                    self.set_status("The guided tour is only available in the workspace layout");
                    return;
                };
                let intent = if tour.is_complete() { tour.restart() } else { tour.reveal() };
                if let Some(intent) = intent {
                    self.orchestrator.apply_tour_intent(intent);
                }
            }
            Action::OpenPanel(id) => {
                self.orchestrator.activate_visualization(id);
                self.set_status(format!("Opened {}", id));
            }
            Action::ClosePanel => {
                self.orchestrator.close_visualization();
                self.set_status("Panel closed");
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    // Command popup

    /// Check if command popup should be shown
    pub fn showing_command_popup(&self) -> bool {
        self.ui.input.starts_with('/') && !self.ui.input.contains(' ')
    }

    /// Get filtered commands based on current input
    pub fn get_filtered_commands(&self) -> Vec<(&'static str, &'static str)> {
        let Some(filter) = self.ui.input.strip_prefix('/') else {
            return vec![];
        };
        COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd[1..].starts_with(filter))
            .copied()
            .collect()
    }

    /// Move selection up in command popup
    pub fn command_select_up(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> last command -> ... -> 0 -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(filtered.len() - 1),
            Some(0) => None,
            Some(n) => Some(n - 1),
        };
    }

    /// Move selection down in command popup
    pub fn command_select_down(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> 0 -> 1 -> ... -> last -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(0),
            Some(n) if n >= filtered.len() - 1 => None,
            Some(n) => Some(n + 1),
        };
    }

    /// Apply selected command to input
    pub fn apply_command_selection(&mut self) {
        if let Some(idx) = self.ui.command_selection {
            let filtered = self.get_filtered_commands();
            if let Some((cmd, _)) = filtered.get(idx) {
                self.ui.input = cmd.to_string();
                // /open needs an argument
                if *cmd == "/open" {
                    self.ui.input.push(' ');
                }
            }
        }
        self.ui.command_selection = None;
    }

    /// Reset command selection when input changes
    pub fn reset_command_selection(&mut self) {
        self.ui.command_selection = None;
    }

    pub fn scroll_up(&mut self) {
        self.ui.scroll_offset += self.config.ui.scroll_step;
    }

    pub fn scroll_down(&mut self) {
        self.ui.scroll_offset = self.ui.scroll_offset.saturating_sub(self.config.ui.scroll_step);
    }
}

pub fn humanize_tool_call(label: &str) -> String {
    format!("Running {}...", label.replace('_', " "))
}
