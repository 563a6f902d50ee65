/// Which region receives arrow keys and Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    /// Welcome prompts or the latest follow-up chips
    Suggestions,
    Sidebar,
    /// "Your day" items, or the open panel
    SidePanel,
}

impl Focus {
    /// Next region in Tab order. The sidebar is skipped when not shown.
    pub fn next(self, with_sidebar: bool) -> Focus {
        match self {
            Focus::Input => Focus::Suggestions,
            Focus::Suggestions => Focus::SidePanel,
            Focus::SidePanel if with_sidebar => Focus::Sidebar,
            Focus::SidePanel | Focus::Sidebar => Focus::Input,
        }
    }
}

#[derive(Default)]
pub struct UIState {
    pub input: String,
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    status_set_at: u64,

    // Command popup state
    pub command_selection: Option<usize>,

    // Send animation state (ticks remaining)
    pub send_animation: u8,

    // Which panel is focused
    pub focus: Focus,

    // Highlighted item within the focused list
    pub selection: usize,

    // Markup rendering toggle
    pub show_raw_markup: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>, tick: u64) {
        self.status_message = Some(message.into());
        self.status_set_at = tick;
    }

    /// Drops the status line once it has been visible for `timeout` ticks.
    pub fn expire_status(&mut self, tick: u64, timeout: u64) {
        if self.status_message.is_some() && tick.saturating_sub(self.status_set_at) >= timeout {
            self.status_message = None;
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.selection = 0;
    }

    pub fn select_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selection = if self.selection == 0 { len - 1 } else { self.selection - 1 };
    }

    pub fn select_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selection = (self.selection + 1) % len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycle_skips_hidden_sidebar() {
        assert_eq!(Focus::SidePanel.next(true), Focus::Sidebar);
        assert_eq!(Focus::SidePanel.next(false), Focus::Input);
        assert_eq!(Focus::Sidebar.next(true), Focus::Input);
    }

    #[test]
    fn test_selection_wraps() {
        let mut ui = UIState::new();
        ui.select_up(3);
        assert_eq!(ui.selection, 2);
        ui.select_down(3);
        assert_eq!(ui.selection, 0);
        ui.select_down(0);
        assert_eq!(ui.selection, 0);
    }

    #[test]
    fn test_status_expires() {
        let mut ui = UIState::new();
        ui.set_status("hello", 10);
        ui.expire_status(100, 180);
        assert!(ui.status_message.is_some());
        ui.expire_status(190, 180);
        assert!(ui.status_message.is_none());
    }
}
