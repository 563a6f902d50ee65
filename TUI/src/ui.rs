use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::catalog::{InsightKind, PROACTIVE_INSIGHTS, PROMPT_CATEGORIES, QUICK_LINKS, YOUR_DAY_TASKS};
use crate::config::LayoutProfile;
use crate::conversation::{ResponsePhase, Role, SidePanelMode};
use crate::markdown;
use crate::router::{PanelView, Tone};
use crate::tour::{AnchorMap, Placement, ANCHOR_INSIGHTS, ANCHOR_SEARCH, ANCHOR_YOUR_DAY};
use crate::ui_state::Focus;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const WARM_BROWN: Color = Color::Rgb(164, 103, 38);      // #A46726 - Warm brown
const TAN: Color = Color::Rgb(216, 180, 169);            // #D8B4A9 - Tan/beige
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Purple accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

// Raw markup view
const CODE_BG: Color = Color::Rgb(40, 44, 52);
const CODE_FG: Color = Color::Rgb(171, 178, 191);

const LABEL_WIDTH: usize = 9;
const TOUR_CARD_WIDTH: u16 = 48;

/// Draws one frame and replaces `app.anchors` with the regions it drew.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let mut anchors = AnchorMap::default();
    draw_frame(frame, app, &mut anchors);
    app.anchors = anchors;
}

fn draw_frame(frame: &mut Frame, app: &App, anchors: &mut AnchorMap) {
    let area = frame.area();

    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, area);

    // Main layout with padding
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let main = if app.layout().shows_sidebar() {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(app.config.ui.sidebar_width), // Sidebar
                Constraint::Length(1),                           // Gap
                Constraint::Min(40),                             // Chat + side slot
            ])
            .split(padded);
        draw_sidebar(frame, app, chunks[0]);
        chunks[2]
    } else {
        padded
    };

    // Wide panels take the larger share
    let side_pct = match app.active_panel() {
        Some(panel) if panel.wide() => 58,
        _ => 42,
    };
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - side_pct),
            Constraint::Length(1),
            Constraint::Percentage(side_pct),
        ])
        .split(main);

    let chat_area = draw_chat_column(frame, app, h_chunks[0], anchors);
    draw_side_slot(frame, app, h_chunks[2], anchors);

    if app.showing_command_popup() {
        draw_command_popup(frame, app, chat_area);
    }

    draw_tour(frame, app, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),     // Navigation
            Constraint::Length(5),  // Keyboard hints
        ])
        .split(area);

    let focused = app.ui.focus == Focus::Sidebar;
    let block = Block::default()
        .title(Span::styled(" MambaHR ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { SAPPHIRE } else { BORDER_DIM }));

    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", app.greeting()), Style::default().fg(TAN))),
        Line::from(""),
    ];
    for (i, item) in app.sidebar_items().iter().enumerate() {
        let selected = focused && app.ui.selection == i;
        let (marker, style) = if selected {
            (">", Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD))
        } else {
            (" ", Style::default().fg(TEXT_SECONDARY))
        };
        lines.push(Line::from(Span::styled(format!("{} {}", marker, item.label), style)));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    draw_keyboard_hints(frame, chunks[1]);
}

fn draw_keyboard_hints(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hints = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("ESC", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(" quit  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("/", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
            Span::styled(" cmds", Style::default().fg(TEXT_MUTED)),
        ]),
        Line::from(vec![
            Span::styled("TAB", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(" focus  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("F2", Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)),
            Span::styled(" raw", Style::default().fg(TEXT_MUTED)),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hints, inner);
}

/// Messages, follow-up chips, input and status. Returns the message area.
fn draw_chat_column(frame: &mut Frame, app: &App, area: Rect, anchors: &mut AnchorMap) -> Rect {
    let state = app.orchestrator.state();
    let chips_height = if !state.turns().is_empty() && !state.latest_followups().is_empty() { 2 } else { 0 };

    // Calculate input height based on content (min 3, max 6)
    let input_width = area.width.saturating_sub(6) as usize;
    let input_lines = if input_width > 0 { app.ui.input.width() / input_width + 1 } else { 1 };
    let input_height = (input_lines as u16 + 2).clamp(3, 6);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),               // Messages
            Constraint::Length(chips_height), // Follow-ups
            Constraint::Length(input_height), // Input (dynamic)
            Constraint::Length(1),            // Status
        ])
        .split(area);

    if state.turns().is_empty() {
        draw_welcome(frame, app, chunks[0], anchors);
    } else {
        draw_messages(frame, app, chunks[0]);
    }
    if chips_height > 0 {
        draw_followups(frame, app, chunks[1]);
    }
    draw_input(frame, app, chunks[2]);
    anchors.record(ANCHOR_SEARCH, chunks[2]);
    draw_status(frame, app, chunks[3]);

    chunks[0]
}

fn chat_block(app: &App) -> Block<'static> {
    // Border color based on focus and animation
    let border_color = if app.ui.send_animation > 0 {
        // Animate border on send
        let intensity = app.ui.send_animation as f64 / 20.0;
        let r = (101.0 + (154.0 * intensity)) as u8;
        let g = (150.0 + (70.0 * intensity)) as u8;
        let b = (243.0 - (17.0 * intensity)) as u8;
        Color::Rgb(r, g, b)
    } else if app.ui.focus == Focus::Suggestions {
        SAPPHIRE
    } else {
        BORDER_DIM
    };

    Block::default()
        .title(Span::styled(" Mamba ", Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
}

fn draw_welcome(frame: &mut Frame, app: &App, area: Rect, anchors: &mut AnchorMap) {
    let block = chat_block(app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let insights_height = (PROACTIVE_INSIGHTS.len() as u16 * 2 + 2).min(inner.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(insights_height)])
        .split(inner);

    let focused = app.ui.focus == Focus::Suggestions;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", app.greeting()),
            Style::default().fg(PALE_YELLOW).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(" How can I help you today?", Style::default().fg(TEXT_SECONDARY))),
        Line::from(""),
    ];

    let mut index = 0;
    for category in PROMPT_CATEGORIES {
        lines.push(Line::from(Span::styled(
            format!(" {}", category.name.to_uppercase()),
            Style::default().fg(WARM_BROWN).add_modifier(Modifier::BOLD),
        )));
        for prompt in category.prompts {
            lines.push(suggestion_line(prompt, focused && app.ui.selection == index));
            index += 1;
        }
    }
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    // Insights box
    let insights = chunks[1];
    if insights.height < 3 {
        return;
    }
    let block = Block::default()
        .title(Span::styled(" Insights ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::TOP)
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(insights);
    frame.render_widget(block, insights);
    anchors.record(ANCHOR_INSIGHTS, insights);

    let mut lines = Vec::new();
    for insight in PROACTIVE_INSIGHTS {
        let (icon, color) = match insight.kind {
            InsightKind::Warning => ("!", PALE_YELLOW),
            InsightKind::Alert => ("▲", BURGUNDY),
            InsightKind::Success => ("✓", OLIVE),
        };
        let selected = focused && app.ui.selection == index;
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color)),
            Span::styled(insight.title, Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
            Span::styled(" · ", Style::default().fg(TEXT_MUTED)),
            Span::styled(
                format!("[{}]", insight.action),
                if selected {
                    Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(SAPPHIRE)
                },
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", insight.description),
            Style::default().fg(TEXT_MUTED),
        )));
        index += 1;
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn suggestion_line(text: &str, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!(" > {}", text),
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(format!("   {}", text), Style::default().fg(TEXT_SECONDARY)))
    }
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    let block = chat_block(app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add padding inside the chat area
    let padded = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    let state = app.orchestrator.state();
    let content_width = (padded.width as usize).saturating_sub(LABEL_WIDTH);
    let indent = " ".repeat(LABEL_WIDTH);
    let mut lines: Vec<Line> = Vec::new();

    for turn in state.turns() {
        let (label, label_color) = match turn.role {
            Role::User => ("you", SAPPHIRE),
            Role::Assistant => ("mamba", COPPER),
        };
        let label_style = Style::default().fg(label_color).add_modifier(Modifier::BOLD);
        // Format label with fixed width and separator
        let formatted_label = format!("{:>width$} │ ", label, width = LABEL_WIDTH - 3);

        let body: Vec<Line> = if app.ui.show_raw_markup && turn.role == Role::Assistant {
            turn.content
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(CODE_FG).bg(CODE_BG))))
                .collect()
        } else {
            markdown::render_text(&turn.content, content_width)
        };

        for (i, line) in body.into_iter().enumerate() {
            let prefix = if i == 0 {
                Span::styled(formatted_label.clone(), label_style)
            } else {
                Span::raw(indent.clone())
            };
            let mut spans = vec![prefix];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }

        if let Some(id) = turn.visualization {
            let title = app
                .panels
                .resolve(id)
                .map(|p| p.view().title)
                .unwrap_or_else(|| id.as_str());
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled("◆ ", Style::default().fg(COPPER)),
                Span::styled(format!("{} opened", title), Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
            ]));
        }

        // Add spacing between messages
        lines.push(Line::from(""));
    }

    if state.is_responding() {
        let formatted_label = format!("{:>width$} │ ", "mamba", width = LABEL_WIDTH - 3);
        let indicator = match (state.phase(), app.tool_call_status()) {
            (ResponsePhase::RunningTool(_), Some(status)) => format!("⚙ {}", status),
            _ => {
                let dots = match (app.animation_frame / 15) % 4 {
                    0 => ".  ",
                    1 => ".. ",
                    2 => "...",
                    _ => " ..",
                };
                format!("typing{}", dots)
            }
        };
        lines.push(Line::from(vec![
            Span::styled(formatted_label, Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
            Span::styled(indicator, Style::default().fg(COPPER).add_modifier(Modifier::ITALIC)),
        ]));
    }

    let total_lines = lines.len();
    let visible_height = padded.height as usize;

    // Calculate scroll - scroll from bottom, clamp scroll_offset to valid range
    let max_scroll = total_lines.saturating_sub(visible_height);
    let clamped_offset = app.ui.scroll_offset.min(max_scroll);
    let scroll_pos = max_scroll.saturating_sub(clamped_offset);

    let messages = Paragraph::new(lines).scroll((scroll_pos as u16, 0));
    frame.render_widget(messages, padded);

    // Scroll indicators on the right edge
    if total_lines > visible_height && area.width > 2 && area.height > 2 {
        if scroll_pos > 0 {
            let up_area = Rect::new(area.x + area.width - 2, area.y + 1, 1, 1);
            frame.render_widget(Paragraph::new("▲").style(Style::default().fg(SAPPHIRE)), up_area);
        }
        if clamped_offset > 0 {
            let down_area = Rect::new(area.x + area.width - 2, area.y + area.height - 2, 1, 1);
            frame.render_widget(Paragraph::new("▼").style(Style::default().fg(SAPPHIRE)), down_area);
        }
    }
}

fn draw_followups(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.orchestrator.state();
    let focused = app.ui.focus == Focus::Suggestions;
    let disabled = state.is_responding();

    let mut spans = vec![Span::styled(" ↳ ", Style::default().fg(TEXT_MUTED))];
    for (i, followup) in state.latest_followups().iter().enumerate() {
        let style = if disabled {
            Style::default().fg(TEXT_MUTED)
        } else if focused && app.ui.selection == i {
            Style::default().fg(BG_DARK).bg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SAPPHIRE).bg(BG_PANEL)
        };
        spans.push(Span::styled(format!(" {} ", followup), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    // Pulsing border when focused
    let border_color = if app.ui.focus == Focus::Input {
        let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
        Color::Rgb((101.0 * glow) as u8, (150.0 * glow) as u8, (243.0 * glow) as u8)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = if app.ui.input.is_empty() && app.ui.focus == Focus::Input {
        Paragraph::new(Line::from(vec![
            Span::styled(" > ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled("Ask about your people, teams, or metrics...", Style::default().fg(TEXT_MUTED)),
        ]))
    } else {
        let cursor = if app.animation_frame % 30 < 15 { "|" } else { " " };
        Paragraph::new(format!(" > {}{}", app.ui.input, cursor))
            .style(Style::default().fg(TEXT_PRIMARY))
            .wrap(Wrap { trim: false })
    };
    frame.render_widget(input, inner);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.ui.status_message {
        Some(message) => Line::from(Span::styled(format!(" {}", message), Style::default().fg(PALE_YELLOW))),
        None if !app.layout().shows_sidebar() => Line::from(Span::styled(
            " ESC quit · / commands · TAB focus · F2 raw",
            Style::default().fg(TEXT_MUTED),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_command_popup(frame: &mut Frame, app: &App, chat_area: Rect) {
    let filtered = app.get_filtered_commands();
    if filtered.is_empty() {
        return;
    }

    // +1 for the "your input" option, +2 for borders
    let popup_height = (filtered.len() + 3) as u16;
    let popup_width = 44.min(chat_area.width.saturating_sub(4));
    let popup_area = Rect {
        x: chat_area.x + 2,
        y: chat_area.y + chat_area.height.saturating_sub(popup_height + 1),
        width: popup_width,
        height: popup_height.min(chat_area.height),
    };

    // Clear area behind popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Commands ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COPPER))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // First option: current typed input (selected when command_selection is None)
    let input_selected = app.ui.command_selection.is_none();
    let input_style = if input_selected {
        Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    };
    let indicator = if input_selected { ">" } else { " " };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} {} ", indicator, &app.ui.input), input_style),
        Span::styled("(your input)", Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
    ])];

    for (i, (cmd, desc)) in filtered.iter().enumerate() {
        let is_selected = app.ui.command_selection == Some(i);
        let style = if is_selected {
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        let indicator = if is_selected { ">" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{} {} ", indicator, cmd), style),
            Span::styled(format!("- {}", desc), Style::default().fg(TEXT_MUTED)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

// Side slot

fn draw_side_slot(frame: &mut Frame, app: &App, area: Rect, anchors: &mut AnchorMap) {
    let state = app.orchestrator.state();
    if state.side_panel() == SidePanelMode::Visualization {
        if let Some(panel) = app.active_panel() {
            draw_panel(frame, app, &panel.view(), area, anchors);
            return;
        }
    }
    match app.layout() {
        LayoutProfile::Workspace => draw_your_day(frame, app, area, anchors),
        LayoutProfile::Split => draw_canvas_placeholder(frame, area),
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Normal => TEXT_PRIMARY,
        Tone::Good => OLIVE,
        Tone::Watch => PALE_YELLOW,
        Tone::Bad => BURGUNDY,
        Tone::Accent => CYAN_LIGHT,
    }
}

/// `label ........ value` fitted to `width` columns.
fn row_line(label: &str, value: &str, tone: Tone, width: usize) -> Line<'static> {
    if value.is_empty() {
        return Line::from(Span::styled(format!(" {}", label), Style::default().fg(TEXT_SECONDARY)));
    }
    let used = label.width() + value.width() + 2;
    let gap = width.saturating_sub(used).max(1);
    Line::from(vec![
        Span::styled(format!(" {}", label), Style::default().fg(TEXT_SECONDARY)),
        Span::raw(" ".repeat(gap)),
        Span::styled(value.to_string(), Style::default().fg(tone_color(tone)).add_modifier(Modifier::BOLD)),
    ])
}

fn draw_panel(frame: &mut Frame, app: &App, view: &PanelView, area: Rect, anchors: &mut AnchorMap) {
    let focused = app.ui.focus == Focus::SidePanel;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" x close ", Style::default().fg(TEXT_MUTED)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { SAPPHIRE } else { BORDER_ACCENT }));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width < 4 {
        return;
    }

    let width = inner.width.saturating_sub(1) as usize;
    let bottom = inner.y + inner.height;
    let mut y = inner.y;

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", view.subtitle), Style::default().fg(TEXT_MUTED))),
        Rect::new(inner.x, y, inner.width, 1),
    );
    y += 2;

    let action_rows = u16::from(view.action.is_some());
    for section in &view.sections {
        let wanted = section.rows.len() as u16 + 1;
        let available = bottom.saturating_sub(y + action_rows);
        if available < 2 {
            break;
        }
        let height = wanted.min(available);
        let rect = Rect::new(inner.x, y, inner.width, height);

        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", section.heading.to_uppercase()),
            Style::default().fg(WARM_BROWN).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(section.rows.iter().map(|r| row_line(&r.label, &r.value, r.tone, width)));
        frame.render_widget(Paragraph::new(lines), rect);

        if let Some(anchor) = section.anchor {
            anchors.record(anchor, rect);
        }
        y += height + 1;
    }

    if let Some(action) = view.action {
        let rect = Rect::new(inner.x, bottom - 1, inner.width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" → {}", action), Style::default().fg(SAPPHIRE)))
                .alignment(Alignment::Left),
            rect,
        );
    }
}

fn draw_your_day(frame: &mut Frame, app: &App, area: Rect, anchors: &mut AnchorMap) {
    let focused = app.ui.focus == Focus::SidePanel;
    let block = Block::default()
        .title(Span::styled(" Your day ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { SAPPHIRE } else { BORDER_DIM }));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    anchors.record(ANCHOR_YOUR_DAY, area);

    let mut lines = vec![
        Line::from(Span::styled(" TODAY", Style::default().fg(WARM_BROWN).add_modifier(Modifier::BOLD))),
    ];
    let mut index = 0;
    for task in YOUR_DAY_TASKS {
        let selected = focused && app.ui.selection == index;
        let (marker, marker_color) = if task.urgent { ("!", BURGUNDY) } else { ("·", TEXT_MUTED) };
        let style = if selected {
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { ">" } else { " " }, style),
            Span::styled(format!("{} ", marker), Style::default().fg(marker_color)),
            Span::styled(task.label, style),
        ]));
        index += 1;
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " QUICK LINKS",
        Style::default().fg(WARM_BROWN).add_modifier(Modifier::BOLD),
    )));
    for (label, _) in QUICK_LINKS {
        let selected = focused && app.ui.selection == index;
        lines.push(suggestion_line(label, selected));
        index += 1;
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_canvas_placeholder(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Canvas ", Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let help = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Ask a question and related", Style::default().fg(TEXT_MUTED))),
        Line::from(Span::styled("data will appear here.", Style::default().fg(TEXT_MUTED))),
        Line::from(""),
        Line::from(Span::styled("/open <panel> to browse", Style::default().fg(SAPPHIRE))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(help, inner);
}

// Tour

/// Where a `width` x `height` card goes relative to its anchor, clamped to
/// `area`. No anchor means centered.
pub fn tour_card_rect(area: Rect, anchor: Option<Rect>, placement: Placement, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let centered = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let Some(anchor) = anchor else {
        return centered;
    };

    let (x, y) = match placement {
        Placement::Center => return centered,
        Placement::Top => (anchor.x, anchor.y.saturating_sub(height)),
        Placement::Bottom => (anchor.x, anchor.y.saturating_add(anchor.height)),
        Placement::Left => (anchor.x.saturating_sub(width), anchor.y),
    };

    let max_x = area.x + area.width - width;
    let max_y = area.y + area.height - height;
    Rect::new(x.clamp(area.x, max_x), y.clamp(area.y, max_y), width, height)
}

fn draw_tour(frame: &mut Frame, app: &App, area: Rect) {
    let Some(tour) = app.tour.as_ref() else {
        return;
    };
    let Some(view) = tour.view() else {
        return;
    };

    let inner_width = TOUR_CARD_WIDTH.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();

    let (title, placement) = match tour.current_step() {
        Some(step) => {
            lines.push(Line::from(Span::styled(
                format!("Step {} of {}", view.step_index + 1, tour.len()),
                Style::default().fg(TEXT_MUTED),
            )));
            lines.push(Line::from(""));
            lines.extend(markdown::render_text(step.body, inner_width));
            if let Some(example) = step.example {
                lines.push(Line::from(""));
                for line in markdown::render_text(example, inner_width) {
                    let spans = line
                        .spans
                        .into_iter()
                        .map(|s| Span::styled(s.content, Style::default().fg(TAN).add_modifier(Modifier::ITALIC)))
                        .collect::<Vec<_>>();
                    lines.push(Line::from(spans));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Enter", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
                Span::styled(" next  ", Style::default().fg(TEXT_MUTED)),
                Span::styled("Esc", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
                Span::styled(" skip tour", Style::default().fg(TEXT_MUTED)),
            ]));
            (step.title, step.placement)
        }
        None => {
            lines.push(Line::from(Span::styled(
                "You're ready to go. Ask Mamba anything.",
                Style::default().fg(TEXT_PRIMARY),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("r", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
                Span::styled(" restart  ", Style::default().fg(TEXT_MUTED)),
                Span::styled("Enter", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
                Span::styled(" close", Style::default().fg(TEXT_MUTED)),
            ]));
            ("Tour complete", Placement::Center)
        }
    };

    // Highlight the anchored region
    if let Some(anchor) = view.anchor {
        let highlight = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(PALE_YELLOW));
        frame.render_widget(highlight, anchor.intersection(area));
    }

    let height = lines.len() as u16 + 2;
    let card = tour_card_rect(area, view.anchor, placement, TOUR_CARD_WIDTH, height);
    frame.render_widget(Clear, card);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), Style::default().fg(PALE_YELLOW).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COPPER))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let padded = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(2),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines), padded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::catalog::{Catalog, VisualizationId};
    use crate::config::Config;
    use crate::router::PanelRegistry;
    use crate::tour::{ANCHOR_GOALS, ANCHOR_METRICS};

    fn app(layout: LayoutProfile, tour: bool) -> App {
        let config = Config {
            layout,
            tour_enabled: tour,
            ..Config::default()
        };
        App::new(config, Arc::new(Catalog::builtin().unwrap()), PanelRegistry::builtin())
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 50)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_card_centered_without_anchor() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = tour_card_rect(area, None, Placement::Top, 40, 10);
        assert_eq!(rect, Rect::new(30, 15, 40, 10));
    }

    #[test]
    fn test_card_placed_relative_to_anchor() {
        let area = Rect::new(0, 0, 100, 40);
        let anchor = Rect::new(10, 30, 50, 3);
        assert_eq!(tour_card_rect(area, Some(anchor), Placement::Top, 40, 10).y, 20);
        let below = tour_card_rect(area, Some(Rect::new(60, 5, 30, 5)), Placement::Bottom, 40, 10);
        assert_eq!(below.y, 10);
        // clamped inside the screen
        assert_eq!(below.x, 60);
        let left = tour_card_rect(area, Some(Rect::new(70, 5, 30, 10)), Placement::Left, 40, 10);
        assert_eq!(left.x, 30);
    }

    #[test]
    fn test_card_clamped_to_small_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = tour_card_rect(area, Some(Rect::new(18, 4, 2, 1)), Placement::Bottom, 40, 10);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
    }

    #[tokio::test]
    async fn test_workspace_frame_records_anchors() {
        let mut app = app(LayoutProfile::Workspace, false);
        let screen = render(&mut app);
        assert!(screen.contains("Your day"));
        assert!(screen.contains("How can I help you today?"));
        assert!(app.anchors.get(ANCHOR_SEARCH).is_some());
        assert!(app.anchors.get(ANCHOR_YOUR_DAY).is_some());
        assert!(app.anchors.get(ANCHOR_INSIGHTS).is_some());
    }

    #[tokio::test]
    async fn test_impact_panel_records_section_anchors() {
        let mut app = app(LayoutProfile::Workspace, false);
        app.orchestrator.activate_visualization(VisualizationId::Impact);
        render(&mut app);
        assert!(app.anchors.get(ANCHOR_METRICS).is_some());
        assert!(app.anchors.get(ANCHOR_GOALS).is_some());
        assert!(app.anchors.get(ANCHOR_YOUR_DAY).is_none());
    }

    #[tokio::test]
    async fn test_split_layout_has_no_sidebar() {
        let mut app = app(LayoutProfile::Split, true);
        let screen = render(&mut app);
        assert!(!screen.contains("MambaHR"));
        assert!(screen.contains("Canvas"));
        assert!(app.anchors.get(ANCHOR_YOUR_DAY).is_none());
    }

    #[tokio::test]
    async fn test_tour_card_drawn_on_start() {
        let mut app = app(LayoutProfile::Workspace, true);
        let screen = render(&mut app);
        assert!(screen.contains("Welcome to MambaHR"));
        assert!(screen.contains("Step 1 of 8"));
    }
}
