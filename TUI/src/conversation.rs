//! Conversation state: the append-only turn log plus the panel and indicator
//! state the renderer reads. Only the orchestrator mutates it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::catalog::VisualizationId;
use crate::sequencer::{SequenceEvent, SequenceId, SequenceStep};
use crate::tour::TourIntent;

pub type TurnId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub followups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Where a response currently is between submit and delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponsePhase {
    #[default]
    Idle,
    Typing,
    RunningTool(usize),
    Delivering,
}

/// What occupies the side slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidePanelMode {
    #[default]
    DefaultInfo,
    Visualization,
}

#[derive(Debug, Default)]
pub struct ConversationState {
    turns: Vec<Turn>,
    phase: ResponsePhase,
    active_tool_call: Option<String>,
    active_visualization: Option<VisualizationId>,
    side_panel: SidePanelMode,
    next_turn_id: TurnId,
    in_flight: Option<SequenceId>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn phase(&self) -> ResponsePhase {
        self.phase
    }

    pub fn is_responding(&self) -> bool {
        self.phase != ResponsePhase::Idle
    }

    pub fn active_tool_call(&self) -> Option<&str> {
        self.active_tool_call.as_deref()
    }

    pub fn active_visualization(&self) -> Option<VisualizationId> {
        self.active_visualization
    }

    pub fn side_panel(&self) -> SidePanelMode {
        self.side_panel
    }

    /// Follow-ups offered by the latest assistant turn.
    pub fn latest_followups(&self) -> &[String] {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.followups.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a user turn with this text would be accepted right now.
    pub fn accepts(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.is_responding()
    }

    /// Appends the user turn and enters `Typing`. Returns `None` when the
    /// input is blank or a response is already in flight.
    pub fn begin_response(&mut self, text: &str) -> Option<TurnId> {
        if !self.accepts(text) {
            return None;
        }
        let id = self.push_turn(Role::User, text.trim().to_string(), None, Vec::new());
        self.phase = ResponsePhase::Typing;
        debug!(turn = id, "Response started");
        Some(id)
    }

    /// Binds the running sequence; only its events are applied from now on.
    pub fn attach_sequence(&mut self, sequence: SequenceId) {
        self.in_flight = Some(sequence);
    }

    /// Applies a sequencer event. Returns false for stale events.
    pub fn apply(&mut self, event: SequenceEvent) -> bool {
        if self.in_flight != Some(event.sequence) {
            debug!(sequence = event.sequence, "Ignoring stale sequence event");
            return false;
        }

        match event.step {
            SequenceStep::ToolCall { index, label } => {
                self.phase = ResponsePhase::RunningTool(index);
                self.active_tool_call = Some(label);
            }
            SequenceStep::Delivering => {
                self.phase = ResponsePhase::Delivering;
            }
            SequenceStep::Deliver(entry) => {
                self.active_tool_call = None;
                self.push_turn(
                    Role::Assistant,
                    entry.message.clone(),
                    entry.visualization,
                    entry.followups.clone(),
                );
                if let Some(id) = entry.visualization {
                    self.activate_visualization(id);
                }
                self.phase = ResponsePhase::Idle;
                self.in_flight = None;
                debug!(entry = %entry.key, "Response delivered");
            }
        }
        true
    }

    /// Drops the in-flight response without delivering it.
    pub fn abandon_response(&mut self) {
        if self.in_flight.take().is_some() || self.is_responding() {
            debug!("Response abandoned");
        }
        self.phase = ResponsePhase::Idle;
        self.active_tool_call = None;
    }

    pub fn activate_visualization(&mut self, id: VisualizationId) {
        self.active_visualization = Some(id);
        self.side_panel = SidePanelMode::Visualization;
    }

    pub fn close_visualization(&mut self) {
        self.active_visualization = None;
        self.side_panel = SidePanelMode::DefaultInfo;
    }

    pub fn apply_tour_intent(&mut self, intent: TourIntent) {
        match intent {
            TourIntent::ShowVisualization(id) => self.activate_visualization(id),
            TourIntent::ClearVisualization => self.close_visualization(),
        }
    }

    fn push_turn(
        &mut self,
        role: Role,
        content: String,
        visualization: Option<VisualizationId>,
        followups: Vec<String>,
    ) -> TurnId {
        self.next_turn_id += 1;
        let id = self.next_turn_id;
        self.turns.push(Turn {
            id,
            role,
            content,
            visualization,
            followups,
            created_at: Utc::now(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::sync::Arc;

    fn event(sequence: SequenceId, step: SequenceStep) -> SequenceEvent {
        SequenceEvent { sequence, step }
    }

    #[test]
    fn test_blank_input_changes_nothing() {
        let mut state = ConversationState::new();
        for text in ["", "   ", "\t\n"] {
            assert!(state.begin_response(text).is_none());
        }
        assert!(state.turns().is_empty());
        assert_eq!(state.phase(), ResponsePhase::Idle);
        assert_eq!(state.side_panel(), SidePanelMode::DefaultInfo);
    }

    #[test]
    fn test_user_turn_is_trimmed_and_gates_input() {
        let mut state = ConversationState::new();
        let id = state.begin_response("  hello  ").unwrap();
        assert_eq!(state.turns()[0].id, id);
        assert_eq!(state.turns()[0].content, "hello");
        assert!(state.is_responding());
        assert!(state.begin_response("again").is_none());
        assert_eq!(state.turns().len(), 1);
    }

    #[test]
    fn test_delivery_appends_one_turn_and_opens_panel() {
        let catalog = Catalog::builtin().unwrap();
        let entry = Arc::new(catalog.get("flight-risk").unwrap().clone());
        let mut state = ConversationState::new();
        state.begin_response("Who is at flight risk?");
        state.attach_sequence(7);

        assert!(state.apply(event(7, SequenceStep::ToolCall { index: 0, label: "scan".into() })));
        assert_eq!(state.phase(), ResponsePhase::RunningTool(0));
        assert_eq!(state.active_tool_call(), Some("scan"));

        assert!(state.apply(event(7, SequenceStep::Delivering)));
        assert!(state.apply(event(7, SequenceStep::Deliver(entry))));

        assert_eq!(state.turns().len(), 2);
        assert_eq!(state.turns()[1].role, Role::Assistant);
        assert!(state.turns()[1].id > state.turns()[0].id);
        assert_eq!(state.active_visualization(), Some(VisualizationId::FlightRisk));
        assert_eq!(state.side_panel(), SidePanelMode::Visualization);
        assert_eq!(state.active_tool_call(), None);
        assert!(!state.is_responding());
        assert_eq!(state.latest_followups()[0], "Schedule check-ins");
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let catalog = Catalog::builtin().unwrap();
        let entry = Arc::new(catalog.fallback().clone());
        let mut state = ConversationState::new();
        state.begin_response("hi");
        state.attach_sequence(1);
        state.abandon_response();

        assert!(!state.apply(event(1, SequenceStep::Deliver(entry))));
        assert_eq!(state.turns().len(), 1);
        assert!(!state.is_responding());
    }

    #[test]
    fn test_panel_actions_allowed_while_responding() {
        let mut state = ConversationState::new();
        state.begin_response("hi");
        state.activate_visualization(VisualizationId::Settings);
        assert_eq!(state.side_panel(), SidePanelMode::Visualization);
        state.close_visualization();
        assert_eq!(state.active_visualization(), None);
        assert_eq!(state.side_panel(), SidePanelMode::DefaultInfo);
        assert!(state.is_responding());
    }

    #[test]
    fn test_tour_intents() {
        let mut state = ConversationState::new();
        state.apply_tour_intent(TourIntent::ShowVisualization(VisualizationId::Impact));
        assert_eq!(state.active_visualization(), Some(VisualizationId::Impact));
        state.apply_tour_intent(TourIntent::ClearVisualization);
        assert_eq!(state.side_panel(), SidePanelMode::DefaultInfo);
    }
}
