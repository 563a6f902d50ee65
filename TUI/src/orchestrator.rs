//! Owns the conversation and everything that may change it.
//!
//! Input handlers, the sequencer and the tour all go through here. The
//! sequencer runs on its own task but only sends events back; they are
//! applied on the caller's task via [`Orchestrator::handle`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::{Catalog, VisualizationId};
use crate::conversation::{ConversationState, TurnId};
use crate::matcher::QueryMatcher;
use crate::sequencer::{Pacing, SequenceEvent, SequenceStep, Sequencer};
use crate::tour::TourIntent;

pub struct Orchestrator {
    catalog: Arc<Catalog>,
    state: ConversationState,
    sequencer: Sequencer,
    events: mpsc::UnboundedReceiver<SequenceEvent>,
}

impl Orchestrator {
    pub fn new(catalog: Arc<Catalog>, pacing: Pacing) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            catalog,
            state: ConversationState::new(),
            sequencer: Sequencer::new(pacing, tx),
            events,
        }
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn is_responding(&self) -> bool {
        self.state.is_responding()
    }

    /// Appends the user turn and starts the matching answer. Blank input and
    /// input while a response is in flight are dropped.
    pub fn submit(&mut self, text: &str) -> Option<TurnId> {
        let Some(turn) = self.state.begin_response(text) else {
            debug!(responding = self.state.is_responding(), "Submit ignored");
            return None;
        };

        let entry = QueryMatcher::new(&self.catalog).match_query(text).clone();
        info!(turn, entry = %entry.key, "Query submitted");
        let sequence = self.sequencer.deliver(Arc::new(entry));
        self.state.attach_sequence(sequence);
        Some(turn)
    }

    /// Same contract as [`submit`](Self::submit).
    pub fn select_followup(&mut self, text: &str) -> Option<TurnId> {
        self.submit(text)
    }

    pub fn activate_visualization(&mut self, id: VisualizationId) {
        debug!(visualization = %id, "Panel opened");
        self.state.activate_visualization(id);
    }

    pub fn close_visualization(&mut self) {
        debug!("Panel closed");
        self.state.close_visualization();
    }

    pub fn apply_tour_intent(&mut self, intent: TourIntent) {
        self.state.apply_tour_intent(intent);
    }

    /// Waits for the next sequencer event. Never resolves while idle.
    pub async fn next_event(&mut self) -> Option<SequenceEvent> {
        self.events.recv().await
    }

    /// Applies one sequencer event. Returns false if it was stale.
    pub fn handle(&mut self, event: SequenceEvent) -> bool {
        let delivering = match &event.step {
            SequenceStep::Deliver(entry) => Some(entry.key.clone()),
            _ => None,
        };
        let applied = self.state.apply(event);
        if let (true, Some(entry)) = (applied, delivering) {
            info!(
                entry = %entry,
                visualization = ?self.state.active_visualization(),
                "Response delivered"
            );
        }
        applied
    }

    /// Drives the in-flight response to completion. Returns the tool-call
    /// labels observed on the way.
    pub async fn settle(&mut self) -> Vec<String> {
        let mut tool_calls = Vec::new();
        while self.state.is_responding() {
            let Some(event) = self.events.recv().await else {
                break;
            };
            let label = match &event.step {
                SequenceStep::ToolCall { label, .. } => Some(label.clone()),
                _ => None,
            };
            if self.handle(event) {
                tool_calls.extend(label);
            }
        }
        tool_calls
    }

    /// Cancels any pending answer. Events already queued become no-ops.
    pub fn shutdown(&mut self) {
        if self.sequencer.is_running() {
            info!(turns = self.state.turns().len(), "Shutting down with a response in flight");
        }
        self.sequencer.cancel();
        self.state.abandon_response();
    }
}
