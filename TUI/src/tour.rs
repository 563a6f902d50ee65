//! Guided tour state machine.
//!
//! The tour walks a fixed script. It never reads conversation state; step
//! changes return a [`TourIntent`] which the orchestrator applies. Anchors are
//! screen regions recorded by the renderer and may appear a few frames late,
//! so each anchored step polls for a bounded number of attempts.

use std::collections::HashMap;

use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::catalog::VisualizationId;

/// One-way request from the tour to whoever owns the side slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourIntent {
    ShowVisualization(VisualizationId),
    ClearVisualization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Center,
    Top,
    Bottom,
    Left,
}

pub struct TourStep {
    pub title: &'static str,
    pub body: &'static str,
    pub example: Option<&'static str>,
    pub anchor: Option<&'static str>,
    pub placement: Placement,
    pub pin: TourIntent,
}

pub const ANCHOR_METRICS: &str = "tour-metrics";
pub const ANCHOR_INSIGHTS: &str = "tour-insights";
pub const ANCHOR_BREAKDOWN: &str = "tour-breakdown";
pub const ANCHOR_REVIEWS: &str = "tour-reviews";
pub const ANCHOR_GOALS: &str = "tour-goals";
pub const ANCHOR_SEARCH: &str = "tour-search";
pub const ANCHOR_YOUR_DAY: &str = "tour-your-day";

const IMPACT: TourIntent = TourIntent::ShowVisualization(VisualizationId::Impact);

pub const TOUR_STEPS: &[TourStep] = &[
    TourStep {
        title: "Welcome to MambaHR",
        body: "Let's take a quick tour of your AI-native People OS. This is a guided showcase.",
        example: None,
        anchor: None,
        placement: Placement::Center,
        pin: TourIntent::ClearVisualization,
    },
    TourStep {
        title: "Real-time Impact",
        body: "Instantly see the financial & strategic health of your organization.",
        example: Some("Track Top % Talent, Flight Risk, and Productivity Scores in real-time."),
        anchor: Some(ANCHOR_METRICS),
        placement: Placement::Bottom,
        pin: IMPACT,
    },
    TourStep {
        title: "Proactive Insights",
        body: "Mamba automatically surfaces critical issues before you ask.",
        example: Some("\"Emily Kim needs attention\" -> one-click \"Schedule Check-in\""),
        anchor: Some(ANCHOR_INSIGHTS),
        placement: Placement::Top,
        pin: IMPACT,
    },
    TourStep {
        title: "ROI Analysis",
        body: "Understand exactly where value is being generated.",
        example: Some("Visualize Revenue Generated vs. Cost Savings per employee."),
        anchor: Some(ANCHOR_BREAKDOWN),
        placement: Placement::Left,
        pin: IMPACT,
    },
    TourStep {
        title: "Performance History",
        body: "Context-aware history of all performance reviews.",
        example: Some("AI summarizes strengths & weaknesses from the last 3 cycles."),
        anchor: Some(ANCHOR_REVIEWS),
        placement: Placement::Left,
        pin: IMPACT,
    },
    TourStep {
        title: "Goals Alignment",
        body: "Keep everyone aligned with company objectives.",
        example: Some("Track OKR progress and link daily tasks to strategic goals."),
        anchor: Some(ANCHOR_GOALS),
        placement: Placement::Left,
        pin: IMPACT,
    },
    TourStep {
        title: "Ask Anything",
        body: "Use natural language to find answers, people, or data.",
        example: Some("\"Who is at risk of leaving?\" returns a list of employees with engagement scores."),
        anchor: Some(ANCHOR_SEARCH),
        placement: Placement::Top,
        pin: TourIntent::ClearVisualization,
    },
    TourStep {
        title: "Command Center",
        body: "Your daily command center for approvals and tasks.",
        example: Some("Batch approve 3 PTO requests or review 2 pending expense reports."),
        anchor: Some(ANCHOR_YOUR_DAY),
        placement: Placement::Left,
        pin: TourIntent::ClearVisualization,
    },
];

/// Screen regions the last frame drew, keyed by anchor name.
#[derive(Debug, Default, Clone)]
pub struct AnchorMap {
    rects: HashMap<&'static str, Rect>,
}

impl AnchorMap {
    pub fn record(&mut self, name: &'static str, rect: Rect) {
        self.rects.insert(name, rect);
    }

    pub fn get(&self, name: &str) -> Option<Rect> {
        self.rects.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorStatus {
    Searching,
    Found(Rect),
    Centered,
}

/// What the host should draw: the step and where to attach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourView {
    pub step_index: usize,
    pub anchor: Option<Rect>,
}

pub struct TourController {
    steps: &'static [TourStep],
    step_index: usize,
    visible: bool,
    retry_limit: u32,
    attempts: u32,
    anchor: AnchorStatus,
}

impl TourController {
    pub fn new(retry_limit: u32, visible: bool) -> Self {
        Self::with_steps(TOUR_STEPS, retry_limit, visible)
    }

    fn with_steps(steps: &'static [TourStep], retry_limit: u32, visible: bool) -> Self {
        let mut tour = Self {
            steps,
            step_index: 0,
            visible,
            // at least one lookup so a missing anchor still settles centered
            retry_limit: retry_limit.max(1),
            attempts: 0,
            anchor: AnchorStatus::Centered,
        };
        tour.enter_step();
        tour
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[cfg(test)]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_complete(&self) -> bool {
        self.step_index >= self.steps.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn current_step(&self) -> Option<&'static TourStep> {
        self.steps.get(self.step_index)
    }

    /// Intent for the step currently shown, if any.
    pub fn current_intent(&self) -> Option<TourIntent> {
        self.current_step().map(|s| s.pin)
    }

    /// Moves forward one step. No-op once complete.
    pub fn advance(&mut self) -> Option<TourIntent> {
        if self.is_complete() {
            return None;
        }
        self.step_index += 1;
        debug!(step = self.step_index, "Tour advanced");
        self.enter_step();
        self.current_intent()
    }

    /// Back to the first step. Only valid once the tour is complete.
    pub fn restart(&mut self) -> Option<TourIntent> {
        if !self.is_complete() {
            return None;
        }
        self.step_index = 0;
        self.visible = true;
        debug!("Tour restarted");
        self.enter_step();
        self.current_intent()
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Shows the overlay again at the current step.
    pub fn reveal(&mut self) -> Option<TourIntent> {
        self.visible = true;
        self.current_intent()
    }

    pub fn view(&self) -> Option<TourView> {
        if !self.visible {
            return None;
        }
        let anchor = match self.anchor {
            AnchorStatus::Found(rect) => Some(rect),
            _ => None,
        };
        Some(TourView {
            step_index: self.step_index,
            anchor,
        })
    }

    /// One lookup attempt for the current step's anchor. Returns the view
    /// when an attempt was made, `None` once the step has settled.
    pub fn poll_anchor(&mut self, anchors: &AnchorMap) -> Option<TourView> {
        if !self.visible || self.attempts >= self.retry_limit {
            return None;
        }
        let name = self.current_step()?.anchor?;
        if self.anchor == AnchorStatus::Centered {
            return None;
        }

        self.attempts += 1;
        match anchors.get(name) {
            // keep following the rect while panels may still be moving
            Some(rect) => self.anchor = AnchorStatus::Found(rect),
            None if matches!(self.anchor, AnchorStatus::Found(_)) => {}
            None if self.attempts >= self.retry_limit => {
                warn!(anchor = name, attempts = self.attempts, "Tour anchor not found, centering step");
                self.anchor = AnchorStatus::Centered;
            }
            None => {}
        }
        self.view()
    }

    fn enter_step(&mut self) {
        self.attempts = 0;
        self.anchor = match self.current_step().and_then(|s| s.anchor) {
            Some(_) => AnchorStatus::Searching,
            None => AnchorStatus::Centered,
        };
    }
}
