//! Timed reveal of a matched answer.
//!
//! A sequence runs as one spawned task that walks the entry's tool calls in
//! order, sleeping a random interval after each, then waits a fixed delay and
//! hands over the entry for delivery. The task never touches conversation
//! state; it only sends events tagged with its sequence id.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::CatalogEntry;
use crate::config::TimingConfig;

pub type SequenceId = u64;

#[derive(Debug, Clone)]
pub struct SequenceEvent {
    pub sequence: SequenceId,
    pub step: SequenceStep,
}

#[derive(Debug, Clone)]
pub enum SequenceStep {
    ToolCall { index: usize, label: String },
    Delivering,
    Deliver(Arc<CatalogEntry>),
}

/// Simulated latency bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tool_delay_min: Duration,
    pub tool_delay_max: Duration,
    pub delivery_delay: Duration,
}

impl Pacing {
    /// No waiting at all; used by tests and `ask --instant`.
    pub fn instant() -> Self {
        Self {
            tool_delay_min: Duration::ZERO,
            tool_delay_max: Duration::ZERO,
            delivery_delay: Duration::ZERO,
        }
    }

    fn tool_delay(&self) -> Duration {
        let min = self.tool_delay_min.as_millis() as u64;
        let max = self.tool_delay_max.as_millis() as u64;
        if max <= min {
            return self.tool_delay_min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for Pacing {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            tool_delay_min: Duration::from_millis(timing.tool_delay_min_ms),
            tool_delay_max: Duration::from_millis(timing.tool_delay_max_ms),
            delivery_delay: Duration::from_millis(timing.delivery_delay_ms),
        }
    }
}

pub struct Sequencer {
    pacing: Pacing,
    tx: mpsc::UnboundedSender<SequenceEvent>,
    next_id: SequenceId,
    task: Option<JoinHandle<()>>,
}

impl Sequencer {
    pub fn new(pacing: Pacing, tx: mpsc::UnboundedSender<SequenceEvent>) -> Self {
        Self {
            pacing,
            tx,
            next_id: 0,
            task: None,
        }
    }

    /// Starts revealing `entry`. Any earlier sequence is cancelled first.
    pub fn deliver(&mut self, entry: Arc<CatalogEntry>) -> SequenceId {
        self.cancel();
        self.next_id += 1;
        let id = self.next_id;
        debug!(sequence = id, entry = %entry.key, tools = entry.tool_calls.len(), "Sequence scheduled");
        self.task = Some(tokio::spawn(run_sequence(id, entry, self.pacing, self.tx.clone())));
        id
    }

    /// Aborts the pending sequence. Events it already queued are left for the
    /// consumer to discard by id.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!(sequence = self.next_id, "Sequence cancelled");
            }
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_sequence(
    sequence: SequenceId,
    entry: Arc<CatalogEntry>,
    pacing: Pacing,
    tx: mpsc::UnboundedSender<SequenceEvent>,
) {
    let send = |step: SequenceStep| tx.send(SequenceEvent { sequence, step }).is_ok();

    for (index, label) in entry.tool_calls.iter().enumerate() {
        if !send(SequenceStep::ToolCall { index, label: label.clone() }) {
            return;
        }
        tokio::time::sleep(pacing.tool_delay()).await;
    }

    if !send(SequenceStep::Delivering) {
        return;
    }
    tokio::time::sleep(pacing.delivery_delay).await;
    send(SequenceStep::Deliver(entry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use tokio::time::Instant;

    fn entry(key: &str) -> Arc<CatalogEntry> {
        Arc::new(Catalog::builtin().unwrap().get(key).unwrap().clone())
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<SequenceEvent>) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event.step, SequenceStep::Deliver(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_tool_calls_fire_in_catalog_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = Sequencer::new(Pacing::instant(), tx);
        let entry = entry("flight-risk");
        let id = sequencer.deliver(entry.clone());

        let events = drain(&mut rx).await;
        let labels: Vec<String> = events
            .iter()
            .filter_map(|e| match &e.step {
                SequenceStep::ToolCall { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(labels, entry.tool_calls);
        assert!(events.iter().all(|e| e.sequence == id));
        assert!(matches!(events.last().unwrap().step, SequenceStep::Deliver(_)));
        assert!(matches!(events[events.len() - 2].step, SequenceStep::Delivering));
    }

    #[tokio::test]
    async fn test_entry_without_tool_calls_goes_straight_to_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = Sequencer::new(Pacing::instant(), tx);
        sequencer.deliver(entry("org-chart"));

        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].step, SequenceStep::Delivering));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_stay_within_bounds() {
        let pacing = Pacing {
            tool_delay_min: Duration::from_millis(400),
            tool_delay_max: Duration::from_millis(700),
            delivery_delay: Duration::from_millis(300),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = Sequencer::new(pacing, tx);
        let entry = entry("flight-risk");
        let started = Instant::now();
        sequencer.deliver(entry.clone());

        drain(&mut rx).await;
        let elapsed = started.elapsed();
        let n = entry.tool_calls.len() as u32;
        assert!(elapsed >= Duration::from_millis(400) * n + Duration::from_millis(300));
        assert!(elapsed <= Duration::from_millis(700) * n + Duration::from_millis(300) + Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_delivery() {
        let pacing = Pacing {
            tool_delay_min: Duration::from_millis(500),
            tool_delay_max: Duration::from_millis(500),
            delivery_delay: Duration::from_millis(300),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = Sequencer::new(pacing, tx);
        sequencer.deliver(entry("flight-risk"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        sequencer.cancel();
        assert!(!sequencer.is_running());
        tokio::time::sleep(Duration::from_secs(10)).await;

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0].step, SequenceStep::ToolCall { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_new_sequence_gets_new_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = Sequencer::new(Pacing::instant(), tx);
        let first = sequencer.deliver(entry("help"));
        drain(&mut rx).await;
        let second = sequencer.deliver(entry("help"));
        assert!(second > first);
    }

    #[test]
    fn test_fixed_delay_when_bounds_collapse() {
        let pacing = Pacing {
            tool_delay_min: Duration::from_millis(250),
            tool_delay_max: Duration::from_millis(250),
            delivery_delay: Duration::ZERO,
        };
        assert_eq!(pacing.tool_delay(), Duration::from_millis(250));
        assert_eq!(Pacing::instant().tool_delay(), Duration::ZERO);
    }
}
