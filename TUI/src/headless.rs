//! Non-interactive runs: answer queries without a terminal and print JSON.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{Catalog, VisualizationId};
use crate::conversation::{Role, Turn};
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::sequencer::Pacing;

/// One query and what the demo did with it.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub query: String,
    pub tool_calls: Vec<String>,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationId>,
    pub followups: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub exchanges: Vec<Exchange>,
    /// Panel left open once every query was answered.
    pub final_visualization: Option<VisualizationId>,
    pub turns: Vec<Turn>,
}

/// Runs each query to completion, one after the other. Blank queries are
/// skipped.
pub async fn ask(catalog: Arc<Catalog>, pacing: Pacing, queries: &[String]) -> Transcript {
    let mut orchestrator = Orchestrator::new(catalog, pacing);
    let mut exchanges = Vec::new();

    for query in queries {
        if orchestrator.submit(query).is_none() {
            warn!(query = %query, "Skipping blank query");
            continue;
        }
        let tool_calls = orchestrator.settle().await;

        let Some(reply) = orchestrator.state().turns().last().filter(|t| t.role == Role::Assistant) else {
            continue;
        };
        exchanges.push(Exchange {
            query: query.clone(),
            tool_calls,
            reply: reply.content.clone(),
            visualization: reply.visualization,
            followups: reply.followups.clone(),
        });
    }

    info!(answered = exchanges.len(), "Headless run finished");
    Transcript {
        exchanges,
        final_visualization: orchestrator.state().active_visualization(),
        turns: orchestrator.state().turns().to_vec(),
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_ask_answers_in_order() {
        let queries = vec!["Who is at flight risk?".to_string(), "Show org chart".to_string()];
        let transcript = ask(catalog(), Pacing::instant(), &queries).await;

        assert_eq!(transcript.exchanges.len(), 2);
        assert_eq!(transcript.turns.len(), 4);
        assert_eq!(transcript.exchanges[0].visualization, Some(VisualizationId::FlightRisk));
        assert!(!transcript.exchanges[0].tool_calls.is_empty());
        assert_eq!(transcript.final_visualization, Some(VisualizationId::OrgChart));
    }

    #[tokio::test]
    async fn test_blank_queries_are_skipped() {
        let queries = vec!["   ".to_string(), "help".to_string()];
        let transcript = ask(catalog(), Pacing::instant(), &queries).await;
        assert_eq!(transcript.exchanges.len(), 1);
        assert_eq!(transcript.exchanges[0].query, "help");
    }

    #[tokio::test]
    async fn test_transcript_json_shape() {
        let transcript = ask(catalog(), Pacing::instant(), &["Tell me about Emily".to_string()]).await;
        let json: serde_json::Value = serde_json::from_str(&to_json(&transcript).unwrap()).unwrap();

        assert_eq!(json["final_visualization"], "impact");
        assert_eq!(json["turns"][0]["role"], "user");
        assert_eq!(json["exchanges"][0]["tool_calls"][1], "calculate_impact");
    }

    #[test]
    fn test_catalog_serializes() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&*catalog()).unwrap()).unwrap();
        assert_eq!(json["fallback"]["key"], "default");
    }
}
