//! Maps free text onto a catalog entry.

use tracing::trace;

use crate::catalog::{Catalog, CatalogEntry};

/// Pure lookup over a catalog. Never fails: no match yields the fallback.
pub struct QueryMatcher<'a> {
    catalog: &'a Catalog,
}

impl<'a> QueryMatcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn match_query(&self, raw: &str) -> &'a CatalogEntry {
        let q = normalize(raw);

        // Entity answers beat category answers mentioned in the same query.
        let entry = self
            .catalog
            .entities()
            .iter()
            .find(|e| e.triggers.matches(&q))
            .or_else(|| self.catalog.entries().iter().find(|e| e.triggers.matches(&q)))
            .unwrap_or_else(|| self.catalog.fallback());

        trace!(query = %q, entry = %entry.key, "Query matched");
        entry
    }
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VisualizationId;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_flight_risk_query() {
        let catalog = catalog();
        let entry = QueryMatcher::new(&catalog).match_query("Who is at flight risk?");
        assert_eq!(entry.key, "flight-risk");
        assert_eq!(
            entry.message,
            "I've identified 3 employees with elevated flight risk. Take a look at the analysis on the right—I've flagged the key warning signals for each."
        );
        assert_eq!(entry.visualization, Some(VisualizationId::FlightRisk));
    }

    #[test]
    fn test_entity_beats_generic_keyword() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);

        let entry = matcher.match_query("Tell me about Emily");
        assert_eq!(entry.key, "employee:emily");
        assert_eq!(entry.visualization, Some(VisualizationId::Impact));

        // "impact" and "metrics" would both hit general entries on their own
        let entry = matcher.match_query("what is emily's impact on our metrics");
        assert_eq!(entry.key, "employee:emily");
    }

    #[test]
    fn test_every_entity_shadows_every_generic_keyword() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);

        for entity in catalog.entities() {
            let name = entity.key.trim_start_matches("employee:");
            for generic in catalog.entries() {
                if let crate::catalog::Trigger::Keywords(words) = &generic.triggers {
                    for word in words {
                        let query = format!("{} {}", word, name);
                        assert_eq!(matcher.match_query(&query).key, entity.key, "query: {}", query);
                    }
                }
            }
        }
    }

    #[test]
    fn test_unmatched_query_uses_fallback() {
        let catalog = catalog();
        let entry = QueryMatcher::new(&catalog).match_query("asdkjasdkj");
        assert_eq!(entry.key, "default");
        assert_eq!(entry.visualization, Some(VisualizationId::OrgOverview));
        assert!(!entry.message.is_empty());
    }

    #[test]
    fn test_catalog_order_is_priority() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);
        // "leaving" (flight risk) is listed before "leave" (PTO)
        assert_eq!(matcher.match_query("Anyone leaving soon?").key, "flight-risk");
        assert_eq!(matcher.match_query("Who is on leave?").key, "pto");
        // "metric" comes before "impact"
        assert_eq!(matcher.match_query("Show me my impact metrics").key, "metrics");
    }

    #[test]
    fn test_normalization() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);
        assert_eq!(matcher.match_query("   SHOW ORG CHART  ").key, "org-chart");
        assert_eq!(normalize("  Hello World "), "hello world");
    }

    #[test]
    fn test_pattern_trigger() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);
        assert_eq!(matcher.match_query("What can you do?").key, "help");
        assert_eq!(matcher.match_query("help").visualization, Some(VisualizationId::Help));
    }

    #[test]
    fn test_welcome_and_sidebar_queries_resolve() {
        let catalog = catalog();
        let matcher = QueryMatcher::new(&catalog);
        assert_eq!(matcher.match_query("Show me my organization at a glance").key, "org-overview");
        assert_eq!(matcher.match_query("Show me org health overview").key, "team-health");
        assert_eq!(matcher.match_query("Show me settings").key, "settings");
        assert_eq!(matcher.match_query("Show pending PTO requests").key, "pto");
        assert_eq!(matcher.match_query("Show me workforce trends").key, "trends");
    }
}
