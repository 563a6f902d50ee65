//! Response catalog and demo fixtures.
//!
//! Everything the assistant can say lives here as static data. The catalog
//! has three tiers that the matcher consults in order: named entities, the
//! general keyword table, and a single fallback entry.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Panel a response can bring up in the side slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationId {
    FlightRisk,
    OrgOverview,
    EmployeeProfile,
    PtoRequests,
    Metrics,
    TeamHealth,
    Directory,
    OrgChart,
    Analytics,
    Trends,
    Settings,
    Help,
    Impact,
}

impl VisualizationId {
    pub const ALL: [VisualizationId; 13] = [
        VisualizationId::FlightRisk,
        VisualizationId::OrgOverview,
        VisualizationId::EmployeeProfile,
        VisualizationId::PtoRequests,
        VisualizationId::Metrics,
        VisualizationId::TeamHealth,
        VisualizationId::Directory,
        VisualizationId::OrgChart,
        VisualizationId::Analytics,
        VisualizationId::Trends,
        VisualizationId::Settings,
        VisualizationId::Help,
        VisualizationId::Impact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualizationId::FlightRisk => "flight-risk",
            VisualizationId::OrgOverview => "org-overview",
            VisualizationId::EmployeeProfile => "employee-profile",
            VisualizationId::PtoRequests => "pto-requests",
            VisualizationId::Metrics => "metrics",
            VisualizationId::TeamHealth => "team-health",
            VisualizationId::Directory => "directory",
            VisualizationId::OrgChart => "org-chart",
            VisualizationId::Analytics => "analytics",
            VisualizationId::Trends => "trends",
            VisualizationId::Settings => "settings",
            VisualizationId::Help => "help",
            VisualizationId::Impact => "impact",
        }
    }
}

impl fmt::Display for VisualizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        VisualizationId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("Unknown panel: {}", s.trim()))
    }
}

/// What an entry reacts to. Inputs are normalized (trimmed, lowercased)
/// before they reach `matches`.
#[derive(Debug, Clone)]
pub enum Trigger {
    Keywords(Vec<String>),
    Pattern(Regex),
}

impl Trigger {
    pub fn keywords(words: &[&str]) -> Self {
        Trigger::Keywords(words.iter().map(|w| w.to_lowercase()).collect())
    }

    pub fn pattern(entry: &str, source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Trigger::Pattern)
            .map_err(|e| Error::InvalidTrigger {
                entry: entry.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Trigger::Keywords(words) => words.iter().any(|w| normalized.contains(w.as_str())),
            Trigger::Pattern(re) => re.is_match(normalized),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Trigger::Keywords(words) => words.iter().all(|w| w.trim().is_empty()),
            Trigger::Pattern(re) => re.as_str().is_empty(),
        }
    }
}

impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "lowercase")]
        enum Repr<'a> {
            Keywords(&'a [String]),
            Pattern(&'a str),
        }

        match self {
            Trigger::Keywords(words) => Repr::Keywords(words).serialize(serializer),
            Trigger::Pattern(re) => Repr::Pattern(re.as_str()).serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub key: String,
    pub triggers: Trigger,
    pub message: String,
    pub visualization: Option<VisualizationId>,
    pub tool_calls: Vec<String>,
    pub followups: Vec<String>,
}

impl CatalogEntry {
    /// General entry: tool calls and follow-ups derive from the panel it opens.
    fn general(key: &str, triggers: Trigger, message: &str, visualization: VisualizationId) -> Self {
        Self {
            key: key.to_string(),
            triggers,
            message: message.to_string(),
            visualization: Some(visualization),
            tool_calls: strings(tool_calls_for(visualization)),
            followups: strings(followups_for(visualization)),
        }
    }

    fn entity(
        name: &str,
        message: &str,
        visualization: VisualizationId,
        tool_calls: &[&str],
        followups: &[&str],
    ) -> Self {
        Self {
            key: format!("employee:{}", name),
            triggers: Trigger::keywords(&[name]),
            message: message.to_string(),
            visualization: Some(visualization),
            tool_calls: strings(tool_calls),
            followups: strings(followups),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Simulated backend work shown while a panel's answer is "computed".
pub fn tool_calls_for(visualization: VisualizationId) -> &'static [&'static str] {
    match visualization {
        VisualizationId::FlightRisk => &[
            "scan_behavioral_signals",
            "analyze_engagement_trends",
            "check_linkedin_activity",
        ],
        VisualizationId::OrgOverview => &["aggregate_headcount", "calculate_health_scores"],
        VisualizationId::PtoRequests => &["fetch_pending_requests", "check_team_coverage"],
        VisualizationId::Metrics => &["aggregate_hr_metrics", "calculate_trends"],
        VisualizationId::TeamHealth => &["analyze_team_sentiment", "aggregate_health_scores"],
        VisualizationId::Directory => &["fetch_employee_list", "check_active_status"],
        VisualizationId::Analytics => &["run_workforce_analytics", "generate_insights"],
        VisualizationId::Impact => &[
            "calculate_employee_impact",
            "analyze_flight_risk",
            "fetch_performance_data",
        ],
        _ => &[],
    }
}

pub fn followups_for(visualization: VisualizationId) -> &'static [&'static str] {
    match visualization {
        VisualizationId::FlightRisk => &["Schedule check-ins", "Review compensation", "Show trends"],
        VisualizationId::OrgOverview => &["Show by department", "Check hiring pipeline", "View analytics"],
        VisualizationId::PtoRequests => &["Approve all", "Check coverage", "Show calendar"],
        VisualizationId::Metrics => &["Compare to last quarter", "Show breakdown", "Export report"],
        VisualizationId::TeamHealth => &["Find low scorers", "Schedule pulse survey", "View trends"],
        VisualizationId::Directory => &["Filter by department", "Show org chart", "Find someone"],
        VisualizationId::Analytics => &["Show YoY comparison", "Drill into attrition", "Export data"],
        VisualizationId::Settings => &["Manage integrations", "Update notifications", "View audit log"],
        VisualizationId::Help => &["Show examples", "What can you do?", "Get started"],
        VisualizationId::Impact => &["Show flight risk factors", "Review compensation", "Schedule 1:1"],
        _ => &["Tell me more", "Show details"],
    }
}

/// The complete set of canned answers.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    entities: Vec<CatalogEntry>,
    entries: Vec<CatalogEntry>,
    fallback: CatalogEntry,
}

impl Catalog {
    pub fn new(
        entities: Vec<CatalogEntry>,
        entries: Vec<CatalogEntry>,
        fallback: CatalogEntry,
    ) -> Result<Self> {
        for entry in entities.iter().chain(entries.iter()) {
            if entry.triggers.is_empty() {
                return Err(Error::InvalidTrigger {
                    entry: entry.key.clone(),
                    reason: "trigger set is empty".to_string(),
                });
            }
        }
        Ok(Self { entities, entries, fallback })
    }

    /// Entity-specific entries; these shadow every general entry.
    pub fn entities(&self) -> &[CatalogEntry] {
        &self.entities
    }

    /// General entries in priority order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> &CatalogEntry {
        &self.fallback
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entities
            .iter()
            .chain(self.entries.iter())
            .chain(std::iter::once(&self.fallback))
            .find(|e| e.key == key)
    }

    /// Every panel some answer can open.
    pub fn visualizations(&self) -> BTreeSet<VisualizationId> {
        self.entities
            .iter()
            .chain(self.entries.iter())
            .chain(std::iter::once(&self.fallback))
            .filter_map(|e| e.visualization)
            .collect()
    }

    pub fn builtin() -> Result<Self> {
        use VisualizationId as V;

        let entities = vec![
            CatalogEntry::entity(
                "sebastian",
                "Sebastian joined just 7 days ago and is ramping up quickly. He's already reviewed 3 PRs and attended his first team sync. Engagement is at 72%—healthy for a new joiner. No concerns yet, but I'll flag anything if patterns change.",
                V::Directory,
                &["analyze_employee_signals", "check_onboarding_progress"],
                &["Schedule a 30-day check-in", "Show his team"],
            ),
            CatalogEntry::entity(
                "emily",
                "⚠️ Emily Kim is showing signs of disengagement. Her commits dropped 40% this month, she's skipped two 1:1s, and updated her LinkedIn last week. Total impact: $842,000/year. I'd recommend scheduling a retention conversation soon.",
                V::Impact,
                &["analyze_flight_risk", "calculate_impact", "scan_linkedin_activity"],
                &["Schedule 1:1 with Emily", "Review her comp"],
            ),
            CatalogEntry::entity(
                "gary",
                "Gary Tan is thriving—92 PPI score with 88% engagement. He's been here 5 years and is a key culture carrier. Zero flight risk signals. Recently started mentoring 2 new hires.",
                V::Directory,
                &["analyze_employee_signals", "check_mentorship_impact"],
                &["Show his impact", "Check his team"],
            ),
            CatalogEntry::entity(
                "michael",
                "Michael Seibel has an 89 PPI score and has been a high performer for 8 years. He leads the YC batch program and directly influences 50+ portfolio companies per batch. Flight risk: very low.",
                V::Directory,
                &["analyze_employee_signals", "check_leadership_metrics"],
                &["Show his team", "Check impact"],
            ),
        ];

        let entries = vec![
            CatalogEntry::general(
                "flight-risk",
                Trigger::keywords(&["flight risk", "at risk", "leaving", "retention", "quit", "resign"]),
                "I've identified 3 employees with elevated flight risk. Take a look at the analysis on the right—I've flagged the key warning signals for each.",
                V::FlightRisk,
            ),
            CatalogEntry::general(
                "org-overview",
                Trigger::keywords(&["org overview", "organization overview", "company overview", "headcount", "glance"]),
                "Here's your organization snapshot. 52 employees across 5 departments, with an overall health score of 87. Looking strong!",
                V::OrgOverview,
            ),
            CatalogEntry::general(
                "pto",
                Trigger::keywords(&["pto", "time off", "vacation", "leave", "pending"]),
                "You have 3 PTO requests waiting for approval. I've pulled them up so you can review and take action quickly.",
                V::PtoRequests,
            ),
            CatalogEntry::general(
                "metrics",
                Trigger::keywords(&["metric", "kpi", "performance", "satisfaction", "turnover"]),
                "Here are your key HR metrics. Turnover is down 1.5% and employee satisfaction hit 4.2/5—great progress this quarter!",
                V::Metrics,
            ),
            CatalogEntry::general(
                "team-health",
                Trigger::keywords(&["team health", "health score", "engagement", "org health", "morale"]),
                "Your overall org health score is 87, up 5 points from last month. Platform Team is thriving at 92, but DevOps could use some attention.",
                V::TeamHealth,
            ),
            CatalogEntry::general(
                "directory",
                Trigger::keywords(&["directory", "employee list", "who works", "find employee", "search employee"]),
                "Here's your employee directory. You can search, filter by department, or click on anyone to see their full profile.",
                V::Directory,
            ),
            CatalogEntry::general(
                "org-chart",
                Trigger::keywords(&["org chart", "reporting", "structure", "hierarchy", "reports to"]),
                "Here's your organization chart. Click on any node to expand the team or view individual profiles.",
                V::OrgChart,
            ),
            CatalogEntry::general(
                "teams",
                Trigger::keywords(&["teams", "team overview", "departments"]),
                "I've pulled up your teams overview. Engineering is your largest team at 24 people, followed by Sales with 10.",
                V::OrgOverview,
            ),
            CatalogEntry::general(
                "analytics",
                Trigger::keywords(&["analytics", "reports", "analyze", "analysis", "insights"]),
                "Here's your HR analytics dashboard. I've highlighted the trends that need your attention.",
                V::Analytics,
            ),
            CatalogEntry::general(
                "trends",
                Trigger::keywords(&["trend", "over time", "history", "growth"]),
                "I've charted your workforce trends. Headcount is up 12% YoY and attrition has been steadily declining.",
                V::Trends,
            ),
            CatalogEntry::general(
                "impact",
                Trigger::keywords(&["impact", "contribution", "value"]),
                "Here's your impact overview. Your HR initiatives have saved an estimated $2.3M in retention costs this year.",
                V::Metrics,
            ),
            CatalogEntry::general(
                "settings",
                Trigger::keywords(&["settings", "preferences", "configure"]),
                "Here are your account settings. You can manage notifications, integrations, and team permissions.",
                V::Settings,
            ),
            CatalogEntry::general(
                "expenses",
                Trigger::keywords(&["expense", "spending", "budget", "cost"]),
                "I've pulled up expense reports. Total spend this month is $48,200, with most going to benefits and payroll.",
                V::Metrics,
            ),
            CatalogEntry::general(
                "equipment",
                Trigger::keywords(&["equipment", "laptop", "hardware", "asset"]),
                "You have 2 pending equipment requests. Sarah needs a new monitor and Marcus requested a standing desk.",
                V::PtoRequests,
            ),
            CatalogEntry::general(
                "help",
                Trigger::pattern("help", r"help|what can you do|capabilities|how do")?,
                "I can help you with:\n• Finding employees and org info\n• Reviewing PTO & expense requests\n• Analyzing team health and flight risk\n• Tracking metrics and trends\n• Managing settings and integrations\n\nJust ask naturally!",
                V::Help,
            ),
            CatalogEntry::general(
                "home",
                Trigger::keywords(&["home", "dashboard", "main"]),
                "Welcome back! Your organization is healthy at 87. You have 3 pending PTO requests and 2 employees that might need a check-in.",
                V::OrgOverview,
            ),
        ];

        let fallback = CatalogEntry {
            key: "default".to_string(),
            triggers: Trigger::Keywords(Vec::new()),
            message: "I've pulled up some relevant information for you. Let me know if you need anything specific!".to_string(),
            visualization: Some(DEFAULT_VISUALIZATION),
            tool_calls: strings(&["aggregate_org_data"]),
            followups: strings(&["Show org overview", "Check team health"]),
        };

        Catalog::new(entities, entries, fallback)
    }
}

/// Panel shown when nothing in the catalog matched.
pub const DEFAULT_VISUALIZATION: VisualizationId = VisualizationId::OrgOverview;

// Fixtures for the welcome view, the "your day" panel and the sidebar.

pub struct PromptCategory {
    pub name: &'static str,
    pub prompts: &'static [&'static str],
}

pub const PROMPT_CATEGORIES: &[PromptCategory] = &[
    PromptCategory {
        name: "People",
        prompts: &["Who is at flight risk?", "Show org chart", "Find employee directory"],
    },
    PromptCategory {
        name: "Operations",
        prompts: &["Show pending PTO", "Check expense reports", "Equipment requests"],
    },
    PromptCategory {
        name: "Insights",
        prompts: &["Show key metrics", "Team health check", "Workforce trends"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    Warning,
    Alert,
    Success,
}

pub struct Insight {
    pub kind: InsightKind,
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub query: &'static str,
}

pub const PROACTIVE_INSIGHTS: &[Insight] = &[
    Insight {
        kind: InsightKind::Warning,
        title: "Emily Kim needs attention",
        description: "Her engagement dropped 15% after three cancelled 1:1s.",
        action: "Schedule a check-in",
        query: "Tell me about Emily",
    },
    Insight {
        kind: InsightKind::Alert,
        title: "3 engineers updated LinkedIn",
        description: "Unusual activity for Platform Team this month.",
        action: "Review flight risks",
        query: "Who is at flight risk?",
    },
    Insight {
        kind: InsightKind::Success,
        title: "DEI hiring improved 12%",
        description: "Great progress on diversity goals this quarter!",
        action: "See breakdown",
        query: "Show me key metrics",
    },
];

pub struct DayTask {
    pub label: &'static str,
    pub query: &'static str,
    pub urgent: bool,
}

pub const YOUR_DAY_TASKS: &[DayTask] = &[
    DayTask { label: "Review 3 PTO requests", query: "Show pending PTO requests", urgent: true },
    DayTask { label: "2 employees at flight risk", query: "Who is at flight risk?", urgent: true },
    DayTask { label: "Complete Q4 review prep", query: "Show me key metrics", urgent: false },
];

pub const QUICK_LINKS: &[(&str, &str)] = &[
    ("Org health", "Show me org health"),
    ("Key metrics", "Show me key metrics"),
];

/// Sidebar entries as (label, query).
pub const NAV_SHORTCUTS: &[(&str, &str)] = &[
    ("Home", "Show me my organization at a glance"),
    ("Org Health", "Show me org health overview"),
    ("Impact", "Show me my impact metrics"),
    ("Settings", "Show me settings"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_builds() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.entities().len(), 4);
        assert_eq!(catalog.entries().len(), 16);
        assert_eq!(catalog.fallback().visualization, Some(VisualizationId::OrgOverview));
    }

    #[test]
    fn general_entries_take_tool_calls_from_their_panel() {
        let catalog = Catalog::builtin().unwrap();
        let flight = catalog.get("flight-risk").unwrap();
        assert_eq!(
            flight.tool_calls,
            vec!["scan_behavioral_signals", "analyze_engagement_trends", "check_linkedin_activity"]
        );
        assert_eq!(flight.followups[0], "Schedule check-ins");

        let chart = catalog.get("org-chart").unwrap();
        assert!(chart.tool_calls.is_empty());
        assert_eq!(chart.followups, vec!["Tell me more", "Show details"]);
    }

    #[test]
    fn messages_carry_no_markup() {
        let catalog = Catalog::builtin().unwrap();
        let emily = catalog.get("employee:emily").unwrap();
        assert!(emily.message.contains("Total impact: $842,000/year."));
        assert!(catalog.get("impact").unwrap().message.contains("saved an estimated $2.3M in"));
        for entry in catalog.entities().iter().chain(catalog.entries()) {
            assert!(!entry.message.contains("**"), "markup in {}", entry.key);
        }
    }

    #[test]
    fn empty_trigger_is_rejected() {
        let mut entry = Catalog::builtin().unwrap().fallback().clone();
        entry.key = "broken".to_string();
        let fallback = entry.clone();
        let err = Catalog::new(Vec::new(), vec![entry], fallback).unwrap_err();
        assert!(matches!(err, Error::InvalidTrigger { ref entry, .. } if entry == "broken"));
    }

    #[test]
    fn bad_pattern_is_rejected() {
        let err = Trigger::pattern("oops", "(unclosed").unwrap_err();
        assert!(err.to_string().contains("oops"));
    }

    #[test]
    fn visualization_id_parses_kebab_case() {
        assert_eq!("flight-risk".parse::<VisualizationId>(), Ok(VisualizationId::FlightRisk));
        assert_eq!(" Org-Chart ".parse::<VisualizationId>(), Ok(VisualizationId::OrgChart));
        assert!("none".parse::<VisualizationId>().is_err());
        for id in VisualizationId::ALL {
            assert_eq!(id.as_str().parse::<VisualizationId>(), Ok(id));
        }
    }

    #[test]
    fn catalog_serializes_triggers_by_kind() {
        let catalog = Catalog::builtin().unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        let first = &json["entries"][0];
        assert_eq!(first["triggers"]["keywords"][0], "flight risk");
        assert_eq!(first["visualization"], "flight-risk");

        let help = json["entries"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["key"] == "help")
            .unwrap();
        assert!(help["triggers"]["pattern"].is_string());
    }

    #[test]
    fn fixtures_point_at_matchable_queries() {
        assert_eq!(PROACTIVE_INSIGHTS[0].query, "Tell me about Emily");
        assert!(YOUR_DAY_TASKS.iter().filter(|t| t.urgent).count() == 2);
        assert_eq!(PROMPT_CATEGORIES.len(), 3);
    }
}
