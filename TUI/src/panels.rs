//! Built-in side-slot panels. All content is fixture data.

use crate::catalog::VisualizationId;
use crate::router::{Panel, PanelRow, PanelSection, PanelView, Tone};
use crate::tour::{ANCHOR_BREAKDOWN, ANCHOR_GOALS, ANCHOR_METRICS, ANCHOR_REVIEWS};

/// A panel whose view comes from a plain function.
struct FixturePanel {
    id: VisualizationId,
    wide: bool,
    build: fn() -> PanelView,
}

impl Panel for FixturePanel {
    fn id(&self) -> VisualizationId {
        self.id
    }

    fn view(&self) -> PanelView {
        (self.build)()
    }

    fn wide(&self) -> bool {
        self.wide
    }
}

fn fixture(id: VisualizationId, build: fn() -> PanelView) -> Box<dyn Panel> {
    Box::new(FixturePanel { id, wide: false, build })
}

pub fn builtin() -> Vec<Box<dyn Panel>> {
    use VisualizationId as V;

    vec![
        fixture(V::FlightRisk, flight_risk),
        fixture(V::OrgOverview, org_overview),
        // profile and directory share the people view
        fixture(V::EmployeeProfile, directory),
        fixture(V::PtoRequests, pto_requests),
        fixture(V::Metrics, metrics),
        fixture(V::TeamHealth, team_health),
        fixture(V::Directory, directory),
        fixture(V::OrgChart, org_chart),
        fixture(V::Analytics, analytics),
        fixture(V::Trends, analytics),
        fixture(V::Settings, settings),
        fixture(V::Help, help),
        Box::new(FixturePanel {
            id: V::Impact,
            wide: true,
            build: impact,
        }),
    ]
}

fn row(label: &str, value: &str, tone: Tone) -> PanelRow {
    PanelRow::new(label, value, tone)
}

fn health_tone(score: u8) -> Tone {
    match score {
        90..=u8::MAX => Tone::Good,
        80..=89 => Tone::Normal,
        _ => Tone::Watch,
    }
}

fn flight_risk() -> PanelView {
    let people = [
        ("Emily Kim", "Senior Software Engineer", 42, "$842K", "Slack response +45% · Commits down 30% · Calendar fragmentation ↑"),
        ("David Park", "Sales Director", 62, "$2.1M", "LinkedIn activity +300% · Quota at 78% · Declined 1:1s"),
        ("Alex Rivera", "Senior Software Engineer", 6, "$260K", "Stable work patterns · High engagement"),
    ];

    let sections = people
        .iter()
        .map(|(name, role, risk, impact, signals)| {
            let tone = if *risk >= 40 { Tone::Bad } else { Tone::Good };
            PanelSection::new(
                *name,
                vec![
                    row(role, "", Tone::Normal),
                    row("90-day risk", &format!("{}%", risk), tone),
                    row("Impact", impact, Tone::Accent),
                    PanelRow::note(*signals),
                ],
            )
        })
        .collect();

    PanelView {
        title: "Flight Risk Analysis",
        subtitle: "162 signals tracked per person",
        sections,
        action: Some("Schedule Retention Check-ins"),
    }
}

fn org_overview() -> PanelView {
    let departments: [(&str, u32, u8); 5] = [
        ("Engineering", 24, 89),
        ("Product", 8, 92),
        ("Design", 6, 85),
        ("Sales", 10, 78),
        ("Operations", 4, 95),
    ];

    PanelView {
        title: "Organization Overview",
        subtitle: "52 employees · health score 87",
        sections: vec![PanelSection::new(
            "Departments",
            departments
                .iter()
                .map(|(name, count, health)| {
                    row(&format!("{} ({})", name, count), &health.to_string(), health_tone(*health))
                })
                .collect(),
        )],
        action: None,
    }
}

fn pto_requests() -> PanelView {
    let requests = [
        ("Marcus Chen", "Dec 23-27", 5, "Vacation"),
        ("Alex Rivera", "Dec 24-26", 3, "Personal"),
        ("Jordan Taylor", "Jan 2-3", 2, "Sick"),
    ];

    PanelView {
        title: "PTO Requests",
        subtitle: "3 pending approval",
        sections: vec![PanelSection::new(
            "Pending",
            requests
                .iter()
                .map(|(name, dates, days, kind)| {
                    row(name, &format!("{} · {} days · {}", dates, days, kind), Tone::Normal)
                })
                .collect(),
        )],
        action: Some("Approve All"),
    }
}

fn metrics() -> PanelView {
    let metrics = [
        ("Satisfaction", "4.2/5", "+0.3", true),
        ("Avg. Tenure", "2.4 yrs", "+0.2", true),
        ("Turnover", "8.2%", "-1.5%", true),
        ("Time to Hire", "32 days", "+5", false),
        ("Training", "89%", "+12%", true),
        ("eNPS", "+42", "+8", true),
    ];

    PanelView {
        title: "Key Metrics",
        subtitle: "This quarter",
        sections: vec![PanelSection::new(
            "HR metrics",
            metrics
                .iter()
                .map(|(label, value, trend, positive)| {
                    let tone = if *positive { Tone::Good } else { Tone::Bad };
                    row(label, &format!("{} ({})", value, trend), tone)
                })
                .collect(),
        )],
        action: None,
    }
}

fn team_health() -> PanelView {
    let teams = [
        ("Platform Team", 92, 8, "Thriving"),
        ("Frontend Team", 87, 6, "Healthy"),
        ("Backend Team", 84, 7, "Healthy"),
        ("DevOps", 79, 3, "Watch"),
    ];

    PanelView {
        title: "Team Health",
        subtitle: "Org score 87 · up 5 points",
        sections: vec![PanelSection::new(
            "Teams",
            teams
                .iter()
                .map(|(name, score, members, status)| {
                    row(
                        &format!("{} · {} members", name, members),
                        &format!("{} {}", score, status),
                        health_tone(*score),
                    )
                })
                .collect(),
        )],
        action: None,
    }
}

fn directory() -> PanelView {
    let people = [
        ("Sebastian Kirsch", "Owner", "7d", 75),
        ("Gary Tan", "CEO", "5y", 92),
        ("Michael Seibel", "Managing Director", "8y", 89),
        ("Diana Hu", "COO", "4y", 87),
        ("Dalton Caldwell", "Managing Director", "10y", 94),
        ("Gustaf Alströmer", "Group Partner", "6y", 86),
        ("Harj Taggar", "Group Partner", "7y", 88),
        ("Jared Friedman", "Group Partner", "9y", 91),
    ];

    PanelView {
        title: "Directory",
        subtitle: "People · Teams · Org Chart",
        sections: vec![PanelSection::new(
            "People",
            people
                .iter()
                .map(|(name, role, tenure, ppi)| {
                    row(&format!("{} · {}", name, role), &format!("PPI {} · {}", ppi, tenure), health_tone(*ppi))
                })
                .collect(),
        )],
        action: Some("Ask Mamba"),
    }
}

fn org_chart() -> PanelView {
    PanelView {
        title: "Org Chart",
        subtitle: "Reporting structure",
        sections: vec![
            PanelSection::new("CEO", vec![row("Gary Tan", "", Tone::Accent)]),
            PanelSection::new(
                "Direct reports",
                vec![
                    row("Mike Kim", "CTO", Tone::Normal),
                    row("Sara Lee", "CPO", Tone::Normal),
                    row("Tom Ross", "COO", Tone::Normal),
                ],
            ),
        ],
        action: None,
    }
}

fn analytics() -> PanelView {
    let headcount = [40, 42, 44, 45, 48, 50, 52];
    let chart = headcount
        .iter()
        .map(|v| match v {
            0..=41 => '▃',
            42..=45 => '▄',
            46..=49 => '▆',
            _ => '█',
        })
        .collect::<String>();

    PanelView {
        title: "Workforce Analytics",
        subtitle: "Last 6 months",
        sections: vec![
            PanelSection::new(
                "Headcount",
                vec![row(&chart, "Jun → Dec", Tone::Accent), row("Growth", "+12% YoY", Tone::Good)],
            ),
            PanelSection::new(
                "Key insights",
                vec![
                    row("Attrition", "declining", Tone::Good),
                    row("Engineering hiring", "ahead of plan", Tone::Good),
                    row("Sales ramp time", "up 2 weeks", Tone::Watch),
                ],
            ),
        ],
        action: None,
    }
}

fn settings() -> PanelView {
    PanelView {
        title: "Settings",
        subtitle: "Account and workspace",
        sections: vec![PanelSection::new(
            "Preferences",
            vec![
                row("Notifications", "Email and push alerts", Tone::Normal),
                row("Security", "2FA and passwords", Tone::Normal),
                row("Integrations", "Slack, Calendar, HRIS", Tone::Normal),
                row("Team Permissions", "Roles and access", Tone::Normal),
            ],
        )],
        action: None,
    }
}

fn help() -> PanelView {
    PanelView {
        title: "What Mamba can do",
        subtitle: "Just ask naturally",
        sections: vec![PanelSection::new(
            "Capabilities",
            vec![
                row("Find people", "\"Who works in Engineering?\"", Tone::Normal),
                row("Manage time off", "\"Show pending PTO\"", Tone::Normal),
                row("Identify risks", "\"Who is at flight risk?\"", Tone::Normal),
                row("Track metrics", "\"Show me turnover rate\"", Tone::Normal),
                row("Monitor health", "\"How is team morale?\"", Tone::Normal),
                row("Get insights", "\"What should I focus on?\"", Tone::Normal),
            ],
        )],
        action: None,
    }
}

/// Emily Kim's impact analysis. Its sections carry the tour anchors.
fn impact() -> PanelView {
    PanelView {
        title: "Emily Kim · Impact Analysis",
        subtitle: "Senior Software Engineer · Engineering · 2.5 yrs",
        sections: vec![
            PanelSection::new(
                "Overview",
                vec![
                    row("Total Value", "$842K (+15%)", Tone::Accent),
                    row("Rank", "Top 5%", Tone::Good),
                    row("Productivity", "92", Tone::Good),
                    row("Flight Risk", "42% · medium", Tone::Watch),
                ],
            )
            .anchored(ANCHOR_METRICS),
            PanelSection::new(
                "Value breakdown",
                vec![
                    row("Revenue Generated", "$285K · direct attribution", Tone::Good),
                    row("Cost Savings", "$137K · process optimization", Tone::Accent),
                    row("Team Multiplier", "2.4x · lifts team output", Tone::Normal),
                    row("Replacement Cost", "$292K · estimated", Tone::Bad),
                ],
            )
            .anchored(ANCHOR_BREAKDOWN),
            PanelSection::new(
                "Performance reviews",
                vec![
                    row("2025 Annual", "4.8", Tone::Good),
                    PanelRow::note("Top performer. Architected the real-time pipeline processing 10M events/day."),
                    row("Q2 2025", "4.5", Tone::Good),
                    PanelRow::note("40% infrastructure cost reduction exceeded targets."),
                ],
            )
            .anchored(ANCHOR_REVIEWS),
            PanelSection::new(
                "Goals",
                vec![
                    row("Scale event pipeline to 50M events/day", "65%", Tone::Normal),
                    row("Reduce p99 latency to <50ms", "60%", Tone::Normal),
                    row("Implement partition sharding", "80%", Tone::Normal),
                    row("40% infrastructure cost reduction", "done", Tone::Good),
                ],
            )
            .anchored(ANCHOR_GOALS),
        ],
        action: Some("Schedule 1:1"),
    }
}
