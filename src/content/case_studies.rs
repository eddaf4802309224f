//! Portfolio case studies a post can point at via `relatedCaseStudy`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub key: &'static str,
    pub title: &'static str,
    pub metric: &'static str,
    pub metric_label: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

pub const CASE_STUDIES: &[CaseStudy] = &[
    CaseStudy {
        key: "watch-tower",
        title: "Watch Tower: Revenue Operations Monitoring",
        metric: "85%",
        metric_label: "fewer automation failures",
        description: "How I built a monitoring system that reduced automation failures from 15% to under 2% for a company running 50+ daily workflows.",
        href: "/portfolio/watch-tower",
    },
    CaseStudy {
        key: "sms-agent",
        title: "AI-Powered SMS Leasing Agent",
        metric: "$24K",
        metric_label: "annual cost eliminated",
        description: "How I replaced a $2K/month VA with an AI agent that responds instantly, 24/7, and books tours automatically.",
        href: "/portfolio/sms-agent",
    },
    CaseStudy {
        key: "attribution-system",
        title: "Closed-Loop Attribution System",
        metric: "48%",
        metric_label: "MQL→SQL conversion",
        description: "How I built attribution infrastructure that nearly doubled conversion rates and attributed $2.1M in revenue.",
        href: "/portfolio/attribution-system",
    },
    CaseStudy {
        key: "linkedin-outbound",
        title: "LinkedIn Outbound Engine",
        metric: "87%",
        metric_label: "faster response time",
        description: "How I built a centralized outbound system with SLA monitoring that transformed SDR productivity and pipeline generation.",
        href: "/portfolio/linkedin-outbound",
    },
    CaseStudy {
        key: "sales-forecasting",
        title: "Sales Forecasting Rebuild",
        metric: "±9%",
        metric_label: "forecast accuracy",
        description: "How I transformed forecasting from ±32% variance to ±9%, enabling a successful Series B raise.",
        href: "/portfolio/sales-forecasting",
    },
    CaseStudy {
        key: "full-funnel-ads",
        title: "Full-Funnel Ads System",
        metric: "4.8x",
        metric_label: "ROAS achieved",
        description: "How I built an integrated acquisition system that drove $3.8M/month in investment commitments.",
        href: "/portfolio/full-funnel-ads",
    },
    CaseStudy {
        key: "kpi-command-center",
        title: "KPI Command Center",
        metric: "91%",
        metric_label: "reporting time saved",
        description: "How I built a unified BI platform that eliminated 20+ hours/week of manual reporting.",
        href: "/portfolio/kpi-command-center",
    },
    CaseStudy {
        key: "database-validation",
        title: "Database Validation & Audit",
        metric: "91%",
        metric_label: "duplicate reduction",
        description: "How I built data quality infrastructure that restored trust in CRM data and eliminated embarrassing outreach mistakes.",
        href: "/portfolio/database-validation",
    },
    CaseStudy {
        key: "lead-lifecycle",
        title: "Lead Lifecycle Autopilot",
        metric: "58%",
        metric_label: "faster onboarding",
        description: "How I standardized the lead lifecycle and SOPs to dramatically reduce new hire ramp time.",
        href: "/portfolio/lead-lifecycle",
    },
    CaseStudy {
        key: "gtm-integration",
        title: "GTM Stack Integration",
        metric: "99%",
        metric_label: "data consistency",
        description: "How I unified 5 siloed systems into a single source of truth, ending the weekly data wars.",
        href: "/portfolio/gtm-integration",
    },
];

pub fn case_study(key: &str) -> Option<&'static CaseStudy> {
    CASE_STUDIES.iter().find(|c| c.key == key)
}
