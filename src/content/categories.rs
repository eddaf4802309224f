//! Blog category table.
//!
//! The one place categories are defined. Listing filters, post previews,
//! category counts and the feed all read from `CATEGORIES`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub slug: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        slug: "automation",
        label: "Automation",
        color: "cyan",
        description: "Building reliable automation systems that scale",
    },
    Category {
        slug: "revenue-operations",
        label: "Revenue Operations",
        color: "blue",
        description: "Optimizing the revenue engine from lead to close",
    },
    Category {
        slug: "ai-tools",
        label: "AI Tools",
        color: "violet",
        description: "Leveraging AI for operational efficiency",
    },
    Category {
        slug: "strategy",
        label: "Strategy",
        color: "amber",
        description: "Strategic frameworks for growth operations",
    },
    Category {
        slug: "case-studies",
        label: "Case Studies",
        color: "emerald",
        description: "Deep dives into real implementations",
    },
    Category {
        slug: "tutorials",
        label: "Tutorials",
        color: "rose",
        description: "Step-by-step guides and how-tos",
    },
    Category {
        slug: "industry-insights",
        label: "Industry Insights",
        color: "slate",
        description: "Trends and analysis in RevOps and MarTech",
    },
];

/// Shown for a post whose category slug is not in the table.
pub const FALLBACK_CATEGORY: Category = Category {
    slug: "",
    label: "Article",
    color: "blue",
    description: "",
};

/// Look up a category by slug.
pub fn category_info(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

/// Category for display, falling back to `FALLBACK_CATEGORY` for unknown slugs.
pub fn category_or_default(slug: &str) -> &'static Category {
    category_info(slug).unwrap_or(&FALLBACK_CATEGORY)
}
