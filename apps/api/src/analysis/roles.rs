use serde::Serialize;

/// Selector value meaning "use the free-text custom role".
pub const CUSTOM_ROLE: &str = "Custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredefinedRole {
    pub id: &'static str,
    pub title: &'static str,
}

pub const PREDEFINED_ROLES: &[PredefinedRole] = &[
    PredefinedRole { id: "swe", title: "Software Engineer" },
    PredefinedRole { id: "frontend", title: "Frontend Developer" },
    PredefinedRole { id: "backend", title: "Backend Developer" },
    PredefinedRole { id: "fullstack", title: "Full Stack Developer" },
    PredefinedRole { id: "data-scientist", title: "Data Scientist" },
    PredefinedRole { id: "ml-engineer", title: "Machine Learning Engineer" },
    PredefinedRole { id: "devops", title: "DevOps Engineer" },
    PredefinedRole { id: "product-manager", title: "Product Manager" },
    PredefinedRole { id: "ux-designer", title: "UI/UX Designer" },
];

/// Role a fresh session starts with.
pub fn default_role() -> &'static str {
    PREDEFINED_ROLES[0].title
}

/// A non-blank custom role always wins over the selector.
pub fn resolve_target_role(selected: &str, custom: &str) -> String {
    let custom = custom.trim();
    if custom.is_empty() {
        selected.trim().to_string()
    } else {
        custom.to_string()
    }
}
