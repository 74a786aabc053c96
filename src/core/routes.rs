//! Client route paths

pub const HOME: &str = "/";
pub const DASHBOARD: &str = "/dashboard";

pub const OBWB_PREFIX: &str = "/dashboard/Obwb";
pub const EMAILS: &str = "/dashboard/Obwb/emails";
pub const CONVERSATIONS: &str = "/dashboard/Obwb/conversations";
pub const AI_DIGEST: &str = "/dashboard/Obwb/ai-digest";
pub const FOLLOW_UPS: &str = "/dashboard/Obwb/follow-ups";
pub const CONNECT_EMAIL: &str = "/dashboard/Obwb/connect-email";
pub const ACCESS_RESULT: &str = "/dashboard/Obwb/access_result";

pub const OPTICAL_PREFIX: &str = "/dashboard/Optical";
pub const BRANCH_PERFORMANCE: &str = "/dashboard/Optical/branch-performance";
pub const CUSTOMER_METRICS: &str = "/dashboard/Optical/customer-metrics";
pub const STAFF_PERFORMANCE: &str = "/dashboard/Optical/staff-performance";
pub const INVENTORY: &str = "/dashboard/Optical/inventory";

pub fn email(id: impl std::fmt::Display) -> String {
    format!("{}/{}", EMAILS, id)
}

pub fn conversation(id: &str) -> String {
    format!("{}/{}", CONVERSATIONS, urlencoding::encode(id))
}

/// `path` followed by the encoded query string, or `path` alone when `pairs` is empty.
pub fn with_query(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

/// A titled sidebar group, shown only with access to `service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSection {
    pub title: &'static str,
    pub service: Option<&'static str>,
    pub items: &'static [NavItem],
}

pub const NAVIGATION: [NavSection; 3] = [
    NavSection {
        title: "Overview",
        service: None,
        items: &[NavItem {
            label: "Dashboard",
            path: DASHBOARD,
            icon: "home",
        }],
    },
    NavSection {
        title: "Email",
        service: Some("obwb"),
        items: &[
            NavItem { label: "Emails", path: EMAILS, icon: "mail" },
            NavItem { label: "Conversations", path: CONVERSATIONS, icon: "messages" },
            NavItem { label: "AI Digest", path: AI_DIGEST, icon: "sparkles" },
            NavItem { label: "Follow-ups", path: FOLLOW_UPS, icon: "flag" },
            NavItem { label: "Connect Email", path: CONNECT_EMAIL, icon: "link" },
        ],
    },
    NavSection {
        title: "Optical",
        service: Some("optical"),
        items: &[
            NavItem { label: "Branch Performance", path: BRANCH_PERFORMANCE, icon: "building" },
            NavItem { label: "Customer Metrics", path: CUSTOMER_METRICS, icon: "users" },
            NavItem { label: "Staff Performance", path: STAFF_PERFORMANCE, icon: "award" },
            NavItem { label: "Inventory", path: INVENTORY, icon: "package" },
        ],
    },
];

/// Whether the sidebar should highlight `item_path` for `current`.
pub fn is_active(item_path: &str, current: &str) -> bool {
    if item_path == DASHBOARD {
        return current == DASHBOARD;
    }
    current == item_path || current.starts_with(&format!("{}/", item_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_paths() {
        assert_eq!(email(42), "/dashboard/Obwb/emails/42");
        assert_eq!(conversation("AAQk/x="), "/dashboard/Obwb/conversations/AAQk%2Fx%3D");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query(EMAILS, &[]), EMAILS);
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("search_text".to_string(), "a&b c".to_string()),
        ];
        assert_eq!(
            with_query(EMAILS, &pairs),
            "/dashboard/Obwb/emails?page=2&search_text=a%26b%20c"
        );
    }

    #[test]
    fn test_is_active() {
        assert!(is_active(DASHBOARD, "/dashboard"));
        assert!(!is_active(DASHBOARD, "/dashboard/Obwb/emails"));
        assert!(is_active(EMAILS, "/dashboard/Obwb/emails/7"));
        assert!(!is_active(EMAILS, "/dashboard/Obwb/emails-archive"));
    }

    #[test]
    fn test_sections_match_prefixes() {
        for section in NAVIGATION.iter().filter(|s| s.service.is_some()) {
            for item in section.items {
                let prefix = if section.service == Some("obwb") { OBWB_PREFIX } else { OPTICAL_PREFIX };
                assert!(item.path.starts_with(prefix), "{}", item.path);
            }
        }
    }
}
