use vitrine_domain::{ROLE_MANAGEMENT_MENU_KEY, path_is_within};

/// Login page.
pub const LOGIN_PATH: &str = "/login";

/// Page every authenticated role may see; denied page requests land here.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Every page below this prefix is administrative.
pub const ADMINISTRATION_PATH_PREFIX: &str = "/administrator";

/// Menu key guarding administrative pages that match no node.
pub(super) const ADMINISTRATION_ROOT_KEY: &str = "administrator";

const PUBLIC_PATHS: &[&str] = &[
    LOGIN_PATH,
    "/api/login",
    "/api/logout",
    "/health",
    "/favicon.ico",
];

const PUBLIC_PREFIXES: &[&str] = &["/static", "/assets"];

/// API prefixes that address a menu resource.
const API_RESOURCES: &[(&str, &str)] = &[
    ("/api/roles", ROLE_MANAGEMENT_MENU_KEY),
    ("/api/role-permissions", ROLE_MANAGEMENT_MENU_KEY),
    ("/api/menu-items", ROLE_MANAGEMENT_MENU_KEY),
];

pub(super) fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES
            .iter()
            .any(|prefix| path_is_within(path, prefix))
}

pub(super) fn api_resource(path: &str) -> Option<&'static str> {
    API_RESOURCES
        .iter()
        .find(|(prefix, _)| path_is_within(path, prefix))
        .map(|(_, key)| *key)
}

/// Returns `candidate` when it is safe to redirect to after login.
///
/// Only same-site console pages qualify: absolute paths that are neither
/// public nor API routes and cannot be read as a scheme-relative URL.
#[must_use]
pub fn safe_return_path(candidate: &str) -> Option<&str> {
    let acceptable = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control)
        && !is_public(candidate)
        && !path_is_within(candidate, "/api");

    acceptable.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::{api_resource, is_public, safe_return_path};

    #[test]
    fn allowlist_covers_login_health_and_assets() {
        assert!(is_public("/login"));
        assert!(is_public("/api/login"));
        assert!(is_public("/api/logout"));
        assert!(is_public("/health"));
        assert!(is_public("/static/app.css"));
        assert!(!is_public("/staticky"));
        assert!(!is_public("/dashboard"));
        assert!(!is_public("/api/me"));
    }

    #[test]
    fn administration_apis_map_to_role_management() {
        assert_eq!(api_resource("/api/roles"), Some("role_management"));
        assert_eq!(api_resource("/api/roles/42"), Some("role_management"));
        assert_eq!(api_resource("/api/menu-items"), Some("role_management"));
        assert_eq!(api_resource("/api/permissions"), None);
        assert_eq!(api_resource("/api/rolesx"), None);
    }

    #[test]
    fn return_path_rejects_open_redirects() {
        assert_eq!(
            safe_return_path("/administrator/roles"),
            Some("/administrator/roles")
        );
        assert_eq!(safe_return_path("//evil.example"), None);
        assert_eq!(safe_return_path("https://evil.example"), None);
        assert_eq!(safe_return_path("/login"), None);
        assert_eq!(safe_return_path("/api/roles"), None);
    }
}
