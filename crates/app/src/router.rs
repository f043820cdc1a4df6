//! Routes, their page metadata, and the navigation seam.

use parking_lot::Mutex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Feed,
    Login,
    Signup,
    Profile,
    Connections,
    Requests,
    Premium,
}

/// Title and description for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: &'static str,
    pub description: &'static str,
}

/// Used for the feed and for any path without its own entry
pub const DEFAULT_META: RouteMeta = RouteMeta {
    title: "DevFinder — Connect with developers",
    description: "Swipe to discover and connect with developers. Find your next collaborator, mentor, or co-founder.",
};

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Feed,
        Route::Login,
        Route::Signup,
        Route::Profile,
        Route::Connections,
        Route::Requests,
        Route::Premium,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Feed => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Profile => "/profile",
            Route::Connections => "/connections",
            Route::Requests => "/requests",
            Route::Premium => "/premium",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn meta(self) -> RouteMeta {
        match self {
            Route::Feed => DEFAULT_META,
            Route::Login => RouteMeta {
                title: "Log in — DevFinder",
                description: "Log in to DevFinder to discover and connect with developers.",
            },
            Route::Signup => RouteMeta {
                title: "Sign up — DevFinder",
                description: "Create your DevFinder account and start connecting with developers.",
            },
            Route::Profile => RouteMeta {
                title: "Profile — DevFinder",
                description: "View and manage your DevFinder profile.",
            },
            Route::Connections => RouteMeta {
                title: "Connections — DevFinder",
                description: "View your DevFinder connections.",
            },
            Route::Requests => RouteMeta {
                title: "Connection requests — DevFinder",
                description: "Manage your DevFinder connection requests.",
            },
            Route::Premium => RouteMeta {
                title: "Premium — DevFinder",
                description: "Upgrade to DevFinder Premium for more features.",
            },
        }
    }

    /// Login and signup render without the navigation shell
    pub fn is_auth_route(self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }

    pub fn shows_app_shell(self) -> bool {
        !self.is_auth_route()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Metadata for an arbitrary path, falling back to the defaults
pub fn meta_for_path(path: &str) -> RouteMeta {
    Route::from_path(path).map(Route::meta).unwrap_or(DEFAULT_META)
}

/// Canonical address of `route` under `site_url`; `None` without a site.
pub fn canonical_url(site_url: Option<&str>, route: Route) -> Option<String> {
    let base = site_url?.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(match route {
        Route::Feed => base.to_string(),
        other => format!("{base}{}", other.path()),
    })
}

/// Moves the user to another page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that remembers every navigation.
#[derive(Debug, Default)]
pub struct NavigationLog {
    visited: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent destination
    pub fn current(&self) -> Option<Route> {
        self.visited.lock().last().copied()
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited.lock().clone()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        self.visited.lock().push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_meta_for_known_and_unknown_paths() {
        assert_eq!(meta_for_path("/login").title, "Log in — DevFinder");
        assert_eq!(
            meta_for_path("/requests").description,
            "Manage your DevFinder connection requests."
        );
        assert_eq!(meta_for_path("/settings"), DEFAULT_META);
        assert_eq!(Route::Feed.meta(), DEFAULT_META);
    }

    #[test]
    fn test_auth_routes_hide_shell() {
        assert!(!Route::Login.shows_app_shell());
        assert!(!Route::Signup.shows_app_shell());
        assert!(Route::Feed.shows_app_shell());
        assert!(Route::Premium.shows_app_shell());
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(
            canonical_url(Some("https://devfinder.dev/"), Route::Feed).as_deref(),
            Some("https://devfinder.dev")
        );
        assert_eq!(
            canonical_url(Some("https://devfinder.dev"), Route::Profile).as_deref(),
            Some("https://devfinder.dev/profile")
        );
        assert_eq!(canonical_url(None, Route::Profile), None);
        assert_eq!(canonical_url(Some(""), Route::Profile), None);
    }

    #[test]
    fn test_navigation_log() {
        let log = NavigationLog::new();
        assert_eq!(log.current(), None);
        log.navigate(Route::Login);
        log.navigate(Route::Feed);
        assert_eq!(log.current(), Some(Route::Feed));
        assert_eq!(log.visited(), vec![Route::Login, Route::Feed]);
    }
}
