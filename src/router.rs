//! Path routing and navigation entries

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Record,
    Stats,
    Analysis,
    Settings,
    Login,
    Register,
    History,
    NotFound,
}

/// Entries of the bottom navigation bar, in display order
pub const NAV_ROUTES: [Route; 5] = [
    Route::Home,
    Route::Record,
    Route::Stats,
    Route::Analysis,
    Route::Settings,
];

impl Route {
    /// Resolve a path. Query strings, fragments and trailing slashes are
    /// ignored; unknown paths map to [`Route::NotFound`].
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_end_matches('/');

        match trimmed {
            "" => Route::Home,
            "/record" => Route::Record,
            "/stats" => Route::Stats,
            "/analysis" => Route::Analysis,
            "/settings" => Route::Settings,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/history" => Route::History,
            _ => Route::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Record => "/record",
            Route::Stats => "/stats",
            Route::Analysis => "/analysis",
            Route::Settings => "/settings",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::History => "/history",
            Route::NotFound => "/404",
        }
    }

    /// Header title
    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Gut Log",
            Route::Record => "New record",
            Route::Stats => "Statistics",
            Route::Analysis => "AI analysis",
            Route::Settings => "Settings",
            Route::Login => "Log in",
            Route::Register => "Create account",
            Route::History => "History",
            Route::NotFound => "Page not found",
        }
    }

    /// Short label used in the navigation bar
    pub fn nav_label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Record => "Record",
            Route::Stats => "Stats",
            Route::Analysis => "Analysis",
            Route::Settings => "Settings",
            other => other.title(),
        }
    }

    /// CLI subcommand that opens this page
    pub fn command(self) -> Option<&'static str> {
        match self {
            Route::Home => Some("home"),
            Route::Record => Some("record"),
            Route::Stats => Some("stats"),
            Route::Analysis => Some("analyze"),
            Route::Settings => Some("settings"),
            Route::Login => Some("login"),
            Route::Register => Some("register"),
            Route::History => Some("history"),
            Route::NotFound => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/stats"), Route::Stats);
        assert_eq!(Route::from_path("/stats/"), Route::Stats);
        assert_eq!(Route::from_path("/record?mode=timer"), Route::Record);
        assert_eq!(Route::from_path("/history#top"), Route::History);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::from_path("/stats/extra"), Route::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            Route::Home,
            Route::Record,
            Route::Stats,
            Route::Analysis,
            Route::Settings,
            Route::Login,
            Route::Register,
            Route::History,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_nav() {
        assert!(NAV_ROUTES.contains(&Route::Stats));
        assert!(!NAV_ROUTES.contains(&Route::Login));
        assert_eq!(
            NAV_ROUTES.map(Route::nav_label),
            ["Home", "Record", "Stats", "Analysis", "Settings"]
        );
    }
}
