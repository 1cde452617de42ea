// ── Route gate ──
//
// Pure mapping from (session, requested route) to what a front end should
// show. No caching: callers re-run `gate` on every navigation and every
// session change.

use strum::IntoEnumIterator;

use crate::model::User;
use crate::session::SessionState;

/// Every view the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Route {
    Root,
    Login,
    Dashboard,
    Products,
    Suppliers,
    InventoryLogs,
    Reports,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Products => "/products",
            Self::Suppliers => "/suppliers",
            Self::InventoryLogs => "/inventory-logs",
            Self::Reports => "/reports",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "Home",
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Suppliers => "Suppliers",
            Self::InventoryLogs => "Inventory Logs",
            Self::Reports => "Reports",
        }
    }

    /// Exact path match (a trailing slash is tolerated).
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Self::iter().find(|r| r.path() == normalized)
    }

    pub fn requires_admin(self) -> bool {
        matches!(self, Self::Reports)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// What the gate decided for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still restoring: show a placeholder, route nothing yet.
    Loading,
    Render(Route),
    Redirect(Route),
}

/// Decide what to show for `requested` given the current session.
pub fn gate(session: &SessionState, requested: Route) -> GateDecision {
    match session {
        SessionState::Restoring => GateDecision::Loading,
        SessionState::Anonymous => match requested {
            Route::Login => GateDecision::Render(Route::Login),
            _ => GateDecision::Redirect(Route::Login),
        },
        SessionState::Authenticated(user) => match requested {
            Route::Login | Route::Root => GateDecision::Redirect(Route::Dashboard),
            r if r.requires_admin() && !user.role.can_view_reports() => {
                GateDecision::Redirect(Route::Dashboard)
            }
            r => GateDecision::Render(r),
        },
    }
}

/// Follow redirects to the view that ends up on screen. `None` while loading.
pub fn landing(session: &SessionState, requested: Route) -> Option<Route> {
    let mut route = requested;
    // Every redirect target renders, so two hops is the most a chain needs.
    for _ in 0..3 {
        match gate(session, route) {
            GateDecision::Loading => return None,
            GateDecision::Render(r) => return Some(r),
            GateDecision::Redirect(r) => route = r,
        }
    }
    Some(route)
}

/// Navigation entries visible to `user`. Reports only for admins.
pub fn navigation(user: &User) -> Vec<Route> {
    [
        Route::Dashboard,
        Route::Products,
        Route::Suppliers,
        Route::InventoryLogs,
        Route::Reports,
    ]
    .into_iter()
    .filter(|r| !r.requires_admin() || user.role.can_view_reports())
    .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Role;

    fn authed(role: Role) -> SessionState {
        SessionState::Authenticated(User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role,
        })
    }

    #[test]
    fn restoring_is_always_loading() {
        for route in Route::iter() {
            assert_eq!(gate(&SessionState::Restoring, route), GateDecision::Loading);
        }
        assert_eq!(landing(&SessionState::Restoring, Route::Products), None);
    }

    #[test]
    fn anonymous_only_reaches_login() {
        let anon = SessionState::Anonymous;
        assert_eq!(gate(&anon, Route::Login), GateDecision::Render(Route::Login));
        for route in Route::iter().filter(|r| *r != Route::Login) {
            assert_eq!(gate(&anon, route), GateDecision::Redirect(Route::Login));
        }
    }

    #[test]
    fn authenticated_login_and_root_go_to_dashboard() {
        let staff = authed(Role::Staff);
        assert_eq!(gate(&staff, Route::Login), GateDecision::Redirect(Route::Dashboard));
        assert_eq!(gate(&staff, Route::Root), GateDecision::Redirect(Route::Dashboard));
        assert_eq!(gate(&staff, Route::Products), GateDecision::Render(Route::Products));
    }

    #[test]
    fn reports_are_admin_only() {
        assert_eq!(
            gate(&authed(Role::Staff), Route::Reports),
            GateDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            gate(&authed(Role::Admin), Route::Reports),
            GateDecision::Render(Route::Reports)
        );
    }

    #[test]
    fn landing_follows_redirects() {
        assert_eq!(landing(&SessionState::Anonymous, Route::Reports), Some(Route::Login));
        assert_eq!(landing(&authed(Role::Staff), Route::Reports), Some(Route::Dashboard));
        assert_eq!(landing(&authed(Role::Admin), Route::Root), Some(Route::Dashboard));
    }

    #[test]
    fn paths_parse() {
        assert_eq!(Route::from_path("/inventory-logs"), Some(Route::InventoryLogs));
        assert_eq!(Route::from_path("/reports/"), Some(Route::Reports));
        assert_eq!(Route::from_path("/"), Some(Route::Root));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn staff_navigation_hides_reports() {
        let SessionState::Authenticated(staff) = authed(Role::Staff) else {
            unreachable!()
        };
        assert!(!navigation(&staff).contains(&Route::Reports));
        let SessionState::Authenticated(admin) = authed(Role::Admin) else {
            unreachable!()
        };
        assert_eq!(navigation(&admin).len(), 5);
    }
}
