use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::models::{Role, Session};

/// Session file lives under the user's config directory and is only ever
/// written whole (login) or removed (logout).
pub fn default_store_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME must be set to locate the session file")?;
    Ok(PathBuf::from(home).join(".config").join("report-console"))
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: &Path) -> Self {
        SessionStore {
            path: dir.join("session.json"),
        }
    }

    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt session file at {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn login(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Returns whether a session was actually cleared.
    pub fn logout(&self) -> anyhow::Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Reports,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Reports => "/reports",
            Route::Admin => "/admin",
        }
    }
}

/// Pure guard decision from the current session snapshot. Unauthenticated
/// users land on login from any protected route; the admin route requires
/// the admin role; authenticated users are steered away from login.
pub fn resolve(requested: Route, session: Option<&Session>) -> Route {
    let Some(session) = session else {
        return Route::Login;
    };
    match requested {
        Route::Login => Route::Reports,
        Route::Reports => Route::Reports,
        Route::Admin if session.role == Role::Admin => Route::Admin,
        Route::Admin => Route::Reports,
    }
}

/// Where a fresh login lands.
pub fn landing_route(role: Role) -> Route {
    if role == Role::Admin {
        Route::Admin
    } else {
        Route::Reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            token: "tok-123".to_string(),
            role,
            email: "avery@example.com".to_string(),
        }
    }

    #[test]
    fn unauthenticated_protected_routes_resolve_to_login() {
        assert_eq!(resolve(Route::Reports, None), Route::Login);
        assert_eq!(resolve(Route::Admin, None), Route::Login);
        assert_eq!(resolve(Route::Login, None), Route::Login);
    }

    #[test]
    fn non_admin_roles_never_reach_admin() {
        for role in [Role::Viewer, Role::Reviewer] {
            assert_eq!(resolve(Route::Admin, Some(&session(role))), Route::Reports);
        }
        assert_eq!(
            resolve(Route::Admin, Some(&session(Role::Admin))),
            Route::Admin
        );
    }

    #[test]
    fn authenticated_users_leave_the_login_route() {
        for role in [Role::Viewer, Role::Reviewer, Role::Admin] {
            assert_eq!(resolve(Route::Login, Some(&session(role))), Route::Reports);
        }
    }

    #[test]
    fn login_lands_by_role() {
        assert_eq!(landing_route(Role::Admin), Route::Admin);
        assert_eq!(landing_route(Role::Viewer), Route::Reports);
        assert_eq!(landing_route(Role::Reviewer), Route::Reports);
    }

    #[test]
    fn store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load().unwrap().is_none());

        store.login(&session(Role::Reviewer)).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.role, Role::Reviewer);
        assert_eq!(loaded.email, "avery@example.com");

        assert!(store.logout().unwrap());
        assert!(store.load().unwrap().is_none());
        assert!(!store.logout().unwrap());
    }

    #[test]
    fn logout_then_protected_route_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.login(&session(Role::Viewer)).unwrap();
        store.logout().unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(resolve(Route::Reports, snapshot.as_ref()), Route::Login);
    }
}
