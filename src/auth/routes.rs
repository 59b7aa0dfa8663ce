//! Route classification: the single source of truth for which paths are
//! public, protected, or auth-only.
//!
//! Protected and auth-only entries match the exact path or any subpath
//! (`/profile` matches `/profile` and `/profile/edit`, not `/profiles`).
//! Exclusions are plain prefixes and are consulted before classification.

use anyhow::{bail, Result};

/// Classification of a request path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteClass {
    /// No session requirement either way.
    Public,
    /// Requires a valid session.
    Protected,
    /// Login/signup/password-reset pages; senseless with a session.
    AuthOnly,
}

/// Static table of path predicates driving the route guard.
#[derive(Clone, Debug)]
pub struct RoutePolicy {
    protected: Vec<String>,
    auth_only: Vec<String>,
    excluded: Vec<String>,
}

impl RoutePolicy {
    /// Build a policy, rejecting tables where a path could be classified
    /// into more than one set.
    ///
    /// # Errors
    ///
    /// Returns an error if any protected entry and auth-only entry overlap.
    pub fn new(
        protected: Vec<String>,
        auth_only: Vec<String>,
        excluded: Vec<String>,
    ) -> Result<Self> {
        for prefix in &protected {
            for other in &auth_only {
                if prefix == other
                    || prefix.starts_with(&format!("{other}/"))
                    || other.starts_with(&format!("{prefix}/"))
                {
                    bail!("ambiguous route classification: {prefix} overlaps {other}");
                }
            }
        }

        Ok(Self {
            protected,
            auth_only,
            excluded,
        })
    }

    /// The gateway's route table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is ambiguous; the default entries are
    /// disjoint, so this only fires after an inconsistent edit.
    pub fn defaults() -> Result<Self> {
        Self::new(
            [
                "/profile",
                "/itinerary",
                "/settings",
                "/business/my-business",
                "/business/register",
                "/business/edit",
                "/blog/create",
                "/blog/edit",
                "/blog/my-posts",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            [
                "/login",
                "/signup",
                "/forgot-password",
                "/reset-password",
                "/verify-code",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            [
                "/api/auth",
                "/auth/error",
                "/health",
                "/swagger-ui",
                "/api-docs",
                "/favicon.ico",
                "/images",
                "/assets",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    /// Paths the guard must pass through untouched.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.iter().any(|prefix| path.starts_with(prefix))
    }

    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.iter().any(|route| matches_route(route, path)) {
            RouteClass::Protected
        } else if self.auth_only.iter().any(|route| matches_route(route, path)) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Public
        }
    }
}

fn matches_route(route: &str, path: &str) -> bool {
    path == route || path.starts_with(&format!("{route}/"))
}
