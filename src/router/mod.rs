//! Navigation: path resolution, redirects, history and the navigation guard

mod matcher;
mod table;

use std::collections::BTreeMap;

use thiserror::Error;

pub use table::{default_routes, Redirect, RouteDef, RouteMeta, Target, View};

use matcher::{fill_params, match_path, parse_pattern, resolve_relative, split_path, Segment};

/// Redirect chains longer than this are treated as loops.
const MAX_REDIRECTS: usize = 8;

/// Where `/` goes when no landing page is stored.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NoMatch(String),
    #[error("redirect loop while resolving '{0}'")]
    RedirectLoop(String),
    #[error("missing parameter '{param}' for '{pattern}'")]
    MissingParam { param: String, pattern: String },
    #[error("navigation to '{0}' was aborted")]
    Aborted(String),
}

/// Outcome of a resolved navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Concrete path after redirects
    pub path: String,
    pub query: Option<String>,
    pub view: View,
    /// Enclosing view for nested routes (e.g. Activity around ActivityView)
    pub parent: Option<View>,
    pub name: Option<&'static str>,
    pub params: BTreeMap<String, String>,
    pub meta: RouteMeta,
    pub props: bool,
    /// Path originally requested when a redirect was followed
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parse a numeric param such as `:id`.
    pub fn param_i32(&self, name: &str) -> Option<i32> {
        self.param(name).and_then(|v| v.parse().ok())
    }
}

/// Decision returned by a navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Redirect(String),
    Abort,
}

/// Runs before every navigation with the target and the current route.
pub type Guard = Box<dyn FnMut(&ResolvedRoute, Option<&ResolvedRoute>) -> GuardDecision + Send>;

/// Source for the landing page used by the `/` redirect.
pub type LandingPageSource = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// A flattened route: full pattern plus inherited context.
struct Record {
    full_path: String,
    pattern: Vec<Segment>,
    parent_path: Option<String>,
    parent_view: Option<View>,
    target: Target,
    name: Option<&'static str>,
    meta: RouteMeta,
    props: bool,
}

pub struct Router {
    records: Vec<Record>,
    landing_page: LandingPageSource,
    guard: Guard,
    history: Vec<ResolvedRoute>,
}

impl Router {
    pub fn new(routes: Vec<RouteDef>, landing_page: LandingPageSource) -> Self {
        let mut records = Vec::new();
        flatten(&routes, None, &mut records);
        Self {
            records,
            landing_page,
            guard: Box::new(pass_through),
            history: Vec::new(),
        }
    }

    /// Router over the dashboard's route table.
    pub fn with_default_routes(landing_page: LandingPageSource) -> Self {
        Self::new(default_routes(), landing_page)
    }

    /// Replace the navigation guard.
    pub fn before_each(&mut self, guard: Guard) {
        self.guard = guard;
    }

    /// Resolve a path to a view without navigating.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedRoute, RouteError> {
        let (path, query) = split_query(raw);
        let requested = normalize(path);
        let mut current = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let segments: Vec<&str> = split_path(&current).collect();
            let (record, params) = self
                .records
                .iter()
                .find_map(|r| match_path(&r.pattern, &segments).map(|p| (r, p)))
                .ok_or_else(|| RouteError::NoMatch(current.clone()))?;

            match &record.target {
                Target::View(view) => {
                    return Ok(ResolvedRoute {
                        redirected_from: (current != requested).then(|| requested.clone()),
                        path: current,
                        query: query.map(str::to_string),
                        view: *view,
                        parent: record.parent_view,
                        name: record.name,
                        params: params.into_iter().collect(),
                        meta: record.meta.clone(),
                        props: record.props,
                    });
                }
                Target::Redirect(redirect) => {
                    let target = match redirect {
                        Redirect::LandingPage => (self.landing_page)()
                            .map(|p| normalize(&p))
                            .filter(|p| p != "/")
                            .unwrap_or_else(|| LOGIN_PATH.to_string()),
                        Redirect::Path(to) => {
                            resolve_relative(to, record.parent_path.as_deref())
                        }
                    };
                    let next = normalize(&fill_params(&target, &params)?);
                    tracing::debug!("Redirect {} -> {} (via {})", current, next, record.full_path);
                    current = next;
                }
            }
        }

        Err(RouteError::RedirectLoop(requested))
    }

    /// Navigate to `path`, consulting the guard first.
    pub fn push(&mut self, path: &str) -> Result<&ResolvedRoute, RouteError> {
        let mut target = self.resolve(path)?;

        for _ in 0..=MAX_REDIRECTS {
            match (self.guard)(&target, self.history.last()) {
                GuardDecision::Continue => {
                    tracing::debug!("Navigate to {} ({})", target.path, target.view);
                    self.history.push(target);
                    return Ok(self.current_unchecked());
                }
                GuardDecision::Redirect(next) => {
                    tracing::debug!("Guard redirected {} -> {}", target.path, next);
                    target = self.resolve(&next)?;
                }
                GuardDecision::Abort => return Err(RouteError::Aborted(target.path)),
            }
        }

        Err(RouteError::RedirectLoop(path.to_string()))
    }

    /// Navigate without adding a history entry.
    pub fn replace(&mut self, path: &str) -> Result<&ResolvedRoute, RouteError> {
        let previous = self.history.pop();
        if let Err(e) = self.push(path).map(|_| ()) {
            self.history.extend(previous);
            return Err(e);
        }
        Ok(self.current_unchecked())
    }

    /// Go back one entry. The first entry is never popped.
    pub fn back(&mut self) -> Option<&ResolvedRoute> {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.history.last()
    }

    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.history.last()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    fn current_unchecked(&self) -> &ResolvedRoute {
        &self.history[self.history.len() - 1]
    }

    /// Flattened table for display: (full path, description), in match order.
    pub fn routes(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| {
                let desc = match &r.target {
                    Target::View(view) => view.to_string(),
                    Target::Redirect(Redirect::LandingPage) => {
                        format!("-> landing page or {}", LOGIN_PATH)
                    }
                    Target::Redirect(Redirect::Path(to)) => format!(
                        "-> {}",
                        resolve_relative(to, r.parent_path.as_deref())
                    ),
                };
                (r.full_path.clone(), desc)
            })
            .collect()
    }
}

/// Default guard: every navigation proceeds.
fn pass_through(_to: &ResolvedRoute, _from: Option<&ResolvedRoute>) -> GuardDecision {
    GuardDecision::Continue
}

/// Children are registered before their parent so nested routes win.
fn flatten(defs: &[RouteDef], parent: Option<(&str, View, &RouteMeta)>, out: &mut Vec<Record>) {
    for def in defs {
        let full_path = match parent {
            Some((base, _, _)) if !def.path.starts_with('/') => {
                if def.path.is_empty() {
                    base.to_string()
                } else {
                    format!("{}/{}", base.trim_end_matches('/'), def.path)
                }
            }
            _ => def.path.to_string(),
        };
        let meta = match parent {
            Some((_, _, parent_meta)) => parent_meta.merged_with(&def.meta),
            None => def.meta.clone(),
        };

        if !def.children.is_empty() {
            let view = match def.target {
                Target::View(v) => v,
                Target::Redirect(_) => View::NotFound,
            };
            flatten(&def.children, Some((full_path.as_str(), view, &meta)), out);
        }

        out.push(Record {
            pattern: parse_pattern(&full_path),
            parent_path: parent.map(|(base, _, _)| base.to_string()),
            parent_view: parent.map(|(_, view, _)| view),
            full_path,
            target: def.target.clone(),
            name: def.name,
            meta,
            props: def.props,
        });
    }
}

fn split_query(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.split('#').next().unwrap_or_default();
    match raw.split_once('?') {
        Some((path, query)) => (path, (!query.is_empty()).then_some(query)),
        None => (raw, None),
    }
}

/// Leading slash, no trailing slash, no empty segments.
fn normalize(path: &str) -> String {
    let joined: Vec<&str> = split_path(path).collect();
    format!("/{}", joined.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn router() -> Router {
        Router::with_default_routes(Box::new(|| None))
    }

    #[test]
    fn test_root_redirects_to_login_without_landing_page() {
        let route = router().resolve("/").unwrap();
        assert_eq!(route.view, View::Login);
        assert_eq!(route.path, "/login");
        assert_eq!(route.redirected_from.as_deref(), Some("/"));
    }

    #[test]
    fn test_root_redirects_to_landing_page() {
        let r = Router::with_default_routes(Box::new(|| Some("/timeline".to_string())));
        let route = r.resolve("/").unwrap();
        assert_eq!(route.view, View::Timeline);
        assert!(route.meta.full_container);
    }

    #[test]
    fn test_landing_page_pointing_at_root_falls_back() {
        let r = Router::with_default_routes(Box::new(|| Some("/".to_string())));
        assert_eq!(r.resolve("/").unwrap().view, View::Login);
    }

    #[test]
    fn test_team_detail_params() {
        let route = router().resolve("/team/12").unwrap();
        assert_eq!(route.view, View::TeamDetail);
        assert_eq!(route.param_i32("id"), Some(12));
        assert_eq!(route.redirected_from, None);
    }

    #[test]
    fn test_user_activity_is_full_container() {
        let route = router().resolve("/user/5/2").unwrap();
        assert_eq!(route.view, View::UserActivity);
        assert_eq!(route.param("userId"), Some("5"));
        assert_eq!(route.param("teamId"), Some("2"));
        assert!(route.meta.full_container);
    }

    #[test]
    fn test_activity_without_subview_redirects_to_view() {
        let route = router().resolve("/activity/laptop/day/2024-03-01").unwrap();
        assert_eq!(route.view, View::ActivityView);
        assert_eq!(route.parent, Some(View::Activity));
        assert_eq!(route.path, "/activity/laptop/day/2024-03-01/view");
        assert_eq!(route.name, Some("activity-view"));
        assert_eq!(route.meta.subview, Some("view"));
        assert_eq!(route.param("date"), Some("2024-03-01"));
    }

    #[test]
    fn test_redirect_keeps_encoded_slash_in_param() {
        let route = router().resolve("/activity/my%2Fhost").unwrap();
        assert_eq!(route.view, View::ActivityView);
        assert_eq!(route.path, "/activity/my%2Fhost/view");
        assert_eq!(route.param("host"), Some("my/host"));
        assert_eq!(route.param("periodLength"), None);
    }

    #[test]
    fn test_activity_view_with_id() {
        let route = router().resolve("/activity/laptop/view/summary").unwrap();
        assert_eq!(route.view, View::ActivityView);
        assert_eq!(route.param("host"), Some("laptop"));
        assert_eq!(route.param("view_id"), Some("summary"));
        assert_eq!(route.param("periodLength"), None);
    }

    #[test]
    fn test_trends_with_and_without_host() {
        let r = router();
        assert_eq!(r.resolve("/trends").unwrap().param("host"), None);
        assert_eq!(r.resolve("/trends/laptop").unwrap().param("host"), Some("laptop"));
    }

    #[test]
    fn test_nested_settings_route() {
        let route = router().resolve("/settings/category-builder").unwrap();
        assert_eq!(route.view, View::CategoryBuilder);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let route = router().resolve("/does/not/exist?x=1").unwrap();
        assert_eq!(route.view, View::NotFound);
        assert_eq!(route.query.as_deref(), Some("x=1"));
        assert_eq!(route.param("pathMatch"), Some("does/not/exist"));
    }

    #[test]
    fn test_redirect_loop_detected() {
        let routes = vec![
            RouteDef::redirect("/a", Redirect::Path("/b")),
            RouteDef::redirect("/b", Redirect::Path("/a")),
        ];
        let r = Router::new(routes, Box::new(|| None));
        assert_eq!(
            r.resolve("/a").unwrap_err(),
            RouteError::RedirectLoop("/a".to_string())
        );
    }

    #[test]
    fn test_table_without_catch_all_reports_no_match() {
        let r = Router::new(vec![RouteDef::view("/teams", View::Teams)], Box::new(|| None));
        assert!(matches!(r.resolve("/nope"), Err(RouteError::NoMatch(_))));
    }

    #[test]
    fn test_push_and_back() {
        let mut r = router();
        assert!(r.current().is_none());
        r.push("/teams").unwrap();
        r.push("/team/3").unwrap();
        assert_eq!(r.depth(), 2);
        assert_eq!(r.back().unwrap().view, View::Teams);
        assert_eq!(r.back().unwrap().view, View::Teams);
        assert_eq!(r.depth(), 1);
    }

    #[test]
    fn test_replace_keeps_depth() {
        let mut r = router();
        r.push("/teams").unwrap();
        r.replace("/buckets").unwrap();
        assert_eq!(r.depth(), 1);
        assert_eq!(r.current().unwrap().view, View::Buckets);
    }

    #[test]
    fn test_guard_sees_from_and_to() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut r = router();
        r.before_each(Box::new(move |to: &ResolvedRoute, from: Option<&ResolvedRoute>| {
            log.lock()
                .unwrap()
                .push((to.path.clone(), from.map(|f| f.path.clone())));
            GuardDecision::Continue
        }));
        r.push("/teams").unwrap();
        r.push("/buckets").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], ("/teams".to_string(), None));
        assert_eq!(seen[1], ("/buckets".to_string(), Some("/teams".to_string())));
    }

    #[test]
    fn test_guard_redirect_and_abort() {
        let mut r = router();
        r.before_each(Box::new(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| match to.view {
            View::Teams => GuardDecision::Redirect("/login".to_string()),
            View::Dev => GuardDecision::Abort,
            _ => GuardDecision::Continue,
        }));
        assert_eq!(r.push("/teams").unwrap().view, View::Login);
        assert_eq!(
            r.push("/dev").unwrap_err(),
            RouteError::Aborted("/dev".to_string())
        );
        assert_eq!(r.depth(), 1);
    }

    #[test]
    fn test_routes_listing_order() {
        let listing = router().routes();
        let paths: Vec<&str> = listing.iter().map(|(p, _)| p.as_str()).collect();
        let child = paths
            .iter()
            .position(|p| *p == "/activity/:host/:periodLength?/:date?/view/:view_id?")
            .unwrap();
        let parent = paths
            .iter()
            .rposition(|p| *p == "/activity/:host/:periodLength?/:date?")
            .unwrap();
        assert!(child < parent);
        assert_eq!(paths.last(), Some(&"*"));
    }
}
