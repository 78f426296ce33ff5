//! Route definitions and the dashboard's route table

use std::fmt;

/// Screens the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Signup,
    Teams,
    TeamDetail,
    UserActivity,
    Activity,
    ActivityView,
    Buckets,
    Bucket,
    Timeline,
    Trends,
    Report,
    QueryExplorer,
    Alerts,
    Timespiral,
    Settings,
    CategoryBuilder,
    Stopwatch,
    Search,
    Graph,
    Dev,
    NotFound,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Signup => "Signup",
            View::Teams => "Teams",
            View::TeamDetail => "Team detail",
            View::UserActivity => "User activity",
            View::Activity => "Activity",
            View::ActivityView => "Activity view",
            View::Buckets => "Buckets",
            View::Bucket => "Bucket",
            View::Timeline => "Timeline",
            View::Trends => "Trends",
            View::Report => "Report",
            View::QueryExplorer => "Query explorer",
            View::Alerts => "Alerts",
            View::Timespiral => "Timespiral",
            View::Settings => "Settings",
            View::CategoryBuilder => "Category builder",
            View::Stopwatch => "Stopwatch",
            View::Search => "Search",
            View::Graph => "Graph",
            View::Dev => "Dev",
            View::NotFound => "Not found",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a redirect route sends the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Absolute (`/login`) or relative to the parent route (`view/`). Params are re-filled.
    Path(&'static str),
    /// Stored landing page, falling back to `/login`.
    LandingPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    View(View),
    Redirect(Redirect),
}

/// Per-route display hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// View wants the whole terminal width (no side padding)
    pub full_container: bool,
    pub subview: Option<&'static str>,
}

impl RouteMeta {
    /// Child values win; unset child values inherit from the parent.
    pub fn merged_with(&self, child: &RouteMeta) -> RouteMeta {
        RouteMeta {
            full_container: self.full_container || child.full_container,
            subview: child.subview.or(self.subview),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteDef {
    pub path: &'static str,
    pub target: Target,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
    /// Params are passed to the view as inputs
    pub props: bool,
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    pub fn view(path: &'static str, view: View) -> Self {
        Self {
            path,
            target: Target::View(view),
            name: None,
            meta: RouteMeta::default(),
            props: false,
            children: Vec::new(),
        }
    }

    pub fn redirect(path: &'static str, to: Redirect) -> Self {
        Self {
            target: Target::Redirect(to),
            ..Self::view(path, View::NotFound)
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn full_container(mut self) -> Self {
        self.meta.full_container = true;
        self
    }

    pub fn subview(mut self, subview: &'static str) -> Self {
        self.meta.subview = Some(subview);
        self
    }

    pub fn props(mut self) -> Self {
        self.props = true;
        self
    }

    pub fn children(mut self, children: Vec<RouteDef>) -> Self {
        self.children = children;
        self
    }
}

/// The dashboard's routes. Order matters: the catch-all must stay last.
pub fn default_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::redirect("/", Redirect::LandingPage),
        RouteDef::view("/login", View::Login),
        RouteDef::view("/signup", View::Signup),
        RouteDef::view("/teams", View::Teams),
        RouteDef::view("/team/:id", View::TeamDetail),
        RouteDef::view("/user/:userId/:teamId", View::UserActivity).full_container(),
        RouteDef::view("/activity/:host/:periodLength?/:date?", View::Activity)
            .props()
            .children(vec![
                RouteDef::view("view/:view_id?", View::ActivityView)
                    .named("activity-view")
                    .subview("view")
                    .props(),
                // Matches after `view/` only because children are tried in order.
                RouteDef::redirect("", Redirect::Path("view/")),
            ]),
        RouteDef::view("/buckets", View::Buckets),
        RouteDef::view("/buckets/:id", View::Bucket).props(),
        RouteDef::view("/timeline", View::Timeline).full_container(),
        RouteDef::view("/trends", View::Trends).full_container(),
        RouteDef::view("/trends/:host", View::Trends).full_container(),
        RouteDef::view("/report", View::Report),
        RouteDef::view("/query", View::QueryExplorer),
        RouteDef::view("/alerts", View::Alerts),
        RouteDef::view("/timespiral", View::Timespiral),
        RouteDef::view("/settings", View::Settings),
        RouteDef::view("/settings/category-builder", View::CategoryBuilder),
        RouteDef::view("/stopwatch", View::Stopwatch),
        RouteDef::view("/search", View::Search),
        RouteDef::view("/graph", View::Graph),
        RouteDef::view("/dev", View::Dev),
        RouteDef::view("*", View::NotFound),
    ]
}
