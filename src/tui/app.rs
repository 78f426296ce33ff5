//! TUI application state and main event loop

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;

use super::backend::{Backend, BackendCommand, BackendResponse};
use super::input::TextInput;
use super::keymap::{self, Action};
use super::log_capture::LogTail;
use super::ui;
use crate::dashboard::Dashboard;
use crate::models::{Bucket, Event as AwEvent, NewTeam, Team, TeamDetail};
use crate::router::{ResolvedRoute, View};
use crate::store::SessionState;

/// Redraw interval so the log line stays current without input (~4 fps)
const TICK_MS: u64 = 250;

/// Field focused in the login form
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// What the bottom prompt is collecting
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromptKind {
    Path,
    NewTeam,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Path => ":",
            PromptKind::NewTeam => "New team:",
        }
    }
}

pub struct Prompt {
    pub kind: PromptKind,
    pub input: TextInput,
}

/// Application state
pub struct App {
    pub should_exit: bool,
    pub route: Option<ResolvedRoute>,
    pub session: SessionState,
    pub teams: Vec<Team>,
    pub team: Option<TeamDetail>,
    /// Buckets sorted by id
    pub buckets: Vec<(String, Bucket)>,
    pub events: Vec<AwEvent>,
    /// Index into the list shown by the current view
    pub selected: usize,
    pub loading: bool,
    pub email: TextInput,
    pub password: TextInput,
    pub login_field: LoginField,
    pub prompt: Option<Prompt>,
    pub show_help: bool,
    pub show_log: bool,
    /// Message from the global store; empty when cleared
    pub message: String,
    /// Local error (failed navigation or load)
    pub error: Option<String>,
    pub log: LogTail,
}

impl App {
    pub fn new(log: LogTail) -> Self {
        Self {
            should_exit: false,
            route: None,
            session: SessionState::default(),
            teams: Vec::new(),
            team: None,
            buckets: Vec::new(),
            events: Vec::new(),
            selected: 0,
            loading: false,
            email: TextInput::default(),
            password: TextInput::masked(),
            login_field: LoginField::Email,
            prompt: None,
            show_help: false,
            show_log: false,
            message: String::new(),
            error: None,
            log,
        }
    }

    pub fn view(&self) -> Option<View> {
        self.route.as_ref().map(|r| r.view)
    }

    /// Number of rows in the list shown by the current view.
    pub fn list_len(&self) -> usize {
        match self.view() {
            Some(View::Teams) => self.teams.len(),
            Some(View::TeamDetail) => self.team.as_ref().map_or(0, |t| t.members.len()),
            Some(View::Buckets) => self.buckets.len(),
            Some(View::Bucket) => self.events.len(),
            _ => 0,
        }
    }

    /// Handle a key press; returns a command for the backend if one is needed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<BackendCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return None;
        }

        if self.show_help {
            self.show_help = false;
            return None;
        }

        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        // With a session restored, `/login` is only a page you were sent to,
        // so the global keys work there too.
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if self.view() == Some(View::Login) && !self.session.is_logged_in && !ctrl {
            return self.handle_login_key(key);
        }

        match keymap::lookup(&key)? {
            Action::Quit => {
                self.should_exit = true;
                None
            }
            Action::Help => {
                self.show_help = true;
                None
            }
            Action::ToggleLog => {
                self.show_log = !self.show_log;
                None
            }
            Action::Back if self.show_log => {
                self.show_log = false;
                None
            }
            Action::Back => Some(BackendCommand::Back),
            Action::GoTo => {
                self.open_prompt(PromptKind::Path);
                None
            }
            Action::NewTeam => {
                if self.view() == Some(View::Teams) {
                    self.open_prompt(PromptKind::NewTeam);
                }
                None
            }
            Action::Teams => Some(BackendCommand::Navigate("/teams".into())),
            Action::Buckets => Some(BackendCommand::Navigate("/buckets".into())),
            Action::Logout => Some(BackendCommand::Logout),
            Action::Reload => {
                self.error = None;
                self.route.as_ref().and_then(load_for)
            }
            Action::Down => {
                self.move_selection(1);
                None
            }
            Action::Up => {
                self.move_selection(-1);
                None
            }
            Action::Top => {
                self.selected = 0;
                None
            }
            Action::Bottom => {
                self.selected = self.list_len().saturating_sub(1);
                None
            }
            Action::Open => self.open_selected(),
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: TextInput::default(),
        });
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<BackendCommand> {
        let prompt = self.prompt.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                None
            }
            KeyCode::Enter => {
                let kind = prompt.kind;
                let value = prompt.input.take();
                self.prompt = None;
                let value = value?;
                match kind {
                    PromptKind::Path => Some(BackendCommand::Navigate(value)),
                    PromptKind::NewTeam => Some(BackendCommand::AddTeam(NewTeam {
                        name: value,
                        description: String::new(),
                    })),
                }
            }
            code => {
                edit_input(&mut prompt.input, code);
                None
            }
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<BackendCommand> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_field = match self.login_field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
                None
            }
            KeyCode::Enter if self.login_field == LoginField::Email => {
                self.login_field = LoginField::Password;
                None
            }
            KeyCode::Enter => {
                let email = self.email.value.trim().to_string();
                if email.is_empty() || self.password.value.is_empty() {
                    self.error = Some("Email and password are required".into());
                    return None;
                }
                let password = std::mem::take(&mut self.password.value);
                self.password.clear();
                self.error = None;
                self.loading = true;
                Some(BackendCommand::Login { email, password })
            }
            KeyCode::Esc => {
                self.should_exit = true;
                None
            }
            code => {
                let input = match self.login_field {
                    LoginField::Email => &mut self.email,
                    LoginField::Password => &mut self.password,
                };
                edit_input(input, code);
                None
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn open_selected(&self) -> Option<BackendCommand> {
        match self.view()? {
            View::Teams => {
                let team = self.teams.get(self.selected)?;
                Some(BackendCommand::Navigate(format!("/team/{}", team.id)))
            }
            View::Buckets => {
                let (id, _) = self.buckets.get(self.selected)?;
                Some(BackendCommand::Navigate(format!("/buckets/{}", id)))
            }
            _ => None,
        }
    }

    /// Apply a backend response; may ask for follow-up data.
    pub fn apply(&mut self, resp: BackendResponse) -> Option<BackendCommand> {
        match resp {
            BackendResponse::Route(Ok(route)) => {
                tracing::debug!("Showing {} ({})", route.view, route.path);
                self.selected = 0;
                self.error = None;
                let load = load_for(&route);
                self.loading = load.is_some();
                self.route = Some(route);
                load
            }
            BackendResponse::Route(Err(e)) => {
                self.error = Some(e);
                None
            }
            BackendResponse::Session(session) => {
                self.loading = false;
                self.session = session;
                None
            }
            BackendResponse::Teams(result) => {
                self.loading = false;
                match result {
                    Ok(teams) => self.teams = teams,
                    Err(e) => self.error = Some(e),
                }
                self.clamp_selection();
                None
            }
            BackendResponse::Team(result) => {
                self.loading = false;
                match result {
                    Ok(team) => self.team = Some(team),
                    Err(e) => {
                        self.team = None;
                        self.error = Some(e);
                    }
                }
                self.clamp_selection();
                None
            }
            BackendResponse::Buckets(result) => {
                self.loading = false;
                match result {
                    Ok(map) => {
                        let mut buckets: Vec<_> = map.into_iter().collect();
                        buckets.sort_by(|a, b| a.0.cmp(&b.0));
                        self.buckets = buckets;
                    }
                    Err(e) => self.error = Some(e),
                }
                self.clamp_selection();
                None
            }
            BackendResponse::Events { bucket_id, result } => {
                let current = self.route.as_ref().and_then(|r| r.param("id"));
                if current != Some(bucket_id.as_str()) {
                    tracing::debug!("Dropping stale events for {}", bucket_id);
                    return None;
                }
                self.loading = false;
                match result {
                    Ok(events) => self.events = events,
                    Err(e) => {
                        self.events.clear();
                        self.error = Some(e);
                    }
                }
                self.clamp_selection();
                None
            }
            BackendResponse::Message(message) => {
                if !message.is_empty() {
                    self.loading = false;
                }
                self.message = message;
                None
            }
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.list_len().saturating_sub(1));
    }
}

/// Data a route needs before it can be shown.
fn load_for(route: &ResolvedRoute) -> Option<BackendCommand> {
    match route.view {
        View::Teams => Some(BackendCommand::LoadTeams),
        View::TeamDetail => route.param_i32("id").map(BackendCommand::LoadTeam),
        View::Buckets => Some(BackendCommand::LoadBuckets),
        View::Bucket => route
            .param("id")
            .map(|id| BackendCommand::LoadEvents(id.to_string())),
        _ => None,
    }
}

fn edit_input(input: &mut TextInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

/// Run the dashboard TUI, starting at `start_path`.
///
/// `ratatui::init` installs a panic hook that restores the terminal, so a
/// panic inside the loop still leaves the shell usable.
pub async fn run(dashboard: Dashboard, log: LogTail, start_path: &str) -> Result<()> {
    let mut backend = Backend::start(dashboard);
    backend.send(BackendCommand::Navigate(start_path.to_string()));

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut backend, App::new(log)).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, backend: &mut Backend, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));

    while !app.should_exit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(cmd) = app.handle_key(key) {
                        backend.send(cmd);
                    }
                }
                // Resize and the rest: redrawn on the next pass.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            resp = backend.recv() => match resp {
                Some(resp) => {
                    if let Some(cmd) = app.apply(resp) {
                        backend.send(cmd);
                    }
                }
                None => {
                    tracing::error!("Backend stopped");
                    app.should_exit = true;
                }
            },
            _ = tick.tick() => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn route(path: &str) -> ResolvedRoute {
        Router::with_default_routes(Box::new(|| None))
            .resolve(path)
            .unwrap()
    }

    fn team(id: i32, name: &str) -> Team {
        Team {
            id,
            name: name.into(),
            description: String::new(),
            owner_id: 7,
            count: None,
        }
    }

    #[test]
    fn test_route_change_requests_data() {
        let mut app = App::new(LogTail::new());
        let cmd = app.apply(BackendResponse::Route(Ok(route("/team/12"))));
        assert!(matches!(cmd, Some(BackendCommand::LoadTeam(12))));
        assert!(app.loading);

        let cmd = app.apply(BackendResponse::Route(Ok(route("/settings"))));
        assert!(cmd.is_none());
        assert!(!app.loading);
    }

    #[test]
    fn test_enter_opens_selected_team() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/teams"))));
        app.apply(BackendResponse::Teams(Ok(vec![team(1, "Core"), team(5, "Ops")])));

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected, 1);

        let cmd = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(cmd, Some(BackendCommand::Navigate(p)) if p == "/team/5"));
    }

    #[test]
    fn test_login_form_submits_and_clears_password() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/login"))));

        for c in "quinn@example.org".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        // `q` is text here, not quit.
        assert!(!app.should_exit);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.login_field, LoginField::Password);
        for c in "pw".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        let cmd = app.handle_key(key(KeyCode::Enter));
        match cmd {
            Some(BackendCommand::Login { email, password }) => {
                assert_eq!(email, "quinn@example.org");
                assert_eq!(password, "pw");
            }
            _ => panic!("expected login command"),
        }
        assert!(app.password.value.is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/login"))));
        app.login_field = LoginField::Password;
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());
        assert!(app.error.is_some());
    }

    #[test]
    fn test_path_prompt_navigates() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/buckets"))));
        app.handle_key(key(KeyCode::Char(':')));
        for c in "/timeline".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let cmd = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(cmd, Some(BackendCommand::Navigate(p)) if p == "/timeline"));
        assert!(app.prompt.is_none());
    }

    #[test]
    fn test_stale_events_dropped() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/buckets/aw-watcher-afk_host"))));
        app.apply(BackendResponse::Events {
            bucket_id: "other".into(),
            result: Err("boom".into()),
        });
        assert!(app.error.is_none());
        assert!(app.loading);
    }

    #[test]
    fn test_global_message_shown_and_cleared() {
        let mut app = App::new(LogTail::new());
        app.loading = true;
        app.apply(BackendResponse::Message("No user with this password found".into()));
        assert!(!app.loading);
        assert_eq!(app.message, "No user with this password found");
        app.apply(BackendResponse::Message(String::new()));
        assert!(app.message.is_empty());
    }

    #[test]
    fn test_global_keys_work_on_login_page_when_logged_in() {
        let mut app = App::new(LogTail::new());
        app.session.is_logged_in = true;
        app.apply(BackendResponse::Route(Ok(route("/login"))));

        let cmd = app.handle_key(key(KeyCode::Char('t')));
        assert!(matches!(cmd, Some(BackendCommand::Navigate(p)) if p == "/teams"));

        app.handle_key(key(KeyCode::Char(':')));
        assert!(app.prompt.is_some());
        app.handle_key(key(KeyCode::Esc));

        app.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(app.show_log);
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);

        assert!(app.email.value.is_empty());
        assert!(!app.should_exit);
    }

    #[test]
    fn test_log_toggles_from_login_form() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/login"))));
        app.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(app.show_log);
        assert!(app.email.value.is_empty());
    }

    #[test]
    fn test_new_team_prompt_only_on_teams_view() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/buckets"))));
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.prompt.is_none());

        app.apply(BackendResponse::Route(Ok(route("/teams"))));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.prompt.as_ref().map(|p| p.kind), Some(PromptKind::NewTeam));
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = App::new(LogTail::new());
        app.apply(BackendResponse::Route(Ok(route("/teams"))));
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        assert!(app.handle_key(key(KeyCode::Char('q'))).is_none());
        assert!(!app.show_help);
        assert!(!app.should_exit);
    }
}
