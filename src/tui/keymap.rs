//! Global key bindings.
//!
//! `App::handle_key` dispatches through [`BINDINGS`] and the help popup lists
//! the same table, so the two cannot drift apart.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    GoTo,
    Back,
    Teams,
    Buckets,
    Down,
    Up,
    Top,
    Bottom,
    Open,
    NewTeam,
    Reload,
    Logout,
    ToggleLog,
    Help,
    Quit,
}

/// Heading a binding is listed under in the help popup
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Navigation,
    Lists,
    Actions,
    Misc,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Navigation,
        Section::Lists,
        Section::Actions,
        Section::Misc,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Navigation => "NAVIGATION",
            Section::Lists => "LISTS",
            Section::Actions => "ACTIONS",
            Section::Misc => "MISC",
        }
    }
}

pub struct Binding {
    /// Any of these codes triggers the action
    pub codes: &'static [KeyCode],
    pub ctrl: bool,
    /// How the key is written in the help popup
    pub label: &'static str,
    pub action: Action,
    pub section: Section,
    pub desc: &'static str,
}

pub const BINDINGS: &[Binding] = &[
    Binding {
        codes: &[KeyCode::Char(':')],
        ctrl: false,
        label: ":",
        action: Action::GoTo,
        section: Section::Navigation,
        desc: "Go to a path (/teams, /buckets/...)",
    },
    Binding {
        codes: &[KeyCode::Esc, KeyCode::Backspace],
        ctrl: false,
        label: "Esc",
        action: Action::Back,
        section: Section::Navigation,
        desc: "Back (closes the log first)",
    },
    Binding {
        codes: &[KeyCode::Char('t')],
        ctrl: false,
        label: "t",
        action: Action::Teams,
        section: Section::Navigation,
        desc: "Teams",
    },
    Binding {
        codes: &[KeyCode::Char('b')],
        ctrl: false,
        label: "b",
        action: Action::Buckets,
        section: Section::Navigation,
        desc: "Buckets",
    },
    Binding {
        codes: &[KeyCode::Char('j'), KeyCode::Down],
        ctrl: false,
        label: "j / Down",
        action: Action::Down,
        section: Section::Lists,
        desc: "Next row",
    },
    Binding {
        codes: &[KeyCode::Char('k'), KeyCode::Up],
        ctrl: false,
        label: "k / Up",
        action: Action::Up,
        section: Section::Lists,
        desc: "Previous row",
    },
    Binding {
        codes: &[KeyCode::Char('g'), KeyCode::Home],
        ctrl: false,
        label: "g",
        action: Action::Top,
        section: Section::Lists,
        desc: "First row",
    },
    Binding {
        codes: &[KeyCode::Char('G'), KeyCode::End],
        ctrl: false,
        label: "G",
        action: Action::Bottom,
        section: Section::Lists,
        desc: "Last row",
    },
    Binding {
        codes: &[KeyCode::Enter],
        ctrl: false,
        label: "Enter",
        action: Action::Open,
        section: Section::Lists,
        desc: "Open selected team or bucket",
    },
    Binding {
        codes: &[KeyCode::Char('n')],
        ctrl: false,
        label: "n",
        action: Action::NewTeam,
        section: Section::Actions,
        desc: "New team (teams view)",
    },
    Binding {
        codes: &[KeyCode::Char('r')],
        ctrl: false,
        label: "r",
        action: Action::Reload,
        section: Section::Actions,
        desc: "Reload current view",
    },
    Binding {
        codes: &[KeyCode::Char('L')],
        ctrl: false,
        label: "L",
        action: Action::Logout,
        section: Section::Actions,
        desc: "Log out",
    },
    Binding {
        codes: &[KeyCode::Char('d')],
        ctrl: true,
        label: "Ctrl+D",
        action: Action::ToggleLog,
        section: Section::Misc,
        desc: "Toggle log",
    },
    Binding {
        codes: &[KeyCode::Char('?')],
        ctrl: false,
        label: "?",
        action: Action::Help,
        section: Section::Misc,
        desc: "This help",
    },
    Binding {
        codes: &[KeyCode::Char('q')],
        ctrl: false,
        label: "q",
        action: Action::Quit,
        section: Section::Misc,
        desc: "Quit",
    },
];

/// Action bound to `key`, ignoring Shift.
pub fn lookup(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    BINDINGS
        .iter()
        .find(|b| b.ctrl == ctrl && b.codes.contains(&key.code))
        .map(|b| b.action)
}

/// Bindings listed under `section`, in table order.
pub fn in_section(section: Section) -> impl Iterator<Item = &'static Binding> {
    BINDINGS.iter().filter(move |b| b.section == section)
}
