//! Navigation seam between the session core and whatever hosts the views.
//!
//! The core never renders anything; it only asks the host to move the user
//! to a view, open the OAuth provider, or rewrite the visible location.

use url::Url;

/// Application views the core can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login entry point
    Login,
    /// Main (inbox) view
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

pub trait Navigator: Send + Sync {
    /// Move the user to an application view.
    fn navigate(&self, route: Route);

    /// Leave the application for an external page (the OAuth provider).
    fn open_external(&self, url: &Url);

    /// Replace the visible location without adding a history entry.
    fn replace_location(&self, url: &Url);
}

/// Navigator for hosts without views (background tasks, scripts).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
    fn open_external(&self, _url: &Url) {}
    fn replace_location(&self, _url: &Url) {}
}

/// Navigator that records every request, for tests and host diagnostics.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: std::sync::Mutex<Vec<NavigationEvent>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Navigate(Route),
    OpenExternal(Url),
    ReplaceLocation(Url),
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Last route passed to `navigate`, if any
    pub fn last_route(&self) -> Option<Route> {
        self.events().into_iter().rev().find_map(|e| match e {
            NavigationEvent::Navigate(route) => Some(route),
            _ => None,
        })
    }

    /// Last location passed to `replace_location`, if any
    pub fn last_location(&self) -> Option<Url> {
        self.events().into_iter().rev().find_map(|e| match e {
            NavigationEvent::ReplaceLocation(url) => Some(url),
            _ => None,
        })
    }

    fn push(&self, event: NavigationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.push(NavigationEvent::Navigate(route));
    }

    fn open_external(&self, url: &Url) {
        self.push(NavigationEvent::OpenExternal(url.clone()));
    }

    fn replace_location(&self, url: &Url) {
        self.push(NavigationEvent::ReplaceLocation(url.clone()));
    }
}
