// ABOUTME: In-memory CommandChannel that behaves like a single platform space.
// ABOUTME: Records every command and supports scripted failures and responses.

use async_trait::async_trait;
use blue_green::channel::{ChannelError, CommandChannel};
use blue_green::types::{Route, SpaceGuid};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Space GUID the fake reports as targeted.
pub const SCOPE: &str = "4";

/// One interaction with the fake, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `run_command`: output shown to the operator.
    Echoed(Vec<String>),
    /// `run_command_quietly`: output captured.
    Quiet(Vec<String>),
    /// `get_application_details` for the named application.
    Details(String),
}

struct Failure {
    verb: String,
    target: Option<String>,
    message: String,
    exit_code: Option<i32>,
}

#[derive(Default)]
struct State {
    apps: BTreeMap<String, Vec<Route>>,
    stopped: BTreeSet<String>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    quiet_responses: VecDeque<Vec<String>>,
    page_size: Option<usize>,
}

/// A platform space holding applications and their routes.
///
/// Commands mutate the in-memory space the way the real platform would, so
/// tests can assert on both the command sequence and the resulting state.
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an application with its routes.
    pub fn with_app(self, name: &str, routes: Vec<Route>) -> Self {
        self.state.lock().apps.insert(name.to_string(), routes);
        self
    }

    /// Seed an application that exists but is not running.
    pub fn with_stopped_app(self, name: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.apps.insert(name.to_string(), Vec::new());
            state.stopped.insert(name.to_string());
        }
        self
    }

    pub fn is_running(&self, name: &str) -> bool {
        let state = self.state.lock();
        state.apps.contains_key(name) && !state.stopped.contains(name)
    }

    /// Serve the space listing in pages of `size` applications.
    pub fn with_page_size(self, size: usize) -> Self {
        self.state.lock().page_size = Some(size);
        self
    }

    /// Fail commands whose first word is `verb`, optionally only when the
    /// second word is `target`. Use `"app"` to fail application detail lookups.
    pub fn fail_on(&self, verb: &str, target: Option<&str>, message: &str) {
        self.state.lock().failures.push(Failure {
            verb: verb.to_string(),
            target: target.map(str::to_string),
            message: message.to_string(),
            exit_code: None,
        });
    }

    /// Like `fail_on`, but report the failure the way a CLI process does:
    /// an exit code plus the last line of output.
    pub fn exit_on(&self, verb: &str, target: Option<&str>, code: i32, message: &str) {
        self.state.lock().failures.push(Failure {
            verb: verb.to_string(),
            target: target.map(str::to_string),
            message: message.to_string(),
            exit_code: Some(code),
        });
    }

    /// Answer the next quiet command with these lines instead of the space state.
    pub fn respond_quietly(&self, lines: &[&str]) {
        self.state
            .lock()
            .quiet_responses
            .push_back(lines.iter().map(|l| l.to_string()).collect());
    }

    /// Application names currently in the space, sorted.
    pub fn apps(&self) -> Vec<String> {
        self.state.lock().apps.keys().cloned().collect()
    }

    pub fn routes_of(&self, name: &str) -> Option<Vec<Route>> {
        self.state.lock().apps.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Echoed commands only, in order.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Echoed(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    /// Quiet commands only, in order.
    pub fn queries(&self) -> Vec<Vec<String>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Quiet(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    /// Echoed commands that change the space.
    pub fn mutations(&self) -> Vec<Vec<String>> {
        self.commands()
            .into_iter()
            .filter(|args| args.first().is_some_and(|verb| verb != "apps"))
            .collect()
    }

    fn check_failure(state: &State, args: &[String]) -> Result<(), ChannelError> {
        let verb = args.first().map(String::as_str).unwrap_or_default();
        let target = args.get(1).map(String::as_str);

        match state.failures.iter().find(|failure| {
            failure.verb == verb && failure.target.as_deref().is_none_or(|t| Some(t) == target)
        }) {
            Some(Failure {
                exit_code: Some(code),
                message,
                ..
            }) => Err(ChannelError::CommandFailed {
                command: format!("cf {}", args.join(" ")),
                code: *code,
                message: message.clone(),
            }),
            Some(failure) => Err(ChannelError::rejected(failure.message.clone())),
            None => Ok(()),
        }
    }

    fn apply(state: &mut State, args: &[String]) -> Result<(), ChannelError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();

        match args.first().map(String::as_str) {
            Some("push") => {
                state.apps.entry(arg(1)).or_default();
            }
            Some("start") => {
                if !state.apps.contains_key(&arg(1)) {
                    return Err(ChannelError::rejected(format!("App {} not found", arg(1))));
                }
                state.stopped.remove(&arg(1));
            }
            Some("rename") => {
                let (old, new) = (arg(1), arg(2));
                if state.apps.contains_key(&new) {
                    return Err(ChannelError::rejected(format!("App name {new} is taken")));
                }
                let routes = state
                    .apps
                    .remove(&old)
                    .ok_or_else(|| ChannelError::rejected(format!("App {old} not found")))?;
                if state.stopped.remove(&old) {
                    state.stopped.insert(new.clone());
                }
                state.apps.insert(new, routes);
            }
            Some("map-route") => {
                let route = Route::new(arg(4), arg(2));
                let routes = state
                    .apps
                    .get_mut(&arg(1))
                    .ok_or_else(|| ChannelError::rejected(format!("App {} not found", arg(1))))?;
                if !routes.contains(&route) {
                    routes.push(route);
                }
            }
            Some("unmap-route") => {
                let route = Route::new(arg(4), arg(2));
                if let Some(routes) = state.apps.get_mut(&arg(1)) {
                    routes.retain(|r| r != &route);
                }
            }
            Some("delete") => {
                state.apps.remove(&arg(1));
                state.stopped.remove(&arg(1));
            }
            _ => {}
        }
        Ok(())
    }

    fn answer_curl(&self, state: &State, query: &str) -> Value {
        let params: Vec<(&str, &str)> = query
            .split_once('?')
            .map(|(_, q)| q)
            .unwrap_or_default()
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        let filter = |prefix: &str| {
            params
                .iter()
                .filter(|(key, _)| *key == "q")
                .find_map(|(_, value)| value.strip_prefix(prefix))
        };
        let number = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };

        let in_scope = filter("space_guid:") == Some(SCOPE);

        if let Some(name) = filter("name:") {
            let name = urlencoding::decode(&name.replace('+', " "))
                .map(|n| n.into_owned())
                .unwrap_or_default();
            let total = usize::from(in_scope && state.apps.contains_key(&name));
            return json!({ "total_results": total });
        }

        let names: Vec<&String> = if in_scope {
            state.apps.keys().collect()
        } else {
            Vec::new()
        };
        let per_page = state
            .page_size
            .or_else(|| number("results-per-page"))
            .unwrap_or(50)
            .max(1);
        let page = number("page").unwrap_or(1).max(1);
        let total_pages = names.len().div_ceil(per_page).max(1);

        let resources: Vec<Value> = names
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|name| {
                let app_state = if state.stopped.contains(*name) {
                    "STOPPED"
                } else {
                    "STARTED"
                };
                json!({
                    "metadata": { "guid": format!("guid-{name}") },
                    "entity": { "name": name, "state": app_state },
                })
            })
            .collect();
        let next_url = (page < total_pages).then(|| {
            format!(
                "/v2/apps?q=space_guid:{SCOPE}&results-per-page={per_page}&page={}",
                page + 1
            )
        });

        json!({
            "total_results": names.len(),
            "total_pages": total_pages,
            "next_url": next_url,
            "resources": resources,
        })
    }
}

#[async_trait]
impl CommandChannel for FakePlatform {
    async fn run_command(&self, args: &[String]) -> Result<Vec<String>, ChannelError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Echoed(args.to_vec()));
        if let Err(e) = Self::check_failure(&state, args) {
            // A failed push still creates the app, it just never starts.
            if let (Some("push"), Some(name)) = (args.first().map(String::as_str), args.get(1)) {
                state.apps.entry(name.clone()).or_default();
                state.stopped.insert(name.clone());
            }
            return Err(e);
        }
        Self::apply(&mut state, args)?;
        Ok(vec!["OK".to_string()])
    }

    async fn run_command_quietly(&self, args: &[String]) -> Result<Vec<String>, ChannelError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Quiet(args.to_vec()));
        Self::check_failure(&state, args)?;

        if let Some(lines) = state.quiet_responses.pop_front() {
            return Ok(lines);
        }

        match (args.first().map(String::as_str), args.get(1)) {
            (Some("curl"), Some(query)) => {
                let body = self.answer_curl(&state, query);
                let text = serde_json::to_string_pretty(&body).unwrap_or_default();
                Ok(text.lines().map(str::to_string).collect())
            }
            _ => {
                Self::apply(&mut state, args)?;
                Ok(Vec::new())
            }
        }
    }

    async fn current_scope(&self) -> Result<SpaceGuid, ChannelError> {
        Ok(SpaceGuid::new(SCOPE))
    }

    async fn get_application_details(&self, name: &str) -> Result<Vec<Route>, ChannelError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Details(name.to_string()));
        Self::check_failure(&state, &["app".to_string(), name.to_string()])?;

        state
            .apps
            .get(name)
            .cloned()
            .ok_or_else(|| ChannelError::AppNotFound {
                name: name.to_string(),
            })
    }
}
