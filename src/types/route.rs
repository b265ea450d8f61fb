// ABOUTME: Host-name and domain pair bound to an application.
// ABOUTME: Renders as the URL the route answers on.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub host: String,
    pub domain: String,
}

impl Route {
    pub fn new(host: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            domain: domain.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_empty() {
            write!(f, "{}", self.domain)
        } else {
            write!(f, "{}.{}", self.host, self.domain)
        }
    }
}
