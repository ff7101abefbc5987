//! Where the embedded page may go
//!
//! Local pages (the dev server, loopback hosts, the configured page's own
//! origin) stay inside the overlay. Ordinary web links are handed to the
//! system browser, and every other scheme is refused.

use tracing::debug;
use url::{Host, Url};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Load it in the embedded surface
    Allow,
    /// Refuse here and open it in the default browser
    OpenExternal,
    Block,
}

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    home: Option<Url>,
}

impl NavigationPolicy {
    pub fn new(home_url: &str) -> Self {
        let home = Url::parse(home_url).ok();
        if home.is_none() {
            debug!(url = home_url, "home URL does not parse, only loopback stays local");
        }
        Self { home }
    }

    pub fn decide(&self, target: &str) -> NavigationDecision {
        let Ok(url) = Url::parse(target) else {
            debug!(target, "unparseable navigation target");
            return NavigationDecision::Block;
        };

        let decision = match url.scheme() {
            "data" | "about" => NavigationDecision::Allow,
            "http" | "https" if self.is_local(&url) => NavigationDecision::Allow,
            "http" | "https" => NavigationDecision::OpenExternal,
            "file" if self.home_scheme() == Some("file") => NavigationDecision::Allow,
            _ => NavigationDecision::Block,
        };
        debug!(target, ?decision, "navigation");
        decision
    }

    fn home_scheme(&self) -> Option<&str> {
        self.home.as_ref().map(Url::scheme)
    }

    fn is_local(&self, url: &Url) -> bool {
        let loopback = match url.host() {
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(addr)) => addr.is_loopback(),
            Some(Host::Ipv6(addr)) => addr.is_loopback(),
            None => false,
        };

        loopback
            || self
                .home
                .as_ref()
                .is_some_and(|home| home.origin() == url.origin())
    }
}
