//! HTTP Basic credentials scoped to an allow-list of hosts.

/// Which request hosts may receive the credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialScope {
    /// Only these hosts (case-insensitive, port ignored).
    Hosts(Vec<String>),
    /// Every host. Opt-in only.
    AnyHost,
}

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    scope: CredentialScope,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

impl Credentials {
    pub fn new(username: &str, password: &str, scope: CredentialScope) -> Self {
        let scope = match scope {
            CredentialScope::Hosts(hosts) => CredentialScope::Hosts(
                hosts
                    .iter()
                    .map(|h| h.trim().to_ascii_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect(),
            ),
            CredentialScope::AnyHost => CredentialScope::AnyHost,
        };
        Self {
            username: username.to_string(),
            password: password.to_string(),
            scope,
        }
    }

    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    /// Returns `(username, password)` if the URL's host may receive them.
    pub fn for_url(&self, url: &str) -> Option<(&str, &str)> {
        let allowed = match &self.scope {
            CredentialScope::AnyHost => true,
            CredentialScope::Hosts(hosts) => {
                let host = url::Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()));
                match host {
                    Some(h) => hosts.iter().any(|allowed| *allowed == h),
                    None => false,
                }
            }
        };
        allowed.then(|| (self.username.as_str(), self.password.as_str()))
    }
}
