use std::env;

/// First-boot provisioning seed for the root account.
///
/// Consumed only when the `users` table has no root principal; the root
/// role is never creatable through the API.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    pub root_email: Option<String>,
    pub root_full_name: String,
    pub root_default_password: Option<String>,
}

impl BootstrapConfig {
    pub fn from_env() -> Self {
        Self {
            root_email: env::var("ROOT_EMAIL").ok().filter(|s| !s.is_empty()),
            root_full_name: env::var("ROOT_FULL_NAME").unwrap_or_else(|_| "Root".to_string()),
            root_default_password: env::var("ROOT_DEFAULT_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    /// Both seed values must be present for first-boot provisioning to run.
    pub fn seed(&self) -> Option<(&str, &str, &str)> {
        match (&self.root_email, &self.root_default_password) {
            (Some(email), Some(password)) => {
                Some((self.root_full_name.as_str(), email, password))
            }
            _ => None,
        }
    }
}
