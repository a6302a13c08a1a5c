use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Identity;

/// Identity of the operator at this terminal, as configured through
/// `username`. No name means nobody is signed in.
pub struct LocalIdentity {
    name: String,
}

impl Default for LocalIdentity {
    fn default() -> LocalIdentity {
        return LocalIdentity::new(&Config::get(ConfigKey::Username));
    }
}

impl LocalIdentity {
    pub fn new(name: &str) -> LocalIdentity {
        return LocalIdentity {
            name: name.trim().to_string(),
        };
    }
}

impl Identity for LocalIdentity {
    fn is_signed_in(&self) -> bool {
        return !self.name.is_empty();
    }

    fn display_name(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }

        return Some(self.name.to_string());
    }
}
