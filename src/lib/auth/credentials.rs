/// Decides whether a login attempt is allowed in.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, name: &str, password: &str) -> bool;
}

/// The single operator account the panel ships with.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    name: &'static str,
    password: &'static str,
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self {
            name: "admin",
            password: "admin",
        }
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, name: &str, password: &str) -> bool {
        // Both fields are required before comparing
        if name.is_empty() || password.is_empty() {
            return false;
        }

        name == self.name && password == self.password
    }
}
