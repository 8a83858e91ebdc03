mod credentials;
mod gate;

pub use credentials::{CredentialVerifier, FixedCredentials};
pub use gate::{AuthGate, Redirect, PANEL_PAGE, PUBLIC_PAGE};
