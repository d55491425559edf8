pub mod google;
pub mod local;
mod registry;

pub use google::{GoogleAuthProvider, GoogleOAuthClient, GoogleProfile, HttpGoogleClient};
pub use local::LocalAuthProvider;
pub use registry::{AuthProvider, AuthProviderId, AuthProviders, Credentials};
