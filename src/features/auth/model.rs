/// The user resolved from a validated session token.
///
/// `access_token` is the user's Google OAuth access token, forwarded by the
/// auth collaborator inside the session claims (the sign-in scope includes
/// `drive.file`). It is absent for sessions established before Drive consent.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: Option<String>,
    pub access_token: Option<String>,
}

impl AuthenticatedUser {
    /// The user's Drive credentials, or an explanation of why there are none.
    pub fn drive_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}
