use secrecy::SecretString;

/// Process-wide secrets and backend coordinates, built once from the CLI
/// and passed explicitly into the server action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    pub session_secret: SecretString,
    pub idp_client_id: String,
    pub idp_client_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String) -> Self {
        Self {
            backend_url,
            session_secret: SecretString::default(),
            idp_client_id: String::new(),
            idp_client_secret: SecretString::default(),
        }
    }

    pub fn set_session_secret(&mut self, secret: SecretString) {
        self.session_secret = secret;
    }

    pub fn set_idp_client(&mut self, client_id: String, client_secret: SecretString) {
        self.idp_client_id = client_id;
        self.idp_client_secret = client_secret;
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("backend_url", &self.backend_url)
            .field("session_secret", &"***")
            .field("idp_client_id", &self.idp_client_id)
            .field("idp_client_secret", &"***")
            .finish()
    }
}
