//! Stable authentication error codes surfaced on the error page.

use std::fmt;

/// Closed set of error codes the error page understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthErrorCode {
    Configuration,
    AccessDenied,
    Verification,
    OAuthSignin,
    OAuthCallback,
    OAuthCreateAccount,
    EmailCreateAccount,
    Callback,
    OAuthAccountNotLinked,
    EmailSignin,
    CredentialsSignin,
    SessionRequired,
    Default,
}

impl AuthErrorCode {
    /// Map a raw query-string code to a known code; anything unknown or
    /// absent falls back to `Default`.
    #[must_use]
    pub fn parse(code: Option<&str>) -> Self {
        match code {
            Some("Configuration") => Self::Configuration,
            Some("AccessDenied") => Self::AccessDenied,
            Some("Verification") => Self::Verification,
            Some("OAuthSignin") => Self::OAuthSignin,
            Some("OAuthCallback") => Self::OAuthCallback,
            Some("OAuthCreateAccount") => Self::OAuthCreateAccount,
            Some("EmailCreateAccount") => Self::EmailCreateAccount,
            Some("Callback") => Self::Callback,
            Some("OAuthAccountNotLinked") => Self::OAuthAccountNotLinked,
            Some("EmailSignin") => Self::EmailSignin,
            Some("CredentialsSignin") => Self::CredentialsSignin,
            Some("SessionRequired") => Self::SessionRequired,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "Configuration",
            Self::AccessDenied => "AccessDenied",
            Self::Verification => "Verification",
            Self::OAuthSignin => "OAuthSignin",
            Self::OAuthCallback => "OAuthCallback",
            Self::OAuthCreateAccount => "OAuthCreateAccount",
            Self::EmailCreateAccount => "EmailCreateAccount",
            Self::Callback => "Callback",
            Self::OAuthAccountNotLinked => "OAuthAccountNotLinked",
            Self::EmailSignin => "EmailSignin",
            Self::CredentialsSignin => "CredentialsSignin",
            Self::SessionRequired => "SessionRequired",
            Self::Default => "Default",
        }
    }

    /// Fixed human-readable description for the error page.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Configuration => "There is a problem with the server configuration.",
            Self::AccessDenied => "You do not have permission to sign in.",
            Self::Verification => {
                "The verification link may have been used or is no longer valid."
            }
            Self::OAuthSignin => "Error in the OAuth sign-in process.",
            Self::OAuthCallback => "Error in the OAuth callback process.",
            Self::OAuthCreateAccount => "Could not create OAuth provider user in the database.",
            Self::EmailCreateAccount => "Could not create email provider user in the database.",
            Self::Callback => "Error in the OAuth callback handler.",
            Self::OAuthAccountNotLinked => {
                "Email on the account is already linked, but not with this OAuth account."
            }
            Self::EmailSignin => "Check your email inbox for the sign-in link.",
            Self::CredentialsSignin => "The credentials you provided were invalid.",
            Self::SessionRequired => "You must be signed in to access this page.",
            Self::Default => "An unexpected error occurred. Please try again later.",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
