//! Token endpoint grants and response validation.

use std::fmt;

use serde_json::Value;

use crate::auth::AccessToken;
use crate::clients::MalformedTokenError;
use crate::model::{FieldDef, Model, ModelSchema};

/// Lifetime of refresh tokens; the token endpoint does not report it.
pub const REFRESH_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Scope granted to client-credentials tokens.
pub const RETAILER_SCOPE: &str = "RETAILER";

/// Schema of the token endpoint payload.
pub static TOKEN_RESPONSE: ModelSchema = ModelSchema::new(
    "TokenResponse",
    &[
        FieldDef::scalar("access_token"),
        FieldDef::scalar("expires_in"),
        FieldDef::scalar("token_type"),
        FieldDef::scalar("scope"),
        FieldDef::scalar("refresh_token"),
    ],
);

/// An OAuth2 grant sent to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
    /// Machine-to-machine access with the client's own credentials.
    ClientCredentials,
    /// Exchange of an authorization code received on the redirect URI.
    AuthorizationCode {
        /// The authorization code.
        code: String,
        /// The redirect URI used when requesting the code.
        redirect_uri: String,
    },
    /// Exchange of a refresh token for a new access token.
    RefreshToken {
        /// The raw refresh token.
        refresh_token: String,
    },
}

impl Grant {
    /// Returns the `grant_type` parameter.
    #[must_use]
    pub const fn grant_type(&self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode { .. } => "authorization_code",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Returns the parameters sent to the token endpoint.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("grant_type", self.grant_type())];
        match self {
            Self::ClientCredentials => {}
            Self::AuthorizationCode { code, redirect_uri } => {
                params.push(("code", code));
                params.push(("redirect_uri", redirect_uri));
            }
            Self::RefreshToken { refresh_token } => {
                params.push(("refresh_token", refresh_token));
            }
        }
        params
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientCredentials => f.write_str("ClientCredentials"),
            Self::AuthorizationCode { redirect_uri, .. } => f
                .debug_struct("AuthorizationCode")
                .field("code", &"*****")
                .field("redirect_uri", redirect_uri)
                .finish(),
            Self::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"*****")
                .finish(),
        }
    }
}

/// A validated token endpoint payload.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenResponse {
    access_token: String,
    expires_in: i64,
    token_type: String,
    scope: Option<String>,
    refresh_token: Option<String>,
}

impl TokenResponse {
    /// Validates a decoded token payload.
    ///
    /// `access_token` must be a non-empty string, `expires_in` a non-negative
    /// number of seconds and `token_type` must equal `Bearer`. When
    /// `expected_scope` is given, `scope` must match it. Comparisons ignore
    /// case.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedTokenError`] describing the first failed check.
    pub fn from_model(
        model: &Model,
        expected_scope: Option<&str>,
    ) -> Result<Self, MalformedTokenError> {
        let access_token = model
            .str("access_token")
            .filter(|token| !token.trim().is_empty())
            .ok_or(MalformedTokenError::MissingAccessToken)?
            .to_string();

        let expires_in = parse_expires_in(
            model
                .scalar("expires_in")
                .ok_or(MalformedTokenError::MissingExpiresIn)?,
        )?;

        let token_type = model.str("token_type").unwrap_or_default().to_string();
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(MalformedTokenError::UnexpectedTokenType { token_type });
        }

        let scope = model.str("scope").map(str::to_string);
        if let Some(expected) = expected_scope {
            let granted = scope.as_deref().unwrap_or_default();
            if !granted.eq_ignore_ascii_case(expected) {
                return Err(MalformedTokenError::UnexpectedScope {
                    scope: granted.to_string(),
                    expected: expected.to_string(),
                });
            }
        }

        let refresh_token = model
            .str("refresh_token")
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string);

        Ok(Self {
            access_token,
            expires_in,
            token_type,
            scope,
            refresh_token,
        })
    }

    /// Validates a raw JSON token payload; see [`from_model`](Self::from_model).
    ///
    /// # Errors
    ///
    /// Returns [`MalformedTokenError::NotAnObject`] if `value` is not an
    /// object, or any validation error of [`from_model`](Self::from_model).
    pub fn from_json(
        value: &Value,
        expected_scope: Option<&str>,
    ) -> Result<Self, MalformedTokenError> {
        let model = Model::try_from_tree(&TOKEN_RESPONSE, value.clone())
            .map_err(|_| MalformedTokenError::NotAnObject)?;
        Self::from_model(&model, expected_scope)
    }

    /// Returns the access token, expiring `expires_in` seconds from now.
    #[must_use]
    pub fn access_token(&self) -> AccessToken {
        AccessToken::from_expires_in(self.access_token.clone(), self.expires_in)
    }

    /// Returns the refresh token, valid for 365 days from now.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedTokenError::MissingRefreshToken`] if the payload
    /// carried none.
    pub fn refresh_token(&self) -> Result<AccessToken, MalformedTokenError> {
        self.refresh_token
            .as_ref()
            .map(|token| AccessToken::from_expires_in(token.clone(), REFRESH_TOKEN_LIFETIME_SECS))
            .ok_or(MalformedTokenError::MissingRefreshToken)
    }

    /// Returns the lifetime of the access token in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Returns the token type as received.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the granted scope.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

fn parse_expires_in(value: &Value) -> Result<i64, MalformedTokenError> {
    let parsed = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) if text.trim().is_empty() => {
            return Err(MalformedTokenError::MissingExpiresIn)
        }
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|secs| i64::try_from(secs).ok())
        .ok_or_else(|| MalformedTokenError::InvalidExpiresIn {
            value: value.to_string(),
        })
}
