//! Two-factor login challenge data
//!
//! Decoded from the `two_factor_info` object the platform returns when a
//! password login needs a second factor. Lives for one login attempt only.

use serde::{Deserialize, Serialize};

use super::serde_helpers::deserialize_flexible_bool;

/// Second-factor challenge attached to a failed password login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorInfo {
    /// Username the challenge was issued for
    pub username: String,
    /// Opaque identifier to echo back with the verification code
    pub two_factor_identifier: String,
    /// Whether an authenticator app is enrolled
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub totp_two_factor_on: Option<bool>,
}

impl TwoFactorInfo {
    /// Channel the verification code is expected on.
    ///
    /// Authenticator codes are used only when the flag is explicitly true;
    /// every other case, including a missing flag, falls back to SMS.
    pub fn verification_method(&self) -> VerificationMethod {
        if self.totp_two_factor_on == Some(true) {
            VerificationMethod::Totp
        } else {
            VerificationMethod::Sms
        }
    }
}

/// Delivery channel of a second-factor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationMethod {
    /// Authenticator app (time-based one-time password)
    Totp,
    /// Text message
    #[default]
    Sms,
}

impl VerificationMethod {
    /// Value sent as `verification_method` in the two-factor login call
    pub fn code(self) -> &'static str {
        match self {
            Self::Totp => "0",
            Self::Sms => "1",
        }
    }

    /// Human-readable channel name used in the prompt
    pub fn label(self) -> &'static str {
        match self {
            Self::Totp => "TOTP",
            Self::Sms => "SMS",
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters for completing a two-factor login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorLogin {
    pub username: String,
    pub verification_code: String,
    pub two_factor_identifier: String,
    pub verification_method: VerificationMethod,
    pub trust_this_device: bool,
}

impl TwoFactorLogin {
    /// Build the submission for a challenge and the code the user entered
    pub fn new(info: &TwoFactorInfo, code: impl Into<String>) -> Self {
        Self {
            username: info.username.clone(),
            verification_code: code.into(),
            two_factor_identifier: info.two_factor_identifier.clone(),
            verification_method: info.verification_method(),
            trust_this_device: true,
        }
    }
}
