//! Contact identifier value object
//!
//! An identifier is the normalized contact string a code is delivered to plus
//! the channel it travels over. The contact string alone is the throttling
//! and active-request key; the channel rides along on the request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::VerificationError;
use vg_shared::utils::contact;

/// Delivery channel for a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Text message to a phone number
    Sms,
    /// Email to an address
    Email,
    /// WhatsApp message to a phone number
    Whatsapp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
            Channel::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sms" => Ok(Channel::Sms),
            "email" => Ok(Channel::Email),
            "whatsapp" => Ok(Channel::Whatsapp),
            other => Err(VerificationError::InvalidIdentifier {
                reason: format!("unsupported delivery channel: {}", other),
            }),
        }
    }
}

/// Validated contact identifier bound to a delivery channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    contact: String,
    channel: Channel,
}

impl Identifier {
    /// Normalizes and validates a raw contact string for the given channel
    ///
    /// Phone channels require E.164 format; the email channel requires an
    /// email address.
    pub fn new(raw: &str, channel: Channel) -> Result<Self, VerificationError> {
        let contact = match channel {
            Channel::Sms | Channel::Whatsapp => {
                let normalized = contact::normalize_phone(raw);
                if !contact::is_valid_e164(&normalized) {
                    return Err(VerificationError::InvalidIdentifier {
                        reason: format!(
                            "not a valid E.164 phone number: {}",
                            contact::mask_contact(raw)
                        ),
                    });
                }
                normalized
            }
            Channel::Email => {
                let normalized = contact::normalize_email(raw);
                if !contact::is_valid_email(&normalized) {
                    return Err(VerificationError::InvalidIdentifier {
                        reason: format!(
                            "not a valid email address: {}",
                            contact::mask_contact(raw)
                        ),
                    });
                }
                normalized
            }
        };

        Ok(Self { contact, channel })
    }

    /// Normalizes a raw contact string without knowing the channel
    ///
    /// Used on the verify path, where only the contact is submitted. The form
    /// of the string decides how it is normalized.
    pub fn normalize_contact(raw: &str) -> Result<String, VerificationError> {
        if raw.contains('@') {
            let normalized = contact::normalize_email(raw);
            if contact::is_valid_email(&normalized) {
                return Ok(normalized);
            }
        } else {
            let normalized = contact::normalize_phone(raw);
            if contact::is_valid_e164(&normalized) {
                return Ok(normalized);
            }
        }
        Err(VerificationError::InvalidIdentifier {
            reason: format!(
                "not a phone number or email address: {}",
                contact::mask_contact(raw)
            ),
        })
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Masked form safe for logging
    pub fn masked(&self) -> String {
        contact::mask_contact(&self.contact)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.contact, self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sms_identifier_requires_e164() {
        let id = Identifier::new("+237 698 765 432", Channel::Sms).unwrap();
        assert_eq!(id.contact(), "+237698765432");
        assert_eq!(id.channel(), Channel::Sms);

        assert!(Identifier::new("698765432", Channel::Sms).is_err());
    }

    #[test]
    fn email_identifier_is_lowercased() {
        let id = Identifier::new(" User@Example.COM ", Channel::Email).unwrap();
        assert_eq!(id.contact(), "user@example.com");
    }

    #[test]
    fn email_contact_rejected_on_phone_channel() {
        assert!(Identifier::new("user@example.com", Channel::Whatsapp).is_err());
    }

    #[test]
    fn normalize_contact_detects_form() {
        assert_eq!(
            Identifier::normalize_contact("User@Example.com").unwrap(),
            "user@example.com"
        );
        assert_eq!(
            Identifier::normalize_contact("+61 412 345 678").unwrap(),
            "+61412345678"
        );
        assert!(Identifier::normalize_contact("not-a-contact").is_err());
    }

    #[test]
    fn channel_round_trips_through_str() {
        for channel in [Channel::Sms, Channel::Email, Channel::Whatsapp] {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert!("carrier-pigeon".parse::<Channel>().is_err());
    }

    #[test]
    fn masked_identifier_hides_contact() {
        let id = Identifier::new("+237698765432", Channel::Sms).unwrap();
        assert!(!id.masked().contains("69876"));
    }
}
