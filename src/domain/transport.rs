use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// TLS from the first byte of the connection (SMTPS).
    ImplicitTls,
    /// Plaintext connect, then upgrade with STARTTLS.
    StartTls,
}

impl Encryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encryption::ImplicitTls => "implicit-tls",
            Encryption::StartTls => "starttls",
        }
    }
}

impl std::fmt::Display for Encryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportProfile {
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
}

impl TransportProfile {
    pub fn new(host: impl Into<String>, port: u16, encryption: Encryption) -> Self {
        Self {
            host: host.into(),
            port,
            encryption,
        }
    }

    pub fn gmail() -> Self {
        Self::new("smtp.gmail.com", 465, Encryption::ImplicitTls)
    }

    pub fn office365() -> Self {
        Self::new("smtp.office365.com", 587, Encryption::StartTls)
    }
}

/// Maps sender domains to the SMTP endpoint that serves them. Domains not
/// in the table use the default profile.
#[derive(Debug, Clone)]
pub struct TransportTable {
    entries: Vec<(String, TransportProfile)>,
    default: TransportProfile,
}

impl TransportTable {
    pub fn new(default: TransportProfile) -> Self {
        Self {
            entries: Vec::new(),
            default,
        }
    }

    pub fn with_domain(mut self, domain: &str, profile: TransportProfile) -> Self {
        self.entries.push((domain.to_ascii_lowercase(), profile));
        self
    }

    /// Profile for a sender address like `user@hotmail.com`.
    pub fn for_sender(&self, sender: &str) -> &TransportProfile {
        sender
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim().to_ascii_lowercase())
            .and_then(|domain| {
                self.entries
                    .iter()
                    .find(|(known, _)| *known == domain)
                    .map(|(_, profile)| profile)
            })
            .unwrap_or(&self.default)
    }

    pub fn default_profile(&self) -> &TransportProfile {
        &self.default
    }
}

impl Default for TransportTable {
    fn default() -> Self {
        Self::new(TransportProfile::gmail())
            .with_domain("gmail.com", TransportProfile::gmail())
            .with_domain("hotmail.com", TransportProfile::office365())
            .with_domain("outlook.com", TransportProfile::office365())
            .with_domain("live.com", TransportProfile::office365())
    }
}
