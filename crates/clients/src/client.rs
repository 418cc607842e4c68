use serde::{Deserialize, Serialize};

use fieldops_core::{ClientId, DomainError, Entity, RandomSource};

/// Prefix of sequential client ids (`CL-001`).
pub const CLIENT_ID_PREFIX: &str = "CL-";

/// Zero-padding width of the numeric part of a client id.
pub const CLIENT_ID_WIDTH: usize = 3;

/// Name given to a client created without one.
pub const UNNAMED_CLIENT: &str = "Unnamed";

/// Initials used when no name is available.
pub const FALLBACK_INITIALS: &str = "XX";

/// Display colours handed out to new clients.
pub const COLOR_PALETTE: [&str; 4] = [
    "bg-blue-50 dark:bg-blue-900/20 text-blue-600 dark:text-blue-400 border-blue-100 dark:border-blue-900/50",
    "bg-purple-50 dark:bg-purple-900/20 text-purple-600 dark:text-purple-400 border-purple-100 dark:border-purple-900/50",
    "bg-emerald-50 dark:bg-emerald-900/20 text-emerald-600 dark:text-emerald-400 border-emerald-100 dark:border-emerald-900/50",
    "bg-orange-50 dark:bg-orange-900/20 text-orange-600 dark:text-orange-400 border-orange-100 dark:border-orange-900/50",
];

/// Client status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

/// A client (the subject equipment is assigned to).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub initials: String,
    pub name: String,
    /// Preferred natural key.
    #[serde(default, alias = "nit")]
    pub tax_id: String,
    #[serde(default)]
    pub contact_name: String,
    /// Fallback natural key.
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default)]
    pub total_visits: u32,
    #[serde(default = "no_visit_yet")]
    pub last_visit_date: String,
    #[serde(default)]
    pub color_class: String,
}

fn no_visit_yet() -> String {
    "-".to_string()
}

impl Client {
    /// A fresh client with zeroed visit statistics.
    pub fn new(id: ClientId, name: impl Into<String>, color_class: impl Into<String>) -> Self {
        let name = name.into();
        let initials = initials_or_fallback(&name);
        let name = if name.trim().is_empty() {
            UNNAMED_CLIENT.to_string()
        } else {
            name.trim().to_string()
        };
        Self {
            id,
            initials,
            name,
            tax_id: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            photo_url: String::new(),
            status: ClientStatus::Active,
            total_visits: 0,
            last_visit_date: no_visit_yet(),
            color_class: color_class.into(),
        }
    }

    pub fn has_tax_id(&self, tax_id: &str) -> bool {
        !self.tax_id.is_empty() && self.tax_id == tax_id.trim()
    }

    /// Email match, ignoring case and surrounding whitespace.
    pub fn has_email(&self, email: &str) -> bool {
        !self.email.is_empty() && self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Numeric part of a `<prefix>NNN` id, if the id has that shape.
    pub fn sequence_number(&self, prefix: &str) -> Option<u64> {
        self.id
            .as_str()
            .strip_prefix(prefix)
            .and_then(|n| n.parse().ok())
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Up to two upper-case initials from the words of `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn initials_or_fallback(name: &str) -> String {
    let initials = initials(name);
    if initials.is_empty() {
        FALLBACK_INITIALS.to_string()
    } else {
        initials
    }
}

/// Pick a palette colour through the injected random source.
pub fn pick_color<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    COLOR_PALETTE[rng.pick(COLOR_PALETTE.len()) % COLOR_PALETTE.len()].to_string()
}

/// Format the `n`-th sequential client id.
pub fn sequential_client_id(prefix: &str, n: u64) -> ClientId {
    ClientId::from(format!("{prefix}{n:0width$}", width = CLIENT_ID_WIDTH))
}

/// One past the highest numeric id in `clients`.
///
/// `None` once the numeric range is exhausted.
pub fn next_sequence(clients: &[Client], prefix: &str) -> Option<u64> {
    clients
        .iter()
        .filter_map(|c| c.sequence_number(prefix))
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

/// Reject clients that cannot be stored.
pub fn validate(client: &Client) -> Result<(), DomainError> {
    if client.id.as_str().trim().is_empty() {
        return Err(DomainError::validation("client id cannot be empty"));
    }
    if client.name.trim().is_empty() {
        return Err(DomainError::validation("client name cannot be empty"));
    }
    Ok(())
}
