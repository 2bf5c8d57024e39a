//! Status enums shared by the catalog, checkout and auth layers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the linear checkout flow.
///
/// The numeric value matches the step indicator shown to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping = 1,
    Payment = 2,
    Confirmation = 3,
}

impl CheckoutStep {
    /// The 1-based step indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Whether no further forward transition exists.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// How the shopper pays for an order.
///
/// Only [`PaymentMethod::Card`] requires the payment form to be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    /// Cash on delivery.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Yape mobile wallet.
    Yape,
}

impl PaymentMethod {
    #[must_use]
    pub const fn requires_card_details(self) -> bool {
        matches!(self, Self::Card)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
            Self::Transfer => write!(f, "transfer"),
            Self::Yape => write!(f, "yape"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "yape" => Ok(Self::Yape),
            other => Err(format!("invalid payment method: {other}")),
        }
    }
}

/// Role granted by the auth service, as carried in the login response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Client,
    Admin,
    /// A role this client does not know about; kept verbatim.
    Other(String),
}

impl UserRole {
    /// The wire representation (e.g. `ADMIN`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Client => "CLIENT",
            Self::Admin => "ADMIN",
            Self::Other(role) => role,
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        let bare = value.strip_prefix("ROLE_").unwrap_or(&value);
        match bare.to_ascii_uppercase().as_str() {
            "CLIENT" | "CLIENTE" => Self::Client,
            "ADMIN" | "ADMINISTRADOR" => Self::Admin,
            _ => Self::Other(value),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_owned()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lunar energies offered in the admin product form.
///
/// Products carry the energy as a free-text tag; this enum lists the values
/// the catalog team curates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarEnergy {
    #[serde(rename = "Luna Nueva")]
    NewMoon,
    #[serde(rename = "Luna Creciente")]
    WaxingMoon,
    #[serde(rename = "Luna Llena")]
    FullMoon,
    #[serde(rename = "Luna Menguante")]
    WaningMoon,
    #[serde(rename = "Protección")]
    Protection,
    #[serde(rename = "Amor")]
    Love,
    #[serde(rename = "Abundancia")]
    Abundance,
    #[serde(rename = "Sanación")]
    Healing,
}

impl LunarEnergy {
    pub const ALL: [Self; 8] = [
        Self::NewMoon,
        Self::WaxingMoon,
        Self::FullMoon,
        Self::WaningMoon,
        Self::Protection,
        Self::Love,
        Self::Abundance,
        Self::Healing,
    ];

    /// The label stored on products.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewMoon => "Luna Nueva",
            Self::WaxingMoon => "Luna Creciente",
            Self::FullMoon => "Luna Llena",
            Self::WaningMoon => "Luna Menguante",
            Self::Protection => "Protección",
            Self::Love => "Amor",
            Self::Abundance => "Abundancia",
            Self::Healing => "Sanación",
        }
    }

    /// Look up a curated energy by label, ignoring case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|energy| energy.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for LunarEnergy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_step_numbers() {
        assert_eq!(CheckoutStep::Shipping.number(), 1);
        assert_eq!(CheckoutStep::Payment.number(), 2);
        assert_eq!(CheckoutStep::Confirmation.number(), 3);
        assert!(CheckoutStep::Confirmation.is_terminal());
        assert!(!CheckoutStep::Payment.is_terminal());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!(PaymentMethod::Card.requires_card_details());
        assert!(!PaymentMethod::Yape.requires_card_details());
    }

    #[test]
    fn test_user_role_from_wire() {
        let roles: Vec<UserRole> =
            serde_json::from_str(r#"["ROLE_ADMIN", "CLIENT", "AUDITOR"]"#).unwrap();
        assert_eq!(
            roles,
            vec![
                UserRole::Admin,
                UserRole::Client,
                UserRole::Other("AUDITOR".to_string())
            ]
        );
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_lunar_energy_label_lookup() {
        assert_eq!(LunarEnergy::from_label("luna llena"), Some(LunarEnergy::FullMoon));
        assert_eq!(LunarEnergy::from_label("PROTECCIÓN"), Some(LunarEnergy::Protection));
        assert_eq!(LunarEnergy::from_label("Eclipse"), None);
    }
}
