//! Shipping and payment forms.

use serde::{Deserialize, Serialize};

use crate::validation::{FormErrors, Validator};

/// Field names for [`ShippingDetails`].
pub mod shipping_fields {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const NOTES: &str = "notes";

    pub const ALL: [&str; 8] = [
        FIRST_NAME,
        LAST_NAME,
        EMAIL,
        PHONE,
        ADDRESS,
        CITY,
        POSTAL_CODE,
        NOTES,
    ];
}

/// Field names for [`PaymentDetails`].
pub mod payment_fields {
    pub const CARD_NAME: &str = "card_name";
    pub const CARD_NUMBER: &str = "card_number";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const CVV: &str = "cvv";

    pub const ALL: [&str; 4] = [CARD_NAME, CARD_NUMBER, EXPIRY_DATE, CVV];
}

const CARD_NUMBER_MIN: usize = 16;
const CVV_MIN: usize = 3;

/// Where the order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub notes: String,
}

impl ShippingDetails {
    /// # Errors
    ///
    /// Returns the per-field errors if any rule fails.
    pub fn validate(&self) -> Result<(), FormErrors> {
        use shipping_fields::{ADDRESS, CITY, EMAIL, FIRST_NAME, LAST_NAME, PHONE};

        let mut v = Validator::new();
        v.required(FIRST_NAME, &self.first_name)
            .required(LAST_NAME, &self.last_name)
            .required(EMAIL, &self.email)
            .email(EMAIL, self.email.trim())
            .required(PHONE, &self.phone)
            .required(ADDRESS, &self.address)
            .required(CITY, &self.city);
        v.finish()
    }
}

/// Card details. Only required when paying by card.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub card_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_name", &self.card_name)
            .field("card_number", &mask_card_number(&self.card_number))
            .field("expiry_date", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl PaymentDetails {
    /// # Errors
    ///
    /// Returns the per-field errors if any rule fails.
    pub fn validate(&self) -> Result<(), FormErrors> {
        use payment_fields::{CARD_NAME, CARD_NUMBER, CVV, EXPIRY_DATE};

        let mut v = Validator::new();
        v.required(CARD_NAME, &self.card_name)
            .required(CARD_NUMBER, &self.card_number)
            .min_length(CARD_NUMBER, &self.card_number, CARD_NUMBER_MIN)
            .required(EXPIRY_DATE, &self.expiry_date)
            .required(CVV, &self.cvv)
            .min_length(CVV, &self.cvv, CVV_MIN);
        v.finish()
    }
}

/// Last four digits, e.g. `**** 4242`.
fn mask_card_number(number: &str) -> String {
    let mut tail: Vec<char> = number
        .chars()
        .rev()
        .filter(char::is_ascii_digit)
        .take(4)
        .collect();
    tail.reverse();
    format!("**** {}", tail.into_iter().collect::<String>())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    fn valid_shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ana".to_string(),
            last_name: "Quispe".to_string(),
            email: "ana@qorikusi.pe".to_string(),
            phone: "987654321".to_string(),
            address: "Av. El Sol 123".to_string(),
            city: "Cusco".to_string(),
            postal_code: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_shipping_optional_fields() {
        assert!(valid_shipping().validate().is_ok());
    }

    #[test]
    fn test_shipping_errors() {
        let details = ShippingDetails {
            email: "ana@".to_string(),
            city: "   ".to_string(),
            ..valid_shipping()
        };
        let errors = details.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(shipping_fields::EMAIL),
            Some(&FieldError::InvalidEmail)
        );
        assert_eq!(errors.get(shipping_fields::CITY), Some(&FieldError::Required));
    }

    #[test]
    fn test_payment_lengths() {
        let details = PaymentDetails {
            card_name: "ANA QUISPE".to_string(),
            card_number: "4242 4242 4242".to_string(),
            expiry_date: "12/28".to_string(),
            cvv: "12".to_string(),
        };
        let errors = details.validate().unwrap_err();
        assert_eq!(
            errors.get(payment_fields::CARD_NUMBER),
            Some(&FieldError::MinLength { required: 16 })
        );
        assert_eq!(
            errors.get(payment_fields::CVV),
            Some(&FieldError::MinLength { required: 3 })
        );

        let details = PaymentDetails {
            card_number: "4242424242424242".to_string(),
            cvv: "123".to_string(),
            ..details
        };
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_payment_debug_masks_card() {
        let details = PaymentDetails {
            card_name: "ANA".to_string(),
            card_number: "4242424242421234".to_string(),
            expiry_date: "12/28".to_string(),
            cvv: "999".to_string(),
        };
        let debug = format!("{details:?}");
        assert!(debug.contains("**** 1234"));
        assert!(!debug.contains("4242424242421234"));
        assert!(!debug.contains("999"));
    }

    #[test]
    fn test_mask_keeps_last_four_digits_only() {
        assert_eq!(mask_card_number("4242 4242 4242 1234"), "**** 1234");
        assert_eq!(mask_card_number("12"), "**** 12");
        assert_eq!(mask_card_number(""), "**** ");
    }
}
