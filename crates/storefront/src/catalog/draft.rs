//! Admin product form.
//!
//! A [`ProductDraft`] holds what an administrator typed; validating it
//! produces the [`ProductRequest`] sent to the admin endpoints.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use qorikusi_core::LunarEnergy;

use crate::models::{Product, ProductRequest};
use crate::validation::{FormErrors, TouchedFields, Validator};

/// Field names used in [`FormErrors`] for the product form.
pub mod product_fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const PRICE: &str = "price";
    pub const STOCK: &str = "stock";
    pub const CATEGORY: &str = "category";
    pub const ENERGY: &str = "energy";
    pub const IMAGE: &str = "image";

    pub const ALL: [&str; 7] = [NAME, DESCRIPTION, PRICE, STOCK, CATEGORY, ENERGY, IMAGE];
}

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 500;
const PRICE_MIN: Decimal = dec!(0.01);

/// Unvalidated input from the admin product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category: String,
    /// Empty means "no energy"; otherwise a [`LunarEnergy`] label.
    pub energy: String,
    pub image: String,
    pub touched: TouchedFields,
}

impl ProductDraft {
    /// Pre-fill the form from an existing product (edit mode).
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: i64::from(product.stock),
            category: product.category.clone(),
            energy: product.energy.clone().unwrap_or_default(),
            image: product.image.clone(),
            touched: TouchedFields::default(),
        }
    }

    /// Check every rule without touching any field.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors if any rule fails.
    pub fn validate(&self) -> Result<(), FormErrors> {
        use product_fields::{CATEGORY, DESCRIPTION, ENERGY, IMAGE, NAME, PRICE, STOCK};

        let mut v = Validator::new();
        v.required(NAME, &self.name)
            .min_length(NAME, &self.name, NAME_MIN)
            .max_length(NAME, &self.name, NAME_MAX)
            .required(DESCRIPTION, &self.description)
            .min_length(DESCRIPTION, &self.description, DESCRIPTION_MIN)
            .max_length(DESCRIPTION, &self.description, DESCRIPTION_MAX)
            .min_value(PRICE, self.price, PRICE_MIN)
            .min_value(STOCK, Decimal::from(self.stock), Decimal::ZERO)
            .required(CATEGORY, &self.category)
            .one_of(ENERGY, &self.energy, |label| LunarEnergy::from_label(label).is_some())
            .required(IMAGE, &self.image);
        v.finish()
    }

    /// Validate and build the request body.
    ///
    /// On failure every field is marked touched so that all errors render.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors if any rule fails.
    pub fn submit(&mut self) -> Result<ProductRequest, FormErrors> {
        if let Err(errors) = self.validate() {
            self.touched.touch_all(&product_fields::ALL);
            return Err(errors);
        }

        let energy = LunarEnergy::from_label(&self.energy);
        Ok(ProductRequest {
            nombre: self.name.trim().to_string(),
            descripcion: self.description.trim().to_string(),
            precio: self.price,
            stock: u32::try_from(self.stock).unwrap_or(u32::MAX),
            categoria: self.category.clone(),
            energia_lunar: energy.map(|e| e.label().to_string()),
            imagen: self.image.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    fn valid_draft() -> ProductDraft {
        ProductDraft {
            name: "  Collar Luna  ".to_string(),
            description: "Plata 925 con piedra de luna".to_string(),
            price: dec!(220),
            stock: 5,
            category: "Collares".to_string(),
            energy: String::new(),
            image: " https://cdn.qorikusi.pe/luna.jpg ".to_string(),
            touched: TouchedFields::default(),
        }
    }

    #[test]
    fn test_submit_trims_and_drops_empty_energy() {
        let request = valid_draft().submit().unwrap();
        assert_eq!(request.nombre, "Collar Luna");
        assert_eq!(request.imagen, "https://cdn.qorikusi.pe/luna.jpg");
        assert_eq!(request.energia_lunar, None);
        assert_eq!(request.stock, 5);
    }

    #[test]
    fn test_submit_keeps_energy() {
        let mut draft = valid_draft();
        draft.energy = "Luna Llena".to_string();
        assert_eq!(draft.submit().unwrap().energia_lunar.as_deref(), Some("Luna Llena"));
    }

    #[test]
    fn test_rules() {
        let draft = ProductDraft {
            name: "Ab".to_string(),
            description: "corta".to_string(),
            price: Decimal::ZERO,
            stock: -1,
            category: String::new(),
            energy: String::new(),
            image: String::new(),
            touched: TouchedFields::default(),
        };
        let errors = draft.validate().unwrap_err();

        assert_eq!(
            errors.get(product_fields::NAME),
            Some(&FieldError::MinLength { required: 3 })
        );
        assert_eq!(
            errors.get(product_fields::DESCRIPTION),
            Some(&FieldError::MinLength { required: 10 })
        );
        assert_eq!(
            errors.get(product_fields::PRICE),
            Some(&FieldError::Min { min: dec!(0.01) })
        );
        assert_eq!(
            errors.get(product_fields::STOCK),
            Some(&FieldError::Min { min: Decimal::ZERO })
        );
        assert_eq!(errors.get(product_fields::CATEGORY), Some(&FieldError::Required));
        assert_eq!(errors.get(product_fields::IMAGE), Some(&FieldError::Required));
        assert!(!errors.has(product_fields::ENERGY));
    }

    #[test]
    fn test_energy_must_be_a_curated_label() {
        let mut draft = valid_draft();
        draft.energy = "Eclipse Solar".to_string();
        assert_eq!(
            draft.validate().unwrap_err().get(product_fields::ENERGY),
            Some(&FieldError::UnknownOption)
        );
        assert!(draft.submit().is_err());
        assert!(draft.touched.is_touched(product_fields::ENERGY));

        draft.energy = "  luna llena ".to_string();
        assert_eq!(draft.submit().unwrap().energia_lunar.as_deref(), Some("Luna Llena"));
    }

    #[test]
    fn test_name_too_long() {
        let mut draft = valid_draft();
        draft.name = "x".repeat(101);
        assert_eq!(
            draft.validate().unwrap_err().get(product_fields::NAME),
            Some(&FieldError::MaxLength { required: 100 })
        );
    }

    #[test]
    fn test_failed_submit_touches_every_field() {
        let mut draft = valid_draft();
        draft.image.clear();
        assert!(draft.submit().is_err());
        assert!(draft.touched.is_touched(product_fields::IMAGE));
        assert!(draft.touched.is_touched(product_fields::NAME));
    }
}
