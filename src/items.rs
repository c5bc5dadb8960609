//! Items

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line item identity.
///
/// Two adds of the same product and variant resolve to the same id and collapse into one
/// line; the same product in a different variant is a separate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Wraps an existing identifier verbatim.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the composite `<product>-<variant>` identity, or the bare product id when
    /// there is no variant.
    pub fn for_product(product_id: &str, variant: Option<&str>) -> Self {
        match variant {
            Some(variant) => Self(format!("{product_id}-{variant}")),
            None => Self(product_id.to_string()),
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A product variant about to be added to a cart.
///
/// Carries every line item field except the quantity, which each add implicitly sets to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Product identifier, the first half of the line identity
    pub product_id: String,

    /// Display name
    pub name: String,

    /// Opaque image reference
    pub image: String,

    /// Display category
    pub category: String,

    /// Price of a single unit in the store's base currency
    pub unit_price: Decimal,

    /// Pre-discount reference price, display only
    pub original_unit_price: Option<Decimal>,

    /// Free-form variant label (size, colour, ...)
    pub variant: Option<String>,
}

impl NewLineItem {
    /// Creates a candidate with no variant, image, category or reference price.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            image: String::new(),
            category: String::new(),
            unit_price,
            original_unit_price: None,
            variant: None,
        }
    }

    /// Sets the variant label.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the pre-discount reference price.
    #[must_use]
    pub fn with_original_price(mut self, original_unit_price: Decimal) -> Self {
        self.original_unit_price = Some(original_unit_price);
        self
    }

    /// The identity this candidate resolves to.
    pub fn id(&self) -> LineItemId {
        LineItemId::for_product(&self.product_id, self.variant.as_deref())
    }

    /// Turns the candidate into a stored line with the given quantity.
    pub fn into_line_item(self, quantity: u32) -> LineItem {
        let id = self.id();

        self.into_line_item_with_id(id, quantity)
    }

    /// Turns the candidate into a stored line under an id that was assigned earlier.
    pub(crate) fn into_line_item_with_id(self, id: LineItemId, quantity: u32) -> LineItem {
        LineItem {
            id,
            name: self.name,
            image: self.image,
            unit_price: self.unit_price,
            original_unit_price: self.original_unit_price,
            category: self.category,
            variant: self.variant,
            quantity,
        }
    }
}

/// A line in the cart.
///
/// Serializes to the persisted snapshot record
/// `{id, name, image, price, originalPrice?, category, size?, quantity}`. Prices are written
/// as JSON numbers carrying every stored digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    id: LineItemId,

    name: String,

    image: String,

    #[serde(
        rename = "price",
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize"
    )]
    unit_price: Decimal,

    #[serde(
        rename = "originalPrice",
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::arbitrary_precision_option::serialize"
    )]
    original_unit_price: Option<Decimal>,

    category: String,

    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    variant: Option<String>,

    quantity: u32,
}

impl LineItem {
    /// Line identity
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image reference
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Display category
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Price of a single unit
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Pre-discount reference price
    pub fn original_unit_price(&self) -> Option<Decimal> {
        self.original_unit_price
    }

    /// Variant label
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity, or `None` if the product overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Overwrites display fields and prices from a newer candidate for the same line.
    pub(crate) fn refresh_from(&mut self, candidate: &NewLineItem) {
        self.name.clone_from(&candidate.name);
        self.image.clone_from(&candidate.image);
        self.category.clone_from(&candidate.category);
        self.unit_price = candidate.unit_price;
        self.original_unit_price = candidate.original_unit_price;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn shirt() -> NewLineItem {
        NewLineItem::new("p1", "Shirt", Decimal::new(1250, 2))
            .with_variant("M")
            .with_image("/img/shirt.png")
            .with_category("tops")
    }

    #[test]
    fn id_joins_product_and_variant() {
        assert_eq!(shirt().id(), LineItemId::new("p1-M"));
    }

    #[test]
    fn id_without_variant_is_product_id() {
        let candidate = NewLineItem::new("p9", "Mug", Decimal::ONE);

        assert_eq!(candidate.id().as_str(), "p9");
    }

    #[test]
    fn different_variants_have_different_ids() {
        let medium = shirt();
        let large = shirt().with_variant("L");

        assert_ne!(medium.id(), large.id());
    }

    #[test]
    fn into_line_item_keeps_fields() {
        let item = shirt().with_original_price(Decimal::from(15)).into_line_item(3);

        assert_eq!(item.id().as_str(), "p1-M");
        assert_eq!(item.name(), "Shirt");
        assert_eq!(item.image(), "/img/shirt.png");
        assert_eq!(item.category(), "tops");
        assert_eq!(item.variant(), Some("M"));
        assert_eq!(item.unit_price(), Decimal::new(1250, 2));
        assert_eq!(item.original_unit_price(), Some(Decimal::from(15)));
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        let item = shirt().into_line_item(4);

        assert_eq!(item.line_total(), Some(Decimal::from(50)));
    }

    #[test]
    fn line_total_overflow_is_none() {
        let item = NewLineItem::new("p1", "Gold", Decimal::MAX).into_line_item(2);

        assert_eq!(item.line_total(), None);
    }

    #[test]
    fn serializes_to_snapshot_record() -> TestResult {
        let item = shirt().into_line_item(2);

        let expected: serde_json::Value = serde_json::from_str(
            r#"{
                "id": "p1-M",
                "name": "Shirt",
                "image": "/img/shirt.png",
                "price": 12.50,
                "category": "tops",
                "size": "M",
                "quantity": 2
            }"#,
        )?;

        assert_eq!(serde_json::to_value(&item)?, expected);

        Ok(())
    }

    #[test]
    fn serialized_price_keeps_every_digit() -> TestResult {
        let price = Decimal::from_i128_with_scale(1_234_567_890_123_456_789, 12);
        let item = NewLineItem::new("p1", "Watch", price).into_line_item(1);

        let json = serde_json::to_string(&item)?;

        assert!(
            json.contains(r#""price":1234567.890123456789"#),
            "price lost precision in {json}"
        );

        Ok(())
    }

    #[test]
    fn refresh_from_overwrites_display_fields_only() {
        let mut item = shirt().into_line_item(2);
        let newer = NewLineItem::new("p1", "Shirt v2", Decimal::from(11)).with_variant("M");

        item.refresh_from(&newer);

        assert_eq!(item.name(), "Shirt v2");
        assert_eq!(item.unit_price(), Decimal::from(11));
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.id().as_str(), "p1-M");
    }
}
