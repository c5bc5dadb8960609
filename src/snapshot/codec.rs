//! Snapshot encoding
//!
//! Snapshots are written as a bare JSON array of line items. Reading also accepts the
//! object shapes earlier writers produced, `{"items": [...]}` and the browser persistence
//! envelope `{"state": {"items": [...]}, "version": 0}`. Any totals stored next to the items
//! are ignored; a restored cart always recalculates them.
//!
//! A stored line whose quantity is zero, negative or too large for a line is dropped on its
//! own; the rest of the snapshot is kept.

use rust_decimal::Decimal;
use serde::{Deserialize, de::Error as _};
use tracing::warn;

use crate::items::{LineItem, LineItemId, NewLineItem};

use super::SnapshotError;

/// A line as read back from storage.
#[derive(Deserialize)]
struct StoredLine {
    id: LineItemId,

    name: String,

    #[serde(default)]
    image: String,

    #[serde(
        rename = "price",
        deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize"
    )]
    unit_price: Decimal,

    #[serde(
        rename = "originalPrice",
        default,
        deserialize_with = "rust_decimal::serde::arbitrary_precision_option::deserialize"
    )]
    original_unit_price: Option<Decimal>,

    #[serde(default)]
    category: String,

    #[serde(rename = "size", default)]
    variant: Option<String>,

    quantity: i64,
}

impl StoredLine {
    fn into_line_item(self) -> Option<LineItem> {
        if self.quantity <= 0 {
            warn!(
                id = %self.id,
                quantity = self.quantity,
                "dropping snapshot line without units"
            );

            return None;
        }

        let Ok(quantity) = u32::try_from(self.quantity) else {
            warn!(
                id = %self.id,
                quantity = self.quantity,
                "dropping snapshot line with oversized quantity"
            );

            return None;
        };

        // The stored id is authoritative, so no product id is needed to rebuild the line.
        let candidate = NewLineItem {
            product_id: String::new(),
            name: self.name,
            image: self.image,
            category: self.category,
            unit_price: self.unit_price,
            original_unit_price: self.original_unit_price,
            variant: self.variant,
        };

        Some(candidate.into_line_item_with_id(self.id, quantity))
    }
}

#[derive(Deserialize)]
struct StoredObject {
    items: Option<Vec<StoredLine>>,
    state: Option<StoredState>,
}

#[derive(Deserialize)]
struct StoredState {
    items: Vec<StoredLine>,
}

/// Encode line items as a snapshot.
///
/// # Errors
///
/// Returns a [`SnapshotError::Codec`] if an item cannot be serialized.
pub fn encode(items: &[LineItem]) -> Result<Vec<u8>, SnapshotError> {
    Ok(serde_json::to_vec(items)?)
}

/// Decode line items from a snapshot.
///
/// Prices may be stored as JSON numbers or strings.
///
/// # Errors
///
/// Returns a [`SnapshotError::Codec`] if the bytes are not one of the accepted shapes.
pub fn decode(bytes: &[u8]) -> Result<Vec<LineItem>, SnapshotError> {
    let lines = if starts_with_array(bytes) {
        serde_json::from_slice::<Vec<StoredLine>>(bytes)?
    } else {
        let object: StoredObject = serde_json::from_slice(bytes)?;

        match (object.state, object.items) {
            (Some(state), _) => state.items,
            (None, Some(items)) => items,
            (None, None) => return Err(serde_json::Error::missing_field("items").into()),
        }
    };

    Ok(lines
        .into_iter()
        .filter_map(StoredLine::into_line_item)
        .collect())
}

fn starts_with_array(bytes: &[u8]) -> bool {
    bytes.iter().find(|byte| !byte.is_ascii_whitespace()) == Some(&b'[')
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::{Cart, MergePolicy};

    use super::*;

    fn items() -> Vec<LineItem> {
        vec![
            NewLineItem::new("p1", "Shirt", Decimal::from(10))
                .with_variant("M")
                .into_line_item(2),
            NewLineItem::new("p2", "Cap", Decimal::new(55, 1))
                .with_original_price(Decimal::from(7))
                .into_line_item(1),
        ]
    }

    #[test]
    fn decode_reads_what_encode_writes() -> TestResult {
        let bytes = encode(&items())?;

        assert_eq!(decode(&bytes)?, items());

        Ok(())
    }

    #[test]
    fn high_precision_prices_survive_a_round_trip() -> TestResult {
        let price = Decimal::from_i128_with_scale(1_234_567_890_123_456_789, 12);
        let original = Decimal::from_i128_with_scale(2_000_000_000_000_000_000_001, 15);

        let written = vec![
            NewLineItem::new("p1", "Watch", price)
                .with_original_price(original)
                .into_line_item(1),
        ];

        let restored = Cart::restore(decode(&encode(&written)?)?, MergePolicy::KeepFirst)?;
        let line = restored.items().first().ok_or("expected a line")?;

        assert_eq!(line.unit_price(), price);
        assert_eq!(line.original_unit_price(), Some(original));
        assert_eq!(restored.subtotal(), price);

        Ok(())
    }

    #[test]
    fn encode_writes_only_items() -> TestResult {
        let value: serde_json::Value = serde_json::from_slice(&encode(&items())?)?;

        assert!(value.is_array(), "snapshot must be a bare array");

        Ok(())
    }

    #[test]
    fn decode_accepts_numeric_and_string_prices() -> TestResult {
        let bytes = br#"[{"id": "p2", "name": "Cap", "image": "", "price": 29.5,
                          "originalPrice": "35.00", "category": "hats", "quantity": 1}]"#;

        let items = decode(bytes)?;
        let item = items.first().ok_or("expected a line")?;

        assert_eq!(item.id().as_str(), "p2");
        assert_eq!(item.unit_price(), Decimal::new(295, 1));
        assert_eq!(item.original_unit_price(), Some(Decimal::new(3500, 2)));
        assert_eq!(item.variant(), None);

        Ok(())
    }

    #[test]
    fn decode_accepts_persistence_envelope_and_ignores_totals() -> TestResult {
        let bytes = br#"{
            "state": {
                "items": [
                    {"id": "p1-M", "name": "Shirt", "image": "", "price": 10,
                     "category": "tops", "size": "M", "quantity": 2}
                ],
                "total": 999,
                "totalItems": 42
            },
            "version": 0
        }"#;

        let items = decode(bytes)?;

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(LineItem::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn decode_accepts_items_object() -> TestResult {
        let bytes = br#"{"items": [], "subtotal": 12}"#;

        assert!(decode(bytes)?.is_empty());

        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"not json"), Err(SnapshotError::Codec(_))));
        assert!(matches!(
            decode(br#"{"cart": []}"#),
            Err(SnapshotError::Codec(_))
        ));
    }

    #[test]
    fn decode_errors_name_the_offending_field() {
        let bytes = br#"[{"id": "p1", "name": "Shirt", "price": 1}]"#;

        let message = decode(bytes).map_or_else(|error| error.to_string(), |_| String::new());

        assert!(
            message.contains("missing field `quantity`"),
            "unexpected error {message:?}"
        );
    }

    #[test]
    fn lines_without_positive_quantity_are_dropped_individually() -> TestResult {
        let bytes = br#"[
            {"id": "p1", "name": "Shirt", "price": 1, "quantity": 2},
            {"id": "p2", "name": "Cap", "price": 1, "quantity": -1},
            {"id": "p3", "name": "Mug", "price": 1, "quantity": 0},
            {"id": "p4", "name": "Pin", "price": 1, "quantity": 99999999999}
        ]"#;

        let items = decode(bytes)?;
        let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();

        assert_eq!(ids, vec!["p1"]);
        assert_eq!(items.first().map(LineItem::quantity), Some(2));

        Ok(())
    }
}
