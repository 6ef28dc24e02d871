//! JSON bridge for renderers outside Rust.
//!
//! Values in the store are type-erased, so the concrete type is recovered
//! from the path. Unknown paths and type mismatches yield `None`.

use serde_json::Value;

use super::{
    CartItemsView, CheckoutView, NumpadView, PanelView, View, ViewStore, ViewValue,
};
use crate::customer::{CustomerView, TransactionsView};
use crate::totals::TotalsView;

fn encode<V: View>(value: &ViewValue) -> Option<Value> {
    value
        .downcast_ref::<V>()
        .and_then(|v| serde_json::to_value(v).ok())
}

/// Serialize the value published at `path`.
pub fn to_json(path: &str, value: &ViewValue) -> Option<Value> {
    if path == CartItemsView::PATH {
        return encode::<CartItemsView>(value);
    }
    if path == TotalsView::PATH {
        return encode::<TotalsView>(value);
    }
    if path == CheckoutView::PATH {
        return encode::<CheckoutView>(value);
    }
    if path == PanelView::PATH {
        return encode::<PanelView>(value);
    }
    if path == NumpadView::PATH {
        return encode::<NumpadView>(value);
    }
    if path == CustomerView::PATH {
        return encode::<CustomerView>(value);
    }
    if path == TransactionsView::PATH {
        return encode::<TransactionsView>(value);
    }
    None
}

pub fn to_json_bytes(path: &str, value: &ViewValue) -> Option<Vec<u8>> {
    to_json(path, value).and_then(|v| serde_json::to_vec(&v).ok())
}

/// Read `path` from the store as JSON.
pub fn get(store: &ViewStore, path: &str) -> Option<Value> {
    to_json(path, &store.get(path)?)
}

/// The whole store as one JSON object keyed by path.
pub fn dump(store: &ViewStore) -> Value {
    let map = store
        .snapshot()
        .into_iter()
        .filter_map(|(path, value)| to_json(&path, &value).map(|json| (path, json)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::CheckoutAction;

    #[test]
    fn known_path_serializes() {
        let mut store = ViewStore::new();
        store.set(
            CheckoutView::PATH,
            CheckoutView {
                action: CheckoutAction::EditCart,
                highlighted: true,
            },
        );
        let json = get(&store, CheckoutView::PATH).unwrap();
        assert_eq!(json["action"], "edit_cart");
        assert_eq!(json["highlighted"], true);
    }

    #[test]
    fn wrong_type_or_unknown_path_is_none() {
        let mut store = ViewStore::new();
        store.set(PanelView::PATH, 42u32);
        store.set("something/else", 1u8);
        assert!(get(&store, PanelView::PATH).is_none());
        assert!(get(&store, "something/else").is_none());
        assert!(get(&store, "missing").is_none());
    }

    #[test]
    fn dump_skips_unserializable_entries() {
        let mut store = ViewStore::new();
        store.set(PanelView::PATH, PanelView { visible: true, numpad: false });
        store.set("scratch", 1u8);
        let all = dump(&store);
        assert_eq!(all.as_object().unwrap().len(), 1);
        assert_eq!(all["cart/panel"]["numpad"], false);
    }

    #[test]
    fn bytes_are_valid_json() {
        let value = ViewValue::new(TotalsView::default());
        let bytes = to_json_bytes(TotalsView::PATH, &value).unwrap();
        let back: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back["grand_total"], "0.00");
        assert!(back["taxes"].is_null());
    }
}
