//! Cart predicates that decide whether an extra field group is shown.

use serde::{Deserialize, Serialize};

/// One product line in the shopper's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    pub quantity: u32,
}

impl LineItem {
    #[must_use]
    pub fn new(product_id: u64, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Read-only view of the cart handed to policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContext {
    items: Vec<LineItem>,
}

impl CartContext {
    #[must_use]
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains_product(&self, product_id: u64) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}

impl FromIterator<LineItem> for CartContext {
    fn from_iter<T: IntoIterator<Item = LineItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// A pure, deterministic predicate over the cart.
///
/// Implementations must not have side effects; the same context always
/// yields the same answer.
pub trait Policy: Send + Sync {
    fn applies(&self, context: &CartContext) -> bool;

    /// Short human-readable form used in log lines.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

impl<F> Policy for F
where
    F: Fn(&CartContext) -> bool + Send + Sync,
{
    fn applies(&self, context: &CartContext) -> bool {
        self(context)
    }
}

/// Matches when any line item is the given product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainsProduct {
    product_id: u64,
}

impl Policy for ContainsProduct {
    fn applies(&self, context: &CartContext) -> bool {
        context.contains_product(self.product_id)
    }

    fn describe(&self) -> String {
        format!("contains_product({})", self.product_id)
    }
}

/// Matches when any line item is one of the given products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyOf {
    product_ids: Vec<u64>,
}

impl Policy for AnyOf {
    fn applies(&self, context: &CartContext) -> bool {
        context
            .items()
            .iter()
            .any(|item| self.product_ids.contains(&item.product_id))
    }

    fn describe(&self) -> String {
        let ids: Vec<String> = self.product_ids.iter().map(u64::to_string).collect();
        format!("any_of({})", ids.join(","))
    }
}

#[must_use]
pub fn contains_product(product_id: u64) -> ContainsProduct {
    ContainsProduct { product_id }
}

#[must_use]
pub fn any_of(product_ids: impl IntoIterator<Item = u64>) -> AnyOf {
    AnyOf {
        product_ids: product_ids.into_iter().collect(),
    }
}
