//! Read-only receipt projection of a finalized order.

use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

use super::Order;

/// The additional-appliances line of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalUnitsLine {
    pub count: u32,
    pub unit_price: Money,
    pub cost: Money,
}

/// A receipt rendered from a placed order.
///
/// Every amount is read from the order snapshot — the total is the value
/// captured at submission time, never recomputed from live session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub order_date: String,
    pub package_title: String,
    pub base_price: Money,
    /// Present only when appliances were added to a package that prices them.
    pub additional: Option<AdditionalUnitsLine>,
    pub total_cost: Money,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_city: String,
}

impl Receipt {
    /// Projects an order into its receipt.
    pub fn for_order(order: &Order) -> Self {
        let additional = match order.package().additional_unit_price() {
            Some(unit_price) if order.additional_units() > 0 => Some(AdditionalUnitsLine {
                count: order.additional_units(),
                unit_price,
                cost: unit_price.multiply(order.additional_units()),
            }),
            _ => None,
        };

        Self {
            order_id: order.order_id().clone(),
            order_date: order.order_date().to_string(),
            package_title: order.package().title().to_string(),
            base_price: order.package().base_price(),
            additional,
            total_cost: order.total_cost(),
            customer_name: order.customer().full_name().to_string(),
            customer_phone: order.customer().phone().to_string(),
            customer_city: order.customer().city().to_string(),
        }
    }
}
