use serde::{Deserialize, Serialize};

/// Description sent when the caller leaves it blank
pub const DEFAULT_PAY_DESCRIPTION: &str = "Default description";

/// Collection order initiated by the merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRequest {
    /// Merchant order number, unique per caller
    pub order_no: String,

    /// Amount in minor units (`"10050"` = 100.50)
    pub amount: String,

    /// Payer display name
    pub username: String,

    pub description: String,
}

impl PayRequest {
    pub fn new(
        order_no: impl Into<String>,
        amount: impl Into<String>,
        username: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            order_no: order_no.into(),
            amount: amount.into(),
            username: username.into(),
            description: if description.is_empty() {
                DEFAULT_PAY_DESCRIPTION.to_string()
            } else {
                description
            },
        }
    }
}
