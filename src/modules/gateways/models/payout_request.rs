use serde::{Deserialize, Serialize};

/// Disbursement to a PIX destination
///
/// `card_type`, `wallet_id` and `description` are refinements set after
/// construction; `None` means the field is left out of the outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub order_no: String,

    /// Amount in minor units
    pub amount: String,

    /// Payee name
    pub username: String,

    /// PIX key: email, phone number or other account identifier
    pub pix_account: String,

    /// Payee taxpayer id (CPF)
    pub cpf: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PayoutRequest {
    pub fn new(
        order_no: impl Into<String>,
        amount: impl Into<String>,
        username: impl Into<String>,
        pix_account: impl Into<String>,
        cpf: impl Into<String>,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            amount: amount.into(),
            username: username.into(),
            pix_account: pix_account.into(),
            cpf: cpf.into(),
            card_type: None,
            wallet_id: None,
            description: None,
        }
    }

    /// Sets the optional refinements; empty strings leave a field unset
    pub fn with_extra_info(
        mut self,
        card_type: impl Into<String>,
        wallet_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        if let Some(v) = non_empty(card_type.into()) {
            self.card_type = Some(v);
        }
        if let Some(v) = non_empty(wallet_id.into()) {
            self.wallet_id = Some(v);
        }
        if let Some(v) = non_empty(description.into()) {
            self.description = Some(v);
        }
        self
    }

    pub fn with_card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = non_empty(card_type.into());
        self
    }

    pub fn with_wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = non_empty(wallet_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description.into());
        self
    }

    /// True when the payee is identified by taxpayer id
    pub fn has_taxpayer_id(&self) -> bool {
        !self.cpf.trim().is_empty() || self.card_type.as_deref() == Some("CPF")
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
