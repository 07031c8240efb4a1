use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment record, one shape per method.
///
/// The `method` tag selects the active shape. Fields of the other shapes do not
/// exist while a method is active, so a card number can never be read off a
/// pix payment.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method")]
pub enum Payment {
    #[default]
    #[serde(rename = "")]
    Unselected,
    #[serde(rename = "credit")]
    Credit(CardPayment),
    #[serde(rename = "debit")]
    Debit(CardPayment),
    #[serde(rename = "pix")]
    Pix(PixPayment),
    #[serde(rename = "boleto")]
    Boleto(BoletoPayment),
}

impl Payment {
    /// Build a fresh payment record for `method`.
    ///
    /// Switching methods always goes through here, so nothing entered for a
    /// previous method survives the switch, not even when the same method is
    /// selected again.
    #[must_use]
    pub fn for_method(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Unselected => Payment::Unselected,
            PaymentMethod::Credit => Payment::Credit(CardPayment::new(CardType::Credit)),
            PaymentMethod::Debit => Payment::Debit(CardPayment::new(CardType::Debit)),
            PaymentMethod::Pix => Payment::Pix(PixPayment::default()),
            PaymentMethod::Boleto => Payment::Boleto(BoletoPayment::default()),
        }
    }

    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        match self {
            Payment::Unselected => PaymentMethod::Unselected,
            Payment::Credit(_) => PaymentMethod::Credit,
            Payment::Debit(_) => PaymentMethod::Debit,
            Payment::Pix(_) => PaymentMethod::Pix,
            Payment::Boleto(_) => PaymentMethod::Boleto,
        }
    }

    #[must_use]
    pub fn boleto_address(&self) -> Option<&BoletoAddress> {
        match self {
            Payment::Boleto(boleto) => Some(&boleto.boleto_address),
            _ => None,
        }
    }

    pub fn boleto_address_mut(&mut self) -> Option<&mut BoletoAddress> {
        match self {
            Payment::Boleto(boleto) => Some(&mut boleto.boleto_address),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "")]
    Unselected,
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "boleto")]
    Boleto,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Unselected => "",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardPayment {
    pub card_type: CardType,
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String, // MM/YY
    pub cvv: String,
    pub billing_address: BillingAddress,
}

impl CardPayment {
    #[must_use]
    pub fn new(card_type: CardType) -> Self {
        Self {
            card_type,
            card_number: String::new(),
            card_holder: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            billing_address: BillingAddress::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PixPayment {
    /// The pix key; a CPF document number in the current form.
    pub cpf: String,
    pub pix_name: String,
    pub pix_email: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoletoPayment {
    /// CPF (11 digits) or CNPJ (14 digits).
    pub boleto_document: String,
    pub boleto_name: String,
    pub boleto_address: BoletoAddress,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoletoAddress {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}
