//! Input-field capability surface for the presentation layer.
//!
//! A UI toolkit wraps these models with its own widgets; this is the entire
//! surface it may depend on. State is per-field, ephemeral and never
//! persisted.

use cards::{is_valid_card_number, is_valid_expiry_text, is_valid_holder_name, CardBrand};
use masking::{PeekInterface, Secret};

/// Capabilities every payment input field exposes to the UI layer.
pub trait InputField {
    /// Whether nothing has been entered.
    fn is_empty(&self) -> bool;
    /// Whether the current content passes the field's validation.
    fn is_valid(&self) -> bool;
    /// Clear the field.
    fn reset(&mut self);
}

/// Card number entry state.
#[derive(Debug, Default)]
pub struct CardNumberField {
    value: Secret<String>,
}

impl CardNumberField {
    /// Replace the field content.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Secret::new(value.into());
    }

    /// Brand of the (possibly partial) number, for the UI's brand icon.
    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(self.value.peek())
    }

    /// Current content.
    pub fn value(&self) -> &Secret<String> {
        &self.value
    }
}

impl InputField for CardNumberField {
    fn is_empty(&self) -> bool {
        self.value.peek().is_empty()
    }

    fn is_valid(&self) -> bool {
        is_valid_card_number(self.value.peek())
    }

    fn reset(&mut self) {
        self.value = Secret::default();
    }
}

/// Expiry entry state, over raw "MM/YY"-style text.
#[derive(Debug, Default)]
pub struct CardExpiryField {
    text: String,
}

impl CardExpiryField {
    /// Replace the field content.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl InputField for CardExpiryField {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn is_valid(&self) -> bool {
        is_valid_expiry_text(&self.text)
    }

    fn reset(&mut self) {
        self.text.clear();
    }
}

/// Security code entry state.
#[derive(Debug, Default)]
pub struct CardCvvField {
    value: Secret<String>,
}

impl CardCvvField {
    /// Replace the field content.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Secret::new(value.into());
    }

    /// Current content, for building card details.
    pub fn value(&self) -> &Secret<String> {
        &self.value
    }
}

impl InputField for CardCvvField {
    fn is_empty(&self) -> bool {
        self.value.peek().is_empty()
    }

    fn is_valid(&self) -> bool {
        self.value.peek().parse::<cards::CardSecurityCode>().is_ok()
    }

    fn reset(&mut self) {
        self.value = Secret::default();
    }
}

/// Cardholder name entry state.
#[derive(Debug, Default)]
pub struct CardHolderNameField {
    value: String,
}

impl CardHolderNameField {
    /// Replace the field content.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl InputField for CardHolderNameField {
    fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn is_valid(&self) -> bool {
        is_valid_holder_name(&self.value)
    }

    fn reset(&mut self) {
        self.value.clear();
    }
}
