use std::str::FromStr;

/// One user-editable input of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Amount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Amount => "amount",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "amount" => Ok(Self::Amount),
            other => Err(format!("{} is not a checkout form field.", other)),
        }
    }
}

/// Raw, unvalidated form input. The amount stays text until the endpoint sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub email: String,
    pub amount: String,
}

impl FormFields {
    pub fn new(email: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            amount: amount.into(),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Email => self.email = value,
            Field::Amount => self.amount = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
