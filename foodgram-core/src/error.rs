use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::types::MembershipKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortLinkError {
    #[error("Short link token is empty")]
    Empty,

    #[error("Invalid character {0:?} in short link token")]
    InvalidCharacter(char),

    #[error("Short link token is out of range")]
    OutOfRange,
}

/// Failure reported by a persistence backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The insert collided with a uniqueness constraint.
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Check constraint violated")]
    CheckViolation,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Recipe is already in {}", .0.label())]
    AlreadyMember(MembershipKind),

    #[error("Recipe is not in {}", .0.label())]
    NotMember(MembershipKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("You cannot subscribe to yourself")]
    SelfSubscription,

    #[error("You are already subscribed to this user")]
    AlreadySubscribed,

    #[error("You are not subscribed to this user")]
    NotSubscribed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Field-level validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
