//! Errors raised while constructing a card group.
//!
//! Selection operations themselves never fail; only a group whose initial
//! value does not fit its selection mode is rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("group value shape does not match selection mode (multiple = {multiple})")]
    ModeMismatch { multiple: bool },
}
