//! Core primitives shared by every layer.

pub mod event;

pub use event::{Emitter, Subscription, SubscriptionSet};
