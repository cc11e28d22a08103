//! `idlewatch-moderation`: who is inactive, and what to do about it.
//!
//! [`engine`] holds the pure selection and planning logic; [`Moderator`]
//! executes a plan against a [`idlewatch_core::ChatPlatform`].

pub mod action;
pub mod engine;
pub mod moderator;
pub mod report;

pub use action::ModerationAction;
pub use engine::{inactive_days, plan, select, RemovalCall};
pub use moderator::{ActionReport, MemberOutcome, ModerationPolicy, Moderator};
