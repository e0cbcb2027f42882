//! Infrastructure implementations for FixPrompt

mod interactive;

pub use interactive::InteractivePrompt;
