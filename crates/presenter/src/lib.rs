//! Renders the life of a queued generation job into one chat message.
//!
//! [`presenter::ProgressPresenter`] consumes the poller's progress stream
//! and replaces the content of a single [`sink::ProgressSink`] message on
//! every observation, ending with the generated image or an error.
//! [`session::RequestSession`] ties one user request to a presenter and
//! the follow-up regenerate offer.

pub mod presenter;
pub mod regenerate;
pub mod render;
pub mod session;
pub mod sink;

pub use presenter::{GenerationOutcome, PresentError, PresenterSettings, ProgressPresenter};
pub use regenerate::{ChoiceHandle, Pick, Regeneration};
pub use session::RequestSession;
pub use sink::{Card, CardField, CardFooter, ChoiceOption, ChoicePrompt, Message, ProgressSink, SinkError};
