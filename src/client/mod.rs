//! Client side of the edit workflow
//!
//! [`BookTrackClient`] speaks the REST surface; [`EditFormController`] drives
//! the interactive edit form on top of it, re-using the server's validation
//! rules before anything is sent.

pub mod api;
pub mod edit_form;

pub use api::{BookTrackClient, ClientError, UpdateResponse};
pub use edit_form::{EditForm, EditFormController, Prompter, SelectedImage, SubmitOutcome};
