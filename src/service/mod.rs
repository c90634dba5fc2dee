//! CrudService: generic list/read/save/delete over entity definitions.

mod crud;
mod validation;
pub use crud::{CrudService, Page, SaveOutcome};
pub(crate) use crud::{execute, fetch_by_id, insert_returning_id, linked_summaries, reference_summary, replace_links};
pub use validation::{RequestValidator, SaveRequest, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
