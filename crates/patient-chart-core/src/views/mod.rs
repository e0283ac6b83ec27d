//! Text views: the patient list and the add-patient form.

mod form;
mod list;

pub use form::*;
pub use list::*;
