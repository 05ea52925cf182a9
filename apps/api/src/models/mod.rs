pub mod application_form;
pub mod form_template;
pub mod job;
pub mod submission;
pub mod user;
