pub mod form_data;
pub mod handlers;
pub mod intake;
pub mod listing;
pub mod scoring;
