pub mod document;
pub mod job_card;
pub mod job_card_template;
