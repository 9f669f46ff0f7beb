pub mod match_form;
pub mod results;
