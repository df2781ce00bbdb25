pub mod cfg;
pub mod normal_form;
pub mod production;
pub mod reduce;
pub mod terminal;
pub mod text;
pub mod variable;
