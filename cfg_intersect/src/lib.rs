pub mod cfg;
pub mod error;
pub mod fa;
pub mod input_symbol;
pub mod intersection;
pub mod language;
pub mod pipeline;
