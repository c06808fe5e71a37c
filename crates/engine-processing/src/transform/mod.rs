pub mod pipeline;
pub mod rules;
pub mod token;

pub use pipeline::RecordTransformer;
pub use rules::MaskRules;
