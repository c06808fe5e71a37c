pub mod mask_type;
pub mod value;
