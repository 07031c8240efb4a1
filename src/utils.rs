pub mod field_path;

pub use field_path::{FieldPathError, get_field, set_field};
