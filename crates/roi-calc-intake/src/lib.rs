pub mod error;
pub mod fields;
pub mod form;
pub mod validate;
pub mod wizard;

pub use error::{FieldError, ValidationErrors};
pub use fields::*;
pub use form::FormData;
pub use validate::*;
pub use wizard::*;
