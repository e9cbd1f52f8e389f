pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod token;

pub use ast::*;
pub use diagnostic::*;
pub use error::*;
pub use token::*;
