//! Lexer module for tokenizing source code

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
