pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
