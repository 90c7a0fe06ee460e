pub mod coin_parser;

pub use coin_parser::{CoinTableParser, Parser};
