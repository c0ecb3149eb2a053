pub mod assign;
pub mod config;
pub mod dispatch;
pub mod fabric;
pub mod input;
pub mod parse;
pub mod query;
pub mod sim;

#[cfg(test)]
mod test;
