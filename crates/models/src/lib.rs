pub mod errors;
pub mod db;
pub mod system;

#[cfg(test)]
mod tests;
