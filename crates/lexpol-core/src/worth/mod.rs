pub mod expr;
pub mod merit;
mod ops;
pub mod reward;

#[cfg(test)]
mod tests;
