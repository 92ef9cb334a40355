pub mod schema;

#[cfg(test)]
pub mod fake;
