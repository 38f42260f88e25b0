pub mod rows;

#[cfg(test)]
pub mod test_fixtures;
