pub mod fixtures;
pub mod test_env;

pub use test_env::TestEnvironment;
