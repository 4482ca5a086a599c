pub mod file;
pub mod logging;
#[cfg(test)]
pub mod test_utils;
