pub mod build;
pub mod merge;
pub mod panels;
pub mod summary;
#[cfg(test)]
mod tests;
