pub mod caller;
pub mod course;
pub mod error;
pub mod pagination;
pub mod resource;
pub mod review;
pub mod service;

#[cfg(test)]
mod test_support;
