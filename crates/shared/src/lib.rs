pub mod domain;
pub mod error;
pub mod gateway;
pub mod view;
