pub mod dashboard;
pub mod rest;
