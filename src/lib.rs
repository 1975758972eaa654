#[macro_use]
pub mod macros;

pub mod api;
pub mod crawler;
pub mod fs_csv_util;
pub mod mojo;
