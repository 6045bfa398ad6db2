pub mod impl_console;
pub mod impl_file;
pub mod impl_multi;
pub mod interface;
