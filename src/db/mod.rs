pub mod connection;
pub mod leads;
