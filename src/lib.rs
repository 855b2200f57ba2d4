pub mod cli;
pub mod soc;
