//! Mapped pages of system memory and typed access to the registers behind them.

pub mod access;
pub mod device;
