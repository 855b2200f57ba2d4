//! Command-line grammar: `devmem [--be] <address> [width [data]]`.
//!
//! Numbers follow the C literal conventions (`0x` hex, leading `0` octal,
//! otherwise decimal). The width is validated here, before any device is
//! opened, and reported with its own exit code.
use std::{ffi::OsString, path::PathBuf};

use clap::{CommandFactory, Parser};
use thiserror::Error;

use crate::soc::{
    access::AccessRequest,
    device::{physical::DEFAULT_DEVICE, AccessWidth, Endianness},
};

pub const BIG_ENDIAN_FLAG: &str = "--be";

#[derive(Debug, Parser)]
#[command(
    name = "devmem",
    version,
    about = "Read and write physical memory through /dev/mem",
    override_usage = "devmem [--be] <ADDRESS> [WIDTH [DATA]]",
    after_help = "The size names are kept for compatibility with other versions of devmem. \
                  The actual access sizes are 8, 16, 32 and 64 bits respectively."
)]
pub struct Args {
    /// Interpret 16, 32 and 64-bit words as big-endian; must be the first argument
    #[arg(long = "be")]
    pub big_endian: bool,

    /// Memory device to map
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,

    /// Memory address to act upon
    #[arg(value_parser = parse_number)]
    pub address: u64,

    /// Access size: [b]yte, [h]alfword, [w]ord, [l]ong
    pub width: Option<String>,

    /// Data to be written
    pub data: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseNumberError {
    #[error("'{0}' is not a number")]
    Invalid(String),
    #[error("'{0}' does not fit in 64 bits")]
    Overflow(String),
}

/// Parse an unsigned integer, choosing the radix from its prefix.
pub fn parse_number(text: &str) -> Result<u64, ParseNumberError> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseNumberError::Invalid(text.to_string()));
    }
    u64::from_str_radix(digits, radix).map_err(|_| ParseNumberError::Overflow(text.to_string()))
}

#[derive(Debug, Error)]
pub enum UsageError {
    #[error(transparent)]
    Arguments(#[from] clap::Error),
    #[error("'{BIG_ENDIAN_FLAG}' must be the first argument")]
    BigEndianNotFirst,
    #[error("Illegal data type '{0}'.")]
    InvalidWidth(String),
    #[error("invalid data: {0}")]
    InvalidData(#[source] ParseNumberError),
}

impl UsageError {
    pub fn exit_code(&self) -> u8 {
        match self {
            UsageError::Arguments(err) if !err.use_stderr() => 0,
            UsageError::InvalidWidth(_) => 2,
            _ => 1,
        }
    }

    /// Print the error the way the user should see it, with usage where it helps.
    pub fn report(&self) {
        match self {
            UsageError::Arguments(err) => {
                // Help and version requests land here too; clap knows the stream.
                let _ = err.print();
            }
            UsageError::BigEndianNotFirst | UsageError::InvalidData(_) => {
                eprintln!("{self}");
                eprintln!("\n{}", Args::command().render_usage());
            }
            UsageError::InvalidWidth(_) => eprintln!("{self}"),
        }
    }
}

/// A parsed command line, ready to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub device: PathBuf,
    pub request: AccessRequest,
}

impl Invocation {
    /// Parse a full argument vector, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.iter().skip(2).any(|arg| arg == BIG_ENDIAN_FLAG) {
            return Err(UsageError::BigEndianNotFirst);
        }
        Args::try_parse_from(args)?.into_invocation()
    }
}

impl Args {
    pub fn into_invocation(self) -> Result<Invocation, UsageError> {
        let width = match self.width {
            None => AccessWidth::default(),
            Some(selector) => {
                let letter = selector.chars().next();
                letter
                    .and_then(AccessWidth::from_selector)
                    .ok_or(UsageError::InvalidWidth(selector))?
            }
        };
        let order = Endianness::from_big_endian_flag(self.big_endian);
        // Width errors take precedence over data errors.
        let request = match self.data {
            Some(data) => {
                let value = parse_number(&data).map_err(UsageError::InvalidData)?;
                AccessRequest::write(self.address, width, order, value)
            }
            None => AccessRequest::read(self.address, width, order),
        };
        Ok(Invocation {
            device: self.device,
            request,
        })
    }
}
