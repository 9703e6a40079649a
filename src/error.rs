//! error.rs -> decoding and program specific errors

use thiserror::Error;

use solana_program::program_error::ProgramError;

/// Reasons the serialized input could not be decoded
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
	/// The host handed over a null input pointer
	#[error("Null Input")]
	NullInput,

	/// A field would extend past the end of the input
	#[error("Read of {len} bytes at offset {offset} exceeds input of {input_len} bytes")]
	OutOfBounds {
		offset: usize,
		len: usize,
		input_len: usize,
	},

	/// A declared length pushes the cursor past the address space
	#[error("Length {len} at offset {offset} overflows")]
	LengthOverflow { offset: usize, len: usize },

	/// A duplicate marker does not point at an earlier record
	#[error("Record {index} duplicates record {marker}, which is not an earlier record")]
	InvalidDuplicate { index: usize, marker: u8 },
}

/// Every decoding failure reaches the host as an invalid argument
impl From<DecodeError> for ProgramError {
	fn from(_: DecodeError) -> Self {
		ProgramError::InvalidArgument
	}
}


#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// Invalid instruction
	#[error("Invalid Instruction")]
	InvalidInstruction,

	/// Username empty or longer than a seed may be
	#[error("Invalid Username")]
	InvalidUsername,

	/// The username account is no longer owned by the system program
	#[error("Username Already Taken")]
	UsernameTaken,

	/// The username account is not the address derived from the username
	#[error("Username Address Mismatch")]
	AddressMismatch,

	/// The memo program refused the username
	#[error("Username Rejected By Memo Program")]
	UsernameRejected,
}

impl From<RegistryError> for ProgramError {
	fn from(e: RegistryError) -> Self {
		ProgramError::Custom(e as u32)
	}
}
