//! status.rs -> values the entrypoint returns to the host
//!
//! Builtin statuses occupy the upper 32 bits of the return value.
//! Programs may define their own status values but they must be confined to the lower 32 bits.

use solana_program::{entrypoint::ProgramResult, program_error::ProgramError};

pub const SUCCESS: u64 = 0;

const BUILTIN_BIT_SHIFT: u32 = 32;

/// Move a builtin status code into the upper 32 bits
pub const fn to_builtin(code: u64) -> u64 {
	assert!(code >> BUILTIN_BIT_SHIFT == 0, "builtin status codes fit in 32 bits");
	code << BUILTIN_BIT_SHIFT
}

pub const CUSTOM_ZERO: u64 = to_builtin(1);
pub const INVALID_ARGUMENT: u64 = to_builtin(2);
pub const INVALID_INSTRUCTION_DATA: u64 = to_builtin(3);
pub const INVALID_ACCOUNT_DATA: u64 = to_builtin(4);
pub const ACCOUNT_DATA_TOO_SMALL: u64 = to_builtin(5);
pub const INSUFFICIENT_FUNDS: u64 = to_builtin(6);
pub const INCORRECT_PROGRAM_ID: u64 = to_builtin(7);
pub const MISSING_REQUIRED_SIGNATURES: u64 = to_builtin(8);
pub const ACCOUNT_ALREADY_INITIALIZED: u64 = to_builtin(9);
pub const UNINITIALIZED_ACCOUNT: u64 = to_builtin(10);
pub const NOT_ENOUGH_ACCOUNT_KEYS: u64 = to_builtin(11);
pub const ACCOUNT_BORROW_FAILED: u64 = to_builtin(12);
pub const MAX_SEED_LENGTH_EXCEEDED: u64 = to_builtin(13);
pub const INVALID_SEEDS: u64 = to_builtin(14);

/// Status for a program specific error code. Code 0 would read as success and is reported as [`CUSTOM_ZERO`].
pub const fn custom(code: u32) -> u64 {
	if code == 0 {
		CUSTOM_ZERO
	} else {
		code as u64
	}
}

/// Whether `status` lies in the builtin (upper 32 bit) range
pub const fn is_builtin(status: u64) -> bool {
	status >> BUILTIN_BIT_SHIFT != 0
}

/// Convert a processor result into the value handed back to the host
pub fn to_status(result: ProgramResult) -> u64 {
	match result {
		Ok(()) => SUCCESS,
		Err(error) => error.into(),
	}
}

/// Convert a status returned by the host, e.g. from a cross-program invocation, back into a result
pub fn from_status(status: u64) -> ProgramResult {
	match status {
		SUCCESS => Ok(()),
		status => Err(ProgramError::from(status)),
	}
}
