//! macros.rs -> declaring a program entrypoint over the zero-copy decoder

use solana_program::{entrypoint::ProgramResult, msg};

use crate::{
	deserialize::{deserialize_raw, DecodedMessage},
	status::{to_status, INVALID_ARGUMENT},
};

/// Decode the input at `input` into at most `max_accounts` views and hand it to `process`,
/// returning the status the loader expects. This is the body of [`program_entrypoint!`].
///
/// # Safety
///
/// `input` must be null or point to a serialized input that stays valid, and is not accessed
/// through any other path, for the duration of the call.
pub unsafe fn process_entrypoint<F>(input: *mut u8, max_accounts: usize, process: F) -> u64
where
	F: FnOnce(&DecodedMessage) -> ProgramResult,
{
	let message = match unsafe { deserialize_raw(input, max_accounts) } {
		Ok(message) => message,
		Err(error) => {
			msg!("[FlatInput] ERROR: {}", error);
			return INVALID_ARGUMENT;
		}
	};
	to_status(process(&message))
}

/// Declare the program entrypoint and set up the global handlers.
///
/// The first argument names the processing function, the second the number of
/// accounts it wants views for. Further accounts are walked and skipped, and the
/// function can tell from [`DecodedMessage::declared_accounts`] how many there were.
///
/// ```ignore
/// fn process_instruction(
///     message: &DecodedMessage,   // Views of the first `max_accounts` accounts, the declared
///                                 // account count, the instruction data and the program id
/// ) -> ProgramResult;
///
/// program_entrypoint!(process_instruction, 4);
/// ```
///
/// [`DecodedMessage::declared_accounts`]: crate::deserialize::DecodedMessage::declared_accounts
///
/// A null input is answered with `INVALID_ARGUMENT`, as is any input that fails to decode.
/// The default heap and panic handler are left out when the calling crate enables its
/// `custom-heap` or `custom-panic` feature.
#[macro_export]
macro_rules! program_entrypoint {
	($process_instruction:ident, $max_accounts:expr) => {
		/// # Safety
		#[no_mangle]
		pub unsafe extern "C" fn entrypoint(input: *mut u8) -> u64 {
			unsafe { $crate::process_entrypoint(input, $max_accounts, $process_instruction) }
		}
		$crate::solana_program::custom_heap_default!();
		$crate::solana_program::custom_panic_default!();
	};
}
