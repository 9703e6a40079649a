/**
 * entrypoint.rs -> entrypoint to the program
 *
 * Program Flow:
 * 		1. the loader calls `entrypoint` with a pointer to the serialized input
 * 		2. the input is decoded in place into views of the first `MAX_ACCOUNTS` accounts
 * 		3. the decoded message, declared account count included, is forwarded to the processor
 * 		4. the processor asks `instruction.rs` to decode the `instruction_data` and picks the processing function
 * 		5. the returned result is turned into the status code the loader expects
 */

use solana_program::entrypoint::ProgramResult;

use crate::{deserialize::DecodedMessage, processor::Processor};

/// Accounts decoded into views. Registration needs four, anything past that is only walked.
pub const MAX_ACCOUNTS: usize = 4;

// * Nothing is copied out of the input: every view points back into the loader's buffer,
// 	so writes to lamports and data are what the runtime sees once the program returns.
// * An account repeated in the same instruction gets a view onto the first occurrence.
crate::program_entrypoint!(process_instruction, MAX_ACCOUNTS);

pub fn process_instruction(message: &DecodedMessage) -> ProgramResult {
	Processor::process_message(message)
}
