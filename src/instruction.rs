//! instruction.rs -> program API, (de)serializing instruction data

use solana_program::program_error::ProgramError;

use crate::{
	error::RegistryError::{InvalidInstruction, InvalidUsername},
	seeds::MAX_SEED_LEN,
};


#[derive(Debug, PartialEq, Eq)]
pub enum RegistryInstruction<'a> {

	/// Log the decoded input and every account view.
	///
	/// Accounts expected: any
	LogAccounts,

	/// Register a username of up to 32 bytes.
	///
	/// * The username is the seed of the account that stores the user's key, so it can only be taken once.
	///
	/// Accounts expected:
	/// 0. `[signer]` The user who is registering
	/// 1. `[writable]` The account derived from the username. Must already be funded.
	/// 2. `[]` System program, to allocate and assign the account
	/// 3. `[]` Memo program, to check the username is valid UTF-8
	Register { username: &'a [u8] },
}

impl<'a> RegistryInstruction<'a> {

	/// Unpacks a byte buffer into a [RegistryInstruction]
	pub fn unpack(input: &'a [u8]) -> Result<Self, ProgramError> {
		let (tag, rest) = input
			.split_first()
			.ok_or(InvalidInstruction)?;

		Ok(match tag {
			0 => Self::LogAccounts,

			1 => {
				if rest.is_empty() || rest.len() > MAX_SEED_LEN {
					return Err(InvalidUsername.into());
				}
				Self::Register { username: rest }
			}

			_ => return Err(InvalidInstruction.into()),
		})
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn test_unpack() {
		assert_eq!(RegistryInstruction::unpack(&[0]).unwrap(), RegistryInstruction::LogAccounts);
		assert_eq!(
			RegistryInstruction::unpack(b"\x01alice").unwrap(),
			RegistryInstruction::Register { username: b"alice" }
		);
	}

	#[test]
	fn test_unpack_errors() {
		assert_matches!(RegistryInstruction::unpack(&[]), Err(ProgramError::Custom(0)));
		assert_matches!(RegistryInstruction::unpack(&[7]), Err(ProgramError::Custom(0)));
		assert_matches!(RegistryInstruction::unpack(&[1]), Err(ProgramError::Custom(1)));

		let mut long = vec![1u8];
		long.extend_from_slice(&[b'a'; MAX_SEED_LEN + 1]);
		assert_matches!(RegistryInstruction::unpack(&long), Err(ProgramError::Custom(1)));
		long.pop();
		assert!(RegistryInstruction::unpack(&long).is_ok());
	}
}
