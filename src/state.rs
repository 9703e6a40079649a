//! state.rs -> program objects, (de)serializing state

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
	program_error::ProgramError,
	program_pack::{IsInitialized, Sealed},
	pubkey::Pubkey,
};

use crate::account::AccountView;


/* ==========================================================================
					Account State: Username Registry Entry
============================================================================= */

/// Stored in the account derived from a username
/// Records the key of the user who registered the username.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, PartialEq, Eq)]
pub struct RegistryEntry {

	/// Key of the user who signed the registration
	pub owner: Pubkey,
}

impl Sealed for RegistryEntry {}

impl IsInitialized for RegistryEntry {
	fn is_initialized(&self) -> bool {
		self.owner != Pubkey::default()
	}
}

impl RegistryEntry {

	/// Serialized size in bytes
	pub const LEN: usize = 32;

	/// Read the entry at the start of the account data
	pub fn load(account: &AccountView) -> Result<Self, ProgramError> {
		let mut bytes = [0u8; Self::LEN];
		account.read_data(0, &mut bytes)?;
		Self::try_from_slice(&bytes).map_err(|_| ProgramError::InvalidAccountData)
	}

	/// Write the entry to the start of the account data
	pub fn store(&self, account: &AccountView) -> Result<(), ProgramError> {
		let bytes = borsh::to_vec(self).map_err(|_| ProgramError::InvalidAccountData)?;
		account.write_data(0, &bytes)
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		builder::{FreshAccount, InputBuilder},
		deserialize::deserialize,
	};
	use assert_matches::assert_matches;

	#[test]
	fn test_store_and_load() {
		let mut input = InputBuilder::new(Pubkey::new_unique())
			.account(FreshAccount { data: vec![0; RegistryEntry::LEN], ..FreshAccount::default() })
			.account(FreshAccount { data: vec![0; RegistryEntry::LEN - 1], ..FreshAccount::default() })
			.build();
		let message = deserialize(&mut input, 2).unwrap();
		let account = &message.accounts()[0];

		assert!(!RegistryEntry::load(account).unwrap().is_initialized());

		let entry = RegistryEntry { owner: Pubkey::new_unique() };
		entry.store(account).unwrap();
		assert_eq!(account.data_to_vec(), entry.owner.to_bytes().to_vec());
		assert_eq!(RegistryEntry::load(account).unwrap(), entry);

		let small = &message.accounts()[1];
		assert_matches!(entry.store(small), Err(ProgramError::AccountDataTooSmall));
		assert_matches!(RegistryEntry::load(small), Err(ProgramError::AccountDataTooSmall));
	}
}
