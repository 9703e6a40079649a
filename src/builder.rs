//! builder.rs -> host-side encoder of the serialized program input
//!
//! Produces buffers in the layout the loader hands to the entrypoint, for
//! tests and off-chain tooling. Not compiled for on-chain targets.

use solana_program::{clock::Epoch, pubkey::Pubkey};

use crate::layout::{aligned, DUPLICATE_PADDING, FLAGS_PADDING, MAX_PERMITTED_DATA_INCREASE, NON_DUP_MARKER};


/// Field values of a freshly encoded account
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreshAccount {
	pub key: Pubkey,
	pub owner: Pubkey,
	pub lamports: u64,
	pub data: Vec<u8>,
	pub rent_epoch: Epoch,
	pub is_signer: bool,
	pub is_writable: bool,
	pub executable: bool,
}

#[derive(Clone, Debug)]
enum Record {
	Fresh(FreshAccount),
	Duplicate(u8),
}

#[derive(Clone, Debug)]
pub struct InputBuilder {
	records: Vec<Record>,
	instruction_data: Vec<u8>,
	program_id: Pubkey,
}

impl InputBuilder {
	pub fn new(program_id: Pubkey) -> Self {
		Self {
			records: Vec::new(),
			instruction_data: Vec::new(),
			program_id,
		}
	}

	pub fn account(mut self, account: FreshAccount) -> Self {
		self.records.push(Record::Fresh(account));
		self
	}

	/// Append a record repeating the record at `index`
	pub fn duplicate(mut self, index: u8) -> Self {
		self.records.push(Record::Duplicate(index));
		self
	}

	pub fn instruction_data(mut self, data: &[u8]) -> Self {
		self.instruction_data = data.to_vec();
		self
	}

	pub fn build(&self) -> Vec<u8> {
		let mut input = Vec::new();
		input.extend_from_slice(&(self.records.len() as u64).to_le_bytes());

		for record in &self.records {
			match record {
				Record::Fresh(account) => {
					input.push(NON_DUP_MARKER);
					input.push(account.is_signer as u8);
					input.push(account.is_writable as u8);
					input.push(account.executable as u8);
					input.extend_from_slice(&[0u8; FLAGS_PADDING]);
					input.extend_from_slice(account.key.as_ref());
					input.extend_from_slice(account.owner.as_ref());
					input.extend_from_slice(&account.lamports.to_le_bytes());
					input.extend_from_slice(&(account.data.len() as u64).to_le_bytes());
					input.extend_from_slice(&account.data);
					input.resize(aligned(input.len() + MAX_PERMITTED_DATA_INCREASE), 0);
					input.extend_from_slice(&account.rent_epoch.to_le_bytes());
				}
				Record::Duplicate(index) => {
					input.push(*index);
					input.extend_from_slice(&[0u8; DUPLICATE_PADDING]);
				}
			}
		}

		input.extend_from_slice(&(self.instruction_data.len() as u64).to_le_bytes());
		input.extend_from_slice(&self.instruction_data);
		input.extend_from_slice(self.program_id.as_ref());
		input
	}
}
