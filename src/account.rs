//! account.rs -> borrowed views of the accounts in the serialized input

use std::{cell::Cell, fmt, ptr};

use solana_program::{clock::Epoch, program_error::ProgramError, pubkey::Pubkey};

use crate::layout::MAX_PERMITTED_DATA_INCREASE;


/// An account as the host serialized it, borrowed from the input for `'a`.
///
/// Views are `Copy`: a duplicate record yields a second view over the very same
/// bytes, so lamports or data written through one are read back through the other.
/// Only the decoder constructs views.
#[derive(Clone, Copy)]
pub struct AccountView<'a> {
	pub(crate) key: &'a Pubkey,
	pub(crate) owner: &'a Pubkey,
	pub(crate) lamports: &'a [Cell<u8>; 8],
	/// The serialized data length, rewritten by `realloc`
	pub(crate) data_len: &'a [Cell<u8>; 8],
	/// Data followed by the growth headroom
	pub(crate) data: &'a [Cell<u8>],
	pub(crate) original_data_len: usize,
	pub(crate) rent_epoch: Epoch,
	pub(crate) is_signer: bool,
	pub(crate) is_writable: bool,
	pub(crate) executable: bool,
}

pub(crate) fn load_word(word: &[Cell<u8>; 8]) -> u64 {
	let mut bytes = [0u8; 8];
	for (byte, cell) in bytes.iter_mut().zip(word) {
		*byte = cell.get();
	}
	u64::from_le_bytes(bytes)
}

fn store_word(word: &[Cell<u8>; 8], value: u64) {
	for (cell, byte) in word.iter().zip(value.to_le_bytes()) {
		cell.set(byte);
	}
}

impl<'a> AccountView<'a> {
	/// Public key of the account
	pub fn key(&self) -> &'a Pubkey {
		self.key
	}

	/// Program that owns this account
	pub fn owner(&self) -> &'a Pubkey {
		self.owner
	}

	pub fn is_owned_by(&self, program_id: &Pubkey) -> bool {
		self.owner == program_id
	}

	pub fn lamports(&self) -> u64 {
		load_word(self.lamports)
	}

	pub fn set_lamports(&self, lamports: u64) {
		store_word(self.lamports, lamports)
	}

	pub fn checked_add_lamports(&self, amount: u64) -> Result<(), ProgramError> {
		let lamports = self.lamports().checked_add(amount).ok_or(ProgramError::ArithmeticOverflow)?;
		self.set_lamports(lamports);
		Ok(())
	}

	pub fn checked_sub_lamports(&self, amount: u64) -> Result<(), ProgramError> {
		let lamports = self.lamports().checked_sub(amount).ok_or(ProgramError::InsufficientFunds)?;
		self.set_lamports(lamports);
		Ok(())
	}

	/// Current length of the account data
	pub fn data_len(&self) -> usize {
		load_word(self.data_len) as usize
	}

	/// Length of the data when the host serialized the account
	pub fn original_data_len(&self) -> usize {
		self.original_data_len
	}

	pub fn data_is_empty(&self) -> bool {
		self.data_len() == 0
	}

	/// The account data, writable in place
	pub fn data(&self) -> &'a [Cell<u8>] {
		&self.data[..self.data_len()]
	}

	pub fn data_to_vec(&self) -> Vec<u8> {
		self.data().iter().map(Cell::get).collect()
	}

	/// Copy `out.len()` bytes of data starting at `offset` into `out`
	pub fn read_data(&self, offset: usize, out: &mut [u8]) -> Result<(), ProgramError> {
		let source = offset
			.checked_add(out.len())
			.and_then(|end| self.data().get(offset..end))
			.ok_or(ProgramError::AccountDataTooSmall)?;
		for (byte, cell) in out.iter_mut().zip(source) {
			*byte = cell.get();
		}
		Ok(())
	}

	/// Overwrite data starting at `offset` with `src`
	pub fn write_data(&self, offset: usize, src: &[u8]) -> Result<(), ProgramError> {
		let target = offset
			.checked_add(src.len())
			.and_then(|end| self.data().get(offset..end))
			.ok_or(ProgramError::AccountDataTooSmall)?;
		for (cell, byte) in target.iter().zip(src) {
			cell.set(*byte);
		}
		Ok(())
	}

	/// Resize the account data within the headroom the host reserved.
	///
	/// The new length is written into the serialized input, so it reaches the host
	/// and every alias of this view.
	pub fn realloc(&self, new_len: usize, zero_init: bool) -> Result<(), ProgramError> {
		let old_len = self.data_len();
		if new_len == old_len {
			return Ok(());
		}
		if new_len.saturating_sub(self.original_data_len) > MAX_PERMITTED_DATA_INCREASE
			|| new_len > self.data.len()
		{
			return Err(ProgramError::InvalidRealloc);
		}

		store_word(self.data_len, new_len as u64);

		if zero_init && new_len > old_len {
			for cell in &self.data[old_len..new_len] {
				cell.set(0);
			}
		}
		Ok(())
	}

	/// The epoch at which this account will next owe rent
	pub fn rent_epoch(&self) -> Epoch {
		self.rent_epoch
	}

	pub fn is_signer(&self) -> bool {
		self.is_signer
	}

	pub fn is_writable(&self) -> bool {
		self.is_writable
	}

	/// The account data holds a loaded program and is read-only
	pub fn executable(&self) -> bool {
		self.executable
	}

	/// Whether both views denote the same serialized account, as duplicates do
	pub fn same_account(&self, other: &AccountView) -> bool {
		ptr::eq(self.key, other.key) && ptr::eq(self.lamports, other.lamports)
	}

	pub(crate) fn lamports_ptr(&self) -> *mut u64 {
		self.lamports.as_ptr() as *mut u64
	}

	pub(crate) fn data_ptr(&self) -> *mut u8 {
		self.data.as_ptr() as *mut u8
	}
}

impl fmt::Debug for AccountView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccountView")
			.field("key", self.key)
			.field("owner", self.owner)
			.field("lamports", &self.lamports())
			.field("data_len", &self.data_len())
			.field("rent_epoch", &self.rent_epoch)
			.field("is_signer", &self.is_signer)
			.field("is_writable", &self.is_writable)
			.field("executable", &self.executable)
			.finish()
	}
}

/// Return the next view from an iterator over views, in the manner of `next_account_info`
pub fn next_account_view<'a, 'b, I: Iterator<Item = &'b AccountView<'a>>>(
	iter: &mut I,
) -> Result<&'b AccountView<'a>, ProgramError>
where
	'a: 'b,
{
	iter.next().ok_or(ProgramError::NotEnoughAccountKeys)
}
