//! deserialize.rs -> decoding the program input into account views
//!
//! The host passes a single buffer: a count of records, the records themselves
//! (fresh or duplicate, see [`crate::layout`]), the instruction data and the
//! program id. It is walked exactly once. Records beyond the caller's capacity
//! are still walked, so the instruction data and program id are found, but no
//! view is built for them.

use std::ptr::NonNull;

use solana_program::pubkey::Pubkey;

use crate::{
	account::{load_word, AccountView},
	cursor::Cursor,
	error::DecodeError,
	layout::{
		DUPLICATE_PADDING, FLAGS_PADDING, FLAG_SIZE, KEY_SIZE, LAMPORTS_SIZE, MAX_PERMITTED_DATA_INCREASE,
		MAX_TX_ACCOUNTS, NON_DUP_MARKER, RENT_EPOCH_SIZE,
	},
};


/// The decoded input. Everything is borrowed from the input buffer.
#[derive(Debug)]
pub struct DecodedMessage<'a> {
	accounts: Vec<AccountView<'a>>,
	declared_accounts: usize,
	instruction_data: &'a [u8],
	program_id: &'a Pubkey,
}

impl<'a> DecodedMessage<'a> {
	/// Views of the first `min(declared, capacity)` records, in wire order
	pub fn accounts(&self) -> &[AccountView<'a>] {
		&self.accounts
	}

	/// Number of records the input declared, including the ones skipped
	pub fn declared_accounts(&self) -> usize {
		self.declared_accounts
	}

	/// Whether records were skipped because the capacity was too small
	pub fn is_truncated(&self) -> bool {
		self.declared_accounts > self.accounts.len()
	}

	pub fn instruction_data(&self) -> &'a [u8] {
		self.instruction_data
	}

	/// The invoked program's id
	pub fn program_id(&self) -> &'a Pubkey {
		self.program_id
	}
}


/// Ordered views, filled up to a fixed capacity
struct ViewTable<'a> {
	views: Vec<AccountView<'a>>,
	capacity: usize,
}

impl<'a> ViewTable<'a> {
	fn new(declared: usize, capacity: usize) -> Self {
		Self {
			views: Vec::with_capacity(declared.min(capacity).min(MAX_TX_ACCOUNTS)),
			capacity,
		}
	}

	fn accepts(&self, index: usize) -> bool {
		index < self.capacity
	}

	fn push(&mut self, view: AccountView<'a>) {
		self.views.push(view)
	}

	/// The view of an earlier record, for a duplicate at `index`
	fn original(&self, index: usize, marker: u8) -> Result<AccountView<'a>, DecodeError> {
		let source = marker as usize;
		if source >= index {
			return Err(DecodeError::InvalidDuplicate { index, marker });
		}
		self.views
			.get(source)
			.copied()
			.ok_or(DecodeError::InvalidDuplicate { index, marker })
	}
}


/// Decode a fresh record, the marker already consumed
fn decode_fresh<'a>(cursor: &mut Cursor<'a>) -> Result<AccountView<'a>, DecodeError> {
	let is_signer = cursor.read_u8()? != 0;
	let is_writable = cursor.read_u8()? != 0;
	let executable = cursor.read_u8()? != 0;
	cursor.skip(FLAGS_PADDING)?;

	let key = cursor.take_key()?;
	let owner = cursor.take_key()?;
	let lamports = cursor.take_word_cells()?;

	let data_len = cursor.take_word_cells()?;
	let original_data_len = load_word(data_len) as usize;
	let data_capacity = original_data_len
		.checked_add(MAX_PERMITTED_DATA_INCREASE)
		.ok_or(DecodeError::LengthOverflow { offset: cursor.offset(), len: original_data_len })?;
	let data = cursor.take_cells(data_capacity)?;
	cursor.align()?;

	let rent_epoch = cursor.read_u64()?;

	Ok(AccountView {
		key,
		owner,
		lamports,
		data_len,
		data,
		original_data_len,
		rent_epoch,
		is_signer,
		is_writable,
		executable,
	})
}

/// Walk a fresh record without building a view, the marker already consumed
fn skip_fresh(cursor: &mut Cursor) -> Result<(), DecodeError> {
	cursor.skip(3 * FLAG_SIZE + FLAGS_PADDING + 2 * KEY_SIZE + LAMPORTS_SIZE)?;
	let data_len = cursor.read_u64()? as usize;
	let data_capacity = data_len
		.checked_add(MAX_PERMITTED_DATA_INCREASE)
		.ok_or(DecodeError::LengthOverflow { offset: cursor.offset(), len: data_len })?;
	cursor.skip(data_capacity)?;
	cursor.align()?;
	cursor.skip(RENT_EPOCH_SIZE)
}

/// Decode or skip the record at `index`
fn decode_record<'a>(
	cursor: &mut Cursor<'a>,
	table: &mut ViewTable<'a>,
	index: usize,
) -> Result<(), DecodeError> {
	let marker = cursor.read_u8()?;

	if !table.accepts(index) {
		if marker == NON_DUP_MARKER {
			return skip_fresh(cursor);
		}
		if marker as usize >= index {
			return Err(DecodeError::InvalidDuplicate { index, marker });
		}
		return cursor.skip(DUPLICATE_PADDING);
	}

	if marker == NON_DUP_MARKER {
		let view = decode_fresh(cursor)?;
		table.push(view);
	} else {
		let view = table.original(index, marker)?;
		cursor.skip(DUPLICATE_PADDING)?;
		table.push(view);
	}
	Ok(())
}

/// Read the instruction data and program id that follow the records
fn decode_tail<'a>(cursor: &mut Cursor<'a>) -> Result<(&'a [u8], &'a Pubkey), DecodeError> {
	let instruction_data_len = cursor.read_u64()? as usize;
	let instruction_data = cursor.take_bytes(instruction_data_len)?;
	let program_id = cursor.take_key()?;
	Ok((instruction_data, program_id))
}

fn decode<'a>(mut cursor: Cursor<'a>, capacity: usize) -> Result<DecodedMessage<'a>, DecodeError> {
	let declared_accounts = cursor.read_u64()? as usize;

	let mut table = ViewTable::new(declared_accounts, capacity);
	for index in 0..declared_accounts {
		decode_record(&mut cursor, &mut table, index)?;
	}

	let (instruction_data, program_id) = decode_tail(&mut cursor)?;

	Ok(DecodedMessage {
		accounts: table.views,
		declared_accounts,
		instruction_data,
		program_id,
	})
}

/// Decode an input of known length, building at most `capacity` views.
///
/// Every read is bounds-checked against `input`; trailing bytes are ignored.
pub fn deserialize(input: &mut [u8], capacity: usize) -> Result<DecodedMessage<'_>, DecodeError> {
	decode(Cursor::new(input), capacity)
}

/// Decode the input the host passes to the program entrypoint, building at most `capacity` views.
///
/// A null `input` is the only condition reported as [`DecodeError::NullInput`]. Lengths are
/// trusted the way the host serialized them.
///
/// # Safety
///
/// A non-null `input` must point to a buffer serialized by the host, valid and not
/// otherwise accessed for `'a`.
pub unsafe fn deserialize_raw<'a>(input: *mut u8, capacity: usize) -> Result<DecodedMessage<'a>, DecodeError> {
	let input = NonNull::new(input).ok_or(DecodeError::NullInput)?;
	decode(Cursor::from_raw(input), capacity)
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		builder::{FreshAccount, InputBuilder},
		layout::{fresh_record_len, rent_epoch_offset, FRESH_HEADER_LEN},
	};
	use assert_matches::assert_matches;
	use std::ptr;

	fn account(seed: u8, lamports: u64, data: &[u8], rent_epoch: u64) -> FreshAccount {
		FreshAccount {
			key: Pubkey::new_from_array([seed; 32]),
			owner: Pubkey::new_from_array([seed.wrapping_add(100); 32]),
			lamports,
			data: data.to_vec(),
			rent_epoch,
			is_signer: seed % 2 == 0,
			is_writable: seed % 3 == 0,
			executable: seed % 5 == 0,
		}
	}

	fn hello_input(program_id: Pubkey) -> Vec<u8> {
		InputBuilder::new(program_id)
			.account(account(1, 100, &[0x41; 4], 7))
			.duplicate(0)
			.instruction_data(b"hello")
			.build()
	}

	#[test]
	fn test_fresh_and_duplicate() {
		let program_id = Pubkey::new_unique();
		let mut input = hello_input(program_id);
		let message = deserialize(&mut input, 2).unwrap();

		assert_eq!(message.declared_accounts(), 2);
		assert!(!message.is_truncated());
		let accounts = message.accounts();
		assert_eq!(accounts.len(), 2);
		assert_eq!(accounts[0].key(), &Pubkey::new_from_array([1; 32]));
		assert_eq!(accounts[0].owner(), &Pubkey::new_from_array([101; 32]));
		assert_eq!(accounts[0].lamports(), 100);
		assert_eq!(accounts[0].data_to_vec(), vec![0x41; 4]);
		assert_eq!(accounts[0].rent_epoch(), 7);
		assert!(!accounts[0].is_signer());
		assert!(!accounts[0].is_writable());
		assert!(!accounts[0].executable());

		assert!(accounts[1].same_account(&accounts[0]));
		assert!(ptr::eq(accounts[1].key(), accounts[0].key()));
		assert!(ptr::eq(accounts[1].owner(), accounts[0].owner()));
		assert!(ptr::eq(accounts[1].data(), accounts[0].data()));
		assert_eq!(accounts[1].rent_epoch(), 7);

		assert_eq!(message.instruction_data(), b"hello");
		assert_eq!(message.program_id(), &program_id);
	}

	#[test]
	fn test_capacity_truncation_keeps_tail_in_sync() {
		let program_id = Pubkey::new_unique();
		let mut full = hello_input(program_id);
		let mut truncated = full.clone();

		let full = deserialize(&mut full, 2).unwrap();
		let message = deserialize(&mut truncated, 1).unwrap();

		assert_eq!(message.accounts().len(), 1);
		assert_eq!(message.declared_accounts(), 2);
		assert!(message.is_truncated());
		assert_eq!(message.accounts()[0].data_to_vec(), vec![0x41; 4]);
		assert_eq!(message.instruction_data(), full.instruction_data());
		assert_eq!(message.program_id(), full.program_id());
	}

	#[test]
	fn test_skipped_fresh_records_of_every_alignment() {
		let program_id = Pubkey::new_unique();
		let mut builder = InputBuilder::new(program_id);
		for data_len in 0..10u8 {
			let data: Vec<u8> = (0..data_len).collect();
			builder = builder.account(account(data_len, data_len as u64 * 1_000, &data, data_len as u64));
		}
		let ix: Vec<u8> = (0..=255).collect();
		let input = builder.duplicate(3).instruction_data(&ix).build();

		for capacity in [0, 1, 4, 9, 10, 11, 64] {
			let mut input = input.clone();
			let message = deserialize(&mut input, capacity).unwrap();
			assert_eq!(message.declared_accounts(), 11);
			assert_eq!(message.accounts().len(), capacity.min(11));
			assert_eq!(message.instruction_data(), &ix[..]);
			assert_eq!(message.program_id(), &program_id);

			for (index, view) in message.accounts().iter().enumerate().take(10) {
				let expected: Vec<u8> = (0..index as u8).collect();
				assert_eq!(view.data_to_vec(), expected);
				assert_eq!(view.lamports(), index as u64 * 1_000);
				assert_eq!(view.rent_epoch(), index as u64);
				assert_eq!(view.is_signer(), index % 2 == 0);
				assert_eq!(view.is_writable(), index % 3 == 0);
				assert_eq!(view.executable(), index % 5 == 0);
			}
			if capacity > 10 {
				assert!(message.accounts()[10].same_account(&message.accounts()[3]));
			}
		}
	}

	#[test]
	fn test_rent_epoch_follows_aligned_headroom() {
		let mut input = InputBuilder::new(Pubkey::new_unique())
			.account(account(1, 1, &[0xEE; 5], u64::MAX - 1))
			.build();
		let data_offset = 8 + FRESH_HEADER_LEN;
		let epoch_offset = rent_epoch_offset(data_offset, 5).unwrap();
		assert_eq!(epoch_offset % 8, 0);
		assert_eq!(epoch_offset, 8 + fresh_record_len(5).unwrap() - 8);
		assert_eq!(
			u64::from_le_bytes(input[epoch_offset..epoch_offset + 8].try_into().unwrap()),
			u64::MAX - 1
		);

		let message = deserialize(&mut input, 1).unwrap();
		assert_eq!(message.accounts()[0].rent_epoch(), u64::MAX - 1);
	}

	#[test]
	fn test_no_accounts_and_empty_instruction() {
		let program_id = Pubkey::new_unique();
		let mut input = InputBuilder::new(program_id).build();
		assert_eq!(input.len(), 8 + 8 + 32);
		input.extend_from_slice(&[0xFF; 3]);

		let message = deserialize(&mut input, 4).unwrap();
		assert!(message.accounts().is_empty());
		assert_eq!(message.declared_accounts(), 0);
		assert!(message.instruction_data().is_empty());
		assert_eq!(message.program_id(), &program_id);
	}

	#[test]
	fn test_writes_reach_the_input() {
		let mut input = hello_input(Pubkey::new_unique());
		{
			let message = deserialize(&mut input, 2).unwrap();
			message.accounts()[1].set_lamports(250);
			message.accounts()[1].write_data(0, b"BB").unwrap();
		}
		let message = deserialize(&mut input, 1).unwrap();
		assert_eq!(message.accounts()[0].lamports(), 250);
		assert_eq!(message.accounts()[0].data_to_vec(), b"BBAA".to_vec());
	}

	#[test]
	fn test_duplicate_of_later_record_is_rejected() {
		let mut input = InputBuilder::new(Pubkey::new_unique())
			.duplicate(0)
			.build();
		assert_matches!(
			deserialize(&mut input, 1),
			Err(DecodeError::InvalidDuplicate { index: 0, marker: 0 })
		);

		let mut input = InputBuilder::new(Pubkey::new_unique())
			.account(account(1, 1, &[], 0))
			.duplicate(5)
			.build();
		assert_matches!(
			deserialize(&mut input, 2),
			Err(DecodeError::InvalidDuplicate { index: 1, marker: 5 })
		);
		// also rejected when the record is only skipped
		assert_matches!(
			deserialize(&mut input, 1),
			Err(DecodeError::InvalidDuplicate { index: 1, marker: 5 })
		);
	}

	#[test]
	fn test_truncated_input_is_out_of_bounds() {
		let input = hello_input(Pubkey::new_unique());
		for len in [0, 7, 8, 100, input.len() - 33, input.len() - 1] {
			let mut short = input[..len].to_vec();
			assert_matches!(
				deserialize(&mut short, 2),
				Err(DecodeError::OutOfBounds { input_len, .. }) if input_len == len
			);
		}
	}

	#[test]
	fn test_hostile_lengths() {
		let mut input = 1u64.to_le_bytes().to_vec();
		input.push(NON_DUP_MARKER);
		input.extend_from_slice(&[0u8; 79]);
		input.extend_from_slice(&u64::MAX.to_le_bytes());
		assert_matches!(deserialize(&mut input.clone(), 1), Err(DecodeError::LengthOverflow { .. }));
		assert_matches!(deserialize(&mut input, 0), Err(DecodeError::LengthOverflow { .. }));

		let mut input = u64::MAX.to_le_bytes().to_vec();
		assert_matches!(deserialize(&mut input, usize::MAX), Err(DecodeError::OutOfBounds { offset: 8, .. }));
	}

	#[test]
	fn test_raw_input() {
		let program_id = Pubkey::new_unique();
		let mut input = hello_input(program_id);
		let message = unsafe { deserialize_raw(input.as_mut_ptr(), 2) }.unwrap();
		assert_eq!(message.accounts().len(), 2);
		assert_eq!(message.instruction_data(), b"hello");
		assert_eq!(message.program_id(), &program_id);

		assert_matches!(
			unsafe { deserialize_raw(ptr::null_mut(), 2) },
			Err(DecodeError::NullInput)
		);
	}
}
