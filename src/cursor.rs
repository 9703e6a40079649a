//! cursor.rs -> forward-only read position over the serialized input
//!
//! The cursor never copies account data or keys: every `take_*` hands out a
//! reference into the input for the lifetime `'a`. Only the scalars that drive
//! control flow (marker, flags, counts and lengths) are read by value.

use std::{cell::Cell, marker::PhantomData, ptr::NonNull, slice};

use solana_program::pubkey::Pubkey;

use crate::{
	error::DecodeError,
	layout::{checked_aligned, KEY_SIZE},
};


pub struct Cursor<'a> {
	base: NonNull<u8>,
	offset: usize,
	/// Length of the input when known; `None` trusts the host to have sized it
	limit: Option<usize>,
	_input: PhantomData<&'a mut [u8]>,
}

impl<'a> Cursor<'a> {
	/// Cursor over an input of known length. Every read is bounds-checked.
	pub fn new(input: &'a mut [u8]) -> Self {
		let limit = Some(input.len());
		Self {
			base: NonNull::from(input).cast(),
			offset: 0,
			limit,
			_input: PhantomData,
		}
	}

	/// Cursor over an input whose length only the host knows.
	///
	/// # Safety
	///
	/// `input` must point to a buffer laid out as described in [`crate::layout`],
	/// valid and otherwise unaliased for `'a`.
	pub unsafe fn from_raw(input: NonNull<u8>) -> Self {
		Self {
			base: input,
			offset: 0,
			limit: None,
			_input: PhantomData,
		}
	}

	/// Current offset from the start of the input
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Claim the next `len` bytes and return the offset they start at
	fn advance(&mut self, len: usize) -> Result<usize, DecodeError> {
		let start = self.offset;
		let end = start
			.checked_add(len)
			.ok_or(DecodeError::LengthOverflow { offset: start, len })?;
		if let Some(input_len) = self.limit {
			if end > input_len {
				return Err(DecodeError::OutOfBounds { offset: start, len, input_len });
			}
		}
		self.offset = end;
		Ok(start)
	}

	fn ptr(&self, offset: usize) -> *mut u8 {
		// SAFETY: `advance` only hands out offsets inside the input
		unsafe { self.base.as_ptr().add(offset) }
	}

	pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
		self.advance(len).map(|_| ())
	}

	/// Round the offset up to the next 8-byte boundary
	pub fn align(&mut self) -> Result<(), DecodeError> {
		let target = checked_aligned(self.offset)
			.ok_or(DecodeError::LengthOverflow { offset: self.offset, len: 0 })?;
		self.skip(target - self.offset)
	}

	pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
		let offset = self.advance(1)?;
		// SAFETY: one byte at `offset` lies inside the input
		Ok(unsafe { self.ptr(offset).read() })
	}

	/// Read a little-endian `u64`; the field may be unaligned
	pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
		let offset = self.advance(8)?;
		// SAFETY: eight bytes at `offset` lie inside the input, `[u8; 8]` has alignment 1
		let bytes = unsafe { self.ptr(offset).cast::<[u8; 8]>().read() };
		Ok(u64::from_le_bytes(bytes))
	}

	pub fn take_key(&mut self) -> Result<&'a Pubkey, DecodeError> {
		let offset = self.advance(KEY_SIZE)?;
		// SAFETY: `Pubkey` is a transparent `[u8; 32]` and the bytes are not handed out again
		Ok(unsafe { &*(self.ptr(offset) as *const Pubkey) })
	}

	pub fn take_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
		let offset = self.advance(len)?;
		// SAFETY: `len` bytes at `offset` lie inside the input and are not handed out again
		Ok(unsafe { slice::from_raw_parts(self.ptr(offset), len) })
	}

	/// Borrow the next `len` bytes as shared, mutable cells
	pub fn take_cells(&mut self, len: usize) -> Result<&'a [Cell<u8>], DecodeError> {
		let offset = self.advance(len)?;
		// SAFETY: `Cell<u8>` has the layout of `u8`; the range is not handed out again
		Ok(unsafe { slice::from_raw_parts(self.ptr(offset) as *const Cell<u8>, len) })
	}

	/// Borrow the next 8 bytes as cells, for scalars the program may overwrite in place
	pub fn take_word_cells(&mut self) -> Result<&'a [Cell<u8>; 8], DecodeError> {
		let offset = self.advance(8)?;
		// SAFETY: as for `take_cells`, with a fixed length of 8
		Ok(unsafe { &*(self.ptr(offset) as *const [Cell<u8>; 8]) })
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn test_reads_advance_by_field_size() {
		let mut input = [0u8; 48];
		input[0] = 7;
		input[1..9].copy_from_slice(&300u64.to_le_bytes());
		input[9..41].copy_from_slice(&[3u8; 32]);

		let mut cursor = Cursor::new(&mut input);
		assert_eq!(cursor.read_u8().unwrap(), 7);
		assert_eq!(cursor.read_u64().unwrap(), 300);
		assert_eq!(cursor.offset(), 9);
		assert_eq!(cursor.take_key().unwrap(), &Pubkey::new_from_array([3u8; 32]));
		assert_eq!(cursor.offset(), 41);
		cursor.align().unwrap();
		assert_eq!(cursor.offset(), 48);
		cursor.align().unwrap();
		assert_eq!(cursor.offset(), 48);
	}

	#[test]
	fn test_out_of_bounds() {
		let mut input = [0u8; 12];
		let mut cursor = Cursor::new(&mut input);
		cursor.skip(5).unwrap();
		assert_matches!(
			cursor.read_u64(),
			Err(DecodeError::OutOfBounds { offset: 5, len: 8, input_len: 12 })
		);
		// a failed read does not move the cursor
		assert_eq!(cursor.offset(), 5);
		cursor.align().unwrap();
		assert_eq!(cursor.offset(), 8);
		assert_matches!(cursor.take_bytes(usize::MAX), Err(DecodeError::LengthOverflow { offset: 8, .. }));
		assert_eq!(cursor.take_bytes(4).unwrap().len(), 4);
		assert_matches!(cursor.read_u8(), Err(DecodeError::OutOfBounds { offset: 12, len: 1, .. }));
	}

	#[test]
	fn test_align_past_end() {
		let mut input = [0u8; 10];
		let mut cursor = Cursor::new(&mut input);
		cursor.skip(9).unwrap();
		assert_matches!(
			cursor.align(),
			Err(DecodeError::OutOfBounds { offset: 9, len: 7, input_len: 10 })
		);
	}

	#[test]
	fn test_cells_write_through() {
		let mut input = [0u8; 16];
		{
			let mut cursor = Cursor::new(&mut input);
			let word = cursor.take_word_cells().unwrap();
			let rest = cursor.take_cells(8).unwrap();
			word[0].set(0xAA);
			rest[7].set(0x55);
		}
		assert_eq!(input[0], 0xAA);
		assert_eq!(input[15], 0x55);
	}

	#[test]
	fn test_raw_cursor_is_unchecked() {
		let mut input = [1u8; 16];
		let base = NonNull::new(input.as_mut_ptr()).unwrap();
		let mut cursor = unsafe { Cursor::from_raw(base) };
		cursor.skip(8).unwrap();
		assert_eq!(cursor.read_u64().unwrap(), u64::from_le_bytes([1u8; 8]));
		assert_matches!(cursor.skip(usize::MAX), Err(DecodeError::LengthOverflow { offset: 16, .. }));
	}
}
