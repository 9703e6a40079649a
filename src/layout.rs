//! layout.rs -> byte layout of the serialized program input
//!
//! A fresh record, starting at an 8-byte aligned offset:
//!
//! ```text
//! marker:1 | signer:1 | writable:1 | executable:1 | pad:4 | key:32 | owner:32
//! | lamports:8 | data_len:8 | data:data_len | headroom:10240 | align->8 | rent_epoch:8
//! ```
//!
//! A duplicate record is `marker:1 | pad:7`. The records are followed by
//! `instruction_len:8 | instruction_data | program_id:32`.

use std::mem::size_of;

use solana_program::{clock::Epoch, pubkey::Pubkey};

/// Value used to indicate that a serialized account is not a duplicate
pub const NON_DUP_MARKER: u8 = u8::MAX;

/// Maximum number of bytes a program may add to an account during a single invocation.
/// The host reserves this many bytes after every fresh record's data.
pub const MAX_PERMITTED_DATA_INCREASE: usize = 1_024 * 10;

/// `assert_eq(std::mem::align_of::<u128>(), 8)` is true for BPF but not for some host machines
pub const BPF_ALIGN_OF_U128: usize = 8;

/// Upper bound on how many views are preallocated, whatever the buffer claims.
/// Duplicate markers are `u8` and 255 is taken by [`NON_DUP_MARKER`].
pub const MAX_TX_ACCOUNTS: usize = (u8::MAX - 1) as usize;

pub const MARKER_SIZE: usize = size_of::<u8>();
pub const FLAG_SIZE: usize = size_of::<u8>();
pub const FLAGS_PADDING: usize = 4;
pub const DUPLICATE_PADDING: usize = 7;
pub const KEY_SIZE: usize = size_of::<Pubkey>();
pub const LAMPORTS_SIZE: usize = size_of::<u64>();
pub const LENGTH_SIZE: usize = size_of::<u64>();
pub const RENT_EPOCH_SIZE: usize = size_of::<Epoch>();

/// Bytes of a fresh record in front of its data: marker, flags, padding, keys, lamports and length.
pub const FRESH_HEADER_LEN: usize =
	MARKER_SIZE + 3 * FLAG_SIZE + FLAGS_PADDING + 2 * KEY_SIZE + LAMPORTS_SIZE + LENGTH_SIZE;

const _: () = assert!(KEY_SIZE == 32);
const _: () = assert!(FRESH_HEADER_LEN == 88);
const _: () = assert!(MARKER_SIZE + DUPLICATE_PADDING == BPF_ALIGN_OF_U128);

/// Round `offset` up to the next multiple of [`BPF_ALIGN_OF_U128`], `None` on overflow.
pub const fn checked_aligned(offset: usize) -> Option<usize> {
	match offset.checked_add(BPF_ALIGN_OF_U128 - 1) {
		Some(padded) => Some(padded & !(BPF_ALIGN_OF_U128 - 1)),
		None => None,
	}
}

/// Round `offset` up to the next multiple of [`BPF_ALIGN_OF_U128`].
///
/// Panics on overflow; use [`checked_aligned`] for untrusted offsets.
pub const fn aligned(offset: usize) -> usize {
	match checked_aligned(offset) {
		Some(offset) => offset,
		None => panic!("aligned offset overflows usize"),
	}
}

/// Offset of the rent epoch field of a fresh record whose data starts at `data_offset`.
pub fn rent_epoch_offset(data_offset: usize, data_len: usize) -> Option<usize> {
	data_offset
		.checked_add(data_len)?
		.checked_add(MAX_PERMITTED_DATA_INCREASE)
		.and_then(checked_aligned)
}

/// Bytes taken by a fresh record with `data_len` bytes of data, marker and rent epoch included.
/// Only meaningful for records starting at an aligned offset, which every record does.
pub fn fresh_record_len(data_len: usize) -> Option<usize> {
	rent_epoch_offset(FRESH_HEADER_LEN, data_len)?.checked_add(RENT_EPOCH_SIZE)
}
