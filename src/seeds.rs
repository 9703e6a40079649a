//! seeds.rs -> program derived addresses
//!
//! Derivation is done by `Pubkey` (a syscall on-chain); this module checks the
//! seed limits up front and reports the results the way the program needs them.

use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

/// Maximum length in bytes of a single seed
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, bump seed included
pub const MAX_SEEDS: usize = 16;


/// An address found with [`find_pda`]. The bump seed must be appended to the seeds when signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoundPda {
	pub key: Pubkey,
	pub bump_seed: u8,
}

/// An address built with [`create_pda`]. Only a valid address can be signed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedPda {
	pub key: Pubkey,
	pub is_valid: bool,
}

/// Check the seed count and every seed's length. `reserve_bump` leaves room for the bump seed.
pub fn check_seeds(seeds: &[&[u8]], reserve_bump: bool) -> Result<(), ProgramError> {
	let max_seeds = if reserve_bump { MAX_SEEDS - 1 } else { MAX_SEEDS };
	if seeds.len() > max_seeds {
		msg!("[FlatInput] ERROR: {} seeds given, at most {} allowed", seeds.len(), max_seeds);
		return Err(ProgramError::MaxSeedLengthExceeded);
	}
	if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
		msg!("[FlatInput] ERROR: Seed too long: {} bytes", seed.len());
		return Err(ProgramError::MaxSeedLengthExceeded);
	}
	Ok(())
}

/// Find a valid program address for `seeds` and the bump seed that produces it
pub fn find_pda(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<FoundPda, ProgramError> {
	check_seeds(seeds, true)?;
	let (key, bump_seed) = Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
		msg!("[FlatInput] ERROR: Could not find a program derived address");
		ProgramError::InvalidSeeds
	})?;
	Ok(FoundPda { key, bump_seed })
}

/// Build the program address for exactly `seeds`; `is_valid` is false when it lies on the curve
pub fn create_pda(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<CreatedPda, ProgramError> {
	check_seeds(seeds, false)?;
	Ok(match Pubkey::create_program_address(seeds, program_id) {
		Ok(key) => CreatedPda { key, is_valid: true },
		Err(_) => CreatedPda { key: Pubkey::default(), is_valid: false },
	})
}
