//! cpi.rs -> cross-program invocations from account views
//!
//! The loader's C interface takes the instruction, the account infos and the
//! signer seeds as plain `repr(C)` structures of pointers. The views already
//! point into the serialized input, so nothing is copied: the structures are
//! built on the stack and heap of the caller and handed to `sol_invoke_signed_c`.

use std::marker::PhantomData;

use solana_program::{
	entrypoint::ProgramResult,
	instruction::Instruction,
	program_error::ProgramError,
	pubkey::Pubkey,
};

use crate::{
	account::AccountView,
	seeds::{check_seeds, MAX_SEEDS},
	status::from_status,
};


#[repr(C)]
struct SolAccountMeta<'a> {
	pubkey: *const Pubkey,
	is_writable: bool,
	is_signer: bool,
	_borrow: PhantomData<&'a Pubkey>,
}

#[repr(C)]
struct SolInstruction<'a> {
	program_id: *const Pubkey,
	accounts: *const SolAccountMeta<'a>,
	account_len: u64,
	data: *const u8,
	data_len: u64,
	_borrow: PhantomData<&'a [u8]>,
}

#[repr(C)]
struct SolAccountInfo<'a> {
	key: *const Pubkey,
	lamports: *mut u64,
	data_len: u64,
	data: *mut u8,
	owner: *const Pubkey,
	rent_epoch: u64,
	is_signer: bool,
	is_writable: bool,
	executable: bool,
	_borrow: PhantomData<AccountView<'a>>,
}

#[repr(C)]
struct SolSignerSeed<'a> {
	addr: *const u8,
	len: u64,
	_borrow: PhantomData<&'a [u8]>,
}

#[repr(C)]
struct SolSignerSeeds<'a> {
	addr: *const SolSignerSeed<'a>,
	len: u64,
}

impl<'a> From<&'a AccountView<'_>> for SolAccountInfo<'a> {
	fn from(view: &'a AccountView<'_>) -> Self {
		Self {
			key: view.key(),
			lamports: view.lamports_ptr(),
			data_len: view.data_len() as u64,
			data: view.data_ptr(),
			owner: view.owner(),
			rent_epoch: view.rent_epoch(),
			is_signer: view.is_signer(),
			is_writable: view.is_writable(),
			executable: view.executable(),
			_borrow: PhantomData,
		}
	}
}

#[cfg(target_os = "solana")]
fn sol_invoke_signed_c(
	instruction: &SolInstruction,
	account_infos: &[SolAccountInfo],
	signers_seeds: &[SolSignerSeeds],
) -> u64 {
	// SAFETY: every pointer refers to memory borrowed for the duration of the call
	unsafe {
		solana_program::syscalls::sol_invoke_signed_c(
			instruction as *const _ as *const u8,
			account_infos.as_ptr() as *const u8,
			account_infos.len() as u64,
			signers_seeds.as_ptr() as *const u8,
			signers_seeds.len() as u64,
		)
	}
}

#[cfg(not(target_os = "solana"))]
fn sol_invoke_signed_c(
	instruction: &SolInstruction,
	account_infos: &[SolAccountInfo],
	signers_seeds: &[SolSignerSeeds],
) -> u64 {
	solana_program::msg!(
		"SyscallStubs: sol_invoke_signed_c() not available ({} metas, {} accounts, {} signers)",
		instruction.account_len,
		account_infos.len(),
		signers_seeds.len()
	);
	crate::status::SUCCESS
}

/// Invoke `instruction` with the accounts it touches
pub fn invoke(instruction: &Instruction, accounts: &[AccountView]) -> ProgramResult {
	invoke_signed(instruction, accounts, &[])
}

/// Invoke `instruction`, signing for every program derived address given by a group of `signers_seeds`
pub fn invoke_signed(
	instruction: &Instruction,
	accounts: &[AccountView],
	signers_seeds: &[&[&[u8]]],
) -> ProgramResult {
	if signers_seeds.len() > MAX_SEEDS {
		return Err(ProgramError::MaxSeedLengthExceeded);
	}
	for seeds in signers_seeds {
		check_seeds(seeds, false)?;
	}

	let metas: Vec<SolAccountMeta> = instruction
		.accounts
		.iter()
		.map(|meta| SolAccountMeta {
			pubkey: &meta.pubkey,
			is_writable: meta.is_writable,
			is_signer: meta.is_signer,
			_borrow: PhantomData,
		})
		.collect();

	let sol_instruction = SolInstruction {
		program_id: &instruction.program_id,
		accounts: metas.as_ptr(),
		account_len: metas.len() as u64,
		data: instruction.data.as_ptr(),
		data_len: instruction.data.len() as u64,
		_borrow: PhantomData,
	};

	let account_infos: Vec<SolAccountInfo> = accounts.iter().map(SolAccountInfo::from).collect();

	let seeds: Vec<Vec<SolSignerSeed>> = signers_seeds
		.iter()
		.map(|seeds| {
			seeds
				.iter()
				.map(|seed| SolSignerSeed {
					addr: seed.as_ptr(),
					len: seed.len() as u64,
					_borrow: PhantomData,
				})
				.collect()
		})
		.collect();
	let signers: Vec<SolSignerSeeds> = seeds
		.iter()
		.map(|group| SolSignerSeeds {
			addr: group.as_ptr(),
			len: group.len() as u64,
		})
		.collect();

	from_status(sol_invoke_signed_c(&sol_instruction, &account_infos, &signers))
}
