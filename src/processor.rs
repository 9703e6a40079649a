//! processor.rs -> program logic

use solana_program::{
	entrypoint::ProgramResult,
	instruction::{AccountMeta, Instruction},
	msg,
	program_error::ProgramError,
	pubkey,
	pubkey::Pubkey,
	system_instruction,
	system_program,
	sysvar::{rent::Rent, Sysvar},
};

use crate::{
	account::{next_account_view, AccountView},
	cpi::{invoke, invoke_signed},
	deserialize::DecodedMessage,
	error::RegistryError,
	instruction::RegistryInstruction,
	log::{log_accounts, log_message},
	seeds::find_pda,
	state::RegistryEntry,
};

/// The memo program, which fails on anything but valid UTF-8
pub const MEMO_PROGRAM_ID: Pubkey = pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");


pub struct Processor;

impl Processor {

	/// Process a decoded message.
	///
	/// @param message Views of the accounts passed to the program, up to the entrypoint's capacity,
	/// 	along with the declared account count, the instruction data and the program id.
	pub fn process_message(message: &DecodedMessage) -> ProgramResult {
		log_message(message);
		Self::process(message.program_id(), message.accounts(), message.instruction_data())
	}

	/// Process one instruction over the decoded account views.
	///
	/// @param program_id The public key of the account this program was loaded into.
	/// @param accounts Views of the accounts passed to the program.
	/// @param instruction_data The instruction tag followed by its parameters.
	pub fn process(program_id: &Pubkey, accounts: &[AccountView], instruction_data: &[u8]) -> ProgramResult {

		let instruction = RegistryInstruction::unpack(instruction_data)?;
		match instruction {
			RegistryInstruction::LogAccounts => {
				log_accounts(accounts);
				Ok(())
			}

			RegistryInstruction::Register { username } => {
				Self::register(program_id, accounts, username, Rent::get)
			}
		}
	}


	/// Register `username` for the signing user.
	/// The rent sysvar is only fetched once the accounts have passed their checks.
	fn register(
		program_id: &Pubkey,
		accounts: &[AccountView],
		username: &[u8],
		rent: impl FnOnce() -> Result<Rent, ProgramError>,
	) -> ProgramResult {

		let accounts_iter = &mut accounts.iter();

		let signer = next_account_view(accounts_iter)?;
		let new_account = next_account_view(accounts_iter)?;
		let system = next_account_view(accounts_iter)?;
		let memo = next_account_view(accounts_iter)?;

		// Check the executables are the ones we expect
		if system.key() != &system_program::ID {
			msg!("[FlatInput] ERROR: Expected System Program but got: {}", system.key());
			return Err(ProgramError::IncorrectProgramId);
		}
		if memo.key() != &MEMO_PROGRAM_ID {
			msg!("[FlatInput] ERROR: Expected Memo Program but got: {}", memo.key());
			return Err(ProgramError::IncorrectProgramId);
		}

		if !signer.is_signer() {
			msg!("[FlatInput] ERROR: Missing signature for account: {}", signer.key());
			return Err(ProgramError::MissingRequiredSignature);
		}

		// An account still owned by the system program has not been registered yet
		if !new_account.is_owned_by(&system_program::ID) {
			msg!("[FlatInput] ERROR: Account already in use: {}", new_account.key());
			return Err(RegistryError::UsernameTaken.into());
		}

		let pda = find_pda(program_id, &[username])?;
		msg!("[FlatInput] PDA: {} bump seed: {}", pda.key, pda.bump_seed);
		if new_account.key() != &pda.key {
			msg!("[FlatInput] ERROR: Could not derive account address with the given username");
			return Err(RegistryError::AddressMismatch.into());
		}

		if !rent()?.is_exempt(new_account.lamports(), RegistryEntry::LEN) {
			msg!("[FlatInput] ERROR: Account is not rent-exempt. Balance: {}", new_account.lamports());
			return Err(ProgramError::AccountNotRentExempt);
		}

		let signer_seeds: &[&[u8]] = &[username, &[pda.bump_seed]];

		// Allocate space for the signer's key, then take ownership of the account
		let allocate = system_instruction::allocate(new_account.key(), RegistryEntry::LEN as u64);
		invoke_signed(&allocate, accounts, &[signer_seeds]).map_err(|e| {
			msg!("[FlatInput] ERROR: Could not allocate space");
			e
		})?;

		let assign = system_instruction::assign(new_account.key(), program_id);
		invoke_signed(&assign, accounts, &[signer_seeds]).map_err(|e| {
			msg!("[FlatInput] ERROR: Could not take ownership of the account");
			e
		})?;

		RegistryEntry { owner: *signer.key() }.store(new_account)?;

		// The memo program rejects the username unless it is valid UTF-8
		let memo_instruction = Instruction::new_with_bytes(
			*memo.key(),
			username,
			vec![AccountMeta::new_readonly(*signer.key(), true)],
		);
		invoke(&memo_instruction, accounts).map_err(|_| {
			msg!("[FlatInput] ERROR: Username rejected. Is it valid UTF-8?");
			ProgramError::from(RegistryError::UsernameRejected)
		})?;

		msg!("[FlatInput] Registered username for {}", signer.key());

		Ok(())
	}
}
