//! log.rs -> logging decoded input through the program log

use solana_program::{log::sol_log_64, msg};

use crate::{account::AccountView, deserialize::DecodedMessage};


/// Log a view: key, then flags, lamports and rent epoch, then owner, then data four bytes at a time
pub fn log_account(account: &AccountView) {
	msg!("{}", account.key());
	msg!("  - is_signer, is_writable, executable, lamports, rent_epoch");
	sol_log_64(
		account.is_signer() as u64,
		account.is_writable() as u64,
		account.executable() as u64,
		account.lamports(),
		account.rent_epoch(),
	);
	msg!("  - owner {}", account.owner());
	msg!("  - data");

	for (offset, group) in data_groups(&account.data_to_vec()) {
		sol_log_64(offset, group[0] as u64, group[1] as u64, group[2] as u64, group[3] as u64);
	}
}

/// Split data into four byte groups tagged with their offset, zero-padding the last one
fn data_groups(data: &[u8]) -> impl Iterator<Item = (u64, [u8; 4])> + '_ {
	data.chunks(4).enumerate().map(|(i, chunk)| {
		let mut group = [0u8; 4];
		group[..chunk.len()].copy_from_slice(chunk);
		((i * 4) as u64, group)
	})
}

pub fn log_accounts(accounts: &[AccountView]) {
	for account in accounts {
		log_account(account);
	}
}

/// Log what was decoded, noting records skipped for lack of capacity
pub fn log_message(message: &DecodedMessage) {
	msg!(
		"[FlatInput] {} of {} accounts decoded, {} bytes of instruction data, program {}",
		message.accounts().len(),
		message.declared_accounts(),
		message.instruction_data().len(),
		message.program_id()
	);
	if message.is_truncated() {
		msg!("[FlatInput] {} accounts skipped", message.declared_accounts() - message.accounts().len());
	}
}
