//! Deterministic address derivation for every fanout entity. Ownership is
//! expressed through the seeds: children embed their parent's key.

use anchor_lang::prelude::Pubkey;

pub const FANOUT_PREFIX: &str = "fanout";
pub const HOLDING_PREFIX: &str = "fanout-holding";
pub const MEMBER_PREFIX: &str = "fanout-member";
pub const MINT_POOL_PREFIX: &str = "fanout-mint";
pub const MINT_MEMBER_PREFIX: &str = "fanout-mint-member";

pub fn find_fanout_address(name: &str) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FANOUT_PREFIX.as_bytes(), name.as_bytes()], &crate::id())
}

pub fn find_holding_account_address(fanout: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[HOLDING_PREFIX.as_bytes(), fanout.as_ref()], &crate::id())
}

pub fn find_member_voucher_address(fanout: &Pubkey, membership_key: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            MEMBER_PREFIX.as_bytes(),
            fanout.as_ref(),
            membership_key.as_ref(),
        ],
        &crate::id(),
    )
}

pub fn find_fanout_mint_address(fanout: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[MINT_POOL_PREFIX.as_bytes(), fanout.as_ref(), mint.as_ref()],
        &crate::id(),
    )
}

pub fn find_mint_voucher_address(fanout_mint: &Pubkey, membership_key: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            MINT_MEMBER_PREFIX.as_bytes(),
            fanout_mint.as_ref(),
            membership_key.as_ref(),
        ],
        &crate::id(),
    )
}
