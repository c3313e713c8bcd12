use anchor_lang::prelude::*;
use std::default::Default;

/// Size of the native holding account. It carries no data of its own; its
/// rent-exempt reserve is excluded from inflow accounting.
pub const HOLDING_ACCOUNT_SIZE: usize = 1;

pub const FANOUT_SIZE: usize = 300;
pub const FANOUT_MINT_SIZE: usize = 200;
pub const FANOUT_MEMBERSHIP_VOUCHER_SIZE: usize = 8 + 32 + 32 + 8 + 8 + 8 + 1 + 64;
pub const FANOUT_MINT_MEMBERSHIP_VOUCHER_SIZE: usize = 8 + 32 + 32 + 8 + 8 + 1 + 64;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Copy, Debug)]
pub enum MembershipModel {
    Wallet = 0,
    Token = 1,
    NFT = 2,
}

impl Default for MembershipModel {
    fn default() -> Self {
        MembershipModel::Wallet
    }
}

#[account]
#[derive(Default, Debug)]
pub struct Fanout {
    pub authority: Pubkey,
    pub name: String,
    /// The native (lamport) holding account value is distributed from.
    pub holding_account: Pubkey,
    pub total_shares: u64,
    pub total_members: u64,
    /// Cumulative value ever observed flowing into the holding account.
    /// Monotonically non-decreasing.
    pub total_inflow: u64,
    /// Holding balance as of the last processed distribution.
    pub last_snapshot_amount: u64,
    pub bump_seed: u8,
    pub holding_bump_seed: u8,
    /// Shares not yet assigned to a member. Wallet and NFT models only.
    pub total_available_shares: u64,
    pub membership_model: MembershipModel,
    /// Set only for the Token model.
    pub membership_mint: Option<Pubkey>,
    /// Shares currently escrowed by members. Token model only.
    pub total_staked_shares: Option<u64>,
}

/// A secondary distribution pool denominated in one fungible mint,
/// layered on top of the fanout's native pool.
#[account]
#[derive(Default, Debug)]
pub struct FanoutMint {
    pub mint: Pubkey,
    pub fanout: Pubkey,
    /// The fanout's associated token account for `mint`.
    pub token_account: Pubkey,
    pub total_inflow: u64,
    pub last_snapshot_amount: u64,
    pub bump_seed: u8,
}

/// Per-member record of shares held and value received from the native pool.
///
/// `total_inflow` doubles as the member's recorded cumulative entitlement:
/// after every payout it equals `floor(fanout.total_inflow * shares /
/// total_shares)`, so a repeated distribution with no new inflow pays zero.
#[account]
#[derive(Default, Debug)]
pub struct FanoutMembershipVoucher {
    pub fanout: Pubkey,
    pub membership_key: Pubkey,
    pub shares: u64,
    pub total_inflow: u64,
    /// When the current stake was established. Mint vouchers compare this
    /// against their own copy to detect a re-stake and rebase themselves.
    pub stake_time: i64,
    pub bump_seed: u8,
}

/// Member accounting scoped to one mint pool, created lazily on the first
/// distribution for that (member, mint) pair.
#[account]
#[derive(Default)]
pub struct FanoutMembershipMintVoucher {
    pub fanout: Pubkey,
    pub fanout_mint: Pubkey,
    /// Recorded cumulative entitlement against the mint pool's inflow.
    pub last_inflow: u64,
    pub stake_time: i64,
    pub bump_seed: u8,
}
