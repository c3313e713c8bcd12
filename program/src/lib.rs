pub mod error;
pub mod instructions;
pub mod pda;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;
use instructions::*;
use state::MembershipModel;

declare_id!("FanQxkWR1ZzAw3LviFfC1uWw3JQ5PPB4qqZE9tzYeRUm");

#[program]
pub mod fanout {
    use super::*;

    pub fn init_fanout(
        ctx: Context<InitializeFanout>,
        args: InitializeFanoutArgs,
        model: MembershipModel,
    ) -> Result<()> {
        instructions::init_fanout::init_fanout(ctx, args, model)
    }

    pub fn init_fanout_for_mint(
        ctx: Context<InitializeFanoutForMint>,
        bump_seed: u8,
    ) -> Result<()> {
        instructions::init_fanout_for_mint::init_fanout_for_mint(ctx, bump_seed)
    }

    pub fn add_member_wallet(ctx: Context<AddMemberWallet>, args: AddMemberArgs) -> Result<()> {
        instructions::add_member::add_member_wallet(ctx, args)
    }

    pub fn add_member_nft(ctx: Context<AddMemberWithNft>, args: AddMemberArgs) -> Result<()> {
        instructions::add_member::add_member_nft(ctx, args)
    }

    pub fn stake_member(ctx: Context<SetTokenMemberStake>, shares: u64) -> Result<()> {
        instructions::stake::stake_member(ctx, shares)
    }

    pub fn stake_member_for(ctx: Context<SetForTokenMemberStake>, shares: u64) -> Result<()> {
        instructions::stake::stake_member_for(ctx, shares)
    }

    pub fn distribute_wallet_member(
        ctx: Context<DistributeWalletMember>,
        distribute_for_mint: bool,
    ) -> Result<()> {
        instructions::distribute_wallet::distribute_wallet_member(ctx, distribute_for_mint)
    }

    pub fn distribute_nft_member(
        ctx: Context<DistributeNftMember>,
        distribute_for_mint: bool,
    ) -> Result<()> {
        instructions::distribute_nft::distribute_nft_member(ctx, distribute_for_mint)
    }

    pub fn distribute_token_member(
        ctx: Context<DistributeTokenMember>,
        distribute_for_mint: bool,
    ) -> Result<()> {
        instructions::distribute_token::distribute_token_member(ctx, distribute_for_mint)
    }

    pub fn transfer_shares(ctx: Context<TransferShares>, shares: u64) -> Result<()> {
        instructions::transfer_shares::transfer_shares(ctx, shares)
    }

    pub fn remove_member(ctx: Context<RemoveMember>) -> Result<()> {
        instructions::remove_member::remove_member(ctx)
    }

    pub fn unstake_member(ctx: Context<UnstakeTokenMember>) -> Result<()> {
        instructions::unstake::unstake_member(ctx)
    }

    pub fn sign_metadata(ctx: Context<SignMetadata>) -> Result<()> {
        instructions::sign_metadata::sign_metadata(ctx)
    }
}
