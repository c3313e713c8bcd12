use crate::error::FanoutError;
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{
    Fanout, FanoutMembershipVoucher, MembershipModel, FANOUT_MEMBERSHIP_VOUCHER_SIZE,
};
use crate::utils::calculation::update_fanout_for_add;
use crate::utils::validation::{
    assert_membership_model, assert_owned_by, assert_owned_by_one, assert_valid_metadata,
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default)]
pub struct AddMemberArgs {
    pub shares: u64,
}

#[derive(Accounts)]
#[instruction(args: AddMemberArgs)]
pub struct AddMemberWallet<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    /// CHECK: Checked in program
    pub member: UncheckedAccount<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        has_one = authority,
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        init,
        space = FANOUT_MEMBERSHIP_VOUCHER_SIZE,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), member.key().as_ref()],
        bump,
        payer = authority
    )]
    pub membership_account: Account<'info, FanoutMembershipVoucher>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
    pub token_program: Program<'info, Token>,
}

pub fn add_member_wallet(ctx: Context<AddMemberWallet>, args: AddMemberArgs) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let member = &ctx.accounts.member;
    let membership_account = &mut ctx.accounts.membership_account;
    assert_membership_model(fanout, MembershipModel::Wallet)?;
    assert_owned_by(&fanout.to_account_info(), &crate::ID)?;
    assert_owned_by_one(&member.to_account_info(), vec![&System::id(), &crate::id()])?;
    update_fanout_for_add(fanout, args.shares)?;
    membership_account.fanout = fanout.key();
    membership_account.membership_key = member.key();
    membership_account.shares = args.shares;
    membership_account.stake_time = Clock::get()?.unix_timestamp;
    membership_account.bump_seed = *ctx.bumps.get("membership_account").unwrap();

    Ok(())
}

#[derive(Accounts)]
#[instruction(args: AddMemberArgs)]
pub struct AddMemberWithNft<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        has_one = authority,
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    /// Membership rides with the NFT: the voucher is keyed by its mint and
    /// distributions pay whoever holds the token at the time.
    #[account(
        init,
        space = FANOUT_MEMBERSHIP_VOUCHER_SIZE,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), mint.key().as_ref()],
        bump,
        payer = authority
    )]
    pub membership_account: Account<'info, FanoutMembershipVoucher>,
    pub mint: Account<'info, Mint>,
    /// CHECK: Checked in program
    pub metadata: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
    pub token_program: Program<'info, Token>,
}

pub fn add_member_nft(ctx: Context<AddMemberWithNft>, args: AddMemberArgs) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let membership_account = &mut ctx.accounts.membership_account;
    let metadata = &ctx.accounts.metadata;
    let mint = &ctx.accounts.mint;
    assert_membership_model(fanout, MembershipModel::NFT)?;
    assert_owned_by(metadata, &mpl_token_metadata::id())
        .map_err(|_| FanoutError::MetadataMintMismatch)?;
    assert_valid_metadata(metadata, &mint.to_account_info())?;
    update_fanout_for_add(fanout, args.shares)?;
    membership_account.fanout = fanout.key();
    membership_account.membership_key = mint.key();
    membership_account.shares = args.shares;
    membership_account.stake_time = Clock::get()?.unix_timestamp;
    membership_account.bump_seed = *ctx.bumps.get("membership_account").unwrap();
    Ok(())
}
