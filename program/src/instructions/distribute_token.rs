use crate::error::FanoutError;
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{Fanout, FanoutMembershipVoucher, MembershipModel};
use crate::utils::distribution::{distribute_mint, distribute_native};
use crate::utils::validation::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
#[instruction(distribute_for_mint: bool)]
pub struct DistributeTokenMember<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut)]
    /// CHECK: Checked in program
    pub member: UncheckedAccount<'info>,
    #[account(
        mut,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), member.key().as_ref()],
        constraint = membership_voucher.membership_key == member.key(),
        bump = membership_voucher.bump_seed,
    )]
    pub membership_voucher: Box<Account<'info, FanoutMembershipVoucher>>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        bump = fanout.bump_seed,
    )]
    pub fanout: Box<Account<'info, Fanout>>,
    #[account(mut)]
    /// CHECK: Native account or token account depending on the pool
    pub holding_account: UncheckedAccount<'info>,
    #[account(mut)]
    /// CHECK: Only used when distributing for a mint
    pub fanout_for_mint: UncheckedAccount<'info>,
    #[account(mut)]
    /// CHECK: Only used when distributing for a mint
    pub fanout_for_mint_membership_voucher: UncheckedAccount<'info>,
    pub fanout_mint: Account<'info, Mint>,
    #[account(mut)]
    /// CHECK: Only used when distributing for a mint
    pub fanout_mint_member_token_account: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
    pub token_program: Program<'info, Token>,
    #[account(mut)]
    pub membership_mint: Account<'info, Mint>,
    #[account(
        mut,
        constraint = member_stake_account.owner == membership_voucher.key(),
        constraint = member_stake_account.mint == membership_mint.key(),
        constraint = member_stake_account.amount > 0,
    )]
    pub member_stake_account: Account<'info, TokenAccount>,
}

pub fn distribute_token_member(
    ctx: Context<DistributeTokenMember>,
    distribute_for_mint: bool,
) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let fanout_info = fanout.to_account_info();
    let membership_voucher = &ctx.accounts.membership_voucher;
    let membership_voucher_info = membership_voucher.to_account_info();
    let member = &ctx.accounts.member;
    let membership_mint = &ctx.accounts.membership_mint;
    assert_membership_mint(fanout, &membership_mint.key())?;
    // Share count follows the mint's circulating supply.
    fanout.total_shares = membership_mint.supply;
    assert_ata(
        &ctx.accounts.member_stake_account.to_account_info(),
        &membership_voucher.key(),
        &membership_mint.key(),
        Some(FanoutError::InvalidStakeEscrow.into()),
    )?;
    assert_owned_by(&fanout_info, &crate::ID)?;
    assert_owned_by(&membership_voucher_info, &crate::ID)?;
    assert_owned_by(&member.to_account_info(), &System::id())?;
    assert_membership_model(fanout, MembershipModel::Token)?;
    assert_shares_distributed(fanout)?;

    if distribute_for_mint {
        let membership_key = ctx.accounts.member.key();
        distribute_mint(
            ctx.accounts.fanout_mint.to_owned(),
            &mut ctx.accounts.fanout_for_mint,
            &mut ctx.accounts.fanout_for_mint_membership_voucher,
            &mut ctx.accounts.fanout_mint_member_token_account,
            &mut ctx.accounts.holding_account,
            &mut ctx.accounts.fanout,
            &mut ctx.accounts.membership_voucher,
            ctx.accounts.rent.to_owned(),
            ctx.accounts.system_program.to_owned(),
            ctx.accounts.token_program.to_owned(),
            ctx.accounts.payer.to_account_info(),
            ctx.accounts.member.to_owned(),
            &membership_key,
        )?;
    } else {
        distribute_native(
            &mut ctx.accounts.holding_account,
            &mut ctx.accounts.fanout,
            &mut ctx.accounts.membership_voucher,
            ctx.accounts.member.to_owned(),
            ctx.accounts.rent.to_owned(),
        )?;
    }
    Ok(())
}
