use crate::error::FanoutError;
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{Fanout, FanoutMembershipVoucher};
use crate::utils::calculation::update_fanout_for_unstake;
use crate::utils::validation::*;
use anchor_lang::{
    prelude::*,
    solana_program::{sysvar, sysvar::instructions::get_instruction_relative},
};
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct UnstakeTokenMember<'info> {
    #[account(mut)]
    pub member: Signer<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        mut,
        close = member,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), member.key().as_ref()],
        bump,
        constraint = membership_voucher.membership_key == member.key(),
    )]
    pub membership_voucher: Account<'info, FanoutMembershipVoucher>,
    #[account(mut)]
    pub membership_mint: Account<'info, Mint>,
    #[account(
        mut,
        constraint = membership_mint_token_account.mint == membership_mint.key(),
        constraint = membership_mint_token_account.delegate.is_none(),
        constraint = membership_mint_token_account.close_authority.is_none(),
    )]
    pub membership_mint_token_account: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = member_stake_account.owner == membership_voucher.key(),
        constraint = member_stake_account.mint == membership_mint.key(),
    )]
    pub member_stake_account: Account<'info, TokenAccount>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    #[account(address = sysvar::instructions::id())]
    /// CHECK: Instructions sysvar
    pub instructions: UncheckedAccount<'info>,
}

/// Return the full escrowed stake and close the voucher. The immediately
/// preceding instruction must be a distribution for this member, so the
/// voucher leaves with its accounting settled.
pub fn unstake_member(ctx: Context<UnstakeTokenMember>) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let member = &ctx.accounts.member;
    let membership_mint = &ctx.accounts.membership_mint;
    assert_membership_mint(fanout, &membership_mint.key())?;
    let prev_ix = get_instruction_relative(-1, &ctx.accounts.instructions)
        .map_err(|_| FanoutError::MustDistribute)?;
    assert_distributed(prev_ix, member.key, fanout.membership_model)?;
    assert_owned_by(&fanout.to_account_info(), &crate::ID)?;
    assert_owned_by(&member.to_account_info(), &System::id())?;

    // The ledger releases what the voucher holds; the transfer drains the
    // whole escrow so tokens donated straight to the escrow address still
    // come out.
    let staked = ctx.accounts.membership_voucher.shares;
    let escrowed = ctx.accounts.member_stake_account.amount;
    if staked == 0 {
        return Err(FanoutError::NothingStaked.into());
    }
    fanout.total_shares = membership_mint.supply;
    update_fanout_for_unstake(fanout, staked)?;

    let stake_account_info = ctx.accounts.member_stake_account.to_account_info();
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let accounts = anchor_spl::token::Transfer {
        from: stake_account_info,
        to: ctx.accounts.membership_mint_token_account.to_account_info(),
        authority: ctx.accounts.membership_voucher.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(cpi_program, accounts);
    anchor_spl::token::transfer(
        cpi_ctx.with_signer(&[&[
            MEMBER_PREFIX.as_bytes(),
            fanout.key().as_ref(),
            member.key().as_ref(),
            &[*ctx.bumps.get("membership_voucher").unwrap()],
        ]]),
        escrowed,
    )?;
    Ok(())
}
