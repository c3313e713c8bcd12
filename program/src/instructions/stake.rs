use crate::error::{FanoutError, OrArithError};
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{
    Fanout, FanoutMembershipVoucher, MembershipModel, FANOUT_MEMBERSHIP_VOUCHER_SIZE,
};
use crate::utils::calculation::{calculate_entitlement, update_fanout_for_stake};
use crate::utils::parse_token_account;
use crate::utils::validation::*;
use anchor_lang::{
    prelude::*,
    solana_program::{sysvar, sysvar::instructions::get_instruction_relative},
};
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
#[instruction(shares: u64)]
pub struct SetTokenMemberStake<'info> {
    #[account(mut)]
    pub member: Signer<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        init_if_needed,
        space = FANOUT_MEMBERSHIP_VOUCHER_SIZE,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), member.key().as_ref()],
        bump,
        payer = member
    )]
    pub membership_voucher: Account<'info, FanoutMembershipVoucher>,
    #[account(mut)]
    pub membership_mint: Account<'info, Mint>,
    #[account(
        mut,
        constraint = membership_mint_token_account.mint == membership_mint.key(),
        constraint = membership_mint_token_account.delegate.is_none(),
        constraint = membership_mint_token_account.close_authority.is_none(),
        constraint = membership_mint_token_account.amount >= shares,
        constraint = membership_mint_token_account.owner == member.key(),
    )]
    pub membership_mint_token_account: Account<'info, TokenAccount>,
    #[account(mut)]
    /// CHECK: Escrow token account, validated in program
    pub member_stake_account: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
    #[account(address = sysvar::instructions::id())]
    /// CHECK: Instructions sysvar
    pub instructions: UncheckedAccount<'info>,
}

/// Escrow `shares` units of the membership mint and credit them to the
/// member's voucher. Adding to a live stake must ride directly behind a
/// distribution for the member so no accrued value is repriced, and the
/// recorded entitlement is rebased to the new share count.
pub fn stake_member(ctx: Context<SetTokenMemberStake>, shares: u64) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let member = &ctx.accounts.member;
    let membership_voucher = &mut ctx.accounts.membership_voucher;
    let membership_mint = &ctx.accounts.membership_mint;
    assert_owned_by(&fanout.to_account_info(), &crate::ID)?;
    assert_owned_by(&member.to_account_info(), &System::id())?;
    assert_membership_model(fanout, MembershipModel::Token)?;
    assert_membership_mint(fanout, &membership_mint.key())?;

    let stake_account_info = ctx.accounts.member_stake_account.to_account_info();
    if stake_account_info.data_is_empty() {
        return Err(FanoutError::EscrowNotInitialized.into());
    }
    assert_ata(
        &stake_account_info,
        &membership_voucher.key(),
        &membership_mint.key(),
        Some(FanoutError::InvalidStakeEscrow.into()),
    )?;
    let escrow = parse_token_account(&stake_account_info, &membership_voucher.key())?;
    if escrow.mint != membership_mint.key() {
        return Err(FanoutError::InvalidStakeEscrow.into());
    }

    let restake = membership_voucher.shares > 0;
    if restake {
        let prev_ix = get_instruction_relative(-1, &ctx.accounts.instructions)
            .map_err(|_| FanoutError::MustDistribute)?;
        assert_distributed(prev_ix, member.key, fanout.membership_model)?;
    } else {
        fanout.total_members = fanout.total_members.checked_add(1).or_arith_error()?;
    }

    fanout.total_shares = membership_mint.supply;
    update_fanout_for_stake(fanout, shares)?;
    membership_voucher.fanout = fanout.key();
    membership_voucher.membership_key = member.key();
    // Shares follow what was staked through here, not the escrow balance:
    // tokens sent to the (derivable) escrow address directly never enter
    // the ledger.
    membership_voucher.shares = membership_voucher
        .shares
        .checked_add(shares)
        .or_arith_error()?;
    membership_voucher.stake_time = Clock::get()?.unix_timestamp;
    membership_voucher.bump_seed = *ctx.bumps.get("membership_voucher").unwrap();
    if restake {
        membership_voucher.total_inflow = calculate_entitlement(
            fanout.total_inflow,
            membership_voucher.shares,
            fanout.total_shares,
        )?;
    }

    let cpi_program = ctx.accounts.token_program.to_account_info();
    let accounts = anchor_spl::token::Transfer {
        from: ctx.accounts.membership_mint_token_account.to_account_info(),
        to: stake_account_info,
        authority: ctx.accounts.member.to_account_info(),
    };
    anchor_spl::token::transfer(CpiContext::new(cpi_program, accounts), shares)?;
    Ok(())
}

#[derive(Accounts)]
#[instruction(shares: u64)]
pub struct SetForTokenMemberStake<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    /// CHECK: Member being staked for, not a signer
    pub member: UncheckedAccount<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
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
    pub membership_voucher: Account<'info, FanoutMembershipVoucher>,
    #[account(mut)]
    pub membership_mint: Account<'info, Mint>,
    #[account(
        mut,
        constraint = membership_mint_token_account.mint == membership_mint.key(),
        constraint = membership_mint_token_account.delegate.is_none(),
        constraint = membership_mint_token_account.close_authority.is_none(),
        constraint = membership_mint_token_account.amount >= shares,
        constraint = membership_mint_token_account.owner == authority.key(),
    )]
    pub membership_mint_token_account: Account<'info, TokenAccount>,
    #[account(mut)]
    /// CHECK: Escrow token account, validated in program
    pub member_stake_account: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Authority-funded variant: pre-funds a member's stake out of the
/// authority's own balance without the member signing. Create-only; a
/// member tops up their own stake through `stake_member`.
pub fn stake_member_for(ctx: Context<SetForTokenMemberStake>, shares: u64) -> Result<()> {
    let fanout = &mut ctx.accounts.fanout;
    let member = &ctx.accounts.member;
    let membership_voucher = &mut ctx.accounts.membership_voucher;
    let membership_mint = &ctx.accounts.membership_mint;
    assert_owned_by(&fanout.to_account_info(), &crate::ID)?;
    assert_owned_by(&member.to_account_info(), &System::id())?;
    assert_membership_model(fanout, MembershipModel::Token)?;
    assert_membership_mint(fanout, &membership_mint.key())?;

    let stake_account_info = ctx.accounts.member_stake_account.to_account_info();
    if stake_account_info.data_is_empty() {
        return Err(FanoutError::EscrowNotInitialized.into());
    }
    assert_ata(
        &stake_account_info,
        &membership_voucher.key(),
        &membership_mint.key(),
        Some(FanoutError::InvalidStakeEscrow.into()),
    )?;
    parse_token_account(&stake_account_info, &membership_voucher.key())?;

    fanout.total_shares = membership_mint.supply;
    fanout.total_members = fanout.total_members.checked_add(1).or_arith_error()?;
    update_fanout_for_stake(fanout, shares)?;
    membership_voucher.fanout = fanout.key();
    membership_voucher.membership_key = member.key();
    membership_voucher.shares = shares;
    membership_voucher.stake_time = Clock::get()?.unix_timestamp;
    membership_voucher.bump_seed = *ctx.bumps.get("membership_voucher").unwrap();

    let cpi_program = ctx.accounts.token_program.to_account_info();
    let accounts = anchor_spl::token::Transfer {
        from: ctx.accounts.membership_mint_token_account.to_account_info(),
        to: stake_account_info,
        authority: ctx.accounts.authority.to_account_info(),
    };
    anchor_spl::token::transfer(CpiContext::new(cpi_program, accounts), shares)?;
    Ok(())
}
