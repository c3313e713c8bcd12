use crate::error::{FanoutError, OrArithError};
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{Fanout, FanoutMembershipVoucher, MembershipModel};
use crate::utils::calculation::calculate_entitlement;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(shares: u64)]
pub struct TransferShares<'info> {
    pub authority: Signer<'info>,
    /// CHECK: Membership key, not dereferenced
    pub from_member: UncheckedAccount<'info>,
    /// CHECK: Membership key, not dereferenced
    pub to_member: UncheckedAccount<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        has_one = authority,
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        mut,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), from_member.key().as_ref()],
        bump,
        has_one = fanout,
    )]
    pub from_membership_account: Account<'info, FanoutMembershipVoucher>,
    #[account(
        mut,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), to_member.key().as_ref()],
        bump,
        has_one = fanout,
    )]
    pub to_membership_account: Account<'info, FanoutMembershipVoucher>,
}

/// Move shares between two live vouchers. The unassigned pool and the
/// fanout's inflow counters are untouched; both vouchers' recorded
/// entitlements are rebased to their new share counts so moved shares
/// carry only future claims, never inflow the sender was already paid.
pub fn transfer_shares(ctx: Context<TransferShares>, shares: u64) -> Result<()> {
    let fanout = &ctx.accounts.fanout;
    let from_membership_account = &mut ctx.accounts.from_membership_account;
    let to_membership_account = &mut ctx.accounts.to_membership_account;

    if to_membership_account.key() == from_membership_account.key() {
        return Err(FanoutError::CannotTransferToSelf.into());
    }
    if fanout.membership_model == MembershipModel::Token {
        // Token shares only move through stake and unstake.
        return Err(FanoutError::UnsupportedForModel.into());
    }
    if from_membership_account.shares < shares {
        return Err(FanoutError::InsufficientShares.into());
    }
    from_membership_account.shares = from_membership_account
        .shares
        .checked_sub(shares)
        .or_arith_error()?;
    to_membership_account.shares = to_membership_account
        .shares
        .checked_add(shares)
        .or_arith_error()?;
    // Moved shares carry no claim on inflow already accounted against
    // either voucher: both recorded entitlements rebase to the new share
    // counts, the same way a re-stake rebases.
    from_membership_account.total_inflow = calculate_entitlement(
        fanout.total_inflow,
        from_membership_account.shares,
        fanout.total_shares,
    )?;
    to_membership_account.total_inflow = calculate_entitlement(
        fanout.total_inflow,
        to_membership_account.shares,
        fanout.total_shares,
    )?;
    Ok(())
}
