use crate::error::FanoutError;
use crate::pda::{FANOUT_PREFIX, MEMBER_PREFIX};
use crate::state::{Fanout, FanoutMembershipVoucher, MembershipModel};
use crate::utils::calculation::update_fanout_for_remove;
use crate::utils::validation::assert_owned_by;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct RemoveMember<'info> {
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
        mut,
        close = destination,
        seeds = [MEMBER_PREFIX.as_bytes(), fanout.key().as_ref(), member.key().as_ref()],
        bump,
        has_one = fanout,
    )]
    pub membership_account: Account<'info, FanoutMembershipVoucher>,
    #[account(mut)]
    /// CHECK: Checked in program
    pub destination: UncheckedAccount<'info>,
}

/// Close a member's voucher. The voucher's shares go back to the
/// unassigned pool; value the member already received stays received.
/// Token members leave through unstake instead.
pub fn remove_member(ctx: Context<RemoveMember>) -> Result<()> {
    let member_voucher = &ctx.accounts.membership_account;
    let fanout = &mut ctx.accounts.fanout;
    assert_owned_by(&fanout.to_account_info(), &crate::ID)?;
    assert_owned_by(&member_voucher.to_account_info(), &crate::ID)?;
    if fanout.membership_model != MembershipModel::NFT
        && fanout.membership_model != MembershipModel::Wallet
    {
        return Err(FanoutError::UnsupportedForModel.into());
    }
    // Closing to a token account would strand the reclaimed lamports.
    if assert_owned_by(&ctx.accounts.destination, &spl_token::id()).is_ok() {
        return Err(FanoutError::InvalidCloseAccountDestination.into());
    }
    update_fanout_for_remove(fanout, member_voucher.shares)?;
    Ok(())
}
