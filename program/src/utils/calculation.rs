//! The share-ledger arithmetic and snapshot-diff inflow accounting. Every
//! mutation here is checked; overflow surfaces as `ArithmeticOverflow`
//! instead of wrapping.

use crate::{
    error::{FanoutError, OrArithError},
    state::{Fanout, FanoutMembershipMintVoucher, FanoutMembershipVoucher, FanoutMint},
};
use anchor_lang::prelude::*;

/// A member's cumulative entitlement against everything the pool has ever
/// taken in: `floor(total_inflow * shares / total_shares)`. The truncation
/// remainder stays in the pool and becomes claimable as `total_inflow`
/// grows, because the next call re-evaluates the full product.
pub fn calculate_entitlement(total_inflow: u64, shares: u64, total_shares: u64) -> Result<u64> {
    let entitled = (total_inflow as u128)
        .checked_mul(shares as u128)
        .or_arith_error()?
        .checked_div(total_shares as u128)
        .or_arith_error()?;
    u64::try_from(entitled).map_err(|_| FanoutError::ArithmeticOverflow.into())
}

/// What is actually owed now. Floors at zero so that a repeated call, or a
/// member whose recorded entitlement ran ahead of a shrunken share count,
/// is a no-op rather than an error.
pub fn calculate_payout(entitled: u64, recorded: u64) -> u64 {
    entitled.saturating_sub(recorded)
}

/// Reserve shares out of the unassigned pool for a new member.
pub fn update_fanout_for_add(fanout: &mut Fanout, shares: u64) -> Result<()> {
    if shares > fanout.total_available_shares {
        return Err(FanoutError::InsufficientAvailableShares.into());
    }
    fanout.total_available_shares = fanout
        .total_available_shares
        .checked_sub(shares)
        .or_arith_error()?;
    fanout.total_members = fanout.total_members.checked_add(1).or_arith_error()?;
    Ok(())
}

/// Release a removed member's shares back to the unassigned pool.
pub fn update_fanout_for_remove(fanout: &mut Fanout, shares: u64) -> Result<()> {
    fanout.total_available_shares = fanout
        .total_available_shares
        .checked_add(shares)
        .or_arith_error()?;
    fanout.total_members = fanout.total_members.checked_sub(1).or_arith_error()?;
    Ok(())
}

pub fn update_fanout_for_stake(fanout: &mut Fanout, added: u64) -> Result<()> {
    fanout.total_staked_shares = Some(
        fanout
            .total_staked_shares
            .unwrap_or(0)
            .checked_add(added)
            .or_arith_error()?,
    );
    Ok(())
}

pub fn update_fanout_for_unstake(fanout: &mut Fanout, released: u64) -> Result<()> {
    fanout.total_staked_shares = Some(
        fanout
            .total_staked_shares
            .unwrap_or(0)
            .checked_sub(released)
            .or_arith_error()?,
    );
    fanout.total_members = fanout.total_members.checked_sub(1).or_arith_error()?;
    Ok(())
}

/// Fold newly arrived value into a pool's running inflow counter.
///
/// Under the Token model, value that arrived while part of the supply sat
/// unstaked is scaled up so that stakers split the whole delta in
/// proportion to the *staked* total: the counter grows by
/// `delta * total_shares / total_staked_shares`.
fn corrected_inflow(
    diff: u64,
    total_shares: u64,
    total_staked_shares: Option<u64>,
) -> Result<u64> {
    match total_staked_shares {
        Some(tss) if tss > 0 => {
            let shares_diff = total_shares.checked_sub(tss).or_arith_error()?;
            let correction = (diff as u128)
                .checked_mul(shares_diff as u128)
                .or_arith_error()?
                .checked_div(tss as u128)
                .or_arith_error()?;
            let correction = u64::try_from(correction)
                .map_err(|_| error!(FanoutError::ArithmeticOverflow))?;
            diff.checked_add(correction).or_arith_error()
        }
        _ => Ok(diff),
    }
}

pub fn update_inflow(fanout: &mut Fanout, current_snapshot: u64) -> Result<()> {
    let diff = current_snapshot
        .checked_sub(fanout.last_snapshot_amount)
        .or_arith_error()?;
    let diff = corrected_inflow(diff, fanout.total_shares, fanout.total_staked_shares)?;
    fanout.total_inflow = fanout.total_inflow.checked_add(diff).or_arith_error()?;
    fanout.last_snapshot_amount = current_snapshot;
    Ok(())
}

pub fn update_inflow_for_mint(
    fanout: &Fanout,
    fanout_mint: &mut FanoutMint,
    current_snapshot: u64,
) -> Result<()> {
    let diff = current_snapshot
        .checked_sub(fanout_mint.last_snapshot_amount)
        .or_arith_error()?;
    let diff = corrected_inflow(diff, fanout.total_shares, fanout.total_staked_shares)?;
    fanout_mint.total_inflow = fanout_mint.total_inflow.checked_add(diff).or_arith_error()?;
    fanout_mint.last_snapshot_amount = current_snapshot;
    Ok(())
}

/// Record a payout: the voucher remembers the entitlement it was paid up
/// to, and the snapshot drops to the residual left in the holding account.
pub fn update_snapshot(
    fanout: &mut Fanout,
    voucher: &mut FanoutMembershipVoucher,
    entitled: u64,
    payout: u64,
) -> Result<()> {
    voucher.total_inflow = entitled;
    fanout.last_snapshot_amount = fanout
        .last_snapshot_amount
        .checked_sub(payout)
        .or_arith_error()?;
    Ok(())
}

pub fn update_snapshot_for_mint(
    fanout_mint: &mut FanoutMint,
    mint_voucher: &mut FanoutMembershipMintVoucher,
    entitled: u64,
    payout: u64,
) -> Result<()> {
    mint_voucher.last_inflow = entitled;
    fanout_mint.last_snapshot_amount = fanout_mint
        .last_snapshot_amount
        .checked_sub(payout)
        .or_arith_error()?;
    Ok(())
}

/// Lamports available for distribution once the holding account's
/// rent-exempt reserve is set aside.
pub fn current_lamports(
    rent: &Sysvar<Rent>,
    size: usize,
    holding_account_lamports: u64,
) -> Result<u64> {
    let reserve = rent.minimum_balance(size).max(1);
    holding_account_lamports
        .checked_sub(reserve)
        .ok_or_else(|| FanoutError::ArithmeticOverflow.into())
}
