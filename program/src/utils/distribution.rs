//! The payout path shared by all three membership models: fold new inflow
//! into the pool, re-evaluate the member's cumulative entitlement, pay the
//! difference. Calling it again without new inflow pays nothing.

use crate::error::FanoutError;
use crate::state::{Fanout, FanoutMembershipVoucher, HOLDING_ACCOUNT_SIZE};
use crate::utils::calculation::*;
use crate::utils::transfer::{transfer_from_mint_holding, transfer_native};
use crate::utils::validation::*;
use crate::utils::{parse_fanout_mint, parse_mint_membership_voucher, parse_token_account};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};

pub fn distribute_native<'info>(
    holding_account: &mut UncheckedAccount<'info>,
    fanout: &mut Account<'info, Fanout>,
    membership_voucher: &mut Account<'info, FanoutMembershipVoucher>,
    member: UncheckedAccount<'info>,
    rent: Sysvar<'info, Rent>,
) -> Result<()> {
    if holding_account.key() != fanout.holding_account {
        return Err(FanoutError::InvalidHoldingAccount.into());
    }
    let total_shares = fanout.total_shares;
    let current_lamports_full = holding_account.lamports();
    let current_snapshot = current_lamports(&rent, HOLDING_ACCOUNT_SIZE, current_lamports_full)?;
    update_inflow(fanout, current_snapshot)?;
    let entitled =
        calculate_entitlement(fanout.total_inflow, membership_voucher.shares, total_shares)?;
    let payout = calculate_payout(entitled, membership_voucher.total_inflow);
    if payout == 0 {
        msg!("No new inflow for member, nothing to distribute");
        return Ok(());
    }
    update_snapshot(fanout, membership_voucher, entitled, payout)?;
    transfer_native(
        holding_account.to_account_info(),
        member.to_account_info(),
        current_lamports_full,
        payout,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn distribute_mint<'info>(
    fanout_mint: Account<'info, Mint>,
    fanout_for_mint: &mut UncheckedAccount<'info>,
    fanout_for_mint_membership_voucher: &mut UncheckedAccount<'info>,
    fanout_mint_member_token_account: &mut UncheckedAccount<'info>,
    holding_account: &mut UncheckedAccount<'info>,
    fanout: &mut Account<'info, Fanout>,
    membership_voucher: &mut Account<'info, FanoutMembershipVoucher>,
    rent: Sysvar<'info, Rent>,
    system_program: Program<'info, System>,
    token_program: Program<'info, Token>,
    payer: AccountInfo<'info>,
    member: UncheckedAccount<'info>,
    membership_key: &Pubkey,
) -> Result<()> {
    msg!("Distribute for mint");
    let mint = &fanout_mint;
    let member_token_account_info = fanout_mint_member_token_account.to_account_info();
    let total_shares = fanout.total_shares;
    assert_owned_by(fanout_for_mint, &crate::ID)?;
    assert_owned_by(&member_token_account_info, &Token::id())?;
    assert_owned_by(holding_account, &Token::id())?;
    assert_ata(
        &holding_account.to_account_info(),
        &fanout.key(),
        &mint.key(),
        Some(FanoutError::HoldingAccountMustBeAnAta.into()),
    )?;
    let fanout_mint_object = &mut parse_fanout_mint(fanout_for_mint, &fanout.key(), &mint.key())?;
    if holding_account.key() != fanout_mint_object.token_account {
        return Err(FanoutError::InvalidHoldingAccount.into());
    }
    if fanout_mint_object.mint != mint.key() {
        return Err(FanoutError::PoolNotInitialized.into());
    }
    let holding_account_ata = parse_token_account(holding_account, &fanout.key())?;
    parse_token_account(&member_token_account_info, &member.key())?;

    let current_snapshot = holding_account_ata.amount;
    update_inflow_for_mint(fanout, fanout_mint_object, current_snapshot)?;

    let mint_voucher = &mut parse_mint_membership_voucher(
        fanout_for_mint_membership_voucher,
        &rent,
        &system_program,
        &payer,
        membership_key,
        &fanout_for_mint.key(),
        &fanout.key(),
        membership_voucher.stake_time,
        membership_voucher.shares,
        total_shares,
        fanout_mint_object.total_inflow,
    )?;
    let entitled = calculate_entitlement(
        fanout_mint_object.total_inflow,
        membership_voucher.shares,
        total_shares,
    )?;
    let payout = calculate_payout(entitled, mint_voucher.last_inflow);
    if payout > 0 {
        update_snapshot_for_mint(fanout_mint_object, mint_voucher, entitled, payout)?;
    }

    let mut mint_voucher_data: &mut [u8] =
        &mut fanout_for_mint_membership_voucher.try_borrow_mut_data()?;
    mint_voucher.try_serialize(&mut mint_voucher_data)?;
    let mut fanout_mint_data: &mut [u8] = &mut fanout_for_mint.try_borrow_mut_data()?;
    fanout_mint_object.try_serialize(&mut fanout_mint_data)?;

    transfer_from_mint_holding(
        fanout,
        fanout.to_account_info(),
        token_program.to_account_info(),
        holding_account.to_account_info(),
        member_token_account_info,
        payout,
    )
}
