pub mod calculation;
pub mod distribution;
pub mod transfer;
pub mod validation;

use crate::{
    error::FanoutError,
    pda::MINT_MEMBER_PREFIX,
    state::{FanoutMembershipMintVoucher, FANOUT_MINT_MEMBERSHIP_VOUCHER_SIZE},
    utils::calculation::calculate_entitlement,
    utils::validation::{assert_derivation, assert_owned_by},
};
use anchor_lang::{
    prelude::*,
    solana_program::{program::invoke_signed, system_instruction},
};
use anchor_spl::token::TokenAccount;
use std::convert::TryInto;

pub fn create_or_allocate_account_raw<'a>(
    program_id: Pubkey,
    new_account_info: &AccountInfo<'a>,
    rent_sysvar_info: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
    payer_info: &AccountInfo<'a>,
    size: usize,
    new_acct_seeds: &[&[u8]],
) -> Result<()> {
    let rent = &Rent::from_account_info(rent_sysvar_info)?;
    let required_lamports = rent
        .minimum_balance(size)
        .max(1)
        .saturating_sub(new_account_info.lamports());
    if required_lamports > 0 {
        invoke_signed(
            &system_instruction::transfer(payer_info.key, new_account_info.key, required_lamports),
            &[
                payer_info.clone(),
                new_account_info.clone(),
                system_program_info.clone(),
            ],
            &[],
        )?;
    }
    let accounts = &[new_account_info.clone(), system_program_info.clone()];
    invoke_signed(
        &system_instruction::allocate(
            new_account_info.key,
            size.try_into()
                .map_err(|_| FanoutError::ArithmeticOverflow)?,
        ),
        accounts,
        &[new_acct_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account_info.key, &program_id),
        accounts,
        &[new_acct_seeds],
    )?;
    Ok(())
}

pub fn parse_fanout_mint(
    fanout_for_mint: &UncheckedAccount,
    fanout: &Pubkey,
    mint: &Pubkey,
) -> Result<crate::state::FanoutMint> {
    let account_info = fanout_for_mint.to_account_info();
    if account_info.data_is_empty() {
        return Err(FanoutError::PoolNotInitialized.into());
    }
    let bump = assert_derivation(
        &crate::ID,
        &account_info,
        &[
            crate::pda::MINT_POOL_PREFIX.as_bytes(),
            fanout.as_ref(),
            mint.as_ref(),
        ],
        Some(FanoutError::PoolNotInitialized.into()),
    )?;
    let mut data: &[u8] = &fanout_for_mint.try_borrow_data()?;
    let fanout_mint = crate::state::FanoutMint::try_deserialize(&mut data)?;
    if bump != fanout_mint.bump_seed {
        return Err(FanoutError::PoolNotInitialized.into());
    }
    Ok(fanout_mint)
}

pub fn parse_token_account(account: &AccountInfo, owner: &Pubkey) -> Result<TokenAccount> {
    let ref_data = account.try_borrow_data()?;
    let mut account_data: &[u8] = &ref_data;
    let account_object = TokenAccount::try_deserialize(&mut account_data)?;
    if &account_object.owner != owner {
        msg!("Token account has wrong owner");
        return Err(FanoutError::IncorrectOwner.into());
    }
    Ok(account_object)
}

/// Load a member's per-mint-pool voucher, creating it lazily on first use.
///
/// A fresh voucher starts with a zero recorded entitlement, so the first
/// distribution covers the pool's entire history. When the member's primary
/// voucher carries a newer `stake_time` the shares backing this record
/// changed; the recorded entitlement is rebased to the new share count so
/// the change is not applied retroactively.
#[allow(clippy::too_many_arguments)]
pub fn parse_mint_membership_voucher<'info>(
    mint_voucher_unchecked: &UncheckedAccount<'info>,
    rent: &Sysvar<'info, Rent>,
    system_program: &Program<'info, System>,
    payer: &AccountInfo<'info>,
    membership_key: &Pubkey,
    fanout_mint: &Pubkey,
    fanout: &Pubkey,
    stake_time: i64,
    shares: u64,
    total_shares: u64,
    pool_total_inflow: u64,
) -> Result<FanoutMembershipMintVoucher> {
    let account_info = mint_voucher_unchecked.to_account_info();
    let bump = assert_derivation(
        &crate::ID,
        &account_info,
        &[
            MINT_MEMBER_PREFIX.as_bytes(),
            fanout_mint.as_ref(),
            membership_key.as_ref(),
        ],
        Some(FanoutError::InvalidMembershipVoucher.into()),
    )?;

    Ok(if mint_voucher_unchecked.data_is_empty() {
        create_or_allocate_account_raw(
            crate::ID,
            &account_info,
            &rent.to_account_info(),
            &system_program.to_account_info(),
            payer,
            FANOUT_MINT_MEMBERSHIP_VOUCHER_SIZE,
            &[
                MINT_MEMBER_PREFIX.as_bytes(),
                fanout_mint.as_ref(),
                membership_key.as_ref(),
                &[bump],
            ],
        )?;
        FanoutMembershipMintVoucher {
            fanout: *fanout,
            fanout_mint: *fanout_mint,
            last_inflow: 0,
            stake_time,
            bump_seed: bump,
        }
    } else {
        assert_owned_by(mint_voucher_unchecked, &crate::ID)?;
        let mut data: &[u8] = &mint_voucher_unchecked.try_borrow_data()?;
        let mut voucher = FanoutMembershipMintVoucher::try_deserialize(&mut data)?;
        if voucher.bump_seed != bump {
            msg!("Mint voucher bump does not match");
            return Err(FanoutError::InvalidMembershipVoucher.into());
        }
        if voucher.stake_time != stake_time {
            voucher.last_inflow = calculate_entitlement(pool_total_inflow, shares, total_shares)?;
            voucher.stake_time = stake_time;
        }
        voucher
    })
}
