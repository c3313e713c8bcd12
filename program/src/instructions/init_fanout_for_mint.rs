use crate::{
    error::FanoutError,
    pda::{FANOUT_PREFIX, MINT_POOL_PREFIX},
    state::{Fanout, FanoutMint, FANOUT_MINT_SIZE},
    utils::validation::assert_ata,
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

#[derive(Accounts)]
#[instruction(bump_seed: u8)]
pub struct InitializeFanoutForMint<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        mut,
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        has_one = authority,
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    /// One pool per (fanout, mint) pair; a second init on the same pair
    /// fails on this PDA already being in use.
    #[account(
        init,
        payer = authority,
        space = FANOUT_MINT_SIZE,
        seeds = [MINT_POOL_PREFIX.as_bytes(), fanout.key().as_ref(), mint.key().as_ref()],
        bump
    )]
    pub fanout_for_mint: Account<'info, FanoutMint>,
    #[account(
        mut,
        constraint = mint_holding_account.owner == fanout.key(),
        constraint = mint_holding_account.delegate.is_none(),
        constraint = mint_holding_account.close_authority.is_none(),
        constraint = mint_holding_account.mint == mint.key(),
    )]
    pub mint_holding_account: Account<'info, TokenAccount>,
    pub mint: Account<'info, Mint>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn init_fanout_for_mint(ctx: Context<InitializeFanoutForMint>, _bump_seed: u8) -> Result<()> {
    let fanout_mint = &mut ctx.accounts.fanout_for_mint;
    let fanout = &ctx.accounts.fanout;
    let mint_holding_account = &ctx.accounts.mint_holding_account;
    assert_ata(
        &mint_holding_account.to_account_info(),
        &fanout.key(),
        &ctx.accounts.mint.key(),
        Some(FanoutError::HoldingAccountMustBeAnAta.into()),
    )?;
    fanout_mint.fanout = fanout.key();
    fanout_mint.mint = ctx.accounts.mint.key();
    fanout_mint.token_account = mint_holding_account.key();
    // Value already sitting in the holding account counts as inflow.
    fanout_mint.total_inflow = mint_holding_account.amount;
    fanout_mint.last_snapshot_amount = mint_holding_account.amount;
    fanout_mint.bump_seed = *ctx.bumps.get("fanout_for_mint").unwrap();
    Ok(())
}
