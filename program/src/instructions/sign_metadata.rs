use crate::pda::{FANOUT_PREFIX, HOLDING_PREFIX};
use crate::state::Fanout;
use crate::utils::validation::{assert_owned_by, assert_valid_metadata};
use anchor_lang::{prelude::*, solana_program::program::invoke_signed};

#[derive(Accounts)]
pub struct SignMetadata<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        seeds = [FANOUT_PREFIX.as_bytes(), fanout.name.as_bytes()],
        has_one = authority,
        bump = fanout.bump_seed,
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        constraint = fanout.holding_account == holding_account.key(),
        seeds = [HOLDING_PREFIX.as_bytes(), fanout.key().as_ref()],
        bump = fanout.holding_bump_seed,
    )]
    /// CHECK: Holding account PDA, signs the creator verification
    pub holding_account: UncheckedAccount<'info>,
    #[account(mut)]
    /// CHECK: Checked in program
    pub metadata: UncheckedAccount<'info>,
    /// CHECK: Metadata mint, checked against the metadata record
    pub mint: UncheckedAccount<'info>,
    #[account(address = mpl_token_metadata::ID)]
    /// CHECK: Token metadata program
    pub token_metadata_program: UncheckedAccount<'info>,
}

/// Verify the fanout's holding account as a creator on an NFT whose
/// royalties are routed into this fanout.
pub fn sign_metadata(ctx: Context<SignMetadata>) -> Result<()> {
    let metadata = ctx.accounts.metadata.to_account_info();
    let holding_account = &ctx.accounts.holding_account;
    assert_owned_by(&metadata, &mpl_token_metadata::id())?;
    assert_valid_metadata(&metadata, &ctx.accounts.mint.to_account_info())?;

    let sign_ix = mpl_token_metadata::instruction::sign_metadata(
        mpl_token_metadata::id(),
        metadata.key(),
        holding_account.key(),
    );
    invoke_signed(
        &sign_ix,
        &[metadata, holding_account.to_account_info()],
        &[&[
            HOLDING_PREFIX.as_bytes(),
            ctx.accounts.fanout.key().as_ref(),
            &[ctx.accounts.fanout.holding_bump_seed],
        ]],
    )?;
    Ok(())
}
