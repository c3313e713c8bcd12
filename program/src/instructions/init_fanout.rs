use crate::{
    error::FanoutError,
    pda::{FANOUT_PREFIX, HOLDING_PREFIX},
    state::{Fanout, MembershipModel, FANOUT_SIZE, HOLDING_ACCOUNT_SIZE},
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default)]
pub struct InitializeFanoutArgs {
    pub bump_seed: u8,
    pub native_account_bump_seed: u8,
    pub name: String,
    pub total_shares: u64,
}

#[derive(Accounts)]
#[instruction(args: InitializeFanoutArgs)]
pub struct InitializeFanout<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        init,
        space = FANOUT_SIZE,
        seeds = [FANOUT_PREFIX.as_bytes(), args.name.as_bytes()],
        bump,
        payer = authority
    )]
    pub fanout: Account<'info, Fanout>,
    #[account(
        init,
        space = HOLDING_ACCOUNT_SIZE,
        seeds = [HOLDING_PREFIX.as_bytes(), fanout.key().as_ref()],
        bump,
        payer = authority
    )]
    /// CHECK: Native holding account, carries no data
    pub holding_account: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    #[account(mut)]
    pub membership_mint: Account<'info, Mint>,
    pub rent: Sysvar<'info, Rent>,
    pub token_program: Program<'info, Token>,
}

pub fn init_fanout(
    ctx: Context<InitializeFanout>,
    args: InitializeFanoutArgs,
    model: MembershipModel,
) -> Result<()> {
    let membership_mint = &ctx.accounts.membership_mint;
    let fanout = &mut ctx.accounts.fanout;
    fanout.authority = ctx.accounts.authority.key();
    fanout.holding_account = ctx.accounts.holding_account.key();
    fanout.name = args.name;
    fanout.total_shares = args.total_shares;
    fanout.total_available_shares = args.total_shares;
    fanout.total_inflow = 0;
    fanout.last_snapshot_amount = 0;
    fanout.bump_seed = *ctx.bumps.get("fanout").unwrap();
    fanout.holding_bump_seed = *ctx.bumps.get("holding_account").unwrap();
    fanout.membership_model = model;
    // Passing the native mint means "no membership mint".
    fanout.membership_mint = if membership_mint.key() == spl_token::native_mint::id() {
        None
    } else {
        Some(membership_mint.key())
    };
    match fanout.membership_model {
        MembershipModel::Wallet | MembershipModel::NFT => {
            fanout.membership_mint = None;
            fanout.total_staked_shares = None;
        }
        MembershipModel::Token => {
            if fanout.membership_mint.is_none() {
                return Err(FanoutError::InvalidMembershipModel.into());
            }
            // Shares track the mint's circulating supply; re-bound on every
            // stake, unstake and token distribution.
            fanout.total_shares = membership_mint.supply;
            fanout.total_available_shares = 0;
            fanout.total_staked_shares = Some(0);
        }
    };

    Ok(())
}
