use crate::{error::FanoutError, pda::FANOUT_PREFIX, state::Fanout};
use anchor_lang::prelude::*;

/// Pay out of a mint pool's holding token account. The fanout PDA owns the
/// account and signs the transfer.
pub fn transfer_from_mint_holding<'info>(
    fanout: &Fanout,
    fanout_authority: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    source: AccountInfo<'info>,
    dest: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount > 0 {
        let accounts = anchor_spl::token::Transfer {
            from: source,
            to: dest,
            authority: fanout_authority,
        };
        let cpi_ctx = CpiContext::new(token_program, accounts);
        let seeds = [
            FANOUT_PREFIX.as_bytes(),
            fanout.name.as_bytes(),
            &[fanout.bump_seed],
        ];
        return anchor_spl::token::transfer(cpi_ctx.with_signer(&[&seeds]), amount);
    }
    Ok(())
}

/// Pay lamports out of the native holding account. The holding account is
/// program owned, so the balances move directly.
pub fn transfer_native<'info>(
    source: AccountInfo<'info>,
    dest: AccountInfo<'info>,
    current_snapshot: u64,
    amount: u64,
) -> Result<()> {
    if amount > 0 {
        **source.lamports.borrow_mut() = current_snapshot
            .checked_sub(amount)
            .ok_or(FanoutError::ArithmeticOverflow)?;
        **dest.lamports.borrow_mut() = dest
            .lamports()
            .checked_add(amount)
            .ok_or(FanoutError::ArithmeticOverflow)?;
    }
    Ok(())
}
