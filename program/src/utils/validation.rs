use crate::error::FanoutError;
use crate::state::{Fanout, MembershipModel};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program_memory::sol_memcmp;
use anchor_lang::solana_program::pubkey::PUBKEY_BYTES;
use anchor_spl::token::TokenAccount;
use mpl_token_metadata::state::{Metadata, TokenMetadataAccount};

pub fn cmp_pubkeys(a: &Pubkey, b: &Pubkey) -> bool {
    sol_memcmp(a.as_ref(), b.as_ref(), PUBKEY_BYTES) == 0
}

pub fn assert_derivation(
    program_id: &Pubkey,
    account: &AccountInfo,
    path: &[&[u8]],
    error: Option<error::Error>,
) -> Result<u8> {
    let (key, bump) = Pubkey::find_program_address(path, program_id);
    if !cmp_pubkeys(&key, account.key) {
        if let Some(err) = error {
            msg!("Derivation {:?}", err);
            return Err(err);
        }
        return Err(FanoutError::DerivedKeyInvalid.into());
    }
    Ok(bump)
}

pub fn assert_owned_by(account: &AccountInfo, owner: &Pubkey) -> Result<()> {
    if !cmp_pubkeys(account.owner, owner) {
        Err(FanoutError::IncorrectOwner.into())
    } else {
        Ok(())
    }
}

pub fn assert_owned_by_one(account: &AccountInfo, owners: Vec<&Pubkey>) -> Result<()> {
    for o in owners {
        let res = assert_owned_by(account, o);
        if res.is_ok() {
            return res;
        }
    }
    Err(FanoutError::IncorrectOwner.into())
}

pub fn assert_membership_model(fanout: &Account<Fanout>, model: MembershipModel) -> Result<()> {
    if fanout.membership_model != model {
        return Err(FanoutError::InvalidMembershipModel.into());
    }
    Ok(())
}

pub fn assert_membership_mint(fanout: &Account<Fanout>, mint: &Pubkey) -> Result<()> {
    match fanout.membership_mint {
        Some(ref membership_mint) if cmp_pubkeys(membership_mint, mint) => Ok(()),
        _ => Err(FanoutError::MembershipMintMismatch.into()),
    }
}

pub fn assert_ata(
    account: &AccountInfo,
    target: &Pubkey,
    mint: &Pubkey,
    err: Option<error::Error>,
) -> Result<u8> {
    assert_derivation(
        &anchor_spl::associated_token::ID,
        account,
        &[
            target.as_ref(),
            anchor_spl::token::ID.as_ref(),
            mint.as_ref(),
        ],
        err,
    )
}

pub fn assert_shares_distributed(fanout: &Account<Fanout>) -> Result<()> {
    if fanout.total_available_shares != 0 {
        return Err(FanoutError::SharesNotFullyAssigned.into());
    }
    Ok(())
}

/// The membership token account must actually hold the membership token and
/// belong to the claimed owner.
pub fn assert_holding(
    owner: &AccountInfo,
    token_account: &Account<TokenAccount>,
    mint_info: &AccountInfo,
) -> Result<()> {
    assert_owned_by(mint_info, &spl_token::id())?;
    let token_account_info = token_account.to_account_info();
    assert_owned_by(&token_account_info, &spl_token::id())?;
    if !cmp_pubkeys(&token_account.owner, owner.key) {
        return Err(FanoutError::IncorrectOwner.into());
    }
    if token_account.amount < 1 {
        return Err(FanoutError::WalletDoesNotOwnMembershipToken.into());
    }
    if !cmp_pubkeys(&token_account.mint, &mint_info.key()) {
        return Err(FanoutError::MembershipMintMismatch.into());
    }
    Ok(())
}

fn instruction_discriminator(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Stake mutations may only ride directly behind a distribution for the
/// same member, so the voucher's accounting is current when shares move.
pub fn assert_distributed(
    ix: Instruction,
    subject: &Pubkey,
    membership_model: MembershipModel,
) -> Result<()> {
    if !cmp_pubkeys(&ix.program_id, &crate::id()) {
        return Err(FanoutError::MustDistribute.into());
    }
    let expected = instruction_discriminator(match membership_model {
        MembershipModel::Wallet => "distribute_wallet_member",
        MembershipModel::NFT => "distribute_nft_member",
        MembershipModel::Token => "distribute_token_member",
    });
    if ix.data.len() < 8 || ix.accounts.len() < 2 {
        return Err(FanoutError::MustDistribute.into());
    }
    if sol_memcmp(expected.as_ref(), ix.data[0..8].as_ref(), 8) != 0 {
        return Err(FanoutError::MustDistribute.into());
    }
    // The member rides in the second account slot of every distribution.
    if !cmp_pubkeys(subject, &ix.accounts[1].pubkey) {
        return Err(FanoutError::MustDistribute.into());
    }
    Ok(())
}

pub fn assert_valid_metadata(
    metadata_account: &AccountInfo,
    mint: &AccountInfo,
) -> Result<Metadata> {
    let meta = Metadata::from_account_info(metadata_account)
        .map_err(|_| FanoutError::InvalidMetadata)?;
    if !cmp_pubkeys(&meta.mint, mint.key) {
        return Err(FanoutError::MetadataMintMismatch.into());
    }
    Ok(meta)
}
