use anchor_lang::prelude::*;
use std::result::Result as StdResult;

pub trait OrArithError<T> {
    fn or_arith_error(self) -> StdResult<T, error::Error>;
}

impl OrArithError<u64> for Option<u64> {
    fn or_arith_error(self) -> StdResult<u64, error::Error> {
        self.ok_or_else(|| FanoutError::ArithmeticOverflow.into())
    }
}

impl OrArithError<u128> for Option<u128> {
    fn or_arith_error(self) -> StdResult<u128, error::Error> {
        self.ok_or_else(|| FanoutError::ArithmeticOverflow.into())
    }
}

#[error_code]
pub enum FanoutError {
    #[msg("Encountered an arithmetic error")]
    ArithmeticOverflow,

    #[msg("Invalid authority")]
    InvalidAuthority,

    #[msg("Not enough unassigned shares to reserve")]
    InsufficientAvailableShares,

    #[msg("Member does not hold enough shares")]
    InsufficientShares,

    #[msg("All shares must be assigned to members before distributing")]
    SharesNotFullyAssigned,

    #[msg("Invalid membership model")]
    InvalidMembershipModel,

    #[msg("Invalid membership voucher")]
    InvalidMembershipVoucher,

    #[msg("Membership mint does not match the fanout configuration")]
    MembershipMintMismatch,

    #[msg("Holding account does not match the fanout configuration")]
    InvalidHoldingAccount,

    #[msg("A mint holding account must be an ATA for the mint owned by the fanout")]
    HoldingAccountMustBeAnAta,

    DerivedKeyInvalid,

    IncorrectOwner,

    #[msg("Wallet does not own the membership token")]
    WalletDoesNotOwnMembershipToken,

    #[msg("The metadata record does not belong to the supplied mint")]
    MetadataMintMismatch,

    #[msg("The metadata specified is not valid token metadata")]
    InvalidMetadata,

    #[msg("No mint pool has been initialized for this fanout and mint")]
    PoolNotInitialized,

    #[msg("This operation must directly follow a distribution on the same member")]
    MustDistribute,

    #[msg("Stake escrow must be the voucher's ATA for the membership mint")]
    InvalidStakeEscrow,

    #[msg("Stake escrow token account has not been initialized")]
    EscrowNotInitialized,

    #[msg("Member has no staked tokens")]
    NothingStaked,

    CannotTransferToSelf,

    #[msg("Operation is not supported on this membership model")]
    UnsupportedForModel,

    #[msg("Sending lamports to an SPL token account would render them unusable")]
    InvalidCloseAccountDestination,
}
