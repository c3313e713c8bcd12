pub mod add_member;
pub mod distribute_nft;
pub mod distribute_token;
pub mod distribute_wallet;
pub mod init_fanout;
pub mod init_fanout_for_mint;
pub mod remove_member;
pub mod sign_metadata;
pub mod stake;
pub mod transfer_shares;
pub mod unstake;

pub use self::{
    add_member::*, distribute_nft::*, distribute_token::*, distribute_wallet::*, init_fanout::*,
    init_fanout_for_mint::*, remove_member::*, sign_metadata::*, stake::*, transfer_shares::*,
    unstake::*,
};
