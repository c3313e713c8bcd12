#![allow(unused)]

use anchor_lang::{InstructionData, ToAccountMetas};
use mpl_fanout::{
    pda::{
        find_fanout_address, find_fanout_mint_address, find_holding_account_address,
        find_member_voucher_address, find_mint_voucher_address,
    },
    state::MembershipModel,
};
use solana_program::system_instruction;
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program, sysvar,
    transaction::{Transaction, TransactionError},
};

pub const ONE_SOL: u64 = 1_000_000_000;

// FanoutError codes, offset by Anchor's custom error base.
pub const ARITHMETIC_OVERFLOW: u32 = 6000;
pub const INSUFFICIENT_AVAILABLE_SHARES: u32 = 6002;
pub const INSUFFICIENT_SHARES: u32 = 6003;
pub const SHARES_NOT_FULLY_ASSIGNED: u32 = 6004;
pub const INVALID_MEMBERSHIP_MODEL: u32 = 6005;
pub const MEMBERSHIP_MINT_MISMATCH: u32 = 6007;
pub const POOL_NOT_INITIALIZED: u32 = 6015;
pub const MUST_DISTRIBUTE: u32 = 6016;
pub const ESCROW_NOT_INITIALIZED: u32 = 6018;
pub const NOTHING_STAKED: u32 = 6019;
pub const CANNOT_TRANSFER_TO_SELF: u32 = 6020;
pub const UNSUPPORTED_FOR_MODEL: u32 = 6021;

pub fn fanout_program_test() -> ProgramTest {
    ProgramTest::new("mpl_fanout", mpl_fanout::id(), None)
}

pub fn clone_keypair(keypair: &Keypair) -> Keypair {
    Keypair::from_bytes(&keypair.to_bytes()).unwrap()
}

pub fn assert_custom_error(err: BanksClientError, expected: u32) {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        ))
        | BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, InstructionError::Custom(code)),
            ..
        } => assert_eq!(code, expected),
        other => panic!("unexpected error {:?}", other),
    }
}

/// Sign and submit a transaction with a fresh blockhash so repeated
/// identical instructions are never deduplicated.
pub async fn process(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.get_new_latest_blockhash().await?;
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

pub async fn airdrop(context: &mut ProgramTestContext, receiver: &Pubkey, amount: u64) {
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[system_instruction::transfer(
            &context.payer.pubkey(),
            receiver,
            amount,
        )],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
}

pub async fn create_mint(
    context: &mut ProgramTestContext,
    mint: &Keypair,
    authority: &Pubkey,
    decimals: u8,
) {
    let rent = context.banks_client.get_rent().await.unwrap();
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[
            system_instruction::create_account(
                &context.payer.pubkey(),
                &mint.pubkey(),
                rent.minimum_balance(spl_token::state::Mint::LEN),
                spl_token::state::Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint(
                &spl_token::id(),
                &mint.pubkey(),
                authority,
                None,
                decimals,
            )
            .unwrap(),
        ],
        Some(&context.payer.pubkey()),
        &[&context.payer, mint],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
}

pub async fn create_token_account(
    context: &mut ProgramTestContext,
    account: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
) {
    let rent = context.banks_client.get_rent().await.unwrap();
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[
            system_instruction::create_account(
                &context.payer.pubkey(),
                &account.pubkey(),
                rent.minimum_balance(spl_token::state::Account::LEN),
                spl_token::state::Account::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_account(
                &spl_token::id(),
                &account.pubkey(),
                mint,
                owner,
            )
            .unwrap(),
        ],
        Some(&context.payer.pubkey()),
        &[&context.payer, account],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
}

pub async fn create_associated_token_account(
    context: &mut ProgramTestContext,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Pubkey {
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[
            spl_associated_token_account::instruction::create_associated_token_account(
                &context.payer.pubkey(),
                wallet,
                mint,
                &spl_token::id(),
            ),
        ],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
    spl_associated_token_account::get_associated_token_address(wallet, mint)
}

pub async fn mint_to(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    to: &Pubkey,
    owner: &Keypair,
    amount: u64,
) {
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[spl_token::instruction::mint_to(
            &spl_token::id(),
            mint,
            to,
            &owner.pubkey(),
            &[],
            amount,
        )
        .unwrap()],
        Some(&context.payer.pubkey()),
        &[&context.payer, owner],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
}

pub async fn token_balance(context: &mut ProgramTestContext, account: &Pubkey) -> u64 {
    let data = context
        .banks_client
        .get_account(*account)
        .await
        .unwrap()
        .unwrap()
        .data;
    spl_token::state::Account::unpack(&data).unwrap().amount
}

pub async fn lamports(context: &mut ProgramTestContext, account: &Pubkey) -> u64 {
    context
        .banks_client
        .get_account(*account)
        .await
        .unwrap()
        .map(|a| a.lamports)
        .unwrap_or(0)
}

pub struct FanoutClient {
    pub authority: Keypair,
    pub name: String,
    pub fanout: Pubkey,
    pub holding_account: Pubkey,
    pub fanout_bump: u8,
    pub holding_bump: u8,
}

impl FanoutClient {
    pub fn new(name: &str) -> Self {
        let authority = Keypair::new();
        let (fanout, fanout_bump) = find_fanout_address(name);
        let (holding_account, holding_bump) = find_holding_account_address(&fanout);
        Self {
            authority,
            name: name.to_string(),
            fanout,
            holding_account,
            fanout_bump,
            holding_bump,
        }
    }

    pub fn init_instruction(
        &self,
        membership_mint: &Pubkey,
        total_shares: u64,
        model: MembershipModel,
    ) -> Instruction {
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::InitializeFanout {
                authority: self.authority.pubkey(),
                fanout: self.fanout,
                holding_account: self.holding_account,
                system_program: system_program::id(),
                membership_mint: *membership_mint,
                rent: sysvar::rent::id(),
                token_program: spl_token::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::InitFanout {
                args: mpl_fanout::instructions::InitializeFanoutArgs {
                    bump_seed: self.fanout_bump,
                    native_account_bump_seed: self.holding_bump,
                    name: self.name.clone(),
                    total_shares,
                },
                model,
            }
            .data(),
        }
    }

    pub fn add_member_wallet_instruction(&self, member: &Pubkey, shares: u64) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::AddMemberWallet {
                authority: self.authority.pubkey(),
                member: *member,
                fanout: self.fanout,
                membership_account: voucher,
                system_program: system_program::id(),
                rent: sysvar::rent::id(),
                token_program: spl_token::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::AddMemberWallet {
                args: mpl_fanout::instructions::AddMemberArgs { shares },
            }
            .data(),
        }
    }

    /// Distribute the native pool (or a mint pool) to one wallet member.
    /// `dummy_mint` stands in for the unused mint slot on native runs.
    pub fn distribute_wallet_instruction(
        &self,
        payer: &Pubkey,
        member: &Pubkey,
        fanout_mint: &Pubkey,
        distribute_for_mint: bool,
    ) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        let (fanout_for_mint, _) = find_fanout_mint_address(&self.fanout, fanout_mint);
        let (mint_voucher, _) = find_mint_voucher_address(&fanout_for_mint, member);
        let holding = if distribute_for_mint {
            spl_associated_token_account::get_associated_token_address(&self.fanout, fanout_mint)
        } else {
            self.holding_account
        };
        let member_token_account =
            spl_associated_token_account::get_associated_token_address(member, fanout_mint);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::DistributeWalletMember {
                payer: *payer,
                member: *member,
                membership_voucher: voucher,
                fanout: self.fanout,
                holding_account: holding,
                fanout_for_mint,
                fanout_for_mint_membership_voucher: mint_voucher,
                fanout_mint: *fanout_mint,
                fanout_mint_member_token_account: member_token_account,
                system_program: system_program::id(),
                rent: sysvar::rent::id(),
                token_program: spl_token::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::DistributeWalletMember { distribute_for_mint }.data(),
        }
    }

    pub fn transfer_shares_instruction(
        &self,
        from_member: &Pubkey,
        to_member: &Pubkey,
        shares: u64,
    ) -> Instruction {
        let (from_voucher, _) = find_member_voucher_address(&self.fanout, from_member);
        let (to_voucher, _) = find_member_voucher_address(&self.fanout, to_member);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::TransferShares {
                authority: self.authority.pubkey(),
                from_member: *from_member,
                to_member: *to_member,
                fanout: self.fanout,
                from_membership_account: from_voucher,
                to_membership_account: to_voucher,
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::TransferShares { shares }.data(),
        }
    }

    pub fn remove_member_instruction(&self, member: &Pubkey, destination: &Pubkey) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::RemoveMember {
                authority: self.authority.pubkey(),
                member: *member,
                fanout: self.fanout,
                membership_account: voucher,
                destination: *destination,
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::RemoveMember {}.data(),
        }
    }

    pub fn init_for_mint_instruction(&self, mint: &Pubkey) -> Instruction {
        let (fanout_for_mint, bump) = find_fanout_mint_address(&self.fanout, mint);
        let holding =
            spl_associated_token_account::get_associated_token_address(&self.fanout, mint);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::InitializeFanoutForMint {
                authority: self.authority.pubkey(),
                fanout: self.fanout,
                fanout_for_mint,
                mint_holding_account: holding,
                mint: *mint,
                system_program: system_program::id(),
                rent: sysvar::rent::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::InitFanoutForMint { bump_seed: bump }.data(),
        }
    }

    pub fn stake_instruction(
        &self,
        member: &Pubkey,
        membership_mint: &Pubkey,
        member_token_account: &Pubkey,
        shares: u64,
    ) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        let stake_account =
            spl_associated_token_account::get_associated_token_address(&voucher, membership_mint);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::SetTokenMemberStake {
                member: *member,
                fanout: self.fanout,
                membership_voucher: voucher,
                membership_mint: *membership_mint,
                membership_mint_token_account: *member_token_account,
                member_stake_account: stake_account,
                system_program: system_program::id(),
                token_program: spl_token::id(),
                rent: sysvar::rent::id(),
                instructions: sysvar::instructions::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::StakeMember { shares }.data(),
        }
    }

    pub fn distribute_token_instruction(
        &self,
        payer: &Pubkey,
        member: &Pubkey,
        membership_mint: &Pubkey,
        fanout_mint: &Pubkey,
        distribute_for_mint: bool,
    ) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        let (fanout_for_mint, _) = find_fanout_mint_address(&self.fanout, fanout_mint);
        let (mint_voucher, _) = find_mint_voucher_address(&fanout_for_mint, member);
        let stake_account =
            spl_associated_token_account::get_associated_token_address(&voucher, membership_mint);
        let holding = if distribute_for_mint {
            spl_associated_token_account::get_associated_token_address(&self.fanout, fanout_mint)
        } else {
            self.holding_account
        };
        let member_token_account =
            spl_associated_token_account::get_associated_token_address(member, fanout_mint);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::DistributeTokenMember {
                payer: *payer,
                member: *member,
                membership_voucher: voucher,
                fanout: self.fanout,
                holding_account: holding,
                fanout_for_mint,
                fanout_for_mint_membership_voucher: mint_voucher,
                fanout_mint: *fanout_mint,
                fanout_mint_member_token_account: member_token_account,
                system_program: system_program::id(),
                rent: sysvar::rent::id(),
                token_program: spl_token::id(),
                membership_mint: *membership_mint,
                member_stake_account: stake_account,
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::DistributeTokenMember { distribute_for_mint }.data(),
        }
    }

    pub fn unstake_instruction(
        &self,
        member: &Pubkey,
        membership_mint: &Pubkey,
        member_token_account: &Pubkey,
    ) -> Instruction {
        let (voucher, _) = find_member_voucher_address(&self.fanout, member);
        let stake_account =
            spl_associated_token_account::get_associated_token_address(&voucher, membership_mint);
        Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::UnstakeTokenMember {
                member: *member,
                fanout: self.fanout,
                membership_voucher: voucher,
                membership_mint: *membership_mint,
                membership_mint_token_account: *member_token_account,
                member_stake_account: stake_account,
                system_program: system_program::id(),
                token_program: spl_token::id(),
                instructions: sysvar::instructions::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::UnstakeMember {}.data(),
        }
    }
}
