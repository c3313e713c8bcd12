use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use clap::{ArgMatches, Error, ErrorKind};
use mpl_fanout::{
    pda::{find_fanout_mint_address, find_member_voucher_address, find_mint_voucher_address},
    state::{
        Fanout, FanoutMembershipVoucher, FanoutMint, MembershipModel,
        FANOUT_MEMBERSHIP_VOUCHER_SIZE,
    },
};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
    system_program, sysvar,
    transaction::Transaction,
};
use std::str::FromStr;
use std::time::Duration;

use crate::cli_api::{init_api, DISTRIBUTE_ALL, SHOW};

mod cli_api;

fn setup_connection(app: &ArgMatches) -> Result<(RpcClient, Keypair), Error> {
    let url = app
        .value_of("rpc")
        .unwrap_or("https://api.devnet.solana.com")
        .to_owned();
    let payer = app
        .value_of("keypair")
        .ok_or_else(|| Error::with_description("Missing keypair", ErrorKind::ArgumentNotFound))
        .and_then(|path| {
            read_keypair_file(path).map_err(|_| {
                Error::with_description("Could not read keypair file", ErrorKind::InvalidValue)
            })
        })?;
    let timeout = Duration::from_secs(30);
    Ok((
        RpcClient::new_with_timeout_and_commitment(url, timeout, CommitmentConfig::confirmed()),
        payer,
    ))
}

fn fanout_address(app: &ArgMatches) -> Result<Pubkey, Error> {
    app.value_of("fanout_address")
        .ok_or_else(|| {
            Error::with_description("Missing fanout address", ErrorKind::ArgumentNotFound)
        })
        .and_then(|address| {
            Pubkey::from_str(address).map_err(|_| {
                Error::with_description("Invalid fanout address", ErrorKind::InvalidValue)
            })
        })
}

fn fetch_fanout(rpc: &RpcClient, address: &Pubkey) -> Result<Fanout, Error> {
    let data = rpc.get_account_data(address).map_err(|_| {
        Error::with_description("Fanout not found at address", ErrorKind::InvalidValue)
    })?;
    Fanout::try_deserialize(&mut data.as_slice()).map_err(|_| {
        Error::with_description("Account is not a fanout", ErrorKind::InvalidValue)
    })
}

/// Every program account carrying `parent` at `offset`, already filtered
/// down to accounts of exactly `size` bytes.
fn scoped_accounts(
    rpc: &RpcClient,
    parent: &Pubkey,
    offset: usize,
    size: Option<u64>,
) -> Result<Vec<(Pubkey, Vec<u8>)>, Error> {
    let mut filters = vec![RpcFilterType::Memcmp(Memcmp {
        offset,
        bytes: MemcmpEncodedBytes::Base58(parent.to_string()),
        encoding: None,
    })];
    if let Some(size) = size {
        filters.push(RpcFilterType::DataSize(size));
    }
    rpc.get_program_accounts_with_config(
        &mpl_fanout::id(),
        RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: None,
                commitment: Some(CommitmentConfig::confirmed()),
                min_context_slot: None,
            },
            with_context: None,
        },
    )
    .map(|accounts| {
        accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect()
    })
    .map_err(|e| Error::with_description(&format!("{:?}", e), ErrorKind::InvalidValue))
}

/// Mint pools carry their parent fanout after the discriminator and the
/// mint key.
fn fetch_mint_pools(rpc: &RpcClient, fanout: &Pubkey) -> Result<Vec<(Pubkey, FanoutMint)>, Error> {
    Ok(scoped_accounts(rpc, fanout, 40, None)?
        .into_iter()
        .filter_map(|(address, data)| {
            FanoutMint::try_deserialize(&mut data.as_slice())
                .ok()
                .map(|pool| (address, pool))
        })
        .collect())
}

/// Member vouchers carry their parent fanout directly after the
/// discriminator; mint vouchers share that layout, so the account size
/// keeps them out.
fn fetch_vouchers(
    rpc: &RpcClient,
    fanout: &Pubkey,
) -> Result<Vec<(Pubkey, FanoutMembershipVoucher)>, Error> {
    Ok(
        scoped_accounts(rpc, fanout, 8, Some(FANOUT_MEMBERSHIP_VOUCHER_SIZE as u64))?
            .into_iter()
            .filter_map(|(address, data)| {
                FanoutMembershipVoucher::try_deserialize(&mut data.as_slice())
                    .ok()
                    .map(|voucher| (address, voucher))
            })
            .collect(),
    )
}

/// One distribution instruction for a member, against either the native
/// pool or one mint pool. The native run still carries mint-shaped slots;
/// they ride along unused with the native mint standing in.
fn distribute_instruction(
    payer: &Pubkey,
    fanout_address: &Pubkey,
    fanout: &Fanout,
    member: &Pubkey,
    pool_mint: Option<Pubkey>,
) -> Instruction {
    let mint = pool_mint.unwrap_or_else(spl_token::native_mint::id);
    let (voucher, _) = find_member_voucher_address(fanout_address, member);
    let (fanout_for_mint, _) = find_fanout_mint_address(fanout_address, &mint);
    let (mint_voucher, _) = find_mint_voucher_address(&fanout_for_mint, member);
    let holding_account = match pool_mint {
        Some(mint) => spl_associated_token_account::get_associated_token_address(
            fanout_address,
            &mint,
        ),
        None => fanout.holding_account,
    };
    let member_token_account =
        spl_associated_token_account::get_associated_token_address(member, &mint);
    let distribute_for_mint = pool_mint.is_some();

    match fanout.membership_model {
        MembershipModel::Token => {
            let membership_mint = fanout.membership_mint.unwrap_or_else(Pubkey::default);
            let stake_account = spl_associated_token_account::get_associated_token_address(
                &voucher,
                &membership_mint,
            );
            Instruction {
                program_id: mpl_fanout::id(),
                accounts: mpl_fanout::accounts::DistributeTokenMember {
                    payer: *payer,
                    member: *member,
                    membership_voucher: voucher,
                    fanout: *fanout_address,
                    holding_account,
                    fanout_for_mint,
                    fanout_for_mint_membership_voucher: mint_voucher,
                    fanout_mint: mint,
                    fanout_mint_member_token_account: member_token_account,
                    system_program: system_program::id(),
                    rent: sysvar::rent::id(),
                    token_program: spl_token::id(),
                    membership_mint,
                    member_stake_account: stake_account,
                }
                .to_account_metas(None),
                data: mpl_fanout::instruction::DistributeTokenMember { distribute_for_mint }
                    .data(),
            }
        }
        _ => Instruction {
            program_id: mpl_fanout::id(),
            accounts: mpl_fanout::accounts::DistributeWalletMember {
                payer: *payer,
                member: *member,
                membership_voucher: voucher,
                fanout: *fanout_address,
                holding_account,
                fanout_for_mint,
                fanout_for_mint_membership_voucher: mint_voucher,
                fanout_mint: mint,
                fanout_mint_member_token_account: member_token_account,
                system_program: system_program::id(),
                rent: sysvar::rent::id(),
                token_program: spl_token::id(),
            }
            .to_account_metas(None),
            data: mpl_fanout::instruction::DistributeWalletMember { distribute_for_mint }.data(),
        },
    }
}

fn show(rpc: &RpcClient, app: &ArgMatches) -> Result<(), Error> {
    let address = fanout_address(app)?;
    let fanout = fetch_fanout(rpc, &address)?;
    println!("{}\n{:#?}", address, fanout);

    let pools = fetch_mint_pools(rpc, &address)?;
    if pools.is_empty() {
        println!("No mint pools");
    }
    for (pool_address, pool) in pools {
        println!("\n{}\n{:#?}", pool_address, pool);
    }

    for (voucher_address, voucher) in fetch_vouchers(rpc, &address)? {
        println!("\n{}\n{:#?}", voucher_address, voucher);
    }
    Ok(())
}

fn distribute_all(rpc: &RpcClient, payer: &Keypair, app: &ArgMatches) -> Result<(), Error> {
    let address = fanout_address(app)?;
    let fanout = fetch_fanout(rpc, &address)?;
    if fanout.membership_model == MembershipModel::NFT {
        return Err(Error::with_description(
            "NFT memberships pay the current holder; distribute those members individually",
            ErrorKind::InvalidValue,
        ));
    }
    let batch_size = app
        .value_of("batch_size")
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|size| *size > 0)
        .ok_or_else(|| {
            Error::with_description("Invalid batch size", ErrorKind::InvalidValue)
        })?;
    let pool_mint = app
        .value_of("mint")
        .map(|raw| {
            Pubkey::from_str(raw).map_err(|_| {
                Error::with_description("Invalid mint address", ErrorKind::InvalidValue)
            })
        })
        .transpose()?;

    let vouchers = fetch_vouchers(rpc, &address)?;
    if vouchers.is_empty() {
        println!("No members to distribute to");
        return Ok(());
    }
    let instructions: Vec<Instruction> = vouchers
        .iter()
        .map(|(_, voucher)| {
            distribute_instruction(
                &payer.pubkey(),
                &address,
                &fanout,
                &voucher.membership_key,
                pool_mint,
            )
        })
        .collect();

    for batch in instructions.chunks(batch_size) {
        let blockhash = rpc.get_latest_blockhash().map_err(|e| {
            Error::with_description(&format!("{:?}", e), ErrorKind::InvalidValue)
        })?;
        let tx = Transaction::new_signed_with_payer(
            batch,
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        let signature = rpc.send_and_confirm_transaction(&tx).map_err(|e| {
            Error::with_description(&format!("{:?}", e), ErrorKind::InvalidValue)
        })?;
        println!("Distributed {} members: {}", batch.len(), signature);
    }
    Ok(())
}

fn main() {
    let app = init_api().get_matches();
    let result = setup_connection(&app).and_then(|(rpc, payer)| match app.subcommand() {
        (SHOW, Some(arg_matches)) => show(&rpc, arg_matches),
        (DISTRIBUTE_ALL, Some(arg_matches)) => distribute_all(&rpc, &payer, arg_matches),
        _ => Err(Error::with_description(
            "Unknown command",
            ErrorKind::InvalidSubcommand,
        )),
    });
    if let Err(e) = result {
        e.exit();
    }
}
