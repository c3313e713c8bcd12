use clap::{crate_description, crate_name, crate_version, App, Arg, SubCommand};
use solana_clap_utils::input_validators::{is_url, is_valid_pubkey, is_valid_signer};

pub const SHOW: &str = "show";
pub const DISTRIBUTE_ALL: &str = "distribute-all";

pub fn init_api<'a, 'b>() -> App<'a, 'b> {
    App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::with_name("keypair")
                .long("keypair")
                .value_name("KEYPAIR")
                .validator(is_valid_signer)
                .takes_value(true)
                .global(true)
                .help("Filepath or URL to a keypair"),
        )
        .arg(
            Arg::with_name("rpc")
                .long("json_rpc_url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .validator(is_url)
                .help("JSON RPC URL for the cluster [default: devnet]"),
        )
        .arg(
            Arg::with_name("fanout_address")
                .long("fanout_address")
                .value_name("ADDRESS")
                .takes_value(true)
                .global(true)
                .validator(is_valid_pubkey)
                .help("The fanout address. Note this is the parent address, not a mint pool address"),
        )
        .subcommand(
            SubCommand::with_name(SHOW)
                .about("Show a fanout, its mint pools and its membership vouchers"),
        )
        .subcommand(
            SubCommand::with_name(DISTRIBUTE_ALL)
                .about("Run a distribution for every member of a fanout")
                .arg(
                    Arg::with_name("batch_size")
                        .long("batch_size")
                        .value_name("COUNT")
                        .takes_value(true)
                        .default_value("3")
                        .help("Distribution instructions to pack per transaction"),
                )
                .arg(
                    Arg::with_name("mint")
                        .long("mint")
                        .value_name("ADDRESS")
                        .takes_value(true)
                        .validator(is_valid_pubkey)
                        .help("Distribute a mint pool instead of the native pool"),
                ),
        )
}
