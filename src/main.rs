use clap::{crate_version, Arg, ArgMatches, Command};
use pwup_config::ConfigError;
use pwup_context::ContextImpl;
use pwup_protocol::types::account::Account;
use pwup_protocol::types::amount::humanize_ckb;
use pwup_protocol::types::config::{Network, PwConfig};
use pwup_protocol::types::context::CancelFlag;
use pwup_protocol::types::token::TokenGroup;
use pwup_protocol::{log, tokio, Logger, MigrationDeps, PwResult};
use pwup_rpc_client::RpcClient;

mod wallet;
use wallet::StdinWallet;

type Context = ContextImpl<RpcClient, StdinWallet>;

fn account_arg() -> Arg<'static> {
    Arg::new("account")
        .short('a')
        .long("account")
        .help("Ethereum account, e.g. 0x8d3e6d8bc6e0dbd4eb2e7c0a9d2b8a1e1f5c6b7a")
        .required(true)
        .takes_value(true)
}

#[tokio::main]
async fn main() -> PwResult<()> {
    // initail Command line options
    let matches = Command::new("pwup")
        .version(crate_version!())
        .about("Move sUDT cells from PW-Lock to Omni-Lock")
        .arg(
            Arg::new("config_path")
                .short('c')
                .long("config")
                .help("Network config path, overrides --network")
                .takes_value(true),
        )
        .arg(
            Arg::new("network")
                .short('n')
                .long("network")
                .help("Built-in network constants")
                .possible_values(["aggron4", "lina"])
                .default_value("aggron4")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print debug logs"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("addresses")
                .about("Show PW-Lock and Omni-Lock addresses of an account")
                .arg(account_arg()),
        )
        .subcommand(
            Command::new("balances")
                .about("List whitelisted tokens held by both addresses")
                .arg(account_arg()),
        )
        .subcommand(
            Command::new("migrate")
                .about("Sign and send the migration transaction")
                .arg(account_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Omni-Lock address to receive, defaults to the own one")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("tokens")
                        .long("tokens")
                        .help("Token symbols to move, defaults to all")
                        .takes_value(true)
                        .multiple_values(true),
                ),
        )
        .get_matches();

    // initail log system
    let level = if matches.is_present("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    log::set_boxed_logger(Box::new(Logger))
        .map(|_| log::set_max_level(level))
        .expect("logger");

    let config = load_config(&matches)?;
    let deps = MigrationDeps::from(&config);

    // initail CKB rcp client
    let rpc_client = RpcClient::new(&config.ckb_url, &config.ckb_indexer_url)?;

    let (name, sub_matches) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => return Ok(()),
    };
    let account: Account = sub_matches.value_of("account").unwrap_or_default().parse()?;
    let ctx: Context = ContextImpl::new(&rpc_client, StdinWallet::new(account), &deps);
    let info = ctx.connect().await?;

    match name {
        "addresses" => {
            println!("account:   {}", info.account);
            println!("pw-lock:   {}", info.source_address);
            println!("omni-lock: {}", info.destination_address);
        }
        "balances" => {
            let (source, destination) = ctx.list_both().await?;
            let (source_capacity, destination_capacity) = ctx.capacity().await?;
            print_groups("pw-lock", &info.source_address, source_capacity, &source);
            print_groups(
                "omni-lock",
                &info.destination_address,
                destination_capacity,
                &destination,
            );
        }
        "migrate" => migrate(&ctx, sub_matches).await?,
        _ => unreachable!("unknown subcommand"),
    }
    Ok(())
}

fn load_config(matches: &ArgMatches) -> PwResult<PwConfig> {
    if let Some(path) = matches.value_of("config_path") {
        return pwup_config::load_file(path);
    }
    let network: Network = matches
        .value_of("network")
        .unwrap_or("aggron4")
        .parse()
        .map_err(ConfigError::InvalidConfig)?;
    Ok(pwup_config::preset(network))
}

fn print_groups(title: &str, address: &str, capacity: u64, groups: &[TokenGroup]) {
    println!("{} {}", title, address);
    println!("  CKB\t{}", humanize_ckb(capacity));
    groups.iter().for_each(|group| {
        println!(
            "  {}\t{}\t({} cells)",
            group.descriptor.symbol,
            group.display_amount(),
            group.cells.len()
        )
    });
}

async fn migrate(ctx: &Context, matches: &ArgMatches) -> PwResult<()> {
    let (source, _) = ctx.list_both().await?;
    let groups = match matches.values_of("tokens") {
        Some(symbols) => {
            let symbols = symbols.map(str::to_uppercase).collect::<Vec<_>>();
            source
                .into_iter()
                .filter(|group| symbols.contains(&group.descriptor.symbol.to_uppercase()))
                .collect::<Vec<_>>()
        }
        None => source,
    };
    if groups.is_empty() {
        log::warn!("no whitelisted token to migrate");
        return Ok(());
    }
    groups
        .iter()
        .for_each(|group| log::info!("migrate {}", group.display_amount()));

    // ctrl-c stops a running top-up scan
    let cancel = CancelFlag::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("ctrl-c is pressed, cancel migration");
            signal.cancel();
        }
    });

    let hash = ctx
        .migrate(&groups, matches.value_of("to"), Some(&cancel))
        .await?;
    println!("transaction hash: {:#x}", hash);
    Ok(())
}
