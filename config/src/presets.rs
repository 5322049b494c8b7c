use pwup_protocol::ckb_jsonrpc_types::{DepType, JsonBytes, Script, ScriptHashType};
use pwup_protocol::ckb_types::{h256, H256};
use pwup_protocol::types::config::{Network, PwCellDep, PwConfig, PwScriptConfig, PwTokenConfig};

const FEE: u64 = 100_000;
// 2 CKB, Omni-Lock args are two bytes longer than PW-Lock args
const REBASE_SURCHARGE: u64 = 200_000_000;

// AGGRON4
const TESTNET_PW_LOCK_CODE_HASH: H256 =
    h256!("0x58c5f491aba6d61678b7cf7edf4910b1f5e00ec0cde2f42e0abb4fd9aff25a63");
const TESTNET_PW_LOCK_TX_HASH: H256 =
    h256!("0x57a62003daeab9d54aa29b944fc3b451213a5ebdf2e232216a3cfed0dde61b38");
const TESTNET_OMNI_LOCK_CODE_HASH: H256 =
    h256!("0x79f90bb5e892d80dd213439eeab551120eb417678824f282b4ffb5f21bad2e1e");
const TESTNET_SECP256K1_TX_HASH: H256 =
    h256!("0xf8de3bb47d055cdf460d93a2a6e1b05f7432f9777c8c474abf4eec1d4aee5d37");
const TESTNET_SUDT_CODE_HASH: H256 =
    h256!("0xc5e5dcf215925f7ef4dfaf5f4b4f105bc321c02776d6e7d52a1db3fcd9d011a4");
const TESTNET_SUDT_TX_HASH: H256 =
    h256!("0xe12877ebd2c3c364dc46c5c992bcfaf4fee33fa13eebdf82c591fc9825aab769");
const TESTNET_USDC_ARGS: H256 =
    h256!("0x58bef38794236b315b7c23fd8132d7f42676228d659b291936e8c6c7ba9f064e");

// LINA
const MAINNET_PW_LOCK_CODE_HASH: H256 =
    h256!("0xbf43c3602455798c1a61a596e0d95278864c552fafe231c063b3fabf97a8febc");
const MAINNET_PW_LOCK_TX_HASH: H256 =
    h256!("0x1d60cb8f4666e039f418ea94730b1a8c5aa0bf2f7781474406387462924d15d4");
const MAINNET_OMNI_LOCK_CODE_HASH: H256 =
    h256!("0x9f3aeaf2fc439549cbc870c653374943af96a0658bd6b51be8d8983183e6f52f");
const MAINNET_SECP256K1_TX_HASH: H256 =
    h256!("0x71a7ba8fc96349fea0ed3a5c47992e3b4084b031a42264a018e0072e8172e46c");
const MAINNET_SUDT_TX_HASH: H256 =
    h256!("0xc7813f6a415144643970c2e88e0bb6ca6a8edc5dd7c1022746f628284a9936d5");

pub fn aggron4() -> PwConfig {
    let usdc_args = JsonBytes::from_vec(TESTNET_USDC_ARGS.as_bytes().to_vec());
    PwConfig {
        network: Network::Aggron4,
        ckb_url: "https://testnet.ckb.dev/rpc".into(),
        ckb_indexer_url: "https://testnet.ckb.dev/indexer".into(),
        source_lock: PwScriptConfig::new(TESTNET_PW_LOCK_CODE_HASH, ScriptHashType::Type),
        destination_lock: PwScriptConfig::new(TESTNET_OMNI_LOCK_CODE_HASH, ScriptHashType::Type),
        cell_deps: vec![
            PwCellDep::new(TESTNET_PW_LOCK_TX_HASH, 0, DepType::Code),
            PwCellDep::new(TESTNET_SECP256K1_TX_HASH, 0, DepType::DepGroup),
            PwCellDep::new(TESTNET_SUDT_TX_HASH, 0, DepType::Code),
        ],
        fee: FEE,
        rebase_surcharge: REBASE_SURCHARGE,
        tokens: vec![PwTokenConfig {
            symbol: "USDC".into(),
            name: "USD Coin".into(),
            decimals: 18,
            script: Script {
                code_hash: TESTNET_SUDT_CODE_HASH,
                hash_type: ScriptHashType::Type,
                args: usdc_args,
            },
        }],
    }
}

// TODO: fill the mainnet whitelist once the bridged token type scripts are published
pub fn lina() -> PwConfig {
    PwConfig {
        network: Network::Lina,
        ckb_url: "https://mainnet.ckb.dev/rpc".into(),
        ckb_indexer_url: "https://mainnet.ckb.dev/indexer".into(),
        source_lock: PwScriptConfig::new(MAINNET_PW_LOCK_CODE_HASH, ScriptHashType::Type),
        destination_lock: PwScriptConfig::new(MAINNET_OMNI_LOCK_CODE_HASH, ScriptHashType::Type),
        cell_deps: vec![
            PwCellDep::new(MAINNET_PW_LOCK_TX_HASH, 0, DepType::Code),
            PwCellDep::new(MAINNET_SECP256K1_TX_HASH, 0, DepType::DepGroup),
            PwCellDep::new(MAINNET_SUDT_TX_HASH, 0, DepType::Code),
        ],
        fee: FEE,
        rebase_surcharge: REBASE_SURCHARGE,
        tokens: vec![],
    }
}
