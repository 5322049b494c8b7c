use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::ckb_types::packed::Script;
use pwup_protocol::ckb_types::prelude::{Builder, Entity, Pack};
use pwup_protocol::mock::{bare_cell, sudt_script, token_cell, token_data, MockCkbClient};
use pwup_protocol::traits::Aggregator;
use pwup_protocol::types::error::ErrorType;
use pwup_protocol::types::indexer::CellFilter;
use pwup_protocol::types::token::TokenDescriptor;
use pwup_protocol::{tokio, TestVars::*, H256};

use crate::{decode_balance, AggregatorImpl, CellCollector};

fn lock(seed: u8) -> Script {
    Script::new_builder()
        .code_hash(H256([seed; 32]).pack())
        .args(Bytes::from(vec![seed; 20]).pack())
        .build()
}

fn catalog() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor::new(sudt_script(&USDC_ARGS), "USDC".into(), "USD Coin".into(), 18),
        TokenDescriptor::new(
            sudt_script(&OTHER_TOKEN_ARGS),
            "DAI".into(),
            "Dai Stablecoin".into(),
            18,
        ),
    ]
}

#[test]
fn balance_reads_leading_le_u128() {
    let mut data = 500u128.to_le_bytes().to_vec();
    data.extend_from_slice(&[0xff; 8]);
    assert_eq!(decode_balance(&data), Some(500));
    assert_eq!(decode_balance(&[1u8; 15]), None);
    assert_eq!(decode_balance(&[]), None);
}

#[tokio::test]
async fn group_in_first_seen_order() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let dai = sudt_script(&OTHER_TOKEN_ARGS);
    let cells = vec![
        token_cell(0, &owner, &dai, 14_200_000_000, token_data(7)),
        bare_cell(1, &owner, 10_000_000_000),
        token_cell(2, &owner, &usdc, 14_200_000_000, token_data(100)),
        token_cell(3, &owner, &dai, 14_200_000_000, token_data(3)),
        token_cell(4, &owner, &usdc, 14_200_000_000, token_data(400)),
    ];
    let rpc = MockCkbClient::with_cells(cells.clone());
    let groups = AggregatorImpl::new(&rpc)
        .list_token_groups(&owner, &catalog())
        .await
        .expect("list");

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].descriptor.symbol, "DAI");
    assert_eq!(groups[0].amount, 10);
    assert_eq!(groups[0].cells, vec![cells[0].clone(), cells[3].clone()]);
    assert_eq!(groups[1].descriptor.symbol, "USDC");
    assert_eq!(groups[1].amount, 500);
    assert_eq!(groups[1].cells, vec![cells[2].clone(), cells[4].clone()]);
}

#[tokio::test]
async fn amounts_survive_pagination() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let cells = (0..25)
        .map(|i| token_cell(i, &owner, &usdc, 14_200_000_000, token_data(i as u128 + 1)))
        .collect::<Vec<_>>();
    let rpc = MockCkbClient::with_cells(cells);
    let groups = AggregatorImpl::with_page_size(&rpc, 4)
        .list_token_groups(&owner, &catalog())
        .await
        .expect("list");

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].cells.len(), 25);
    assert_eq!(groups[0].amount, (1..=25).sum::<u128>());
    // 7 full or partial pages plus the empty one closing the cursor
    assert_eq!(rpc.fetch_count(), 8);
}

#[tokio::test]
async fn skip_unknown_and_malformed_tokens() {
    let owner = lock(1);
    let unknown = sudt_script(&H256([9u8; 32]));
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        token_cell(0, &owner, &unknown, 14_200_000_000, token_data(1000)),
        token_cell(1, &owner, &usdc, 14_200_000_000, Bytes::from(vec![1, 2, 3])),
        token_cell(2, &owner, &usdc, 14_200_000_000, token_data(42)),
    ]);
    let groups = AggregatorImpl::new(&rpc)
        .list_token_groups(&owner, &catalog())
        .await
        .expect("list");

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].amount, 42);
    assert_eq!(groups[0].cells.len(), 1);
}

#[tokio::test]
async fn ignore_cells_of_other_locks() {
    let owner = lock(1);
    let stranger = lock(2);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        token_cell(0, &stranger, &usdc, 14_200_000_000, token_data(1)),
        token_cell(1, &owner, &usdc, 14_200_000_000, token_data(2)),
    ]);
    let aggregator = AggregatorImpl::new(&rpc);
    let groups = aggregator
        .list_token_groups(&owner, &catalog())
        .await
        .expect("list");
    assert_eq!(groups[0].amount, 2);

    let empty = aggregator
        .list_token_groups(&lock(3), &catalog())
        .await
        .expect("list");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn indexer_failure_yields_no_partial_result() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![token_cell(
        0,
        &owner,
        &usdc,
        14_200_000_000,
        token_data(1),
    )]);
    rpc.set_indexer_failure(true);
    let err = AggregatorImpl::new(&rpc)
        .list_token_groups(&owner, &catalog())
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Aggregator);
    assert!(err.message().contains("indexer connection reset"));
}

#[tokio::test]
async fn reject_overflowing_balance() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        token_cell(0, &owner, &usdc, 14_200_000_000, token_data(u128::MAX)),
        token_cell(1, &owner, &usdc, 14_200_000_000, token_data(1)),
    ]);
    let err = AggregatorImpl::new(&rpc)
        .list_token_groups(&owner, &catalog())
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Aggregator);
}

#[tokio::test]
async fn capacity_counts_every_cell() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        bare_cell(0, &owner, 6_100_000_000),
        token_cell(1, &owner, &usdc, 14_200_000_000, token_data(1)),
        bare_cell(2, &lock(2), 9_900_000_000),
    ]);
    let capacity = AggregatorImpl::new(&rpc)
        .capacity_of(&owner)
        .await
        .expect("capacity");
    assert_eq!(capacity, 20_300_000_000);
}

#[tokio::test]
async fn bare_filter_yields_plain_capacity_cells() {
    let owner = lock(1);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        token_cell(0, &owner, &usdc, 14_200_000_000, token_data(1)),
        bare_cell(1, &owner, 6_100_000_000),
        bare_cell(2, &owner, 7_000_000_000),
    ]);
    let cells = CellCollector::new(&rpc, &CellFilter::bare_capacity(&owner))
        .page_size(1)
        .collect_all()
        .await
        .expect("collect");
    assert_eq!(cells.len(), 2);
    assert!(cells.iter().all(|cell| cell.is_bare()));
    assert_eq!(cells[0].capacity(), 6_100_000_000);
}

fn extended_lock(owner: &Script) -> Script {
    let mut args = owner.args().raw_data().to_vec();
    args.extend_from_slice(&[0x09, 0x09]);
    owner.clone().as_builder().args(Bytes::from(args).pack()).build()
}

#[tokio::test]
async fn drop_cells_whose_lock_args_only_share_a_prefix() {
    let owner = lock(1);
    let extended = extended_lock(&owner);
    let usdc = sudt_script(&USDC_ARGS);
    let rpc = MockCkbClient::with_cells(vec![
        token_cell(0, &extended, &usdc, 14_200_000_000, token_data(1000)),
        bare_cell(1, &extended, 100_000_000_000),
        token_cell(2, &owner, &usdc, 14_200_000_000, token_data(2)),
    ]);
    rpc.set_ignore_search_mode(true);
    let aggregator = AggregatorImpl::new(&rpc);
    let groups = aggregator
        .list_token_groups(&owner, &catalog())
        .await
        .expect("list");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].amount, 2);
    assert_eq!(groups[0].cells.len(), 1);
    assert_eq!(groups[0].cells[0].lock_script().as_slice(), owner.as_slice());

    let capacity = aggregator.capacity_of(&owner).await.expect("capacity");
    assert_eq!(capacity, 14_200_000_000);
}

#[tokio::test]
async fn page_of_foreign_cells_does_not_end_the_scan() {
    let owner = lock(1);
    let extended = extended_lock(&owner);
    let rpc = MockCkbClient::with_cells(vec![
        bare_cell(0, &extended, 1_000_000_000),
        bare_cell(1, &extended, 2_000_000_000),
        bare_cell(2, &owner, 6_100_000_000),
    ]);
    rpc.set_ignore_search_mode(true);
    let cells = CellCollector::new(&rpc, &CellFilter::bare_capacity(&owner))
        .page_size(2)
        .collect_all()
        .await
        .expect("collect");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].capacity(), 6_100_000_000);
}
